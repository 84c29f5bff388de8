//! Samples and data sources.
//!
//! A [`SampleSet`] holds the control and test observations of one metric.
//! Data sources are external collaborators: anything that can yield a
//! `SampleSet` implements [`DataSource`]. [`GroupedObservations`] covers the
//! common long-format case where every row carries its group label.
//!
//! # Examples
//!
//! ```
//! use u_abtest::sample::{DataSource, GroupedObservations};
//!
//! let mut rows = GroupedObservations::new("Purchase");
//! rows.extend_group("control", [520.0, 498.5, 601.2]);
//! rows.extend_group("Test", [540.1, 575.0, 512.3]);
//!
//! let set = rows.load().unwrap();
//! assert_eq!(set.control().len(), 3);
//! assert_eq!(set.test().len(), 3);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use u_numflow::stats;

use crate::error::{AbTestError, Result};

/// Experiment arm an observation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Existing behaviour (e.g. maximum bidding).
    Control,
    /// Candidate behaviour (e.g. average bidding).
    Test,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Control => "control",
            Group::Test => "test",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "control" => Ok(Group::Control),
            "test" => Ok(Group::Test),
            other => Err(format!("unknown group label '{other}'")),
        }
    }
}

/// Observations of one metric for one group.
///
/// Values are guaranteed finite. Emptiness is allowed at construction and
/// reported by whichever check or test consumes the sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    group: Group,
    values: Vec<f64>,
}

impl Sample {
    /// Creates a sample, rejecting NaN and infinite values.
    pub fn new(group: Group, values: Vec<f64>) -> Result<Self> {
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(AbTestError::NonFiniteValue {
                group,
                index,
                value,
            });
        }
        Ok(Self { group, values })
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic mean, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        stats::mean(&self.values)
    }

    /// Sample variance (n-1 denominator), `None` when fewer than 2 values.
    pub fn variance(&self) -> Option<f64> {
        stats::variance(&self.values)
    }

    /// True when every observation is the same value.
    pub fn is_constant(&self) -> bool {
        match self.values.split_first() {
            Some((first, rest)) => rest.iter().all(|v| (v - first).abs() < 1e-300),
            None => false,
        }
    }

    /// Fails with `EmptySample` when there are no observations.
    pub(crate) fn require_non_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(AbTestError::EmptySample { group: self.group });
        }
        Ok(())
    }

    /// Fails with `EmptySample` or `InsufficientData` below `required`.
    pub(crate) fn require_len(&self, required: usize) -> Result<()> {
        self.require_non_empty()?;
        if self.len() < required {
            return Err(AbTestError::InsufficientData {
                group: self.group,
                required,
                actual: self.len(),
            });
        }
        Ok(())
    }
}

/// The two samples of one metric under test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSet {
    metric: String,
    control: Sample,
    test: Sample,
}

impl SampleSet {
    /// Builds a set from raw control and test values.
    pub fn new(metric: impl Into<String>, control: Vec<f64>, test: Vec<f64>) -> Result<Self> {
        Ok(Self {
            metric: metric.into(),
            control: Sample::new(Group::Control, control)?,
            test: Sample::new(Group::Test, test)?,
        })
    }

    /// Name of the metric (e.g. `Purchase`).
    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn control(&self) -> &Sample {
        &self.control
    }

    pub fn test(&self) -> &Sample {
        &self.test
    }

    pub fn get(&self, group: Group) -> &Sample {
        match group {
            Group::Control => &self.control,
            Group::Test => &self.test,
        }
    }
}

/// Anything that can supply the two samples of one metric.
pub trait DataSource {
    fn load(&self) -> Result<SampleSet>;
}

impl DataSource for SampleSet {
    fn load(&self) -> Result<SampleSet> {
        Ok(self.clone())
    }
}

/// One labelled row of a long-format table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub group_label: String,
    pub value: f64,
}

/// Long-format observations of one metric: both groups stacked with a label
/// column.
///
/// Rows whose label is neither `control` nor `test` are skipped when the set
/// is split.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupedObservations {
    pub metric: String,
    pub rows: Vec<Observation>,
}

impl GroupedObservations {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, group_label: impl Into<String>, value: f64) {
        self.rows.push(Observation {
            group_label: group_label.into(),
            value,
        });
    }

    /// Appends every value under the same label.
    pub fn extend_group<I>(&mut self, group_label: &str, values: I)
    where
        I: IntoIterator<Item = f64>,
    {
        for value in values {
            self.push(group_label, value);
        }
    }

    /// Splits rows by group label, preserving row order within each group.
    pub fn split(&self) -> Result<SampleSet> {
        let mut control = Vec::new();
        let mut test = Vec::new();
        let mut skipped = 0usize;

        for row in &self.rows {
            match row.group_label.parse::<Group>() {
                Ok(Group::Control) => control.push(row.value),
                Ok(Group::Test) => test.push(row.value),
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(metric = %self.metric, skipped, "skipped rows with unknown group label");
        }
        if control.is_empty() {
            return Err(AbTestError::MissingGroup {
                group: Group::Control,
            });
        }
        if test.is_empty() {
            return Err(AbTestError::MissingGroup { group: Group::Test });
        }

        SampleSet::new(self.metric.clone(), control, test)
    }
}

impl DataSource for GroupedObservations {
    fn load(&self) -> Result<SampleSet> {
        self.split()
    }
}
