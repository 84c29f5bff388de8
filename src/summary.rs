//! Descriptive summary of one group.

use serde::Serialize;
use u_numflow::stats;

use crate::error::{AbTestError, Result};
use crate::sample::{Group, Sample};

/// Location and spread of one sample, reported next to the test decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: Group,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` for a single observation.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub p05: f64,
    pub median: f64,
    pub p95: f64,
    pub p99: f64,
    pub max: f64,
}

impl GroupSummary {
    /// Summarises a non-empty sample.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_abtest::sample::{Group, Sample};
    /// use u_abtest::summary::GroupSummary;
    ///
    /// let s = Sample::new(Group::Control, vec![3.0, 1.0, 2.0]).unwrap();
    /// let summary = GroupSummary::compute(&s).unwrap();
    /// assert_eq!(summary.mean, 2.0);
    /// assert_eq!(summary.median, 2.0);
    /// ```
    pub fn compute(sample: &Sample) -> Result<Self> {
        sample.require_non_empty()?;
        let data = sample.values();
        let failed = || AbTestError::NumericalFailure {
            test: "descriptive summary",
        };

        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let quantile = |p: f64| stats::quantile(data, p).ok_or_else(failed);

        Ok(Self {
            group: sample.group(),
            count: data.len(),
            mean: stats::mean(data).ok_or_else(failed)?,
            std_dev: stats::std_dev(data),
            min,
            p05: quantile(0.05)?,
            median: stats::median(data).ok_or_else(failed)?,
            p95: quantile(0.95)?,
            p99: quantile(0.99)?,
            max,
        })
    }
}
