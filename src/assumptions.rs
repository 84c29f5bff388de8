//! Assumption checks for the parametric two-sample tests.
//!
//! - [`NormalityChecker`]: Shapiro-Wilk on one sample. H₀: the sample is
//!   normally distributed.
//! - [`VarianceHomogeneityChecker`]: Levene on a pair of samples. H₀: the
//!   variances are equal.
//!
//! In both cases the assumption *holds* when H₀ cannot be rejected, i.e.
//! `p_value > significance_level`.
//!
//! # Examples
//!
//! ```
//! use u_abtest::assumptions::NormalityChecker;
//! use u_abtest::sample::{Group, Sample};
//!
//! let s = Sample::new(Group::Control, vec![-1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5]).unwrap();
//! let r = NormalityChecker::default().check(&s, 0.05).unwrap();
//! assert!(r.holds());
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{AnalysisConfig, MIN_NORMALITY_OBSERVATIONS};
use crate::error::{validate_alpha, AbTestError, Result};
use crate::sample::{Group, Sample};
use crate::testing::{levene_test, shapiro_wilk_test, LeveneCenter};

/// Largest sample the Shapiro-Wilk p-value approximation is calibrated for.
/// Bigger samples are still tested, with a warning.
pub const NORMALITY_CALIBRATION_LIMIT: usize = 5000;

/// Which assumption a result refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Assumption {
    /// Normality of one group.
    Normality(Group),
    /// Equal variance across both groups.
    VarianceHomogeneity,
}

/// Outcome of one assumption check. Immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssumptionResult {
    assumption: Assumption,
    statistic: f64,
    p_value: f64,
    significance_level: f64,
    holds: bool,
}

impl AssumptionResult {
    /// `holds` is derived as `p_value > significance_level`.
    pub fn new(
        assumption: Assumption,
        statistic: f64,
        p_value: f64,
        significance_level: f64,
    ) -> Self {
        Self {
            assumption,
            statistic,
            p_value,
            significance_level,
            holds: p_value > significance_level,
        }
    }

    /// The same statistic judged against a different alpha.
    pub fn at_significance_level(&self, significance_level: f64) -> Self {
        Self::new(
            self.assumption,
            self.statistic,
            self.p_value,
            significance_level,
        )
    }

    pub fn assumption(&self) -> Assumption {
        self.assumption
    }

    /// W for normality, F for variance homogeneity.
    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    pub fn significance_level(&self) -> f64 {
        self.significance_level
    }

    pub fn holds(&self) -> bool {
        self.holds
    }
}

/// Shapiro-Wilk normality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalityChecker {
    min_observations: usize,
}

impl Default for NormalityChecker {
    fn default() -> Self {
        Self {
            min_observations: MIN_NORMALITY_OBSERVATIONS,
        }
    }
}

impl NormalityChecker {
    /// A checker requiring at least `min_observations` (never fewer than 3).
    pub fn new(min_observations: usize) -> Self {
        Self {
            min_observations: min_observations.max(MIN_NORMALITY_OBSERVATIONS),
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.min_normality_observations)
    }

    pub fn min_observations(&self) -> usize {
        self.min_observations
    }

    /// Tests one sample for normality.
    ///
    /// # Errors
    ///
    /// - `EmptySample` / `InsufficientData` below the minimum size
    /// - `DegenerateSample` when every value is identical
    /// - `InvalidSignificanceLevel` for alpha outside (0, 1)
    ///
    /// Samples above [`NORMALITY_CALIBRATION_LIMIT`] are tested anyway; the
    /// p-value is then an extrapolation and a warning is logged.
    pub fn check(&self, sample: &Sample, significance_level: f64) -> Result<AssumptionResult> {
        validate_alpha(significance_level)?;
        sample.require_len(self.min_observations)?;

        let group = sample.group();
        if sample.is_constant() {
            return Err(AbTestError::DegenerateSample { group });
        }
        if sample.len() > NORMALITY_CALIBRATION_LIMIT {
            warn!(
                %group,
                n = sample.len(),
                limit = NORMALITY_CALIBRATION_LIMIT,
                "Shapiro-Wilk p-value may be inaccurate above the calibrated sample size"
            );
        }

        let r = shapiro_wilk_test(sample.values()).ok_or(AbTestError::NumericalFailure {
            test: "Shapiro-Wilk",
        })?;
        let result = AssumptionResult::new(
            Assumption::Normality(group),
            r.statistic,
            r.p_value,
            significance_level,
        );

        debug!(
            %group,
            n = sample.len(),
            statistic = result.statistic,
            p_value = result.p_value,
            holds = result.holds,
            "normality check"
        );
        Ok(result)
    }
}

/// Levene variance-homogeneity check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VarianceHomogeneityChecker {
    center: LeveneCenter,
}

impl VarianceHomogeneityChecker {
    pub fn new(center: LeveneCenter) -> Self {
        Self { center }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.levene_center)
    }

    pub fn center(&self) -> LeveneCenter {
        self.center
    }

    /// Tests whether two samples share a common variance.
    ///
    /// Has no normality precondition; the selector only consults it when
    /// both groups pass the normality check.
    ///
    /// # Errors
    ///
    /// - `EmptySample` / `InsufficientData` when a sample has fewer than 2
    ///   observations
    /// - `DegenerateSample` when both samples are constant
    /// - `InvalidSignificanceLevel` for alpha outside (0, 1)
    pub fn check(
        &self,
        sample_a: &Sample,
        sample_b: &Sample,
        significance_level: f64,
    ) -> Result<AssumptionResult> {
        validate_alpha(significance_level)?;
        sample_a.require_len(2)?;
        sample_b.require_len(2)?;

        if sample_a.is_constant() && sample_b.is_constant() {
            return Err(AbTestError::DegenerateSample {
                group: sample_a.group(),
            });
        }

        let r = levene_test(&[sample_a.values(), sample_b.values()], self.center)
            .ok_or(AbTestError::NumericalFailure { test: "Levene" })?;
        let result = AssumptionResult::new(
            Assumption::VarianceHomogeneity,
            r.statistic,
            r.p_value,
            significance_level,
        );

        debug!(
            center = ?self.center,
            statistic = result.statistic,
            p_value = result.p_value,
            holds = result.holds,
            "variance homogeneity check"
        );
        Ok(result)
    }
}
