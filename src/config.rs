//! Analysis configuration.
//!
//! The significance level is carried explicitly into every checker and the
//! test runner; nothing in the crate reads a global threshold.

use serde::{Deserialize, Serialize};

use crate::error::{validate_alpha, AbTestError, Result};
use crate::testing::LeveneCenter;

/// Default significance level (95% confidence).
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Fewest observations the Shapiro-Wilk procedure accepts.
pub const MIN_NORMALITY_OBSERVATIONS: usize = 3;

/// Settings for one A/B analysis run.
///
/// # Example
/// ```
/// use u_abtest::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.significance_level, 0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Alpha used for both assumption checks and the final test.
    ///
    /// An assumption holds when p > alpha; the null hypothesis of the final
    /// test is rejected when p < alpha.
    pub significance_level: f64,

    /// Minimum sample size for the normality check. Values below 3 are
    /// rejected by [`AnalysisConfig::validate`].
    pub min_normality_observations: usize,

    /// Location Levene deviations are taken from.
    pub levene_center: LeveneCenter,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
            min_normality_observations: MIN_NORMALITY_OBSERVATIONS,
            levene_center: LeveneCenter::Median,
        }
    }
}

impl AnalysisConfig {
    /// 99% confidence.
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            ..Self::default()
        }
    }

    /// 90% confidence.
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10,
            ..Self::default()
        }
    }

    pub fn with_significance_level(mut self, alpha: f64) -> Self {
        self.significance_level = alpha;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_alpha(self.significance_level)?;

        if self.min_normality_observations < MIN_NORMALITY_OBSERVATIONS {
            return Err(AbTestError::InvalidConfig(format!(
                "min_normality_observations must be >= {}, got {}",
                MIN_NORMALITY_OBSERVATIONS, self.min_normality_observations
            )));
        }

        Ok(())
    }
}
