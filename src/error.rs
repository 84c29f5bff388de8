//! Error taxonomy for the A/B analysis pipeline.
//!
//! Every failure is raised at the point of the offending computation and
//! aborts the remainder of the analysis for that metric.

use thiserror::Error;

use crate::sample::Group;

/// Errors raised by sample construction, assumption checks, test execution,
/// and reporting.
#[derive(Debug, Error)]
pub enum AbTestError {
    /// Fewer observations than the check or test requires.
    #[error("{group} sample has {actual} observations, at least {required} required")]
    InsufficientData {
        group: Group,
        required: usize,
        actual: usize,
    },

    /// A sample with zero observations.
    #[error("{group} sample is empty")]
    EmptySample { group: Group },

    /// Zero variance where a variance-based statistic is required.
    #[error("{group} sample has zero variance")]
    DegenerateSample { group: Group },

    /// NaN or infinite observation.
    #[error("{group} sample has non-finite value {value} at index {index}")]
    NonFiniteValue {
        group: Group,
        index: usize,
        value: f64,
    },

    /// Significance level outside the open interval (0, 1).
    #[error("significance level must be in (0, 1), got {0}")]
    InvalidSignificanceLevel(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A data source yielded no observations for one of the groups.
    #[error("no observations labelled {group}")]
    MissingGroup { group: Group },

    /// A kernel produced no result on input that passed validation.
    #[error("{test} could not be computed")]
    NumericalFailure { test: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AbTestError>;

/// Rejects significance levels outside (0, 1).
pub(crate) fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha.is_finite() && alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(AbTestError::InvalidSignificanceLevel(alpha))
    }
}
