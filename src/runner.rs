//! Executing the selected hypothesis test.
//!
//! H₀: no difference in central tendency between the two groups.
//! H₁: a difference exists (two-sided).

use serde::Serialize;
use tracing::debug;

use crate::error::{validate_alpha, AbTestError, Result};
use crate::sample::Sample;
use crate::selection::TestDecision;
use crate::testing::{mann_whitney_u_test, student_t_test, welch_t_test, TestResult};

/// Final artifact of an analysis, consumed by reporters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HypothesisTestOutcome {
    test_used: TestDecision,
    statistic: f64,
    p_value: f64,
    df: Option<f64>,
    significance_level: f64,
    reject_null: bool,
}

impl HypothesisTestOutcome {
    /// `reject_null` is derived as `p_value < significance_level`.
    pub fn new(
        test_used: TestDecision,
        statistic: f64,
        p_value: f64,
        df: Option<f64>,
        significance_level: f64,
    ) -> Self {
        Self {
            test_used,
            statistic,
            p_value,
            df,
            significance_level,
            reject_null: p_value < significance_level,
        }
    }

    pub fn test_used(&self) -> TestDecision {
        self.test_used
    }

    /// t for the t-tests, U of the first sample for Mann-Whitney.
    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    /// Degrees of freedom; `None` for Mann-Whitney.
    pub fn df(&self) -> Option<f64> {
        self.df
    }

    pub fn significance_level(&self) -> f64 {
        self.significance_level
    }

    /// A statistically significant difference was detected.
    pub fn reject_null(&self) -> bool {
        self.reject_null
    }
}

/// Runs `decision` on the two samples.
///
/// # Errors
///
/// - `EmptySample` when either sample is empty
/// - `InsufficientData` when a t-test gets a single observation
/// - `DegenerateSample` when a t-test gets a zero-variance sample (naming
///   that sample's group), or Mann-Whitney gets samples whose pooled values
///   are all tied. The latter is a joint condition (both samples constant at
///   the same value) and is reported against `sample_a`'s group.
/// - `InvalidSignificanceLevel` for alpha outside (0, 1)
///
/// # Examples
///
/// ```
/// use u_abtest::runner::run_test;
/// use u_abtest::sample::SampleSet;
/// use u_abtest::selection::TestDecision;
///
/// let set = SampleSet::new(
///     "Purchase",
///     vec![5.1, 4.9, 5.2, 5.0, 4.8],
///     vec![7.1, 6.9, 7.2, 7.0, 6.8],
/// )
/// .unwrap();
/// let outcome =
///     run_test(set.control(), set.test(), TestDecision::TwoSampleTTestEqualVar, 0.05).unwrap();
/// assert!(outcome.reject_null());
/// assert_eq!(outcome.df(), Some(8.0));
/// ```
pub fn run_test(
    sample_a: &Sample,
    sample_b: &Sample,
    decision: TestDecision,
    significance_level: f64,
) -> Result<HypothesisTestOutcome> {
    validate_alpha(significance_level)?;
    sample_a.require_non_empty()?;
    sample_b.require_non_empty()?;

    let (r, df) = match decision {
        TestDecision::TwoSampleTTestEqualVar => {
            let r = parametric(sample_a, sample_b, student_t_test, "Student t-test")?;
            (r, Some(r.df))
        }
        TestDecision::TwoSampleTTestUnequalVar => {
            let r = parametric(sample_a, sample_b, welch_t_test, "Welch t-test")?;
            (r, Some(r.df))
        }
        TestDecision::MannWhitneyU => {
            // every pooled value tied: no rank information in either group
            let r = mann_whitney_u_test(sample_a.values(), sample_b.values()).ok_or(
                AbTestError::DegenerateSample {
                    group: sample_a.group(),
                },
            )?;
            (r, None)
        }
    };

    let outcome =
        HypothesisTestOutcome::new(decision, r.statistic, r.p_value, df, significance_level);
    debug!(
        test = %decision,
        statistic = outcome.statistic,
        p_value = outcome.p_value,
        reject_null = outcome.reject_null,
        "hypothesis test"
    );
    Ok(outcome)
}

// Shared validation for the t-test variants.
fn parametric(
    sample_a: &Sample,
    sample_b: &Sample,
    kernel: fn(&[f64], &[f64]) -> Option<TestResult>,
    test: &'static str,
) -> Result<TestResult> {
    for s in [sample_a, sample_b] {
        s.require_len(2)?;
        if s.is_constant() {
            return Err(AbTestError::DegenerateSample { group: s.group() });
        }
    }
    kernel(sample_a.values(), sample_b.values()).ok_or(AbTestError::NumericalFailure { test })
}
