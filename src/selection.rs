//! Choosing which two-sample test is valid.
//!
//! | control normal | test normal | equal variance | decision |
//! |---|---|---|---|
//! | no | any | not consulted | Mann-Whitney U |
//! | any | no | not consulted | Mann-Whitney U |
//! | yes | yes | yes | Student t-test (pooled) |
//! | yes | yes | no | Welch t-test |
//!
//! Rows are evaluated top to bottom; the first match wins.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assumptions::AssumptionResult;

/// The hypothesis test chosen for a pair of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestDecision {
    /// Independent two-sample t-test with pooled variance.
    TwoSampleTTestEqualVar,
    /// Welch's t-test.
    TwoSampleTTestUnequalVar,
    /// Rank-based Mann-Whitney U test.
    MannWhitneyU,
}

impl TestDecision {
    /// True for the t-test variants.
    pub fn is_parametric(&self) -> bool {
        !matches!(self, TestDecision::MannWhitneyU)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TestDecision::TwoSampleTTestEqualVar => "Independent two-sample t-test",
            TestDecision::TwoSampleTTestUnequalVar => "Welch's t-test",
            TestDecision::MannWhitneyU => "Mann-Whitney U test",
        }
    }
}

impl fmt::Display for TestDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Applies the decision table.
///
/// `variance_homogeneity` is only read when both normality checks hold.
/// If it is `None` at that point, Welch's test is chosen since it does not
/// assume equal variances.
///
/// # Examples
///
/// ```
/// use u_abtest::assumptions::{Assumption, AssumptionResult};
/// use u_abtest::sample::Group;
/// use u_abtest::selection::{select_test, TestDecision};
///
/// let control = AssumptionResult::new(Assumption::Normality(Group::Control), 0.977, 0.589, 0.05);
/// let test = AssumptionResult::new(Assumption::Normality(Group::Test), 0.959, 0.154, 0.05);
/// let levene = AssumptionResult::new(Assumption::VarianceHomogeneity, 2.639, 0.108, 0.05);
///
/// assert_eq!(
///     select_test(&control, &test, Some(&levene)),
///     TestDecision::TwoSampleTTestEqualVar
/// );
/// ```
pub fn select_test(
    normality_control: &AssumptionResult,
    normality_test: &AssumptionResult,
    variance_homogeneity: Option<&AssumptionResult>,
) -> TestDecision {
    if !normality_control.holds() || !normality_test.holds() {
        return TestDecision::MannWhitneyU;
    }

    match variance_homogeneity {
        Some(v) if v.holds() => TestDecision::TwoSampleTTestEqualVar,
        Some(_) => TestDecision::TwoSampleTTestUnequalVar,
        None => {
            warn!("both groups normal but no variance check supplied; using Welch's t-test");
            TestDecision::TwoSampleTTestUnequalVar
        }
    }
}
