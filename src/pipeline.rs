//! End-to-end analysis of one metric.
//!
//! SampleSet → normality (each group) → variance homogeneity (only when
//! both groups are normal) → test selection → hypothesis test.
//!
//! The pipeline is pure: running it twice on the same samples and
//! configuration yields identical results.
//!
//! # Examples
//!
//! ```
//! use u_abtest::config::AnalysisConfig;
//! use u_abtest::pipeline::analyze;
//! use u_abtest::sample::SampleSet;
//! use u_abtest::selection::TestDecision;
//!
//! let set = SampleSet::new(
//!     "Purchase",
//!     vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
//!     vec![1.5, 2.5, 3.5, 4.5, 5.5, 6.5, 7.5, 8.5],
//! )
//! .unwrap();
//! let analysis = analyze(&set, &AnalysisConfig::default()).unwrap();
//! assert_eq!(analysis.decision, TestDecision::TwoSampleTTestEqualVar);
//! assert!(!analysis.outcome.reject_null());
//! ```

use serde::Serialize;
use tracing::info;

use crate::assumptions::{AssumptionResult, NormalityChecker, VarianceHomogeneityChecker};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::runner::{run_test, HypothesisTestOutcome};
use crate::sample::{DataSource, SampleSet};
use crate::selection::{select_test, TestDecision};
use crate::summary::GroupSummary;

/// Every intermediate and final result of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbTestAnalysis {
    pub metric: String,
    pub control_summary: GroupSummary,
    pub test_summary: GroupSummary,
    pub normality_control: AssumptionResult,
    pub normality_test: AssumptionResult,
    /// Present only when both groups passed the normality check.
    pub variance_homogeneity: Option<AssumptionResult>,
    pub decision: TestDecision,
    pub outcome: HypothesisTestOutcome,
}

impl AbTestAnalysis {
    /// Test mean minus control mean.
    pub fn mean_difference(&self) -> f64 {
        self.test_summary.mean - self.control_summary.mean
    }
}

/// Runs the full decision procedure on one metric.
///
/// Any error aborts the analysis; no partial result is returned.
pub fn analyze(samples: &SampleSet, config: &AnalysisConfig) -> Result<AbTestAnalysis> {
    config.validate()?;
    let alpha = config.significance_level;
    let control = samples.control();
    let test = samples.test();

    let control_summary = GroupSummary::compute(control)?;
    let test_summary = GroupSummary::compute(test)?;

    let normality = NormalityChecker::from_config(config);
    let normality_control = normality.check(control, alpha)?;
    let normality_test = normality.check(test, alpha)?;

    let variance_homogeneity = if normality_control.holds() && normality_test.holds() {
        Some(VarianceHomogeneityChecker::from_config(config).check(control, test, alpha)?)
    } else {
        None
    };

    let decision = select_test(
        &normality_control,
        &normality_test,
        variance_homogeneity.as_ref(),
    );
    let outcome = run_test(control, test, decision, alpha)?;

    info!(
        metric = samples.metric(),
        %decision,
        statistic = outcome.statistic(),
        p_value = outcome.p_value(),
        reject_null = outcome.reject_null(),
        "A/B analysis complete"
    );

    Ok(AbTestAnalysis {
        metric: samples.metric().to_string(),
        control_summary,
        test_summary,
        normality_control,
        normality_test,
        variance_homogeneity,
        decision,
        outcome,
    })
}

/// Loads samples from `source` and analyzes them.
pub fn analyze_source<S: DataSource + ?Sized>(
    source: &S,
    config: &AnalysisConfig,
) -> Result<AbTestAnalysis> {
    let samples = source.load()?;
    analyze(&samples, config)
}
