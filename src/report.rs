//! Rendering analysis results.
//!
//! Reporters consume a finished [`AbTestAnalysis`]; the statistical core never
//! formats or prints anything itself.

use std::io::Write;

use crate::assumptions::{Assumption, AssumptionResult};
use crate::error::Result;
use crate::pipeline::AbTestAnalysis;
use crate::runner::HypothesisTestOutcome;
use crate::selection::TestDecision;

/// Consumer of analysis results.
pub trait Reporter {
    fn report(&mut self, analysis: &AbTestAnalysis) -> Result<()>;
}

/// Plain-language recommendation for the decision maker.
///
/// # Examples
///
/// ```
/// use u_abtest::config::AnalysisConfig;
/// use u_abtest::pipeline::analyze;
/// use u_abtest::report::recommendation;
/// use u_abtest::sample::SampleSet;
///
/// let set = SampleSet::new(
///     "Purchase",
///     vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
///     vec![11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0],
/// )
/// .unwrap();
/// let analysis = analyze(&set, &AnalysisConfig::default()).unwrap();
/// assert!(recommendation(&analysis).starts_with("Prefer the test group"));
/// ```
pub fn recommendation(analysis: &AbTestAnalysis) -> String {
    let metric = &analysis.metric;
    if !analysis.outcome.reject_null() {
        return format!(
            "No statistically significant difference in {metric} between the groups; \
             either variant can be used. Compare secondary metrics and keep monitoring both groups."
        );
    }

    let diff = analysis.mean_difference();
    let (winner, direction) = if test_ranks_higher(analysis) {
        ("test", "higher")
    } else {
        ("control", "lower")
    };
    format!(
        "Prefer the {winner} group: the test group's {metric} is significantly {direction} \
         (mean difference {diff:.5})."
    )
}

// Direction of a significant result. The rank test compares U of the control
// group with its null expectation n1·n2/2; the mean difference can be zero or
// even point the other way when the shapes differ.
fn test_ranks_higher(analysis: &AbTestAnalysis) -> bool {
    let outcome = &analysis.outcome;
    match outcome.test_used() {
        TestDecision::MannWhitneyU => {
            let n1 = analysis.control_summary.count as f64;
            let n2 = analysis.test_summary.count as f64;
            outcome.statistic() < n1 * n2 / 2.0
        }
        _ => analysis.mean_difference() > 0.0,
    }
}

fn assumption_label(result: &AssumptionResult) -> String {
    match result.assumption() {
        Assumption::Normality(group) => format!("Normality ({group})"),
        Assumption::VarianceHomogeneity => "Variance homogeneity".to_string(),
    }
}

fn stat_line(statistic: f64, p_value: f64) -> String {
    format!("Test Stat = {statistic:.5}, p-value = {p_value:.5}")
}

fn conclusion(outcome: &HypothesisTestOutcome) -> String {
    let alpha = outcome.significance_level();
    if outcome.reject_null() {
        format!("H0 rejected (p-value < {alpha}): the group means differ significantly.")
    } else {
        format!("H0 cannot be rejected (p-value >= {alpha}): no significant difference detected.")
    }
}

/// Line-oriented human-readable report.
#[derive(Debug)]
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn assumption(&mut self, result: &AssumptionResult) -> Result<()> {
        let verdict = if result.holds() {
            "assumption holds"
        } else {
            "assumption rejected"
        };
        writeln!(
            self.out,
            "{}: {} -> {}",
            assumption_label(result),
            stat_line(result.statistic(), result.p_value()),
            verdict
        )?;
        Ok(())
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn report(&mut self, analysis: &AbTestAnalysis) -> Result<()> {
        writeln!(self.out, "Metric: {}", analysis.metric)?;
        writeln!(
            self.out,
            "Group means: control = {:.5}, test = {:.5}",
            analysis.control_summary.mean, analysis.test_summary.mean
        )?;

        self.assumption(&analysis.normality_control)?;
        self.assumption(&analysis.normality_test)?;
        match &analysis.variance_homogeneity {
            Some(v) => self.assumption(v)?,
            None => writeln!(
                self.out,
                "Variance homogeneity: not checked (normality not satisfied)"
            )?,
        }

        let outcome = &analysis.outcome;
        writeln!(
            self.out,
            "{}: {}",
            outcome.test_used(),
            stat_line(outcome.statistic(), outcome.p_value())
        )?;
        writeln!(self.out, "Conclusion: {}", conclusion(outcome))?;
        writeln!(self.out, "Recommendation: {}", recommendation(analysis))?;
        Ok(())
    }
}

/// Writes the whole analysis as one pretty-printed JSON document.
#[derive(Debug)]
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, analysis: &AbTestAnalysis) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, analysis)?;
        writeln!(self.out)?;
        Ok(())
    }
}
