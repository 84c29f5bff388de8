//! Hypothesis-test kernels.
//!
//! Plain numerical routines over `&[f64]`: Shapiro-Wilk normality, Levene
//! variance homogeneity, Student and Welch t-tests, and the Mann-Whitney U
//! test. Each returns `None` when the statistic is undefined for the input;
//! callers that need typed errors validate first (see [`crate::assumptions`]
//! and [`crate::runner`]).
//!
//! # Examples
//!
//! ```
//! use u_abtest::testing::{student_t_test, TestResult};
//!
//! let a = [5.1, 4.9, 5.2, 5.0, 4.8, 5.3, 5.1, 4.9];
//! let b = [5.0, 5.2, 4.8, 5.1, 4.9, 5.0, 5.1, 4.9];
//! let result: TestResult = student_t_test(&a, &b).unwrap();
//! assert!(result.p_value > 0.05); // cannot reject H₀: μ₁ = μ₂
//! ```

use serde::{Deserialize, Serialize};
use u_numflow::special;
use u_numflow::stats;

/// Result of a hypothesis test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    /// Test statistic (t, F, W, or U depending on test).
    pub statistic: f64,
    /// Degrees of freedom (fractional for Welch, numerator df for F, 0 when
    /// not applicable).
    pub df: f64,
    /// p-value.
    pub p_value: f64,
}

fn all_finite(data: &[f64]) -> bool {
    data.iter().all(|v| v.is_finite())
}

// Two-sided p-value from a t statistic.
fn t_two_sided(t: f64, df: f64) -> f64 {
    (2.0 * (1.0 - special::t_distribution_cdf(t.abs(), df))).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// t-tests
// ---------------------------------------------------------------------------

/// Student's two-sample t-test with pooled variance: H₀: μ₁ = μ₂.
///
/// # Algorithm
///
/// s²ₚ = ((n₁-1)s₁² + (n₂-1)s₂²) / (n₁+n₂-2)
/// t = (x̄₁ - x̄₂) / √(s²ₚ (1/n₁ + 1/n₂)), df = n₁+n₂-2.
///
/// # Returns
///
/// `None` if either sample has fewer than 2 observations, non-finite values,
/// or the pooled variance is zero.
///
/// # Examples
///
/// ```
/// use u_abtest::testing::student_t_test;
///
/// let a = [5.1, 4.9, 5.2, 5.0, 4.8];
/// let b = [7.1, 6.9, 7.2, 7.0, 6.8];
/// let r = student_t_test(&a, &b).unwrap();
/// assert_eq!(r.df, 8.0);
/// assert!(r.p_value < 0.01);
/// ```
pub fn student_t_test(a: &[f64], b: &[f64]) -> Option<TestResult> {
    let n1 = a.len();
    let n2 = b.len();
    if n1 < 2 || n2 < 2 || !all_finite(a) || !all_finite(b) {
        return None;
    }

    let mean1 = stats::mean(a)?;
    let mean2 = stats::mean(b)?;
    let var1 = stats::variance(a)?;
    let var2 = stats::variance(b)?;

    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let df = n1f + n2f - 2.0;

    let pooled = ((n1f - 1.0) * var1 + (n2f - 1.0) * var2) / df;
    let se_sq = pooled * (1.0 / n1f + 1.0 / n2f);
    if se_sq < 1e-300 {
        return None;
    }

    let t = (mean1 - mean2) / se_sq.sqrt();

    Some(TestResult {
        statistic: t,
        df,
        p_value: t_two_sided(t, df),
    })
}

/// Welch's two-sample t-test: H₀: μ₁ = μ₂ (unequal variances).
///
/// # Algorithm
///
/// t = (x̄₁ - x̄₂) / √(s₁²/n₁ + s₂²/n₂)
/// df = Welch-Satterthwaite approximation.
///
/// # Returns
///
/// `None` if either sample has fewer than 2 observations, non-finite
/// values, or both variances are zero.
///
/// # References
///
/// Welch (1947). "The generalization of Student's problem when several
/// different population variances are involved". Biometrika, 34, 28–35.
///
/// # Examples
///
/// ```
/// use u_abtest::testing::welch_t_test;
///
/// let a = [5.1, 4.9, 5.2, 5.0, 4.8];
/// let b = [7.0, 3.0, 11.0, 9.0, 5.0];
/// let r = welch_t_test(&a, &b).unwrap();
/// assert!(r.df < 8.0); // Satterthwaite df shrinks toward the noisier group
/// ```
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Option<TestResult> {
    let n1 = a.len();
    let n2 = b.len();
    if n1 < 2 || n2 < 2 || !all_finite(a) || !all_finite(b) {
        return None;
    }

    let mean1 = stats::mean(a)?;
    let mean2 = stats::mean(b)?;
    let var1 = stats::variance(a)?;
    let var2 = stats::variance(b)?;

    let n1f = n1 as f64;
    let n2f = n2 as f64;

    let v1 = var1 / n1f;
    let v2 = var2 / n2f;
    let se_sq = v1 + v2;
    if se_sq < 1e-300 {
        return None;
    }

    let t = (mean1 - mean2) / se_sq.sqrt();
    let df = se_sq.powi(2) / (v1 * v1 / (n1f - 1.0) + v2 * v2 / (n2f - 1.0));

    Some(TestResult {
        statistic: t,
        df,
        p_value: t_two_sided(t, df),
    })
}

// ---------------------------------------------------------------------------
// Variance homogeneity
// ---------------------------------------------------------------------------

/// Location each group's absolute deviations are measured from in Levene's
/// test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeveneCenter {
    /// Brown-Forsythe variant; robust to skewed data.
    #[default]
    Median,
    /// Levene's original formulation.
    Mean,
}

// One-way ANOVA F-test. `df` in the result is the between-groups df.
fn anova_f_test(groups: &[&[f64]]) -> Option<TestResult> {
    let k = groups.len();
    if k < 2 || groups.iter().any(|g| g.len() < 2) {
        return None;
    }

    let total_n: usize = groups.iter().map(|g| g.len()).sum();
    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / total_n as f64;

    let group_means: Vec<f64> = groups
        .iter()
        .map(|g| g.iter().sum::<f64>() / g.len() as f64)
        .collect();

    let ss_between: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(g, &gm)| g.len() as f64 * (gm - grand_mean).powi(2))
        .sum();
    let ss_within: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(g, &gm)| g.iter().map(|&x| (x - gm).powi(2)).sum::<f64>())
        .sum();

    let df_between = (k - 1) as f64;
    let df_within = (total_n - k) as f64;

    let ms_between = ss_between / df_between;
    let ms_within = ss_within / df_within;

    if ms_within < 1e-300 {
        if ms_between < 1e-300 {
            // every group is the same constant: no evidence of a difference
            return Some(TestResult {
                statistic: 0.0,
                df: df_between,
                p_value: 1.0,
            });
        }
        return Some(TestResult {
            statistic: f64::INFINITY,
            df: df_between,
            p_value: 0.0,
        });
    }

    let f = ms_between / ms_within;
    let p_value = 1.0 - special::f_distribution_cdf(f, df_between, df_within);

    Some(TestResult {
        statistic: f,
        df: df_between,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

/// Levene test for equality of variances: H₀: all groups have equal variance.
///
/// # Algorithm
///
/// 1. zᵢⱼ = |xᵢⱼ - cᵢ| where cᵢ is the group median or mean
/// 2. One-way ANOVA F-test on the zᵢⱼ
///
/// # Returns
///
/// `None` if fewer than 2 groups, any group has fewer than 2 observations,
/// or non-finite values. When every group has the same absolute deviations
/// (including all-zero deviations) F = 0 and p = 1.
///
/// # References
///
/// - Levene (1960). "Robust tests for equality of variances". In
///   Olkin (Ed.), Contributions to Probability and Statistics.
/// - Brown & Forsythe (1974). "Robust tests for the equality of variances".
///   JASA, 69(346), 364–367.
///
/// # Examples
///
/// ```
/// use u_abtest::testing::{levene_test, LeveneCenter};
///
/// let g1 = [4.9, 5.0, 5.0, 5.1, 5.0]; // tight cluster
/// let g2 = [0.0, 3.0, 5.0, 7.0, 10.0]; // wide spread
/// let r = levene_test(&[&g1, &g2], LeveneCenter::Median).unwrap();
/// assert!(r.p_value < 0.05);
/// ```
pub fn levene_test(groups: &[&[f64]], center: LeveneCenter) -> Option<TestResult> {
    if groups.len() < 2 || groups.iter().any(|g| g.len() < 2 || !all_finite(g)) {
        return None;
    }

    let mut deviations: Vec<Vec<f64>> = Vec::with_capacity(groups.len());
    for g in groups {
        let c = match center {
            LeveneCenter::Median => stats::median(g)?,
            LeveneCenter::Mean => stats::mean(g)?,
        };
        deviations.push(g.iter().map(|&x| (x - c).abs()).collect());
    }

    let refs: Vec<&[f64]> = deviations.iter().map(Vec::as_slice).collect();
    anova_f_test(&refs)
}

// ---------------------------------------------------------------------------
// Shapiro-Wilk
// ---------------------------------------------------------------------------

/// Shapiro-Wilk normality test: H₀: data is normally distributed.
///
/// `statistic` is W (0 < W ≤ 1); `df` is unused and set to 0.
///
/// # Algorithm
///
/// Royston (1992, 1995), algorithm AS R94:
/// 1. Coefficients from Blom-approximated normal order statistics
/// 2. W = (Σ aᵢ x₍ᵢ₎)² / Σ (xᵢ - x̄)²
/// 3. Normalising transform of W to z, p-value from the upper normal tail
///
/// # Returns
///
/// `None` if n < 3, all values identical, or non-finite values.
///
/// The normalising transform is calibrated for 3 ≤ n ≤ 5000. Larger samples
/// are still computed with the same transform; W remains exact but the
/// p-value is an extrapolation.
///
/// # References
///
/// - Shapiro & Wilk (1965). "An analysis of variance test for normality".
///   Biometrika, 52(3–4), 591–611.
/// - Royston (1995). "Remark AS R94: A remark on Algorithm AS 181".
///   Applied Statistics, 44(4), 547–551.
///
/// # Examples
///
/// ```
/// use u_abtest::testing::shapiro_wilk_test;
///
/// let data = [-1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5];
/// let r = shapiro_wilk_test(&data).unwrap();
/// assert!(r.statistic > 0.9);
/// assert!(r.p_value > 0.05);
/// ```
pub fn shapiro_wilk_test(data: &[f64]) -> Option<TestResult> {
    let n = data.len();
    if n < 3 || !all_finite(data) {
        return None;
    }

    let mut x = data.to_vec();
    x.sort_by(f64::total_cmp);

    if x[n - 1] - x[0] < 1e-300 {
        return None;
    }

    let (w, p_value) = if n == 3 {
        sw_exact_n3(&x)?
    } else {
        let a = sw_coefficients(n)?;
        let w = sw_statistic(&x, &a);
        if !(0.0..=1.0 + 1e-10).contains(&w) {
            return None;
        }
        let w = w.min(1.0);
        (w, sw_p_value(w, n))
    };

    Some(TestResult {
        statistic: w,
        df: 0.0,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

// n = 3: a = [√½, 0, -√½] and p = 1 - (6/π) arccos(√W).
fn sw_exact_n3(x: &[f64]) -> Option<(f64, f64)> {
    let mean = x.iter().sum::<f64>() / 3.0;
    let ss: f64 = x.iter().map(|&v| (v - mean).powi(2)).sum();
    if ss < 1e-300 {
        return None;
    }

    let num = std::f64::consts::FRAC_1_SQRT_2 * (x[2] - x[0]);
    let w = (num * num / ss).clamp(0.75, 1.0);
    let p = 1.0 - (6.0 / std::f64::consts::PI) * w.sqrt().acos();
    Some((w, p))
}

// Royston polynomial coefficients (AS R94)
const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SW_C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const SW_C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const SW_G: [f64; 2] = [-2.273, 0.459];

// c[0] + c[1]x + c[2]x² + ... by Horner's rule
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

// First half of the antisymmetric coefficient vector, a[0] pairs with x₍ₙ₎.
fn sw_coefficients(n: usize) -> Option<Vec<f64>> {
    let half = n / 2;
    let nf = n as f64;

    // Blom: m[i] = Φ⁻¹((i+1 - 3/8) / (n + 1/4)), negative for the lower half
    let m: Vec<f64> = (0..half)
        .map(|i| special::inverse_normal_cdf((i as f64 + 1.0 - 0.375) / (nf + 0.25)))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / nf.sqrt();

    let a1 = poly(&SW_C1, rsn) - m[0] / ssumm2;

    // Leading coefficients get a polynomial correction; the rest are rescaled.
    let corrected = if n > 5 { 2 } else { 1 };
    let mut lead = vec![a1];
    if corrected == 2 {
        lead.push(-m[1] / ssumm2 + poly(&SW_C2, rsn));
    }

    let fac_sq = summ2 - 2.0 * m[..corrected].iter().map(|v| v * v).sum::<f64>();
    let one_minus = 1.0 - 2.0 * lead.iter().map(|v| v * v).sum::<f64>();
    if fac_sq <= 0.0 || one_minus <= 0.0 {
        return None;
    }
    let fac = (fac_sq / one_minus).sqrt();

    let mut a = lead;
    a.extend(m[corrected..].iter().map(|&mi| -mi / fac));
    Some(a)
}

fn sw_statistic(x: &[f64], a: &[f64]) -> f64 {
    let n = x.len();
    let sa: f64 = a
        .iter()
        .enumerate()
        .map(|(i, &ai)| ai * (x[n - 1 - i] - x[i]))
        .sum();

    let mean = x.iter().sum::<f64>() / n as f64;
    let ss: f64 = x.iter().map(|&v| (v - mean).powi(2)).sum();
    if ss < 1e-300 {
        return 1.0;
    }

    sa * sa / ss
}

fn sw_p_value(w: f64, n: usize) -> f64 {
    let nf = n as f64;
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();

    let (z_input, m, s) = if n <= 11 {
        let gamma = poly(&SW_G, nf);
        if y >= gamma {
            return 0.0;
        }
        (-(gamma - y).ln(), poly(&SW_C3, nf), poly(&SW_C4, nf).exp())
    } else {
        let ln_n = nf.ln();
        (y, poly(&SW_C5, ln_n), poly(&SW_C6, ln_n).exp())
    };

    if s < 1e-300 {
        return 0.0;
    }
    1.0 - special::standard_normal_cdf((z_input - m) / s)
}

// ---------------------------------------------------------------------------
// Mann-Whitney U
// ---------------------------------------------------------------------------

/// Mann-Whitney U test: H₀: both samples come from the same distribution.
///
/// Two-sided, normal approximation with tie correction. `statistic` is U for
/// the first sample; `df` is 0.
///
/// # Algorithm
///
/// 1. Pool and rank all observations (average ranks for ties)
/// 2. U₁ = R₁ - n₁(n₁+1)/2
/// 3. z = (U₁ - n₁n₂/2) / σ with σ² = n₁n₂/12 · (N+1 - Σ(t³-t) / (N(N-1)))
///
/// # Returns
///
/// `None` if either sample is empty, non-finite values, or every pooled
/// value is tied.
///
/// # References
///
/// Mann & Whitney (1947). "On a test of whether one of two random variables
/// is stochastically larger than the other". Annals of Mathematical
/// Statistics, 18(1), 50–60.
///
/// # Examples
///
/// ```
/// use u_abtest::testing::mann_whitney_u_test;
///
/// let a = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let b = [6.0, 7.0, 8.0, 9.0, 10.0];
/// let r = mann_whitney_u_test(&a, &b).unwrap();
/// assert_eq!(r.statistic, 0.0);
/// assert!(r.p_value < 0.05);
/// ```
pub fn mann_whitney_u_test(a: &[f64], b: &[f64]) -> Option<TestResult> {
    let n1 = a.len();
    let n2 = b.len();
    if n1 == 0 || n2 == 0 || !all_finite(a) || !all_finite(b) {
        return None;
    }

    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let nf = (n1 + n2) as f64;

    // (value, 0 = first sample / 1 = second sample)
    let mut pooled: Vec<(f64, usize)> = a
        .iter()
        .map(|&v| (v, 0))
        .chain(b.iter().map(|&v| (v, 1)))
        .collect();
    pooled.sort_by(|x, y| x.0.total_cmp(&y.0));

    let ranks = average_ranks(&pooled);
    let r1: f64 = pooled
        .iter()
        .zip(&ranks)
        .filter(|((_, g), _)| *g == 0)
        .map(|(_, &r)| r)
        .sum();
    let u1 = r1 - n1f * (n1f + 1.0) / 2.0;

    let ties = tie_correction(&pooled);
    let mu = n1f * n2f / 2.0;
    let sigma_sq = if nf > 1.0 {
        n1f * n2f / 12.0 * (nf + 1.0 - ties / (nf * (nf - 1.0)))
    } else {
        0.0
    };
    if sigma_sq <= 1e-12 {
        return None;
    }

    let z = (u1 - mu) / sigma_sq.sqrt();
    let p_value = 2.0 * (1.0 - special::standard_normal_cdf(z.abs()));

    Some(TestResult {
        statistic: u1,
        df: 0.0,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

// Runs of equal values in sorted data, as half-open index ranges.
fn tie_runs(sorted: &[(f64, usize)]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && (sorted[j].0 - sorted[i].0).abs() < 1e-12 {
            j += 1;
        }
        runs.push((i, j));
        i = j;
    }
    runs
}

// 1-based ranks; tied positions share the average of their ranks.
fn average_ranks(sorted: &[(f64, usize)]) -> Vec<f64> {
    let mut ranks = vec![0.0; sorted.len()];
    for (i, j) in tie_runs(sorted) {
        let avg = (i + 1 + j) as f64 / 2.0;
        ranks[i..j].iter_mut().for_each(|r| *r = avg);
    }
    ranks
}

// Σ t(t² - 1) over tie groups
fn tie_correction(sorted: &[(f64, usize)]) -> f64 {
    tie_runs(sorted)
        .into_iter()
        .map(|(i, j)| {
            let t = (j - i) as f64;
            t * (t * t - 1.0)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Student t-test
    // -----------------------------------------------------------------------

    #[test]
    fn student_same_mean() {
        let a = [5.0, 5.1, 4.9, 5.0, 5.1, 4.9, 5.0, 5.0];
        let b = [5.0, 5.2, 4.8, 5.1, 4.9, 5.0, 5.1, 4.9];
        let r = student_t_test(&a, &b).expect("should compute");
        assert!(r.p_value > 0.3, "p = {}", r.p_value);
        assert_eq!(r.df, 14.0);
    }

    #[test]
    fn student_known_value() {
        // means 2 and 4, both variances 1, n = 3: sp² = 1, se = √(2/3)
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 4.0, 5.0];
        let r = student_t_test(&a, &b).expect("should compute");
        let expected = -2.0 / (2.0_f64 / 3.0).sqrt();
        assert!((r.statistic - expected).abs() < 1e-10, "t = {}", r.statistic);
        assert_eq!(r.df, 4.0);
        // two-sided tail of t(4) at 2.449
        assert!((r.p_value - 0.0705).abs() < 0.002, "p = {}", r.p_value);
    }

    #[test]
    fn student_equals_welch_for_balanced_equal_variance() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 3.0, 4.0, 5.0];
        let s = student_t_test(&a, &b).expect("student");
        let w = welch_t_test(&a, &b).expect("welch");
        assert!((s.statistic - w.statistic).abs() < 1e-12);
        assert!((s.df - w.df).abs() < 1e-9);
    }

    #[test]
    fn student_edge_cases() {
        assert!(student_t_test(&[1.0], &[2.0, 3.0]).is_none());
        assert!(student_t_test(&[5.0, 5.0], &[5.0, 5.0]).is_none()); // zero pooled var
        assert!(student_t_test(&[1.0, f64::NAN], &[2.0, 3.0]).is_none());
    }

    // -----------------------------------------------------------------------
    // Welch t-test
    // -----------------------------------------------------------------------

    #[test]
    fn welch_different_means() {
        let a = [1.0, 2.0, 3.0, 2.0, 1.5, 2.5];
        let b = [10.0, 11.0, 12.0, 10.5, 11.5, 10.5];
        let r = welch_t_test(&a, &b).expect("should compute");
        assert!(r.p_value < 0.001, "p = {}", r.p_value);
        assert!(r.statistic < 0.0);
    }

    #[test]
    fn welch_df_between_min_and_pooled() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
        let r = welch_t_test(&a, &b).expect("should compute");
        assert!(r.df >= 4.0 && r.df <= 10.0, "df = {}", r.df);
    }

    #[test]
    fn welch_edge_cases() {
        assert!(welch_t_test(&[1.0, 2.0], &[3.0]).is_none());
        assert!(welch_t_test(&[2.0, 2.0], &[3.0, 3.0]).is_none());
    }

    // -----------------------------------------------------------------------
    // Levene
    // -----------------------------------------------------------------------

    #[test]
    fn levene_equal_variance() {
        let g1 = [1.0, 2.0, 3.0, 4.0, 5.0];
        let g2 = [6.0, 7.0, 8.0, 9.0, 10.0];
        let r = levene_test(&[&g1, &g2], LeveneCenter::Median).expect("should compute");
        // identical spread → identical deviations → F = 0
        assert!(r.statistic.abs() < 1e-12, "F = {}", r.statistic);
        assert!(r.p_value > 0.99, "p = {}", r.p_value);
    }

    #[test]
    fn levene_unequal_variance() {
        let g1 = [4.5, 4.8, 5.0, 5.2, 5.5];
        let g2 = [0.0, 2.0, 5.0, 8.0, 10.0];
        for center in [LeveneCenter::Median, LeveneCenter::Mean] {
            let r = levene_test(&[&g1, &g2], center).expect("should compute");
            assert!(r.p_value < 0.05, "{center:?}: p = {}", r.p_value);
            assert_eq!(r.df, 1.0);
        }
    }

    #[test]
    fn levene_center_matters_for_skewed_groups() {
        let g1 = [1.0, 1.0, 1.0, 2.0, 10.0];
        let g2 = [1.0, 2.0, 3.0, 4.0, 5.0];
        let med = levene_test(&[&g1, &g2], LeveneCenter::Median).expect("median");
        let mean = levene_test(&[&g1, &g2], LeveneCenter::Mean).expect("mean");
        assert!((med.statistic - mean.statistic).abs() > 1e-6);
    }

    #[test]
    fn levene_one_constant_group() {
        let g1 = [3.0, 3.0, 3.0, 3.0];
        let g2 = [1.0, 2.0, 4.0, 8.0];
        let r = levene_test(&[&g1, &g2], LeveneCenter::Median).expect("should compute");
        assert!(r.p_value < 0.5);
    }

    #[test]
    fn levene_edge_cases() {
        let g = [1.0, 2.0, 3.0];
        assert!(levene_test(&[&g], LeveneCenter::Median).is_none()); // < 2 groups
        let single = [1.0];
        assert!(levene_test(&[&g[..], &single[..]], LeveneCenter::Median).is_none());
    }

    #[test]
    fn levene_identical_deviations() {
        // same spread around different centres: every deviation is 1
        let g1 = [0.0, 0.0, 2.0, 2.0];
        let g2 = [5.0, 5.0, 7.0, 7.0];
        for center in [LeveneCenter::Median, LeveneCenter::Mean] {
            let r = levene_test(&[&g1, &g2], center).expect("should compute");
            assert_eq!(r.statistic, 0.0, "{center:?}");
            assert_eq!(r.p_value, 1.0, "{center:?}");
            assert_eq!(r.df, 1.0);
        }

        let c = [2.0, 2.0, 2.0];
        let r = levene_test(&[&c, &c], LeveneCenter::Median).expect("all deviations zero");
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn levene_reference_value() {
        // medians 3 and 6; deviations [2,1,0,1,2] and [4,2,0,2,14]
        // SSB = 25.6, SSW = 126, F = 25.6 / (126 / 8)
        let g1 = [1.0, 2.0, 3.0, 4.0, 5.0];
        let g2 = [2.0, 4.0, 6.0, 8.0, 20.0];
        let r = levene_test(&[&g1, &g2], LeveneCenter::Median).expect("should compute");
        assert!((r.statistic - 1.625_397).abs() < 1e-5, "F = {}", r.statistic);
        assert_eq!(r.df, 1.0);
        // F(1, 8) upper tail
        assert!((r.p_value - 0.23812).abs() < 1e-3, "p = {}", r.p_value);
    }

    // -----------------------------------------------------------------------
    // Shapiro-Wilk
    // -----------------------------------------------------------------------

    #[test]
    fn sw_normal_data() {
        let data = [-2.0, -1.5, -1.0, -0.5, 0.0, 0.0, 0.5, 1.0, 1.5, 2.0];
        let r = shapiro_wilk_test(&data).expect("should compute");
        assert!(r.statistic > 0.9, "W = {}", r.statistic);
        assert!(r.p_value > 0.05, "p = {}", r.p_value);
    }

    #[test]
    fn sw_bimodal_data() {
        let mut data = vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5];
        data.extend_from_slice(&[9.5, 9.6, 9.7, 9.8, 9.9, 10.0]);
        let r = shapiro_wilk_test(&data).expect("should compute");
        assert!(r.p_value < 0.01, "p = {} (bimodal)", r.p_value);
    }

    #[test]
    fn sw_skewed_data() {
        let data = [0.1, 0.2, 0.3, 0.5, 0.8, 1.3, 2.1, 3.4, 5.5, 8.9, 14.4, 23.3];
        let r = shapiro_wilk_test(&data).expect("should compute");
        assert!(r.p_value < 0.05, "p = {} (skewed)", r.p_value);
    }

    #[test]
    fn sw_small_n() {
        for data in [
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0, 3.0, 4.0],
            vec![-1.0, -0.5, 0.0, 0.5, 1.0],
        ] {
            let r = shapiro_wilk_test(&data).expect("small n should work");
            assert!(r.statistic > 0.0 && r.statistic <= 1.0, "W = {}", r.statistic);
            assert!((0.0..=1.0).contains(&r.p_value), "p = {}", r.p_value);
        }
    }

    #[test]
    fn sw_n3_equally_spaced_is_perfect() {
        let r = shapiro_wilk_test(&[1.0, 2.0, 3.0]).expect("n=3");
        assert!((r.statistic - 1.0).abs() < 1e-12);
        assert!((r.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sw_large_normal_sample() {
        let n = 100;
        let data: Vec<f64> = (1..=n)
            .map(|i| special::inverse_normal_cdf((i as f64 - 0.5) / n as f64))
            .collect();
        let r = shapiro_wilk_test(&data).expect("should compute");
        assert!(r.statistic > 0.99, "W = {}", r.statistic);
        assert!(r.p_value > 0.05, "p = {}", r.p_value);
    }

    #[test]
    fn sw_order_independent() {
        let data = [3.1, 0.4, 2.2, 5.9, 1.7, 4.4, 2.8, 3.3];
        let mut reversed = data;
        reversed.reverse();
        let r1 = shapiro_wilk_test(&data).expect("compute");
        let r2 = shapiro_wilk_test(&reversed).expect("compute");
        assert_eq!(r1, r2);
    }

    #[test]
    fn sw_edge_cases() {
        assert!(shapiro_wilk_test(&[1.0, 2.0]).is_none());
        assert!(shapiro_wilk_test(&[]).is_none());
        assert!(shapiro_wilk_test(&[5.0, 5.0, 5.0]).is_none());
        assert!(shapiro_wilk_test(&[1.0, f64::NAN, 3.0]).is_none());
    }

    #[test]
    fn sw_reference_value() {
        // R: shapiro.test(1:10) → W = 0.97016, p-value = 0.8924
        let data: Vec<f64> = (1..=10).map(f64::from).collect();
        let r = shapiro_wilk_test(&data).expect("should compute");
        assert!((r.statistic - 0.97016).abs() < 5e-5, "W = {}", r.statistic);
        assert!((r.p_value - 0.8924).abs() < 5e-4, "p = {}", r.p_value);
    }

    #[test]
    fn sw_beyond_5000_observations() {
        let n = 6000;
        let data: Vec<f64> = (1..=n)
            .map(|i| special::inverse_normal_cdf((i as f64 - 0.375) / (n as f64 + 0.25)))
            .collect();
        let r = shapiro_wilk_test(&data).expect("large n should compute");
        assert!(r.statistic > 0.999, "W = {}", r.statistic);
        assert!(r.p_value > 0.05, "p = {}", r.p_value);

        let skewed: Vec<f64> = (1..=n)
            .map(|i| -(1.0 - (i as f64 - 0.5) / n as f64).ln())
            .collect();
        let r = shapiro_wilk_test(&skewed).expect("large n should compute");
        assert!(r.p_value < 0.001, "p = {}", r.p_value);
    }

    // -----------------------------------------------------------------------
    // Mann-Whitney U
    // -----------------------------------------------------------------------

    #[test]
    fn mw_clearly_different() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [6.0, 7.0, 8.0, 9.0, 10.0];
        let r = mann_whitney_u_test(&a, &b).expect("should compute");
        assert_eq!(r.statistic, 0.0);
        assert!(r.p_value < 0.05, "p = {}", r.p_value);

        let flipped = mann_whitney_u_test(&b, &a).expect("should compute");
        assert_eq!(flipped.statistic, 25.0);
        assert!((flipped.p_value - r.p_value).abs() < 1e-12);
    }

    #[test]
    fn mw_reference_value() {
        // U = 0, μ = 12.5, σ² = 25/12 · 11, z = -2.61116
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [6.0, 7.0, 8.0, 9.0, 10.0];
        let r = mann_whitney_u_test(&a, &b).expect("should compute");
        assert!((r.p_value - 0.009_023).abs() < 1e-5, "p = {}", r.p_value);
    }

    #[test]
    fn mw_interleaved() {
        let a = [1.0, 3.0, 5.0, 7.0, 9.0, 11.0, 13.0, 15.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0];
        let r = mann_whitney_u_test(&a, &b).expect("should compute");
        assert!(r.p_value > 0.3, "p = {}", r.p_value);
    }

    #[test]
    fn mw_with_ties() {
        let a = [1.0, 2.0, 2.0, 3.0, 3.0];
        let b = [3.0, 4.0, 4.0, 5.0, 5.0];
        let r = mann_whitney_u_test(&a, &b).expect("should compute");
        // R₁ = 16, U = 1; Σ(t³-t) = 42, σ² = 25/12 · (11 - 42/90)
        assert_eq!(r.statistic, 1.0);
        assert!((r.p_value - 0.014_092).abs() < 1e-5, "p = {}", r.p_value);
    }

    #[test]
    fn mw_edge_cases() {
        assert!(mann_whitney_u_test(&[], &[2.0, 3.0]).is_none());
        assert!(mann_whitney_u_test(&[1.0, f64::NAN], &[2.0, 3.0]).is_none());
        assert!(mann_whitney_u_test(&[4.0, 4.0], &[4.0, 4.0, 4.0]).is_none()); // all tied
    }

    #[test]
    fn ranks_average_ties() {
        let sorted = [(1.0, 0), (2.0, 1), (2.0, 0), (2.0, 1), (5.0, 0)];
        assert_eq!(average_ranks(&sorted), vec![1.0, 3.0, 3.0, 3.0, 5.0]);
        // one tie group of 3: 3·(9-1) = 24
        assert_eq!(tie_correction(&sorted), 24.0);
    }

    #[test]
    fn poly_horner() {
        // 1 + 2x + 3x² at x = 2
        assert_eq!(poly(&[1.0, 2.0, 3.0], 2.0), 17.0);
    }
}
