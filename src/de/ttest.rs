//! Two-sample Student's t-test

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::stats;

/// Two-sided p-value of an equal-variance (pooled) two-sample t-test.
///
/// Deliberately the basic Student form, no Welch correction: pooled variance
/// with df = n1 + n2 - 2. Callers guarantee both slices have at least 2
/// values. A pooled variance of exactly zero degenerates: p = 0 when the
/// means differ, p = 1 when they are identical.
pub fn student_t_test(a: &[f64], b: &[f64]) -> f64 {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let mean_diff = stats::mean(a) - stats::mean(b);

    let pooled_var = ((n1 - 1.0) * stats::sample_variance(a)
        + (n2 - 1.0) * stats::sample_variance(b))
        / (n1 + n2 - 2.0);

    if pooled_var == 0.0 {
        return if mean_diff == 0.0 { 1.0 } else { 0.0 };
    }

    let t = mean_diff / (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt();
    if !t.is_finite() {
        return f64::NAN;
    }

    let df = n1 + n2 - 2.0;
    let t_dist = StudentsT::new(0.0, 1.0, df).unwrap();
    2.0 * t_dist.cdf(-t.abs())
}

/// -log10(p). A p-value of 0 is reported as the +infinity sentinel, never
/// clamped to a finite value.
pub fn neg_log_p(p: f64) -> f64 {
    if p == 0.0 {
        f64::INFINITY
    } else {
        -p.log10()
    }
}

/// The -log10 significance threshold for a given p-value cutoff
/// (alpha = 0.05 -> 1.301, the conventional volcano labeling line)
pub fn neg_log_p_threshold(alpha: f64) -> f64 {
    -alpha.log10()
}
