//! Numeric primitives shared across modules
//!
//! Counts are multiplicative (log-normal-ish), so the geometric mean is the
//! central tendency of choice for control probes and housekeeping genes.
//! Callers are expected to floor zero counts to 1 before calling into these
//! functions; none of them are defined for non-positive inputs where a log
//! is taken.

/// Arithmetic mean. Returns NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divisor n, numpy's default).
///
/// The background threshold is mean + 2 * stddev of the negative controls;
/// the original assay software computes it with the population form.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let var = values.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Sample variance (divisor n - 1). Returns NaN for fewer than 2 values.
pub fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (n - 1) as f64
}

/// Geometric mean via exp(mean(ln(x))). Inputs must be positive.
pub fn geometric_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let log_sum: f64 = values.iter().map(|&x| x.ln()).sum();
    (log_sum / values.len() as f64).exp()
}

/// Median of a slice. Sorts a copy; returns NaN for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}
