//! Control-probe quality control
//!
//! QC is advisory: flagged samples still pass through normalization, the
//! flags just ride along for reporting. Nothing here can abort a run except
//! a table with no control probes at all.

mod titration;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::{CodeClass, RawCountTable};
use crate::error::{NCounterError, Result};
use crate::stats;

pub use titration::{TitrationSeries, TitrationStep};

/// Run-level control-probe diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ControlDiagnostics {
    /// Geometric mean of all positive-control counts (zero-floored)
    pub positive_geomean: f64,
    /// mean + 2 * stddev of negative-control counts, natural scale
    pub negative_background: f64,
    /// The background threshold in log2 space, for comparison against
    /// log2 gene counts
    pub log2_background: f64,
}

/// Advisory per-sample QC flags
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QcFlags {
    /// Median endogenous log2 count does not exceed the log2 background:
    /// the sample's signal is indistinguishable from noise
    pub below_background: bool,
    /// Positive-control response does not decrease along the titration
    /// series, so the assay's dose response cannot be trusted for this sample
    pub non_monotonic_titration: bool,
}

impl QcFlags {
    pub fn flagged(&self) -> bool {
        self.below_background || self.non_monotonic_titration
    }
}

/// Compute run-level diagnostics from the positive/negative control probes.
///
/// Zero counts are floored to 1 before every statistic, including the
/// background mean/stddev; the standard deviation is the population form.
pub fn evaluate(table: &RawCountTable) -> Result<ControlDiagnostics> {
    let positive: Vec<f64> = table
        .by_code_class(&CodeClass::Positive)
        .map(|r| r.floored_count())
        .collect();
    let negative: Vec<f64> = table
        .by_code_class(&CodeClass::Negative)
        .map(|r| r.floored_count())
        .collect();

    if positive.is_empty() || negative.is_empty() {
        return Err(NCounterError::EmptyData {
            reason: "run has no positive/negative control probes".to_string(),
        });
    }

    let positive_geomean = stats::geometric_mean(&positive);
    let negative_background =
        stats::mean(&negative) + 2.0 * stats::population_std(&negative);
    let log2_background = negative_background.log2();

    log::info!(
        "POS control geomean {:.2}, NEG control background {:.2} (log2 {:.2})",
        positive_geomean,
        negative_background,
        log2_background
    );

    Ok(ControlDiagnostics {
        positive_geomean,
        negative_background,
        log2_background,
    })
}

/// Flag each sample against the run diagnostics and the titration series.
pub fn per_sample_flags(
    table: &RawCountTable,
    diagnostics: &ControlDiagnostics,
    series: &TitrationSeries,
) -> BTreeMap<String, QcFlags> {
    let mut flags = BTreeMap::new();

    for sample_id in table.sample_ids() {
        let below_background = is_below_background(table, sample_id, diagnostics);
        let non_monotonic_titration = is_non_monotonic(table, sample_id, series);

        if below_background {
            log::warn!(
                "Sample {}: median endogenous signal is below the background threshold",
                sample_id
            );
        }
        if non_monotonic_titration {
            log::warn!("Sample {}: positive-control titration response is non-monotonic", sample_id);
        }

        flags.insert(
            sample_id.clone(),
            QcFlags {
                below_background,
                non_monotonic_titration,
            },
        );
    }

    flags
}

fn is_below_background(
    table: &RawCountTable,
    sample_id: &str,
    diagnostics: &ControlDiagnostics,
) -> bool {
    let log2_counts: Vec<f64> = table
        .sample_records(sample_id)
        .filter(|r| r.code_class == CodeClass::Endogenous)
        .map(|r| r.floored_count().log2())
        .collect();

    if log2_counts.is_empty() {
        // No endogenous signal at all reads as background
        return true;
    }
    stats::median(&log2_counts) <= diagnostics.log2_background
}

/// Check the sample's positive probes against the titration order: counts
/// must be non-increasing as concentration decreases. Missing steps are
/// skipped; fewer than two observed steps cannot be judged and pass.
fn is_non_monotonic(table: &RawCountTable, sample_id: &str, series: &TitrationSeries) -> bool {
    let mut by_step: Vec<Option<f64>> = vec![None; series.steps().len()];
    for record in table
        .sample_records(sample_id)
        .filter(|r| r.code_class == CodeClass::Positive)
    {
        if let Some(pos) = series.position(&record.gene) {
            by_step[pos] = Some(record.floored_count());
        }
    }

    let observed: Vec<f64> = by_step.into_iter().flatten().collect();
    observed.windows(2).any(|w| w[1] > w[0])
}
