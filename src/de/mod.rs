//! Two-group differential expression on the normalized matrix

mod ttest;

use rayon::prelude::*;
use serde::Serialize;

use crate::data::NormalizedMatrix;
use crate::error::{NCounterError, Result};
use crate::stats;

pub use ttest::{neg_log_p, neg_log_p_threshold, student_t_test};

/// Per-gene differential expression result.
///
/// `fold_change` is mean(treatment log2) - mean(baseline log2);
/// `neg_log_p` is -log10 of the two-sided Student's t p-value, +infinity
/// when p = 0. The downstream plotting collaborator sizes points by
/// `neg_log_p` and labels those above `neg_log_p_threshold(alpha)`.
#[derive(Debug, Clone, Serialize)]
pub struct DeResult {
    pub gene: String,
    pub fold_change: f64,
    pub neg_log_p: f64,
}

/// Compare two annotation groups over a gene list.
///
/// Rows matching neither group label are excluded from both groups. Output
/// order follows `gene_list` exactly; downstream labeling depends on that
/// stability. Each gene's statistic depends only on its own column, so the
/// per-gene work runs in parallel. Results are built in one pass, never
/// accumulated through an intermediate map.
pub fn compare(
    matrix: &NormalizedMatrix,
    gene_list: &[String],
    annotation_column: &str,
    baseline_group: &str,
    treatment_group: &str,
) -> Result<Vec<DeResult>> {
    let baseline_rows = matrix.samples_with_label(annotation_column, baseline_group)?;
    let treatment_rows = matrix.samples_with_label(annotation_column, treatment_group)?;

    if baseline_rows.len() < 2 {
        return Err(NCounterError::InsufficientData {
            group: baseline_group.to_string(),
            n: baseline_rows.len(),
        });
    }
    if treatment_rows.len() < 2 {
        return Err(NCounterError::InsufficientData {
            group: treatment_group.to_string(),
            n: treatment_rows.len(),
        });
    }

    log::debug!(
        "DE: {} vs. baseline {} ({} + {} samples, {} genes)",
        treatment_group,
        baseline_group,
        treatment_rows.len(),
        baseline_rows.len(),
        gene_list.len()
    );

    gene_list
        .par_iter()
        .map(|gene| {
            let column = matrix.gene_column(gene)?;

            // Missing cells (gene not measured in a sample) drop out of the
            // group rather than entering as zeros
            let baseline: Vec<f64> = baseline_rows
                .iter()
                .map(|&i| column[i])
                .filter(|v| !v.is_nan())
                .collect();
            let treatment: Vec<f64> = treatment_rows
                .iter()
                .map(|&i| column[i])
                .filter(|v| !v.is_nan())
                .collect();

            if baseline.len() < 2 {
                return Err(NCounterError::InsufficientData {
                    group: baseline_group.to_string(),
                    n: baseline.len(),
                });
            }
            if treatment.len() < 2 {
                return Err(NCounterError::InsufficientData {
                    group: treatment_group.to_string(),
                    n: treatment.len(),
                });
            }

            let fold_change = stats::mean(&treatment) - stats::mean(&baseline);
            let p = student_t_test(&baseline, &treatment);

            Ok(DeResult {
                gene: gene.clone(),
                fold_change,
                neg_log_p: neg_log_p(p),
            })
        })
        .collect()
}
