//! Housekeeping-gene normalization and log2 transform
//!
//! Each sample's endogenous and housekeeping counts are scaled by the ratio
//! of that sample's housekeeping geometric mean to the run-wide average of
//! those geometric means, then log2-transformed. By construction the mean
//! normalization factor across a run is 1; values far from 1 indicate
//! unequal RNA loading.

use std::collections::{BTreeSet, HashMap};

use ndarray::Array2;
use serde::Serialize;

use crate::data::{CodeClass, NormalizedMatrix, RawCountTable};
use crate::error::{NCounterError, Result};
use crate::stats;

/// Per-sample housekeeping normalization factor
#[derive(Debug, Clone, Serialize)]
pub struct NormalizationFactor {
    pub sample_id: String,
    /// Geometric mean of this sample's housekeeping counts (zero-floored)
    pub hk_geomean: f64,
    /// hk_geomean / mean(hk_geomean over all samples in the run)
    pub norm_factor: f64,
}

/// Normalize a raw count table into a log2 expression matrix.
///
/// Only Endogenous and Housekeeping probes participate; zero counts are
/// floored to 1 before scaling so log2(0) can never appear in the matrix.
/// Genes absent from a sample stay missing (NaN), they are not imputed.
/// A sample with no housekeeping probes is a fatal configuration error.
pub fn normalize(
    table: &RawCountTable,
) -> Result<(NormalizedMatrix, Vec<NormalizationFactor>)> {
    let sample_ids: Vec<String> = table.sample_ids().to_vec();
    if sample_ids.is_empty() {
        return Err(NCounterError::EmptyData {
            reason: "raw count table has no samples".to_string(),
        });
    }

    // Floored counts per (sample, gene), restricted to analysis probes
    let mut counts: HashMap<(&str, &str), f64> = HashMap::new();
    let mut gene_set: BTreeSet<&str> = BTreeSet::new();
    let mut hk_counts: HashMap<&str, Vec<f64>> = HashMap::new();

    for record in table.records() {
        let is_hk = record.code_class == CodeClass::Housekeeping;
        if !is_hk && record.code_class != CodeClass::Endogenous {
            continue;
        }
        let floored = record.floored_count();
        counts.insert((record.sample_id.as_str(), record.gene.as_str()), floored);
        gene_set.insert(record.gene.as_str());
        if is_hk {
            hk_counts
                .entry(record.sample_id.as_str())
                .or_default()
                .push(floored);
        }
    }

    // Per-sample housekeeping geometric means; no housekeeping probes is fatal
    let mut hk_geomeans: Vec<f64> = Vec::with_capacity(sample_ids.len());
    for sample_id in &sample_ids {
        let hk = hk_counts
            .get(sample_id.as_str())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| NCounterError::Normalization {
                sample_id: sample_id.clone(),
            })?;
        hk_geomeans.push(stats::geometric_mean(hk));
    }
    let run_mean = stats::mean(&hk_geomeans);

    let factors: Vec<NormalizationFactor> = sample_ids
        .iter()
        .zip(hk_geomeans.iter())
        .map(|(sample_id, &hk_geomean)| NormalizationFactor {
            sample_id: sample_id.clone(),
            hk_geomean,
            norm_factor: hk_geomean / run_mean,
        })
        .collect();

    // Sorted gene columns give a deterministic, reproducible matrix
    let gene_names: Vec<String> = gene_set.iter().map(|g| g.to_string()).collect();
    let mut values = Array2::from_elem((sample_ids.len(), gene_names.len()), f64::NAN);
    for (row, (sample_id, factor)) in sample_ids.iter().zip(factors.iter()).enumerate() {
        for (col, gene) in gene_names.iter().enumerate() {
            if let Some(&count) = counts.get(&(sample_id.as_str(), gene.as_str())) {
                values[[row, col]] = (count * factor.norm_factor).log2();
            }
        }
    }

    log::info!(
        "Normalized {} samples x {} genes (housekeeping geomean run average {:.2})",
        sample_ids.len(),
        gene_names.len(),
        run_mean
    );

    let matrix = NormalizedMatrix::new(sample_ids, gene_names, values)?;
    Ok((matrix, factors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawCountRecord;

    fn record(sample: &str, gene: &str, class: CodeClass, count: u64) -> RawCountRecord {
        RawCountRecord {
            code_class: class,
            gene: gene.to_string(),
            accession: String::new(),
            count,
            sample_id: sample.to_string(),
            source_file: format!("a_b_{}_1.RCC", sample),
        }
    }

    fn two_sample_table() -> RawCountTable {
        RawCountTable::new(vec![
            record("s1", "HK1", CodeClass::Housekeeping, 100),
            record("s1", "HK2", CodeClass::Housekeeping, 400),
            record("s1", "GeneA", CodeClass::Endogenous, 64),
            record("s2", "HK1", CodeClass::Housekeeping, 50),
            record("s2", "HK2", CodeClass::Housekeeping, 200),
            record("s2", "GeneA", CodeClass::Endogenous, 32),
        ])
        .unwrap()
    }

    #[test]
    fn test_norm_factors_mean_is_one() {
        let (_, factors) = normalize(&two_sample_table()).unwrap();
        // s1: gmean(100, 400) = 200; s2: gmean(50, 200) = 100; run mean = 150
        assert!((factors[0].hk_geomean - 200.0).abs() < 1e-9);
        assert!((factors[1].hk_geomean - 100.0).abs() < 1e-9);
        assert!((factors[0].norm_factor - 200.0 / 150.0).abs() < 1e-12);

        let mean_factor =
            factors.iter().map(|f| f.norm_factor).sum::<f64>() / factors.len() as f64;
        assert!((mean_factor - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_values_are_log2_scaled() {
        let (matrix, factors) = normalize(&two_sample_table()).unwrap();
        let col = matrix.gene_column("GeneA").unwrap();
        let expected_s1 = (64.0 * factors[0].norm_factor).log2();
        assert!((col[0] - expected_s1).abs() < 1e-12);
    }

    #[test]
    fn test_zero_count_floored_never_neg_infinity() {
        let table = RawCountTable::new(vec![
            record("s1", "HK1", CodeClass::Housekeeping, 100),
            record("s1", "GeneA", CodeClass::Endogenous, 0),
            record("s2", "HK1", CodeClass::Housekeeping, 100),
            record("s2", "GeneA", CodeClass::Endogenous, 8),
        ])
        .unwrap();

        let (matrix, _) = normalize(&table).unwrap();
        let col = matrix.gene_column("GeneA").unwrap();
        assert!(col.iter().all(|v| v.is_finite()));
        // floored to 1, factor 1 -> log2(1) = 0
        assert!((col[0] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_gene_stays_nan() {
        let table = RawCountTable::new(vec![
            record("s1", "HK1", CodeClass::Housekeeping, 100),
            record("s1", "GeneA", CodeClass::Endogenous, 50),
            record("s2", "HK1", CodeClass::Housekeeping, 100),
        ])
        .unwrap();

        let (matrix, _) = normalize(&table).unwrap();
        let col = matrix.gene_column("GeneA").unwrap();
        assert!(col[0].is_finite());
        assert!(col[1].is_nan());
    }

    #[test]
    fn test_no_housekeeping_is_fatal() {
        let table = RawCountTable::new(vec![
            record("s1", "HK1", CodeClass::Housekeeping, 100),
            record("s1", "GeneA", CodeClass::Endogenous, 50),
            record("s2", "GeneA", CodeClass::Endogenous, 60),
        ])
        .unwrap();

        match normalize(&table) {
            Err(NCounterError::Normalization { sample_id }) => assert_eq!(sample_id, "s2"),
            other => panic!("expected normalization error, got {:?}", other),
        }
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let table = two_sample_table();
        let (first, _) = normalize(&table).unwrap();
        let (second, _) = normalize(&table).unwrap();
        assert_eq!(first.sample_ids(), second.sample_ids());
        assert_eq!(first.gene_names(), second.gene_names());
        // bit-identical values
        for (a, b) in first.values().iter().zip(second.values().iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_controls_excluded_from_matrix() {
        let table = RawCountTable::new(vec![
            record("s1", "HK1", CodeClass::Housekeeping, 100),
            record("s1", "GeneA", CodeClass::Endogenous, 50),
            record("s1", "POS_A(128)", CodeClass::Positive, 4000),
            record("s1", "NEG_A(0)", CodeClass::Negative, 2),
        ])
        .unwrap();

        let (matrix, _) = normalize(&table).unwrap();
        assert_eq!(matrix.gene_names(), &["GeneA".to_string(), "HK1".to_string()]);
    }
}
