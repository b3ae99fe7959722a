//! Raw count records parsed from RCC files

use std::collections::HashSet;

use crate::error::{NCounterError, Result};

/// Probe class as declared in the CodeClass column of an RCC file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodeClass {
    /// Synthetic probe spiked in at a known titration concentration
    Positive,
    /// Synthetic probe at zero concentration, defines the noise floor
    Negative,
    /// Gene of interest
    Endogenous,
    /// Reference gene assumed constant across samples
    Housekeeping,
    /// Any other class (e.g. binding or purification controls)
    Other(String),
}

impl CodeClass {
    /// Parse the CodeClass field. Unknown classes are preserved, not rejected;
    /// they are simply never selected by QC or normalization.
    pub fn parse(s: &str) -> CodeClass {
        match s {
            "Positive" => CodeClass::Positive,
            "Negative" => CodeClass::Negative,
            "Endogenous" => CodeClass::Endogenous,
            "Housekeeping" => CodeClass::Housekeeping,
            other => CodeClass::Other(other.to_string()),
        }
    }
}

/// One probe count from one sample file. Immutable once parsed.
#[derive(Debug, Clone)]
pub struct RawCountRecord {
    pub code_class: CodeClass,
    pub gene: String,
    pub accession: String,
    pub count: u64,
    pub sample_id: String,
    pub source_file: String,
}

impl RawCountRecord {
    /// Count with the zero floor applied (0 -> 1).
    ///
    /// Documented numeric policy: zero counts are floored to 1 before any
    /// log or geometric-mean statistic, so log2(0) never appears downstream.
    pub fn floored_count(&self) -> f64 {
        self.count.max(1) as f64
    }
}

/// All raw count records of one run, across samples.
///
/// Invariant: every (sample_id, gene) pair appears at most once. Record
/// order is insertion order; sample ids are reported in first-seen order.
#[derive(Debug, Clone)]
pub struct RawCountTable {
    records: Vec<RawCountRecord>,
    sample_ids: Vec<String>,
}

impl RawCountTable {
    /// Build a table from parsed records, enforcing (sample, gene) uniqueness.
    pub fn new(records: Vec<RawCountRecord>) -> Result<Self> {
        let mut seen: HashSet<(String, String)> = HashSet::with_capacity(records.len());
        let mut sample_ids: Vec<String> = Vec::new();

        for r in &records {
            if !seen.insert((r.sample_id.clone(), r.gene.clone())) {
                return Err(NCounterError::DuplicateRecord {
                    sample_id: r.sample_id.clone(),
                    gene: r.gene.clone(),
                });
            }
            if !sample_ids.contains(&r.sample_id) {
                sample_ids.push(r.sample_id.clone());
            }
        }

        Ok(Self {
            records,
            sample_ids,
        })
    }

    /// All records in insertion order
    pub fn records(&self) -> &[RawCountRecord] {
        &self.records
    }

    /// Sample ids in first-seen order
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Number of samples in the run
    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    /// Records of one sample
    pub fn sample_records<'a>(
        &'a self,
        sample_id: &'a str,
    ) -> impl Iterator<Item = &'a RawCountRecord> + 'a {
        self.records.iter().filter(move |r| r.sample_id == sample_id)
    }

    /// Records of one probe class across all samples
    pub fn by_code_class<'a>(
        &'a self,
        class: &'a CodeClass,
    ) -> impl Iterator<Item = &'a RawCountRecord> {
        self.records.iter().filter(move |r| r.code_class == *class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sample: &str, gene: &str, class: CodeClass, count: u64) -> RawCountRecord {
        RawCountRecord {
            code_class: class,
            gene: gene.to_string(),
            accession: format!("NM_{}", gene),
            count,
            sample_id: sample.to_string(),
            source_file: format!("A_01_{}_B.RCC", sample),
        }
    }

    #[test]
    fn test_table_preserves_sample_order() {
        let table = RawCountTable::new(vec![
            record("s2", "GeneA", CodeClass::Endogenous, 10),
            record("s1", "GeneA", CodeClass::Endogenous, 20),
            record("s2", "GeneB", CodeClass::Housekeeping, 30),
        ])
        .unwrap();

        assert_eq!(table.sample_ids(), &["s2".to_string(), "s1".to_string()]);
        assert_eq!(table.sample_records("s2").count(), 2);
    }

    #[test]
    fn test_duplicate_sample_gene_rejected() {
        let result = RawCountTable::new(vec![
            record("s1", "GeneA", CodeClass::Endogenous, 10),
            record("s1", "GeneA", CodeClass::Endogenous, 11),
        ]);
        assert!(matches!(
            result,
            Err(NCounterError::DuplicateRecord { .. })
        ));
    }

    #[test]
    fn test_floored_count() {
        let r = record("s1", "GeneA", CodeClass::Negative, 0);
        assert_eq!(r.floored_count(), 1.0);
        let r = record("s1", "GeneA", CodeClass::Negative, 7);
        assert_eq!(r.floored_count(), 7.0);
    }

    #[test]
    fn test_code_class_parse() {
        assert_eq!(CodeClass::parse("Positive"), CodeClass::Positive);
        assert_eq!(CodeClass::parse("Housekeeping"), CodeClass::Housekeeping);
        assert_eq!(
            CodeClass::parse("Binding"),
            CodeClass::Other("Binding".to_string())
        );
    }
}
