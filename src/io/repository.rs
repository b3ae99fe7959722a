//! Aggregation of per-file record sequences into one run table

use std::collections::HashMap;

use crate::data::{RawCountRecord, RawCountTable};
use crate::error::{NCounterError, Result};

/// Concatenate per-file record sequences into a single raw count table.
///
/// Two files yielding the same sample id are ambiguous (typically a re-run
/// dropped into the same directory) and abort the run. The per-file grouping
/// is exactly what the parser produced; no staging files are written.
pub fn ingest(per_file: Vec<Vec<RawCountRecord>>) -> Result<RawCountTable> {
    let mut first_file_for_sample: HashMap<String, String> = HashMap::new();
    let mut all_records = Vec::new();

    for records in per_file {
        let Some(first) = records.first() else {
            continue;
        };
        let sample_id = first.sample_id.clone();
        let source_file = first.source_file.clone();

        if let Some(existing) = first_file_for_sample.get(&sample_id) {
            return Err(NCounterError::DuplicateSample {
                sample_id,
                first_file: existing.clone(),
                second_file: source_file,
            });
        }
        first_file_for_sample.insert(sample_id, source_file);
        all_records.extend(records);
    }

    if all_records.is_empty() {
        return Err(NCounterError::EmptyData {
            reason: "no records to ingest".to_string(),
        });
    }

    let table = RawCountTable::new(all_records)?;
    log::info!(
        "Raw count table created: {} records across {} samples",
        table.records().len(),
        table.n_samples()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CodeClass;

    fn file_records(sample: &str, file: &str, genes: &[(&str, u64)]) -> Vec<RawCountRecord> {
        genes
            .iter()
            .map(|(gene, count)| RawCountRecord {
                code_class: CodeClass::Endogenous,
                gene: gene.to_string(),
                accession: String::new(),
                count: *count,
                sample_id: sample.to_string(),
                source_file: file.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_ingest_concatenates() {
        let table = ingest(vec![
            file_records("s1", "a_b_s1_1.RCC", &[("GeneA", 10), ("GeneB", 20)]),
            file_records("s2", "a_b_s2_1.RCC", &[("GeneA", 30)]),
        ])
        .unwrap();

        assert_eq!(table.records().len(), 3);
        assert_eq!(table.sample_ids(), &["s1".to_string(), "s2".to_string()]);
    }

    #[test]
    fn test_ingest_rejects_duplicate_sample() {
        let result = ingest(vec![
            file_records("s1", "a_b_s1_1.RCC", &[("GeneA", 10)]),
            file_records("s1", "a_b_s1_2.RCC", &[("GeneB", 20)]),
        ]);

        match result {
            Err(NCounterError::DuplicateSample {
                sample_id,
                first_file,
                second_file,
            }) => {
                assert_eq!(sample_id, "s1");
                assert_eq!(first_file, "a_b_s1_1.RCC");
                assert_eq!(second_file, "a_b_s1_2.RCC");
            }
            other => panic!("expected duplicate sample error, got {:?}", other),
        }
    }

    #[test]
    fn test_ingest_skips_empty_file_sequences() {
        let table = ingest(vec![
            Vec::new(),
            file_records("s1", "a_b_s1_1.RCC", &[("GeneA", 10)]),
        ])
        .unwrap();
        assert_eq!(table.n_samples(), 1);
    }
}
