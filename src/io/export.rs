//! Flat-file export and import of pipeline artifacts
//!
//! The exported normalized matrix is the sole persisted artifact of the
//! normalization stage and the sole input contract for running the DE stage
//! independently: one row per sample, one column per gene (log2 values),
//! plus any joined annotation columns. Missing cells and unmatched
//! annotation values serialize as empty fields.

use std::path::Path;

use ndarray::Array2;

use crate::data::NormalizedMatrix;
use crate::de::DeResult;
use crate::error::{NCounterError, Result};
use crate::io::annotations::SAMPLE_KEY_COLUMN;

/// Write the normalized matrix as CSV: sample key column, gene columns,
/// annotation columns.
pub fn write_matrix(path: &Path, matrix: &NormalizedMatrix) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<String> = vec![SAMPLE_KEY_COLUMN.to_string()];
    header.extend(matrix.gene_names().iter().cloned());
    header.extend(matrix.annotation_names().iter().cloned());
    writer.write_record(&header)?;

    let values = matrix.values();
    for (row_idx, sample_id) in matrix.sample_ids().iter().enumerate() {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(sample_id.clone());
        for col_idx in 0..matrix.n_genes() {
            let v = values[[row_idx, col_idx]];
            if v.is_nan() {
                record.push(String::new());
            } else {
                record.push(format!("{:.6}", v));
            }
        }
        for name in matrix.annotation_names() {
            let value = matrix
                .annotation(name)
                .and_then(|col| col[row_idx].clone())
                .unwrap_or_default();
            record.push(value);
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    log::info!("Log2-normalized matrix written to {}", path.display());
    Ok(())
}

/// Read a previously exported matrix.
///
/// Columns where every non-empty cell parses as a number are gene columns
/// (empty cells become NaN, i.e. missing); all other columns are treated as
/// annotation columns. The first column, or one named `RCC`, is the sample
/// key.
pub fn read_matrix(path: &Path) -> Result<NormalizedMatrix> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.len() < 2 {
        return Err(NCounterError::EmptyData {
            reason: format!("matrix file {} has no gene columns", path.display()),
        });
    }

    let key_idx = headers
        .iter()
        .position(|h| h == SAMPLE_KEY_COLUMN)
        .unwrap_or(0);

    let mut sample_ids: Vec<String> = Vec::new();
    let mut cells: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        sample_ids.push(record.get(key_idx).unwrap_or_default().to_string());
        cells.push(record.iter().map(|f| f.to_string()).collect());
    }
    if sample_ids.is_empty() {
        return Err(NCounterError::EmptyData {
            reason: format!("matrix file {} has no sample rows", path.display()),
        });
    }

    // Classify each non-key column as gene (numeric) or annotation
    let mut gene_cols: Vec<usize> = Vec::new();
    let mut annot_cols: Vec<usize> = Vec::new();
    for col in 0..headers.len() {
        if col == key_idx {
            continue;
        }
        let mut any_numeric = false;
        let mut all_numeric = true;
        for row in &cells {
            let field = row.get(col).map(String::as_str).unwrap_or("");
            if field.is_empty() {
                continue;
            }
            if field.parse::<f64>().is_ok() {
                any_numeric = true;
            } else {
                all_numeric = false;
            }
        }
        if any_numeric && all_numeric {
            gene_cols.push(col);
        } else {
            annot_cols.push(col);
        }
    }

    let n_samples = sample_ids.len();
    let mut values = Array2::from_elem((n_samples, gene_cols.len()), f64::NAN);
    for (row_idx, row) in cells.iter().enumerate() {
        for (out_idx, &col) in gene_cols.iter().enumerate() {
            let field = row.get(col).map(String::as_str).unwrap_or("");
            if !field.is_empty() {
                values[[row_idx, out_idx]] =
                    field.parse::<f64>().map_err(|_| NCounterError::Parse {
                        file: path.display().to_string(),
                        line: row_idx + 2,
                        reason: format!("non-numeric value '{}' in gene column", field),
                    })?;
            }
        }
    }

    let gene_names: Vec<String> = gene_cols.iter().map(|&c| headers[c].clone()).collect();
    let mut matrix = NormalizedMatrix::new(sample_ids, gene_names, values)?;
    for &col in &annot_cols {
        let column: Vec<Option<String>> = cells
            .iter()
            .map(|row| {
                let field = row.get(col).map(String::as_str).unwrap_or("");
                if field.is_empty() {
                    None
                } else {
                    Some(field.to_string())
                }
            })
            .collect();
        matrix.add_annotation(&headers[col], column)?;
    }
    Ok(matrix)
}

/// Write DE results as CSV: gene, fold_change, neg_log_p.
///
/// The p = 0 sentinel serializes as `inf`, never clamped to a finite value.
pub fn write_de_results(path: &Path, results: &[DeResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["gene", "fold_change", "neg_log_p"])?;
    for r in results {
        let fold_change = format!("{:.6}", r.fold_change);
        let neg_log_p = if r.neg_log_p.is_infinite() {
            "inf".to_string()
        } else {
            format!("{:.6}", r.neg_log_p)
        };
        writer.write_record([r.gene.as_str(), fold_change.as_str(), neg_log_p.as_str()])?;
    }
    writer.flush()?;
    log::info!("DE results written to {}", path.display());
    Ok(())
}
