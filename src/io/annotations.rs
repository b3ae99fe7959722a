//! Annotation file discovery and reading

use std::path::Path;

use crate::data::SampleAnnotations;
use crate::error::{NCounterError, Result};

/// Marker token identifying the annotation file in a run directory
pub const ANNOTATIONS_MARKER: &str = "annotations";

/// Name of the sample identifier column in annotation files
pub const SAMPLE_KEY_COLUMN: &str = "RCC";

/// Look for an annotation file under `root` and read it if present.
///
/// Absence is not an error: the pipeline runs without annotations, it just
/// cannot join group labels or feed the DE stage.
pub fn find_annotations(root: &Path) -> Result<Option<SampleAnnotations>> {
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if path.is_file() && name.contains(ANNOTATIONS_MARKER) {
            log::info!("Sample annotations read from {}", name);
            return read_annotations(&path).map(Some);
        }
    }
    log::info!("No annotation file found under {}", root.display());
    Ok(None)
}

/// Read an annotation CSV.
///
/// The sample identifier column is `RCC` if present, otherwise the first
/// column; every other column is kept as a descriptive string label.
pub fn read_annotations(path: &Path) -> Result<SampleAnnotations> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() {
        return Err(NCounterError::EmptyData {
            reason: format!("annotation file {} has no columns", path.display()),
        });
    }

    let key_idx = headers
        .iter()
        .position(|h| h == SAMPLE_KEY_COLUMN)
        .unwrap_or(0);
    let key_column = headers[key_idx].clone();

    let mut sample_ids: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        sample_ids.push(record.get(key_idx).unwrap_or_default().to_string());
        for (i, field) in record.iter().enumerate() {
            if i != key_idx {
                columns[i].push(field.to_string());
            }
        }
    }

    if sample_ids.is_empty() {
        return Err(NCounterError::EmptyData {
            reason: format!("annotation file {} has no rows", path.display()),
        });
    }

    let mut annotations = SampleAnnotations::new(&key_column, sample_ids);
    for (i, header) in headers.iter().enumerate() {
        if i != key_idx {
            annotations.add_column(header, std::mem::take(&mut columns[i]))?;
        }
    }
    Ok(annotations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_read_annotations_with_rcc_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample_annotations.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "group,RCC,batch").unwrap();
        writeln!(file, "control,s1,b1").unwrap();
        writeln!(file, "treated,s2,b2").unwrap();

        let annot = read_annotations(&path).unwrap();
        assert_eq!(annot.key_column(), "RCC");
        assert_eq!(annot.sample_ids(), &["s1".to_string(), "s2".to_string()]);
        assert_eq!(annot.column_names(), &["group".to_string(), "batch".to_string()]);
        assert_eq!(annot.value_for_sample("group", "s2"), Some("treated"));
    }

    #[test]
    fn test_find_annotations_absent_is_none() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a_b_s1_1.RCC"), "x").unwrap();
        let found = find_annotations(dir.path()).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_find_annotations_by_marker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run_annotations.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "RCC,group").unwrap();
        writeln!(file, "s1,control").unwrap();

        let found = find_annotations(dir.path()).unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().n_samples(), 1);
    }
}
