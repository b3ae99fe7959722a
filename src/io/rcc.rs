//! RCC raw count file parsing
//!
//! Format contract of the source instrument:
//! - file names contain the marker token `RCC`, and the sample identifier is
//!   the third underscore-delimited segment of the file name
//!   (e.g. `20200131_run4_Sample07_05.RCC` -> `Sample07`);
//! - count data begins after a fixed 23-line header;
//! - data rows are comma-separated (CodeClass, Gene, Accession, Count).
//!
//! Both positional assumptions are fixed properties of the format, not
//! inferred from file content.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::data::{CodeClass, RawCountRecord};
use crate::error::{NCounterError, Result};

/// Number of header lines preceding count data in an RCC file
pub const RCC_HEADER_LINES: usize = 23;

/// Marker token identifying raw count files in a run directory
pub const RCC_MARKER: &str = "RCC";

/// Derive the sample id from an RCC file name (third underscore segment)
pub fn sample_id_from_filename(file_name: &str) -> Result<String> {
    let segments: Vec<&str> = file_name.split('_').collect();
    segments
        .get(2)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| NCounterError::Parse {
            file: file_name.to_string(),
            line: 0,
            reason: "file name has no third underscore-delimited segment for the sample id"
                .to_string(),
        })
}

/// Parse one RCC file into raw count records.
///
/// Malformed rows (wrong field count, non-numeric count) are a hard parse
/// error carrying the file name and line number; they are never silently
/// dropped. Empty lines, single-field structural lines (section markup and
/// trailing assay messages) and rows with a blank CodeClass are skipped as
/// non-probe content.
pub fn parse_rcc(path: &Path) -> Result<Vec<RawCountRecord>> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let sample_id = sample_id_from_filename(&file_name)?;

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        // 1-based for error reporting
        let line_no = idx + 1;
        if line_no <= RCC_HEADER_LINES {
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || !trimmed.contains(',') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').collect();
        if fields[0].trim().is_empty() {
            continue;
        }
        if fields.len() != 4 {
            return Err(NCounterError::Parse {
                file: file_name.clone(),
                line: line_no,
                reason: format!("expected 4 fields, found {}", fields.len()),
            });
        }

        let count: u64 = fields[3].trim().parse().map_err(|_| NCounterError::Parse {
            file: file_name.clone(),
            line: line_no,
            reason: format!("non-numeric count '{}'", fields[3].trim()),
        })?;

        records.push(RawCountRecord {
            code_class: CodeClass::parse(fields[0].trim()),
            gene: fields[1].trim().to_string(),
            accession: fields[2].trim().to_string(),
            count,
            sample_id: sample_id.clone(),
            source_file: file_name.clone(),
        });
    }

    if records.is_empty() {
        return Err(NCounterError::EmptyData {
            reason: format!("no count rows found in {}", file_name),
        });
    }

    log::debug!("Parsed {} records from {}", records.len(), file_name);
    Ok(records)
}

/// Parse every RCC file under `root`, one record sequence per file.
///
/// The root path is an explicit parameter; the process working directory is
/// never touched. Files are discovered by the `RCC` marker token in their
/// name, sorted for a deterministic run order, and parsed in parallel (no
/// record depends on another file's content).
pub fn parse_rcc_dir(root: &Path) -> Result<Vec<Vec<RawCountRecord>>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .map(|n| n.to_string_lossy().contains(RCC_MARKER))
                    .unwrap_or(false)
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(NCounterError::EmptyData {
            reason: format!("no {} files found under {}", RCC_MARKER, root.display()),
        });
    }
    log::info!("Found {} RCC files under {}", paths.len(), root.display());

    paths
        .par_iter()
        .map(|p| parse_rcc(p))
        .collect::<Result<Vec<_>>>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_rcc(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        for i in 0..RCC_HEADER_LINES {
            writeln!(file, "header line {}", i + 1).unwrap();
        }
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        path
    }

    #[test]
    fn test_sample_id_from_filename() {
        assert_eq!(
            sample_id_from_filename("20200131_run4_Sample07_05.RCC").unwrap(),
            "Sample07"
        );
        assert!(sample_id_from_filename("noseparators.RCC").is_err());
    }

    #[test]
    fn test_parse_rcc_skips_header_and_markup() {
        let dir = TempDir::new().unwrap();
        let path = write_rcc(
            dir.path(),
            "20200131_run4_s1_01.RCC",
            &[
                "Endogenous,GeneA,NM_001,120",
                "Housekeeping,HK1,NM_002,300",
                "</Code_Summary>",
                "",
            ],
        );

        let records = parse_rcc(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sample_id, "s1");
        assert_eq!(records[0].count, 120);
        assert_eq!(records[1].code_class, CodeClass::Housekeeping);
    }

    #[test]
    fn test_parse_rcc_reports_bad_count() {
        let dir = TempDir::new().unwrap();
        let path = write_rcc(
            dir.path(),
            "20200131_run4_s1_01.RCC",
            &["Endogenous,GeneA,NM_001,abc"],
        );

        match parse_rcc(&path) {
            Err(NCounterError::Parse { line, reason, .. }) => {
                assert_eq!(line, RCC_HEADER_LINES + 1);
                assert!(reason.contains("non-numeric"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rcc_reports_bad_field_count() {
        let dir = TempDir::new().unwrap();
        let path = write_rcc(
            dir.path(),
            "20200131_run4_s1_01.RCC",
            &["Endogenous,GeneA,120"],
        );
        assert!(matches!(
            parse_rcc(&path),
            Err(NCounterError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_rcc_dir_filters_by_marker() {
        let dir = TempDir::new().unwrap();
        write_rcc(
            dir.path(),
            "20200131_run4_s1_01.RCC",
            &["Endogenous,GeneA,NM_001,10"],
        );
        write_rcc(
            dir.path(),
            "20200131_run4_s2_02.RCC",
            &["Endogenous,GeneA,NM_001,20"],
        );
        std::fs::write(dir.path().join("notes.txt"), "not a count file").unwrap();

        let per_file = parse_rcc_dir(dir.path()).unwrap();
        assert_eq!(per_file.len(), 2);
        // sorted file order
        assert_eq!(per_file[0][0].sample_id, "s1");
        assert_eq!(per_file[1][0].sample_id, "s2");
    }
}
