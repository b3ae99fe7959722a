//! Error types for rust_ncounter

use thiserror::Error;

/// Main error type for nCounter pipeline operations
#[derive(Error, Debug)]
pub enum NCounterError {
    #[error("Malformed row in {file} at line {line}: {reason}")]
    Parse {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("Duplicate sample ID '{sample_id}': produced by both {first_file} and {second_file}")]
    DuplicateSample {
        sample_id: String,
        first_file: String,
        second_file: String,
    },

    #[error("Duplicate record for sample '{sample_id}', gene '{gene}'")]
    DuplicateRecord { sample_id: String, gene: String },

    #[error("Cannot normalize sample '{sample_id}': no housekeeping genes present")]
    Normalization { sample_id: String },

    #[error("Insufficient data: group '{group}' has {n} usable samples, need at least 2")]
    InsufficientData { group: String, n: usize },

    #[error("Gene '{gene}' not found in the normalized matrix")]
    MissingGene { gene: String },

    #[error("Annotation column '{column}' not found")]
    MissingColumn { column: String },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    #[error("Empty data: {reason}")]
    EmptyData { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for nCounter pipeline operations
pub type Result<T> = std::result::Result<T, NCounterError>;
