//! rust_ncounter: Nanostring nCounter RCC processing
//!
//! This crate ingests raw per-sample RCC count files, validates them against
//! the built-in positive/negative control probes, normalizes endogenous gene
//! counts against housekeeping genes (log2 scale), and runs a two-group
//! differential-expression comparison producing a volcano-plot-ready table.
//!
//! # Example
//!
//! ```ignore
//! use rust_ncounter::prelude::*;
//!
//! // Load and normalize a run directory
//! let annotations = find_annotations(root)?;
//! let output = run_pipeline(root, annotations.as_ref())?;
//! write_matrix(out_path, &output.matrix)?;
//!
//! // Two-group comparison on the normalized matrix
//! let results = compare(&output.matrix, &genes, "group", "control", "treated")?;
//! ```

pub mod annotate;
pub mod cli;
pub mod data;
pub mod de;
pub mod error;
pub mod io;
pub mod normalization;
pub mod qc;
pub mod stats;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::annotate::join;
    pub use crate::data::{CodeClass, NormalizedMatrix, RawCountRecord, RawCountTable, SampleAnnotations};
    pub use crate::de::{compare, neg_log_p_threshold, DeResult};
    pub use crate::error::{NCounterError, Result};
    pub use crate::io::{
        find_annotations, ingest, parse_rcc_dir, read_annotations, read_matrix,
        write_de_results, write_matrix,
    };
    pub use crate::normalization::{normalize, NormalizationFactor};
    pub use crate::qc::{ControlDiagnostics, QcFlags, TitrationSeries};
    pub use crate::{run_pipeline, PipelineOutput};
}

use std::collections::BTreeMap;
use std::path::Path;

use prelude::*;

/// Everything one batch run produces.
///
/// A run is a single atomic unit of work: ingestion, QC, normalization and
/// the optional annotation join happen strictly in order, each stage
/// consuming an immutable input and producing a new artifact.
pub struct PipelineOutput {
    /// Raw counts across all samples, as parsed
    pub table: RawCountTable,
    /// Run-level control-probe diagnostics
    pub diagnostics: ControlDiagnostics,
    /// Advisory per-sample QC flags; flagged samples are still normalized
    pub flags: BTreeMap<String, QcFlags>,
    /// Per-sample housekeeping normalization factors
    pub factors: Vec<NormalizationFactor>,
    /// Log2 normalized matrix, annotations joined when provided
    pub matrix: NormalizedMatrix,
}

/// Run the ingestion -> QC -> normalization -> join pipeline on a directory
/// of RCC files. The root path is explicit; nothing changes the process
/// working directory.
pub fn run_pipeline(
    root: &Path,
    annotations: Option<&SampleAnnotations>,
) -> Result<PipelineOutput> {
    let per_file = parse_rcc_dir(root)?;
    let table = ingest(per_file)?;

    let diagnostics = qc::evaluate(&table)?;
    let flags = qc::per_sample_flags(&table, &diagnostics, &TitrationSeries::default());

    let (matrix, factors) = normalize(&table)?;
    let matrix = join(matrix, annotations)?;

    Ok(PipelineOutput {
        table,
        diagnostics,
        flags,
        factors,
        matrix,
    })
}
