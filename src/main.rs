//! rust_ncounter command-line interface

use std::collections::BTreeMap;
use std::path::Path;

use clap::Parser;
use log::{info, LevelFilter};
use serde::Serialize;

use rust_ncounter::cli::{Cli, Commands};
use rust_ncounter::prelude::*;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Run {
            input,
            annotations,
            output,
            qc_report,
        } => run_full(&input, annotations.as_deref(), &output, qc_report.as_deref()),
        Commands::Qc { input, output } => run_qc(&input, output.as_deref()),
        Commands::Volcano {
            input,
            genes,
            group_column,
            baseline,
            treatment,
            output,
            alpha,
        } => run_volcano(
            &input,
            genes.as_deref(),
            &group_column,
            &baseline,
            &treatment,
            &output,
            alpha,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// JSON shape of the QC report
#[derive(Serialize)]
struct QcReport<'a> {
    diagnostics: &'a ControlDiagnostics,
    normalization_factors: &'a [NormalizationFactor],
    flags: &'a BTreeMap<String, QcFlags>,
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn run_full(
    input: &str,
    annotations_path: Option<&str>,
    output: &str,
    qc_report: Option<&str>,
) -> Result<()> {
    let root = Path::new(input);

    let annotations = match annotations_path {
        Some(path) => Some(read_annotations(Path::new(path))?),
        None => find_annotations(root)?,
    };

    let pipeline = run_pipeline(root, annotations.as_ref())?;

    let flagged = pipeline.flags.values().filter(|f| f.flagged()).count();
    if flagged > 0 {
        info!(
            "{} of {} samples carry QC flags; they were normalized anyway",
            flagged,
            pipeline.flags.len()
        );
    }

    if let Some(path) = qc_report {
        write_qc_report(Path::new(path), &pipeline)?;
    }

    write_matrix(Path::new(output), &pipeline.matrix)?;
    info!(
        "Done: {} samples, {} genes",
        pipeline.matrix.n_samples(),
        pipeline.matrix.n_genes()
    );
    Ok(())
}

fn run_qc(input: &str, output: Option<&str>) -> Result<()> {
    let root = Path::new(input);
    let pipeline = run_pipeline(root, None)?;

    match output {
        Some(path) => write_qc_report(Path::new(path), &pipeline)?,
        None => {
            let report = QcReport {
                diagnostics: &pipeline.diagnostics,
                normalization_factors: &pipeline.factors,
                flags: &pipeline.flags,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn write_qc_report(path: &Path, pipeline: &PipelineOutput) -> Result<()> {
    let report = QcReport {
        diagnostics: &pipeline.diagnostics,
        normalization_factors: &pipeline.factors,
        flags: &pipeline.flags,
    };
    std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
    info!("QC report written to {}", path.display());
    Ok(())
}

fn run_volcano(
    input: &str,
    genes: Option<&str>,
    group_column: &str,
    baseline: &str,
    treatment: &str,
    output: &str,
    alpha: f64,
) -> Result<()> {
    let matrix = read_matrix(Path::new(input))?;

    let gene_list: Vec<String> = match genes {
        Some(list) => list
            .split(',')
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect(),
        None => matrix.gene_names().to_vec(),
    };

    let results = compare(&matrix, &gene_list, group_column, baseline, treatment)?;

    let threshold = neg_log_p_threshold(alpha);
    let above = results.iter().filter(|r| r.neg_log_p > threshold).count();
    info!(
        "DE genes: {} vs. baseline {} — {} of {} genes above -log10(p) = {:.3}",
        treatment,
        baseline,
        above,
        results.len(),
        threshold
    );

    write_de_results(Path::new(output), &results)?;
    Ok(())
}
