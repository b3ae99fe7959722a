//! Command-line interface for rust_ncounter

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rust_ncounter")]
#[command(version)]
#[command(about = "Nanostring nCounter RCC processing: QC, normalization, differential expression")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: ingest, QC, normalize, export
    #[command(
        long_about = "Run the full pipeline on a directory of RCC files.\n\n\
            Parses every RCC file under the input directory, checks the\n\
            positive/negative control probes, normalizes endogenous counts\n\
            against housekeeping genes (log2 scale), joins a sample annotation\n\
            file when one is present, and writes the normalized matrix.",
        after_long_help = "\
Examples:
  # Normalize a run directory, auto-discovering the annotation file
  rust_ncounter run -i ./rcc_run -o log2_normalized_data.csv

  # Explicit annotation file plus a JSON QC report
  rust_ncounter run -i ./rcc_run -a groups.csv -o normalized.csv --qc-report qc.json"
    )]
    Run {
        /// Directory containing the RCC files
        #[arg(short, long,
            long_help = "Directory containing the raw RCC count files.\n\
                Files are recognized by the 'RCC' marker token in their name;\n\
                the sample identifier is the third underscore-delimited\n\
                segment of each file name.")]
        input: String,

        /// Sample annotation CSV file
        #[arg(short, long,
            long_help = "Sample annotation CSV file.\n\
                Must contain a sample identifier column (named 'RCC', or the\n\
                first column); other columns are descriptive labels.\n\
                Without this flag, a file whose name contains 'annotations'\n\
                is picked up from the input directory when present.")]
        annotations: Option<String>,

        /// Output file for the normalized matrix [default: log2_normalized_data.csv]
        #[arg(short, long, default_value = "log2_normalized_data.csv")]
        output: String,

        /// Write the QC report (diagnostics, factors, flags) as JSON
        #[arg(long, value_name = "FILE")]
        qc_report: Option<String>,
    },

    /// Control-probe QC only, reported as JSON
    #[command(
        long_about = "Compute control-probe diagnostics for a run directory\n\
            without exporting a matrix: positive-control geometric mean,\n\
            negative-control background threshold, per-sample normalization\n\
            factors and advisory QC flags.",
        after_long_help = "\
Examples:
  rust_ncounter qc -i ./rcc_run
  rust_ncounter qc -i ./rcc_run -o qc.json"
    )]
    Qc {
        /// Directory containing the RCC files
        #[arg(short, long)]
        input: String,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Two-group differential expression from an exported matrix
    #[command(
        long_about = "Compare two sample groups gene by gene on a previously\n\
            exported log2-normalized matrix, producing the volcano table\n\
            (gene, fold_change, neg_log_p). Fold change is the difference of\n\
            mean log2 expression, treatment minus baseline; the p-value is a\n\
            two-sided equal-variance Student's t-test.",
        after_long_help = "\
Examples:
  # All gene columns
  rust_ncounter volcano -i normalized.csv --group-column group \\
    --baseline control --treatment drug -o de_results.csv

  # A chosen gene list, in output order
  rust_ncounter volcano -i normalized.csv -g GeneA,GeneB,GeneC \\
    --group-column group --baseline control --treatment drug"
    )]
    Volcano {
        /// Exported normalized matrix CSV
        #[arg(short, long)]
        input: String,

        /// Comma-separated gene list to test [default: all gene columns]
        #[arg(short, long,
            long_help = "Comma-separated gene names to test.\n\
                Output rows follow this order exactly. When omitted, every\n\
                gene column of the matrix is tested in column order.")]
        genes: Option<String>,

        /// Annotation column holding the group labels
        #[arg(long)]
        group_column: String,

        /// Baseline group label
        #[arg(long)]
        baseline: String,

        /// Treatment group label
        #[arg(long)]
        treatment: String,

        /// Output file path [default: de_results.csv]
        #[arg(short, long, default_value = "de_results.csv")]
        output: String,

        /// Significance cutoff used for the labeling threshold report [default: 0.05]
        #[arg(long, default_value = "0.05",
            long_help = "P-value cutoff for the volcano labeling threshold.\n\
                Only affects the reported count of genes above\n\
                -log10(alpha); every gene is always written to the output.")]
        alpha: f64,
    },
}
