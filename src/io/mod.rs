//! Input/output for nCounter runs

mod annotations;
mod export;
mod rcc;
mod repository;

pub use annotations::{find_annotations, read_annotations, ANNOTATIONS_MARKER, SAMPLE_KEY_COLUMN};
pub use export::{read_matrix, write_de_results, write_matrix};
pub use rcc::{parse_rcc, parse_rcc_dir, sample_id_from_filename, RCC_HEADER_LINES, RCC_MARKER};
pub use repository::ingest;
