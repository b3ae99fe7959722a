//! Data structures for nCounter runs

mod annotations;
mod matrix;
mod record;

pub use annotations::SampleAnnotations;
pub use matrix::NormalizedMatrix;
pub use record::{CodeClass, RawCountRecord, RawCountTable};
