//! Left join of sample annotations onto the normalized matrix

use crate::data::{NormalizedMatrix, SampleAnnotations};
use crate::error::Result;

/// Join annotation columns onto the matrix, keyed by sample id.
///
/// The `None` branch is explicit: absent annotations return the matrix
/// unchanged, same columns and rows. This is deliberately not a check on
/// whether an annotation table is "empty" — a present table with zero extra
/// columns also just adds nothing. Samples without a matching annotation
/// row keep every original column with their annotation values unset.
pub fn join(
    mut matrix: NormalizedMatrix,
    annotations: Option<&SampleAnnotations>,
) -> Result<NormalizedMatrix> {
    let Some(annotations) = annotations else {
        return Ok(matrix);
    };

    for column in annotations.column_names().to_vec() {
        let values: Vec<Option<String>> = matrix
            .sample_ids()
            .iter()
            .map(|sample_id| {
                annotations
                    .value_for_sample(&column, sample_id)
                    .map(|v| v.to_string())
            })
            .collect();

        let unmatched = values.iter().filter(|v| v.is_none()).count();
        if unmatched > 0 {
            log::warn!(
                "{} of {} samples have no '{}' annotation",
                unmatched,
                matrix.n_samples(),
                column
            );
        }
        matrix.add_annotation(&column, values)?;
    }

    Ok(matrix)
}
