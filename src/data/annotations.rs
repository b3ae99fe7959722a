//! Sample annotation table (group labels and other descriptive columns)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{NCounterError, Result};

/// Descriptive sample metadata loaded from an annotation file.
///
/// Keyed by the sample identifier column (conventionally named `RCC`);
/// every other column is an arbitrary string label, e.g. a treatment group.
/// Annotations are optional per run: the pipeline takes `Option<&SampleAnnotations>`
/// everywhere and `None` is never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleAnnotations {
    /// Name of the key column the sample ids came from
    key_column: String,
    /// Sample identifiers, in file order
    sample_ids: Vec<String>,
    /// Column order as it appeared in the file (key column excluded)
    column_names: Vec<String>,
    /// Column name -> values per sample
    columns: HashMap<String, Vec<String>>,
}

impl SampleAnnotations {
    pub fn new(key_column: &str, sample_ids: Vec<String>) -> Self {
        Self {
            key_column: key_column.to_string(),
            sample_ids,
            column_names: Vec::new(),
            columns: HashMap::new(),
        }
    }

    /// Add a descriptive column; must have one value per sample
    pub fn add_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.sample_ids.len() {
            return Err(NCounterError::DimensionMismatch {
                expected: format!("{} values", self.sample_ids.len()),
                got: format!("{} values", values.len()),
            });
        }
        if !self.columns.contains_key(name) {
            self.column_names.push(name.to_string());
        }
        self.columns.insert(name.to_string(), values);
        Ok(())
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    /// Column names in file order
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn column(&self, name: &str) -> Option<&Vec<String>> {
        self.columns.get(name)
    }

    /// Value of a column for a given sample id, if both exist
    pub fn value_for_sample(&self, column: &str, sample_id: &str) -> Option<&str> {
        let idx = self.sample_ids.iter().position(|s| s == sample_id)?;
        self.columns.get(column).map(|v| v[idx].as_str())
    }

    /// Unique labels of a column (sorted)
    pub fn levels(&self, column: &str) -> Result<Vec<String>> {
        self.columns
            .get(column)
            .map(|values| {
                let mut unique: Vec<String> = values.clone();
                unique.sort();
                unique.dedup();
                unique
            })
            .ok_or_else(|| NCounterError::MissingColumn {
                column: column.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_and_lookup() {
        let mut annot = SampleAnnotations::new(
            "RCC",
            vec!["s1".to_string(), "s2".to_string(), "s3".to_string()],
        );
        annot
            .add_column(
                "group",
                vec![
                    "control".to_string(),
                    "treated".to_string(),
                    "control".to_string(),
                ],
            )
            .unwrap();

        assert_eq!(annot.levels("group").unwrap(), vec!["control", "treated"]);
        assert_eq!(annot.value_for_sample("group", "s2"), Some("treated"));
        assert_eq!(annot.value_for_sample("group", "s9"), None);
        assert!(annot.levels("missing").is_err());
    }

    #[test]
    fn test_column_length_checked() {
        let mut annot =
            SampleAnnotations::new("RCC", vec!["s1".to_string(), "s2".to_string()]);
        let result = annot.add_column("group", vec!["control".to_string()]);
        assert!(matches!(
            result,
            Err(NCounterError::DimensionMismatch { .. })
        ));
    }
}
