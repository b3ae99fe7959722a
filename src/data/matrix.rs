//! Log2-normalized expression matrix

use std::collections::HashMap;

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{NCounterError, Result};

/// Log2-transformed, housekeeping-normalized expression values.
///
/// Rows are samples, columns are endogenous + housekeeping genes. A NaN cell
/// means the gene was not measured in that sample (missing, never imputed as
/// zero). Derived once per run and never mutated afterwards, except that the
/// annotation joiner may append label columns.
#[derive(Debug, Clone)]
pub struct NormalizedMatrix {
    sample_ids: Vec<String>,
    gene_names: Vec<String>,
    /// samples x genes
    values: Array2<f64>,
    /// Annotation column order, as joined
    annotation_names: Vec<String>,
    /// Annotation column -> per-sample values; None where the left join
    /// found no matching annotation row
    annotations: HashMap<String, Vec<Option<String>>>,
}

impl NormalizedMatrix {
    pub fn new(
        sample_ids: Vec<String>,
        gene_names: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self> {
        let (n_samples, n_genes) = values.dim();
        if sample_ids.len() != n_samples {
            return Err(NCounterError::DimensionMismatch {
                expected: format!("{} sample IDs", n_samples),
                got: format!("{} sample IDs", sample_ids.len()),
            });
        }
        if gene_names.len() != n_genes {
            return Err(NCounterError::DimensionMismatch {
                expected: format!("{} gene names", n_genes),
                got: format!("{} gene names", gene_names.len()),
            });
        }
        Ok(Self {
            sample_ids,
            gene_names,
            values,
            annotation_names: Vec::new(),
            annotations: HashMap::new(),
        })
    }

    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    pub fn n_genes(&self) -> usize {
        self.gene_names.len()
    }

    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    pub fn gene_names(&self) -> &[String] {
        &self.gene_names
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn gene_index(&self, gene: &str) -> Option<usize> {
        self.gene_names.iter().position(|g| g == gene)
    }

    pub fn sample_index(&self, sample_id: &str) -> Option<usize> {
        self.sample_ids.iter().position(|s| s == sample_id)
    }

    /// Log2 values of one gene across samples, or MissingGene
    pub fn gene_column(&self, gene: &str) -> Result<ArrayView1<'_, f64>> {
        let idx = self
            .gene_index(gene)
            .ok_or_else(|| NCounterError::MissingGene {
                gene: gene.to_string(),
            })?;
        Ok(self.values.column(idx))
    }

    /// Append an annotation column (one value per sample, None = no match)
    pub fn add_annotation(&mut self, name: &str, values: Vec<Option<String>>) -> Result<()> {
        if values.len() != self.sample_ids.len() {
            return Err(NCounterError::DimensionMismatch {
                expected: format!("{} values", self.sample_ids.len()),
                got: format!("{} values", values.len()),
            });
        }
        if !self.annotations.contains_key(name) {
            self.annotation_names.push(name.to_string());
        }
        self.annotations.insert(name.to_string(), values);
        Ok(())
    }

    /// Joined annotation column names, in join order
    pub fn annotation_names(&self) -> &[String] {
        &self.annotation_names
    }

    pub fn annotation(&self, name: &str) -> Option<&Vec<Option<String>>> {
        self.annotations.get(name)
    }

    /// Sample row indices whose annotation column equals `label`
    pub fn samples_with_label(&self, column: &str, label: &str) -> Result<Vec<usize>> {
        let values = self
            .annotations
            .get(column)
            .ok_or_else(|| NCounterError::MissingColumn {
                column: column.to_string(),
            })?;
        Ok(values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.as_deref() == Some(label))
            .map(|(i, _)| i)
            .collect())
    }
}
