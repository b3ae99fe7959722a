//! Positive-control titration series
//!
//! The panel ships six positive probes at known input concentrations.
//! Probe names in RCC files carry the concentration as a suffix, e.g.
//! `POS_A(128)`, so probes are matched by name prefix. The series is a
//! versioned lookup so future probe panels can substitute their own table
//! instead of editing constants.

use serde::{Deserialize, Serialize};

/// One step of the titration: probe name prefix and input concentration (fM)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitrationStep {
    pub probe: String,
    pub concentration: f64,
}

/// Ordered positive-control titration series, highest concentration first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitrationSeries {
    steps: Vec<TitrationStep>,
}

impl TitrationSeries {
    /// Build a series from arbitrary steps; ordering by descending
    /// concentration is established here, not assumed of the caller.
    pub fn new(mut steps: Vec<TitrationStep>) -> Self {
        steps.sort_by(|a, b| {
            b.concentration
                .partial_cmp(&a.concentration)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { steps }
    }

    /// Steps in descending concentration order
    pub fn steps(&self) -> &[TitrationStep] {
        &self.steps
    }

    /// Position of a probe gene name in the series, matched by prefix
    /// (`POS_A(128)` matches the `POS_A` step)
    pub fn position(&self, gene: &str) -> Option<usize> {
        self.steps.iter().position(|s| gene.starts_with(&s.probe))
    }
}

impl Default for TitrationSeries {
    /// The standard nCounter series: 128, 32, 8, 2, 0.5, 0.125 fM
    fn default() -> Self {
        let steps = [
            ("POS_A", 128.0),
            ("POS_B", 32.0),
            ("POS_C", 8.0),
            ("POS_D", 2.0),
            ("POS_E", 0.5),
            ("POS_F", 0.125),
        ];
        Self::new(
            steps
                .iter()
                .map(|(probe, concentration)| TitrationStep {
                    probe: probe.to_string(),
                    concentration: *concentration,
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_series_order() {
        let series = TitrationSeries::default();
        let concentrations: Vec<f64> =
            series.steps().iter().map(|s| s.concentration).collect();
        assert_eq!(concentrations, vec![128.0, 32.0, 8.0, 2.0, 0.5, 0.125]);
    }

    #[test]
    fn test_prefix_match() {
        let series = TitrationSeries::default();
        assert_eq!(series.position("POS_A(128)"), Some(0));
        assert_eq!(series.position("POS_F(0.125)"), Some(5));
        assert_eq!(series.position("NEG_A(0)"), None);
    }

    #[test]
    fn test_new_sorts_descending() {
        let series = TitrationSeries::new(vec![
            TitrationStep {
                probe: "P_LOW".to_string(),
                concentration: 1.0,
            },
            TitrationStep {
                probe: "P_HIGH".to_string(),
                concentration: 64.0,
            },
        ]);
        assert_eq!(series.steps()[0].probe, "P_HIGH");
    }
}
