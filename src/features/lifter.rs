// Lifter module - sinusoidal reweighting of cepstral coefficients

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::FeatureError;

/// Weighting curve used by the lifter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifterFormula {
    /// w[c] = 1 + (L / 2) * sin(π c / L)
    #[default]
    Sinusoidal,
    /// w[c] = sin(π c / num_coeffs); L is ignored
    SineWindow,
}

/// Fixed per-coefficient weights applied element-wise
#[derive(Debug, Clone)]
pub struct Lifter {
    weights: Vec<f64>,
}

impl Lifter {
    /// Precompute weights for `num_coeffs` coefficients
    ///
    /// With the sinusoidal formula a non-positive `coefficient` disables
    /// liftering (all weights 1).
    pub fn new(num_coeffs: usize, coefficient: f64, formula: LifterFormula) -> Self {
        let weights = (0..num_coeffs)
            .map(|c| {
                let c = c as f64;
                match formula {
                    LifterFormula::Sinusoidal if coefficient > 0.0 => {
                        1.0 + (coefficient / 2.0) * (PI * c / coefficient).sin()
                    }
                    LifterFormula::Sinusoidal => 1.0,
                    LifterFormula::SineWindow => (PI * c / num_coeffs as f64).sin(),
                }
            })
            .collect();

        Self { weights }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Multiply each coefficient by its weight
    pub fn apply(&self, features: &[f64]) -> Result<Vec<f64>, FeatureError> {
        if features.len() != self.weights.len() {
            return Err(FeatureError::DimensionMismatch {
                stage: "lifter",
                expected: self.weights.len(),
                actual: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(&self.weights)
            .map(|(f, w)| f * w)
            .collect())
    }
}
