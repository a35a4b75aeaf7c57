// DCT module - type-II discrete cosine transform
//
// X[k] = c_k * Σ_i x[i] * cos(π k (2i + 1) / 2N),   k < num_outputs <= N
//
// Orthonormal scaling uses c_0 = sqrt(1/N) and c_k = sqrt(2/N); the plain
// variant uses c_k = 1. The cosine table is computed once per transform.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::FeatureError;

/// Scaling applied to DCT coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DctNormalization {
    #[default]
    Orthonormal,
    Unnormalized,
}

/// DCT-II with a fixed input and output length
#[derive(Debug, Clone)]
pub struct Dct {
    input_len: usize,
    output_len: usize,
    /// Row k holds c_k * cos(π k (2i + 1) / 2N) for every input index i
    basis: Vec<Vec<f64>>,
}

impl Dct {
    /// Prepare a transform of `input_len` values into `output_len` coefficients
    ///
    /// # Errors
    /// `InvalidConfig` for an empty input, `DimensionMismatch` when more
    /// outputs than inputs are requested.
    pub fn new(
        input_len: usize,
        output_len: usize,
        normalization: DctNormalization,
    ) -> Result<Self, FeatureError> {
        if input_len == 0 {
            return Err(FeatureError::InvalidConfig {
                reason: "DCT input length must be greater than 0".to_string(),
            });
        }
        if output_len > input_len {
            return Err(FeatureError::DimensionMismatch {
                stage: "dct",
                expected: input_len,
                actual: output_len,
            });
        }

        let n = input_len as f64;
        let basis = (0..output_len)
            .map(|k| {
                let scale = match normalization {
                    DctNormalization::Orthonormal if k == 0 => (1.0 / n).sqrt(),
                    DctNormalization::Orthonormal => (2.0 / n).sqrt(),
                    DctNormalization::Unnormalized => 1.0,
                };
                (0..input_len)
                    .map(|i| scale * (PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n)).cos())
                    .collect()
            })
            .collect();

        Ok(Self {
            input_len,
            output_len,
            basis,
        })
    }

    /// Project `input` onto the cosine basis
    pub fn transform(&self, input: &[f64]) -> Result<Vec<f64>, FeatureError> {
        if input.len() != self.input_len {
            return Err(FeatureError::DimensionMismatch {
                stage: "dct",
                expected: self.input_len,
                actual: input.len(),
            });
        }

        Ok(self
            .basis
            .iter()
            .map(|row| row.iter().zip(input).map(|(c, x)| c * x).sum())
            .collect())
    }

    pub fn input_len(&self) -> usize {
        self.input_len
    }

    pub fn output_len(&self) -> usize {
        self.output_len
    }
}
