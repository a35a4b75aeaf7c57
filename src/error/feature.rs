// Feature extraction error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Feature error code constants
///
/// Error code range: 2001-2003
pub struct FeatureErrorCodes {}

impl FeatureErrorCodes {
    /// Two pipeline stages disagree on a vector length
    pub const DIMENSION_MISMATCH: i32 = 2001;

    /// Source sample rate differs from the one the filter bank was built for
    pub const SAMPLE_RATE_MISMATCH: i32 = 2002;

    /// Pipeline parameters are unusable
    pub const INVALID_CONFIG: i32 = 2003;
}

/// Log a feature extraction error with structured context
pub fn log_feature_error(err: &FeatureError, context: &str) {
    error!(
        "Feature error in {}: code={}, component=Mfcc, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised by the feature extraction pipeline
///
/// All variants indicate a configuration or programming error (mismatched
/// pipeline parameters), never a property of the audio itself. Silent or
/// degenerate audio is handled numerically and does not produce an error.
///
/// Error code range: 2001-2003
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureError {
    /// A stage received a vector of the wrong length
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Pipeline reused on a source with a different sample rate
    SampleRateMismatch { expected: u32, actual: u32 },

    /// Construction parameters are out of range
    InvalidConfig { reason: String },
}

impl ErrorCode for FeatureError {
    fn code(&self) -> i32 {
        match self {
            FeatureError::DimensionMismatch { .. } => FeatureErrorCodes::DIMENSION_MISMATCH,
            FeatureError::SampleRateMismatch { .. } => FeatureErrorCodes::SAMPLE_RATE_MISMATCH,
            FeatureError::InvalidConfig { .. } => FeatureErrorCodes::INVALID_CONFIG,
        }
    }

    fn message(&self) -> String {
        match self {
            FeatureError::DimensionMismatch {
                stage,
                expected,
                actual,
            } => {
                format!(
                    "Dimension mismatch in {}: expected {}, got {}",
                    stage, expected, actual
                )
            }
            FeatureError::SampleRateMismatch { expected, actual } => {
                format!(
                    "Sample rate mismatch: pipeline built for {} Hz, source is {} Hz",
                    expected, actual
                )
            }
            FeatureError::InvalidConfig { reason } => {
                format!("Invalid configuration: {}", reason)
            }
        }
    }
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FeatureError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for FeatureError {}
