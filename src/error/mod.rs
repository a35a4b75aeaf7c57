// Error types for wave decoding and feature extraction
//
// This module defines custom error types for container I/O and the MFCC
// pipeline, each carrying a stable numeric code for programmatic handling.

mod feature;
mod format;

pub use feature::{log_feature_error, FeatureError, FeatureErrorCodes};
pub use format::{log_format_error, FormatError, FormatErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so callers can report failures consistently
/// regardless of which component raised them.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
