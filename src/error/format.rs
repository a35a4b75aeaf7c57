// Container format error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Format error code constants
///
/// Error code range: 1001-1008
pub struct FormatErrorCodes {}

impl FormatErrorCodes {
    /// File is missing or could not be opened
    pub const CANNOT_OPEN: i32 = 1001;

    /// First four bytes are not "RIFF"
    pub const NOT_RIFF: i32 = 1002;

    /// Read or write failed mid-stream
    pub const IO: i32 = 1003;

    /// Streaming read attempted before the header was read
    pub const STREAM_NOT_OPEN: i32 = 1004;

    /// Header declares a block alignment of zero
    pub const ZERO_BLOCK_ALIGN: i32 = 1005;

    /// Source cannot be encoded at its declared bit depth
    pub const UNSUPPORTED_BIT_DEPTH: i32 = 1006;

    /// Streaming read requested with a part size of zero bytes
    pub const ZERO_PART_SIZE: i32 = 1007;

    /// A derived header field does not fit its 32-bit slot
    pub const HEADER_OVERFLOW: i32 = 1008;
}

/// Log a format error with structured context
///
/// Logs the numeric code, the component and the message so failures in
/// batch runs can be traced back to the file operation that caused them.
pub fn log_format_error(err: &FormatError, context: &str) {
    error!(
        "Format error in {}: code={}, component=WaveCodec, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while reading or writing the wave container
///
/// These are always surfaced to the caller and are fatal for the file
/// operation that raised them.
///
/// Error code range: 1001-1008
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// File is missing or unreadable
    CannotOpen { path: String, reason: String },

    /// Magic bytes at offset 0 are not "RIFF"
    NotRiff { found: [u8; 4] },

    /// Underlying read/write failure
    Io { details: String },

    /// `read_part` called before `read_header`
    StreamNotOpen,

    /// Header block alignment is zero, so no sample frames can be sized
    ZeroBlockAlign,

    /// Source reports a bit depth that cannot be written
    UnsupportedBitDepth { bits: u16 },

    /// Streaming part size is zero, so the cursor could never advance
    ZeroPartSize,

    /// `field` would exceed u32::MAX for the requested layout
    HeaderOverflow { field: &'static str },
}

impl ErrorCode for FormatError {
    fn code(&self) -> i32 {
        match self {
            FormatError::CannotOpen { .. } => FormatErrorCodes::CANNOT_OPEN,
            FormatError::NotRiff { .. } => FormatErrorCodes::NOT_RIFF,
            FormatError::Io { .. } => FormatErrorCodes::IO,
            FormatError::StreamNotOpen => FormatErrorCodes::STREAM_NOT_OPEN,
            FormatError::ZeroBlockAlign => FormatErrorCodes::ZERO_BLOCK_ALIGN,
            FormatError::UnsupportedBitDepth { .. } => FormatErrorCodes::UNSUPPORTED_BIT_DEPTH,
            FormatError::ZeroPartSize => FormatErrorCodes::ZERO_PART_SIZE,
            FormatError::HeaderOverflow { .. } => FormatErrorCodes::HEADER_OVERFLOW,
        }
    }

    fn message(&self) -> String {
        match self {
            FormatError::CannotOpen { path, reason } => {
                format!("cannot open {}: {}", path, reason)
            }
            FormatError::NotRiff { found } => {
                format!(
                    "not a RIFF container (found {:?})",
                    String::from_utf8_lossy(found)
                )
            }
            FormatError::Io { details } => format!("I/O error: {}", details),
            FormatError::StreamNotOpen => {
                "Stream not open. Call read_header() first.".to_string()
            }
            FormatError::ZeroBlockAlign => "Header declares zero block alignment".to_string(),
            FormatError::UnsupportedBitDepth { bits } => {
                format!("Cannot encode samples at {} bits per sample", bits)
            }
            FormatError::ZeroPartSize => "Part size must be at least one byte".to_string(),
            FormatError::HeaderOverflow { field } => {
                format!("Header field {} does not fit in 32 bits", field)
            }
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FormatError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for FormatError {}

/// Convert from std::io::Error to FormatError
impl From<std::io::Error> for FormatError {
    fn from(err: std::io::Error) -> Self {
        FormatError::Io {
            details: err.to_string(),
        }
    }
}
