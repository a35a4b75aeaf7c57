// Wave container support
//
// Module organization:
// - header: fixed 44-byte RIFF/WAVE header
// - codec: byte-level decode/encode and the streaming cursor
// - wave_file: file-backed signal source built on the codec

mod codec;
mod header;
mod wave_file;

pub use codec::{DecodedChannels, WaveFileHandler};
pub use header::{WaveHeader, HEADER_SIZE, PCM_FORMAT_TAG};
pub use wave_file::WaveFile;

use serde::{Deserialize, Serialize};

/// Which channel backs a file source when reading stereo recordings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StereoChannel {
    #[default]
    Left,
    Right,
}

/// Byte order used when packing two 8-bit samples into one word on save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EightBitPacking {
    /// First sample in the low byte; what the decoder expects, so files round-trip
    #[default]
    Sequential,
    /// First sample in the high byte, matching files written by older tooling
    HighByteFirst,
}
