// Wave MFCC - RIFF/WAVE codec and MFCC feature extraction
//
// wave reads and writes 8/16-bit PCM files, source exposes decoded samples
// as signal sources and frames, features computes MFCC vectors per frame.

pub mod config;
pub mod error;
pub mod features;
pub mod source;
pub mod wave;

pub use config::{AppConfig, MfccConfig, WaveConfig};
pub use error::{ErrorCode, FeatureError, FormatError};
pub use features::{FeatureVector, Mfcc};
pub use source::{FramesCollection, SignalBuffer, SignalSource};
pub use wave::{EightBitPacking, StereoChannel, WaveFile, WaveHeader};
