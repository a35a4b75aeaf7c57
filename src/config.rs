//! Configuration management for feature extraction runs
//!
//! This module provides configuration loading from JSON files so frame
//! sizes, filter counts and numeric constants can be changed per dataset
//! without recompiling. Missing or malformed files fall back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::features::{DctNormalization, LifterFormula, MelScale};
use crate::wave::{EightBitPacking, StereoChannel};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mfcc: MfccConfig,
    pub wave: WaveConfig,
}

/// MFCC pipeline parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MfccConfig {
    /// Samples per analysis frame (the spectrum kernel size)
    pub frame_size: usize,
    /// Samples shared by consecutive frames
    pub frame_overlap: usize,
    /// Number of triangular mel filters
    pub num_filters: usize,
    /// Length of each feature vector, energy term included
    pub num_features: usize,
    pub lifter: LifterConfig,
    pub dct_normalization: DctNormalization,
    pub mel_scale: MelScale,
    /// Floor used in place of log(0)
    pub epsilon: f64,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            frame_size: 512,
            frame_overlap: 0,
            num_filters: 26,
            num_features: 12,
            lifter: LifterConfig::default(),
            dct_normalization: DctNormalization::default(),
            mel_scale: MelScale::default(),
            epsilon: f64::EPSILON,
        }
    }
}

/// Cepstral lifter parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifterConfig {
    /// Lifter parameter L
    pub coefficient: f64,
    pub formula: LifterFormula,
}

impl Default for LifterConfig {
    fn default() -> Self {
        Self {
            coefficient: 22.0,
            formula: LifterFormula::default(),
        }
    }
}

/// Wave container reading/writing options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Channel used when reading stereo files
    pub channel: StereoChannel,
    /// Bytes decoded per streaming read
    pub part_size: usize,
    pub eight_bit_packing: EightBitPacking,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            channel: StereoChannel::default(),
            part_size: 4096,
            eight_bit_packing: EightBitPacking::default(),
        }
    }
}

impl AppConfig {
    /// Read an extraction config from a JSON file
    ///
    /// Sections and fields absent from the file keep their defaults. An
    /// unreadable file or invalid JSON yields `AppConfig::default()` and a
    /// warning naming the file, so a bad path never aborts a batch run.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let parsed = fs::read_to_string(path)
            .map_err(|err| format!("cannot read file ({})", err))
            .and_then(|contents| {
                serde_json::from_str::<Self>(&contents)
                    .map_err(|err| format!("invalid JSON ({})", err))
            });

        match parsed {
            Ok(config) => {
                log::info!(
                    "[Config] {:?}: frame_size={} filters={} features={}",
                    path,
                    config.mfcc.frame_size,
                    config.mfcc.num_filters,
                    config.mfcc.num_features
                );
                config
            }
            Err(reason) => {
                log::warn!("[Config] {:?}: {}; using defaults", path, reason);
                Self::default()
            }
        }
    }
}
