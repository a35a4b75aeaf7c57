// Mel module - linear <-> mel frequency conversion
//
// mel(f) = scale * ln(1 + f / corner)
// f(m)   = corner * (exp(m / scale) - 1)

use serde::{Deserialize, Serialize};

/// Default mel scale factor
pub const MEL_SCALE: f64 = 1127.01048;

/// Default corner frequency in Hz
pub const MEL_CORNER_FREQUENCY: f64 = 700.0;

/// Constants of the mel warping curve
///
/// Held as a value so filter banks with non-standard warping can be built
/// side by side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MelScale {
    pub scale: f64,
    pub corner_frequency: f64,
}

impl Default for MelScale {
    fn default() -> Self {
        Self {
            scale: MEL_SCALE,
            corner_frequency: MEL_CORNER_FREQUENCY,
        }
    }
}

impl MelScale {
    /// Convert a frequency in Hz to mels
    pub fn linear_to_mel(&self, linear_frequency: f64) -> f64 {
        self.scale * (1.0 + linear_frequency / self.corner_frequency).ln()
    }

    /// Convert mels back to Hz
    pub fn mel_to_linear(&self, mel_frequency: f64) -> f64 {
        self.corner_frequency * ((mel_frequency / self.scale).exp() - 1.0)
    }
}

/// Convert Hz to mels with the default constants
pub fn linear_to_mel(linear_frequency: f64) -> f64 {
    MelScale::default().linear_to_mel(linear_frequency)
}

/// Convert mels to Hz with the default constants
pub fn mel_to_linear(mel_frequency: f64) -> f64 {
    MelScale::default().mel_to_linear(mel_frequency)
}
