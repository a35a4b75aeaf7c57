// Signal sources - sample containers consumed by the feature pipeline
//
// A signal source is anything that can hand out an ordered run of centered
// amplitude samples together with the sample rate and bit depth they were
// recorded at. In-memory buffers and decoded wave files both implement it.

mod frames;

pub use frames::FramesCollection;

/// Read-only view over a run of audio samples
///
/// Samples are zero-centered: 16-bit audio spans roughly ±32768 and 8-bit
/// audio ±128. No rescaling to [-1, 1] is applied.
pub trait SignalSource {
    /// Sample rate in Hz
    fn sample_rate(&self) -> u32;

    /// Bit depth the samples were recorded at
    fn bits_per_sample(&self) -> u16;

    /// All samples as a contiguous slice
    fn to_array(&self) -> &[f64];

    /// Number of samples
    fn length(&self) -> usize {
        self.to_array().len()
    }

    /// Sample at `index`
    ///
    /// # Panics
    /// Panics if `index >= self.length()`, like slice indexing.
    fn sample(&self, index: usize) -> f64 {
        self.to_array()[index]
    }

    /// Number of samples (alias of `length` kept for encoder call sites)
    fn sample_count(&self) -> usize {
        self.length()
    }
}

/// In-memory signal source
///
/// Owns one channel of samples. Produced by frame slicing, streaming decode
/// and directly by callers that synthesize audio.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
    bits_per_sample: u16,
}

impl SignalBuffer {
    /// Wrap `samples` recorded at `sample_rate` Hz with `bits_per_sample` depth
    pub fn new(samples: Vec<f64>, sample_rate: u32, bits_per_sample: u16) -> Self {
        Self {
            samples,
            sample_rate,
            bits_per_sample,
        }
    }

    /// Consume the buffer and return the samples
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

impl SignalSource for SignalBuffer {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    fn to_array(&self) -> &[f64] {
        &self.samples
    }
}
