// Mfcc module - per-frame MFCC computation
//
// Pipeline for one frame of frame_size samples:
// 1. spectrum kernel (input zero-padded or truncated to frame_size)
// 2. periodogram: |X[k]|² / frame_size for the first ceil(N/2) bins
// 3. energy = Σ periodogram
// 4. mel filter bank -> num_filters energies
// 5. natural log, with ln(epsilon) standing in for non-positive values
// 6. DCT-II -> num_features coefficients
// 7. lifter
// 8. coefficient 0 replaced by ln(energy) (ln(epsilon) when energy is 0)
//
// A pipeline is tied to one frame size and one sample rate; the filter
// bank, DCT basis and lifter weights are built once and reused per frame.

use rustfft::num_complex::Complex;

use super::dct::Dct;
use super::fft::{RustFftKernel, SpectrumKernel};
use super::filter_bank::MelFilterBank;
use super::lifter::Lifter;
use crate::config::MfccConfig;
use crate::error::{log_feature_error, FeatureError};
use crate::source::{FramesCollection, SignalSource};

/// Feature vector: log-energy followed by liftered cepstral coefficients
pub type FeatureVector = Vec<f64>;

/// MFCC extractor for frames of one fixed length
pub struct Mfcc {
    input_size: usize,
    sample_rate: u32,
    num_features: usize,
    epsilon: f64,
    kernel: Box<dyn SpectrumKernel>,
    filter_bank: MelFilterBank,
    dct: Dct,
    lifter: Lifter,
}

impl Mfcc {
    /// Create an extractor for `sample_rate` Hz audio using the rustfft kernel
    pub fn new(sample_rate: u32, config: &MfccConfig) -> Result<Self, FeatureError> {
        Self::with_kernel(sample_rate, config, Box::new(RustFftKernel::new()))
    }

    /// Create an extractor with a caller-supplied spectrum kernel
    ///
    /// # Errors
    /// `InvalidConfig` for a zero frame size, sample rate or filter count, or
    /// a non-positive epsilon; `DimensionMismatch` when more features than
    /// filters are requested.
    pub fn with_kernel(
        sample_rate: u32,
        config: &MfccConfig,
        kernel: Box<dyn SpectrumKernel>,
    ) -> Result<Self, FeatureError> {
        if config.frame_size == 0 {
            return Err(FeatureError::InvalidConfig {
                reason: "frame size must be greater than 0".to_string(),
            });
        }
        if config.num_features == 0 {
            return Err(FeatureError::InvalidConfig {
                reason: "at least one feature is required".to_string(),
            });
        }
        if !(config.epsilon > 0.0) {
            return Err(FeatureError::InvalidConfig {
                reason: format!("epsilon must be positive (got {})", config.epsilon),
            });
        }

        let filter_bank = MelFilterBank::spanning_nyquist(
            sample_rate,
            config.frame_size,
            config.num_filters,
            config.mel_scale,
        )?;
        let dct = Dct::new(
            config.num_filters,
            config.num_features,
            config.dct_normalization,
        )?;
        let lifter = Lifter::new(
            config.num_features,
            config.lifter.coefficient,
            config.lifter.formula,
        );

        tracing::debug!(
            "[Mfcc] frame_size={} sample_rate={} filters={} features={}",
            config.frame_size,
            sample_rate,
            config.num_filters,
            config.num_features
        );

        Ok(Self {
            input_size: config.frame_size,
            sample_rate,
            num_features: config.num_features,
            epsilon: config.epsilon,
            kernel,
            filter_bank,
            dct,
            lifter,
        })
    }

    /// Compute the feature vector of one frame held by `source`
    ///
    /// # Errors
    /// `SampleRateMismatch` if `source` was recorded at a different rate than
    /// the pipeline was built for.
    pub fn calculate<S: SignalSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<FeatureVector, FeatureError> {
        if source.sample_rate() != self.sample_rate {
            let err = FeatureError::SampleRateMismatch {
                expected: self.sample_rate,
                actual: source.sample_rate(),
            };
            log_feature_error(&err, "Mfcc::calculate");
            return Err(err);
        }
        self.calculate_frame(source.to_array())
    }

    /// Compute the feature vector of raw `samples` at the pipeline's sample rate
    pub fn calculate_frame(&self, samples: &[f64]) -> Result<FeatureVector, FeatureError> {
        let mut input = vec![0.0; self.input_size];
        let n = samples.len().min(self.input_size);
        input[..n].copy_from_slice(&samples[..n]);

        let spectrum = self.kernel.transform(&input);
        if spectrum.len() != self.input_size {
            return Err(FeatureError::DimensionMismatch {
                stage: "spectrum",
                expected: self.input_size,
                actual: spectrum.len(),
            });
        }

        let power = self.periodogram(&spectrum);
        let energy: f64 = power.iter().sum();

        let log_filtered: Vec<f64> = self
            .filter_bank
            .apply_all(&power)
            .into_iter()
            .map(|value| self.safe_ln(value))
            .collect();

        let cepstrum = self.dct.transform(&log_filtered)?;
        let mut features = self.lifter.apply(&cepstrum)?;
        features[0] = self.safe_ln(energy);

        Ok(features)
    }

    /// Compute feature vectors for every frame in `frames`
    pub fn calculate_all(
        &self,
        frames: &FramesCollection,
    ) -> Result<Vec<FeatureVector>, FeatureError> {
        frames.iter().map(|frame| self.calculate(frame)).collect()
    }

    /// Power spectrum of the first ceil(N/2) bins, scaled by 1/frame_size
    pub fn periodogram(&self, spectrum: &[Complex<f64>]) -> Vec<f64> {
        let num_coeffs = spectrum.len().div_ceil(2);
        spectrum[..num_coeffs]
            .iter()
            .map(|bin| bin.norm_sqr() / self.input_size as f64)
            .collect()
    }

    fn safe_ln(&self, value: f64) -> f64 {
        if value > 0.0 {
            value.ln()
        } else {
            self.epsilon.ln()
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn filter_bank(&self) -> &MelFilterBank {
        &self.filter_bank
    }
}
