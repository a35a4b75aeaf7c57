// FFT module - spectrum kernel used by the MFCC pipeline
//
// The pipeline only needs "N real samples in, N complex bins out", so the
// kernel is a trait and the rustfft-backed implementation is one choice
// among others (tests substitute deterministic fakes).

use rustfft::{num_complex::Complex, FftPlanner};
use std::sync::{Arc, Mutex};

/// Computes a frequency-domain representation of a real frame
pub trait SpectrumKernel {
    /// Transform `input` into `input.len()` complex bins
    fn transform(&self, input: &[f64]) -> Vec<Complex<f64>>;
}

/// Forward DFT via rustfft
///
/// No window is applied; callers pass already-windowed frames.
pub struct RustFftKernel {
    fft_planner: Arc<Mutex<FftPlanner<f64>>>,
}

impl RustFftKernel {
    pub fn new() -> Self {
        Self {
            fft_planner: Arc::new(Mutex::new(FftPlanner::new())),
        }
    }
}

impl Default for RustFftKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumKernel for RustFftKernel {
    fn transform(&self, input: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> =
            input.iter().map(|&sample| Complex::new(sample, 0.0)).collect();
        if buffer.is_empty() {
            return buffer;
        }

        // planner caches plans per length, so repeated frames reuse the same plan
        let fft = {
            let mut planner = self
                .fft_planner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            planner.plan_fft_forward(buffer.len())
        };
        fft.process(&mut buffer);
        buffer
    }
}
