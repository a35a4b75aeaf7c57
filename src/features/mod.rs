// Features - mel-frequency cepstral coefficient extraction
//
// Turns fixed-length frames of a signal source into feature vectors of
// log-energy plus liftered cepstral coefficients.
//
// Module organization:
// - mel: Hz <-> mel conversion
// - filter_bank: Triangular filters spaced evenly on the mel scale
// - dct: Type-II discrete cosine transform
// - lifter: Cepstral reweighting
// - fft: Spectrum kernel trait and the rustfft implementation
// - mfcc: Per-frame pipeline tying the stages together
//
// References:
// - Davis, S. & Mermelstein, P. (1980). Comparison of parametric
//   representations for monosyllabic word recognition
// - Young, S. et al. The HTK Book, section 5.6

mod dct;
mod fft;
mod filter_bank;
mod lifter;
mod mel;
mod mfcc;

pub use dct::{Dct, DctNormalization};
pub use fft::{RustFftKernel, SpectrumKernel};
pub use filter_bank::{MelFilter, MelFilterBank};
pub use lifter::{Lifter, LifterFormula};
pub use mel::{linear_to_mel, mel_to_linear, MelScale, MEL_CORNER_FREQUENCY, MEL_SCALE};
pub use mfcc::{FeatureVector, Mfcc};
