// Filter bank module - triangular filters spaced evenly on the mel scale
//
// For N filters the band [0, Nyquist] is cut into N + 2 equally mel-spaced
// points. Filter i takes points i, i + 1 and i + 2 as its left edge, peak
// and right edge, so each filter's peak is its neighbours' shared edge.
// Points are mapped to spectrum bins as floor(f * frame_size / sample_rate).

use super::mel::MelScale;
use crate::error::FeatureError;

/// One triangular weighting function over spectrum bins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MelFilter {
    left: usize,
    center: usize,
    right: usize,
}

impl MelFilter {
    /// Build a filter from bin edges; requires `left <= center <= right`
    pub fn new(left: usize, center: usize, right: usize) -> Self {
        debug_assert!(left <= center && center <= right);
        Self {
            left,
            center,
            right,
        }
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn center(&self) -> usize {
        self.center
    }

    pub fn right(&self) -> usize {
        self.right
    }

    /// Weight at `bin`: 0 outside [left, right], 1 at center, linear between
    pub fn weight(&self, bin: usize) -> f64 {
        if bin < self.left || bin > self.right {
            0.0
        } else if bin == self.center {
            1.0
        } else if bin < self.center {
            (bin - self.left) as f64 / (self.center - self.left) as f64
        } else {
            (self.right - bin) as f64 / (self.right - self.center) as f64
        }
    }

    /// Energy captured under the triangle: Σ spectrum[k] · weight(k)
    pub fn apply(&self, spectrum: &[f64]) -> f64 {
        if self.left >= spectrum.len() {
            return 0.0;
        }
        let last = self.right.min(spectrum.len() - 1);
        (self.left..=last)
            .map(|bin| spectrum[bin] * self.weight(bin))
            .sum()
    }
}

/// A bank of mel filters tied to one sample rate and frame size
#[derive(Debug, Clone)]
pub struct MelFilterBank {
    filters: Vec<MelFilter>,
    sample_rate: u32,
    frame_size: usize,
}

impl MelFilterBank {
    /// Build `num_filters` filters of `filter_width` mels each
    ///
    /// Consecutive filters start `filter_width / 2` mels apart, so a width of
    /// `2 * mel(Nyquist) / (num_filters + 1)` makes the bank span exactly
    /// [0, Nyquist]; see [`MelFilterBank::spanning_nyquist`].
    pub fn new(
        sample_rate: u32,
        frame_size: usize,
        filter_width: f64,
        num_filters: usize,
        mel_scale: MelScale,
    ) -> Result<Self, FeatureError> {
        if sample_rate == 0 || frame_size == 0 || num_filters == 0 {
            return Err(FeatureError::InvalidConfig {
                reason: format!(
                    "filter bank needs non-zero sample rate, frame size and filter count \
                     (got {} Hz, {} samples, {} filters)",
                    sample_rate, frame_size, num_filters
                ),
            });
        }
        if !(filter_width.is_finite() && filter_width > 0.0) {
            return Err(FeatureError::InvalidConfig {
                reason: format!("filter width must be positive (got {})", filter_width),
            });
        }

        let to_bin = |mel: f64| -> usize {
            let linear = mel_scale.mel_to_linear(mel);
            (linear * frame_size as f64 / sample_rate as f64).floor().max(0.0) as usize
        };

        let half_width = filter_width / 2.0;
        let points: Vec<usize> = (0..num_filters + 2)
            .map(|j| to_bin(j as f64 * half_width))
            .collect();
        let filters = points
            .windows(3)
            .map(|edges| MelFilter::new(edges[0], edges[1], edges[2]))
            .collect();

        Ok(Self {
            filters,
            sample_rate,
            frame_size,
        })
    }

    /// Bank of `num_filters` filters covering [0, sample_rate / 2]
    pub fn spanning_nyquist(
        sample_rate: u32,
        frame_size: usize,
        num_filters: usize,
        mel_scale: MelScale,
    ) -> Result<Self, FeatureError> {
        let mel_low = mel_scale.linear_to_mel(0.0);
        let mel_high = mel_scale.linear_to_mel(sample_rate as f64 / 2.0);
        let filter_width = 2.0 * (mel_high - mel_low) / (num_filters as f64 + 1.0);
        Self::new(sample_rate, frame_size, filter_width, num_filters, mel_scale)
    }

    /// Apply every filter to a power spectrum
    pub fn apply_all(&self, spectrum: &[f64]) -> Vec<f64> {
        self.filters
            .iter()
            .map(|filter| filter.apply(spectrum))
            .collect()
    }

    pub fn filters(&self) -> &[MelFilter] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }
}
