// Frames module - split a signal into equal-length analysis frames

use super::{SignalBuffer, SignalSource};
use crate::error::FeatureError;

/// Equal-length frames cut from a signal source
///
/// Only full frames are produced; a trailing run shorter than one frame is
/// dropped. With `overlap` samples shared between consecutive frames the
/// frame count is `(len - overlap) / (frame - overlap)`.
#[derive(Debug, Clone)]
pub struct FramesCollection {
    frames: Vec<SignalBuffer>,
    samples_per_frame: usize,
}

impl FramesCollection {
    /// Divide `source` into frames of `samples_per_frame`, overlapping by `overlap`
    ///
    /// # Errors
    /// `InvalidConfig` when the frame is empty or the overlap is not smaller
    /// than the frame.
    pub fn new<S: SignalSource + ?Sized>(
        source: &S,
        samples_per_frame: usize,
        overlap: usize,
    ) -> Result<Self, FeatureError> {
        if samples_per_frame == 0 {
            return Err(FeatureError::InvalidConfig {
                reason: "frame size must be greater than 0".to_string(),
            });
        }
        if overlap >= samples_per_frame {
            return Err(FeatureError::InvalidConfig {
                reason: format!(
                    "frame overlap ({}) must be smaller than frame size ({})",
                    overlap, samples_per_frame
                ),
            });
        }

        let samples = source.to_array();
        let step = samples_per_frame - overlap;
        let count = if samples.len() > overlap {
            (samples.len() - overlap) / step
        } else {
            0
        };

        let frames = (0..count)
            .map(|i| {
                let start = i * step;
                SignalBuffer::new(
                    samples[start..start + samples_per_frame].to_vec(),
                    source.sample_rate(),
                    source.bits_per_sample(),
                )
            })
            .collect();

        Ok(Self {
            frames,
            samples_per_frame,
        })
    }

    /// Number of frames
    pub fn count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn samples_per_frame(&self) -> usize {
        self.samples_per_frame
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SignalBuffer> {
        self.frames.iter()
    }
}

impl<'a> IntoIterator for &'a FramesCollection {
    type Item = &'a SignalBuffer;
    type IntoIter = std::slice::Iter<'a, SignalBuffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl IntoIterator for FramesCollection {
    type Item = SignalBuffer;
    type IntoIter = std::vec::IntoIter<SignalBuffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}
