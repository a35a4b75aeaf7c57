// WaveFile - file-backed signal source
//
// Two modes:
// - eager: `open` decodes the whole payload and keeps one channel
// - streaming: `open_streaming` reads only the header; `load_next` then
//   decodes the payload part by part through the handler's cursor

use std::path::{Path, PathBuf};

use super::codec::{DecodedChannels, WaveFileHandler};
use super::header::WaveHeader;
use super::{EightBitPacking, StereoChannel};
use crate::error::{log_format_error, FormatError};
use crate::source::{SignalBuffer, SignalSource};

/// A wave file exposed as a signal source
#[derive(Debug)]
pub struct WaveFile {
    path: PathBuf,
    handler: WaveFileHandler,
    header: WaveHeader,
    data: Vec<f64>,
    part_size: usize,
}

impl WaveFile {
    /// Open `path` and decode it immediately
    ///
    /// For stereo files `channel` selects which channel is kept; mono files
    /// always use their single channel.
    pub fn open<P: AsRef<Path>>(path: P, channel: StereoChannel) -> Result<Self, FormatError> {
        let mut handler = WaveFileHandler::new(path.as_ref());
        let (header, channels) = handler
            .read_all_channels()
            .inspect_err(|err| log_format_error(err, "WaveFile::open"))?;
        let data = select_channel(channels, channel);

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            handler,
            header,
            data,
            part_size: header.wave_size as usize,
        })
    }

    /// Open `path` for part-by-part decoding of `part_size` bytes at a time
    ///
    /// Only the header is read; the source holds no samples until parts are
    /// pulled with [`WaveFile::load_next`].
    ///
    /// # Errors
    /// `ZeroPartSize` if `part_size` is 0, otherwise any header read error.
    pub fn open_streaming<P: AsRef<Path>>(path: P, part_size: usize) -> Result<Self, FormatError> {
        if part_size == 0 {
            let err = FormatError::ZeroPartSize;
            log_format_error(&err, "WaveFile::open_streaming");
            return Err(err);
        }
        let mut handler = WaveFileHandler::new(path.as_ref());
        let header = handler
            .read_header()
            .inspect_err(|err| log_format_error(err, "WaveFile::open_streaming"))?;

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            handler,
            header,
            data: Vec::new(),
            part_size,
        })
    }

    /// Decode the next part, one buffer per channel
    ///
    /// Returns `Ok(None)` once the payload is exhausted.
    pub fn load_next(&mut self) -> Result<Option<Vec<SignalBuffer>>, FormatError> {
        if self.handler.bytes_remaining() == 0 {
            return Ok(None);
        }

        let channels = self.handler.read_part(self.part_size)?;
        let sample_rate = self.header.sample_rate;
        let bits = self.header.bits_per_sample;

        let mut parts = vec![SignalBuffer::new(channels.left, sample_rate, bits)];
        if self.header.channels == 2 {
            parts.push(SignalBuffer::new(channels.right, sample_rate, bits));
        }
        Ok(Some(parts))
    }

    /// Write `source` to `path` as mono PCM with sequential 8-bit packing
    pub fn save<S: SignalSource + ?Sized, P: AsRef<Path>>(
        source: &S,
        path: P,
    ) -> Result<WaveHeader, FormatError> {
        Self::save_with(source, path, EightBitPacking::default())
    }

    /// Write `source` to `path` choosing the 8-bit byte order
    pub fn save_with<S: SignalSource + ?Sized, P: AsRef<Path>>(
        source: &S,
        path: P,
        packing: EightBitPacking,
    ) -> Result<WaveHeader, FormatError> {
        WaveFileHandler::new(path).save(source, packing)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &WaveHeader {
        &self.header
    }

    pub fn channels(&self) -> u16 {
        self.header.channels
    }

    pub fn is_mono(&self) -> bool {
        self.header.channels == 1
    }

    pub fn is_stereo(&self) -> bool {
        self.header.channels == 2
    }

    /// Payload length in bytes
    pub fn wave_size(&self) -> u32 {
        self.header.wave_size
    }

    /// Bytes per multi-channel sample frame
    pub fn bytes_per_sample(&self) -> u16 {
        self.header.block_align
    }

    /// Recording length in milliseconds
    pub fn audio_length_ms(&self) -> u32 {
        if self.header.bytes_per_sec == 0 {
            return 0;
        }
        (self.header.wave_size as f64 / self.header.bytes_per_sec as f64 * 1000.0) as u32
    }

    /// Number of whole parts of `part_size` bytes in the payload
    pub fn num_parts(&self) -> u32 {
        if self.part_size == 0 {
            return 0;
        }
        (self.header.wave_size as usize / self.part_size) as u32
    }
}

impl SignalSource for WaveFile {
    fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    fn bits_per_sample(&self) -> u16 {
        self.header.bits_per_sample
    }

    fn to_array(&self) -> &[f64] {
        &self.data
    }
}

fn select_channel(channels: DecodedChannels, channel: StereoChannel) -> Vec<f64> {
    match channel {
        StereoChannel::Right if channels.is_stereo() => channels.right,
        _ => channels.left,
    }
}
