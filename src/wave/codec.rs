// Codec module - wave container reading and writing
//
// The handler owns the open file and a byte cursor into the payload, so a
// file can be decoded either in one go or part by part. Decoding is driven
// by the header's (bits per sample, channel count) pair:
//
//   16-bit mono    one signed LE word per sample
//   16-bit stereo  interleaved words, left first
//   8-bit mono     word k -> samples 2k (low byte) and 2k+1 (high byte)
//   8-bit stereo   word k -> left k (low byte) and right k (high byte)
//
// 8-bit samples are unsigned on disk and shifted by -128. Any other bit depth
// takes the 8-bit path and any channel count other than 2 the mono path; the
// header is not validated beyond its RIFF magic.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use super::header::WaveHeader;
use super::EightBitPacking;
use crate::error::FormatError;
use crate::source::SignalSource;

/// Offset applied to unsigned 8-bit samples
const EIGHT_BIT_OFFSET: f64 = 128.0;

/// Channels decoded from one read
///
/// `right` is empty for mono payloads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedChannels {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl DecodedChannels {
    /// Whether the payload carried a second channel
    pub fn is_stereo(&self) -> bool {
        !self.right.is_empty()
    }

    /// Number of decoded frames
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Reads and writes one wave file on disk
///
/// Not safe to drive from two readers at once: the payload cursor is plain
/// owned state.
#[derive(Debug)]
pub struct WaveFileHandler {
    path: PathBuf,
    reader: Option<BufReader<File>>,
    header: Option<WaveHeader>,
    bytes_read: u64,
}

impl WaveFileHandler {
    /// Create a handler for `path`; nothing is opened until the header is read
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            reader: None,
            header: None,
            bytes_read: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file and read its header
    ///
    /// Calling this again while the stream is open returns the cached header
    /// without touching the file. Only the "RIFF" magic is checked.
    ///
    /// # Errors
    /// * `CannotOpen` - file missing or unreadable
    /// * `NotRiff` - first four bytes are not "RIFF"
    /// * `Io` - file shorter than a header
    pub fn read_header(&mut self) -> Result<WaveHeader, FormatError> {
        if self.reader.is_some() {
            if let Some(header) = self.header {
                return Ok(header);
            }
        }

        let file = File::open(&self.path).map_err(|err| FormatError::CannotOpen {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        })?;
        let mut reader = BufReader::new(file);
        let header = WaveHeader::read_from(&mut reader)?;
        if !header.is_riff() {
            return Err(FormatError::NotRiff { found: header.riff });
        }

        log::debug!(
            "[WaveCodec] {:?}: {} Hz, {} ch, {} bit, {} payload bytes",
            self.path,
            header.sample_rate,
            header.channels,
            header.bits_per_sample,
            header.wave_size
        );

        self.reader = Some(reader);
        self.header = Some(header);
        self.bytes_read = 0;
        Ok(header)
    }

    /// Read the header (if needed) and decode the whole payload
    ///
    /// The stream is closed afterwards; a later `read_header` reopens it.
    pub fn read_all_channels(&mut self) -> Result<(WaveHeader, DecodedChannels), FormatError> {
        let header = self.read_header()?;
        if header.block_align == 0 {
            return Err(FormatError::ZeroBlockAlign);
        }

        // the declared size is untrusted; read_to_end grows the buffer as needed
        let mut raw = Vec::new();
        if let Some(reader) = self.reader.as_mut() {
            reader
                .by_ref()
                .take(header.wave_size as u64)
                .read_to_end(&mut raw)?;
        }
        self.reader = None;
        self.bytes_read = header.wave_size as u64;

        if raw.len() < header.wave_size as usize {
            log::warn!(
                "[WaveCodec] {:?}: payload truncated ({} of {} bytes)",
                self.path,
                raw.len(),
                header.wave_size
            );
        }

        Ok((header, decode_data(&header, &raw)))
    }

    /// Decode the next `part_size` payload bytes
    ///
    /// The request is clamped to what is left of the payload; an empty result
    /// means the payload is exhausted. The cursor advances by the clamped
    /// size, and only whole sample frames within the part are decoded.
    ///
    /// # Errors
    /// `StreamNotOpen` if `read_header` has not been called, `ZeroPartSize`
    /// for an empty request.
    pub fn read_part(&mut self, part_size: usize) -> Result<DecodedChannels, FormatError> {
        if part_size == 0 {
            return Err(FormatError::ZeroPartSize);
        }
        let header = match (self.header, self.reader.is_some()) {
            (Some(header), true) => header,
            _ => return Err(FormatError::StreamNotOpen),
        };
        if header.block_align == 0 {
            return Err(FormatError::ZeroBlockAlign);
        }

        let to_read = (part_size as u64).min(self.bytes_remaining());
        let mut raw = Vec::new();
        if let Some(reader) = self.reader.as_mut() {
            reader.by_ref().take(to_read).read_to_end(&mut raw)?;
        }
        self.bytes_read += to_read;

        Ok(decode_data(&header, &raw))
    }

    /// Payload bytes not yet consumed by `read_part`
    pub fn bytes_remaining(&self) -> u64 {
        self.header
            .map(|header| (header.wave_size as u64).saturating_sub(self.bytes_read))
            .unwrap_or(0)
    }

    /// Write `source` as a mono PCM file at this handler's path
    ///
    /// Bit depths above 8 are written as 16-bit, depths 1..=8 as 8-bit.
    /// 16-bit samples are truncated toward zero (saturating at the i16
    /// range); 8-bit samples are offset by +128 and packed in pairs
    /// according to `packing`.
    pub fn save<S: SignalSource + ?Sized>(
        &self,
        source: &S,
        packing: EightBitPacking,
    ) -> Result<WaveHeader, FormatError> {
        let bits = match source.bits_per_sample() {
            0 => return Err(FormatError::UnsupportedBitDepth { bits: 0 }),
            1..=8 => 8,
            _ => 16,
        };
        let header = WaveHeader::pcm(source.sample_rate(), 1, bits, source.sample_count())?;

        let file = File::create(&self.path).map_err(|err| FormatError::CannotOpen {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        })?;
        let mut writer = BufWriter::new(file);
        header.write_to(&mut writer)?;

        let payload = if bits == 16 {
            encode_16bit(source.to_array())
        } else {
            encode_8bit(source.to_array(), packing)
        };
        writer.write_all(&payload)?;
        writer.flush()?;

        log::info!(
            "[WaveCodec] Saved {} samples ({} bit mono, {} Hz) to {:?}",
            source.sample_count(),
            bits,
            header.sample_rate,
            self.path
        );
        Ok(header)
    }
}

/// Decode a raw payload according to the header layout
fn decode_data(header: &WaveHeader, raw: &[u8]) -> DecodedChannels {
    let channel_size = raw.len() / header.block_align.max(1) as usize;
    let stereo = header.channels == 2;

    if header.bits_per_sample == 16 {
        if stereo {
            decode_16bit_stereo(raw, channel_size)
        } else {
            DecodedChannels {
                left: decode_16bit(raw, channel_size),
                right: Vec::new(),
            }
        }
    } else if stereo {
        decode_8bit_stereo(raw, channel_size)
    } else {
        DecodedChannels {
            left: decode_8bit(raw, channel_size),
            right: Vec::new(),
        }
    }
}

/// Raw payload viewed as LE 16-bit words; a trailing odd byte gets a zero high byte
fn words(raw: &[u8]) -> impl Iterator<Item = u16> + '_ {
    raw.chunks(2).map(|pair| {
        let low = pair[0] as u16;
        let high = pair.get(1).copied().unwrap_or(0) as u16;
        (high << 8) | low
    })
}

/// Split a 16-bit word into (low byte, high byte)
fn split_bytes(word: u16) -> (u8, u8) {
    ((word & 0x00FF) as u8, ((word >> 8) & 0x00FF) as u8)
}

fn unsigned_to_centered(byte: u8) -> f64 {
    byte as f64 - EIGHT_BIT_OFFSET
}

fn decode_16bit(raw: &[u8], channel_size: usize) -> Vec<f64> {
    raw.chunks_exact(2)
        .take(channel_size)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f64)
        .collect()
}

fn decode_16bit_stereo(raw: &[u8], channel_size: usize) -> DecodedChannels {
    let mut channels = DecodedChannels {
        left: Vec::with_capacity(channel_size),
        right: Vec::with_capacity(channel_size),
    };
    for frame in raw.chunks_exact(4).take(channel_size) {
        channels
            .left
            .push(i16::from_le_bytes([frame[0], frame[1]]) as f64);
        channels
            .right
            .push(i16::from_le_bytes([frame[2], frame[3]]) as f64);
    }
    channels
}

fn decode_8bit(raw: &[u8], channel_size: usize) -> Vec<f64> {
    words(raw)
        .flat_map(|word| {
            let (low, high) = split_bytes(word);
            [unsigned_to_centered(low), unsigned_to_centered(high)]
        })
        .take(channel_size)
        .collect()
}

fn decode_8bit_stereo(raw: &[u8], channel_size: usize) -> DecodedChannels {
    let mut channels = DecodedChannels {
        left: Vec::with_capacity(channel_size),
        right: Vec::with_capacity(channel_size),
    };
    for word in words(raw).take(channel_size) {
        // left channel is in the low byte, right in the high byte
        let (low, high) = split_bytes(word);
        channels.left.push(unsigned_to_centered(low));
        channels.right.push(unsigned_to_centered(high));
    }
    channels
}

fn encode_16bit(samples: &[f64]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&sample| (sample as i16).to_le_bytes())
        .collect()
}

fn centered_to_unsigned(sample: f64) -> u8 {
    (sample + EIGHT_BIT_OFFSET) as u8
}

fn encode_8bit(samples: &[f64], packing: EightBitPacking) -> Vec<u8> {
    let mut payload = Vec::with_capacity(samples.len());
    for pair in samples.chunks(2) {
        let first = centered_to_unsigned(pair[0]);
        match pair.get(1) {
            Some(&second) => {
                let second = centered_to_unsigned(second);
                match packing {
                    EightBitPacking::Sequential => payload.extend_from_slice(&[first, second]),
                    EightBitPacking::HighByteFirst => {
                        let word = ((first as u16) << 8) | second as u16;
                        payload.extend_from_slice(&word.to_le_bytes());
                    }
                }
            }
            None => payload.push(first),
        }
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SignalBuffer;
    use crate::wave::header::HEADER_SIZE;

    fn header(channels: u16, bits: u16, frames: usize) -> WaveHeader {
        WaveHeader::pcm(8000, channels, bits, frames).unwrap()
    }

    fn write_raw(dir: &tempfile::TempDir, name: &str, header: &WaveHeader, payload: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes.extend_from_slice(payload);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_decode_16bit_mono() {
        let raw = [0x01, 0x00, 0xFF, 0xFF, 0x00, 0x80];
        let channels = decode_data(&header(1, 16, 3), &raw);
        assert_eq!(channels.left, vec![1.0, -1.0, -32768.0]);
        assert!(!channels.is_stereo());
    }

    #[test]
    fn test_decode_16bit_stereo_interleaved() {
        let raw = [0x0A, 0x00, 0xF6, 0xFF, 0x14, 0x00, 0xEC, 0xFF];
        let channels = decode_data(&header(2, 16, 2), &raw);
        assert_eq!(channels.left, vec![10.0, 20.0]);
        assert_eq!(channels.right, vec![-10.0, -20.0]);
    }

    #[test]
    fn test_decode_8bit_mono_byte_pairs() {
        // word 0 = 0xFF80 -> low 0x80 (0), high 0xFF (127)
        // word 1 = 0x0081 -> low 0x81 (1), high 0x00 (-128)
        let raw = [0x80, 0xFF, 0x81, 0x00];
        let channels = decode_data(&header(1, 8, 4), &raw);
        assert_eq!(channels.left, vec![0.0, 127.0, 1.0, -128.0]);
    }

    #[test]
    fn test_decode_8bit_mono_odd_length() {
        let raw = [0x80, 0x90, 0x70];
        let channels = decode_data(&header(1, 8, 3), &raw);
        assert_eq!(channels.left, vec![0.0, 16.0, -16.0]);
    }

    #[test]
    fn test_decode_8bit_stereo_low_left_high_right() {
        let raw = [0x90, 0x70, 0x80, 0x80];
        let channels = decode_data(&header(2, 8, 2), &raw);
        assert_eq!(channels.left, vec![16.0, 0.0]);
        assert_eq!(channels.right, vec![-16.0, 0.0]);
    }

    #[test]
    fn test_decode_clamps_to_available_bytes() {
        // header claims block_align 1 for 16-bit audio; only 2 words exist
        let mut lying = header(1, 16, 2);
        lying.block_align = 1;
        let channels = decode_data(&lying, &[0x01, 0x00, 0x02, 0x00]);
        assert_eq!(channels.left, vec![1.0, 2.0]);
    }

    #[test]
    fn test_encode_16bit_truncates() {
        let payload = encode_16bit(&[1.9, -1.9, 40000.0, -40000.0]);
        assert_eq!(
            payload,
            vec![0x01, 0x00, 0xFF, 0xFF, 0xFF, 0x7F, 0x00, 0x80]
        );
    }

    #[test]
    fn test_encode_8bit_packings() {
        let samples = [0.0, 127.0, -128.0];
        assert_eq!(
            encode_8bit(&samples, EightBitPacking::Sequential),
            vec![0x80, 0xFF, 0x00]
        );
        // first sample of a pair lands in the high byte of the word
        assert_eq!(
            encode_8bit(&samples, EightBitPacking::HighByteFirst),
            vec![0xFF, 0x80, 0x00]
        );
    }

    #[test]
    fn test_read_header_rejects_non_riff() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = header(1, 16, 4);
        bad.riff = *b"RIFX";
        let path = write_raw(&dir, "bad.wav", &bad, &[0u8; 8]);

        let mut handler = WaveFileHandler::new(&path);
        match handler.read_header() {
            Err(FormatError::NotRiff { found }) => assert_eq!(&found, b"RIFX"),
            other => panic!("Expected NotRiff, got {:?}", other),
        }
        assert_eq!(handler.bytes_remaining(), 0);
    }

    #[test]
    fn test_read_header_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = WaveFileHandler::new(dir.path().join("nope.wav"));
        let err = handler.read_header().unwrap_err();
        assert!(matches!(err, FormatError::CannotOpen { .. }));
    }

    #[test]
    fn test_read_header_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_raw(&dir, "a.wav", &header(1, 16, 2), &[1, 0, 2, 0]);

        let mut handler = WaveFileHandler::new(&path);
        let first = handler.read_header().unwrap();
        // second call must not reset the cursor
        handler.read_part(2).unwrap();
        let second = handler.read_header().unwrap();
        assert_eq!(first, second);
        assert_eq!(handler.bytes_remaining(), 2);
    }

    #[test]
    fn test_read_part_requires_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_raw(&dir, "a.wav", &header(1, 16, 2), &[1, 0, 2, 0]);
        let mut handler = WaveFileHandler::new(&path);
        assert_eq!(handler.read_part(2), Err(FormatError::StreamNotOpen));
    }

    #[test]
    fn test_read_part_walks_payload() {
        let dir = tempfile::tempdir().unwrap();
        let payload: Vec<u8> = (1i16..=5).flat_map(|v| v.to_le_bytes()).collect();
        let path = write_raw(&dir, "parts.wav", &header(1, 16, 5), &payload);

        let mut handler = WaveFileHandler::new(&path);
        handler.read_header().unwrap();

        assert_eq!(handler.read_part(4).unwrap().left, vec![1.0, 2.0]);
        assert_eq!(handler.read_part(4).unwrap().left, vec![3.0, 4.0]);
        // clamped to the remaining two bytes
        assert_eq!(handler.read_part(4).unwrap().left, vec![5.0]);
        assert!(handler.read_part(4).unwrap().is_empty());
        assert_eq!(handler.bytes_remaining(), 0);
    }

    #[test]
    fn test_read_part_rejects_zero_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_raw(&dir, "zero_part.wav", &header(1, 16, 2), &[1, 0, 2, 0]);

        let mut handler = WaveFileHandler::new(&path);
        handler.read_header().unwrap();
        assert_eq!(handler.read_part(0), Err(FormatError::ZeroPartSize));
        assert_eq!(handler.bytes_remaining(), 4);
    }

    #[test]
    fn test_zero_block_align_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = header(1, 16, 2);
        bad.block_align = 0;
        let path = write_raw(&dir, "zero.wav", &bad, &[0u8; 4]);

        let mut handler = WaveFileHandler::new(&path);
        assert_eq!(
            handler.read_all_channels().unwrap_err(),
            FormatError::ZeroBlockAlign
        );
    }

    #[test]
    fn test_truncated_payload_decodes_what_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_raw(&dir, "short.wav", &header(1, 16, 10), &[7, 0, 8, 0]);

        let mut handler = WaveFileHandler::new(&path);
        let (_, channels) = handler.read_all_channels().unwrap();
        assert_eq!(channels.left, vec![7.0, 8.0]);
    }

    #[test]
    fn test_oversized_declared_payload_reads_actual_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let mut lying = header(1, 16, 2);
        lying.wave_size = u32::MAX - 1;
        let path = write_raw(&dir, "lying.wav", &lying, &[1, 0, 2, 0]);

        let mut handler = WaveFileHandler::new(&path);
        let (read, channels) = handler.read_all_channels().unwrap();
        assert_eq!(read.wave_size, u32::MAX - 1);
        assert_eq!(channels.left, vec![1.0, 2.0]);
    }

    #[test]
    fn test_save_writes_header_and_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let source = SignalBuffer::new(vec![1.0, -2.0, 3.0], 11025, 24);

        let written = WaveFileHandler::new(&path)
            .save(&source, EightBitPacking::Sequential)
            .unwrap();
        assert_eq!(written.bits_per_sample, 16);
        assert_eq!(written.channels, 1);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 6);
        assert_eq!(&bytes[HEADER_SIZE..], &[1, 0, 0xFE, 0xFF, 3, 0]);
    }

    #[test]
    fn test_save_rejects_zero_bit_depth() {
        let dir = tempfile::tempdir().unwrap();
        let source = SignalBuffer::new(vec![0.0; 4], 8000, 0);
        let result = WaveFileHandler::new(dir.path().join("x.wav"))
            .save(&source, EightBitPacking::Sequential);
        assert_eq!(result, Err(FormatError::UnsupportedBitDepth { bits: 0 }));
    }

    #[test]
    fn test_save_rejects_overflowing_sample_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fast.wav");
        let source = SignalBuffer::new(vec![0.0; 16], 3_000_000_000, 16);

        let result = WaveFileHandler::new(&path).save(&source, EightBitPacking::Sequential);
        assert_eq!(
            result,
            Err(FormatError::HeaderOverflow {
                field: "bytes_per_sec"
            })
        );
        assert!(!path.exists());
    }
}
