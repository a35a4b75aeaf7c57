// Header module - fixed 44-byte RIFF/WAVE header
//
// Layout (all integers little-endian):
//   0  "RIFF"        4  data length (file size - 8)   8  "WAVE"
//  12  "fmt "       16  sub-block length (16)        20  format tag (1 = PCM)
//  22  channels     24  sample rate                  28  byte rate
//  32  block align  34  bits per sample              36  "data"
//  40  payload length in bytes

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::FormatError;

/// Size of the header on disk
pub const HEADER_SIZE: usize = 44;

/// PCM format tag
pub const PCM_FORMAT_TAG: u16 = 1;

/// Length of the "fmt " sub-chunk body for plain PCM
pub const PCM_SUB_BLOCK_LENGTH: u32 = 16;

/// Raw header fields, exactly as stored in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveHeader {
    pub riff: [u8; 4],
    pub data_length: u32,
    pub wave: [u8; 4],
    pub fmt: [u8; 4],
    pub sub_block_length: u32,
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bytes_per_sec: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data: [u8; 4],
    pub wave_size: u32,
}

impl WaveHeader {
    /// Build a PCM header for `sample_count` frames
    ///
    /// Derived fields follow the container invariants:
    /// byte rate = rate × channels × bits/8, block align = channels × bits/8,
    /// payload = samples × channels × bits/8.
    ///
    /// # Errors
    /// `HeaderOverflow` when the byte rate, payload length or RIFF length
    /// does not fit in a u32.
    pub fn pcm(
        sample_rate: u32,
        channels: u16,
        bits_per_sample: u16,
        sample_count: usize,
    ) -> Result<Self, FormatError> {
        let bytes_per_frame = channels as u32 * bits_per_sample as u32 / 8;
        let wave_size = (sample_count as u64)
            .checked_mul(bytes_per_frame as u64)
            .and_then(|bytes| u32::try_from(bytes).ok())
            .ok_or(FormatError::HeaderOverflow { field: "wave_size" })?;
        let data_length = wave_size
            .checked_add(HEADER_SIZE as u32 - 8)
            .ok_or(FormatError::HeaderOverflow {
                field: "data_length",
            })?;
        let bytes_per_sec = sample_rate
            .checked_mul(bytes_per_frame)
            .ok_or(FormatError::HeaderOverflow {
                field: "bytes_per_sec",
            })?;

        Ok(Self {
            riff: *b"RIFF",
            data_length,
            wave: *b"WAVE",
            fmt: *b"fmt ",
            sub_block_length: PCM_SUB_BLOCK_LENGTH,
            format_tag: PCM_FORMAT_TAG,
            channels,
            sample_rate,
            bytes_per_sec,
            block_align: bytes_per_frame as u16,
            bits_per_sample,
            data: *b"data",
            wave_size,
        })
    }

    /// Read the 44 header bytes from `reader`
    ///
    /// Only the byte layout is enforced here; magic checks are left to the
    /// codec so it can report them as format errors.
    pub fn read_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut riff = [0u8; 4];
        reader.read_exact(&mut riff)?;
        let data_length = reader.read_u32::<LittleEndian>()?;
        let mut wave = [0u8; 4];
        reader.read_exact(&mut wave)?;
        let mut fmt = [0u8; 4];
        reader.read_exact(&mut fmt)?;
        let sub_block_length = reader.read_u32::<LittleEndian>()?;
        let format_tag = reader.read_u16::<LittleEndian>()?;
        let channels = reader.read_u16::<LittleEndian>()?;
        let sample_rate = reader.read_u32::<LittleEndian>()?;
        let bytes_per_sec = reader.read_u32::<LittleEndian>()?;
        let block_align = reader.read_u16::<LittleEndian>()?;
        let bits_per_sample = reader.read_u16::<LittleEndian>()?;
        let mut data = [0u8; 4];
        reader.read_exact(&mut data)?;
        let wave_size = reader.read_u32::<LittleEndian>()?;

        Ok(Self {
            riff,
            data_length,
            wave,
            fmt,
            sub_block_length,
            format_tag,
            channels,
            sample_rate,
            bytes_per_sec,
            block_align,
            bits_per_sample,
            data,
            wave_size,
        })
    }

    /// Write the 44 header bytes to `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.riff)?;
        writer.write_u32::<LittleEndian>(self.data_length)?;
        writer.write_all(&self.wave)?;
        writer.write_all(&self.fmt)?;
        writer.write_u32::<LittleEndian>(self.sub_block_length)?;
        writer.write_u16::<LittleEndian>(self.format_tag)?;
        writer.write_u16::<LittleEndian>(self.channels)?;
        writer.write_u32::<LittleEndian>(self.sample_rate)?;
        writer.write_u32::<LittleEndian>(self.bytes_per_sec)?;
        writer.write_u16::<LittleEndian>(self.block_align)?;
        writer.write_u16::<LittleEndian>(self.bits_per_sample)?;
        writer.write_all(&self.data)?;
        writer.write_u32::<LittleEndian>(self.wave_size)?;
        Ok(())
    }

    /// Whether the first magic reads "RIFF"
    pub fn is_riff(&self) -> bool {
        &self.riff == b"RIFF"
    }

    /// Number of sample frames described by the payload length
    pub fn frame_count(&self) -> usize {
        if self.block_align == 0 {
            0
        } else {
            self.wave_size as usize / self.block_align as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_pcm_header_invariants() {
        let header = WaveHeader::pcm(16000, 2, 16, 1000).unwrap();
        assert_eq!(header.bytes_per_sec, 16000 * 2 * 2);
        assert_eq!(header.block_align, 4);
        assert_eq!(header.wave_size, 4000);
        assert_eq!(header.data_length, 4000 + 36);
        assert_eq!(header.wave_size % header.block_align as u32, 0);
        assert_eq!(header.frame_count(), 1000);
    }

    #[test]
    fn test_header_byte_layout() {
        let header = WaveHeader::pcm(44100, 1, 16, 10).unwrap();
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();

        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[4..8], &(20u32 + 36).to_le_bytes());
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(&bytes[16..20], &16u32.to_le_bytes());
        assert_eq!(&bytes[20..22], &1u16.to_le_bytes());
        assert_eq!(&bytes[22..24], &1u16.to_le_bytes());
        assert_eq!(&bytes[24..28], &44100u32.to_le_bytes());
        assert_eq!(&bytes[28..32], &88200u32.to_le_bytes());
        assert_eq!(&bytes[32..34], &2u16.to_le_bytes());
        assert_eq!(&bytes[34..36], &16u16.to_le_bytes());
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(&bytes[40..44], &20u32.to_le_bytes());
    }

    #[test]
    fn test_read_back_written_header() {
        let header = WaveHeader::pcm(8000, 1, 8, 333).unwrap();
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();

        let parsed = WaveHeader::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(parsed, header);
        assert!(parsed.is_riff());
    }

    #[test]
    fn test_short_header_is_io_error() {
        let mut cursor = Cursor::new(b"RIFF\x00\x00".to_vec());
        assert!(WaveHeader::read_from(&mut cursor).is_err());
    }

    #[test]
    fn test_zero_block_align_has_no_frames() {
        let mut header = WaveHeader::pcm(8000, 1, 16, 10).unwrap();
        header.block_align = 0;
        assert_eq!(header.frame_count(), 0);
    }

    #[test]
    fn test_byte_rate_overflow_is_rejected() {
        assert_eq!(
            WaveHeader::pcm(3_000_000_000, 1, 16, 10),
            Err(FormatError::HeaderOverflow {
                field: "bytes_per_sec"
            })
        );
    }

    #[test]
    fn test_payload_overflow_is_rejected() {
        // 2^31 stereo 16-bit frames = 8 GiB of payload
        assert_eq!(
            WaveHeader::pcm(8000, 2, 16, 1 << 31),
            Err(FormatError::HeaderOverflow { field: "wave_size" })
        );

        // payload fits but the RIFF length (payload + 36) does not
        assert_eq!(
            WaveHeader::pcm(8000, 1, 8, u32::MAX as usize - 10),
            Err(FormatError::HeaderOverflow {
                field: "data_length"
            })
        );
    }
}
