// WAV (RIFF/PCM) duration support
//
// WAV File Structure:
// - "RIFF" (4 bytes) + overall size (4 bytes) + "WAVE" (4 bytes)
// - Sequence of chunks: id (4 bytes) + little-endian length (4 bytes) + payload
//   - "fmt " chunk: audio format tag, channel count, sample rate, byte rate,
//     block align, bits per sample
//   - "data" chunk: the PCM samples; only its length matters here
//
// Duration comes straight from the data chunk size and the PCM frame layout,
// no samples are read.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use crate::error::{ParseError, ParseResult};
use crate::utils::io;

pub const RIFF_SIGNATURE: &[u8; 4] = b"RIFF";
pub const WAVE_SIGNATURE: &[u8; 4] = b"WAVE";

const FMT_CHUNK_ID: &[u8; 4] = b"fmt ";
const DATA_CHUNK_ID: &[u8; 4] = b"data";

// The only format tag we handle: integer PCM
const FORMAT_TAG_PCM: u16 = 1;

// Fixed part of the fmt payload we consume before skipping the rest
const FMT_FIELDS_LEN: i64 = 16;

/// Decoded PCM format description plus the data chunk size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub sample_rate: u32,
    pub channel_count: u16,
    pub bits_per_sample: u16,
    pub data_byte_size: u32,
}

impl WavFormat {
    /// Read and validate the format description from a RIFF/WAVE stream
    pub fn read<R: Read + Seek>(reader: &mut R) -> ParseResult<Self> {
        let riff = io::read_array::<4, R>(reader)?;
        if &riff != RIFF_SIGNATURE {
            return Err(ParseError::BadSignature("expected RIFF magic"));
        }

        // Overall file size, unused
        io::skip_forward(reader, 4)?;

        let wave = io::read_array::<4, R>(reader)?;
        if &wave != WAVE_SIGNATURE {
            return Err(ParseError::BadSignature("expected WAVE magic"));
        }

        let fmt_len = find_chunk(reader, FMT_CHUNK_ID, "fmt chunk")?;

        let format_tag = io::read_le_u16(reader)?;
        if format_tag != FORMAT_TAG_PCM {
            return Err(ParseError::UnsupportedVariant("non-PCM WAV"));
        }

        let channel_count = io::read_le_u16(reader)?;
        let sample_rate = io::read_le_u32(reader)?;
        // Byte rate (4) and block align (2) are derivable, skip them
        io::skip_forward(reader, 6)?;
        let bits_per_sample = io::read_le_u16(reader)?;

        // Skip whatever the fmt chunk carries beyond the PCM fields
        reader.seek(SeekFrom::Current(i64::from(fmt_len) - FMT_FIELDS_LEN))?;

        let data_byte_size = find_chunk(reader, DATA_CHUNK_ID, "data chunk")?;

        if sample_rate == 0 {
            return Err(ParseError::InvalidFieldValue("zero sample rate"));
        }
        if channel_count == 0 {
            return Err(ParseError::InvalidFieldValue("zero channel count"));
        }
        if bits_per_sample / 8 == 0 {
            return Err(ParseError::InvalidFieldValue("bits per sample below 8"));
        }
        if data_byte_size == 0 {
            return Err(ParseError::InvalidFieldValue("empty data chunk"));
        }

        Ok(WavFormat {
            sample_rate,
            channel_count,
            bits_per_sample,
            data_byte_size,
        })
    }

    /// Playback length in fractional seconds
    pub fn duration_seconds(&self) -> f64 {
        let frame_size = u32::from(self.bits_per_sample / 8) * u32::from(self.channel_count);
        let total_samples = self.data_byte_size / frame_size;
        f64::from(total_samples) / f64::from(self.sample_rate)
    }
}

/// Estimate the duration of a WAV stream in whole seconds
pub fn duration<R: Read + Seek>(reader: &mut R) -> ParseResult<u64> {
    let format = WavFormat::read(reader)?;
    Ok(format.duration_seconds() as u64)
}

/// Scan chunks until `id` is found, skipping everything else by length.
/// Returns the matching chunk's payload length, leaving the reader at its payload.
fn find_chunk<R: Read + Seek>(
    reader: &mut R,
    id: &[u8; 4],
    section: &'static str,
) -> ParseResult<u32> {
    loop {
        let chunk_id = match io::read_array::<4, R>(reader) {
            Ok(bytes) => bytes,
            // Clean end of the chunk list: the section simply is not there
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(ParseError::MissingRequiredSection(section));
            }
            Err(e) => return Err(e.into()),
        };
        let chunk_len = io::read_le_u32(reader)?;

        if chunk_id == *id {
            return Ok(chunk_len);
        }
        io::skip_forward(reader, u64::from(chunk_len))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn le16(value: u16) -> [u8; 2] {
        value.to_le_bytes()
    }

    fn le32(value: u32) -> [u8; 4] {
        value.to_le_bytes()
    }

    fn build_wav(
        format_tag: u16,
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
        data_size: u32,
    ) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&le32(36 + data_size));
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&le32(16));
        bytes.extend_from_slice(&le16(format_tag));
        bytes.extend_from_slice(&le16(channels));
        bytes.extend_from_slice(&le32(sample_rate));
        let block_align = channels * (bits_per_sample / 8);
        bytes.extend_from_slice(&le32(sample_rate * u32::from(block_align)));
        bytes.extend_from_slice(&le16(block_align));
        bytes.extend_from_slice(&le16(bits_per_sample));
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&le32(data_size));
        // The parser never touches the sample payload, so none is appended
        bytes
    }

    #[test]
    fn test_cd_quality_one_second() {
        // 176400 bytes / (2 bytes * 2 channels) / 44100 Hz = 1.0s
        let bytes = build_wav(1, 2, 44100, 16, 176_400);
        let format = WavFormat::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(format.sample_rate, 44100);
        assert_eq!(format.channel_count, 2);
        assert_eq!(format.bits_per_sample, 16);
        assert_eq!(format.data_byte_size, 176_400);
        assert!((format.duration_seconds() - 1.0).abs() < f64::EPSILON);
        assert_eq!(duration(&mut Cursor::new(&bytes)).unwrap(), 1);
    }

    #[test]
    fn test_unrelated_chunks_are_skipped() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&le32(0));
        bytes.extend_from_slice(b"WAVE");
        // A LIST chunk before fmt must be stepped over by length
        bytes.extend_from_slice(b"LIST");
        bytes.extend_from_slice(&le32(6));
        bytes.extend_from_slice(&[0xAA; 6]);
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&le32(16));
        bytes.extend_from_slice(&le16(1));
        bytes.extend_from_slice(&le16(1));
        bytes.extend_from_slice(&le32(8000));
        bytes.extend_from_slice(&le32(8000));
        bytes.extend_from_slice(&le16(1));
        bytes.extend_from_slice(&le16(8));
        // And a fact chunk between fmt and data
        bytes.extend_from_slice(b"fact");
        bytes.extend_from_slice(&le32(4));
        bytes.extend_from_slice(&le32(16000));
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&le32(16000));

        assert_eq!(duration(&mut Cursor::new(&bytes)).unwrap(), 2);
    }

    #[test]
    fn test_rejects_non_pcm() {
        // Format tag 3 = IEEE float
        let bytes = build_wav(3, 2, 44100, 32, 176_400);
        let err = WavFormat::read(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedVariant(_)));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = build_wav(1, 2, 44100, 16, 176_400);
        bytes[0] = b'X';
        let err = WavFormat::read(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, ParseError::BadSignature(_)));

        let mut bytes = build_wav(1, 2, 44100, 16, 176_400);
        bytes[8] = b'X';
        let err = WavFormat::read(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, ParseError::BadSignature(_)));
    }

    #[test]
    fn test_rejects_zero_fields() {
        let bytes = build_wav(1, 0, 44100, 16, 176_400);
        assert!(matches!(
            WavFormat::read(&mut Cursor::new(&bytes)),
            Err(ParseError::InvalidFieldValue(_))
        ));

        let bytes = build_wav(1, 2, 0, 16, 176_400);
        assert!(matches!(
            WavFormat::read(&mut Cursor::new(&bytes)),
            Err(ParseError::InvalidFieldValue(_))
        ));

        let bytes = build_wav(1, 2, 44100, 16, 0);
        assert!(matches!(
            WavFormat::read(&mut Cursor::new(&bytes)),
            Err(ParseError::InvalidFieldValue(_))
        ));
    }

    #[test]
    fn test_missing_data_chunk() {
        let full = build_wav(1, 2, 44100, 16, 176_400);
        // Chop off the data chunk header entirely
        let bytes = &full[..full.len() - 8];
        let err = WavFormat::read(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, ParseError::MissingRequiredSection("data chunk")));
    }

    #[test]
    fn test_truncated_header() {
        let err = WavFormat::read(&mut Cursor::new(b"RIFF\x10\x00")).unwrap_err();
        assert!(matches!(err, ParseError::TruncatedInput));
    }
}
