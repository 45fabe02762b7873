// FLAC metadata block iteration and STREAMINFO decoding

use std::io::{Read, Seek};

use crate::error::{ParseError, ParseResult};
use crate::utils::io;

pub const STREAMINFO_BLOCK_TYPE: u8 = 0;
pub const STREAMINFO_BLOCK_LEN: u32 = 34;

/// FLAC metadata block header: is-last flag, 7-bit type, 24-bit length
#[derive(Debug, Clone, Copy)]
pub struct BlockHeader {
    pub is_last: bool,
    pub block_type: u8,
    pub length: u32,
}

impl BlockHeader {
    /// Read a block header from its 4 big-endian bytes
    pub fn read<R: Read>(reader: &mut R) -> ParseResult<Self> {
        let word = io::read_be_u32(reader)?;

        Ok(BlockHeader {
            is_last: word & 0x8000_0000 != 0,
            block_type: ((word >> 24) & 0x7F) as u8,
            length: word & 0x00FF_FFFF,
        })
    }
}

/// Stream-wide parameters from the mandatory STREAMINFO block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub sample_rate: u32,
    pub channel_count: u8,
    pub bits_per_sample: u8,
    pub total_sample_count: u64,
}

impl StreamInfo {
    /// Decode the bit-packed fields of a 34-byte STREAMINFO payload.
    ///
    /// Bytes 10..18 form one big-endian 64-bit accumulator:
    /// - bits 63-44: sample rate (20 bits)
    /// - bits 43-41: channel count, stored value + 1 (3 bits)
    /// - bits 40-36: bits per sample, stored value + 1 (5 bits)
    /// - bits 35-0:  total sample count (36 bits)
    pub fn decode(payload: &[u8; 34]) -> Self {
        let acc = u64::from_be_bytes(payload[10..18].try_into().unwrap());

        StreamInfo {
            sample_rate: ((acc >> 44) & 0xF_FFFF) as u32,
            channel_count: (((acc >> 41) & 0x07) + 1) as u8,
            bits_per_sample: (((acc >> 36) & 0x1F) + 1) as u8,
            total_sample_count: acc & 0xF_FFFF_FFFF,
        }
    }

    /// Playback length in fractional seconds
    pub fn duration_seconds(&self) -> f64 {
        self.total_sample_count as f64 / f64::from(self.sample_rate)
    }
}

/// Walk the metadata blocks until STREAMINFO is found and decode it.
///
/// Expects the reader to sit just past the "fLaC" signature. Every other
/// block type is skipped by its declared length.
pub fn read_stream_info<R: Read + Seek>(reader: &mut R) -> ParseResult<StreamInfo> {
    loop {
        let header = BlockHeader::read(reader)?;

        if header.block_type == STREAMINFO_BLOCK_TYPE {
            if header.length != STREAMINFO_BLOCK_LEN {
                return Err(ParseError::InvalidFieldValue(
                    "STREAMINFO block length is not 34",
                ));
            }

            let payload = io::read_array::<34, R>(reader)?;
            let info = StreamInfo::decode(&payload);

            if info.sample_rate == 0 {
                return Err(ParseError::InvalidFieldValue("zero sample rate"));
            }
            if info.total_sample_count == 0 {
                return Err(ParseError::InvalidFieldValue("zero total sample count"));
            }
            return Ok(info);
        }

        if header.is_last {
            return Err(ParseError::MissingRequiredSection("STREAMINFO block"));
        }
        io::skip_forward(reader, u64::from(header.length))?;
    }
}
