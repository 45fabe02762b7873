// FLAC duration support
//
// FLAC File Structure:
// - "fLaC" signature (4 bytes)
// - Sequence of metadata blocks, each with a 4-byte header:
//   bit 31 = is-last flag, bits 30-24 = block type, bits 23-0 = length
// - STREAMINFO (type 0) is mandatory and carries sample rate, channel count,
//   bit depth, and the total sample count the duration is derived from

pub mod metadata;

use std::io::{Read, Seek};

use crate::error::{ParseError, ParseResult};
use crate::utils::io;

pub use metadata::{BlockHeader, StreamInfo};

pub const FLAC_SIGNATURE: &[u8; 4] = b"fLaC";

/// Estimate the duration of a FLAC stream in whole seconds
pub fn duration<R: Read + Seek>(reader: &mut R) -> ParseResult<u64> {
    let signature = io::read_array::<4, R>(reader)?;
    if &signature != FLAC_SIGNATURE {
        return Err(ParseError::BadSignature("expected fLaC signature"));
    }

    let info = metadata::read_stream_info(reader)?;
    Ok(info.duration_seconds() as u64)
}
