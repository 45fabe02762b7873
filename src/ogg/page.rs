// OGG page header decoding

use std::io::Read;

use crate::error::{ParseError, ParseResult};
use crate::ogg::OGG_SIGNATURE;
use crate::utils::io;

// Fixed preamble before the segment table
const PAGE_HEADER_LEN: usize = 27;

// Segment count is a single byte, so the table never exceeds this
const MAX_SEGMENTS: usize = 255;

/// One decoded OGG page preamble.
///
/// The segment table itself is not retained; its byte values only matter as a
/// sum, which is the page's payload size.
#[derive(Debug, Clone, Copy)]
pub struct PageHeader {
    pub version: u8,
    pub header_type: u8,
    pub granule_position: u64,
    pub bitstream_serial: u32,
    pub page_sequence: u32,
    pub checksum: u32,
    pub segment_count: u8,
    payload_len: u64,
}

impl PageHeader {
    /// Decode the page header at the reader's current position, leaving the
    /// reader at the start of the page payload.
    pub fn read<R: Read>(reader: &mut R) -> ParseResult<Self> {
        let header = io::read_array::<PAGE_HEADER_LEN, R>(reader)?;

        if &header[0..4] != OGG_SIGNATURE {
            return Err(ParseError::BadSignature("expected OggS capture pattern"));
        }

        let version = header[4];
        let header_type = header[5];
        let granule_position = u64::from_le_bytes(header[6..14].try_into().unwrap());
        let bitstream_serial = u32::from_le_bytes(header[14..18].try_into().unwrap());
        let page_sequence = u32::from_le_bytes(header[18..22].try_into().unwrap());
        let checksum = u32::from_le_bytes(header[22..26].try_into().unwrap());
        let segment_count = header[26];

        // The table is bounded at 255 entries, keep it on the stack
        let mut segment_table = [0u8; MAX_SEGMENTS];
        reader.read_exact(&mut segment_table[..segment_count as usize])?;

        let payload_len = segment_table[..segment_count as usize]
            .iter()
            .map(|&lace| u64::from(lace))
            .sum();

        Ok(PageHeader {
            version,
            header_type,
            granule_position,
            bitstream_serial,
            page_sequence,
            checksum,
            segment_count,
            payload_len,
        })
    }

    /// Payload size in bytes: the sum of the segment table entries
    pub fn payload_len(&self) -> u64 {
        self.payload_len
    }
}
