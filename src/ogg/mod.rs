// OGG container duration support (Vorbis and Opus payloads)
//
// OGG File Structure:
// - OGG Page Header (27 bytes)
//   - Capture Pattern: "OggS" (4 bytes)
//   - Version (1 byte)
//   - Header Type: 1=continuation, 2=bos, 4=eos (1 byte)
//   - Granule Position (8 bytes)
//   - Bitstream Serial Number (4 bytes)
//   - Page Sequence Number (4 bytes)
//   - CRC Checksum (4 bytes)
//   - Number of Page Segments (1 byte)
//   - Segment Table (variable)
//
// Duration is derived from granule positions alone: the codec header pages
// only contribute the declared sample rate. Elapsed samples are the distance
// between the last granule seen and the chosen anchor.

pub mod page;

use std::io::{Read, Seek, SeekFrom};

use crate::error::{ParseError, ParseResult};
use crate::utils::io;
use page::PageHeader;

pub const OGG_SIGNATURE: &[u8; 4] = b"OggS";

// Codec identification headers sit in the first pages of the stream
const VORBIS_ID_PREFIX: &[u8; 7] = b"\x01vorbis";
const OPUS_ID_PREFIX: &[u8; 8] = b"OpusHead";

// Probe budget: pages inspected and payload bytes read per page
const PROBE_PAGE_LIMIT: usize = 10;
const PROBE_PAYLOAD_BYTES: usize = 100;

// Sample rate field offsets inside the identification payloads
const VORBIS_RATE_OFFSET: usize = 12;
const OPUS_RATE_OFFSET: usize = 8;

/// Where the duration sweep anchors the stream's first sample.
///
/// Header pages carry granule position 0, so anchoring at the first strictly
/// positive granule skips them. That is an approximation inherited from the
/// original estimator, not a precise stream-start marker, hence the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GranuleAnchor {
    /// Subtract the first positive granule position seen
    #[default]
    FirstNonZero,
    /// Treat the stream as starting at granule zero
    StreamStart,
}

/// Identify the codec declared in the first pages and return its sample rate.
///
/// Non-destructive: the reader is restored to its original position whether or
/// not a codec was found.
pub fn identify_sample_rate<R: Read + Seek>(reader: &mut R) -> ParseResult<u32> {
    let original_pos = reader.stream_position()?;
    reader.seek(SeekFrom::Start(0))?;

    let result = probe_codec(reader);

    reader.seek(SeekFrom::Start(original_pos))?;
    result
}

fn probe_codec<R: Read + Seek>(reader: &mut R) -> ParseResult<u32> {
    for _ in 0..PROBE_PAGE_LIMIT {
        let header = match PageHeader::read(reader) {
            Ok(header) => header,
            Err(_) => break,
        };

        let payload_len = header.payload_len();
        let probe_len = payload_len.min(PROBE_PAYLOAD_BYTES as u64) as usize;
        let mut payload = [0u8; PROBE_PAYLOAD_BYTES];
        reader.read_exact(&mut payload[..probe_len])?;
        let payload = &payload[..probe_len];

        if probe_len >= 23 && payload.starts_with(VORBIS_ID_PREFIX) {
            let rate = &payload[VORBIS_RATE_OFFSET..VORBIS_RATE_OFFSET + 4];
            return Ok(u32::from_le_bytes(rate.try_into().unwrap()));
        }
        if probe_len >= 12 && payload.starts_with(OPUS_ID_PREFIX) {
            let rate = &payload[OPUS_RATE_OFFSET..OPUS_RATE_OFFSET + 4];
            return Ok(u32::from_le_bytes(rate.try_into().unwrap()));
        }

        if payload_len > probe_len as u64 {
            io::skip_forward(reader, payload_len - probe_len as u64)?;
        }
    }

    Err(ParseError::UnsupportedVariant("unidentified OGG codec"))
}

/// Estimate the duration of an OGG stream in whole seconds
pub fn duration<R: Read + Seek>(reader: &mut R) -> ParseResult<u64> {
    duration_with(reader, GranuleAnchor::default())
}

/// Like [`duration`], with an explicit anchoring strategy
pub fn duration_with<R: Read + Seek>(reader: &mut R, anchor: GranuleAnchor) -> ParseResult<u64> {
    let sample_rate = identify_sample_rate(reader)?;
    if sample_rate == 0 {
        return Err(ParseError::InvalidFieldValue("zero sample rate"));
    }

    reader.seek(SeekFrom::Start(0))?;

    let mut first_granule = None;
    let mut last_granule = 0u64;

    // Sweep every page until end of stream or corruption
    while let Ok(header) = PageHeader::read(reader) {
        if header.granule_position > 0 {
            if first_granule.is_none() {
                first_granule = Some(header.granule_position);
            }
            last_granule = header.granule_position;
        }
        if io::skip_forward(reader, header.payload_len()).is_err() {
            break;
        }
    }

    let Some(first_granule) = first_granule else {
        return Err(ParseError::MissingRequiredSection(
            "no page with a positive granule position",
        ));
    };

    let anchor_granule = match anchor {
        GranuleAnchor::FirstNonZero => first_granule,
        GranuleAnchor::StreamStart => 0,
    };

    // saturating: a decreasing granule sequence must not underflow
    let total_samples = last_granule.saturating_sub(anchor_granule);
    Ok(total_samples / u64::from(sample_rate))
}
