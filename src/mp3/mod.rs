// MP3 duration estimation
//
// MP3 files have no container: they are a bare sequence of MPEG audio frames,
// optionally preceded by an ID3v2 tag. Duration is estimated by walking frame
// headers and accumulating their sample counts, never by decoding audio.
//
// Constant-bitrate files are extrapolated from a small frame sample; files
// whose bitrate varies are walked frame by frame to end of file, which is
// slower but exact to the granularity of the frames actually parsed.

pub mod header;

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use crate::error::{ParseError, ParseResult};
use crate::utils::io;

pub use header::{FrameHeader, Layer, MpegVersion};

const ID3V2_TAG_ID: &[u8; 3] = b"ID3";

// A first frame starting with one of these carries encoder metadata, not audio
const VBR_TAG_IDS: [&[u8; 4]; 3] = [b"Xing", b"Info", b"VBRI"];

/// Valid frames sampled before a constant-bitrate file is extrapolated
pub const DEFAULT_CBR_PROBE_FRAMES: u64 = 10;

/// Tuning knobs for the frame scan
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Valid frames to observe before extrapolating a constant-bitrate file
    pub cbr_probe_frames: u64,
    /// Walk every frame to end of file even when the bitrate never varies
    pub full_scan: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            cbr_probe_frames: DEFAULT_CBR_PROBE_FRAMES,
            full_scan: false,
        }
    }
}

/// Estimate the duration of an MP3 stream in whole seconds
pub fn duration<R: Read + Seek>(reader: &mut R) -> ParseResult<u64> {
    duration_with(reader, ScanOptions::default())
}

/// Like [`duration`], with explicit scan options
pub fn duration_with<R: Read + Seek>(reader: &mut R, options: ScanOptions) -> ParseResult<u64> {
    skip_id3v2(reader)?;

    let audio_start = reader.stream_position()?;
    let file_size = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(audio_start))?;

    let mut total_frames = 0u64;
    let mut total_samples = 0u64;
    let mut sample_rate = 0u32;
    let mut first_bitrate = 0u32;
    let mut variable_bitrate = false;

    let mut pos = audio_start;
    while pos + 4 < file_size {
        let word = match io::read_be_u32(reader) {
            Ok(word) => word,
            Err(_) => break,
        };

        let Some(frame) = FrameHeader::parse(word) else {
            // Framing noise: resynchronize one byte further on
            pos += 1;
            reader.seek(SeekFrom::Start(pos))?;
            continue;
        };

        total_frames += 1;
        pos += u64::from(frame.frame_size);

        if total_frames == 1 {
            sample_rate = frame.sample_rate;
            first_bitrate = frame.bitrate;

            // A VBR tag frame establishes the baseline but carries no audio
            if starts_with_vbr_tag(reader)? {
                reader.seek(SeekFrom::Start(pos))?;
                continue;
            }
        } else if frame.bitrate != first_bitrate {
            variable_bitrate = true;
        }

        total_samples += frame.samples_per_frame();
        reader.seek(SeekFrom::Start(pos))?;

        // Bitrate stable over the probe window: extrapolate and stop
        if !options.full_scan && !variable_bitrate && total_frames >= options.cbr_probe_frames {
            let estimated_frames = file_size as f64 / f64::from(frame.frame_size);
            total_samples = (estimated_frames * frame.samples_per_frame() as f64) as u64;
            break;
        }
    }

    if sample_rate == 0 || total_samples == 0 {
        return Err(ParseError::MissingRequiredSection("no valid MP3 frame"));
    }
    Ok(total_samples / u64::from(sample_rate))
}

/// Skip a leading ID3v2 tag if present, otherwise leave the position untouched.
///
/// The tag size is a 28-bit syncsafe integer so the tag body can never collide
/// with the frame sync pattern.
fn skip_id3v2<R: Read + Seek>(reader: &mut R) -> ParseResult<()> {
    let original_pos = reader.stream_position()?;

    let mut tag_header = [0u8; 10];
    if reader.read_exact(&mut tag_header).is_err() {
        reader.seek(SeekFrom::Start(original_pos))?;
        return Ok(());
    }

    if &tag_header[0..3] == ID3V2_TAG_ID {
        let tag_size = io::decode_syncsafe(tag_header[6..10].try_into().unwrap());
        io::skip_forward(reader, u64::from(tag_size))?;
    } else {
        reader.seek(SeekFrom::Start(original_pos))?;
    }
    Ok(())
}

/// Check whether the frame body at the current position opens with a VBR tag.
/// Non-destructive; a short read near end of file simply means no tag.
fn starts_with_vbr_tag<R: Read + Seek>(reader: &mut R) -> ParseResult<bool> {
    let probe_pos = reader.stream_position()?;

    let mut probe = [0u8; 12];
    let found = match reader.read_exact(&mut probe) {
        Ok(()) => VBR_TAG_IDS.iter().any(|id| probe.starts_with(*id)),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => false,
        Err(e) => return Err(e.into()),
    };

    reader.seek(SeekFrom::Start(probe_pos))?;
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    // V1, Layer III, 44100 Hz, no padding; bitrate picked by table index
    fn build_frame(bitrate_index: u8) -> Vec<u8> {
        let word = 0xFFFB_0000u32 | (u32::from(bitrate_index) << 12);
        let header = FrameHeader::parse(word).unwrap();
        let mut frame = word.to_be_bytes().to_vec();
        frame.resize(header.frame_size as usize, 0);
        frame
    }

    fn repeat_frames(bitrate_index: u8, count: usize) -> Vec<u8> {
        let frame = build_frame(bitrate_index);
        let mut bytes = Vec::with_capacity(frame.len() * count);
        for _ in 0..count {
            bytes.extend_from_slice(&frame);
        }
        bytes
    }

    #[test]
    fn test_cbr_extrapolation() {
        // 100 frames at 128 kbps: 41700 bytes, 115200 samples, 2.61s -> 2
        let bytes = repeat_frames(9, 100);
        assert_eq!(duration(&mut Cursor::new(&bytes)).unwrap(), 2);

        // Within one frame of the bitrate-derived estimate
        let estimate = (bytes.len() * 8) as f64 / 128_000.0;
        let frame_time = 1152.0 / 44100.0;
        assert!((estimate - 115_200.0 / 44100.0).abs() < frame_time);
    }

    #[test]
    fn test_cbr_scan_stops_after_probe_window() {
        // 10 real frames then opaque junk of the same total size: the
        // extrapolation never looks at the junk and still reports the
        // file-size-derived estimate.
        let mut bytes = repeat_frames(9, 10);
        bytes.resize(417 * 100, 0);
        assert_eq!(duration(&mut Cursor::new(&bytes)).unwrap(), 2);

        // A full scan walks into the junk and only finds the 10 real frames
        let options = ScanOptions {
            full_scan: true,
            ..ScanOptions::default()
        };
        assert_eq!(duration_with(&mut Cursor::new(&bytes), options).unwrap(), 0);
    }

    #[test]
    fn test_vbr_files_are_scanned_exactly() {
        // Bitrate flips on the second frame, so no extrapolation: every frame
        // is parsed and the total is the exact per-frame sample sum.
        let mut bytes = Vec::new();
        for i in 0..100 {
            bytes.extend_from_slice(&build_frame(if i % 2 == 0 { 14 } else { 1 }));
        }
        // 100 * 1152 / 44100 = 2.61s; an extrapolation from either frame size
        // would land far away (1s or 14s), so 2 proves the exact path.
        assert_eq!(duration(&mut Cursor::new(&bytes)).unwrap(), 2);
    }

    #[test]
    fn test_id3v2_tag_is_skipped() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"ID3\x04\x00\x00");
        bytes.extend_from_slice(&[0x00, 0x00, 0x02, 0x2C]); // syncsafe 300
        bytes.extend_from_slice(&[0u8; 300]);
        bytes.extend_from_slice(&repeat_frames(9, 100));
        assert_eq!(duration(&mut Cursor::new(&bytes)).unwrap(), 2);
    }

    #[test]
    fn test_resynchronizes_over_leading_noise() {
        let mut bytes = vec![0u8; 7];
        bytes.extend_from_slice(&repeat_frames(9, 150));
        // 150 * 1152 / 44100 = 3.9s
        assert_eq!(duration(&mut Cursor::new(&bytes)).unwrap(), 3);
    }

    #[test]
    fn test_xing_frame_contributes_no_samples() {
        let options = ScanOptions {
            full_scan: true,
            ..ScanOptions::default()
        };

        // 38 audio frames sit just below the one second mark; counting the
        // Xing frame too would cross it.
        let mut tag_frame = build_frame(9);
        tag_frame[4..8].copy_from_slice(b"Xing");
        let mut bytes = tag_frame.clone();
        bytes.extend_from_slice(&repeat_frames(9, 38));
        assert_eq!(duration_with(&mut Cursor::new(&bytes), options).unwrap(), 0);

        // Same layout without the tag marker: 39 audio frames, one second
        let bytes = repeat_frames(9, 39);
        assert_eq!(duration_with(&mut Cursor::new(&bytes), options).unwrap(), 1);
    }

    #[test]
    fn test_no_valid_frame_fails() {
        let bytes = vec![0u8; 100];
        let err = duration(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, ParseError::MissingRequiredSection(_)));

        let err = duration(&mut Cursor::new(&[] as &[u8])).unwrap_err();
        assert!(matches!(err, ParseError::MissingRequiredSection(_)));
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let bytes = repeat_frames(9, 100);
        let first = duration(&mut Cursor::new(&bytes)).unwrap();
        let second = duration(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(first, second);
    }
}
