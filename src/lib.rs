// playtime - audio playback duration estimation
//
// Estimates how long an audio file plays by parsing container and frame
// metadata only: chunk sizes, granule positions, sample counts, frame
// headers. No audio is ever decoded.
//
// Supported formats: WAV (RIFF/PCM), OGG (Vorbis/Opus), FLAC, MP3.

pub mod error;
pub mod flac;
pub mod mp3;
pub mod ogg;
pub mod wav;

mod utils;

#[cfg(feature = "python")]
mod python;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

pub use error::{ParseError, ParseResult};
pub use mp3::ScanOptions;
pub use ogg::GranuleAnchor;

/// The four supported formats, selected by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Ogg,
    Flac,
    Mp3,
}

impl AudioFormat {
    /// Map a bare extension (without the dot) to a format, case-insensitively
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "wav" => Some(AudioFormat::Wav),
            "ogg" => Some(AudioFormat::Ogg),
            "flac" => Some(AudioFormat::Flac),
            "mp3" => Some(AudioFormat::Mp3),
            _ => None,
        }
    }

    /// Dispatch on a path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::from_extension)
    }

    /// Estimate the duration of a stream of this format, in whole seconds.
    /// The reader is expected to sit at the start of the stream.
    pub fn duration<R: Read + Seek>(self, reader: &mut R) -> ParseResult<u64> {
        self.duration_with(reader, &ProbeOptions::default())
    }

    /// Like [`AudioFormat::duration`], with explicit heuristic tuning
    pub fn duration_with<R: Read + Seek>(
        self,
        reader: &mut R,
        options: &ProbeOptions,
    ) -> ParseResult<u64> {
        match self {
            AudioFormat::Wav => wav::duration(reader),
            AudioFormat::Ogg => ogg::duration_with(reader, options.ogg_anchor),
            AudioFormat::Flac => flac::duration(reader),
            AudioFormat::Mp3 => mp3::duration_with(reader, options.mp3),
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Flac => "flac",
            AudioFormat::Mp3 => "mp3",
        })
    }
}

/// Accuracy/speed trade-offs baked into the estimators.
///
/// The defaults reproduce the classic heuristics: MP3 extrapolates after ten
/// constant-bitrate frames, OGG anchors at the first positive granule. Both
/// are approximations by design and can be tightened here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeOptions {
    /// MP3 frame scan tuning
    pub mp3: mp3::ScanOptions,
    /// OGG granule anchoring strategy
    pub ogg_anchor: ogg::GranuleAnchor,
}

/// Estimate the duration of a WAV stream in whole seconds
pub fn duration_of_wav<R: Read + Seek>(reader: &mut R) -> ParseResult<u64> {
    wav::duration(reader)
}

/// Estimate the duration of an OGG stream in whole seconds
pub fn duration_of_ogg<R: Read + Seek>(reader: &mut R) -> ParseResult<u64> {
    ogg::duration(reader)
}

/// Estimate the duration of a FLAC stream in whole seconds
pub fn duration_of_flac<R: Read + Seek>(reader: &mut R) -> ParseResult<u64> {
    flac::duration(reader)
}

/// Estimate the duration of an MP3 stream in whole seconds
pub fn duration_of_mp3<R: Read + Seek>(reader: &mut R) -> ParseResult<u64> {
    mp3::duration(reader)
}

/// Open a file, dispatch by extension, and surface the failure reason
pub fn probe_path<P: AsRef<Path>>(path: P) -> ParseResult<u64> {
    let path = path.as_ref();
    let Some(format) = AudioFormat::from_path(path) else {
        return Err(ParseError::UnsupportedVariant("unrecognized file extension"));
    };

    // The handle lives exactly as long as the parse call
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    format.duration(&mut reader)
}

/// Estimate a file's duration in whole seconds.
///
/// Returns 0 for unsupported extensions and unparseable files; this is the
/// flat contract the foreign-binding layer exposes. Use [`probe_path`] when
/// the failure reason matters.
pub fn audio_duration<P: AsRef<Path>>(path: P) -> u64 {
    probe_path(path).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_extension_dispatch_is_case_insensitive() {
        assert_eq!(AudioFormat::from_extension("wav"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_extension("WAV"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_extension("Mp3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_extension("FLAC"), Some(AudioFormat::Flac));
        assert_eq!(AudioFormat::from_extension("oGg"), Some(AudioFormat::Ogg));
        assert_eq!(AudioFormat::from_extension("m4a"), None);
        assert_eq!(AudioFormat::from_extension(""), None);
    }

    #[test]
    fn test_path_dispatch() {
        assert_eq!(
            AudioFormat::from_path("/music/track.FLAC"),
            Some(AudioFormat::Flac)
        );
        assert_eq!(AudioFormat::from_path("/music/track.aiff"), None);
        assert_eq!(AudioFormat::from_path("/music/noextension"), None);
    }

    #[test]
    fn test_missing_file_is_zero() {
        assert_eq!(audio_duration("/definitely/not/here.mp3"), 0);
        assert_eq!(audio_duration("/definitely/not/here.xyz"), 0);
    }

    #[test]
    fn test_dispatch_runs_the_right_parser() {
        // Garbage rejected by each parser with its own signature check
        let garbage = b"definitely not audio data";
        assert!(matches!(
            AudioFormat::Wav.duration(&mut Cursor::new(garbage)),
            Err(ParseError::BadSignature(_))
        ));
        assert!(matches!(
            AudioFormat::Flac.duration(&mut Cursor::new(garbage)),
            Err(ParseError::BadSignature(_))
        ));
        assert!(matches!(
            AudioFormat::Ogg.duration(&mut Cursor::new(garbage)),
            Err(ParseError::UnsupportedVariant(_))
        ));
        assert!(matches!(
            AudioFormat::Mp3.duration(&mut Cursor::new(garbage)),
            Err(ParseError::MissingRequiredSection(_))
        ));
    }
}
