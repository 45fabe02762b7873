// Shared parse failure taxonomy for all format parsers.
//
// Malformed input is never a panic: every parser reports one of these kinds
// and the caller decides whether to surface it or fall back to "unknown".

use std::io;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug)]
pub enum ParseError {
    /// Missing or mismatched magic bytes ("RIFF", "OggS", "fLaC", frame sync).
    BadSignature(&'static str),
    /// Fewer bytes available than a structure requires.
    TruncatedInput,
    /// A recognized container carrying something we do not handle
    /// (non-PCM WAV, unidentified OGG codec, reserved MP3 version/layer bits).
    UnsupportedVariant(&'static str),
    /// A required section never showed up (fmt/data chunk, STREAMINFO block,
    /// valid MP3 frame, non-zero granule position).
    MissingRequiredSection(&'static str),
    /// A field decoded fine but holds a value that makes duration undefined
    /// (zero sample rate, zero channel count, zero frame size).
    InvalidFieldValue(&'static str),
    /// Seek/read failure other than end-of-stream.
    Io(io::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::BadSignature(what) => write!(f, "Bad signature: {}", what),
            ParseError::TruncatedInput => write!(f, "Truncated input"),
            ParseError::UnsupportedVariant(what) => write!(f, "Unsupported variant: {}", what),
            ParseError::MissingRequiredSection(what) => write!(f, "Missing required section: {}", what),
            ParseError::InvalidFieldValue(what) => write!(f, "Invalid field value: {}", what),
            ParseError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        // read_exact hitting end-of-stream is a short structure, not an I/O fault
        if e.kind() == io::ErrorKind::UnexpectedEof {
            ParseError::TruncatedInput
        } else {
            ParseError::Io(e)
        }
    }
}
