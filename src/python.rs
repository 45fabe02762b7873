// Python binding layer
//
// Exposes the path-level duration entry points to Python. Every function
// takes a path and returns whole seconds, with 0 meaning unsupported or
// unparseable; that flat integer contract is what callers of the original
// native module expect.

use pyo3::prelude::*;

use crate::AudioFormat;

#[pymodule]
fn playtime(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(get_audio_duration, m)?)?;
    m.add_function(wrap_pyfunction!(get_wav_duration, m)?)?;
    m.add_function(wrap_pyfunction!(get_ogg_duration, m)?)?;
    m.add_function(wrap_pyfunction!(get_flac_duration, m)?)?;
    m.add_function(wrap_pyfunction!(get_mp3_duration, m)?)?;
    Ok(())
}

/// Duration of any supported audio file, dispatched by extension
#[pyfunction]
fn get_audio_duration(path: &str) -> u64 {
    crate::audio_duration(path)
}

/// Duration of a WAV file, regardless of its extension
#[pyfunction]
fn get_wav_duration(path: &str) -> u64 {
    duration_as(AudioFormat::Wav, path)
}

/// Duration of an OGG file, regardless of its extension
#[pyfunction]
fn get_ogg_duration(path: &str) -> u64 {
    duration_as(AudioFormat::Ogg, path)
}

/// Duration of a FLAC file, regardless of its extension
#[pyfunction]
fn get_flac_duration(path: &str) -> u64 {
    duration_as(AudioFormat::Flac, path)
}

/// Duration of an MP3 file, regardless of its extension
#[pyfunction]
fn get_mp3_duration(path: &str) -> u64 {
    duration_as(AudioFormat::Mp3, path)
}

fn duration_as(format: AudioFormat, path: &str) -> u64 {
    let Ok(file) = std::fs::File::open(path) else {
        return 0;
    };
    let mut reader = std::io::BufReader::new(file);
    format.duration(&mut reader).unwrap_or(0)
}
