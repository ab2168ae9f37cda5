use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader};

use super::error::{DatasetError, Result};

/// Decoded contents of a `.wav` file.
///
/// Samples keep their stored amplitude (integer PCM is not rescaled) and are
/// interleaved when there is more than one channel. 8-bit PCM is unsigned on
/// disk, so its samples range over 0..=255 with silence at 128.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f64>,
}

/// Decode a whole WAV file into memory.
pub fn read_wav(path: &Path) -> Result<Waveform> {
    let wave_err = |source: hound::Error| DatasetError::Waveform {
        path: PathBuf::from(path),
        source,
    };

    let mut reader = WavReader::open(path).map_err(wave_err)?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(DatasetError::InvalidSampleRate {
            path: path.to_path_buf(),
        });
    }

    // hound centres 8-bit samples on zero; undo that to get the stored byte.
    let offset = if spec.bits_per_sample == 8 { 128.0 } else { 0.0 };

    let samples = match spec.sample_format {
        SampleFormat::Int => reader
            .samples::<i32>()
            .map(|s| s.map(|v| f64::from(v) + offset))
            .collect::<std::result::Result<Vec<_>, _>>(),
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>(),
    }
    .map_err(wave_err)?;

    log::debug!(
        "Decoded {}: {} Hz, {} ch, {} samples",
        path.display(),
        spec.sample_rate,
        spec.channels,
        samples.len()
    );

    Ok(Waveform {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        samples,
    })
}
