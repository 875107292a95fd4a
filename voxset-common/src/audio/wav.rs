//! WAV read/write via hound
//!
//! All voxset outputs are 16-bit PCM mono WAV. Reads accept 16-bit int or
//! 32-bit float WAV and average multi-channel files down to mono.

use crate::{Error, Result};
use std::path::Path;

/// Write mono f32 samples as a 16-bit PCM WAV file
///
/// Samples outside [-1.0, 1.0] are clamped.
pub fn write_wav_mono16(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| Error::Audio(format!("Create WAV {} failed: {}", path.display(), e)))?;

    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let value = (clamped * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .map_err(|e| Error::Audio(format!("Write WAV {} failed: {}", path.display(), e)))?;
    }

    writer
        .finalize()
        .map_err(|e| Error::Audio(format!("Finalize WAV {} failed: {}", path.display(), e)))?;

    Ok(())
}

/// Encode mono f32 samples as 16-bit PCM WAV into an in-memory buffer
///
/// Used when a service call needs WAV bytes without touching the filesystem.
pub fn encode_wav_mono16(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| Error::Audio(format!("Create WAV buffer failed: {}", e)))?;
        for &sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(value)
                .map_err(|e| Error::Audio(format!("Write WAV buffer failed: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| Error::Audio(format!("Finalize WAV buffer failed: {}", e)))?;
    }

    Ok(cursor.into_inner())
}

/// Read a WAV file as mono f32 samples plus its sample rate
///
/// Multi-channel files are averaged to mono.
pub fn read_wav_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| Error::Audio(format!("Open WAV {} failed: {}", path.display(), e)))?;

    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Audio(format!("Read WAV {} failed: {}", path.display(), e)))?,
        (hound::SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / i32::MAX as f32))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Audio(format!("Read WAV {} failed: {}", path.display(), e)))?,
        (hound::SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Audio(format!("Read WAV {} failed: {}", path.display(), e)))?,
        (format, bits) => {
            return Err(Error::Audio(format!(
                "Unsupported WAV format in {}: {:?} {} bits",
                path.display(),
                format,
                bits
            )))
        }
    };

    let samples = if channels <= 1 {
        interleaved
    } else {
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    Ok((samples, spec.sample_rate))
}
