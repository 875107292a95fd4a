//! Audio test fixture generator
//!
//! Utilities for generating mono WAV files with speech-like bursts separated
//! by silence, for exercising the segmentation pipeline without real
//! recordings.

use std::path::{Path, PathBuf};

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub sample_rate: u32,
    /// Peak amplitude of voiced bursts (linear)
    pub amplitude: f32,
    /// (voiced_ms, silence_ms) pairs rendered in order
    pub bursts: Vec<(u64, u64)>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            amplitude: 0.3,
            bursts: vec![(1000, 1000), (1200, 1000)],
        }
    }
}

/// Render the configured burst pattern as mono samples
pub fn render_samples(config: &AudioConfig) -> Vec<f32> {
    let mut samples = Vec::new();

    for &(voiced_ms, silence_ms) in &config.bursts {
        let voiced = (voiced_ms * config.sample_rate as u64 / 1000) as usize;
        for i in 0..voiced {
            // 220 Hz tone as a speech stand-in
            let t = i as f32 / config.sample_rate as f32;
            samples.push(config.amplitude * (2.0 * std::f32::consts::PI * 220.0 * t).sin());
        }

        let silent = (silence_ms * config.sample_rate as u64 / 1000) as usize;
        samples.extend(std::iter::repeat(0.0).take(silent));
    }

    samples
}

/// Generate a test WAV file with the configured burst pattern
pub fn generate_test_wav(path: &Path, config: &AudioConfig) -> anyhow::Result<PathBuf> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for sample in render_samples(config) {
        writer.write_sample((sample * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;

    Ok(path.to_path_buf())
}
