//! Mono resampling using rubato

use anyhow::{Context, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Resample mono PCM samples to a target sample rate
///
/// Uses sinc interpolation with a BlackmanHarris2 window, 256-tap filter and
/// a 0.95 cutoff to prevent aliasing. Processes the whole input as a single
/// chunk. Returns the input unchanged when the rates already match.
pub fn resample_mono(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let resample_ratio = target_rate as f64 / source_rate as f64;

    // Chunk size = input length for single-pass processing
    let mut resampler = SincFixedIn::<f32>::new(
        resample_ratio,
        4.0, // Max resample ratio factor (48k -> 16k needs 3x down)
        params,
        samples.len(),
        1, // mono
    )
    .context("Failed to create rubato resampler")?;

    let input_channels = vec![samples.to_vec()];

    let mut output_channels = resampler
        .process(&input_channels, None)
        .context("Rubato resampling failed")?;

    let output = output_channels.remove(0);

    tracing::debug!(
        "Resampled {} samples ({} Hz) -> {} samples ({} Hz)",
        samples.len(),
        source_rate,
        output.len(),
        target_rate
    );

    Ok(output)
}
