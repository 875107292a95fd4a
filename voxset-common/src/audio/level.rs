//! Signal level math: RMS and dBFS conversions

/// Calculate RMS (Root Mean Square) of samples
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|&s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// RMS level of a clip in dBFS (0 dB = full-scale sine RMS)
///
/// Digital silence returns negative infinity.
pub fn dbfs(samples: &[f32]) -> f32 {
    let level = rms(samples);
    if level <= 0.0 {
        return f32::NEG_INFINITY;
    }
    // Full-scale reference: RMS of a maximum-amplitude square wave (1.0)
    linear_to_db(level)
}

/// Convert dB to linear amplitude
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to dB
pub fn linear_to_db(linear: f32) -> f32 {
    20.0 * linear.log10()
}
