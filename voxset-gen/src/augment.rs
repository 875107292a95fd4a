//! Noise and padding augmentation
//!
//! Expands each clip into several training variants: pad with leading and
//! trailing silence to a fixed total duration, then mix in a randomly chosen
//! noise recording at a random signal-to-noise ratio. CPU-bound, so the file
//! loop runs on the rayon pool.

use anyhow::{Context, Result};
use rand::prelude::*;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tracing::{error, info, warn};
use voxset_common::audio::{self, wav};
use voxset_common::fsutil;
use walkdir::WalkDir;

/// How many noise draws to attempt before giving up on a variant
const NOISE_RETRY_LIMIT: usize = 3;
/// Noise below this energy cannot be scaled to a meaningful SNR
const MIN_NOISE_ENERGY: f32 = 1e-20;

/// Augmentation configuration errors
#[derive(Debug, Error)]
pub enum AugmentConfigError {
    #[error("snr range inverted: {0} > {1}")]
    SnrRangeInverted(f32, f32),

    #[error("silence padding range inverted: {0} > {1}")]
    PaddingRangeInverted(f32, f32),

    #[error("total duration must be positive, got {0}")]
    NonPositiveDuration(f32),
}

/// Augmentation parameters
#[derive(Debug, Clone)]
pub struct AugmentConfig {
    /// Variants per source clip (0 disables augmentation)
    pub count: u32,
    /// SNR draw range in dB (lower = noisier)
    pub snr_range: (f32, f32),
    /// Leading silence, fixed (seconds)
    pub pre_silence_secs: f32,
    /// Trailing silence draw range (seconds)
    pub post_silence_range: (f32, f32),
    /// Total output duration (seconds)
    pub total_duration_secs: f32,
    /// Output sample rate
    pub sample_rate: u32,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            count: 10,
            snr_range: (-12.0, 18.0),
            pre_silence_secs: 0.1,
            post_silence_range: (0.0, 0.0),
            total_duration_secs: 1.6,
            sample_rate: 16000,
        }
    }
}

impl AugmentConfig {
    pub fn validate(&self) -> Result<(), AugmentConfigError> {
        if self.snr_range.0 > self.snr_range.1 {
            return Err(AugmentConfigError::SnrRangeInverted(
                self.snr_range.0,
                self.snr_range.1,
            ));
        }
        if self.post_silence_range.0 > self.post_silence_range.1 {
            return Err(AugmentConfigError::PaddingRangeInverted(
                self.post_silence_range.0,
                self.post_silence_range.1,
            ));
        }
        if self.total_duration_secs <= 0.0 {
            return Err(AugmentConfigError::NonPositiveDuration(
                self.total_duration_secs,
            ));
        }
        Ok(())
    }
}

/// Pad with silence and fit to the target duration
///
/// Overlong audio is center-cropped; short audio gets trailing zeros.
pub fn pad_to_duration(
    samples: &[f32],
    config: &AugmentConfig,
    rng: &mut impl Rng,
) -> Vec<f32> {
    let rate = config.sample_rate as f32;
    let pre = (config.pre_silence_secs * rate) as usize;
    let post_secs = if config.post_silence_range.0 < config.post_silence_range.1 {
        rng.gen_range(config.post_silence_range.0..=config.post_silence_range.1)
    } else {
        config.post_silence_range.0
    };
    let post = (post_secs * rate) as usize;

    let mut padded = Vec::with_capacity(pre + samples.len() + post);
    padded.extend(std::iter::repeat(0.0).take(pre));
    padded.extend_from_slice(samples);
    padded.extend(std::iter::repeat(0.0).take(post));

    let total = (config.total_duration_secs * rate) as usize;

    if padded.len() > total {
        let excess = padded.len() - total;
        let start = excess / 2;
        padded[start..start + total].to_vec()
    } else {
        padded.extend(std::iter::repeat(0.0).take(total - padded.len()));
        padded
    }
}

/// Mix noise into audio at the given SNR (dB)
///
/// The noise is looped to length, scaled so that
/// `10*log10(Ea/En_scaled) == snr`, and the sum is peak-normalized when it
/// clips. Returns `None` when the noise carries no energy.
pub fn mix_noise(audio: &[f32], noise: &[f32], snr_db: f32) -> Option<Vec<f32>> {
    if noise.is_empty() {
        return None;
    }

    // Loop-fill noise to the audio length
    let looped: Vec<f32> = noise.iter().cycle().take(audio.len()).copied().collect();

    let audio_energy: f32 = audio.iter().map(|&s| s * s).sum();
    let noise_energy: f32 = looped.iter().map(|&s| s * s).sum();

    if noise_energy <= MIN_NOISE_ENERGY {
        return None;
    }

    let factor = (audio_energy / (noise_energy * 10.0f32.powf(snr_db / 10.0))).sqrt();

    let mut mixed: Vec<f32> = audio
        .iter()
        .zip(looped.iter())
        .map(|(&a, &n)| a + n * factor)
        .collect();

    // Peak-normalize to avoid clipping
    let peak = mixed.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    if peak > 1.0 {
        for sample in &mut mixed {
            *sample /= peak;
        }
    }

    Some(mixed)
}

/// Augment every WAV under `data_dir` into `out_dir`
///
/// Returns the number of source files successfully augmented.
pub fn augment_tree(
    data_dir: &Path,
    out_dir: &Path,
    noise_dir: &Path,
    config: &AugmentConfig,
) -> Result<usize> {
    config.validate()?;
    fsutil::ensure_dir(out_dir)?;

    if config.count == 0 {
        info!("Augmentation count is 0, nothing to do");
        return Ok(0);
    }

    let audio_files = collect_wavs(data_dir);
    if audio_files.is_empty() {
        warn!("No WAV files found under {}", data_dir.display());
        return Ok(0);
    }

    let noise_files = collect_wavs(noise_dir);
    if noise_files.is_empty() {
        warn!("No noise WAVs under {}, skipping augmentation", noise_dir.display());
        return Ok(0);
    }

    info!(
        "Augmenting {} files x {} variants with {} noise recordings",
        audio_files.len(),
        config.count,
        noise_files.len()
    );

    let done = AtomicUsize::new(0);
    let ok = AtomicUsize::new(0);
    let total = audio_files.len();

    audio_files.par_iter().for_each(|file| {
        match augment_file(file, out_dir, &noise_files, config) {
            Ok(()) => {
                ok.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                error!(file = %file.display(), "Augmentation failed: {:#}", e);
            }
        }

        let completed = done.fetch_add(1, Ordering::Relaxed) + 1;
        if completed % 100 == 0 || completed == total {
            info!(
                "Progress: {}/{} ({:.2}%)",
                completed,
                total,
                completed as f64 * 100.0 / total as f64
            );
        }
    });

    let succeeded = ok.load(Ordering::Relaxed);
    info!("Augmentation complete: {}/{} files", succeeded, total);
    Ok(succeeded)
}

/// Generate all variants for one source clip
fn augment_file(
    file: &Path,
    out_dir: &Path,
    noise_files: &[PathBuf],
    config: &AugmentConfig,
) -> Result<()> {
    let (samples, rate) = wav::read_wav_mono(file)?;
    let samples = audio::resample_mono(&samples, rate, config.sample_rate)?;

    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut rng = rand::thread_rng();

    for _ in 0..config.count {
        let padded = pad_to_duration(&samples, config, &mut rng);

        // Some noise recordings are unusable (digital silence); redraw
        let mut written = false;
        for _ in 0..NOISE_RETRY_LIMIT {
            let noise_file = noise_files
                .choose(&mut rng)
                .context("noise list unexpectedly empty")?;
            let noise = match load_noise(noise_file, config.sample_rate) {
                Ok(noise) => noise,
                Err(e) => {
                    warn!(file = %noise_file.display(), "Noise load failed: {:#}", e);
                    continue;
                }
            };

            let snr = rng.gen_range(config.snr_range.0..=config.snr_range.1);
            if let Some(mixed) = mix_noise(&padded, &noise, snr) {
                let out_path = fsutil::unique_path(
                    &out_dir.join(format!("{}_padded_snr{}.wav", stem, snr as i32)),
                );
                wav::write_wav_mono16(&out_path, &mixed, config.sample_rate)?;
                written = true;
                break;
            }
        }

        if !written {
            warn!(file = %file.display(), "All noise draws failed for a variant");
        }
    }

    Ok(())
}

fn load_noise(path: &Path, sample_rate: u32) -> Result<Vec<f32>> {
    let (noise, rate) = wav::read_wav_mono(path)?;
    audio::resample_mono(&noise, rate, sample_rate)
}

fn collect_wavs(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|e| e.eq_ignore_ascii_case("wav"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> AugmentConfig {
        AugmentConfig::default()
    }

    #[test]
    fn test_validate_rejects_inverted_snr() {
        let bad = AugmentConfig {
            snr_range: (18.0, -12.0),
            ..config()
        };
        assert!(matches!(
            bad.validate(),
            Err(AugmentConfigError::SnrRangeInverted(_, _))
        ));
    }

    #[test]
    fn test_pad_short_clip_to_duration() {
        let mut rng = StdRng::seed_from_u64(1);
        // 0.5 s clip -> 1.6 s output
        let samples = vec![0.5f32; 8000];
        let padded = pad_to_duration(&samples, &config(), &mut rng);

        assert_eq!(padded.len(), (1.6 * 16000.0) as usize);
        // Leading 0.1 s is silence
        assert!(padded[..1600].iter().all(|&s| s == 0.0));
        // Clip follows
        assert_eq!(padded[1600], 0.5);
    }

    #[test]
    fn test_pad_long_clip_center_crops() {
        let mut rng = StdRng::seed_from_u64(1);
        // 3 s clip -> center 1.6 s
        let samples: Vec<f32> = (0..48000).map(|i| i as f32 / 48000.0).collect();
        let padded = pad_to_duration(&samples, &config(), &mut rng);

        assert_eq!(padded.len(), (1.6 * 16000.0) as usize);
        // Cropped from the middle, so it starts well above zero
        assert!(padded[0] > 0.2);
    }

    #[test]
    fn test_mix_noise_hits_requested_snr() {
        let audio: Vec<f32> = (0..16000)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0).sin())
            .collect();
        let noise: Vec<f32> = (0..16000)
            .map(|i| 0.1 * (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 16000.0).sin())
            .collect();

        let snr = 6.0;
        let mixed = mix_noise(&audio, &noise, snr).unwrap();
        assert_eq!(mixed.len(), audio.len());

        // Recover the noise component and check the achieved SNR
        let residual: Vec<f32> = mixed.iter().zip(audio.iter()).map(|(&m, &a)| m - a).collect();
        let ea: f32 = audio.iter().map(|&s| s * s).sum();
        let en: f32 = residual.iter().map(|&s| s * s).sum();
        let achieved = 10.0 * (ea / en).log10();
        assert!((achieved - snr).abs() < 0.5, "achieved SNR {achieved}");
    }

    #[test]
    fn test_mix_noise_rejects_silent_noise() {
        let audio = vec![0.5f32; 1000];
        let noise = vec![0.0f32; 100];
        assert!(mix_noise(&audio, &noise, 6.0).is_none());
        assert!(mix_noise(&audio, &[], 6.0).is_none());
    }

    #[test]
    fn test_mix_noise_short_noise_loops() {
        let audio = vec![0.5f32; 1000];
        let noise = vec![0.1f32; 64];
        let mixed = mix_noise(&audio, &noise, 0.0).unwrap();
        assert_eq!(mixed.len(), 1000);
    }

    #[test]
    fn test_mix_noise_peak_normalized() {
        let audio = vec![0.9f32; 1000];
        let noise = vec![0.9f32; 1000];
        let mixed = mix_noise(&audio, &noise, -12.0).unwrap();
        let peak = mixed.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!(peak <= 1.0 + f32::EPSILON);
    }
}
