//! Batch WAV resampling

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use voxset_common::audio::{self, wav};
use voxset_common::fsutil;

/// Resample every WAV in `input_dir` (non-recursive) to `target_rate`
///
/// When `output_dir` is `None`, writes into a `resampled_{rate}Hz` folder
/// beside the inputs. Returns the paths written.
pub fn resample_folder(
    input_dir: &Path,
    output_dir: Option<&Path>,
    target_rate: u32,
) -> Result<Vec<PathBuf>> {
    let output_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input_dir.join(format!("resampled_{}Hz", target_rate)),
    };
    fsutil::ensure_dir(&output_dir)?;

    let mut written = Vec::new();

    let entries = std::fs::read_dir(input_dir)
        .with_context(|| format!("Reading {}", input_dir.display()))?;

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_wav = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase().ends_with(".wav"))
            .unwrap_or(false);
        if !is_wav {
            continue;
        }

        let out_path = output_dir.join(path.file_name().unwrap_or_default());
        match resample_file(&path, &out_path, target_rate) {
            Ok(original_rate) => {
                info!(
                    "Resampled {} ({} Hz -> {} Hz)",
                    path.display(),
                    original_rate,
                    target_rate
                );
                written.push(out_path);
            }
            Err(e) => {
                error!(file = %path.display(), "Resample failed: {:#}", e);
            }
        }
    }

    info!(
        "Resampling finished: {} files written to {}",
        written.len(),
        output_dir.display()
    );
    Ok(written)
}

/// Resample a single WAV; returns the original sample rate
pub fn resample_file(input: &Path, output: &Path, target_rate: u32) -> Result<u32> {
    let (samples, original_rate) = wav::read_wav_mono(input)?;
    let resampled = audio::resample_mono(&samples, original_rate, target_rate)?;
    wav::write_wav_mono16(output, &resampled, target_rate)?;
    Ok(original_rate)
}
