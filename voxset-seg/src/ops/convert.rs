//! External-tool format conversion
//!
//! Recordings sometimes arrive with doubled extensions (`name.wav.mp3`,
//! `name.wav.m4a`). Conversion to canonical 16 kHz mono 16-bit WAV shells
//! out to ffmpeg, which is treated as an external collaborator.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{error, info};

/// Conversion errors
#[derive(Debug, Error)]
pub enum ConvertError {
    /// ffmpeg binary not found in PATH
    #[error("ffmpeg not found in PATH")]
    FfmpegNotFound,

    /// ffmpeg exited with a failure
    #[error("ffmpeg failed on {0}: {1}")]
    FfmpegFailed(PathBuf, String),

    /// File name does not end in a supported doubled extension
    #[error("Unsupported file format: {0} (expected .wav.mp3 or .wav.m4a)")]
    UnsupportedFormat(PathBuf),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Check that ffmpeg is runnable
pub fn check_ffmpeg() -> Result<(), ConvertError> {
    match Command::new("ffmpeg").arg("-version").output() {
        Ok(output) if output.status.success() => Ok(()),
        _ => Err(ConvertError::FfmpegNotFound),
    }
}

/// Convert one doubled-extension file to canonical WAV beside it
///
/// Returns the output path.
pub fn convert_file(input: &Path, sample_rate: u32) -> Result<PathBuf, ConvertError> {
    if !input.exists() {
        return Err(ConvertError::FileNotFound(input.to_path_buf()));
    }

    let name = input.to_string_lossy();
    if !name.ends_with(".wav.mp3") && !name.ends_with(".wav.m4a") {
        return Err(ConvertError::UnsupportedFormat(input.to_path_buf()));
    }

    // Strip the trailing ".mp3" / ".m4a" to land on the ".wav" name
    let output = PathBuf::from(name.trim_end_matches(".mp3").trim_end_matches(".m4a"));

    info!(
        "Converting {} -> {}",
        input.display(),
        output.display()
    );

    let result = Command::new("ffmpeg")
        .arg("-i")
        .arg(input)
        .args(["-acodec", "pcm_s16le"])
        .args(["-ar", &sample_rate.to_string()])
        .args(["-ac", "1"])
        .arg("-y")
        .arg(&output)
        .output()
        .map_err(|_| ConvertError::FfmpegNotFound)?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr).to_string();
        return Err(ConvertError::FfmpegFailed(input.to_path_buf(), stderr));
    }

    Ok(output)
}

/// Convert all doubled-extension files in a directory (non-recursive)
///
/// Returns converted output paths; per-file failures are logged and skipped.
pub fn convert_folder(dir: &Path, sample_rate: u32) -> Result<Vec<PathBuf>> {
    check_ffmpeg()?;

    let mut converted = Vec::new();
    let mut candidates = 0usize;

    for entry in std::fs::read_dir(dir)?.filter_map(|e| e.ok()) {
        let path = entry.path();
        let name = path.to_string_lossy();
        if !name.ends_with(".wav.mp3") && !name.ends_with(".wav.m4a") {
            continue;
        }
        candidates += 1;

        match convert_file(&path, sample_rate) {
            Ok(output) => {
                info!("Converted: {}", output.display());
                converted.push(output);
            }
            Err(e) => {
                error!(file = %path.display(), "Conversion failed: {}", e);
            }
        }
    }

    info!("Converted {}/{} files in {}", converted.len(), candidates, dir.display());
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_convert_rejects_plain_wav() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plain.wav");
        std::fs::write(&path, b"x").unwrap();

        let result = convert_file(&path, 16000);
        assert!(matches!(result, Err(ConvertError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_convert_missing_file() {
        let result = convert_file(Path::new("/nonexistent/a.wav.mp3"), 16000);
        assert!(matches!(result, Err(ConvertError::FileNotFound(_))));
    }

    #[test]
    fn test_output_name_strips_doubled_extension() {
        // Only exercises name derivation; conversion itself needs ffmpeg
        let name = "CAN_LONDON_MALE_29.wav.mp3";
        let output = name.trim_end_matches(".mp3").trim_end_matches(".m4a");
        assert_eq!(output, "CAN_LONDON_MALE_29.wav");
    }
}
