//! Fixed-length clip splitting
//!
//! Cuts each WAV into consecutive clips of a fixed duration, mirroring the
//! source tree layout. A trailing remainder shorter than one clip is
//! dropped.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info};
use voxset_common::audio::{self, wav};
use voxset_common::fsutil;
use walkdir::WalkDir;

/// Split every WAV under `input_dir` into fixed-length clips
///
/// Returns the number of source files processed.
pub fn split_tree(
    input_dir: &Path,
    output_dir: &Path,
    clip_seconds: f64,
    sample_rate: u32,
) -> Result<usize> {
    if clip_seconds <= 0.0 {
        anyhow::bail!("clip duration must be positive, got {clip_seconds}");
    }

    fsutil::ensure_dir(output_dir)?;

    let mut processed = 0usize;

    for entry in WalkDir::new(input_dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("wav"))
            .unwrap_or(false)
        {
            continue;
        }

        let dest_dir = fsutil::relative_mirror(input_dir, path, output_dir)?
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| output_dir.to_path_buf());
        fsutil::ensure_dir(&dest_dir)?;

        info!(file = %path.display(), "Splitting into fixed-length clips");
        match split_file(path, &dest_dir, clip_seconds, sample_rate) {
            Ok(clips) => {
                processed += 1;
                info!(file = %path.display(), clips = clips, "Split complete");
            }
            Err(e) => {
                error!(file = %path.display(), "Split failed: {:#}", e);
            }
        }
    }

    info!("Fixed-length split finished: {} files processed", processed);
    Ok(processed)
}

/// Split one file; returns the number of clips written
fn split_file(
    input_file: &Path,
    dest_dir: &Path,
    clip_seconds: f64,
    sample_rate: u32,
) -> Result<usize> {
    let decoded = audio::decode_audio_file(input_file)
        .with_context(|| format!("Decoding {}", input_file.display()))?;
    let samples = audio::resample_mono(&decoded.samples, decoded.sample_rate, sample_rate)?;

    let samples_per_clip = (sample_rate as f64 * clip_seconds) as usize;
    let num_clips = samples.len() / samples_per_clip;

    let stem = input_file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    for i in 0..num_clips {
        let start = i * samples_per_clip;
        let clip = &samples[start..start + samples_per_clip];
        let out_path = dest_dir.join(format!("{}_clip_{:03}.wav", stem, i + 1));
        wav::write_wav_mono16(&out_path, clip, sample_rate)?;
    }

    Ok(num_clips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_file_drops_remainder() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        std::fs::create_dir_all(&input).unwrap();

        // 4.0 s at 16 kHz -> two 1.6 s clips, 0.8 s remainder dropped
        let samples = vec![0.1f32; 16000 * 4];
        wav::write_wav_mono16(&input.join("long.wav"), &samples, 16000).unwrap();

        let processed = split_tree(&input, &output, 1.6, 16000).unwrap();
        assert_eq!(processed, 1);

        assert!(output.join("long_clip_001.wav").exists());
        assert!(output.join("long_clip_002.wav").exists());
        assert!(!output.join("long_clip_003.wav").exists());

        let (clip, rate) = wav::read_wav_mono(&output.join("long_clip_001.wav")).unwrap();
        assert_eq!(rate, 16000);
        assert_eq!(clip.len(), (16000.0 * 1.6) as usize);
    }

    #[test]
    fn test_split_tree_mirrors_layout() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        std::fs::create_dir_all(input.join("S13")).unwrap();

        let samples = vec![0.1f32; 16000 * 2];
        wav::write_wav_mono16(&input.join("S13/rec.wav"), &samples, 16000).unwrap();

        split_tree(&input, &output, 1.6, 16000).unwrap();
        assert!(output.join("S13/rec_clip_001.wav").exists());
    }

    #[test]
    fn test_split_rejects_bad_duration() {
        let temp_dir = TempDir::new().unwrap();
        assert!(split_tree(temp_dir.path(), temp_dir.path(), 0.0, 16000).is_err());
    }
}
