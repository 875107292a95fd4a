//! Half-word negative samples
//!
//! A keyword spotter must reject half-spoken commands. For each clip this
//! pass extracts the voiced part, cuts it at the midpoint and left-pads each
//! half with silence to the standard duration, producing two negative
//! samples per source clip.

use anyhow::Result;
use std::path::Path;
use tracing::{error, info, warn};
use voxset_common::audio::{self, dbfs, wav, SilenceSplitter};
use voxset_common::fsutil;
use walkdir::WalkDir;

/// Speech extraction tuned for single short clips: brief gaps only, a small
/// kept margin, threshold relative to the clip's own level
const MIN_SILENCE_MS: u64 = 100;
const KEEP_SILENCE_MS: u64 = 100;
const THRESHOLD_OFFSET_DB: f32 = 16.0;

/// Process every WAV under `source_dir`, mirroring the layout
///
/// Returns the number of source clips processed.
pub fn process_tree(
    source_dir: &Path,
    dest_dir: &Path,
    target_duration_secs: f64,
    sample_rate: u32,
) -> Result<usize> {
    fsutil::ensure_dir(dest_dir)?;

    let mut processed = 0usize;

    for entry in WalkDir::new(source_dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase().ends_with(".wav"))
            .unwrap_or(false)
        {
            continue;
        }

        let dest_subdir = fsutil::relative_mirror(source_dir, path, dest_dir)?
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| dest_dir.to_path_buf());
        fsutil::ensure_dir(&dest_subdir)?;

        match process_file(path, &dest_subdir, target_duration_secs, sample_rate) {
            Ok(true) => processed += 1,
            Ok(false) => {}
            Err(e) => {
                error!(file = %path.display(), "Half-sample processing failed: {:#}", e);
            }
        }
    }

    info!("Half-sample pass complete: {} clips processed", processed);
    Ok(processed)
}

/// Build both halves for one clip; false when no speech was found
fn process_file(
    file: &Path,
    dest_dir: &Path,
    target_duration_secs: f64,
    sample_rate: u32,
) -> Result<bool> {
    let (samples, rate) = wav::read_wav_mono(file)?;
    let samples = audio::resample_mono(&samples, rate, sample_rate)?;

    let speech = extract_speech(&samples, sample_rate)?;
    if speech.is_empty() {
        warn!(file = %file.display(), "No voiced audio found, skipped");
        return Ok(false);
    }

    let midpoint = speech.len() / 2;
    let halves = [&speech[..midpoint], &speech[midpoint..]];

    let target_samples = (target_duration_secs * sample_rate as f64) as usize;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    for (i, half) in halves.iter().enumerate() {
        let mut half: Vec<f32> = half.to_vec();

        if half.len() > target_samples {
            warn!(file = %file.display(), "Half longer than target duration, truncating");
            half.truncate(target_samples);
        }

        // Left-pad with silence so the speech fragment ends the clip
        let mut clip = vec![0.0f32; target_samples - half.len()];
        clip.extend_from_slice(&half);

        let out_path = fsutil::unique_path(&dest_dir.join(format!("half{}_{}", i + 1, file_name)));
        wav::write_wav_mono16(&out_path, &clip, sample_rate)?;
    }

    Ok(true)
}

/// Concatenate the voiced chunks of a clip
///
/// The silence threshold tracks the clip's own level so quiet recordings
/// still split sensibly.
fn extract_speech(samples: &[f32], sample_rate: u32) -> Result<Vec<f32>> {
    let clip_level = dbfs(samples);
    if !clip_level.is_finite() {
        return Ok(Vec::new());
    }

    // Keep the threshold strictly negative even for very quiet clips
    let threshold = (clip_level - THRESHOLD_OFFSET_DB).min(-1.0);

    let splitter = SilenceSplitter::new()
        .with_threshold_db(threshold)
        .map_err(|e| anyhow::anyhow!("{}", e))?
        .with_min_silence_ms(MIN_SILENCE_MS)
        .map_err(|e| anyhow::anyhow!("{}", e))?
        .with_keep_silence_ms(KEEP_SILENCE_MS);

    let chunks = splitter.split(samples, sample_rate);

    let mut speech = Vec::new();
    for chunk in chunks {
        speech.extend(chunk);
    }
    Ok(speech)
}
