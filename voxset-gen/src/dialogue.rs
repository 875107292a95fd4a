//! Two-voice conversation rendering
//!
//! Synthesizes each scripted line with its speaker's voice, writes a silent
//! pause clip, then hands ffmpeg a concat list to mux the full conversation.
//! ffmpeg is an external collaborator; its absence is a hard error.

use crate::profiles::{DIALOGUE_PROFILES, DIALOGUE_SCRIPT};
use crate::services::{NeuralTtsClient, SynthesisRequest};
use anyhow::{Context, Result};
use rand::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use voxset_common::audio::wav;
use voxset_common::fsutil;

/// Sample rate of the service's speech output
const SEGMENT_SAMPLE_RATE: u32 = 24000;
const RETRY_DELAY_SECS: u64 = 2;

/// Render the built-in conversation into `out_dir/conversation.wav`
pub async fn render_conversation(
    client: std::sync::Arc<NeuralTtsClient>,
    out_dir: &Path,
    pause_ms: u64,
) -> Result<PathBuf> {
    let segments_dir = out_dir.join("segments");
    fsutil::ensure_dir(&segments_dir)?;

    // Synthesize all lines concurrently
    let mut tasks = JoinSet::new();
    for (i, &(speaker_idx, line)) in DIALOGUE_SCRIPT.iter().enumerate() {
        let client = std::sync::Arc::clone(&client);
        let segments_dir = segments_dir.clone();

        tasks.spawn(async move {
            let path = synthesize_line(&client, i, speaker_idx, line, &segments_dir).await;
            (i, path)
        });
    }

    let mut segments: Vec<(usize, PathBuf)> = Vec::new();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok((i, Ok(path))) => segments.push((i, path)),
            Ok((i, Err(e))) => error!(line = i, "Line synthesis failed: {:#}", e),
            Err(e) => error!("Dialogue task panicked: {}", e),
        }
    }

    if segments.is_empty() {
        anyhow::bail!("No dialogue segments were generated");
    }
    segments.sort_by_key(|(i, _)| *i);

    // Silent pause inserted between lines
    let pause_path = segments_dir.join("pause.wav");
    write_silence(&pause_path, pause_ms)?;

    // ffmpeg concat list: segments interleaved with pauses
    let list_path = out_dir.join("file_list.txt");
    let mut list = String::new();
    for (idx, (_, segment)) in segments.iter().enumerate() {
        list.push_str(&format!("file '{}'\n", absolute(segment)?.display()));
        if idx + 1 < segments.len() {
            list.push_str(&format!("file '{}'\n", absolute(&pause_path)?.display()));
        }
    }
    std::fs::write(&list_path, list)?;

    let output_path = out_dir.join("conversation.wav");
    concat_with_ffmpeg(&list_path, &output_path)?;

    info!("Conversation saved: {}", output_path.display());
    Ok(output_path)
}

/// Synthesize one line with per-line seeded variation
async fn synthesize_line(
    client: &NeuralTtsClient,
    line_idx: usize,
    speaker_idx: usize,
    line: &str,
    segments_dir: &Path,
) -> Result<PathBuf> {
    let profile = &DIALOGUE_PROFILES[speaker_idx];

    let mut rng = StdRng::seed_from_u64(line_idx as u64 + profile.age as u64);
    let mut request =
        SynthesisRequest::new(line, profile.voice).with_volume_percent(rng.gen_range(0..=5));

    // Occasional rate nudge for more natural turn-taking
    if rng.gen::<f64>() < 0.3 {
        let adjust = rng.gen_range(-5..=5);
        if adjust != 0 {
            request = request.with_rate_percent(adjust);
        }
    }

    let path = segments_dir.join(format!("segment_{:02}_{}.wav", line_idx, profile.gender));

    let audio = match client.synthesize(&request).await {
        Ok(audio) => audio,
        Err(e) => {
            warn!(line = line_idx, "Synthesis failed, retrying in {}s: {}", RETRY_DELAY_SECS, e);
            tokio::time::sleep(std::time::Duration::from_secs(RETRY_DELAY_SECS)).await;
            client.synthesize(&request).await?
        }
    };

    tokio::fs::write(&path, &audio).await?;
    Ok(path)
}

/// Write a silent mono WAV of the given duration
fn write_silence(path: &Path, duration_ms: u64) -> Result<()> {
    let sample_count = (duration_ms * SEGMENT_SAMPLE_RATE as u64 / 1000) as usize;
    wav::write_wav_mono16(path, &vec![0.0; sample_count], SEGMENT_SAMPLE_RATE)?;
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(path
        .canonicalize()
        .with_context(|| format!("Resolving {}", path.display()))?)
}

/// Concatenate via ffmpeg's concat demuxer (stream copy, no re-encode)
fn concat_with_ffmpeg(list_path: &Path, output_path: &Path) -> Result<()> {
    let result = Command::new("ffmpeg")
        .arg("-y")
        .args(["-f", "concat", "-safe", "0"])
        .arg("-i")
        .arg(list_path)
        .args(["-c", "copy"])
        .arg(output_path)
        .output()
        .context("Running ffmpeg (is it installed?)")?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        anyhow::bail!("ffmpeg concat failed: {}", stderr);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_silence_duration() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pause.wav");
        write_silence(&path, 700).unwrap();

        let (samples, rate) = wav::read_wav_mono(&path).unwrap();
        assert_eq!(rate, SEGMENT_SAMPLE_RATE);
        assert_eq!(samples.len(), (700 * SEGMENT_SAMPLE_RATE as u64 / 1000) as usize);
        assert!(samples.iter().all(|&s| s == 0.0));
    }
}
