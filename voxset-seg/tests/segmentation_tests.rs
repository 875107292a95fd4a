//! Segmentation pipeline integration tests
//!
//! Drive the full pipeline over generated fixtures with a scripted
//! transcriber standing in for the cloud speech service.

mod helpers;

use async_trait::async_trait;
use helpers::audio_generator::{generate_test_wav, AudioConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use tempfile::TempDir;
use voxset_seg::services::{TranscribeError, Transcriber};
use voxset_seg::{SegmentationConfig, SegmentationPipeline};

/// Scripted transcriber: returns canned transcripts in order, then empties
struct ScriptedTranscriber {
    responses: Mutex<Vec<String>>,
}

impl ScriptedTranscriber {
    fn new(responses: &[&str]) -> Self {
        let mut list: Vec<String> = responses.iter().map(|s| s.to_string()).collect();
        list.reverse(); // pop() yields in original order
        Self {
            responses: Mutex::new(list),
        }
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, _samples: &[f32], _rate: u32) -> Result<String, TranscribeError> {
        Ok(self.responses.lock().unwrap().pop().unwrap_or_default())
    }
}

fn collect_wavs(dir: &std::path::Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for entry in walkdir_list(dir) {
        if entry.extension().map(|e| e == "wav").unwrap_or(false) {
            found.push(entry);
        }
    }
    found.sort();
    found
}

fn walkdir_list(dir: &std::path::Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_dir() {
                out.extend(walkdir_list(&path));
            } else {
                out.push(path);
            }
        }
    }
    out
}

#[tokio::test]
async fn pipeline_labels_two_commands() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    std::fs::create_dir_all(&input).unwrap();

    // Two voiced bursts separated by a second of silence
    generate_test_wav(
        &input.join("USA_Chicago_Male_42.wav"),
        &AudioConfig::default(),
    )
    .unwrap();

    let transcriber = ScriptedTranscriber::new(&["Hey Memo.", "Take a picture."]);
    let pipeline =
        SegmentationPipeline::new(SegmentationConfig::default(), Arc::new(transcriber)).unwrap();

    let report = pipeline.process_batch(&input, &output, 1).await.unwrap();

    assert_eq!(report.files_processed, 1);
    assert_eq!(report.files_failed, 0);
    assert_eq!(report.clips_saved, 2);
    assert_eq!(report.keyword_counts.get("HeyMemo"), Some(&1));
    assert_eq!(report.keyword_counts.get("TakeAPicture"), Some(&1));

    let clips = collect_wavs(&output);
    assert_eq!(clips.len(), 2);
    for clip in &clips {
        let name = clip.file_name().unwrap().to_string_lossy().to_string();
        // SPK folder and attribute prefix from the input name
        assert!(clip.parent().unwrap().ends_with("SPK001"));
        assert!(name.starts_with("SPK001_USA_Chicago_Male_42_"), "{name}");
        // Metrics encoded in the name
        assert!(name.contains("dB_"), "{name}");
        assert!(name.ends_with("wps.wav"), "{name}");
    }
}

#[tokio::test]
async fn pipeline_labels_unmatched_as_unknown() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    std::fs::create_dir_all(&input).unwrap();

    let config = AudioConfig {
        bursts: vec![(1000, 1000)],
        ..Default::default()
    };
    generate_test_wav(&input.join("CAN_Montreal_Female_30.wav"), &config).unwrap();

    let transcriber = ScriptedTranscriber::new(&["something entirely different"]);
    let pipeline =
        SegmentationPipeline::new(SegmentationConfig::default(), Arc::new(transcriber)).unwrap();

    let report = pipeline.process_batch(&input, &output, 7).await.unwrap();

    assert_eq!(report.clips_saved, 1);
    assert_eq!(report.keyword_counts.get("Unknown"), Some(&1));

    let clips = collect_wavs(&output);
    let name = clips[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("SPK007_CAN_Montreal_Female_30_Unknown_"), "{name}");
}

#[tokio::test]
async fn pipeline_falls_back_to_unk_attrs() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    std::fs::create_dir_all(&input).unwrap();

    let config = AudioConfig {
        bursts: vec![(1000, 1000)],
        ..Default::default()
    };
    generate_test_wav(&input.join("recording01.wav"), &config).unwrap();

    let transcriber = ScriptedTranscriber::new(&["Volume up"]);
    let pipeline =
        SegmentationPipeline::new(SegmentationConfig::default(), Arc::new(transcriber)).unwrap();

    let report = pipeline.process_batch(&input, &output, 1).await.unwrap();
    assert_eq!(report.clips_saved, 1);

    let clips = collect_wavs(&output);
    let name = clips[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("SPK001_UNK_UNK_UNK_00_VolumeUp_"), "{name}");
}

#[tokio::test]
async fn pipeline_skips_fully_silent_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    std::fs::create_dir_all(&input).unwrap();

    let config = AudioConfig {
        amplitude: 0.0,
        bursts: vec![(2000, 0)],
        ..Default::default()
    };
    generate_test_wav(&input.join("USA_Dallas_Male_31.wav"), &config).unwrap();

    let transcriber = ScriptedTranscriber::new(&[]);
    let pipeline =
        SegmentationPipeline::new(SegmentationConfig::default(), Arc::new(transcriber)).unwrap();

    let report = pipeline.process_batch(&input, &output, 1).await.unwrap();

    // File processes fine, just yields no clips
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.clips_saved, 0);
    assert!(collect_wavs(&output).is_empty());
}

#[tokio::test]
async fn pipeline_numbers_speakers_per_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    std::fs::create_dir_all(&input).unwrap();

    let config = AudioConfig {
        bursts: vec![(1000, 1000)],
        ..Default::default()
    };
    generate_test_wav(&input.join("AUS_Sydney_Female_25.wav"), &config).unwrap();
    generate_test_wav(&input.join("UK_London_Male_35.wav"), &config).unwrap();

    let transcriber = ScriptedTranscriber::new(&["Play", "Pause"]);
    let pipeline =
        SegmentationPipeline::new(SegmentationConfig::default(), Arc::new(transcriber)).unwrap();

    let report = pipeline.process_batch(&input, &output, 10).await.unwrap();

    assert_eq!(report.files_processed, 2);
    assert!(output.join("SPK010").is_dir());
    assert!(output.join("SPK011").is_dir());
}
