//! Segmentation pipeline
//!
//! Per input recording: decode to mono, resample, split on silence, then for
//! each chunk transcribe, classify volume and speech rate, match the command
//! keyword and write a clip whose name encodes everything:
//!
//! `SPK001_CAN_London_Male_29_HeyMemo_-15.2dB_2.4wps.wav`
//!
//! Failures are per-item: a file or chunk that errors is logged and skipped,
//! the batch keeps going.

use crate::analyzer::{self, SpeedAnalysis, VolumeAnalysis};
use crate::config::SegmentationConfig;
use crate::scanner::FileScanner;
use crate::services::Transcriber;
use crate::splitter::{enforce_duration_policy, SilenceSplitter};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use voxset_common::audio::{self, samples_to_seconds, wav};
use voxset_common::{fsutil, SpeakerAttrs};

/// Label used when no keyword matches a transcript
const UNKNOWN_LABEL: &str = "Unknown";

/// Analysis of a single clip
#[derive(Debug, Clone)]
pub struct ClipAnalysis {
    pub transcript: String,
    pub keyword: String,
    pub volume: VolumeAnalysis,
    pub speed: SpeedAnalysis,
}

/// A clip written to disk
#[derive(Debug, Clone)]
pub struct SavedClip {
    pub path: PathBuf,
    pub analysis: ClipAnalysis,
}

/// Batch summary statistics
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files_processed: usize,
    pub files_failed: usize,
    pub clips_saved: usize,
    pub keyword_counts: HashMap<String, usize>,
    pub volume_counts: HashMap<String, usize>,
    pub speed_counts: HashMap<String, usize>,
    /// Names that needed a `_N` suffix to stay unique
    pub collision_count: usize,
}

impl BatchReport {
    fn record(&mut self, clip: &SavedClip, collided: bool) {
        self.clips_saved += 1;
        *self
            .keyword_counts
            .entry(clip.analysis.keyword.clone())
            .or_insert(0) += 1;
        *self
            .volume_counts
            .entry(clip.analysis.volume.level.name().to_string())
            .or_insert(0) += 1;
        *self
            .speed_counts
            .entry(clip.analysis.speed.level.name().to_string())
            .or_insert(0) += 1;
        if collided {
            self.collision_count += 1;
        }
    }

    /// Log the batch summary
    pub fn log_summary(&self) {
        info!("Batch summary:");
        info!("  files processed: {}", self.files_processed);
        info!("  files failed:    {}", self.files_failed);
        info!("  clips saved:     {}", self.clips_saved);
        if self.files_processed > 0 {
            info!(
                "  clips per file:  {:.2}",
                self.clips_saved as f64 / self.files_processed as f64
            );
        }

        let mut keywords: Vec<_> = self.keyword_counts.iter().collect();
        keywords.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        info!("Keyword distribution:");
        for (keyword, count) in keywords {
            info!("  {}: {} clips", keyword, count);
        }

        info!("Volume distribution:");
        for level in ["high", "normal", "low"] {
            info!("  {}: {} clips", level, self.volume_counts.get(level).copied().unwrap_or(0));
        }

        info!("Speed distribution:");
        for level in ["fast", "normal", "slow"] {
            info!("  {}: {} clips", level, self.speed_counts.get(level).copied().unwrap_or(0));
        }

        if self.collision_count > 0 {
            warn!(
                "{} clip names collided and were suffixed for uniqueness",
                self.collision_count
            );
        }
    }
}

/// Silence-split, transcribe, classify and save
pub struct SegmentationPipeline {
    config: SegmentationConfig,
    transcriber: Arc<dyn Transcriber>,
    splitter: SilenceSplitter,
}

impl SegmentationPipeline {
    pub fn new(config: SegmentationConfig, transcriber: Arc<dyn Transcriber>) -> Result<Self> {
        let splitter = SilenceSplitter::new()
            .with_threshold_db(config.silence_threshold_db)
            .map_err(|e| anyhow::anyhow!("{}", e))?
            .with_min_silence_ms(config.min_silence_ms)
            .map_err(|e| anyhow::anyhow!("{}", e))?
            .with_keep_silence_ms(config.keep_silence_ms);

        Ok(Self {
            config,
            transcriber,
            splitter,
        })
    }

    /// Process every audio file under `input_dir`
    ///
    /// Speaker folders are numbered `SPK{id:03}` starting at `spk_start`,
    /// one per input file in scan order.
    pub async fn process_batch(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        spk_start: usize,
    ) -> Result<BatchReport> {
        let scanner = FileScanner::new();
        let scan = scanner
            .scan_with_stats(input_dir)
            .with_context(|| format!("Scanning {}", input_dir.display()))?;
        let files = scan.files;

        info!("Found {} audio files under {}", files.len(), input_dir.display());
        for (format, count) in &scan.by_format {
            info!("  .{}: {}", format, count);
        }

        let mut report = BatchReport::default();

        for (i, file) in files.iter().enumerate() {
            let spk_id = spk_start + i;
            match self.process_file(file, output_dir, spk_id, &mut report).await {
                Ok(saved) => {
                    report.files_processed += 1;
                    info!(
                        file = %file.display(),
                        clips = saved,
                        "File processed"
                    );
                }
                Err(e) => {
                    report.files_failed += 1;
                    error!(file = %file.display(), "Processing failed: {:#}", e);
                }
            }
        }

        report.log_summary();
        Ok(report)
    }

    /// Process one recording; returns the number of clips saved
    async fn process_file(
        &self,
        file: &Path,
        output_dir: &Path,
        spk_id: usize,
        report: &mut BatchReport,
    ) -> Result<usize> {
        info!(file = %file.display(), spk_id = spk_id, "Processing recording");

        let chunks = self.load_and_split(file)?;
        info!(chunks = chunks.len(), "Valid chunks after duration policy");

        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let attrs = SpeakerAttrs::parse(SpeakerAttrs::stem_of(&file_name));

        let speaker_dir = output_dir.join(format!("SPK{:03}", spk_id));
        fsutil::ensure_dir(&speaker_dir)?;

        let mut saved = 0usize;
        for (chunk_idx, chunk) in chunks.iter().enumerate() {
            match self.analyze_chunk(chunk).await {
                Ok(analysis) => {
                    let (clip, collided) =
                        self.save_chunk(chunk, &analysis, &speaker_dir, spk_id, &attrs)?;
                    report.record(&clip, collided);
                    saved += 1;
                }
                Err(e) => {
                    warn!(
                        chunk = chunk_idx + 1,
                        "Chunk analysis failed, skipped: {:#}", e
                    );
                }
            }
        }

        Ok(saved)
    }

    /// Decode, resample and silence-split one file
    fn load_and_split(&self, file: &Path) -> Result<Vec<Vec<f32>>> {
        let decoded = audio::decode_audio_file(file)?;
        let samples = audio::resample_mono(
            &decoded.samples,
            decoded.sample_rate,
            self.config.sample_rate,
        )?;

        let raw_chunks = self.splitter.split(&samples, self.config.sample_rate);
        info!(chunks = raw_chunks.len(), "Initial silence split");

        Ok(enforce_duration_policy(
            raw_chunks,
            self.config.sample_rate,
            self.config.min_segment_ms,
            self.config.max_segment_ms,
        ))
    }

    /// Transcribe and classify one chunk
    async fn analyze_chunk(&self, chunk: &[f32]) -> Result<ClipAnalysis> {
        let volume = analyzer::analyze_volume(chunk, &self.config);

        let transcript = self
            .transcriber
            .transcribe(chunk, self.config.sample_rate)
            .await
            .context("Transcription failed")?;

        let duration = samples_to_seconds(chunk.len(), self.config.sample_rate);
        let speed = analyzer::analyze_speech_rate(&transcript, duration, &self.config);

        let keyword = self
            .config
            .keywords
            .match_transcript(&transcript)
            .unwrap_or(UNKNOWN_LABEL)
            .to_string();

        Ok(ClipAnalysis {
            transcript,
            keyword,
            volume,
            speed,
        })
    }

    /// Write one clip with the metric-encoding name scheme
    ///
    /// Returns the saved clip and whether the name needed a uniqueness
    /// suffix.
    fn save_chunk(
        &self,
        chunk: &[f32],
        analysis: &ClipAnalysis,
        speaker_dir: &Path,
        spk_id: usize,
        attrs: &SpeakerAttrs,
    ) -> Result<(SavedClip, bool)> {
        // Digital silence would format as "-inf"; clamp for sane names
        let db = if analysis.volume.dbfs.is_finite() {
            analysis.volume.dbfs
        } else {
            -99.9
        };

        let file_name = format!(
            "SPK{:03}_{}_{}_{:.1}dB_{:.1}wps.wav",
            spk_id,
            attrs.prefix(),
            analysis.keyword,
            db,
            analysis.speed.wps,
        );

        let target = speaker_dir.join(file_name);
        let path = fsutil::unique_path(&target);
        let collided = path != target;
        wav::write_wav_mono16(&path, chunk, self.config.sample_rate)?;

        info!(path = %path.display(), "Clip saved");

        Ok((
            SavedClip {
                path,
                analysis: analysis.clone(),
            },
            collided,
        ))
    }
}
