//! Segmentation configuration
//!
//! All thresholds live in one serde struct so a TOML file can override any
//! of them; the defaults are the tuned production values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use voxset_common::{config, Error, KeywordTable, Result};

/// Configuration for the segmentation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,

    /// Minimum silence length treated as a boundary (ms)
    pub min_silence_ms: u64,
    /// Level below which a window counts as silence (dBFS)
    pub silence_threshold_db: f32,
    /// Silence retained on both sides of each chunk (ms)
    pub keep_silence_ms: u64,
    /// Chunks shorter than this are dropped (ms)
    pub min_segment_ms: u64,
    /// Chunks longer than this are re-split into equal parts (ms)
    pub max_segment_ms: u64,

    /// Clips at or above this level classify as high volume (dBFS)
    pub volume_high_db: f32,
    /// Clips at or below this level classify as low volume (dBFS)
    pub volume_low_db: f32,

    /// Words per second at or above which speech classifies as fast
    pub fast_wps: f32,
    /// Words per second at or below which speech classifies as slow
    pub slow_wps: f32,

    /// Command keyword table
    pub keywords: KeywordTable,

    /// Speech service region
    pub speech_region: String,
    /// Recognition language
    pub speech_language: String,
    /// Speech service key (normally provided via VOXSET_SPEECH_KEY instead)
    pub speech_key: Option<String>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            min_silence_ms: 800,
            silence_threshold_db: -40.0,
            keep_silence_ms: 300,
            min_segment_ms: 500,
            max_segment_ms: 2500,
            volume_high_db: -15.0,
            volume_low_db: -25.0,
            fast_wps: 2.5,
            slow_wps: 1.5,
            keywords: KeywordTable::default(),
            speech_region: "westus2".to_string(),
            speech_language: "en-US".to_string(),
            speech_key: None,
        }
    }
}

impl SegmentationConfig {
    /// Load config from a TOML file, or defaults when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => config::load_toml::<SegmentationConfig>(p)?,
            None => SegmentationConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate threshold relationships
    pub fn validate(&self) -> Result<()> {
        if self.silence_threshold_db >= 0.0 {
            return Err(Error::Config(
                "silence_threshold_db must be negative".to_string(),
            ));
        }
        if self.min_segment_ms >= self.max_segment_ms {
            return Err(Error::Config(format!(
                "min_segment_ms ({}) must be below max_segment_ms ({})",
                self.min_segment_ms, self.max_segment_ms
            )));
        }
        if self.volume_low_db >= self.volume_high_db {
            return Err(Error::Config(format!(
                "volume_low_db ({}) must be below volume_high_db ({})",
                self.volume_low_db, self.volume_high_db
            )));
        }
        if self.slow_wps >= self.fast_wps {
            return Err(Error::Config(format!(
                "slow_wps ({}) must be below fast_wps ({})",
                self.slow_wps, self.fast_wps
            )));
        }
        if self.keywords.keywords.is_empty() {
            return Err(Error::Config("keyword table is empty".to_string()));
        }
        Ok(())
    }

    /// Resolve the speech service key (environment beats TOML)
    pub fn resolve_speech_key(&self) -> Result<String> {
        config::resolve_api_key(
            "VOXSET_SPEECH_KEY",
            self.speech_key.as_deref(),
            "Please configure using one of:\n\
             1. Environment: VOXSET_SPEECH_KEY=your-key-here\n\
             2. TOML config: speech_key = \"your-key\" in the segmentation config file",
        )
    }
}
