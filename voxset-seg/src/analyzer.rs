//! Volume and speech-rate classification

use crate::config::SegmentationConfig;
use voxset_common::audio::level;
use voxset_common::keywords::{SpeedLevel, VolumeLevel};

/// Measured volume of a clip
#[derive(Debug, Clone, Copy)]
pub struct VolumeAnalysis {
    /// Clip level in dBFS
    pub dbfs: f32,
    pub level: VolumeLevel,
}

/// Measured speech rate of a clip
#[derive(Debug, Clone, Copy)]
pub struct SpeedAnalysis {
    /// Words per second
    pub wps: f32,
    pub level: SpeedLevel,
}

/// Classify clip volume against the configured thresholds
pub fn analyze_volume(samples: &[f32], config: &SegmentationConfig) -> VolumeAnalysis {
    let dbfs = level::dbfs(samples);

    let level = if dbfs >= config.volume_high_db {
        VolumeLevel::High
    } else if dbfs <= config.volume_low_db {
        VolumeLevel::Low
    } else {
        VolumeLevel::Normal
    };

    tracing::debug!(dbfs = format!("{:.2}", dbfs), level = level.name(), "Volume analyzed");

    VolumeAnalysis { dbfs, level }
}

/// Classify speech rate from a transcript and clip duration
///
/// Word count is whitespace-split. An empty transcript or non-positive
/// duration classifies as normal at 0.0 words per second.
pub fn analyze_speech_rate(
    text: &str,
    duration_seconds: f64,
    config: &SegmentationConfig,
) -> SpeedAnalysis {
    if text.trim().is_empty() || duration_seconds <= 0.0 {
        return SpeedAnalysis {
            wps: 0.0,
            level: SpeedLevel::Normal,
        };
    }

    let word_count = text.split_whitespace().count();
    let wps = word_count as f32 / duration_seconds as f32;

    let level = if wps >= config.fast_wps {
        SpeedLevel::Fast
    } else if wps <= config.slow_wps {
        SpeedLevel::Slow
    } else {
        SpeedLevel::Normal
    };

    tracing::debug!(wps = format!("{:.2}", wps), level = level.name(), "Speech rate analyzed");

    SpeedAnalysis { wps, level }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SegmentationConfig {
        SegmentationConfig::default()
    }

    #[test]
    fn test_volume_high() {
        // Full-scale square wave sits at 0 dBFS
        let samples = vec![1.0f32; 1000];
        let analysis = analyze_volume(&samples, &config());
        assert_eq!(analysis.level, VolumeLevel::High);
    }

    #[test]
    fn test_volume_low() {
        // -30 dBFS
        let amp = voxset_common::audio::db_to_linear(-30.0);
        let samples: Vec<f32> = (0..1000).map(|i| if i % 2 == 0 { amp } else { -amp }).collect();
        let analysis = analyze_volume(&samples, &config());
        assert_eq!(analysis.level, VolumeLevel::Low);
        assert!((analysis.dbfs - (-30.0)).abs() < 0.5);
    }

    #[test]
    fn test_volume_normal_between_thresholds() {
        // -20 dBFS sits between -25 (low) and -15 (high)
        let amp = voxset_common::audio::db_to_linear(-20.0);
        let samples: Vec<f32> = (0..1000).map(|i| if i % 2 == 0 { amp } else { -amp }).collect();
        let analysis = analyze_volume(&samples, &config());
        assert_eq!(analysis.level, VolumeLevel::Normal);
    }

    #[test]
    fn test_speech_rate_fast() {
        // 4 words in 1 second >= 2.5 wps
        let analysis = analyze_speech_rate("hey memo volume up", 1.0, &config());
        assert_eq!(analysis.level, SpeedLevel::Fast);
        assert!((analysis.wps - 4.0).abs() < 0.01);
    }

    #[test]
    fn test_speech_rate_slow() {
        // 2 words in 2 seconds <= 1.5 wps
        let analysis = analyze_speech_rate("hey memo", 2.0, &config());
        assert_eq!(analysis.level, SpeedLevel::Slow);
    }

    #[test]
    fn test_speech_rate_normal() {
        // 2 words in 1 second -> 2.0 wps
        let analysis = analyze_speech_rate("volume up", 1.0, &config());
        assert_eq!(analysis.level, SpeedLevel::Normal);
    }

    #[test]
    fn test_speech_rate_empty_text() {
        let analysis = analyze_speech_rate("", 1.5, &config());
        assert_eq!(analysis.level, SpeedLevel::Normal);
        assert_eq!(analysis.wps, 0.0);
    }

    #[test]
    fn test_speech_rate_zero_duration() {
        let analysis = analyze_speech_rate("volume up", 0.0, &config());
        assert_eq!(analysis.level, SpeedLevel::Normal);
        assert_eq!(analysis.wps, 0.0);
    }
}
