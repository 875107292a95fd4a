//! Silence-based chunk extraction
//!
//! Splits a recording into voiced chunks separated by silence. Level
//! detection runs on short RMS windows; a run of windows below the threshold
//! lasting at least the minimum silence length counts as a boundary. Each
//! extracted chunk keeps a margin of the surrounding silence so clips do not
//! start or stop abruptly.

use crate::audio::{level, ms_to_samples};
use thiserror::Error;

/// Silence splitting errors
#[derive(Debug, Error)]
pub enum SplitError {
    /// Invalid silence threshold value
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Invalid detection parameters
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Silence region in sample positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceRegion {
    pub start_sample: usize,
    pub end_sample: usize,
}

impl SilenceRegion {
    pub fn len(&self) -> usize {
        self.end_sample - self.start_sample
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Voiced span in sample positions (silence-region complement)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoicedSpan {
    pub start_sample: usize,
    pub end_sample: usize,
}

impl VoicedSpan {
    pub fn len(&self) -> usize {
        self.end_sample - self.start_sample
    }
}

/// Silence-based splitter
pub struct SilenceSplitter {
    /// Silence threshold in dBFS
    threshold_db: f32,
    /// Minimum silence duration treated as a boundary (ms)
    min_silence_ms: u64,
    /// Silence retained around each chunk (ms)
    keep_silence_ms: u64,
    /// RMS window length (ms)
    window_ms: u64,
}

impl SilenceSplitter {
    pub fn new() -> Self {
        Self {
            threshold_db: -40.0,
            min_silence_ms: 800,
            keep_silence_ms: 300,
            window_ms: 10,
        }
    }

    /// Set silence threshold in dBFS
    pub fn with_threshold_db(mut self, threshold_db: f32) -> Result<Self, SplitError> {
        if threshold_db >= 0.0 {
            return Err(SplitError::InvalidThreshold(
                "Threshold must be negative dBFS".to_string(),
            ));
        }
        self.threshold_db = threshold_db;
        Ok(self)
    }

    /// Set minimum silence duration in milliseconds
    pub fn with_min_silence_ms(mut self, min_silence_ms: u64) -> Result<Self, SplitError> {
        if min_silence_ms == 0 {
            return Err(SplitError::InvalidParameters(
                "Min silence must be > 0".to_string(),
            ));
        }
        self.min_silence_ms = min_silence_ms;
        Ok(self)
    }

    /// Set retained silence margin in milliseconds
    pub fn with_keep_silence_ms(mut self, keep_silence_ms: u64) -> Self {
        self.keep_silence_ms = keep_silence_ms;
        self
    }

    /// Detect silence regions in audio
    ///
    /// Returns sample-position regions of silence at least
    /// `min_silence_ms` long.
    pub fn detect_silence(&self, samples: &[f32], sample_rate: u32) -> Vec<SilenceRegion> {
        if samples.is_empty() {
            return Vec::new();
        }

        let threshold_linear = level::db_to_linear(self.threshold_db);
        let window_size = ms_to_samples(self.window_ms, sample_rate).max(1);
        let min_silence_samples = ms_to_samples(self.min_silence_ms, sample_rate);

        let mut regions = Vec::new();
        let mut in_silence = false;
        let mut silence_start = 0usize;

        for (window_idx, chunk) in samples.chunks(window_size).enumerate() {
            let rms = level::rms(chunk);
            let sample_position = window_idx * window_size;

            if rms < threshold_linear {
                if !in_silence {
                    in_silence = true;
                    silence_start = sample_position;
                }
            } else if in_silence {
                let silence_end = sample_position;
                if silence_end - silence_start >= min_silence_samples {
                    regions.push(SilenceRegion {
                        start_sample: silence_start,
                        end_sample: silence_end,
                    });
                }
                in_silence = false;
            }
        }

        // Silence running to end of file
        if in_silence && samples.len() - silence_start >= min_silence_samples {
            regions.push(SilenceRegion {
                start_sample: silence_start,
                end_sample: samples.len(),
            });
        }

        regions
    }

    /// Voiced spans between silence regions
    pub fn voiced_spans(&self, samples: &[f32], sample_rate: u32) -> Vec<VoicedSpan> {
        let silences = self.detect_silence(samples, sample_rate);

        let mut spans = Vec::new();
        let mut cursor = 0usize;

        for silence in &silences {
            if silence.start_sample > cursor {
                spans.push(VoicedSpan {
                    start_sample: cursor,
                    end_sample: silence.start_sample,
                });
            }
            cursor = silence.end_sample;
        }

        if cursor < samples.len() {
            spans.push(VoicedSpan {
                start_sample: cursor,
                end_sample: samples.len(),
            });
        }

        spans
    }

    /// Split audio into voiced chunks with a keep-silence margin
    ///
    /// A fully silent input yields no chunks; an input with no qualifying
    /// silence yields one chunk covering the whole file.
    pub fn split(&self, samples: &[f32], sample_rate: u32) -> Vec<Vec<f32>> {
        let silences = self.detect_silence(samples, sample_rate);
        let spans = self.voiced_spans(samples, sample_rate);
        let keep = ms_to_samples(self.keep_silence_ms, sample_rate);

        let mut chunks = Vec::with_capacity(spans.len());

        for span in &spans {
            // Extend into the neighboring silence, but never past it into
            // the previous or next voiced span
            let prev_silence_start = silences
                .iter()
                .rev()
                .find(|s| s.end_sample <= span.start_sample)
                .map(|s| s.start_sample)
                .unwrap_or(0);
            let next_silence_end = silences
                .iter()
                .find(|s| s.start_sample >= span.end_sample)
                .map(|s| s.end_sample)
                .unwrap_or(samples.len());

            let start = span.start_sample.saturating_sub(keep).max(prev_silence_start);
            let end = (span.end_sample + keep).min(next_silence_end);

            chunks.push(samples[start..end].to_vec());
        }

        tracing::debug!(chunks = chunks.len(), "Silence split complete");

        chunks
    }
}

impl Default for SilenceSplitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 16000;

    /// Build audio from (level, ms) segments
    fn audio(segments: &[(f32, u64)]) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(amplitude, ms) in segments {
            let count = ms_to_samples(ms, RATE);
            // Square-ish tone so windowed RMS equals the amplitude
            samples.extend((0..count).map(|i| if i % 2 == 0 { amplitude } else { -amplitude }));
        }
        samples
    }

    #[test]
    fn test_builder_validation() {
        assert!(SilenceSplitter::new().with_threshold_db(5.0).is_err());
        assert!(SilenceSplitter::new().with_min_silence_ms(0).is_err());
        assert!(SilenceSplitter::new().with_threshold_db(-35.0).is_ok());
    }

    #[test]
    fn test_detect_silence_middle() {
        let samples = audio(&[(0.5, 1000), (0.0001, 1000), (0.5, 1000)]);
        let splitter = SilenceSplitter::new();
        let regions = splitter.detect_silence(&samples, RATE);

        assert_eq!(regions.len(), 1);
        let region = &regions[0];
        // Region should sit around the 1.0s - 2.0s band
        assert!((region.start_sample as f64 / RATE as f64 - 1.0).abs() < 0.05);
        assert!((region.end_sample as f64 / RATE as f64 - 2.0).abs() < 0.05);
    }

    #[test]
    fn test_short_silence_not_a_boundary() {
        // 400 ms gap is below the default 800 ms minimum
        let samples = audio(&[(0.5, 1000), (0.0001, 400), (0.5, 1000)]);
        let splitter = SilenceSplitter::new();

        assert!(splitter.detect_silence(&samples, RATE).is_empty());
        assert_eq!(splitter.split(&samples, RATE).len(), 1);
    }

    #[test]
    fn test_split_two_chunks() {
        let samples = audio(&[(0.5, 1000), (0.0001, 1000), (0.5, 1200)]);
        let splitter = SilenceSplitter::new();
        let chunks = splitter.split(&samples, RATE);

        assert_eq!(chunks.len(), 2);
        // First chunk: ~1.0s voiced + 300ms trailing keep-silence
        let first_secs = chunks[0].len() as f64 / RATE as f64;
        assert!((first_secs - 1.3).abs() < 0.1, "got {first_secs}");
        // Second chunk: 300ms leading keep-silence + ~1.2s voiced
        let second_secs = chunks[1].len() as f64 / RATE as f64;
        assert!((second_secs - 1.5).abs() < 0.1, "got {second_secs}");
    }

    #[test]
    fn test_fully_silent_input_yields_nothing() {
        let samples = audio(&[(0.0001, 2000)]);
        let splitter = SilenceSplitter::new();
        assert!(splitter.split(&samples, RATE).is_empty());
    }

    #[test]
    fn test_empty_input() {
        let splitter = SilenceSplitter::new();
        assert!(splitter.split(&[], RATE).is_empty());
        assert!(splitter.detect_silence(&[], RATE).is_empty());
    }

    #[test]
    fn test_leading_and_trailing_silence_trimmed() {
        let samples = audio(&[(0.0001, 1000), (0.5, 900), (0.0001, 1000)]);
        let splitter = SilenceSplitter::new();
        let chunks = splitter.split(&samples, RATE);

        assert_eq!(chunks.len(), 1);
        // 900ms voiced + up to 300ms keep on both sides
        let secs = chunks[0].len() as f64 / RATE as f64;
        assert!(secs <= 1.6 && secs >= 0.9, "got {secs}");
    }

    #[test]
    fn test_voiced_spans_cover_speech() {
        let samples = audio(&[(0.5, 1000), (0.0001, 1000), (0.5, 500)]);
        let splitter = SilenceSplitter::new();
        let spans = splitter.voiced_spans(&samples, RATE);

        assert_eq!(spans.len(), 2);
        let total_ms: usize = spans.iter().map(|s| s.len() * 1000 / RATE as usize).sum();
        // ~1500 ms of speech, window-boundary slack allowed
        assert!((total_ms as i64 - 1500).abs() < 100, "got {total_ms}");
    }
}
