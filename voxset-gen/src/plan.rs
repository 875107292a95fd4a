//! Synthesis plan preparation
//!
//! Extends a speaker CSV with the model parameters the prediction-serving
//! TTS expects: a concrete voice per gender plus sampling parameters drawn
//! from tuned ranges.

use crate::speakers::SpeakerRow;
use anyhow::{Context, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

const FEMALE_VOICES: &[&str] = &["tara", "emma"];
const MALE_VOICES: &[&str] = &["dan", "josh"];

/// One plan row: a speaker with concrete synthesis parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRow {
    pub identifier: String,
    pub country: String,
    pub city: String,
    pub accent: String,
    pub gender: String,
    pub age: u32,
    pub speech_rate: String,
    pub voice: String,
    pub top_p: f64,
    pub temperature: f64,
    pub repetition_penalty: f64,
}

/// Round to 2 decimals, matching the plan sheet format
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Assign voices and sampling parameters to every speaker
pub fn build_plan(speakers: &[SpeakerRow], seed: u64) -> Vec<PlanRow> {
    let mut rng = StdRng::seed_from_u64(seed);

    speakers
        .iter()
        .map(|speaker| {
            let voices = if speaker.gender.eq_ignore_ascii_case("female") {
                FEMALE_VOICES
            } else {
                MALE_VOICES
            };
            let voice = voices.choose(&mut rng).copied().unwrap_or(voices[0]);

            PlanRow {
                identifier: speaker.identifier.clone(),
                country: speaker.country.clone(),
                city: speaker.city.clone(),
                accent: speaker.accent.clone(),
                gender: speaker.gender.clone(),
                age: speaker.age,
                speech_rate: speaker.speech_rate.clone(),
                voice: voice.to_string(),
                top_p: round2(rng.gen_range(0.9..=1.0)),
                temperature: round2(rng.gen_range(0.5..=0.7)),
                repetition_penalty: round2(rng.gen_range(1.1..=1.5)),
            }
        })
        .collect()
}

/// Write plan rows to CSV
pub fn write_csv(rows: &[PlanRow], out_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(out_path)
        .with_context(|| format!("Creating {}", out_path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} plan rows to {}", rows.len(), out_path.display());
    Ok(())
}

/// Read plan rows from CSV
pub fn read_csv(path: &Path) -> Result<Vec<PlanRow>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("Reading {}", path.display()))?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<PlanRow>, _>>()
        .with_context(|| format!("Parsing {}", path.display()))?;
    if rows.is_empty() {
        anyhow::bail!("Plan {} contains no rows", path.display());
    }
    Ok(rows)
}

/// Log parameter ranges and the voice split for a quick sanity check
pub fn log_plan_summary(rows: &[PlanRow]) {
    let min_max = |f: fn(&PlanRow) -> f64| {
        let min = rows.iter().map(f).fold(f64::INFINITY, f64::min);
        let max = rows.iter().map(f).fold(f64::NEG_INFINITY, f64::max);
        (min, max)
    };

    let (tp_min, tp_max) = min_max(|r| r.top_p);
    let (t_min, t_max) = min_max(|r| r.temperature);
    let (rp_min, rp_max) = min_max(|r| r.repetition_penalty);

    info!("top_p range: {:.2} - {:.2}", tp_min, tp_max);
    info!("temperature range: {:.2} - {:.2}", t_min, t_max);
    info!("repetition_penalty range: {:.2} - {:.2}", rp_min, rp_max);

    let mut by_voice: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for row in rows {
        *by_voice.entry(row.voice.as_str()).or_insert(0) += 1;
    }
    info!("Voice assignment:");
    for (voice, count) in by_voice {
        info!("  {}: {}", voice, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speakers::sample_population;
    use tempfile::TempDir;

    #[test]
    fn test_plan_parameter_ranges() {
        let speakers = sample_population(100, Some(5));
        let plan = build_plan(&speakers, 42);

        for row in &plan {
            assert!(row.top_p >= 0.9 && row.top_p <= 1.0);
            assert!(row.temperature >= 0.5 && row.temperature <= 0.7);
            assert!(row.repetition_penalty >= 1.1 && row.repetition_penalty <= 1.5);
        }
    }

    #[test]
    fn test_voice_matches_gender() {
        let speakers = sample_population(100, Some(5));
        let plan = build_plan(&speakers, 42);

        for row in &plan {
            if row.gender == "Female" {
                assert!(FEMALE_VOICES.contains(&row.voice.as_str()));
            } else {
                assert!(MALE_VOICES.contains(&row.voice.as_str()));
            }
        }
    }

    #[test]
    fn test_rounding_two_decimals() {
        let speakers = sample_population(50, Some(6));
        for row in build_plan(&speakers, 42) {
            assert_eq!(row.top_p, round2(row.top_p));
            assert_eq!(row.temperature, round2(row.temperature));
        }
    }

    #[test]
    fn test_csv_roundtrip_and_empty_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plan.csv");

        let speakers = sample_population(5, Some(2));
        let plan = build_plan(&speakers, 42);
        write_csv(&plan, &path).unwrap();

        let read_back = read_csv(&path).unwrap();
        assert_eq!(read_back.len(), 5);
        assert_eq!(read_back[0].voice, plan[0].voice);

        // Header-only CSV must be rejected
        let empty = temp_dir.path().join("empty.csv");
        write_csv(&[], &empty).unwrap();
        assert!(read_csv(&empty).is_err());
    }
}
