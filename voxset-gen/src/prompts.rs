//! Voice-characteristic prompt composition
//!
//! Turns sampled speaker rows into one-sentence voice descriptions for
//! prompt-driven TTS models ("34 year old female with warm, mature voice.
//! British English accent with crisp consonants. ...").

use crate::speakers::SpeakerRow;
use anyhow::{Context, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

const MALE_TONES: &[&str] = &[
    "deep", "resonant", "baritone", "tenor", "husky", "gravelly", "smooth", "rich", "warm",
    "strong",
];
const FEMALE_TONES: &[&str] = &[
    "melodic", "soprano", "alto", "bright", "warm", "clear", "soft", "rich", "smooth", "resonant",
];
const EMOTIONS: &[&str] = &[
    "neutral", "enthusiastic", "calm", "confident", "friendly", "professional", "thoughtful",
    "relaxed",
];
const PITCH_VARIATIONS: &[&str] = &[
    "minimal pitch variation",
    "moderate pitch variation",
    "expressive pitch",
    "animated pitch",
    "monotone",
];

/// Age-band descriptor words (band min, band max, descriptors)
const AGE_DESCRIPTORS: &[(u32, u32, &[&str])] = &[
    (15, 24, &["youthful", "vibrant", "energetic", "fresh"]),
    (25, 34, &["mature", "vibrant", "energetic", "confident"]),
    (35, 44, &["mature", "well-developed", "confident", "established"]),
    (45, 54, &["seasoned", "experienced", "mature", "self-assured"]),
    (55, 64, &["refined", "mature", "seasoned", "experienced"]),
    (65, 80, &["weathered", "mature", "dignified", "seasoned"]),
];

/// Accent description and trait words keyed by accent name
const ACCENT_TRAITS: &[(&str, &str, &[&str])] = &[
    ("Westcoast US", "West Coast American accent", &[
        "relaxed vowels", "California vowel shift", "minimal regional markers", "modern inflections",
    ]),
    ("Eastcoast US", "East Coast American accent", &[
        "non-rhotic tendencies", "distinctive vowel sounds", "faster rhythm", "strong consonants",
    ]),
    ("Midwest US", "Midwestern American accent", &[
        "nasal qualities", "flat 'a' sounds", "rounded 'o' vowels", "clear 'r' pronunciation",
    ]),
    ("South US", "Southern American accent", &[
        "drawled vowels", "softened consonants", "melodic intonation", "distinctive rhythm",
    ]),
    ("Latin", "Latin American accent", &[
        "Spanish-influenced rhythm", "rolled 'r' sounds", "distinctive vowel stress", "syllable-timed pattern",
    ]),
    ("French", "French accent", &[
        "nasal vowels", "uvular 'r' sound", "even stress pattern", "distinct liaison",
    ]),
    ("England", "British English accent", &[
        "non-rhotic pronunciation", "t-glottalization", "distinct vowel sounds", "crisp consonants",
    ]),
    ("India", "Indian accent", &[
        "retroflex consonants", "syllable-timed rhythm", "distinctive stress patterns", "unique intonation",
    ]),
    ("Australia", "Australian accent", &[
        "raised vowels", "non-rhotic pronunciation", "upward inflection", "distinctive diphthongs",
    ]),
];

const RATE_DESCRIPTORS: &[(&str, &[&str])] = &[
    ("Fast", &["rapid", "quick", "swift", "brisk", "accelerated"]),
    ("Normal", &["moderate", "measured", "standard", "conversational"]),
    ("Slow", &["unhurried", "deliberate", "measured", "leisurely"]),
];

/// A speaker with its composed voice description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRow {
    pub identifier: String,
    pub voice_characteristics: String,
    pub gender: String,
    pub age: u32,
    pub accent: String,
    pub speech_rate: String,
}

/// Compose a prompt row for every speaker
///
/// Deterministic under `seed` so a regenerated prompt sheet matches its
/// predecessor.
pub fn compose_prompts(speakers: &[SpeakerRow], seed: u64) -> Vec<PromptRow> {
    let mut rng = StdRng::seed_from_u64(seed);

    speakers
        .iter()
        .map(|speaker| {
            let tones = if speaker.gender == "Male" {
                MALE_TONES
            } else {
                FEMALE_TONES
            };
            let tone = tones.choose(&mut rng).copied().unwrap_or("warm");
            let emotion = EMOTIONS.choose(&mut rng).copied().unwrap_or("neutral");
            let pitch = PITCH_VARIATIONS
                .choose(&mut rng)
                .copied()
                .unwrap_or("moderate pitch variation");

            let age_words = AGE_DESCRIPTORS
                .iter()
                .find(|(min, max, _)| speaker.age >= *min && speaker.age <= *max)
                .map(|(_, _, words)| *words)
                .unwrap_or(AGE_DESCRIPTORS[AGE_DESCRIPTORS.len() - 1].2);
            let age_desc = age_words.choose(&mut rng).copied().unwrap_or("mature");

            let (accent_desc, accent_trait) = ACCENT_TRAITS
                .iter()
                .find(|(name, _, _)| *name == speaker.accent)
                .map(|(_, desc, traits)| {
                    (
                        *desc,
                        traits.choose(&mut rng).copied().unwrap_or("clear diction"),
                    )
                })
                .unwrap_or(("neutral accent", "clear diction"));

            let rate_desc = RATE_DESCRIPTORS
                .iter()
                .find(|(name, _)| *name == speaker.speech_rate)
                .and_then(|(_, words)| words.choose(&mut rng).copied())
                .unwrap_or("moderate");

            let voice_characteristics = format!(
                "{} year old {} with {}, {} voice. {} with {}. Clear, {} speech at {} speed with {}.",
                speaker.age,
                speaker.gender.to_lowercase(),
                tone,
                age_desc,
                accent_desc,
                accent_trait,
                emotion,
                rate_desc,
                pitch,
            );

            PromptRow {
                identifier: speaker.identifier.clone(),
                voice_characteristics,
                gender: speaker.gender.clone(),
                age: speaker.age,
                accent: speaker.accent.clone(),
                speech_rate: speaker.speech_rate.clone(),
            }
        })
        .collect()
}

/// Write prompt rows to CSV
pub fn write_csv(rows: &[PromptRow], out_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(out_path)
        .with_context(|| format!("Creating {}", out_path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} prompts to {}", rows.len(), out_path.display());
    Ok(())
}
