//! Command keyword table and transcript matching
//!
//! The dataset labels clips with one of a fixed set of voice commands. Each
//! command has a spoken phrase ("take a picture") and a compact label used in
//! file and folder names ("TakeAPicture"). Matching normalizes ASR output
//! (lowercase, punctuation stripped) and looks for the phrase as a substring,
//! falling back to fuzzy similarity for near-miss transcriptions.

use serde::{Deserialize, Serialize};

/// Jaro-Winkler similarity required for a fuzzy keyword match
const FUZZY_MATCH_THRESHOLD: f64 = 0.92;

/// A voice command: spoken phrase plus its compact filename label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Keyword {
    /// Spoken form, lowercase ("volume up")
    pub phrase: String,
    /// Compact label used in filenames ("VolumeUp")
    pub label: String,
}

impl Keyword {
    pub fn new(phrase: &str, label: &str) -> Self {
        Self {
            phrase: phrase.to_string(),
            label: label.to_string(),
        }
    }
}

/// Ordered table of voice commands
///
/// Table order matters: the first matching keyword wins, so longer or more
/// specific phrases should precede shorter ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordTable {
    pub keywords: Vec<Keyword>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            keywords: vec![
                Keyword::new("hey memo", "HeyMemo"),
                Keyword::new("take a picture", "TakeAPicture"),
                Keyword::new("take a video", "TakeAVideo"),
                Keyword::new("stop recording", "StopRecording"),
                Keyword::new("pause", "Pause"),
                Keyword::new("next", "Next"),
                Keyword::new("play", "Play"),
                Keyword::new("volume up", "VolumeUp"),
                Keyword::new("volume down", "VolumeDown"),
                Keyword::new("look and", "LookAnd"),
            ],
        }
    }
}

impl KeywordTable {
    /// Normalize a transcript: lowercase, strip everything except
    /// alphanumerics and spaces
    pub fn normalize(text: &str) -> String {
        text.to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// Normalize for loose matching: lowercase alphanumerics only, no spaces
    ///
    /// Used when matching against filenames and folder names where word
    /// boundaries are unreliable ("TakeAPicture", "take-a-picture").
    pub fn normalize_loose(text: &str) -> String {
        text.to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }

    /// Match an ASR transcript against the keyword table
    ///
    /// Exact substring match first (in table order), then a Jaro-Winkler
    /// fuzzy pass for near-miss transcriptions ("take a pitcher").
    /// Returns the matched label, or `None` when nothing matches.
    pub fn match_transcript(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }

        let normalized = Self::normalize(text);

        for keyword in &self.keywords {
            if normalized.contains(&keyword.phrase) {
                tracing::debug!(phrase = %keyword.phrase, label = %keyword.label, "Keyword matched");
                return Some(&keyword.label);
            }
        }

        // Fuzzy fallback for single-command transcripts the substring pass
        // missed (homophones, dropped articles)
        let mut best: Option<(&str, f64)> = None;
        for keyword in &self.keywords {
            let score = strsim::jaro_winkler(&normalized, &keyword.phrase);
            if score >= FUZZY_MATCH_THRESHOLD {
                match best {
                    Some((_, best_score)) if best_score >= score => {}
                    _ => best = Some((&keyword.label, score)),
                }
            }
        }

        if let Some((label, score)) = best {
            tracing::debug!(label = %label, score = score, "Keyword fuzzy-matched");
            return Some(label);
        }

        tracing::debug!(text = %text, "No keyword matched");
        None
    }

    /// Match candidate strings (filename, folder name, sidecar text) against
    /// the table using loose normalization
    ///
    /// Returns every keyword label that appears in at least one candidate.
    pub fn match_candidates(&self, candidates: &[String]) -> Vec<&str> {
        let normalized: Vec<String> = candidates
            .iter()
            .map(|c| Self::normalize_loose(c))
            .collect();

        let mut matched = Vec::new();
        for keyword in &self.keywords {
            let needle = Self::normalize_loose(&keyword.label);
            if normalized.iter().any(|c| c.contains(&needle)) {
                matched.push(keyword.label.as_str());
            }
        }
        matched
    }

    /// All labels in table order
    pub fn labels(&self) -> Vec<&str> {
        self.keywords.iter().map(|k| k.label.as_str()).collect()
    }

    /// All spoken phrases in table order
    pub fn phrases(&self) -> Vec<&str> {
        self.keywords.iter().map(|k| k.phrase.as_str()).collect()
    }
}

/// Classified volume level of a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeLevel {
    High,
    Normal,
    Low,
}

impl VolumeLevel {
    /// Single-letter code used in filenames
    pub fn code(&self) -> &'static str {
        match self {
            VolumeLevel::High => "H",
            VolumeLevel::Normal => "N",
            VolumeLevel::Low => "L",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VolumeLevel::High => "high",
            VolumeLevel::Normal => "normal",
            VolumeLevel::Low => "low",
        }
    }
}

/// Classified speech rate of a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedLevel {
    Fast,
    Normal,
    Slow,
}

impl SpeedLevel {
    /// Single-letter code used in filenames
    pub fn code(&self) -> &'static str {
        match self {
            SpeedLevel::Fast => "F",
            SpeedLevel::Normal => "N",
            SpeedLevel::Slow => "S",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpeedLevel::Fast => "fast",
            SpeedLevel::Normal => "normal",
            SpeedLevel::Slow => "slow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(KeywordTable::normalize("Take a picture!"), "take a picture");
        assert_eq!(KeywordTable::normalize("  Hey, Memo. "), "hey memo");
    }

    #[test]
    fn test_normalize_loose() {
        assert_eq!(KeywordTable::normalize_loose("Take-A_Picture"), "takeapicture");
    }

    #[test]
    fn test_exact_match() {
        let table = KeywordTable::default();
        assert_eq!(table.match_transcript("Hey Memo."), Some("HeyMemo"));
        assert_eq!(table.match_transcript("please take a picture"), Some("TakeAPicture"));
        assert_eq!(table.match_transcript("Volume up!"), Some("VolumeUp"));
    }

    #[test]
    fn test_table_order_wins() {
        let table = KeywordTable::default();
        // "take a video" would also substring-match "take a" variants; the
        // first table entry containing the transcript text wins
        assert_eq!(table.match_transcript("take a video now"), Some("TakeAVideo"));
    }

    #[test]
    fn test_no_match() {
        let table = KeywordTable::default();
        assert_eq!(table.match_transcript("completely unrelated words"), None);
        assert_eq!(table.match_transcript(""), None);
    }

    #[test]
    fn test_fuzzy_match_near_miss() {
        let table = KeywordTable::default();
        // Dropped article, common ASR slip
        assert_eq!(table.match_transcript("take a pictur"), Some("TakeAPicture"));
    }

    #[test]
    fn test_match_candidates_from_filename() {
        let table = KeywordTable::default();
        let candidates = vec![
            "USA_Chicago_Male_42_TakeAPicture_var3".to_string(),
            "USA_Chicago_Male_42_Normal".to_string(),
        ];
        let hits = table.match_candidates(&candidates);
        assert_eq!(hits, vec!["TakeAPicture"]);
    }

    #[test]
    fn test_match_candidates_multiple() {
        let table = KeywordTable::default();
        let candidates = vec!["HeyMemo_then_VolumeUp".to_string()];
        let hits = table.match_candidates(&candidates);
        assert!(hits.contains(&"HeyMemo"));
        assert!(hits.contains(&"VolumeUp"));
    }

    #[test]
    fn test_volume_speed_codes() {
        assert_eq!(VolumeLevel::High.code(), "H");
        assert_eq!(SpeedLevel::Slow.code(), "S");
        assert_eq!(VolumeLevel::Normal.name(), "normal");
    }
}
