//! Speaker attributes encoded in file and folder names
//!
//! Recording names carry demographic attributes joined with underscores:
//! `CAN_Montreal_Male_29.wav`. Generated trees use the same convention for
//! folder names, with an optional rate class appended.

use serde::{Deserialize, Serialize};

/// Speaker attributes parsed from a file or folder name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeakerAttrs {
    pub country: String,
    pub city: String,
    pub gender: String,
    pub age: String,
}

impl SpeakerAttrs {
    /// Fallback attributes for names that do not follow the convention
    pub fn unknown() -> Self {
        Self {
            country: "UNK".to_string(),
            city: "UNK".to_string(),
            gender: "UNK".to_string(),
            age: "00".to_string(),
        }
    }

    /// Parse attributes from a file stem (`COUNTRY_CITY_GENDER_AGE[_...]`)
    ///
    /// Names with fewer than four underscore-separated parts get the UNK
    /// fallback so the pipeline can keep going on sloppily named inputs.
    pub fn parse(stem: &str) -> Self {
        let parts: Vec<&str> = stem.split('_').collect();

        if parts.len() >= 4 {
            Self {
                country: parts[0].to_string(),
                city: parts[1].to_string(),
                gender: parts[2].to_string(),
                age: parts[3].to_string(),
            }
        } else {
            tracing::warn!(stem = %stem, "Unrecognized name format, using UNK attributes");
            Self::unknown()
        }
    }

    /// Extract the attribute-bearing stem from a file name
    ///
    /// Recordings sometimes arrive with doubled extensions from download
    /// tools (`name.wav.mp3`); the stem ends at the first `.wav`.
    pub fn stem_of(file_name: &str) -> &str {
        if let Some(idx) = file_name.find(".wav.") {
            return &file_name[..idx];
        }
        file_name
            .rfind('.')
            .map(|idx| &file_name[..idx])
            .unwrap_or(file_name)
    }

    /// Underscore-joined prefix (`CAN_Montreal_Male_29`)
    pub fn prefix(&self) -> String {
        format!("{}_{}_{}_{}", self.country, self.city, self.gender, self.age)
    }
}
