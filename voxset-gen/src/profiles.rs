//! Built-in voice profiles and scripted texts
//!
//! Each neural voice is tagged with the demographic attributes its output is
//! filed under. The accent a voice carries does not always have a city in
//! the target population, so some voices map onto the nearest bucket.

/// A neural TTS voice and the demographic bucket it fills
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceProfile {
    /// Service voice identifier
    pub voice: &'static str,
    pub country: &'static str,
    pub city: &'static str,
    pub gender: &'static str,
    pub age: u32,
}

impl VoiceProfile {
    /// Underscore-joined attribute prefix (`USA_Chicago_Female_23`)
    pub fn prefix(&self) -> String {
        format!("{}_{}_{}_{}", self.country, self.city, self.gender, self.age)
    }
}

/// Speech-rate class for generated variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateClass {
    Normal,
    Fast,
    Slow,
}

impl RateClass {
    pub fn all() -> [RateClass; 3] {
        [RateClass::Normal, RateClass::Fast, RateClass::Slow]
    }

    /// Folder-name form ("Normal"/"Fast"/"Slow")
    pub fn name(&self) -> &'static str {
        match self {
            RateClass::Normal => "Normal",
            RateClass::Fast => "Fast",
            RateClass::Slow => "Slow",
        }
    }
}

/// The full voice roster used for batch synthesis
pub const VOICE_PROFILES: &[VoiceProfile] = &[
    VoiceProfile { voice: "en-AU-NatashaNeural", country: "AUS", city: "Sydney", gender: "Female", age: 25 },
    VoiceProfile { voice: "en-AU-WilliamNeural", country: "AUS", city: "Sydney", gender: "Male", age: 30 },
    VoiceProfile { voice: "en-CA-ClaraNeural", country: "CAN", city: "Montreal", gender: "Female", age: 30 },
    VoiceProfile { voice: "en-CA-LiamNeural", country: "CAN", city: "Montreal", gender: "Male", age: 20 },
    VoiceProfile { voice: "en-HK-YanNeural", country: "UK", city: "London", gender: "Female", age: 55 },
    VoiceProfile { voice: "en-HK-SamNeural", country: "UK", city: "London", gender: "Male", age: 55 },
    VoiceProfile { voice: "en-IN-NeerjaExpressiveNeural", country: "IND", city: "Delhi", gender: "Female", age: 27 },
    VoiceProfile { voice: "en-IN-NeerjaNeural", country: "IND", city: "Delhi", gender: "Female", age: 68 },
    VoiceProfile { voice: "en-IN-PrabhatNeural", country: "IND", city: "Delhi", gender: "Male", age: 32 },
    VoiceProfile { voice: "en-IE-ConnorNeural", country: "UK", city: "London", gender: "Male", age: 50 },
    VoiceProfile { voice: "en-IE-EmilyNeural", country: "UK", city: "London", gender: "Female", age: 18 },
    VoiceProfile { voice: "en-KE-AsiliaNeural", country: "IND", city: "Delhi", gender: "Female", age: 26 },
    VoiceProfile { voice: "en-KE-ChilembaNeural", country: "IND", city: "Delhi", gender: "Male", age: 46 },
    VoiceProfile { voice: "en-NZ-MitchellNeural", country: "AUS", city: "Sydney", gender: "Male", age: 35 },
    VoiceProfile { voice: "en-NZ-MollyNeural", country: "AUS", city: "Sydney", gender: "Female", age: 50 },
    VoiceProfile { voice: "en-NG-AbeoNeural", country: "IND", city: "Delhi", gender: "Male", age: 48 },
    VoiceProfile { voice: "en-NG-EzinneNeural", country: "IND", city: "Delhi", gender: "Female", age: 25 },
    VoiceProfile { voice: "en-PH-JamesNeural", country: "USA", city: "Miami", gender: "Male", age: 42 },
    VoiceProfile { voice: "en-PH-RosaNeural", country: "USA", city: "Miami", gender: "Female", age: 50 },
    VoiceProfile { voice: "en-US-AvaNeural", country: "USA", city: "Chicago", gender: "Female", age: 23 },
    VoiceProfile { voice: "en-US-AndrewNeural", country: "USA", city: "New York", gender: "Male", age: 33 },
    VoiceProfile { voice: "en-US-EmmaNeural", country: "USA", city: "Dallas", gender: "Female", age: 27 },
    VoiceProfile { voice: "en-US-BrianNeural", country: "USA", city: "Chicago", gender: "Male", age: 42 },
    VoiceProfile { voice: "en-SG-LunaNeural", country: "USA", city: "Los Angeles", gender: "Female", age: 30 },
    VoiceProfile { voice: "en-SG-WayneNeural", country: "USA", city: "Los Angeles", gender: "Male", age: 35 },
    VoiceProfile { voice: "en-ZA-LeahNeural", country: "UK", city: "London", gender: "Female", age: 26 },
    VoiceProfile { voice: "en-ZA-LukeNeural", country: "UK", city: "London", gender: "Male", age: 42 },
    VoiceProfile { voice: "en-TZ-ElimuNeural", country: "USA", city: "Dallas", gender: "Male", age: 30 },
    VoiceProfile { voice: "en-TZ-ImaniNeural", country: "USA", city: "Miami", gender: "Female", age: 28 },
    VoiceProfile { voice: "en-GB-LibbyNeural", country: "UK", city: "London", gender: "Female", age: 25 },
    VoiceProfile { voice: "en-GB-MaisieNeural", country: "UK", city: "London", gender: "Female", age: 22 },
    VoiceProfile { voice: "en-GB-RyanNeural", country: "UK", city: "London", gender: "Male", age: 35 },
    VoiceProfile { voice: "en-GB-SoniaNeural", country: "UK", city: "London", gender: "Female", age: 40 },
    VoiceProfile { voice: "en-GB-ThomasNeural", country: "UK", city: "London", gender: "Male", age: 75 },
    VoiceProfile { voice: "en-US-AnaNeural", country: "USA", city: "Miami", gender: "Female", age: 34 },
    VoiceProfile { voice: "en-US-AndrewMultilingualNeural", country: "USA", city: "Los Angeles", gender: "Male", age: 26 },
    VoiceProfile { voice: "en-US-AriaNeural", country: "USA", city: "New York", gender: "Female", age: 48 },
    VoiceProfile { voice: "en-US-AvaMultilingualNeural", country: "USA", city: "New York", gender: "Female", age: 28 },
    VoiceProfile { voice: "en-US-BrianMultilingualNeural", country: "USA", city: "Los Angeles", gender: "Male", age: 38 },
    VoiceProfile { voice: "en-US-ChristopherNeural", country: "USA", city: "Chicago", gender: "Male", age: 32 },
    VoiceProfile { voice: "en-US-EmmaMultilingualNeural", country: "USA", city: "Los Angeles", gender: "Female", age: 26 },
    VoiceProfile { voice: "en-US-EricNeural", country: "USA", city: "Los Angeles", gender: "Male", age: 29 },
    VoiceProfile { voice: "en-US-GuyNeural", country: "USA", city: "New York", gender: "Male", age: 35 },
    VoiceProfile { voice: "en-US-JennyNeural", country: "USA", city: "Dallas", gender: "Female", age: 28 },
    VoiceProfile { voice: "en-US-MichelleNeural", country: "USA", city: "Los Angeles", gender: "Female", age: 38 },
    VoiceProfile { voice: "en-US-RogerNeural", country: "USA", city: "New York", gender: "Male", age: 40 },
    VoiceProfile { voice: "en-US-SteffanNeural", country: "USA", city: "Dallas", gender: "Male", age: 31 },
];

/// Spoken command phrases rendered per profile/rate/variant
pub const INSTRUCTIONS: &[&str] = &[
    "Hey Memo",
    "Next",
    "Pause",
    "Play",
    "Stop Recording",
    "Take A Picture",
    "Take A Video",
    "Volume Down",
    "Volume Up",
    "Look, And",
];

/// Multi-command scripted texts for the prediction-serving model
pub const SCRIPTED_TEXTS: &[&str] = &[
    "Hey Memo. -- Take a picture. -- Stop recording.",
    "Hey Memo. -- Take a video. -- Stop recording.",
    "Hey Memo. -- Volume up. -- Volume down.",
    "Hey Memo. -- Volume down. -- Volume up.",
    "Hey Memo. -- Play. -- Pause. -- Next.",
    "Hey Memo. -- Next. -- Pause. -- Play.",
    "Hey Memo. -- Pause. -- Next. -- Play.",
    "Hey Memo. -- Next. -- Stop recording.",
    "Take a picture. -- Volume down. -- Play.",
    "Hey Memo. -- Take a video. -- Pause.",
    "Volume up. -- Stop recording. -- Next.",
    "Play. -- Hey Memo. -- Take a picture.",
    "Take a video. -- Pause. -- Volume down.",
    "Next. -- Hey Memo. -- Stop recording.",
    "Pause. -- Take a picture. -- Volume up.",
    "Stop recording. -- Play. -- Next.",
];

/// The two speakers of the built-in dialogue
pub const DIALOGUE_PROFILES: [VoiceProfile; 2] = [
    VoiceProfile { voice: "en-US-SteffanNeural", country: "USA", city: "Dallas", gender: "Male", age: 31 },
    VoiceProfile { voice: "en-US-JennyNeural", country: "USA", city: "Seattle", gender: "Female", age: 28 },
];

/// Built-in two-speaker conversation (speaker index, line)
pub const DIALOGUE_SCRIPT: &[(usize, &str)] = &[
    (0, "Hey, have you seen that new documentary about space exploration?"),
    (1, "No, I haven't. What's it about?"),
    (0, "It covers everything from the early Apollo missions to the current plans for Mars colonization."),
    (1, "That sounds interesting! Are the visuals good?"),
    (0, "The visuals are absolutely stunning, especially the segments about the James Webb telescope."),
    (1, "I've been following some of the recent developments in astronomy. It's fascinating how much our understanding of the universe has changed."),
    (0, "Exactly! I'm thinking about joining an amateur astronomy club in our area."),
    (1, "Really? What do they do?"),
    (0, "They do monthly stargazing events at a spot about an hour outside the city where there's minimal light pollution."),
    (1, "That sounds amazing. Do they welcome beginners?"),
    (0, "Absolutely! They have several telescopes that members can use. Would you be interested in coming along sometime?"),
    (1, "I'd love to! Just let me know when the next event is."),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_is_populated() {
        assert!(VOICE_PROFILES.len() >= 40);
        // All voices unique
        let mut voices: Vec<_> = VOICE_PROFILES.iter().map(|p| p.voice).collect();
        voices.sort();
        voices.dedup();
        assert_eq!(voices.len(), VOICE_PROFILES.len());
    }

    #[test]
    fn test_profile_prefix() {
        let profile = &VOICE_PROFILES[0];
        assert_eq!(profile.prefix(), "AUS_Sydney_Female_25");
    }

    #[test]
    fn test_dialogue_speaker_indices_valid() {
        for &(speaker, _) in DIALOGUE_SCRIPT {
            assert!(speaker < DIALOGUE_PROFILES.len());
        }
    }

    #[test]
    fn test_rate_class_names() {
        assert_eq!(RateClass::Normal.name(), "Normal");
        assert_eq!(RateClass::all().len(), 3);
    }
}
