//! Neural TTS service client
//!
//! Thin client over the cloud neural-voice synthesis endpoint. Each request
//! names a voice and optional rate/volume offsets (signed percentages, the
//! service's own parameter form) and returns rendered WAV bytes.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "voxset/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const OUTPUT_FORMAT: &str = "riff-16khz-16bit-mono-pcm";

/// Neural TTS errors
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Empty audio returned for voice {0}")]
    EmptyAudio(String),
}

/// One synthesis request
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
    /// Rate offset like "+10%" or "-8%"; omitted = service default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
    /// Volume offset like "+3%"
    pub volume: String,
    pub format: &'static str,
}

impl SynthesisRequest {
    pub fn new(text: &str, voice: &str) -> Self {
        Self {
            text: text.to_string(),
            voice: voice.to_string(),
            rate: None,
            volume: "+0%".to_string(),
            format: OUTPUT_FORMAT,
        }
    }

    /// Signed percentage rate offset
    pub fn with_rate_percent(mut self, percent: i32) -> Self {
        self.rate = Some(format_signed_percent(percent));
        self
    }

    /// Signed percentage volume offset
    pub fn with_volume_percent(mut self, percent: i32) -> Self {
        self.volume = format_signed_percent(percent);
        self
    }
}

/// Format a signed percent the way the service expects ("+7%", "-12%")
fn format_signed_percent(percent: i32) -> String {
    if percent >= 0 {
        format!("+{}%", percent)
    } else {
        format!("{}%", percent)
    }
}

/// Neural TTS client
pub struct NeuralTtsClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl NeuralTtsClient {
    pub fn new(api_key: String, endpoint: String) -> Result<Self, TtsError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
            api_key,
        })
    }

    /// Synthesize one utterance; returns WAV bytes
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        tracing::debug!(
            voice = %request.voice,
            rate = request.rate.as_deref().unwrap_or("default"),
            volume = %request.volume,
            "Requesting synthesis"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(TtsError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ApiError(status.as_u16(), error_text));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        if audio.is_empty() {
            return Err(TtsError::EmptyAudio(request.voice.clone()));
        }

        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_percent_format() {
        assert_eq!(format_signed_percent(7), "+7%");
        assert_eq!(format_signed_percent(0), "+0%");
        assert_eq!(format_signed_percent(-12), "-12%");
    }

    #[test]
    fn test_request_builder() {
        let request = SynthesisRequest::new("Volume up", "en-GB-RyanNeural")
            .with_rate_percent(-8)
            .with_volume_percent(3);

        assert_eq!(request.rate.as_deref(), Some("-8%"));
        assert_eq!(request.volume, "+3%");
    }

    #[test]
    fn test_request_default_omits_rate() {
        let request = SynthesisRequest::new("Pause", "en-US-AvaNeural");
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("rate").is_none());
        assert_eq!(json["volume"], "+0%");
        assert_eq!(json["format"], OUTPUT_FORMAT);
    }
}
