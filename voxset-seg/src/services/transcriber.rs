//! Cloud speech-to-text client
//!
//! Sends short mono WAV clips to the speech service's single-shot
//! recognition endpoint and returns the display transcript. The service is
//! treated as an external collaborator: no streaming, no partial results.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use voxset_common::audio::wav;

const USER_AGENT: &str = "voxset/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Minimum interval between recognition requests (service rate limit)
const RATE_LIMIT_MS: u64 = 250;

/// Transcription errors
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Audio encoding error: {0}")]
    AudioError(String),
}

/// Speech-to-text abstraction
///
/// The pipeline depends on this trait so tests can run without the cloud
/// service.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a mono clip; an unrecognizable clip yields an empty string
    async fn transcribe(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<String, TranscribeError>;
}

/// Single-shot recognition response
#[derive(Debug, Deserialize)]
struct RecognitionResponse {
    #[serde(rename = "RecognitionStatus")]
    recognition_status: String,
    #[serde(rename = "DisplayText")]
    display_text: Option<String>,
}

/// Minimum-interval rate limiter
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Speech API rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Cloud speech recognition client
pub struct SpeechApiClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    endpoint: String,
    api_key: String,
}

impl SpeechApiClient {
    /// Create a client for the given region and recognition language
    pub fn new(api_key: String, region: &str, language: &str) -> Result<Self, TranscribeError> {
        let endpoint = format!(
            "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1?language={}",
            region, language
        );
        Self::with_endpoint(api_key, endpoint)
    }

    /// Create a client against an explicit endpoint URL (tests, proxies)
    pub fn with_endpoint(api_key: String, endpoint: String) -> Result<Self, TranscribeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TranscribeError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl Transcriber for SpeechApiClient {
    async fn transcribe(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<String, TranscribeError> {
        // Rate limit
        self.rate_limiter.wait().await;

        let wav_bytes = wav::encode_wav_mono16(samples, sample_rate)
            .map_err(|e| TranscribeError::AudioError(e.to_string()))?;

        tracing::debug!(
            bytes = wav_bytes.len(),
            duration_seconds = format!("{:.2}", samples.len() as f64 / sample_rate as f64),
            "Sending clip to speech API"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header(
                "Content-Type",
                format!("audio/wav; codecs=audio/pcm; samplerate={}", sample_rate),
            )
            .header("Accept", "application/json")
            .body(wav_bytes)
            .send()
            .await
            .map_err(|e| TranscribeError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(TranscribeError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscribeError::ApiError(status.as_u16(), error_text));
        }

        let recognition: RecognitionResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::ParseError(e.to_string()))?;

        match recognition.recognition_status.as_str() {
            "Success" => {
                let text = recognition.display_text.unwrap_or_default();
                tracing::info!(text = %text, "Recognition succeeded");
                Ok(text)
            }
            "NoMatch" => {
                tracing::warn!("Speech could not be recognized");
                Ok(String::new())
            }
            other => {
                tracing::warn!(status = %other, "Recognition did not succeed");
                Ok(String::new())
            }
        }
    }
}
