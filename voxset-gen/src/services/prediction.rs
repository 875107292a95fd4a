//! Prediction-serving TTS client
//!
//! The generative TTS model runs behind a prediction API: create a
//! prediction, poll until it settles, then download the output audio from
//! the returned URL.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "voxset/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const POLL_INTERVAL_MS: u64 = 1000;
const MAX_POLL_ATTEMPTS: u32 = 120;
const MAX_NEW_TOKENS: u32 = 1000;

/// Prediction API errors
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Invalid API token")]
    InvalidToken,

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    #[error("Prediction timed out after {0} polls")]
    Timeout(u32),

    #[error("Download failed ({0}): {1}")]
    DownloadFailed(u16, String),
}

/// Parameters for one prediction
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub text: String,
    pub voice: String,
    pub top_p: f64,
    pub temperature: f64,
    pub repetition_penalty: f64,
}

#[derive(Debug, Serialize)]
struct CreateBody<'a> {
    version: &'a str,
    input: InputBody<'a>,
}

#[derive(Debug, Serialize)]
struct InputBody<'a> {
    text: &'a str,
    voice: &'a str,
    top_p: f64,
    temperature: f64,
    max_new_tokens: u32,
    repetition_penalty: f64,
}

#[derive(Debug, Deserialize)]
struct PredictionState {
    id: String,
    status: String,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Prediction-serving client
pub struct PredictionClient {
    http_client: reqwest::Client,
    endpoint: String,
    model_version: String,
    token: String,
}

impl PredictionClient {
    pub fn new(
        token: String,
        endpoint: String,
        model_version: String,
    ) -> Result<Self, PredictionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| PredictionError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
            model_version,
            token,
        })
    }

    /// Run one prediction to completion and download its audio output
    pub async fn generate(&self, request: &PredictionRequest) -> Result<Vec<u8>, PredictionError> {
        let state = self.create(request).await?;
        let state = self.wait_for(state).await?;

        let output_url = state.output.ok_or_else(|| {
            PredictionError::PredictionFailed("Prediction succeeded without output".to_string())
        })?;

        self.download(&output_url).await
    }

    async fn create(&self, request: &PredictionRequest) -> Result<PredictionState, PredictionError> {
        let body = CreateBody {
            version: &self.model_version,
            input: InputBody {
                text: &request.text,
                voice: &request.voice,
                top_p: request.top_p,
                temperature: request.temperature,
                max_new_tokens: MAX_NEW_TOKENS,
                repetition_penalty: request.repetition_penalty,
            },
        };

        tracing::debug!(voice = %request.voice, "Creating prediction");

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Authorization", format!("Token {}", self.token))
            .json(&body)
            .send()
            .await
            .map_err(|e| PredictionError::NetworkError(e.to_string()))?;

        self.parse_state(response).await
    }

    /// Poll until the prediction settles
    async fn wait_for(&self, mut state: PredictionState) -> Result<PredictionState, PredictionError> {
        for attempt in 0..MAX_POLL_ATTEMPTS {
            match state.status.as_str() {
                "succeeded" => return Ok(state),
                "failed" | "canceled" => {
                    return Err(PredictionError::PredictionFailed(
                        state.error.unwrap_or_else(|| state.status.clone()),
                    ))
                }
                _ => {
                    tracing::debug!(
                        id = %state.id,
                        status = %state.status,
                        attempt = attempt,
                        "Prediction pending"
                    );
                    tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;

                    let url = format!("{}/{}", self.endpoint, state.id);
                    let response = self
                        .http_client
                        .get(&url)
                        .header("Authorization", format!("Token {}", self.token))
                        .send()
                        .await
                        .map_err(|e| PredictionError::NetworkError(e.to_string()))?;
                    state = self.parse_state(response).await?;
                }
            }
        }

        Err(PredictionError::Timeout(MAX_POLL_ATTEMPTS))
    }

    async fn parse_state(
        &self,
        response: reqwest::Response,
    ) -> Result<PredictionState, PredictionError> {
        let status = response.status();

        if status == 401 || status == 403 {
            return Err(PredictionError::InvalidToken);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PredictionError::ApiError(status.as_u16(), error_text));
        }

        response
            .json::<PredictionState>()
            .await
            .map_err(|e| PredictionError::NetworkError(e.to_string()))
    }

    /// Download the output audio
    async fn download(&self, url: &str) -> Result<Vec<u8>, PredictionError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PredictionError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PredictionError::DownloadFailed(status.as_u16(), error_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PredictionError::NetworkError(e.to_string()))?;

        tracing::debug!(bytes = bytes.len(), "Prediction output downloaded");

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_parse_pending() {
        let json = r#"{"id":"p1","status":"processing"}"#;
        let state: PredictionState = serde_json::from_str(json).unwrap();
        assert_eq!(state.status, "processing");
        assert!(state.output.is_none());
    }

    #[test]
    fn test_state_parse_succeeded() {
        let json = r#"{"id":"p1","status":"succeeded","output":"https://cdn.example/out.wav"}"#;
        let state: PredictionState = serde_json::from_str(json).unwrap();
        assert_eq!(state.status, "succeeded");
        assert_eq!(state.output.as_deref(), Some("https://cdn.example/out.wav"));
    }

    #[test]
    fn test_create_body_shape() {
        let body = CreateBody {
            version: "model-v1",
            input: InputBody {
                text: "Hey Memo.",
                voice: "tara",
                top_p: 0.95,
                temperature: 0.6,
                max_new_tokens: MAX_NEW_TOKENS,
                repetition_penalty: 1.1,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["version"], "model-v1");
        assert_eq!(json["input"]["voice"], "tara");
        assert_eq!(json["input"]["max_new_tokens"], 1000);
    }
}
