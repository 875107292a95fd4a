//! Voice enrollment (cloning) service client
//!
//! Enrolls reference recordings with the cloning service and synthesizes
//! audition clips with the resulting voice ids. Local reference files are
//! uploaded inline as base64 data URIs.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "voxset/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 120;
/// Enrollment prefixes: at most 10 lowercase alphanumerics
const MAX_PREFIX_LEN: usize = 10;

/// Voice cloning errors
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One enrolled voice as listed by the service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrolledVoice {
    pub voice_id: String,
    #[serde(default)]
    pub gmt_create: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateVoiceBody<'a> {
    model: &'a str,
    prefix: &'a str,
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateVoiceResponse {
    voice_id: String,
}

#[derive(Debug, Deserialize)]
struct ListVoicesResponse {
    #[serde(default)]
    voices: Vec<EnrolledVoice>,
}

#[derive(Debug, Serialize)]
struct SynthesizeBody<'a> {
    model: &'a str,
    voice: &'a str,
    text: &'a str,
}

/// Voice cloning client
pub struct VoiceCloneClient {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl VoiceCloneClient {
    pub fn new(api_key: String, endpoint: String, model: String) -> Result<Self, CloneError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CloneError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
            model,
            api_key,
        })
    }

    /// Enroll a reference recording; returns the new voice id
    ///
    /// `url` may be a public URL or a data URI from [`file_to_data_uri`].
    pub async fn create_voice(&self, prefix: &str, url: &str) -> Result<String, CloneError> {
        let body = CreateVoiceBody {
            model: &self.model,
            prefix,
            url,
        };

        let response = self
            .http_client
            .post(format!("{}/voices", self.endpoint))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| CloneError::NetworkError(e.to_string()))?;

        let parsed: CreateVoiceResponse = Self::parse_json(response).await?;

        tracing::info!(voice_id = %parsed.voice_id, prefix = %prefix, "Voice enrolled");

        Ok(parsed.voice_id)
    }

    /// List enrolled voices, one page at a time
    pub async fn list_voices(
        &self,
        prefix: Option<&str>,
        page_index: usize,
        page_size: usize,
    ) -> Result<Vec<EnrolledVoice>, CloneError> {
        let mut request = self
            .http_client
            .get(format!("{}/voices", self.endpoint))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(&[
                ("page_index", page_index.to_string()),
                ("page_size", page_size.to_string()),
            ]);
        if let Some(prefix) = prefix {
            request = request.query(&[("prefix", prefix)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CloneError::NetworkError(e.to_string()))?;

        let parsed: ListVoicesResponse = Self::parse_json(response).await?;
        Ok(parsed.voices)
    }

    /// List every enrolled voice, following pagination to the end
    pub async fn list_all_voices(
        &self,
        prefix: Option<&str>,
    ) -> Result<Vec<EnrolledVoice>, CloneError> {
        const PAGE_SIZE: usize = 100;

        let mut all = Vec::new();
        let mut page_index = 0;

        loop {
            let page = self.list_voices(prefix, page_index, PAGE_SIZE).await?;
            if page.is_empty() {
                break;
            }
            let last_page = page.len() < PAGE_SIZE;
            all.extend(page);
            if last_page {
                break;
            }
            page_index += 1;
        }

        Ok(all)
    }

    /// Delete an enrolled voice
    pub async fn delete_voice(&self, voice_id: &str) -> Result<(), CloneError> {
        let response = self
            .http_client
            .delete(format!("{}/voices/{}", self.endpoint, voice_id))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| CloneError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == 401 || status == 403 {
            return Err(CloneError::InvalidApiKey);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CloneError::ApiError(status.as_u16(), error_text));
        }

        tracing::info!(voice_id = %voice_id, "Voice deleted");
        Ok(())
    }

    /// Synthesize an audition clip with an enrolled voice; returns MP3 bytes
    pub async fn synthesize(&self, voice_id: &str, text: &str) -> Result<Vec<u8>, CloneError> {
        let body = SynthesizeBody {
            model: &self.model,
            voice: voice_id,
            text,
        };

        let response = self
            .http_client
            .post(format!("{}/synthesis", self.endpoint))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| CloneError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == 401 || status == 403 {
            return Err(CloneError::InvalidApiKey);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CloneError::ApiError(status.as_u16(), error_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CloneError::NetworkError(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CloneError> {
        let status = response.status();

        if status == 401 || status == 403 {
            return Err(CloneError::InvalidApiKey);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CloneError::ApiError(status.as_u16(), error_text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CloneError::NetworkError(e.to_string()))
    }
}

/// Sanitize an enrollment prefix: lowercase alphanumerics, max length
pub fn sanitize_prefix(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .take(MAX_PREFIX_LEN)
        .collect()
}

/// Read a local audio file into a base64 data URI
pub fn file_to_data_uri(path: &Path) -> Result<String, CloneError> {
    if !path.exists() {
        return Err(CloneError::FileNotFound(path.display().to_string()));
    }

    let mime = match path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        _ => "audio/wav",
    };

    let bytes = std::fs::read(path)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);

    Ok(format!("data:{};base64,{}", mime, encoded))
}
