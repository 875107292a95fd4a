//! Generation tool configuration
//!
//! Service endpoints and keys for the TTS, prediction and voice-cloning
//! services. Keys resolve environment-first, then TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use voxset_common::{config, Result};

/// Configuration for voxset-gen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Neural TTS synthesis endpoint
    pub tts_endpoint: String,
    /// Neural TTS API key (normally VOXSET_TTS_KEY)
    pub tts_key: Option<String>,

    /// Prediction-serving endpoint for the generative TTS model
    pub prediction_endpoint: String,
    /// Model version identifier passed with each prediction
    pub prediction_model: String,
    /// Prediction API token (normally VOXSET_PREDICTION_TOKEN)
    pub prediction_token: Option<String>,

    /// Voice enrollment (cloning) service endpoint
    pub clone_endpoint: String,
    /// Target cloning model
    pub clone_model: String,
    /// Voice cloning API key (normally VOXSET_CLONE_KEY)
    pub clone_key: Option<String>,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            tts_endpoint: "https://speech.platform.bing.com/consumer/speech/synthesize/readaloud/v1".to_string(),
            tts_key: None,
            prediction_endpoint: "https://api.replicate.com/v1/predictions".to_string(),
            prediction_model: "orpheus-3b-0.1-ft".to_string(),
            prediction_token: None,
            clone_endpoint: "https://dashscope.aliyuncs.com/api/v1/services/audio/tts-customization".to_string(),
            clone_model: "cosyvoice-v1".to_string(),
            clone_key: None,
        }
    }
}

impl GenConfig {
    /// Load config from a TOML file, or defaults when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => config::load_toml::<GenConfig>(p),
            None => Ok(GenConfig::default()),
        }
    }

    pub fn resolve_tts_key(&self) -> Result<String> {
        config::resolve_api_key(
            "VOXSET_TTS_KEY",
            self.tts_key.as_deref(),
            "Please configure using one of:\n\
             1. Environment: VOXSET_TTS_KEY=your-key-here\n\
             2. TOML config: tts_key = \"your-key\"",
        )
    }

    pub fn resolve_prediction_token(&self) -> Result<String> {
        config::resolve_api_key(
            "VOXSET_PREDICTION_TOKEN",
            self.prediction_token.as_deref(),
            "Please configure using one of:\n\
             1. Environment: VOXSET_PREDICTION_TOKEN=your-token-here\n\
             2. TOML config: prediction_token = \"your-token\"",
        )
    }

    pub fn resolve_clone_key(&self) -> Result<String> {
        config::resolve_api_key(
            "VOXSET_CLONE_KEY",
            self.clone_key.as_deref(),
            "Please configure using one of:\n\
             1. Environment: VOXSET_CLONE_KEY=your-key-here\n\
             2. TOML config: clone_key = \"your-key\"",
        )
    }
}
