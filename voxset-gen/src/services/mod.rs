//! External service clients

pub mod neural_tts;
pub mod prediction;
pub mod voice_clone;

pub use neural_tts::{NeuralTtsClient, SynthesisRequest, TtsError};
pub use prediction::{PredictionClient, PredictionError, PredictionRequest};
pub use voice_clone::{CloneError, VoiceCloneClient};
