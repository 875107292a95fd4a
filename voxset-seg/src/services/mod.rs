//! External service clients

pub mod transcriber;

pub use transcriber::{SpeechApiClient, TranscribeError, Transcriber};
