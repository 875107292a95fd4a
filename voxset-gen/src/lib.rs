//! voxset-gen - Synthetic voice-command dataset generation
//!
//! Builds training corpora for a voice-command recognizer: samples a
//! speaker population, composes voice-characteristic prompts, drives cloud
//! TTS and voice-cloning services to render command phrases with varied
//! speaker/accent/rate/volume attributes, and post-processes the results
//! (noise augmentation, half-word negatives, metric renaming, keyword
//! sorting).

pub mod augment;
pub mod config;
pub mod dialogue;
pub mod fetch;
pub mod halves;
pub mod plan;
pub mod profiles;
pub mod prompts;
pub mod rename;
pub mod services;
pub mod sort;
pub mod speakers;
pub mod synth;

pub use config::GenConfig;
