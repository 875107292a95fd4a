//! # voxset Common Library
//!
//! Shared code for the voxset dataset tools including:
//! - Error types
//! - Configuration loading and key resolution
//! - Audio decode/resample/WAV plumbing and level math
//! - Command keyword table and matching
//! - Speaker attribute parsing
//! - Filesystem helpers

pub mod audio;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod keywords;
pub mod speaker;

pub use error::{Error, Result};
pub use keywords::KeywordTable;
pub use speaker::SpeakerAttrs;
