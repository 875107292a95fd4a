//! voxset-seg - Recorded-audio segmentation and post-processing
//!
//! Turns long command recordings into labeled per-keyword clips:
//! silence-based chunking, cloud ASR transcription, volume and speech-rate
//! classification, and a deterministic output naming scheme. Also carries
//! the smaller maintenance passes over clip trees (fixed-length splitting,
//! resampling, format conversion, inventory, renaming, pruning).

pub mod analyzer;
pub mod config;
pub mod ops;
pub mod pipeline;
pub mod scanner;
pub mod services;
pub mod splitter;

pub use config::SegmentationConfig;
pub use pipeline::{BatchReport, SegmentationPipeline};
