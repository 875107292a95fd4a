//! Segment duration policy
//!
//! The silence splitter (voxset-common) produces raw voiced chunks; this
//! module applies the dataset's duration rules: clips must be long enough to
//! hold a command and short enough to hold only one.

use voxset_common::audio::ms_to_samples;

pub use voxset_common::audio::silence::{SilenceSplitter, SplitError};

/// Apply segment-duration policy to raw chunks
///
/// Chunks shorter than `min_segment_ms` are dropped; chunks longer than
/// `max_segment_ms` are cut into equal parts, the part count chosen so each
/// part fits under the maximum.
pub fn enforce_duration_policy(
    chunks: Vec<Vec<f32>>,
    sample_rate: u32,
    min_segment_ms: u64,
    max_segment_ms: u64,
) -> Vec<Vec<f32>> {
    let min_samples = ms_to_samples(min_segment_ms, sample_rate);
    let max_samples = ms_to_samples(max_segment_ms, sample_rate);

    let mut processed = Vec::new();

    for (i, chunk) in chunks.into_iter().enumerate() {
        if chunk.len() < min_samples {
            tracing::debug!(
                chunk = i + 1,
                samples = chunk.len(),
                "Chunk below minimum duration, dropped"
            );
            continue;
        }

        if chunk.len() > max_samples {
            tracing::debug!(
                chunk = i + 1,
                samples = chunk.len(),
                "Chunk above maximum duration, re-splitting"
            );
            processed.extend(split_long_chunk(&chunk, max_samples));
        } else {
            processed.push(chunk);
        }
    }

    processed
}

/// Cut an over-long chunk into equal parts each fitting under `max_samples`
fn split_long_chunk(chunk: &[f32], max_samples: usize) -> Vec<Vec<f32>> {
    let num_parts = (chunk.len() + max_samples - 1) / max_samples;
    let part_len = chunk.len() / num_parts;

    let mut parts = Vec::with_capacity(num_parts);
    for i in 0..num_parts {
        let start = i * part_len;
        let end = if i + 1 == num_parts {
            chunk.len()
        } else {
            (i + 1) * part_len
        };
        parts.push(chunk[start..end].to_vec());
    }

    parts
}
