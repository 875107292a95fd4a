//! Batch variation synthesis
//!
//! Renders every command phrase with every voice profile at every rate
//! class, N variants each. Variants differ by small seeded rate/volume
//! offsets so reruns reproduce the same corpus. Concurrency toward the TTS
//! service is bounded by a semaphore; a failed request gets one fixed-delay
//! retry, then the item is logged and skipped.

use crate::profiles::{RateClass, VoiceProfile, INSTRUCTIONS, VOICE_PROFILES};
use crate::services::{NeuralTtsClient, SynthesisRequest};
use anyhow::Result;
use rand::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use voxset_common::fsutil;

/// Delay before the single retry
const RETRY_DELAY_SECS: u64 = 2;

/// Batch outcome
#[derive(Debug, Default)]
pub struct SynthSummary {
    pub generated: usize,
    pub failed: usize,
}

/// One synthesis work item
#[derive(Debug, Clone)]
struct SynthJob {
    profile: VoiceProfile,
    rate_class: RateClass,
    instruction: &'static str,
    variant_id: u32,
}

impl SynthJob {
    /// Per-variant parameter variation, seeded so reruns reproduce
    fn build_request(&self) -> SynthesisRequest {
        let seed = self.profile.age as u64
            + self.variant_id as u64
            + self.instruction.len() as u64;
        let mut rng = StdRng::seed_from_u64(seed);

        let mut request = SynthesisRequest::new(self.instruction, self.profile.voice);

        request = match self.rate_class {
            // Normal keeps the service default rate
            RateClass::Normal => request,
            RateClass::Fast => request.with_rate_percent(rng.gen_range(5..=15)),
            RateClass::Slow => request.with_rate_percent(-rng.gen_range(5..=15)),
        };

        request.with_volume_percent(rng.gen_range(0..=5))
    }

    /// Output path: `{prefix}_{RateClass}/{prefix}_{Phrase}_var{N}.wav`
    fn output_path(&self, out_dir: &Path) -> PathBuf {
        let prefix = self.profile.prefix();
        let folder = format!("{}_{}", prefix, self.rate_class.name());
        let phrase = self.instruction.replace(", ", "");
        out_dir
            .join(folder)
            .join(format!("{}_{}_var{}.wav", prefix, phrase, self.variant_id))
    }
}

/// Render the full profile x rate x phrase x variant grid
pub async fn run_batch(
    client: Arc<NeuralTtsClient>,
    out_dir: &Path,
    variants_per_combo: u32,
    concurrency: usize,
) -> Result<SynthSummary> {
    fsutil::ensure_dir(out_dir)?;

    let mut jobs = Vec::new();
    for profile in VOICE_PROFILES {
        for rate_class in RateClass::all() {
            for &instruction in INSTRUCTIONS {
                for variant_id in 1..=variants_per_combo {
                    jobs.push(SynthJob {
                        profile: *profile,
                        rate_class,
                        instruction,
                        variant_id,
                    });
                }
            }
        }
    }

    info!(
        "Synthesizing {} clips ({} voices x {} rates x {} phrases x {} variants, concurrency {})",
        jobs.len(),
        VOICE_PROFILES.len(),
        RateClass::all().len(),
        INSTRUCTIONS.len(),
        variants_per_combo,
        concurrency
    );

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for job in jobs {
        let client = Arc::clone(&client);
        let semaphore = Arc::clone(&semaphore);
        let out_dir = out_dir.to_path_buf();

        tasks.spawn(async move {
            let _permit = semaphore.acquire().await.ok()?;
            match synthesize_one(&client, &job, &out_dir).await {
                Ok(path) => Some(path),
                Err(e) => {
                    error!(
                        voice = job.profile.voice,
                        phrase = job.instruction,
                        variant = job.variant_id,
                        "Synthesis failed after retry: {}",
                        e
                    );
                    None
                }
            }
        });
    }

    let mut summary = SynthSummary::default();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Some(path)) => {
                summary.generated += 1;
                info!("Generated: {}", path.display());
            }
            Ok(None) => summary.failed += 1,
            Err(e) => {
                summary.failed += 1;
                error!("Synthesis task panicked: {}", e);
            }
        }
    }

    info!(
        "Synthesis complete: {} generated, {} failed",
        summary.generated, summary.failed
    );

    Ok(summary)
}

/// Synthesize one clip with a single fixed-delay retry
async fn synthesize_one(
    client: &NeuralTtsClient,
    job: &SynthJob,
    out_dir: &Path,
) -> Result<PathBuf> {
    let request = job.build_request();
    let path = job.output_path(out_dir);
    if let Some(parent) = path.parent() {
        fsutil::ensure_dir(parent)?;
    }

    let audio = match client.synthesize(&request).await {
        Ok(audio) => audio,
        Err(e) => {
            warn!(
                voice = job.profile.voice,
                variant = job.variant_id,
                "Synthesis failed, retrying in {}s: {}",
                RETRY_DELAY_SECS,
                e
            );
            tokio::time::sleep(std::time::Duration::from_secs(RETRY_DELAY_SECS)).await;
            client.synthesize(&request).await?
        }
    };

    tokio::fs::write(&path, &audio).await?;
    Ok(path)
}
