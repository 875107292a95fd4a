//! Plan-driven prediction fetch
//!
//! Runs every scripted text through the prediction-serving TTS for every
//! speaker in the plan CSV, downloading outputs to
//! `{out}/{identifier}/text{N}.wav`. Worker fan-out is bounded; each item's
//! failure is captured without stopping the batch.

use crate::plan::PlanRow;
use crate::profiles::SCRIPTED_TEXTS;
use crate::services::{PredictionClient, PredictionRequest};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};
use voxset_common::fsutil;

/// Batch outcome
#[derive(Debug, Default)]
pub struct FetchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Fetch all plan-row x scripted-text combinations
pub async fn run_batch(
    client: Arc<PredictionClient>,
    plan: &[PlanRow],
    out_dir: &Path,
    workers: usize,
) -> Result<FetchSummary> {
    fsutil::ensure_dir(out_dir)?;

    info!(
        "Fetching {} predictions ({} speakers x {} texts, {} workers)",
        plan.len() * SCRIPTED_TEXTS.len(),
        plan.len(),
        SCRIPTED_TEXTS.len(),
        workers
    );

    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut tasks = JoinSet::new();

    for row in plan {
        let voice_dir = out_dir.join(&row.identifier);
        fsutil::ensure_dir(&voice_dir)?;

        for (text_idx, text) in SCRIPTED_TEXTS.iter().enumerate() {
            let client = Arc::clone(&client);
            let semaphore = Arc::clone(&semaphore);
            let output = voice_dir.join(format!("text{}.wav", text_idx + 1));
            let request = PredictionRequest {
                text: text.to_string(),
                voice: row.voice.clone(),
                top_p: row.top_p,
                temperature: row.temperature,
                repetition_penalty: row.repetition_penalty,
            };
            let identifier = row.identifier.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire().await.ok()?;

                info!(speaker = %identifier, text = text_idx + 1, "Generating");
                match client.generate(&request).await {
                    Ok(audio) => {
                        if let Err(e) = tokio::fs::write(&output, &audio).await {
                            error!(path = %output.display(), "Write failed: {}", e);
                            return None;
                        }
                        info!("Saved: {}", output.display());
                        Some(())
                    }
                    Err(e) => {
                        error!(
                            speaker = %identifier,
                            text = text_idx + 1,
                            "Generation failed: {}",
                            e
                        );
                        None
                    }
                }
            });
        }
    }

    let mut summary = FetchSummary::default();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Some(())) => summary.succeeded += 1,
            Ok(None) => summary.failed += 1,
            Err(e) => {
                summary.failed += 1;
                error!("Fetch task panicked: {}", e);
            }
        }
    }

    info!(
        "Fetch complete: {} succeeded, {} failed",
        summary.succeeded, summary.failed
    );

    Ok(summary)
}
