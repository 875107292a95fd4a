//! voxset-gen - Synthetic voice-command dataset generation CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxset_common::KeywordTable;
use voxset_gen::services::{voice_clone, NeuralTtsClient, PredictionClient, VoiceCloneClient};
use voxset_gen::{augment, dialogue, fetch, halves, plan, prompts, rename, sort, speakers, synth};
use voxset_gen::GenConfig;

/// Command-line arguments for voxset-gen
#[derive(Parser, Debug)]
#[command(name = "voxset-gen")]
#[command(about = "Generate synthetic voice-command datasets")]
#[command(version)]
struct Args {
    /// Service config TOML (defaults used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample a speaker population to CSV
    Speakers {
        #[arg(long, default_value = "300")]
        count: usize,

        #[arg(short, long, default_value = "speakers.csv")]
        out: PathBuf,

        /// Fixed RNG seed for a reproducible population
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Compose voice-characteristic prompts from a speaker CSV
    Prompts {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value = "prompts.csv")]
        out: PathBuf,

        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Extend a speaker CSV with voices and sampling parameters
    Plan {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value = "plan.csv")]
        out: PathBuf,

        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Render the phrase grid through the neural TTS service
    Synth {
        #[arg(short, long)]
        out: PathBuf,

        /// Variants per voice/rate/phrase combination
        #[arg(long, default_value = "30")]
        variants: u32,

        /// Concurrent requests toward the service
        #[arg(long, default_value = "2")]
        concurrency: usize,
    },

    /// Render the built-in two-voice conversation
    Dialogue {
        #[arg(short, long)]
        out: PathBuf,

        /// Pause between lines in milliseconds
        #[arg(long, default_value = "700")]
        pause_ms: u64,
    },

    /// Voice-cloning service operations
    Clone {
        #[command(subcommand)]
        action: CloneAction,
    },

    /// Run plan rows through the prediction-serving TTS
    Fetch {
        /// Plan CSV from the `plan` subcommand
        #[arg(short, long)]
        plan: PathBuf,

        #[arg(short, long)]
        out: PathBuf,

        #[arg(long, default_value = "3")]
        workers: usize,
    },

    /// Mix padded clips with noise at random SNRs
    Augment {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        out: PathBuf,

        #[arg(long)]
        noise_dir: PathBuf,

        /// Variants per source clip
        #[arg(long, default_value = "10")]
        count: u32,

        #[arg(long, default_value = "-12", allow_hyphen_values = true)]
        snr_min: f32,

        #[arg(long, default_value = "18")]
        snr_max: f32,

        /// Total output duration in seconds
        #[arg(long, default_value = "1.6")]
        duration: f32,

        #[arg(long, default_value = "16000")]
        rate: u32,
    },

    /// Build half-word negative samples
    Halves {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        out: PathBuf,

        #[arg(long, default_value = "1.6")]
        duration: f64,

        #[arg(long, default_value = "16000")]
        rate: u32,
    },

    /// Rename per-speaker folders of clips with measured metrics
    RenameMetrics {
        #[arg(short, long)]
        dir: PathBuf,

        /// Keyword label to embed in the new names
        #[arg(short, long)]
        label: String,
    },

    /// Sort WAVs into per-keyword folders
    Sort {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        out: PathBuf,

        /// Ignore sidecar .txt transcripts when matching
        #[arg(long)]
        no_sidecar: bool,
    },
}

#[derive(Subcommand, Debug)]
enum CloneAction {
    /// Enroll reference recordings from a folder or a name,file CSV
    Enroll {
        /// Folder of reference recordings
        #[arg(long, conflicts_with = "input")]
        audio_dir: Option<PathBuf>,

        /// CSV with name,file_path (or name,url) columns
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Enrollment prefix
        #[arg(long, default_value = "batch")]
        prefix: String,

        /// Where clone_results.csv and audition clips land
        #[arg(short, long, default_value = "voice_outputs")]
        out: PathBuf,

        /// Audition sentence synthesized with each new voice
        #[arg(
            long,
            default_value = "Hey Memo, take a picture of this and then volume up. Play the next music and then stop recording."
        )]
        test_text: String,
    },

    /// List enrolled voices
    List {
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Synthesize an audition clip per voice in a clone_results.csv
    Audition {
        /// name,voice_id CSV from a previous enrollment
        #[arg(short, long)]
        results: PathBuf,

        #[arg(short, long, default_value = "voice_outputs")]
        out: PathBuf,

        #[arg(
            long,
            default_value = "Hey Memo, take a picture of this and then volume up. Play the next music and then stop recording."
        )]
        test_text: String,
    },

    /// Delete enrolled voices by id
    Remove {
        #[arg(required = true)]
        voice_ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxset_gen=info,voxset_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config_path =
        voxset_common::config::resolve_config_file(args.config.as_deref(), "gen.toml");
    let config = GenConfig::load(config_path.as_deref())?;

    match args.command {
        Command::Speakers { count, out, seed } => {
            let rows = speakers::sample_population(count, seed);
            speakers::write_csv(&rows, &out)?;
            speakers::log_distribution(&rows);
        }

        Command::Prompts { input, out, seed } => {
            let rows = speakers::read_csv(&input)?;
            let prompts = prompts::compose_prompts(&rows, seed);
            prompts::write_csv(&prompts, &out)?;
        }

        Command::Plan { input, out, seed } => {
            let rows = speakers::read_csv(&input)?;
            let plan = plan::build_plan(&rows, seed);
            plan::write_csv(&plan, &out)?;
            plan::log_plan_summary(&plan);
        }

        Command::Synth {
            out,
            variants,
            concurrency,
        } => {
            let key = config.resolve_tts_key()?;
            let client = NeuralTtsClient::new(key, config.tts_endpoint.clone())
                .context("Creating TTS client")?;
            synth::run_batch(Arc::new(client), &out, variants, concurrency).await?;
        }

        Command::Dialogue { out, pause_ms } => {
            let key = config.resolve_tts_key()?;
            let client = NeuralTtsClient::new(key, config.tts_endpoint.clone())
                .context("Creating TTS client")?;
            dialogue::render_conversation(Arc::new(client), &out, pause_ms).await?;
        }

        Command::Clone { action } => {
            let key = config.resolve_clone_key()?;
            let client = VoiceCloneClient::new(
                key,
                config.clone_endpoint.clone(),
                config.clone_model.clone(),
            )
            .context("Creating voice clone client")?;
            run_clone_action(&client, action).await?;
        }

        Command::Fetch { plan: plan_path, out, workers } => {
            let token = config.resolve_prediction_token()?;
            let client = PredictionClient::new(
                token,
                config.prediction_endpoint.clone(),
                config.prediction_model.clone(),
            )
            .context("Creating prediction client")?;
            let rows = plan::read_csv(&plan_path)?;
            fetch::run_batch(Arc::new(client), &rows, &out, workers).await?;
        }

        Command::Augment {
            input,
            out,
            noise_dir,
            count,
            snr_min,
            snr_max,
            duration,
            rate,
        } => {
            let augment_config = augment::AugmentConfig {
                count,
                snr_range: (snr_min, snr_max),
                total_duration_secs: duration,
                sample_rate: rate,
                ..Default::default()
            };
            augment::augment_tree(&input, &out, &noise_dir, &augment_config)?;
        }

        Command::Halves {
            input,
            out,
            duration,
            rate,
        } => {
            halves::process_tree(&input, &out, duration, rate)?;
        }

        Command::RenameMetrics { dir, label } => {
            rename::rename_with_metrics(&dir, &label)?;
        }

        Command::Sort {
            input,
            out,
            no_sidecar,
        } => {
            sort::sort_tree(&input, &out, &KeywordTable::default(), !no_sidecar)?;
        }
    }

    Ok(())
}

/// Dispatch voice-cloning operations
async fn run_clone_action(client: &VoiceCloneClient, action: CloneAction) -> Result<()> {
    match action {
        CloneAction::Enroll {
            audio_dir,
            input,
            prefix,
            out,
            test_text,
        } => {
            let references = match (audio_dir, input) {
                (Some(dir), _) => collect_references_from_dir(&dir)?,
                (None, Some(csv)) => collect_references_from_csv(&csv)?,
                (None, None) => {
                    anyhow::bail!("Provide --audio-dir or --input for enrollment")
                }
            };

            if references.is_empty() {
                anyhow::bail!("No reference recordings found");
            }
            info!("Enrolling {} reference recordings", references.len());

            voxset_common::fsutil::ensure_dir(&out)?;
            let mut results: Vec<(String, String)> = Vec::new();

            for (i, (name, location)) in references.iter().enumerate() {
                info!("[{}/{}] Enrolling: {}", i + 1, references.len(), name);

                let item_prefix = voice_clone::sanitize_prefix(&format!("{}-{}", prefix, name));

                let url = if std::path::Path::new(location).exists() {
                    voice_clone::file_to_data_uri(std::path::Path::new(location))?
                } else {
                    location.clone()
                };

                match client.create_voice(&item_prefix, &url).await {
                    Ok(voice_id) => results.push((name.clone(), voice_id)),
                    Err(e) => tracing::error!(name = %name, "Enrollment failed: {}", e),
                }

                // Space out requests to stay under the service rate limit
                if i + 1 < references.len() {
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }

            info!("Enrolled {}/{} voices", results.len(), references.len());

            // Persist name -> voice_id mapping
            let results_path = out.join("clone_results.csv");
            let mut writer = csv::Writer::from_path(&results_path)?;
            writer.write_record(["name", "voice_id"])?;
            for (name, voice_id) in &results {
                writer.write_record([name, voice_id])?;
            }
            writer.flush()?;
            info!("Results saved: {}", results_path.display());

            audition_voices(client, &results, &test_text, &out).await?;
        }

        CloneAction::List { prefix } => {
            let voices = client.list_all_voices(prefix.as_deref()).await?;
            info!("Found {} enrolled voices:", voices.len());
            for voice in voices {
                info!(
                    "  id: {}, created: {}, status: {}",
                    voice.voice_id,
                    voice.gmt_create.as_deref().unwrap_or("-"),
                    voice.status.as_deref().unwrap_or("-")
                );
            }
        }

        CloneAction::Audition {
            results,
            out,
            test_text,
        } => {
            let pairs = read_clone_results(&results)?;
            voxset_common::fsutil::ensure_dir(&out)?;
            audition_voices(client, &pairs, &test_text, &out).await?;
        }

        CloneAction::Remove { voice_ids } => {
            info!("Deleting {} voices", voice_ids.len());
            for (i, voice_id) in voice_ids.iter().enumerate() {
                match client.delete_voice(voice_id).await {
                    Ok(()) => info!("[{}/{}] Deleted {}", i + 1, voice_ids.len(), voice_id),
                    Err(e) => tracing::error!(voice_id = %voice_id, "Delete failed: {}", e),
                }
                if i + 1 < voice_ids.len() {
                    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
                }
            }
        }
    }

    Ok(())
}

/// Synthesize one audition clip per (name, voice_id) pair
async fn audition_voices(
    client: &VoiceCloneClient,
    pairs: &[(String, String)],
    test_text: &str,
    out: &std::path::Path,
) -> Result<()> {
    for (i, (name, voice_id)) in pairs.iter().enumerate() {
        info!("[{}/{}] Auditioning: {}", i + 1, pairs.len(), name);
        match client.synthesize(voice_id, test_text).await {
            Ok(audio) => {
                let path = out.join(format!("{}.mp3", name));
                std::fs::write(&path, &audio)?;
                info!("Audition saved: {}", path.display());
            }
            Err(e) => tracing::error!(name = %name, "Audition failed: {}", e),
        }
        if i + 1 < pairs.len() {
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        }
    }
    Ok(())
}

/// Load (name, voice_id) pairs from a clone_results.csv
fn read_clone_results(path: &std::path::Path) -> Result<Vec<(String, String)>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Reading {}", path.display()))?;

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record?;
        let name = record.get(0).unwrap_or_default().to_string();
        let voice_id = record.get(1).unwrap_or_default().to_string();
        if !name.is_empty() && !voice_id.is_empty() {
            pairs.push((name, voice_id));
        }
    }

    if pairs.is_empty() {
        anyhow::bail!("{} contains no voices", path.display());
    }
    Ok(pairs)
}

/// Reference recordings from a folder: name = file stem
fn collect_references_from_dir(dir: &std::path::Path) -> Result<Vec<(String, String)>> {
    const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a"];

    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let mut references = Vec::new();
    for entry in std::fs::read_dir(dir)?.filter_map(|e| e.ok()) {
        let path = entry.path();
        let is_audio = path
            .extension()
            .map(|e| AUDIO_EXTENSIONS.contains(&e.to_string_lossy().to_lowercase().as_str()))
            .unwrap_or(false);
        if !is_audio {
            continue;
        }
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        references.push((name, path.to_string_lossy().to_string()));
    }
    references.sort();
    Ok(references)
}

/// Reference recordings from a CSV with name and file_path/url columns
fn collect_references_from_csv(path: &std::path::Path) -> Result<Vec<(String, String)>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Reading {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let name_idx = headers.iter().position(|h| h == "name").unwrap_or(0);
    let file_idx = headers
        .iter()
        .position(|h| h == "file_path")
        .or_else(|| headers.iter().position(|h| h == "url"))
        .ok_or_else(|| anyhow::anyhow!("CSV needs a file_path or url column"))?;

    let mut references = Vec::new();
    for record in reader.records() {
        let record = record?;
        let name = record.get(name_idx).unwrap_or_default().to_string();
        let location = record.get(file_idx).unwrap_or_default().to_string();
        if !name.is_empty() && !location.is_empty() {
            references.push((name, location));
        }
    }
    Ok(references)
}
