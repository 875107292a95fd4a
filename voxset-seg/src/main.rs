//! voxset-seg - Recorded-audio segmentation and post-processing CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxset_seg::ops;
use voxset_seg::services::SpeechApiClient;
use voxset_seg::{SegmentationConfig, SegmentationPipeline};

/// Command-line arguments for voxset-seg
#[derive(Parser, Debug)]
#[command(name = "voxset-seg")]
#[command(about = "Segment and label voice-command recordings")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Silence-split recordings, transcribe and label each clip
    Segment {
        /// Folder of input recordings
        #[arg(short, long)]
        input: PathBuf,

        /// Folder for labeled clips
        #[arg(short, long)]
        output: PathBuf,

        /// First speaker number (SPK folders count up from here)
        #[arg(long, default_value = "1")]
        spk_start: usize,

        /// Segmentation config TOML (defaults used when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Cut WAVs into fixed-length clips, mirroring the tree layout
    Split {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Clip duration in seconds
        #[arg(long, default_value = "1.6")]
        clip_secs: f64,

        /// Output sample rate in Hz
        #[arg(long, default_value = "16000")]
        rate: u32,
    },

    /// Resample all WAVs in a folder
    Resample {
        #[arg(short, long)]
        input: PathBuf,

        /// Output folder (default: resampled_{rate}Hz beside the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target sample rate in Hz
        #[arg(long, default_value = "16000")]
        rate: u32,
    },

    /// Convert doubled-extension recordings (.wav.mp3/.wav.m4a) via ffmpeg
    Convert {
        /// A file or a folder to sweep
        #[arg(short, long)]
        path: PathBuf,

        /// Output sample rate in Hz
        #[arg(long, default_value = "16000")]
        rate: u32,
    },

    /// Write a CSV inventory of the WAVs in a folder
    Info {
        #[arg(short, long)]
        dir: PathBuf,

        /// Output CSV path (default: wav_files_analysis.csv in the folder)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Rewrite file names with literal OLD=NEW substitutions
    Rename {
        #[arg(short, long)]
        dir: PathBuf,

        /// Substitution rules, e.g. --replace "Pause Music=PauseMusic"
        #[arg(short, long = "replace", required = true)]
        replacements: Vec<String>,

        /// Only touch files with these extensions, e.g. --ext .wav
        #[arg(long = "ext")]
        extensions: Vec<String>,
    },

    /// Delete clips whose name contains "Unknown" (dry-run by default)
    PruneUnknown {
        #[arg(short, long)]
        dir: PathBuf,

        /// Actually delete instead of previewing
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxset_seg=info,voxset_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match args.command {
        Command::Segment {
            input,
            output,
            spk_start,
            config,
        } => {
            let config_path =
                voxset_common::config::resolve_config_file(config.as_deref(), "seg.toml");
            let config = SegmentationConfig::load(config_path.as_deref())?;
            info!(
                "Segmenting {} -> {} (speech service: {})",
                input.display(),
                output.display(),
                config.speech_region
            );

            let key = config.resolve_speech_key()?;
            let transcriber = SpeechApiClient::new(
                key,
                &config.speech_region,
                &config.speech_language,
            )
            .context("Creating speech client")?;

            let pipeline = SegmentationPipeline::new(config, Arc::new(transcriber))?;
            pipeline.process_batch(&input, &output, spk_start).await?;
        }

        Command::Split {
            input,
            output,
            clip_secs,
            rate,
        } => {
            ops::split::split_tree(&input, &output, clip_secs, rate)?;
        }

        Command::Resample { input, output, rate } => {
            ops::resample::resample_folder(&input, output.as_deref(), rate)?;
        }

        Command::Convert { path, rate } => {
            if path.is_dir() {
                ops::convert::convert_folder(&path, rate)?;
            } else {
                let output = ops::convert::convert_file(&path, rate)?;
                info!("Converted: {}", output.display());
            }
        }

        Command::Info { dir, out } => {
            let rows = ops::info::analyze_folder(&dir)?;
            let out_path = out.unwrap_or_else(|| dir.join("wav_files_analysis.csv"));
            ops::info::write_csv(&rows, &out_path)?;
        }

        Command::Rename {
            dir,
            replacements,
            extensions,
        } => {
            let rules = replacements
                .iter()
                .map(|r| ops::rename::Replacement::parse(r))
                .collect::<Result<Vec<_>>>()?;
            ops::rename::rename_tree(&dir, &rules, &extensions)?;
        }

        Command::PruneUnknown { dir, force } => {
            let report = ops::prune::prune_unknown(&dir, !force)?;
            if report.dry_run && !report.matched.is_empty() {
                info!("Preview only; re-run with --force to delete");
            }
        }
    }

    Ok(())
}
