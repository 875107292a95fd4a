//! WAV inventory reports

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// One row of the inventory CSV
#[derive(Debug, Clone, Serialize)]
pub struct WavInfo {
    pub file_name: String,
    pub path: String,
    pub sample_rate: u32,
    pub duration_seconds: f64,
    pub channels: u16,
    pub sample_count: u32,
    pub bits_per_sample: u16,
}

/// Collect header info for every WAV in a folder (non-recursive)
///
/// Unreadable files are logged and skipped.
pub fn analyze_folder(dir: &Path) -> Result<Vec<WavInfo>> {
    let mut rows = Vec::new();

    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Reading {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("wav"))
                    .unwrap_or(false)
        })
        .collect();
    entries.sort();

    for path in entries {
        match wav_info(&path) {
            Ok(row) => rows.push(row),
            Err(e) => {
                error!(file = %path.display(), "Info read failed: {:#}", e);
            }
        }
    }

    Ok(rows)
}

/// Read the header of one WAV file
pub fn wav_info(path: &Path) -> Result<WavInfo> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Opening {}", path.display()))?;
    let spec = reader.spec();
    let sample_count = reader.duration(); // per-channel sample count

    Ok(WavInfo {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        path: path.to_string_lossy().to_string(),
        sample_rate: spec.sample_rate,
        duration_seconds: sample_count as f64 / spec.sample_rate as f64,
        channels: spec.channels,
        sample_count,
        bits_per_sample: spec.bits_per_sample,
    })
}

/// Write inventory rows as CSV
pub fn write_csv(rows: &[WavInfo], out_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(out_path)
        .with_context(|| format!("Creating {}", out_path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Inventory saved: {} rows -> {}", rows.len(), out_path.display());
    Ok(())
}
