//! Unknown-clip pruning
//!
//! Clips the pipeline could not label carry "Unknown" in their name. This
//! pass finds and deletes them. Dry-run is the default; deletion is
//! irreversible and requires `--force`.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use walkdir::WalkDir;

/// Extensions considered audio for pruning purposes
const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "flac", "aac"];

/// Pruning outcome
#[derive(Debug)]
pub struct PruneReport {
    /// Files matched (and deleted, unless dry-run)
    pub matched: Vec<PathBuf>,
    pub dry_run: bool,
}

/// Find (and optionally delete) audio files whose name contains `unknown`
///
/// Matching is case-insensitive. With `dry_run` the files are only listed.
pub fn prune_unknown(root: &Path, dry_run: bool) -> Result<PruneReport> {
    if !root.exists() {
        anyhow::bail!("Directory does not exist: {}", root.display());
    }

    info!(
        "Searching {} for Unknown clips ({})",
        root.display(),
        if dry_run { "preview, nothing deleted" } else { "delete mode" }
    );

    let mut matched = Vec::new();

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();

        let is_audio = path
            .extension()
            .map(|e| {
                let ext = e.to_string_lossy().to_lowercase();
                AUDIO_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false);
        if !is_audio {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !name.contains("unknown") {
            continue;
        }

        if dry_run {
            info!("[preview] would delete: {}", path.display());
        } else {
            match std::fs::remove_file(path) {
                Ok(()) => info!("Deleted: {}", path.display()),
                Err(e) => {
                    error!(file = %path.display(), "Delete failed: {}", e);
                    continue;
                }
            }
        }

        matched.push(path.to_path_buf());
    }

    info!("Prune finished: {} files matched", matched.len());
    if matched.len() <= 20 {
        for path in &matched {
            info!("  {}", path.display());
        }
    } else {
        info!("  ({} files, list elided)", matched.len());
    }

    Ok(PruneReport { matched, dry_run })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seed(dir: &Path) {
        std::fs::write(dir.join("SPK001_Unknown_-20.0dB_1.2wps.wav"), b"x").unwrap();
        std::fs::write(dir.join("SPK001_HeyMemo_-18.0dB_2.0wps.wav"), b"x").unwrap();
        std::fs::write(dir.join("unknown_notes.txt"), b"x").unwrap();
    }

    #[test]
    fn test_dry_run_deletes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        seed(temp_dir.path());

        let report = prune_unknown(temp_dir.path(), true).unwrap();
        assert_eq!(report.matched.len(), 1);
        assert!(temp_dir
            .path()
            .join("SPK001_Unknown_-20.0dB_1.2wps.wav")
            .exists());
    }

    #[test]
    fn test_force_deletes_matches_only() {
        let temp_dir = TempDir::new().unwrap();
        seed(temp_dir.path());

        let report = prune_unknown(temp_dir.path(), false).unwrap();
        assert_eq!(report.matched.len(), 1);
        assert!(!temp_dir
            .path()
            .join("SPK001_Unknown_-20.0dB_1.2wps.wav")
            .exists());
        assert!(temp_dir
            .path()
            .join("SPK001_HeyMemo_-18.0dB_2.0wps.wav")
            .exists());
        // Non-audio file untouched even though name matches
        assert!(temp_dir.path().join("unknown_notes.txt").exists());
    }
}
