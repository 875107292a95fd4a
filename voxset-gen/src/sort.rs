//! Keyword-based corpus sorting
//!
//! Copies WAVs into per-keyword folders by matching the file name, its
//! parent folder name and an optional sidecar transcript. Unmatched clips
//! land in `Unknown/`; clips matching several keywords go into every
//! matched folder plus `Ambiguous/` for manual review.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use voxset_common::{fsutil, KeywordTable};
use walkdir::WalkDir;

const UNKNOWN_DIR: &str = "Unknown";
const AMBIGUOUS_DIR: &str = "Ambiguous";

/// Sorting outcome counters
#[derive(Debug, Default)]
pub struct SortSummary {
    pub total: usize,
    pub matched: usize,
    pub multi_matched: usize,
    pub unknown: usize,
}

/// Sort every WAV under `source_dir` into keyword folders under `output_root`
pub fn sort_tree(
    source_dir: &Path,
    output_root: &Path,
    keywords: &KeywordTable,
    use_sidecar_text: bool,
) -> Result<SortSummary> {
    info!("Sorting WAVs from {}", source_dir.display());

    fsutil::ensure_dir(output_root)?;
    fsutil::ensure_dir(&output_root.join(UNKNOWN_DIR))?;
    fsutil::ensure_dir(&output_root.join(AMBIGUOUS_DIR))?;

    let mut summary = SortSummary::default();

    for entry in WalkDir::new(source_dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("wav"))
            .unwrap_or(false)
        {
            continue;
        }

        summary.total += 1;

        let candidates = collect_candidates(path, use_sidecar_text);
        let hits = keywords.match_candidates(&candidates);

        match hits.len() {
            0 => {
                summary.unknown += 1;
                match copy_into(path, &output_root.join(UNKNOWN_DIR)) {
                    Ok(copied) => info!("No match -> Unknown: {}", copied.display()),
                    Err(e) => error!(file = %path.display(), "Copy failed: {:#}", e),
                }
            }
            1 => {
                summary.matched += 1;
                let dest = output_root.join(hits[0]);
                match copy_into(path, &dest) {
                    Ok(copied) => info!("Matched -> {}: {}", hits[0], copied.display()),
                    Err(e) => error!(file = %path.display(), "Copy failed: {:#}", e),
                }
            }
            _ => {
                summary.multi_matched += 1;
                for &keyword in &hits {
                    let dest = output_root.join(keyword);
                    match copy_into(path, &dest) {
                        Ok(copied) => {
                            info!("Multi-match {:?} -> {}: {}", hits, keyword, copied.display())
                        }
                        Err(e) => error!(file = %path.display(), "Copy failed: {:#}", e),
                    }
                }
                if let Err(e) = copy_into(path, &output_root.join(AMBIGUOUS_DIR)) {
                    error!(file = %path.display(), "Copy failed: {:#}", e);
                }
            }
        }
    }

    info!(
        "Sorting complete. total: {}, matched: {}, multi-matched: {}, unknown: {}",
        summary.total, summary.matched, summary.multi_matched, summary.unknown
    );
    info!("Results under {}", output_root.display());

    Ok(summary)
}

/// Candidate strings for matching: file stem, parent folder name and the
/// sidecar transcript when present
fn collect_candidates(path: &Path, use_sidecar_text: bool) -> Vec<String> {
    let mut candidates = Vec::new();

    if let Some(stem) = path.file_stem() {
        candidates.push(stem.to_string_lossy().to_string());
    }

    if let Some(parent_name) = path.parent().and_then(|p| p.file_name()) {
        candidates.push(parent_name.to_string_lossy().to_string());
    }

    if use_sidecar_text {
        let sidecar = path.with_extension("txt");
        if sidecar.is_file() {
            match std::fs::read_to_string(&sidecar) {
                Ok(content) if !content.is_empty() => candidates.push(content),
                Ok(_) => {}
                Err(e) => {
                    warn!(file = %sidecar.display(), "Sidecar read failed: {}", e);
                }
            }
        }
    }

    candidates
}

/// Copy a file into a folder, suffixing on name collisions
fn copy_into(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    fsutil::ensure_dir(dest_dir)?;
    let file_name = src
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("No file name: {}", src.display()))?;
    let dest = fsutil::unique_path(&dest_dir.join(file_name));
    std::fs::copy(src, &dest)?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table() -> KeywordTable {
        KeywordTable::default()
    }

    #[test]
    fn test_sort_by_filename() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        let output = temp_dir.path().join("out");
        std::fs::create_dir_all(&source).unwrap();

        std::fs::write(source.join("USA_Chicago_Male_42_TakeAPicture_var1.wav"), b"x").unwrap();
        std::fs::write(source.join("mystery_clip.wav"), b"x").unwrap();

        let summary = sort_tree(&source, &output, &table(), true).unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.unknown, 1);
        assert!(output
            .join("TakeAPicture/USA_Chicago_Male_42_TakeAPicture_var1.wav")
            .exists());
        assert!(output.join("Unknown/mystery_clip.wav").exists());
    }

    #[test]
    fn test_sort_by_parent_folder() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src/VolumeUp_set");
        let output = temp_dir.path().join("out");
        std::fs::create_dir_all(&source).unwrap();

        std::fs::write(source.join("clip001.wav"), b"x").unwrap();

        let summary = sort_tree(&temp_dir.path().join("src"), &output, &table(), true).unwrap();

        assert_eq!(summary.matched, 1);
        assert!(output.join("VolumeUp/clip001.wav").exists());
    }

    #[test]
    fn test_sort_by_sidecar_text() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        let output = temp_dir.path().join("out");
        std::fs::create_dir_all(&source).unwrap();

        std::fs::write(source.join("clip.wav"), b"x").unwrap();
        std::fs::write(source.join("clip.txt"), "stop recording").unwrap();

        let summary = sort_tree(&source, &output, &table(), true).unwrap();
        assert_eq!(summary.matched, 1);
        assert!(output.join("StopRecording/clip.wav").exists());

        // Without sidecar matching the same clip is unknown
        let output2 = temp_dir.path().join("out2");
        let summary = sort_tree(&source, &output2, &table(), false).unwrap();
        assert_eq!(summary.unknown, 1);
    }

    #[test]
    fn test_multi_match_goes_to_ambiguous_too() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        let output = temp_dir.path().join("out");
        std::fs::create_dir_all(&source).unwrap();

        std::fs::write(source.join("HeyMemo_then_VolumeUp.wav"), b"x").unwrap();

        let summary = sort_tree(&source, &output, &table(), true).unwrap();

        assert_eq!(summary.multi_matched, 1);
        assert!(output.join("HeyMemo/HeyMemo_then_VolumeUp.wav").exists());
        assert!(output.join("VolumeUp/HeyMemo_then_VolumeUp.wav").exists());
        assert!(output.join("Ambiguous/HeyMemo_then_VolumeUp.wav").exists());
    }

    #[test]
    fn test_collision_suffixing() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        let output = temp_dir.path().join("out");
        std::fs::create_dir_all(source.join("a")).unwrap();
        std::fs::create_dir_all(source.join("b")).unwrap();

        std::fs::write(source.join("a/Pause_var1.wav"), b"x").unwrap();
        std::fs::write(source.join("b/Pause_var1.wav"), b"y").unwrap();

        let summary = sort_tree(&source, &output, &table(), true).unwrap();
        assert_eq!(summary.matched, 2);
        assert!(output.join("Pause/Pause_var1.wav").exists());
        assert!(output.join("Pause/Pause_var1_1.wav").exists());
    }
}
