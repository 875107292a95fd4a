//! Batch filename rewriting
//!
//! Applies ordered literal substitutions to file names across a tree,
//! keeping results unique with `_N` suffixes.

use anyhow::Result;
use std::path::Path;
use tracing::{error, info};
use voxset_common::fsutil;
use walkdir::WalkDir;

/// One literal substitution rule
#[derive(Debug, Clone)]
pub struct Replacement {
    pub old: String,
    pub new: String,
}

impl Replacement {
    /// Parse an `OLD=NEW` argument
    pub fn parse(arg: &str) -> Result<Self> {
        let (old, new) = arg
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Replacement must be OLD=NEW, got: {arg}"))?;
        if old.is_empty() {
            anyhow::bail!("Replacement OLD part must not be empty: {arg}");
        }
        Ok(Self {
            old: old.to_string(),
            new: new.to_string(),
        })
    }
}

/// Apply replacements to all matching files under `root`
///
/// `extensions` filters which files are considered (empty = all files).
/// Returns the number of files renamed.
pub fn rename_tree(root: &Path, replacements: &[Replacement], extensions: &[String]) -> Result<usize> {
    if !root.exists() {
        anyhow::bail!("Directory does not exist: {}", root.display());
    }

    info!("Renaming under {} with {} rules", root.display(), replacements.len());

    let mut renamed = 0usize;

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().to_string();

        if !extensions.is_empty() {
            let lower = file_name.to_lowercase();
            if !extensions.iter().any(|ext| lower.ends_with(&ext.to_lowercase())) {
                continue;
            }
        }

        let mut new_name = file_name.clone();
        for rule in replacements {
            new_name = new_name.replace(&rule.old, &rule.new);
        }

        if new_name == file_name {
            continue;
        }

        let new_path = fsutil::unique_path(&path.with_file_name(&new_name));
        match std::fs::rename(path, &new_path) {
            Ok(()) => {
                info!(
                    "Renamed: {} -> {}",
                    file_name,
                    new_path.file_name().unwrap_or_default().to_string_lossy()
                );
                renamed += 1;
            }
            Err(e) => {
                error!(file = %path.display(), "Rename failed: {}", e);
            }
        }
    }

    info!("Renaming finished: {} files renamed", renamed);
    Ok(renamed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_replacement() {
        let rule = Replacement::parse("Pause Music=PauseMusic").unwrap();
        assert_eq!(rule.old, "Pause Music");
        assert_eq!(rule.new, "PauseMusic");

        assert!(Replacement::parse("no-separator").is_err());
        assert!(Replacement::parse("=x").is_err());
    }

    #[test]
    fn test_parse_strip_rule() {
        // Empty NEW removes the word
        let rule = Replacement::parse("temp=").unwrap();
        assert_eq!(rule.new, "");
    }

    #[test]
    fn test_rename_tree_applies_rules() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("Play Music_1.wav"), b"x").unwrap();
        std::fs::write(temp_dir.path().join("keep.wav"), b"x").unwrap();
        std::fs::write(temp_dir.path().join("Play Music.txt"), b"x").unwrap();

        let rules = vec![Replacement::parse("Play Music=PlayMusic").unwrap()];
        let renamed = rename_tree(temp_dir.path(), &rules, &[".wav".to_string()]).unwrap();

        assert_eq!(renamed, 1);
        assert!(temp_dir.path().join("PlayMusic_1.wav").exists());
        assert!(temp_dir.path().join("keep.wav").exists());
        // Extension filter left the .txt untouched
        assert!(temp_dir.path().join("Play Music.txt").exists());
    }

    #[test]
    fn test_rename_collision_gets_suffix() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a old.wav"), b"x").unwrap();
        std::fs::write(temp_dir.path().join("a.wav"), b"x").unwrap();

        let rules = vec![Replacement::parse(" old=").unwrap()];
        let renamed = rename_tree(temp_dir.path(), &rules, &[]).unwrap();

        assert_eq!(renamed, 1);
        assert!(temp_dir.path().join("a.wav").exists());
        assert!(temp_dir.path().join("a_1.wav").exists());
    }

    #[test]
    fn test_rename_missing_root() {
        let rules = vec![Replacement::parse("a=b").unwrap()];
        assert!(rename_tree(Path::new("/nonexistent"), &rules, &[]).is_err());
    }
}
