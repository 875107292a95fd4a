//! Metric-based renaming
//!
//! Rewrites generated clips into the dataset naming scheme
//! `{COUNTRY}_{CITY}_{GENDER}_{AGE}_{Label}_{dB}dB_{wps}wps.wav`, taking the
//! attribute prefix from the per-speaker folder name and measuring the
//! volume from the clip itself.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info, warn};
use voxset_common::audio::{dbfs, wav};
use voxset_common::fsutil;

/// Rename all WAVs in per-speaker folders under `root`
///
/// Folders whose name does not carry at least four `_`-separated attribute
/// parts are skipped. Returns the number of files renamed.
pub fn rename_with_metrics(root: &Path, label: &str) -> Result<usize> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let mut renamed = 0usize;

    for entry in std::fs::read_dir(root)?.filter_map(|e| e.ok()) {
        let folder = entry.path();
        if !folder.is_dir() {
            continue;
        }

        let folder_name = entry.file_name().to_string_lossy().to_string();
        let parts: Vec<&str> = folder_name.split('_').collect();
        if parts.len() < 4 {
            warn!(folder = %folder_name, "Folder name lacks attribute parts, skipped");
            continue;
        }
        let prefix = parts[..4].join("_");

        for file in std::fs::read_dir(&folder)?.filter_map(|e| e.ok()) {
            let path = file.path();
            if !path
                .extension()
                .map(|e| e.eq_ignore_ascii_case("wav"))
                .unwrap_or(false)
            {
                continue;
            }

            match rename_one(&path, &folder, &prefix, label) {
                Ok(()) => renamed += 1,
                Err(e) => {
                    error!(file = %path.display(), "Rename failed: {:#}", e);
                }
            }
        }
    }

    info!("Metric renaming complete: {} files", renamed);
    Ok(renamed)
}

fn rename_one(path: &Path, folder: &Path, prefix: &str, label: &str) -> Result<()> {
    let (volume_db, wps) = measure(path)
        .with_context(|| format!("Measuring {}", path.display()))?;

    let new_name = format!("{}_{}_{:.1}dB_{:.1}wps.wav", prefix, label, volume_db, wps);
    let new_path = fsutil::unique_path(&folder.join(new_name));

    std::fs::rename(path, &new_path)?;
    info!(
        "Renamed: {} -> {}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        new_path.file_name().unwrap_or_default().to_string_lossy()
    );
    Ok(())
}

/// Measure clip volume and a speech-rate stand-in
///
/// No transcript exists at this stage, so words-per-second is estimated as
/// channel count over duration, a crude placeholder the naming scheme
/// tolerates until the segmentation pass measures it properly.
fn measure(path: &Path) -> Result<(f32, f32)> {
    let reader = hound::WavReader::open(path)?;
    let channels = reader.spec().channels as f32;
    let duration_secs = reader.duration() as f32 / reader.spec().sample_rate as f32;
    drop(reader);

    let (samples, _) = wav::read_wav_mono(path)?;
    let volume_db = dbfs(&samples);
    let volume_db = if volume_db.is_finite() { volume_db } else { -99.9 };

    let wps = if duration_secs > 0.0 {
        channels / duration_secs
    } else {
        0.0
    };

    Ok((volume_db, wps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rename_uses_folder_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("USA_Dallas_Male_31_extra");
        std::fs::create_dir_all(&folder).unwrap();

        let samples: Vec<f32> = (0..16000)
            .map(|i| 0.2 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0).sin())
            .collect();
        wav::write_wav_mono16(&folder.join("text1.wav"), &samples, 16000).unwrap();

        let renamed = rename_with_metrics(temp_dir.path(), "LookAnd").unwrap();
        assert_eq!(renamed, 1);

        let names: Vec<String> = std::fs::read_dir(&folder)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names.len(), 1);
        let name = &names[0];
        assert!(name.starts_with("USA_Dallas_Male_31_LookAnd_"), "{name}");
        assert!(name.contains("dB_"), "{name}");
        assert!(name.ends_with("wps.wav"), "{name}");
    }

    #[test]
    fn test_malformed_folder_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("loose");
        std::fs::create_dir_all(&folder).unwrap();
        wav::write_wav_mono16(&folder.join("a.wav"), &vec![0.1f32; 1600], 16000).unwrap();

        let renamed = rename_with_metrics(temp_dir.path(), "LookAnd").unwrap();
        assert_eq!(renamed, 0);
        assert!(folder.join("a.wav").exists());
    }

    #[test]
    fn test_collision_gets_suffix() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("UK_London_Female_26");
        std::fs::create_dir_all(&folder).unwrap();

        // Identical clips measure identically and collide on the new name
        let samples = vec![0.2f32; 16000];
        wav::write_wav_mono16(&folder.join("text1.wav"), &samples, 16000).unwrap();
        wav::write_wav_mono16(&folder.join("text2.wav"), &samples, 16000).unwrap();

        let renamed = rename_with_metrics(temp_dir.path(), "HeyMemo").unwrap();
        assert_eq!(renamed, 2);

        let count = std::fs::read_dir(&folder).unwrap().count();
        assert_eq!(count, 2, "both files must survive the collision");
    }
}
