//! Filesystem helpers shared by the batch tools

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Return a path that does not collide with an existing file
///
/// Appends `_1`, `_2`, ... before the extension until the name is unused.
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1usize;
    loop {
        let candidate = parent.join(format!("{}_{}{}", stem, counter, ext));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Create a directory and all parents if missing
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Mirror a file's position under `src_root` into `dest_root`
///
/// `/in/a/b/x.wav` with roots `/in` -> `/out` maps to `/out/a/b/x.wav`.
pub fn relative_mirror(src_root: &Path, file: &Path, dest_root: &Path) -> Result<PathBuf> {
    let rel = file.strip_prefix(src_root).map_err(|_| {
        Error::InvalidInput(format!(
            "{} is not under {}",
            file.display(),
            src_root.display()
        ))
    })?;
    Ok(dest_root.join(rel))
}
