//! Enumeration of candidate caption files.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("directory not found: {0}")]
    Missing(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Collect `.txt` caption files under `dir`, sorted for deterministic order.
///
/// Shallow by default; `recursive` descends into subdirectories. A missing
/// or non-directory path is fatal for the run.
pub fn collect_caption_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, WalkError> {
    if !dir.exists() {
        return Err(WalkError::Missing(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(WalkError::NotADirectory(dir.to_path_buf()));
    }

    let walker = if recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("txt")
        {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}
