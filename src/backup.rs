//! Pre-overwrite backup of caption files.
//!
//! Backups are plain siblings of the target: `<name>.txt.bak`, or
//! `<name>.txt.bak.N` in versioned mode. Copies are byte-for-byte via
//! `fs::copy`; metadata preservation is best-effort only.

use clap::ValueEnum;
use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Policy governing whether an existing backup is preserved or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackupMode {
    /// Create the backup only if none exists yet.
    #[default]
    Skip,
    /// Always replace the `.bak` sibling.
    Overwrite,
    /// Create the next unused `.bak.N`; existing versions are never touched.
    Versioned,
}

/// Append a suffix to the full file name, keeping the existing extension.
fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// The `.bak` sibling for a caption file.
pub fn backup_path(path: &Path) -> PathBuf {
    sibling_with_suffix(path, ".bak")
}

/// Copy `path` to its backup sibling according to `mode`.
///
/// Returns the backup path actually written, or `None` when skip mode found
/// an existing backup.
pub fn create_backup(path: &Path, mode: BackupMode) -> std::io::Result<Option<PathBuf>> {
    match mode {
        BackupMode::Skip => {
            let backup = backup_path(path);
            if backup.exists() {
                return Ok(None);
            }
            fs::copy(path, &backup)?;
            Ok(Some(backup))
        }
        BackupMode::Overwrite => {
            let backup = backup_path(path);
            fs::copy(path, &backup)?;
            Ok(Some(backup))
        }
        BackupMode::Versioned => {
            let mut version = 1usize;
            loop {
                let candidate = sibling_with_suffix(path, &format!(".bak.{version}"));
                if !candidate.exists() {
                    fs::copy(path, &candidate)?;
                    return Ok(Some(candidate));
                }
                version += 1;
            }
        }
    }
}
