//! Per-file refine orchestration.
//!
//! One file flows read → parse → transform → (diff | dry-run | no-op skip) →
//! backup → write. Failures are per-file: the caller reports them and moves
//! on to the next caption.

use crate::backup::{backup_path, create_backup, BackupMode};
use crate::config::Config;
use crate::diff::render_diff;
use crate::sources::RefineSources;
use crate::transform::{join_tags, parse_tags, transform, ShuffleConfig};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Outcome of refining one caption file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "RefineOutcome should be checked for write/skip"]
pub enum RefineOutcome {
    /// New content was written (after any backup).
    Written,
    /// On-disk content already matches the transformed content.
    SkippedNoChange,
    /// Dry-run mode: nothing written, no backup taken.
    SkippedDryRun,
}

/// Per-file report handed back to the caller for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub outcome: RefineOutcome,
    /// Rendered diff, present only when requested and the content changed.
    pub diff: Option<String>,
}

#[derive(Error, Debug)]
pub enum RefineError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to back up {path}: {source}")]
    Backup {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolve where to read tags from.
///
/// In read-from-backup mode an existing `.bak` sibling wins; the write
/// target stays the original path either way.
pub fn resolve_read_source(path: &Path, use_bak: bool) -> PathBuf {
    if use_bak {
        let backup = backup_path(path);
        if backup.exists() {
            return backup;
        }
    }
    path.to_path_buf()
}

/// Atomic file write: tempfile + fsync + rename.
fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        )
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

fn backup_mode(config: &Config) -> Option<BackupMode> {
    config.backup.then_some(config.backup_mode)
}

/// Refine one caption file.
///
/// `use_bak` reads from an existing `.bak` sibling instead of the target.
/// The no-op check compares against the write target's *current* content,
/// so repeated runs neither rewrite the file nor take redundant backups.
pub fn refine_file(
    path: &Path,
    sources: &RefineSources,
    config: &Config,
    use_bak: bool,
) -> Result<FileReport, RefineError> {
    let source_path = resolve_read_source(path, use_bak);

    let content = fs::read_to_string(&source_path)
        .map_err(|source| RefineError::Read {
            path: source_path.clone(),
            source,
        })?
        .trim()
        .to_string();

    let tags = parse_tags(&content);
    let shuffle = ShuffleConfig {
        enabled: config.shuffle,
        keep_first: config.shuffle_keep_first,
    };
    let new_tags = transform(&tags, &sources.matchers, &sources.add_tags, shuffle);
    let new_content = join_tags(&new_tags);

    let diff = if config.diff {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let rendered = render_diff(&content, &new_content, &name);
        (!rendered.is_empty()).then_some(rendered)
    } else {
        None
    };

    if config.dry_run {
        return Ok(FileReport {
            outcome: RefineOutcome::SkippedDryRun,
            diff,
        });
    }

    // Idempotence check against the write target, not the read source. An
    // unreadable target falls through to the write path.
    if let Ok(current) = fs::read_to_string(path) {
        if current.trim() == new_content {
            return Ok(FileReport {
                outcome: RefineOutcome::SkippedNoChange,
                diff,
            });
        }
    }

    if let Some(mode) = backup_mode(config) {
        create_backup(path, mode).map_err(|source| RefineError::Backup {
            path: path.to_path_buf(),
            source,
        })?;
    }

    atomic_write(path, &format!("{new_content}\n")).map_err(|source| RefineError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(FileReport {
        outcome: RefineOutcome::Written,
        diff,
    })
}
