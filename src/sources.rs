//! Curated-tag and remove-pattern sources for one run.
//!
//! Both source files are shared by every caption file in a batch, so they are
//! loaded once up front and passed into per-file orchestration as a plain
//! value. Missing or unreadable sources degrade to empty lists with a
//! collected warning; only regex compilation failures abort the run.

use crate::config::Config;
use crate::pattern::{load_matchers, PatternError, RemoveMatcher};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Loaded inputs shared across a refine batch.
#[derive(Debug, Clone, Default)]
pub struct RefineSources {
    /// Compiled remove matchers, in pattern-file order.
    pub matchers: Vec<RemoveMatcher>,
    /// Curated tags to prepend, in add-file order (duplicates preserved).
    pub add_tags: Vec<String>,
}

/// Non-fatal problem while loading a source file.
#[derive(Debug)]
pub enum SourceWarning {
    AddFileMissing(PathBuf),
    AddFileUnreadable { path: PathBuf, source: std::io::Error },
    RemoveFileMissing(PathBuf),
    RemoveFileUnreadable { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for SourceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceWarning::AddFileMissing(path) => {
                write!(f, "add-tag file not found: {}", path.display())
            }
            SourceWarning::AddFileUnreadable { path, source } => {
                write!(f, "failed to read add-tag file {}: {}", path.display(), source)
            }
            SourceWarning::RemoveFileMissing(path) => {
                write!(f, "remove-pattern file not found: {}", path.display())
            }
            SourceWarning::RemoveFileUnreadable { path, source } => {
                write!(
                    f,
                    "failed to read remove-pattern file {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

/// Load curated tags to prepend, preserving file order.
///
/// Skips blank lines and `#` comments, strips trailing commas and
/// surrounding whitespace, and drops lines that end up empty.
pub fn load_add_tags(path: &Path) -> Result<Vec<String>, std::io::Error> {
    let contents = fs::read_to_string(path)?;

    let mut tags = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tag = line.trim_end_matches(',').trim();
        if !tag.is_empty() {
            tags.push(tag.to_string());
        }
    }

    Ok(tags)
}

impl RefineSources {
    /// Load both sources for a run.
    ///
    /// Returns the sources plus any degradation warnings. The only hard
    /// error is an invalid regex in the remove-pattern file.
    pub fn load(config: &Config) -> Result<(Self, Vec<SourceWarning>), PatternError> {
        let mut warnings = Vec::new();

        let matchers = if !config.tag_remove_file.exists() {
            warnings.push(SourceWarning::RemoveFileMissing(config.tag_remove_file.clone()));
            Vec::new()
        } else {
            match load_matchers(&config.tag_remove_file, config.regexp) {
                Ok(matchers) => matchers,
                Err(PatternError::Io { path, source }) => {
                    warnings.push(SourceWarning::RemoveFileUnreadable { path, source });
                    Vec::new()
                }
                Err(fatal @ PatternError::Regex { .. }) => return Err(fatal),
            }
        };

        let add_tags = if !config.tag_add_file.exists() {
            warnings.push(SourceWarning::AddFileMissing(config.tag_add_file.clone()));
            Vec::new()
        } else {
            match load_add_tags(&config.tag_add_file) {
                Ok(tags) => tags,
                Err(source) => {
                    warnings.push(SourceWarning::AddFileUnreadable {
                        path: config.tag_add_file.clone(),
                        source,
                    });
                    Vec::new()
                }
            }
        };

        Ok((Self { matchers, add_tags }, warnings))
    }
}
