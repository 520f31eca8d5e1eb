//! Run configuration: JSON config file plus CLI overrides.
//!
//! Precedence is CLI value > config file value > built-in default. The
//! `dry_run` and `diff` flags merge true-wins so a config file can force
//! them on while the CLI can only add to that.

use crate::backup::BackupMode;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub input_dir: PathBuf,
    pub recursive: bool,
    pub tag_add_file: PathBuf,
    pub tag_remove_file: PathBuf,
    /// Enable regex interpretation of remove-pattern lines.
    pub regexp: bool,
    pub shuffle: bool,
    /// Leading tags exempt from shuffle randomization.
    pub shuffle_keep_first: usize,
    pub backup: bool,
    pub backup_mode: BackupMode,
    pub dry_run: bool,
    pub diff: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./sample"),
            recursive: false,
            tag_add_file: PathBuf::from("tag_add.txt"),
            tag_remove_file: PathBuf::from("tag_remove.txt"),
            regexp: false,
            shuffle: true,
            shuffle_keep_first: 0,
            backup: true,
            backup_mode: BackupMode::Skip,
            dry_run: false,
            diff: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load a JSON config file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// CLI-provided values; `None` falls back to the base config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_dir: Option<PathBuf>,
    pub recursive: Option<bool>,
    pub tag_add_file: Option<PathBuf>,
    pub tag_remove_file: Option<PathBuf>,
    pub regexp: Option<bool>,
    pub shuffle: Option<bool>,
    pub shuffle_keep_first: Option<usize>,
    pub backup: Option<bool>,
    pub backup_mode: Option<BackupMode>,
    pub dry_run: bool,
    pub diff: bool,
}

impl Config {
    /// Merge CLI overrides over this config.
    pub fn merged(self, overrides: ConfigOverrides) -> Config {
        Config {
            input_dir: overrides.input_dir.unwrap_or(self.input_dir),
            recursive: overrides.recursive.unwrap_or(self.recursive),
            tag_add_file: overrides.tag_add_file.unwrap_or(self.tag_add_file),
            tag_remove_file: overrides.tag_remove_file.unwrap_or(self.tag_remove_file),
            regexp: overrides.regexp.unwrap_or(self.regexp),
            shuffle: overrides.shuffle.unwrap_or(self.shuffle),
            shuffle_keep_first: overrides
                .shuffle_keep_first
                .unwrap_or(self.shuffle_keep_first),
            backup: overrides.backup.unwrap_or(self.backup),
            backup_mode: overrides.backup_mode.unwrap_or(self.backup_mode),
            dry_run: overrides.dry_run || self.dry_run,
            diff: overrides.diff || self.diff,
        }
    }
}
