//! Tag Refiner: caption tag normalizer for ML dataset preparation
//!
//! Normalizes comma-separated tag lists in plain-text caption files
//! (WD14/Danbooru-style, one `.txt` per image): removes unwanted tags by
//! exact or regex pattern, prepends curated tags with dedup-on-add,
//! optionally shuffles tag order behind a pinned prefix, and writes results
//! back idempotently with configurable backup behavior.
//!
//! # Architecture
//!
//! The core is the pure pipeline in [`transform`]: remove → dedup-for-add →
//! prepend → shuffle. Everything around it is plumbing: [`pattern`] compiles
//! remove matchers, [`sources`] loads the shared per-run inputs, [`refine`]
//! orchestrates one file, [`backup`] handles pre-overwrite copies, and
//! [`list`] aggregates tag frequencies.
//!
//! # Safety
//!
//! - No-op detection against the write target makes repeated runs idempotent
//! - Atomic file writes (tempfile + fsync + rename)
//! - Backups are taken before every real overwrite, per policy
//! - Dry-run mode never touches the filesystem
//!
//! # Example
//!
//! ```no_run
//! use tag_refiner::{refine_file, Config, RefineSources};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let (sources, _warnings) = RefineSources::load(&config)?;
//!
//! let report = refine_file(Path::new("captions/001.txt"), &sources, &config, false)?;
//! println!("{:?}", report.outcome);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backup;
pub mod config;
pub mod diff;
pub mod list;
pub mod pattern;
pub mod refine;
pub mod sources;
pub mod transform;
pub mod walk;

// Re-exports
pub use backup::{backup_path, create_backup, BackupMode};
pub use config::{load_config, Config, ConfigError, ConfigOverrides};
pub use diff::render_diff;
pub use list::{count_tags, render_report, sorted_counts, write_report, SortOrder};
pub use pattern::{load_matchers, PatternError, RemoveMatcher};
pub use refine::{refine_file, resolve_read_source, FileReport, RefineError, RefineOutcome};
pub use sources::{load_add_tags, RefineSources, SourceWarning};
pub use transform::{join_tags, parse_tags, transform, transform_with_rng, ShuffleConfig};
pub use walk::{collect_caption_files, WalkError};
