//! End-to-end workflow tests through the library API
//!
//! Covers the full batch flow: load sources, enumerate captions, refine,
//! back up, and verify idempotency on a second pass.

use std::fs;
use std::path::PathBuf;
use tag_refiner::{
    collect_caption_files, count_tags, refine_file, render_report, sorted_counts, BackupMode,
    Config, PatternError, RefineOutcome, RefineSources, SortOrder,
};
use tempfile::TempDir;

/// Build a caption directory with remove/add sources configured.
fn setup_dataset(remove_patterns: &str, add_tags: &str) -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();

    fs::write(
        dir.path().join("001.txt"),
        "1girl, blue hair, background, simple background",
    )
    .unwrap();
    fs::write(dir.path().join("002.txt"), "1girl, smile, background").unwrap();

    let remove_file = dir.path().join("tag_remove.txt");
    fs::write(&remove_file, remove_patterns).unwrap();
    let add_file = dir.path().join("tag_add.txt");
    fs::write(&add_file, add_tags).unwrap();

    let config = Config {
        input_dir: dir.path().to_path_buf(),
        tag_add_file: add_file,
        tag_remove_file: remove_file,
        regexp: true,
        shuffle: false,
        ..Config::default()
    };

    (dir, config)
}

fn refine_all(config: &Config, sources: &RefineSources) -> Vec<(PathBuf, RefineOutcome)> {
    let files = collect_caption_files(&config.input_dir, config.recursive).unwrap();
    files
        .iter()
        .map(|f| {
            let report = refine_file(f, sources, config, false).unwrap();
            (f.clone(), report.outcome)
        })
        .collect()
}

#[test]
fn test_full_refine_pass_then_idempotent_second_pass() {
    let (dir, config) = setup_dataset("^background$\n^simple background$\n", "1girl\nslim body\n");
    let (sources, warnings) = RefineSources::load(&config).unwrap();
    assert!(warnings.is_empty());

    let outcomes = refine_all(&config, &sources);
    assert!(outcomes.iter().all(|(_, o)| *o == RefineOutcome::Written));

    assert_eq!(
        fs::read_to_string(dir.path().join("001.txt")).unwrap(),
        "1girl, slim body, blue hair\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("002.txt")).unwrap(),
        "1girl, slim body, smile\n"
    );

    // Backups hold the pre-transform bytes.
    assert_eq!(
        fs::read_to_string(dir.path().join("001.txt.bak")).unwrap(),
        "1girl, blue hair, background, simple background"
    );

    // Second pass: no writes, backups untouched.
    let outcomes = refine_all(&config, &sources);
    assert!(outcomes
        .iter()
        .all(|(_, o)| *o == RefineOutcome::SkippedNoChange));
    assert_eq!(
        fs::read_to_string(dir.path().join("001.txt.bak")).unwrap(),
        "1girl, blue hair, background, simple background"
    );
}

#[test]
fn test_dry_run_leaves_dataset_untouched() {
    let (dir, mut config) = setup_dataset("^background$\n", "");
    config.dry_run = true;
    let (sources, _) = RefineSources::load(&config).unwrap();

    let outcomes = refine_all(&config, &sources);
    assert!(outcomes
        .iter()
        .all(|(_, o)| *o == RefineOutcome::SkippedDryRun));

    assert_eq!(
        fs::read_to_string(dir.path().join("001.txt")).unwrap(),
        "1girl, blue hair, background, simple background"
    );
    assert!(!dir.path().join("001.txt.bak").exists());
}

#[test]
fn test_invalid_regex_aborts_before_any_modification() {
    let (dir, config) = setup_dataset("[invalid\n", "");

    let err = RefineSources::load(&config).unwrap_err();
    assert!(matches!(err, PatternError::Regex { line: 1, .. }));

    // Nothing ran, nothing changed.
    assert_eq!(
        fs::read_to_string(dir.path().join("001.txt")).unwrap(),
        "1girl, blue hair, background, simple background"
    );
}

#[test]
fn test_versioned_backups_accumulate_across_changes() {
    let (dir, mut config) = setup_dataset("^background$\n", "");
    config.backup_mode = BackupMode::Versioned;
    let (sources, _) = RefineSources::load(&config).unwrap();

    refine_all(&config, &sources);
    assert!(dir.path().join("001.txt.bak.1").exists());

    // New pattern produces new content, hence a second version.
    fs::write(dir.path().join("tag_remove.txt"), "^background$\n^smile$\n^blue hair$\n").unwrap();
    let (sources, _) = RefineSources::load(&config).unwrap();
    refine_all(&config, &sources);

    assert!(dir.path().join("001.txt.bak.2").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("001.txt.bak.1")).unwrap(),
        "1girl, blue hair, background, simple background"
    );
}

#[test]
fn test_missing_sources_degrade_to_noop_refine() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("001.txt"), "1girl, blue hair").unwrap();

    let config = Config {
        input_dir: dir.path().to_path_buf(),
        tag_add_file: dir.path().join("absent_add.txt"),
        tag_remove_file: dir.path().join("absent_remove.txt"),
        shuffle: false,
        ..Config::default()
    };

    let (sources, warnings) = RefineSources::load(&config).unwrap();
    assert_eq!(warnings.len(), 2);

    let report = refine_file(&dir.path().join("001.txt"), &sources, &config, false).unwrap();
    assert_eq!(report.outcome, RefineOutcome::SkippedNoChange);
}

#[test]
fn test_list_report_over_dataset() {
    let (dir, _config) = setup_dataset("", "");
    let files = collect_caption_files(dir.path(), false).unwrap();

    let (counts, failures) = count_tags(&files, false);
    assert!(failures.is_empty());

    let entries = sorted_counts(&counts, SortOrder::Count);
    let report = render_report(&entries, true);
    let mut lines = report.lines();
    assert_eq!(lines.next(), Some("2  1girl"));
    assert_eq!(lines.next(), Some("2  background"));
    assert_eq!(lines.next(), Some("1  blue hair"));
}
