use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tag_refiner::{
    collect_caption_files, count_tags, load_config, refine_file, render_report, sorted_counts,
    write_report, BackupMode, Config, ConfigError, ConfigOverrides, RefineOutcome, RefineSources,
    SortOrder,
};

const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Parser)]
#[command(name = "tag-refiner")]
#[command(about = "Caption tag normalizer for WD14/Danbooru-style datasets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refine caption files: remove, add, and shuffle tags
    Refine {
        /// Directory of .txt caption files (from config if omitted)
        path: Option<PathBuf>,

        /// Process subdirectories recursively
        #[arg(short, long)]
        recursive: bool,

        /// Randomize tag order
        #[arg(long, overrides_with = "no_shuffle")]
        shuffle: bool,

        /// Keep tag order as-is
        #[arg(long, overrides_with = "shuffle")]
        no_shuffle: bool,

        /// Leading tags pinned during shuffle (trigger-word protection)
        #[arg(long, value_name = "N")]
        shuffle_keep_first: Option<usize>,

        /// Create a backup before overwriting
        #[arg(long, overrides_with = "no_backup")]
        backup: bool,

        /// Overwrite without creating backups
        #[arg(long, overrides_with = "backup")]
        no_backup: bool,

        /// Backup policy when a backup already exists
        #[arg(long, value_enum)]
        backup_mode: Option<BackupMode>,

        /// Compute changes without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,

        /// Path to the curated add-tag file
        #[arg(long, value_name = "FILE")]
        add_file: Option<PathBuf>,

        /// Path to the remove-pattern file
        #[arg(long, value_name = "FILE")]
        remove_file: Option<PathBuf>,

        /// Treat remove-pattern lines with meta-characters as regexes
        #[arg(long, overrides_with = "no_regexp")]
        regexp: bool,

        /// Treat every remove-pattern line as exact match
        #[arg(long, overrides_with = "regexp")]
        no_regexp: bool,

        /// Read tags from an existing .bak sibling instead of the target
        #[arg(long)]
        use_bak: bool,

        /// Path to the JSON config file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Ignore any config file and use built-in defaults
        #[arg(long)]
        no_config: bool,
    },

    /// List tag frequencies across a caption directory
    List {
        /// Directory of .txt caption files
        path: PathBuf,

        /// Process subdirectories recursively
        #[arg(short, long)]
        recursive: bool,

        /// Show occurrence counts
        #[arg(long)]
        list_count: bool,

        /// Write the report to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        list_file: Option<PathBuf>,

        /// Report ordering
        #[arg(long, value_enum, default_value = "tag")]
        list_sort: SortOrder,

        /// Read tags from an existing .bak sibling instead of the target
        #[arg(long)]
        use_bak: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Refine {
            path,
            recursive,
            shuffle,
            no_shuffle,
            shuffle_keep_first,
            backup,
            no_backup,
            backup_mode,
            dry_run,
            diff,
            add_file,
            remove_file,
            regexp,
            no_regexp,
            use_bak,
            config,
            no_config,
        } => {
            let overrides = ConfigOverrides {
                input_dir: path,
                recursive: recursive.then_some(true),
                tag_add_file: add_file,
                tag_remove_file: remove_file,
                regexp: toggle(regexp, no_regexp),
                shuffle: toggle(shuffle, no_shuffle),
                shuffle_keep_first,
                backup: toggle(backup, no_backup),
                backup_mode,
                dry_run,
                diff,
            };
            cmd_refine(&config, no_config, overrides, use_bak)
        }

        Commands::List {
            path,
            recursive,
            list_count,
            list_file,
            list_sort,
            use_bak,
        } => cmd_list(&path, recursive, list_count, list_file.as_deref(), list_sort, use_bak),
    }
}

/// Collapse a --flag / --no-flag pair into an optional override.
fn toggle(on: bool, off: bool) -> Option<bool> {
    if on {
        Some(true)
    } else if off {
        Some(false)
    } else {
        None
    }
}

/// Resolve the base config per the --config / --no-config rules.
///
/// A missing explicitly-given config path is fatal; the missing default
/// `config.json` silently falls back to built-in defaults.
fn resolve_base_config(config_path: &Path, no_config: bool) -> Result<Config> {
    if no_config {
        return Ok(Config::default());
    }

    match load_config(config_path) {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound(_)) if config_path == Path::new(DEFAULT_CONFIG_PATH) => {
            Ok(Config::default())
        }
        Err(err) => Err(err.into()),
    }
}

fn cmd_refine(
    config_path: &Path,
    no_config: bool,
    overrides: ConfigOverrides,
    use_bak: bool,
) -> Result<()> {
    let config = resolve_base_config(config_path, no_config)?.merged(overrides);

    // Invalid regex in the remove-pattern file aborts here, before any
    // caption file is touched.
    let (sources, warnings) = RefineSources::load(&config)?;
    for warning in &warnings {
        eprintln!("{}", format!("Warning: {warning}").yellow());
    }

    let files = collect_caption_files(&config.input_dir, config.recursive)?;
    if files.is_empty() {
        eprintln!(
            "{}",
            format!("Warning: no .txt files found in {}", config.input_dir.display()).yellow()
        );
        return Ok(());
    }

    println!("Processing {} caption files...", files.len());
    if config.dry_run {
        println!("{}", "  [DRY RUN - nothing will be written]".cyan());
    }
    println!();

    let mut total_written = 0;
    let mut total_unchanged = 0;
    let mut total_dry_run = 0;
    let mut total_failed = 0;

    for file in &files {
        match refine_file(file, &sources, &config, use_bak) {
            Ok(report) => {
                if let Some(diff) = &report.diff {
                    println!("{}", format!("=== {} ===", file.display()).dimmed());
                    print!("{diff}");
                }
                match report.outcome {
                    RefineOutcome::Written => {
                        println!("{} {}: Refined", "✓".green(), file.display());
                        total_written += 1;
                    }
                    RefineOutcome::SkippedNoChange => {
                        println!("{} {}: Unchanged", "⊙".yellow(), file.display());
                        total_unchanged += 1;
                    }
                    RefineOutcome::SkippedDryRun => {
                        println!("{} {}: Would refine (dry run)", "⊘".cyan(), file.display());
                        total_dry_run += 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                total_failed += 1;
            }
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} refined", format!("{}", total_written).green());
    println!("  {} unchanged", format!("{}", total_unchanged).yellow());
    if total_dry_run > 0 {
        println!("  {} dry run", format!("{}", total_dry_run).cyan());
    }
    println!("  {} failed", format!("{}", total_failed).red());

    if total_failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_list(
    path: &Path,
    recursive: bool,
    show_count: bool,
    output: Option<&Path>,
    sort: SortOrder,
    use_bak: bool,
) -> Result<()> {
    let files = collect_caption_files(path, recursive)?;
    if files.is_empty() {
        eprintln!(
            "{}",
            format!("Warning: no .txt files found in {}", path.display()).yellow()
        );
        return Ok(());
    }

    let (counts, failures) = count_tags(&files, use_bak);
    for (file, err) in &failures {
        eprintln!(
            "{}",
            format!("Warning: failed to read {}: {}", file.display(), err).yellow()
        );
    }

    if counts.is_empty() {
        eprintln!("{}", "Warning: no tags found".yellow());
        return Ok(());
    }

    let entries = sorted_counts(&counts, sort);
    let report = render_report(&entries, show_count);

    match output {
        Some(out) => {
            write_report(out, &report)?;
            println!(
                "Wrote {} distinct tags to {}",
                entries.len(),
                out.display()
            );
        }
        None => print!("{report}"),
    }

    Ok(())
}
