//! Tag frequency aggregation across a caption directory.

use crate::refine::resolve_read_source;
use crate::transform::parse_tags;
use clap::ValueEnum;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Report ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    /// Ascending tag name.
    #[default]
    Tag,
    /// Descending occurrence count, ties broken by ascending tag name.
    Count,
}

/// Accumulate tag occurrence counts across `files`.
///
/// Per-file read failures do not abort the scan; they come back alongside
/// the counts so the caller can warn and continue.
pub fn count_tags(
    files: &[PathBuf],
    use_bak: bool,
) -> (HashMap<String, usize>, Vec<(PathBuf, std::io::Error)>) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut failures = Vec::new();

    for path in files {
        let source = resolve_read_source(path, use_bak);
        match fs::read_to_string(&source) {
            Ok(content) => {
                for tag in parse_tags(content.trim()) {
                    *counts.entry(tag).or_insert(0) += 1;
                }
            }
            Err(err) => failures.push((source, err)),
        }
    }

    (counts, failures)
}

/// Sort counts into report order.
pub fn sorted_counts(counts: &HashMap<String, usize>, order: SortOrder) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = counts
        .iter()
        .map(|(tag, count)| (tag.clone(), *count))
        .collect();

    match order {
        SortOrder::Tag => entries.sort_by(|a, b| a.0.cmp(&b.0)),
        SortOrder::Count => entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))),
    }

    entries
}

/// Render the report: one tag per line, optionally prefixed with its count,
/// with a single trailing newline.
pub fn render_report(entries: &[(String, usize)], show_count: bool) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(entries.len());
    for (tag, count) in entries {
        if show_count {
            lines.push(format!("{count}  {tag}"));
        } else {
            lines.push(tag.clone());
        }
    }
    lines.join("\n") + "\n"
}

/// Write the report to `path`, replacing any existing file.
pub fn write_report(path: &Path, report: &str) -> std::io::Result<()> {
    fs::write(path, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, usize)]) -> HashMap<String, usize> {
        pairs.iter().map(|(t, c)| (t.to_string(), *c)).collect()
    }

    #[test]
    fn test_count_tags_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "1girl, blue hair").unwrap();
        fs::write(&b, "1girl, smile\n").unwrap();

        let (counts, failures) = count_tags(&[a, b], false);
        assert!(failures.is_empty());
        assert_eq!(counts.get("1girl"), Some(&2));
        assert_eq!(counts.get("blue hair"), Some(&1));
        assert_eq!(counts.get("smile"), Some(&1));
    }

    #[test]
    fn test_count_tags_collects_failures_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        fs::write(&a, "1girl").unwrap();
        let missing = dir.path().join("missing.txt");

        let (counts, failures) = count_tags(&[missing, a], false);
        assert_eq!(failures.len(), 1);
        assert_eq!(counts.get("1girl"), Some(&1));
    }

    #[test]
    fn test_sort_by_tag() {
        let entries = sorted_counts(&counts(&[("smile", 1), ("1girl", 2), ("blue hair", 1)]), SortOrder::Tag);
        let tags: Vec<&str> = entries.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tags, vec!["1girl", "blue hair", "smile"]);
    }

    #[test]
    fn test_sort_by_count_ties_by_tag() {
        let entries = sorted_counts(
            &counts(&[("smile", 1), ("1girl", 2), ("blue hair", 1)]),
            SortOrder::Count,
        );
        let tags: Vec<&str> = entries.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tags, vec!["1girl", "blue hair", "smile"]);
    }

    #[test]
    fn test_render_report_plain_and_counted() {
        let entries = vec![("1girl".to_string(), 2), ("smile".to_string(), 1)];
        assert_eq!(render_report(&entries, false), "1girl\nsmile\n");
        assert_eq!(render_report(&entries, true), "2  1girl\n1  smile\n");
    }
}
