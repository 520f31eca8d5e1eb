//! Remove-pattern compiler.
//!
//! Each non-comment, non-blank line of a pattern file becomes one
//! [`RemoveMatcher`]. A line only compiles to a regex when regex mode is
//! enabled *and* the line contains at least one regex meta-character;
//! everything else is exact string match.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Meta-characters that promote a pattern line to a regex in regex mode.
const REGEX_META_CHARS: &[char] = &[
    '.', '^', '$', '*', '+', '?', '{', '}', '[', ']', '\\', '|', '(', ')',
];

/// Compiled predicate deciding whether a tag is removed.
#[derive(Debug, Clone)]
pub enum RemoveMatcher {
    /// Matches only the identical trimmed line text.
    Exact(String),
    /// Matches if the expression finds a match anywhere in the tag.
    Pattern(Regex),
}

impl RemoveMatcher {
    /// Check a single tag against this matcher.
    pub fn is_match(&self, tag: &str) -> bool {
        match self {
            RemoveMatcher::Exact(text) => text == tag,
            RemoveMatcher::Pattern(re) => re.is_match(tag),
        }
    }
}

#[derive(Error, Debug)]
pub enum PatternError {
    /// Regex compilation failure is fatal for the whole run: silently
    /// degrading to exact match would change which tags get removed.
    #[error("invalid remove pattern at {path}:{line}: {source}")]
    Regex {
        path: PathBuf,
        /// 1-based line number within the pattern file.
        line: usize,
        source: regex::Error,
    },

    #[error("failed to read remove patterns from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// True when `line` contains any character that makes it a regex candidate.
fn has_regex_meta(line: &str) -> bool {
    line.contains(REGEX_META_CHARS)
}

/// Compile one already-trimmed, non-empty pattern line.
fn compile_line(line: &str, use_regex: bool, path: &Path, line_no: usize) -> Result<RemoveMatcher, PatternError> {
    if use_regex && has_regex_meta(line) {
        let re = Regex::new(line).map_err(|source| PatternError::Regex {
            path: path.to_path_buf(),
            line: line_no,
            source,
        })?;
        Ok(RemoveMatcher::Pattern(re))
    } else {
        Ok(RemoveMatcher::Exact(line.to_string()))
    }
}

/// Load remove matchers from a pattern file, in file order.
///
/// Blank lines and `#` comments are skipped. An unreadable file surfaces as
/// [`PatternError::Io`]; callers downgrade that to a warning with an empty
/// matcher list, while [`PatternError::Regex`] aborts the run.
pub fn load_matchers(path: &Path, use_regex: bool) -> Result<Vec<RemoveMatcher>, PatternError> {
    let contents = fs::read_to_string(path).map_err(|source| PatternError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut matchers = Vec::new();
    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        matchers.push(compile_line(line, use_regex, path, idx + 1)?);
    }

    Ok(matchers)
}
