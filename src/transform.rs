//! The tag transformation pipeline: remove, dedup-for-add, prepend, shuffle.
//!
//! [`transform_with_rng`] is pure and order-stable except for the explicit
//! shuffle step, which permutes only the tags beyond the pinned prefix.

use crate::pattern::RemoveMatcher;
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle behavior for the final tag list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleConfig {
    pub enabled: bool,
    /// Leading tags of the post-add/remove list exempt from randomization
    /// (trigger-word protection).
    pub keep_first: usize,
}

impl ShuffleConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            keep_first: 0,
        }
    }
}

/// Split raw caption content into trimmed, non-empty tags.
pub fn parse_tags(content: &str) -> Vec<String> {
    content
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Serialize a tag list back to caption form.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Apply the full pipeline with an explicit randomness source.
///
/// Order of operations:
/// 1. Drop every tag matched by any remove matcher.
/// 2. Drop every surviving tag that equals a curated add tag.
/// 3. Prepend the add tags in their given order.
/// 4. If enabled, shuffle everything past `keep_first`.
pub fn transform_with_rng<R: Rng>(
    tags: &[String],
    matchers: &[RemoveMatcher],
    add_tags: &[String],
    shuffle: ShuffleConfig,
    rng: &mut R,
) -> Vec<String> {
    let filtered = tags
        .iter()
        .filter(|tag| !matchers.iter().any(|m| m.is_match(tag.as_str())))
        .filter(|tag| !add_tags.contains(*tag))
        .cloned();

    let mut result: Vec<String> = add_tags.iter().cloned().chain(filtered).collect();

    if shuffle.enabled {
        let keep = shuffle.keep_first.min(result.len());
        result[keep..].shuffle(rng);
    }

    result
}

/// [`transform_with_rng`] with thread-local entropy.
pub fn transform(
    tags: &[String],
    matchers: &[RemoveMatcher],
    add_tags: &[String],
    shuffle: ShuffleConfig,
) -> Vec<String> {
    transform_with_rng(tags, matchers, add_tags, shuffle, &mut rand::thread_rng())
}
