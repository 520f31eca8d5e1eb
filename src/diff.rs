//! Unified-diff rendering of before/after caption content.

use similar::TextDiff;

/// Render a unified diff between two serialized tag strings.
///
/// Headers use the synthetic names `before/<name>` and `after/<name>`.
/// Returns an empty string when the inputs are identical.
pub fn render_diff(before: &str, after: &str, name: &str) -> String {
    if before == after {
        return String::new();
    }

    let diff = TextDiff::from_lines(before, after);
    diff.unified_diff()
        .header(&format!("before/{name}"), &format!("after/{name}"))
        .to_string()
}
