//! Helpers for cleaning names and text before they reach the filesystem,
//! a prompt, or a tracing span.

use std::path::Path;

/// Characters that are illegal in a path component on at least one platform.
pub const FORBIDDEN_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Names shorter than this after cleaning are replaced by [`PLACEHOLDER_NAME`].
pub const MIN_NAME_LEN: usize = 3;

/// Upper bound on a cleaned name, in characters.
pub const MAX_NAME_LEN: usize = 80;

/// Substitute for names that clean down to almost nothing.
pub const PLACEHOLDER_NAME: &str = "file";

/// Returns only the filename component of a path (no directory).
///
/// Safe for span fields: reveals the file name without exposing the full path.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Cleans a category or suggested name so it can be used as one path component.
///
/// Strips [`FORBIDDEN_CHARS`] and control characters, trims surrounding
/// whitespace and dots, substitutes [`PLACEHOLDER_NAME`] when fewer than
/// [`MIN_NAME_LEN`] characters remain, and caps the result at
/// [`MAX_NAME_LEN`] characters.
pub fn sanitize_component(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c) && !c.is_control())
        .collect();

    // Leading/trailing dots would yield hidden files or `..`
    let trimmed = stripped.trim().trim_matches('.').trim();

    if trimmed.chars().count() < MIN_NAME_LEN {
        return PLACEHOLDER_NAME.to_string();
    }

    let capped: String = trimmed.chars().take(MAX_NAME_LEN).collect();
    capped.trim_end().to_string()
}

/// Flattens newlines and collapses whitespace runs, then truncates to `limit`
/// characters.
pub fn printable(text: &str, limit: usize) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(limit)
        .collect()
}

/// Truncates to at most `limit` characters without splitting a code point.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
