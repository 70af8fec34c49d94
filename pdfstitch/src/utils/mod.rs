//! Utilities for path collection and size formatting.

use crate::{Result, error::StitchError};
use std::path::PathBuf;

/// Characters that make an input a glob pattern rather than a plain path.
const GLOB_META: [char; 3] = ['*', '?', '['];

/// Whether `input` contains glob metacharacters.
pub fn is_glob_pattern(input: &str) -> bool {
    input.contains(GLOB_META)
}

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// Returns a flattened list of resolved paths. Each pattern's matches are
/// sorted, so `*.pdf` yields files in name order.
///
/// Errors:
/// - Malformed patterns become [`StitchError::InvalidPattern`].
/// - Unreadable directories met while walking do too.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let paths = collect_paths_for_pattern(pattern)?;
        resolved_paths.extend(paths);
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./docs/*.pdf"`
fn collect_paths_for_pattern<P: AsRef<str>>(pattern: P) -> Result<Vec<PathBuf>> {
    let pattern = pattern.as_ref();
    let invalid = |reason: String| StitchError::InvalidPattern {
        pattern: pattern.to_owned(),
        reason,
    };

    let mut resolved_paths = Vec::new();
    for entry in glob::glob(pattern).map_err(|err| invalid(err.to_string()))? {
        resolved_paths.push(entry.map_err(|err| invalid(err.to_string()))?);
    }

    resolved_paths.sort();
    Ok(resolved_paths)
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
