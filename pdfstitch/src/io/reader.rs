//! Turning user input into file candidates.
//!
//! This module resolves what the user typed into [`SelectedFile`] handles:
//! - Plain paths are checked for existence and type
//! - Glob patterns are expanded (matches sorted by name)
//! - Input list files supply one path per line
//!
//! Nothing is parsed here; the registry decides what to accept.
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::io::FileLoader;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = FileLoader::new();
//! let candidates = loader.load_all(&["a.pdf", "scans/*.pdf"]).await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::debug;

use crate::error::{Result, StitchError};
use crate::registry::SelectedFile;
use crate::utils::{collect_paths_for_patterns, is_glob_pattern};

/// Resolves paths and glob patterns into [`SelectedFile`] candidates.
///
/// Directories matched by a glob are skipped; a directory named
/// explicitly is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl FileLoader {
    /// Create a loader.
    pub fn new() -> Self {
        Self
    }

    /// Expand `inputs` into paths, keeping the order the user gave.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidPattern`] for malformed patterns and
    /// [`StitchError::FileNotFound`] for patterns that match nothing.
    pub fn expand<S: AsRef<str>>(&self, inputs: &[S]) -> Result<Vec<(PathBuf, bool)>> {
        let mut paths = Vec::new();

        for input in inputs {
            let input = input.as_ref();
            if !is_glob_pattern(input) {
                paths.push((PathBuf::from(input), false));
                continue;
            }

            let matches = collect_paths_for_patterns([input])?;
            if matches.is_empty() {
                return Err(StitchError::file_not_found(PathBuf::from(input)));
            }
            debug!(pattern = input, matches = matches.len(), "expanded glob pattern");
            paths.extend(matches.into_iter().map(|p| (p, true)));
        }

        Ok(paths)
    }

    /// Build a candidate for a single path.
    ///
    /// # Errors
    ///
    /// - [`StitchError::FileNotFound`] if nothing exists at `path`
    /// - [`StitchError::NotAFile`] if `path` is a directory
    /// - [`StitchError::FileNotAccessible`] if metadata cannot be read
    pub async fn load(&self, path: &Path) -> Result<SelectedFile> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StitchError::file_not_found(path.to_path_buf()));
            }
            Err(e) => {
                return Err(StitchError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        if !metadata.is_file() {
            return Err(StitchError::not_a_file(path.to_path_buf()));
        }

        Ok(SelectedFile::from_path_with_size(path.to_path_buf(), metadata.len()))
    }

    /// Resolve every input into candidates, in order.
    ///
    /// Stops at the first input that cannot be resolved.
    pub async fn load_all<S: AsRef<str>>(&self, inputs: &[S]) -> Result<Vec<SelectedFile>> {
        let mut candidates = Vec::new();

        for (path, from_glob) in self.expand(inputs)? {
            if from_glob && path.is_dir() {
                debug!(path = %path.display(), "skipping directory matched by glob");
                continue;
            }
            candidates.push(self.load(&path).await?);
        }

        Ok(candidates)
    }
}

/// Read input paths from a list file.
///
/// Reads a file containing one path per line. Lines starting with '#'
/// are treated as comments and ignored. Empty lines are skipped.
/// A path of `-` reads from stdin.
///
/// # Errors
///
/// Returns [`StitchError::FailedToReadInputList`] if the file cannot be read.
pub async fn read_input_list(path: &Path) -> Result<Vec<String>> {
    let wrap = |source| StitchError::FailedToReadInputList {
        path: path.to_path_buf(),
        source,
    };

    if path.as_os_str() == "-" {
        read_lines(tokio::io::stdin()).await.map_err(wrap)
    } else {
        let file = tokio::fs::File::open(path).await.map_err(wrap)?;
        read_lines(file).await.map_err(wrap)
    }
}

async fn read_lines<R: AsyncRead + Unpin>(reader: R) -> std::io::Result<Vec<String>> {
    let mut lines = BufReader::new(reader).lines();
    let mut entries = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        entries.push(line.to_owned());
    }

    Ok(entries)
}
