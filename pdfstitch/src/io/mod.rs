//! I/O operations for pdfstitch.
//!
//! This module handles all file I/O operations including:
//! - Resolving paths and glob patterns into selectable files
//! - Reading input list files
//! - Writing merged PDFs to disk atomically
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::io::{FileLoader, PdfWriter};
//! use std::path::Path;
//!
//! # async fn example(merged: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let candidates = FileLoader::new().load_all(&["input/*.pdf"]).await?;
//! println!("Found {} files", candidates.len());
//!
//! PdfWriter::new().save(&merged, Path::new("merged.pdf")).await?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::{FileLoader, read_input_list};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};

use crate::error::Result;
use crate::registry::SelectedFile;

/// Resolve `inputs` into candidates with a default [`FileLoader`].
///
/// Convenience function for one-off resolution.
pub async fn load_candidates<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<SelectedFile>> {
    FileLoader::new().load_all(inputs).await
}
