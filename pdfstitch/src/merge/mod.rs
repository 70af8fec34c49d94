//! PDF merging operations.
//!
//! This module provides the merge pipeline:
//! - [`Merger`]: sequential, all-or-nothing orchestration
//! - [`DocumentBackend`]: the document model seam, with [`LopdfBackend`]
//! - [`pages`]: page tree helpers used by the backend and the previewer
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::merge::Merger;
//! use pdfstitch::registry::SelectedFile;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = vec![
//!     SelectedFile::from_path_with_size(PathBuf::from("a.pdf"), 1024),
//!     SelectedFile::from_path_with_size(PathBuf::from("b.pdf"), 2048),
//! ];
//!
//! let merged = Merger::new().merge(&files).await?;
//! println!("Merged {} pages", merged.statistics.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod merger;
pub mod pages;

pub use backend::{BackendError, DocumentBackend, LopdfBackend};
pub use merger::{MergeStatistics, MergedDocument, Merger};
pub use pages::PageTreeError;
