//! pdfstitch - Select, preview, reorder and merge PDF files.
//!
//! This library keeps an ordered, duplicate-free selection of PDF files,
//! renders it as a list with best-effort previews, and merges it into a
//! single document. It provides:
//!
//! - A file registry with `(name, size)` deduplication
//! - A list renderer with HTML, JSON and terminal output
//! - A sequential, all-or-nothing merge over `lopdf`
//! - A session guarding the selection while a merge runs
//! - Text commands and a controller that reports through notifications
//!
//! # Examples
//!
//! ## Driving a session
//!
//! ```no_run
//! use pdfstitch::command::Command;
//! use pdfstitch::controller::Controller;
//! use pdfstitch::output::OutputFormatter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut controller = Controller::new(OutputFormatter::default());
//! controller.add(&["A.pdf", "B.pdf"]).await?;
//! controller.execute(Command::Move { from: 1, to: 0 }).await?;
//! controller.execute(Command::Merge(None)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use pdfstitch::io::{FileLoader, PdfWriter};
//! use pdfstitch::merge::Merger;
//! use pdfstitch::registry::FileRegistry;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = FileRegistry::new();
//! registry.add(FileLoader::new().load_all(&["chapters/*.pdf"]).await?);
//!
//! let merged = Merger::new().merge(&registry.snapshot()).await?;
//! PdfWriter::new().save(&merged.bytes, Path::new("book.pdf")).await?;
//! registry.clear();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod registry;
pub mod render;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, StitchError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
