//! Error types for pdfstitch.
//!
//! This module defines all error types that can occur while selecting,
//! previewing and merging PDF files. Errors are designed to be informative
//! and actionable, providing clear context about what went wrong.
//!
//! # Error Categories
//!
//! - **Registry Errors**: invalid positions passed to reorder
//! - **Preview Errors**: per-file preview failures (never fatal)
//! - **Merge Errors**: any step of the merge; aborts the whole merge
//! - **I/O Errors**: file not found, permission denied, etc.
//! - **Session Errors**: mutations attempted while a merge is running

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfstitch operations.
pub type Result<T> = std::result::Result<T, StitchError>;

/// Errors raised by [`FileRegistry`](crate::registry::FileRegistry) mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A position does not address an entry of the registry.
    #[error("Position {position} is out of range (registry holds {len} file(s))")]
    InvalidPosition {
        /// Offending 0-based position.
        position: usize,
        /// Number of entries at the time of the call.
        len: usize,
    },
}

/// Errors raised while generating a row preview.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// Reading the file bytes failed.
    #[error("Failed to read {name}: {source}")]
    Read {
        /// Name of the file.
        name: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The bytes could not be parsed as a PDF.
    #[error("Failed to parse {name}: {reason}")]
    Parse {
        /// Name of the file.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// The document has no page to render.
    #[error("{name} has no pages")]
    NoPages {
        /// Name of the file.
        name: String,
    },

    /// The document parsed but its first page could not be drawn.
    #[error("Failed to render {name}: {reason}")]
    Render {
        /// Name of the file.
        name: String,
        /// Rasterizer message.
        reason: String,
    },

    /// The background render task did not complete.
    #[error("Preview task failed: {reason}")]
    Task {
        /// Join error message.
        reason: String,
    },
}

/// Errors raised by the merge orchestrator.
///
/// Any of these aborts the whole merge; no partial output is produced.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Fewer than two files were selected.
    #[error("Select at least 2 PDFs to merge ({count} selected)")]
    NotEnoughFiles {
        /// Number of files that were selected.
        count: usize,
    },

    /// Reading the bytes of a selected file failed.
    #[error("Failed to read {name}: {source}")]
    Load {
        /// Name of the file.
        name: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A selected file is not a parseable PDF.
    #[error("Failed to parse {name}: {reason}")]
    Parse {
        /// Name of the file.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// Copying pages into the accumulator failed.
    #[error("Failed to copy pages from {name}: {reason}")]
    PageTree {
        /// Name of the source file.
        name: String,
        /// Details about the broken page tree.
        reason: String,
    },

    /// Serializing the accumulator failed.
    #[error("Failed to serialize merged document: {reason}")]
    Serialize {
        /// Writer message.
        reason: String,
    },

    /// A blocking task panicked or was cancelled.
    #[error("Merge task failed: {reason}")]
    Task {
        /// Join error message.
        reason: String,
    },
}

/// Main error type for pdfstitch operations.
#[derive(Debug, thiserror::Error)]
pub enum StitchError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input path is a directory.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// A glob pattern was malformed or could not be walked.
    #[error("Invalid input pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why it could not be used.
        reason: String,
    },

    /// Failed to read the input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Registry mutation was rejected.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Merge failed; the registry was left untouched.
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// The registry cannot change while a merge is running.
    #[error("A merge is in progress; wait for it to finish")]
    SessionBusy,

    /// A command line typed by the user could not be understood.
    #[error("Invalid command '{input}': {reason}")]
    InvalidCommand {
        /// The raw command line.
        input: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// The output path resolves to one of the selected files.
    #[error("Output file cannot be the same as an input file: {}", path.display())]
    OutputIsInput {
        /// The output path as given.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for StitchError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(format!("{err:#}"))
    }
}

impl StitchError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an InvalidCommand error.
    pub fn invalid_command(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCommand {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if an interactive session can keep going after this error.
    ///
    /// Everything that only concerns one command is recoverable; output
    /// failures and cancellation are not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::FileNotAccessible { .. }
                | Self::NotAFile { .. }
                | Self::InvalidPattern { .. }
                | Self::Registry(_)
                | Self::Merge(_)
                | Self::SessionBusy
                | Self::InvalidCommand { .. }
                | Self::OutputExists { .. }
                | Self::OutputIsInput { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::InvalidPattern { .. } => 1,
            Self::FailedToReadInputList { .. } => 2,
            Self::Registry(_) => 1,
            Self::Merge(MergeError::NotEnoughFiles { .. }) => 1,
            Self::Merge(MergeError::Load { .. } | MergeError::Parse { .. }) => 3,
            Self::Merge(_) => 6,
            Self::SessionBusy => 1,
            Self::InvalidCommand { .. } => 1,
            Self::OutputExists { .. } => 4,
            Self::OutputIsInput { .. } => 1,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130,
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
