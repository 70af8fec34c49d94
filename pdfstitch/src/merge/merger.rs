//! Sequential merge orchestration.
//!
//! The merger walks the selected files in order, feeding each one through a
//! [`DocumentBackend`]. Only the accumulator and the document currently
//! being copied are alive at any time. Any failure aborts the whole merge.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task;
use tracing::{debug, error, info};

use crate::error::MergeError;
use crate::merge::backend::{BackendError, DocumentBackend, LopdfBackend};
use crate::registry::SelectedFile;
use crate::utils::format_file_size;

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of files merged.
    pub files_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total time taken for the merge.
    pub merge_time: Duration,

    /// Sum of the sizes of the input files.
    pub input_size: u64,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }
}

/// The serialized result of a successful merge.
#[derive(Debug, Clone)]
pub struct MergedDocument {
    /// The merged PDF bytes.
    pub bytes: Vec<u8>,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

impl MergedDocument {
    /// Size of the merged buffer in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Merges selected files into a single document.
#[derive(Debug, Clone)]
pub struct Merger<B = LopdfBackend> {
    backend: Arc<B>,
}

impl Merger<LopdfBackend> {
    /// Create a merger over the default `lopdf` backend.
    pub fn new() -> Self {
        Self::with_backend(LopdfBackend::new())
    }
}

impl Default for Merger<LopdfBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: DocumentBackend> Merger<B> {
    /// Create a merger over `backend`.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// The backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Merge `files`, in order, into one document.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::NotEnoughFiles`] without touching the backend
    /// when fewer than two files are given. Any read, parse, copy or
    /// serialization failure aborts the merge and no bytes are returned.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfstitch::merge::Merger;
    /// # use pdfstitch::registry::SelectedFile;
    /// # async fn example(
    /// #     a: SelectedFile,
    /// #     b: SelectedFile,
    /// # ) -> Result<(), Box<dyn std::error::Error>> {
    /// let merger = Merger::new();
    /// let merged = merger.merge(&[a, b]).await?;
    /// println!("Merged {} pages", merged.statistics.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge(&self, files: &[SelectedFile]) -> Result<MergedDocument, MergeError> {
        if files.len() < 2 {
            return Err(MergeError::NotEnoughFiles { count: files.len() });
        }

        let merge_start = Instant::now();
        let mut accumulator = self.backend.create_empty();
        let mut total_pages = 0;

        for (index, file) in files.iter().enumerate() {
            debug!(index, name = file.name(), size = file.size(), "merging file");

            let bytes = file.read().await.map_err(|source| {
                error!(name = file.name(), error = %source, "failed to read file");
                MergeError::Load {
                    name: file.name().to_owned(),
                    source,
                }
            })?;

            let backend = Arc::clone(&self.backend);
            let (next, copied) = run_blocking(move || {
                let source = backend.load(&bytes)?;
                let copied = backend.copy_pages(source, &mut accumulator)?;
                Ok((accumulator, copied))
            })
            .await?
            .map_err(|e| {
                error!(name = file.name(), error = %e, "failed to merge file");
                e.into_merge_error(file.name())
            })?;

            accumulator = next;
            total_pages += copied;
        }

        let backend = Arc::clone(&self.backend);
        let bytes = run_blocking(move || backend.save(accumulator))
            .await?
            .map_err(|e| {
                error!(error = %e, "failed to serialize merged document");
                e.into_merge_error("")
            })?;

        let statistics = MergeStatistics {
            files_merged: files.len(),
            total_pages,
            merge_time: merge_start.elapsed(),
            input_size: files.iter().map(SelectedFile::size).sum(),
        };

        info!(
            files = statistics.files_merged,
            pages = statistics.total_pages,
            bytes = bytes.len(),
            elapsed_ms = statistics.merge_time.as_millis() as u64,
            "merge complete"
        );

        Ok(MergedDocument { bytes, statistics })
    }
}

async fn run_blocking<T, F>(f: F) -> Result<Result<T, BackendError>, MergeError>
where
    F: FnOnce() -> Result<T, BackendError> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f).await.map_err(|e| MergeError::Task {
        reason: e.to_string(),
    })
}
