//! The PDF document model used by the merge.
//!
//! [`DocumentBackend`] is the seam between the orchestrator and the library
//! that actually understands PDF. [`LopdfBackend`] is the production
//! implementation; tests substitute their own.

use lopdf::{Document, Object, dictionary};
use tracing::{debug, warn};

use crate::config::CompressionLevel;
use crate::error::MergeError;
use crate::merge::pages::{self, PageTreeError};

/// Failures reported by a [`DocumentBackend`].
///
/// The backend does not know which file it is working on; the orchestrator
/// attaches the name when converting into [`MergeError`].
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Bytes could not be parsed as a document.
    #[error("{0}")]
    Parse(String),

    /// The page tree of the source or accumulator is broken.
    #[error(transparent)]
    PageTree(#[from] PageTreeError),

    /// The accumulator could not be serialized.
    #[error("{0}")]
    Serialize(String),
}

impl BackendError {
    /// Attach the name of the file being processed.
    pub fn into_merge_error(self, name: &str) -> MergeError {
        match self {
            Self::Parse(reason) => MergeError::Parse {
                name: name.to_owned(),
                reason,
            },
            Self::PageTree(err) => MergeError::PageTree {
                name: name.to_owned(),
                reason: err.to_string(),
            },
            Self::Serialize(reason) => MergeError::Serialize { reason },
        }
    }
}

/// Operations the merge needs from a PDF document model.
///
/// All methods are blocking; the orchestrator calls them from
/// `spawn_blocking`.
pub trait DocumentBackend: Send + Sync + 'static {
    /// In-memory document representation.
    type Document: Send + 'static;

    /// A document with a catalog and an empty page tree.
    fn create_empty(&self) -> Self::Document;

    /// Parse `bytes` into a document.
    fn load(&self, bytes: &[u8]) -> Result<Self::Document, BackendError>;

    /// Append every page of `source`, in document order, to `accumulator`.
    ///
    /// Returns the number of pages copied.
    fn copy_pages(
        &self,
        source: Self::Document,
        accumulator: &mut Self::Document,
    ) -> Result<usize, BackendError>;

    /// Number of pages in `doc`.
    fn page_count(&self, doc: &Self::Document) -> usize;

    /// Serialize the accumulator to bytes.
    fn save(&self, accumulator: Self::Document) -> Result<Vec<u8>, BackendError>;
}

/// [`DocumentBackend`] built on `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct LopdfBackend {
    compression: CompressionLevel,
}

impl LopdfBackend {
    /// Create a backend with standard compression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend applying `compression` on save.
    pub fn with_compression(compression: CompressionLevel) -> Self {
        Self { compression }
    }

    /// Compression applied on save.
    pub fn compression(&self) -> CompressionLevel {
        self.compression
    }
}

impl DocumentBackend for LopdfBackend {
    type Document = Document;

    fn create_empty(&self) -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    fn load(&self, bytes: &[u8]) -> Result<Document, BackendError> {
        let mut doc =
            Document::load_mem(bytes).map_err(|e| BackendError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            strip_encryption(&mut doc);
        }

        Ok(doc)
    }

    fn copy_pages(
        &self,
        mut source: Document,
        accumulator: &mut Document,
    ) -> Result<usize, BackendError> {
        source.renumber_objects_with(accumulator.max_id + 1);

        let page_ids: Vec<_> = source.get_pages().into_values().collect();
        for &page_id in &page_ids {
            pages::materialize_inherited(&mut source, page_id)?;
        }

        let mut copied_max = accumulator.max_id;
        for (id, object) in source.objects {
            copied_max = copied_max.max(id.0);
            if is_tree_node(&object) {
                continue;
            }
            accumulator.objects.insert(id, object);
        }
        accumulator.max_id = copied_max;

        pages::append_pages(accumulator, &page_ids)?;
        debug!(
            pages = page_ids.len(),
            max_id = accumulator.max_id,
            "copied pages into accumulator"
        );

        Ok(page_ids.len())
    }

    fn page_count(&self, doc: &Document) -> usize {
        doc.get_pages().len()
    }

    fn save(&self, mut accumulator: Document) -> Result<Vec<u8>, BackendError> {
        accumulator.renumber_objects();

        match self.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => accumulator.compress(),
            CompressionLevel::Maximum => {
                accumulator.prune_objects();
                accumulator.compress();
            }
        }

        let mut buffer = Vec::new();
        accumulator
            .save_to(&mut buffer)
            .map_err(|e| BackendError::Serialize(e.to_string()))?;
        Ok(buffer)
    }
}

/// Drop the security handler so the pages can be copied as plain objects.
///
/// Restrictions are ignored. `load_mem` has already decrypted the objects
/// when the empty user password opens the file; decrypting a second time
/// would scramble them, so `decrypt` only runs when the reader did not.
fn strip_encryption(doc: &mut Document) {
    if doc.encryption_state.is_none()
        && let Err(e) = doc.decrypt("")
    {
        warn!(error = %e, "could not decrypt document, continuing without decryption");
    }

    if let Ok(id) = doc.trailer.get(b"Encrypt").and_then(Object::as_reference) {
        doc.objects.remove(&id);
    }
    doc.trailer.remove(b"Encrypt");
    doc.encryption_state = None;
}

/// Catalog and `Pages` nodes of a source document are replaced by the
/// accumulator's own and must not be copied.
fn is_tree_node(object: &Object) -> bool {
    let Ok(dict) = object.as_dict() else {
        return false;
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Catalog" | b"Pages")
    )
}
