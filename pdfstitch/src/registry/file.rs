//! Handles to user-selected files.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Mime type a candidate must carry to be accepted by the registry.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Where the bytes of a selected file live.
#[derive(Clone)]
pub enum FileSource {
    /// A file on disk, read lazily.
    Path(PathBuf),
    /// Bytes already held in memory.
    Memory(Arc<[u8]>),
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
        }
    }
}

/// A reference to a file chosen by the user.
///
/// Two files are considered the same selection when their
/// [`dedup_key`](Self::dedup_key) matches; content is never compared.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    size: u64,
    mime_type: String,
    source: FileSource,
}

impl SelectedFile {
    /// Create a handle from its parts.
    pub fn new(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        source: FileSource,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            source,
        }
    }

    /// Create a handle over in-memory bytes, guessing the mime type from `name`.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let bytes = bytes.into();
        let mime_type = guess_mime(Path::new(&name));
        Self {
            size: bytes.len() as u64,
            name,
            mime_type,
            source: FileSource::Memory(bytes),
        }
    }

    /// Create a handle for a file on disk whose size is already known.
    ///
    /// The display name is the final path component.
    pub fn from_path_with_size(path: PathBuf, size: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = guess_mime(&path);
        Self {
            name,
            size,
            mime_type,
            source: FileSource::Path(path),
        }
    }

    /// Override the mime type (e.g. when the picker reports one).
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// File name as shown to the user.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Reported mime type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Where the bytes come from.
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// The `(name, size)` pair used to detect duplicate selections.
    pub fn dedup_key(&self) -> (&str, u64) {
        (&self.name, self.size)
    }

    /// Whether the file carries the PDF mime type.
    pub fn is_pdf(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case(PDF_MIME_TYPE)
    }

    /// Read the raw bytes of the file.
    pub async fn read(&self) -> io::Result<Arc<[u8]>> {
        match &self.source {
            FileSource::Path(path) => Ok(tokio::fs::read(path).await?.into()),
            FileSource::Memory(bytes) => Ok(Arc::clone(bytes)),
        }
    }
}

/// Guess a mime type from a file extension, the way a browser fills `File.type`.
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
