//! The ordered list of files selected for merging.
//!
//! Insertion order is meaningful: it is both the display order and the
//! merge order. No two entries share the same `(name, size)` pair.
//!
//! # Examples
//!
//! ```
//! use pdfstitch::registry::{FileRegistry, SelectedFile};
//!
//! let mut registry = FileRegistry::new();
//! let outcome = registry.add(vec![
//!     SelectedFile::from_bytes("A.pdf", vec![0u8; 1024]),
//!     SelectedFile::from_bytes("B.pdf", vec![0u8; 2048]),
//!     SelectedFile::from_bytes("notes.txt", vec![0u8; 10]),
//! ]);
//! assert_eq!(outcome.added, 2);
//! assert_eq!(outcome.rejected_wrong_type, 1);
//!
//! registry.reorder(1, 0).unwrap();
//! assert_eq!(registry.entry_at(0).unwrap().name(), "B.pdf");
//! ```

pub mod file;

pub use file::{FileSource, PDF_MIME_TYPE, SelectedFile, guess_mime};

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::error::RegistryError;

/// What happened to a batch of candidates passed to [`FileRegistry::add`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOutcome {
    /// Candidates appended to the registry.
    pub added: usize,
    /// Candidates dropped because they are not PDFs.
    pub rejected_wrong_type: usize,
    /// Candidates dropped because their `(name, size)` was already present.
    pub rejected_duplicate: usize,
}

impl AddOutcome {
    /// Total number of rejected candidates.
    pub fn rejected(&self) -> usize {
        self.rejected_wrong_type + self.rejected_duplicate
    }

    /// True when nothing was appended.
    pub fn is_empty(&self) -> bool {
        self.added == 0
    }
}

/// Ordered, duplicate-free collection of selected files.
#[derive(Debug, Clone, Default)]
pub struct FileRegistry {
    entries: Vec<SelectedFile>,
}

impl FileRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every PDF candidate whose `(name, size)` is not yet present.
    ///
    /// Survivors keep their relative order. Duplicates inside the batch
    /// itself are rejected as well, so the invariant holds after the call.
    pub fn add<I>(&mut self, candidates: I) -> AddOutcome
    where
        I: IntoIterator<Item = SelectedFile>,
    {
        let mut outcome = AddOutcome::default();
        let mut seen: HashSet<(String, u64)> = self.entries.iter().map(owned_key).collect();

        for candidate in candidates {
            if !candidate.is_pdf() {
                debug!(
                    name = candidate.name(),
                    mime = candidate.mime_type(),
                    "rejecting non-PDF candidate"
                );
                outcome.rejected_wrong_type += 1;
                continue;
            }

            if !seen.insert(owned_key(&candidate)) {
                debug!(
                    name = candidate.name(),
                    size = candidate.size(),
                    "rejecting duplicate candidate"
                );
                outcome.rejected_duplicate += 1;
                continue;
            }

            self.entries.push(candidate);
            outcome.added += 1;
        }

        outcome
    }

    /// Delete the entry at `position`.
    ///
    /// Out-of-range positions are ignored and return `None`.
    pub fn remove(&mut self, position: usize) -> Option<SelectedFile> {
        if position < self.entries.len() {
            Some(self.entries.remove(position))
        } else {
            None
        }
    }

    /// Move the entry at `from` so that it ends up at `to`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidPosition`] when either index does not
    /// address an existing entry; the registry is left untouched.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), RegistryError> {
        let len = self.entries.len();
        for position in [from, to] {
            if position >= len {
                return Err(RegistryError::InvalidPosition { position, len });
            }
        }

        let moved = self.entries.remove(from);
        self.entries.insert(to, moved);
        Ok(())
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no file is selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `position`, if any.
    pub fn entry_at(&self, position: usize) -> Option<&SelectedFile> {
        self.entries.get(position)
    }

    /// Iterate entries in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, SelectedFile> {
        self.entries.iter()
    }

    /// Copy of the current order, for work that must not see later mutations.
    pub fn snapshot(&self) -> Vec<SelectedFile> {
        self.entries.clone()
    }

    /// Sum of the sizes of all entries.
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(SelectedFile::size).sum()
    }
}

impl<'a> IntoIterator for &'a FileRegistry {
    type Item = &'a SelectedFile;
    type IntoIter = std::slice::Iter<'a, SelectedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn owned_key(file: &SelectedFile) -> (String, u64) {
    let (name, size) = file.dedup_key();
    (name.to_owned(), size)
}
