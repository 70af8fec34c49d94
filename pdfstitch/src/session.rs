//! Session state: the registry plus the merge-in-progress flag.
//!
//! Every mutation goes through the session so that nothing can change the
//! list while a merge is running. The merge itself works on the snapshot
//! returned by [`Session::begin_merge`].

use tracing::debug;

use crate::error::{MergeError, Result, StitchError};
use crate::registry::{AddOutcome, FileRegistry, SelectedFile};

/// Owner of the selection for one user session.
#[derive(Debug, Default)]
pub struct Session {
    registry: FileRegistry,
    merging: bool,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current selection.
    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    /// Whether a merge is running.
    pub fn is_merging(&self) -> bool {
        self.merging
    }

    /// Whether a merge may be started right now.
    pub fn merge_enabled(&self) -> bool {
        !self.merging && self.registry.len() >= 2
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.merging {
            return Err(StitchError::SessionBusy);
        }
        Ok(())
    }

    /// See [`FileRegistry::add`].
    pub fn add<I>(&mut self, candidates: I) -> Result<AddOutcome>
    where
        I: IntoIterator<Item = SelectedFile>,
    {
        self.ensure_idle()?;
        Ok(self.registry.add(candidates))
    }

    /// See [`FileRegistry::remove`].
    pub fn remove(&mut self, position: usize) -> Result<Option<SelectedFile>> {
        self.ensure_idle()?;
        Ok(self.registry.remove(position))
    }

    /// See [`FileRegistry::reorder`].
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_idle()?;
        self.registry.reorder(from, to)?;
        Ok(())
    }

    /// Drop every selected file.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.registry.clear();
        Ok(())
    }

    /// Mark a merge as started and return the files to merge, in order.
    ///
    /// # Errors
    ///
    /// - [`StitchError::SessionBusy`] if a merge is already running
    /// - [`MergeError::NotEnoughFiles`] if fewer than two files are selected
    pub fn begin_merge(&mut self) -> Result<Vec<SelectedFile>> {
        self.ensure_idle()?;

        let count = self.registry.len();
        if count < 2 {
            return Err(MergeError::NotEnoughFiles { count }.into());
        }

        self.merging = true;
        debug!(files = count, "merge started");
        Ok(self.registry.snapshot())
    }

    /// Mark the running merge as finished.
    ///
    /// A successful merge resets the selection; a failed one leaves it as
    /// it was so the user can retry.
    pub fn finish_merge(&mut self, success: bool) {
        self.merging = false;
        if success {
            self.registry.clear();
        }
        debug!(success, remaining = self.registry.len(), "merge finished");
    }
}
