//! Command handlers.
//!
//! The [`Controller`] is what a front end talks to: it runs [`Command`]s
//! against the [`Session`], drives the merger, previewer and writer, and
//! reports every outcome through a [`Notifier`].

use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::command::Command;
use crate::config::{Config, OverwriteMode};
use crate::error::{MergeError, Result, StitchError};
use crate::io::{FileLoader, PdfWriter, WriteStatistics};
use crate::merge::{DocumentBackend, LopdfBackend, MergeStatistics, Merger};
use crate::output::notify::{Notification, Notifier};
use crate::registry::{AddOutcome, FileSource, SelectedFile};
use crate::render::{ListRenderer, ListView, LopdfPreviewer, PreviewRenderer};
use crate::session::Session;

/// Shown when fewer than two files are selected at merge time.
pub const NOT_ENOUGH_FILES_MESSAGE: &str = "Select at least 2 PDFs to merge.";

/// Shown when an add call selected nothing new.
pub const NOTHING_ADDED_MESSAGE: &str = "No new PDF files added or duplicates detected.";

/// What the front end should do after a command.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing further.
    Done,
    /// Display this list.
    Listed(ListView),
    /// Display usage.
    Help,
    /// A merge completed.
    Merged(MergeReport),
    /// The output exists; ask the user, then call
    /// [`Controller::merge`] again with [`OverwriteMode::Force`].
    ConfirmOverwrite(PathBuf),
    /// End the session.
    Quit,
}

/// Statistics of a completed merge and the write that followed.
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// Merge statistics.
    pub merge: MergeStatistics,
    /// Write statistics; `None` for a dry run.
    pub write: Option<WriteStatistics>,
}

/// Executes commands for one session.
pub struct Controller<N, B = LopdfBackend, P = LopdfPreviewer> {
    session: Session,
    loader: FileLoader,
    merger: Merger<B>,
    renderer: ListRenderer<P>,
    writer: PdfWriter,
    notifier: N,
    output: PathBuf,
    overwrite_mode: OverwriteMode,
    dry_run: bool,
}

impl<N: Notifier> Controller<N> {
    /// Create a controller with default collaborators.
    pub fn new(notifier: N) -> Self {
        Self::from_config(&Config::default(), notifier)
    }

    /// Create a controller configured from `config`.
    pub fn from_config(config: &Config, notifier: N) -> Self {
        Self {
            session: Session::new(),
            loader: FileLoader::new(),
            merger: Merger::with_backend(LopdfBackend::with_compression(config.compression)),
            renderer: ListRenderer::new()
                .thumbnail_height(config.thumbnail_height)
                .previews(!config.no_preview),
            writer: PdfWriter::new(),
            notifier,
            output: config.output.clone(),
            overwrite_mode: config.overwrite_mode,
            dry_run: config.dry_run,
        }
    }
}

impl<N, B, P> Controller<N, B, P>
where
    N: Notifier,
    B: DocumentBackend,
    P: PreviewRenderer,
{
    /// Replace the merger.
    pub fn with_merger<B2: DocumentBackend>(self, merger: Merger<B2>) -> Controller<N, B2, P> {
        Controller {
            session: self.session,
            loader: self.loader,
            merger,
            renderer: self.renderer,
            writer: self.writer,
            notifier: self.notifier,
            output: self.output,
            overwrite_mode: self.overwrite_mode,
            dry_run: self.dry_run,
        }
    }

    /// Replace the list renderer.
    pub fn with_renderer<P2: PreviewRenderer>(
        self,
        renderer: ListRenderer<P2>,
    ) -> Controller<N, B, P2> {
        Controller {
            session: self.session,
            loader: self.loader,
            merger: self.merger,
            renderer,
            writer: self.writer,
            notifier: self.notifier,
            output: self.output,
            overwrite_mode: self.overwrite_mode,
            dry_run: self.dry_run,
        }
    }

    /// Swap the previewer, keeping the renderer's settings.
    pub fn with_previewer<P2: PreviewRenderer>(self, previewer: P2) -> Controller<N, B, P2> {
        let renderer = self.renderer.replace_previewer(previewer);
        self.with_renderer(renderer)
    }

    /// Set the default output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Set the overwrite behavior.
    pub fn with_overwrite_mode(mut self, mode: OverwriteMode) -> Self {
        self.overwrite_mode = mode;
        self
    }

    /// The session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The default output path.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Run one command.
    ///
    /// Failures are notified before being returned, so callers only need
    /// the error to decide whether to continue.
    pub async fn execute(&mut self, command: Command) -> Result<Outcome> {
        debug!(?command, "executing command");
        match command {
            Command::Add(inputs) => self.add(&inputs).await.map(|_| Outcome::Done),
            Command::Remove(position) => self.remove(position).map(|_| Outcome::Done),
            Command::Move { from, to } => self.reorder(from, to).map(|()| Outcome::Done),
            Command::List => Ok(Outcome::Listed(self.list().await)),
            Command::Merge(output) => self.merge(output, self.overwrite_mode).await,
            Command::Clear => self.clear().map(|()| Outcome::Done),
            Command::Help => Ok(Outcome::Help),
            Command::Quit => Ok(Outcome::Quit),
        }
    }

    /// Parse and run one command line.
    pub async fn execute_line(&mut self, line: &str) -> Result<Outcome> {
        let command = Command::parse(line).inspect_err(|e| self.report(e))?;
        self.execute(command).await
    }

    /// Select files by path or glob pattern.
    pub async fn add<S: AsRef<str>>(&mut self, inputs: &[S]) -> Result<AddOutcome> {
        let candidates = self
            .loader
            .load_all(inputs)
            .await
            .inspect_err(|e| self.report(e))?;

        let outcome = self.session.add(candidates).inspect_err(|e| self.report(e))?;

        if outcome.added > 0 {
            self.notifier.notify(Notification::success(format!(
                "{} PDF file(s) added.",
                outcome.added
            )));
            if outcome.rejected() > 0 {
                self.notifier.notify(Notification::info(format!(
                    "{} file(s) skipped (not a PDF or already selected).",
                    outcome.rejected()
                )));
            }
        } else {
            self.notifier.notify(Notification::error(NOTHING_ADDED_MESSAGE));
        }

        Ok(outcome)
    }

    /// Remove the entry at a 0-based position; out of range is ignored.
    pub fn remove(&mut self, position: usize) -> Result<bool> {
        let removed = self.session.remove(position).inspect_err(|e| self.report(e))?;
        if removed.is_some() {
            self.notifier.notify(Notification::success("File removed"));
        }
        Ok(removed.is_some())
    }

    /// Move an entry between 0-based positions.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        self.session
            .reorder(from, to)
            .inspect_err(|e| self.report(e))?;
        self.notifier.notify(Notification::success("PDF order updated!"));
        Ok(())
    }

    /// Drop the whole selection.
    pub fn clear(&mut self) -> Result<()> {
        self.session.clear().inspect_err(|e| self.report(e))?;
        self.notifier.notify(Notification::success("List cleared"));
        Ok(())
    }

    /// Render the current list.
    pub async fn list(&self) -> ListView {
        let view = self.renderer.render(self.session.registry()).await;
        if self.session.is_merging() {
            view.disable_merge()
        } else {
            view
        }
    }

    /// Merge the selection into `output` (or the default output path).
    ///
    /// On success the selection is cleared; on any failure it is kept.
    pub async fn merge(
        &mut self,
        output: Option<PathBuf>,
        overwrite: OverwriteMode,
    ) -> Result<Outcome> {
        let output = output.unwrap_or_else(|| self.output.clone());

        if self.session.registry().len() < 2 {
            self.notifier.notify(Notification::error(NOT_ENOUGH_FILES_MESSAGE));
            return Err(MergeError::NotEnoughFiles {
                count: self.session.registry().len(),
            }
            .into());
        }

        if !self.dry_run && self.overwrites_input(&output).await {
            let err = StitchError::OutputIsInput { path: output };
            self.report(&err);
            return Err(err);
        }

        if !self.dry_run && self.writer.exists(&output).await {
            match overwrite {
                OverwriteMode::Force => {}
                OverwriteMode::Prompt => return Ok(Outcome::ConfirmOverwrite(output)),
                OverwriteMode::NoClobber => {
                    let err = StitchError::output_exists(output);
                    self.report(&err);
                    return Err(err);
                }
            }
        }

        if !self.dry_run {
            self.writer
                .can_write(&output)
                .await
                .inspect_err(|e| self.report_merge_failure(e))?;
        }

        let files = self.session.begin_merge().inspect_err(|e| self.report(e))?;
        let result = self.run_merge(&files, &output).await;
        self.session.finish_merge(result.is_ok() && !self.dry_run);

        match result {
            Ok(report) => {
                if self.dry_run {
                    self.notifier.notify(Notification::info(format!(
                        "Dry run: {} file(s), {} pages would be saved to {}",
                        report.merge.files_merged,
                        report.merge.total_pages,
                        output.display()
                    )));
                } else {
                    self.notifier.notify(Notification::success(format!(
                        "PDFs merged successfully and saved to {}",
                        output.display()
                    )));
                }
                Ok(Outcome::Merged(report))
            }
            Err(e) => {
                self.report_merge_failure(&e);
                Err(e)
            }
        }
    }

    async fn run_merge(&self, files: &[SelectedFile], output: &Path) -> Result<MergeReport> {
        let merged = self.merger.merge(files).await?;

        let write = if self.dry_run {
            None
        } else {
            Some(self.writer.save_with_stats(&merged.bytes, output).await?)
        };

        Ok(MergeReport {
            merge: merged.statistics,
            write,
        })
    }

    /// Whether `output` resolves to the same file as a selected path.
    async fn overwrites_input(&self, output: &Path) -> bool {
        let Ok(target) = tokio::fs::canonicalize(output).await else {
            return false;
        };

        for file in self.session.registry().iter() {
            if let FileSource::Path(path) = file.source()
                && tokio::fs::canonicalize(path).await.is_ok_and(|p| p == target)
            {
                return true;
            }
        }
        false
    }

    fn report(&self, err: &StitchError) {
        self.notifier.notify(Notification::error(err.to_string()));
    }

    fn report_merge_failure(&self, err: &StitchError) {
        error!(error = %err, "merge failed");
        self.notifier
            .notify(Notification::error(format!("Error merging PDFs: {err}")));
    }
}
