//! Projection of the registry into a displayable list.
//!
//! [`ListRenderer`] turns a [`FileRegistry`] into a [`ListView`]: one row
//! per entry, in registry order, each with a best-effort preview. A failed
//! preview never drops or reorders a row.
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::registry::{FileRegistry, SelectedFile};
//! use pdfstitch::render::ListRenderer;
//!
//! # async fn example(registry: FileRegistry) {
//! let view = ListRenderer::new().render(&registry).await;
//! for row in &view.rows {
//!     println!("{}. {} ({})", row.index, row.name, row.page_count_label());
//! }
//! # }
//! ```

pub mod escape;
pub mod html;
#[cfg(feature = "pdfium")]
pub mod pdfium;
pub mod preview;
pub mod raster;

pub use escape::escape_html;
#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumPreviewer;
pub use preview::{LopdfPreviewer, Preview, PreviewRenderer, Thumbnail, system_previewer};

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::task;
use tracing::warn;

use crate::config::DEFAULT_THUMBNAIL_HEIGHT;
use crate::error::{PreviewError, RegistryError};
use crate::registry::{FileRegistry, SelectedFile};
use crate::utils::format_file_size;

/// Message shown instead of the list when nothing is selected.
pub const EMPTY_LIST_MESSAGE: &str = "No PDFs selected yet. Add files to get started.";

/// Text shown in place of a preview that could not be produced.
pub const NO_PREVIEW_LABEL: &str = "No Preview";

/// Page-count text shown when the preview failed.
pub const PAGE_COUNT_ERROR_LABEL: &str = "Error";

/// How many previews are generated at once.
const DEFAULT_PREVIEW_CONCURRENCY: usize = 4;

/// `"1 Page"` or `"N Pages"`.
pub fn page_count_label(count: usize) -> String {
    if count == 1 {
        "1 Page".to_string()
    } else {
        format!("{count} Pages")
    }
}

/// Preview outcome for one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PreviewState {
    /// Preview produced.
    Ready(Preview),
    /// Preview failed; the row is still shown.
    Unavailable {
        /// Why the preview failed.
        reason: String,
    },
    /// Previews were not requested.
    Skipped,
}

/// One row of the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    /// 1-based display index.
    pub index: usize,
    /// 0-based registry position.
    pub position: usize,
    /// File name as selected.
    pub name: String,
    /// File name escaped for HTML.
    pub escaped_name: String,
    /// Accessible label of the removal control.
    pub remove_label: String,
    /// Size in bytes.
    pub size: u64,
    /// Preview outcome.
    pub preview: PreviewState,
}

impl RowView {
    fn new(position: usize, file: &SelectedFile, preview: PreviewState) -> Self {
        let escaped_name = escape_html(file.name());
        Self {
            index: position + 1,
            position,
            name: file.name().to_owned(),
            remove_label: format!("Remove {escaped_name}"),
            escaped_name,
            size: file.size(),
            preview,
        }
    }

    /// Page count text, `"Error"` when the preview failed.
    pub fn page_count_label(&self) -> String {
        match &self.preview {
            PreviewState::Ready(preview) => page_count_label(preview.page_count),
            PreviewState::Unavailable { .. } => PAGE_COUNT_ERROR_LABEL.to_string(),
            PreviewState::Skipped => String::new(),
        }
    }

    /// Human-readable size.
    pub fn size_label(&self) -> String {
        format_file_size(self.size)
    }

    /// Single terminal line for this row.
    pub fn to_line(&self) -> String {
        let mut line = format!("{}  ({})", self.name, self.size_label());
        match &self.preview {
            PreviewState::Ready(preview) => {
                line.push_str(&format!(
                    "  {}  [{}x{} @ {:.2}]",
                    page_count_label(preview.page_count),
                    preview.thumbnail.width,
                    preview.thumbnail.height,
                    preview.thumbnail.scale
                ));
            }
            PreviewState::Unavailable { .. } => {
                line.push_str(&format!("  {PAGE_COUNT_ERROR_LABEL}  [{NO_PREVIEW_LABEL}]"));
            }
            PreviewState::Skipped => {}
        }
        line
    }
}

/// The whole list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    /// Rows in registry order.
    pub rows: Vec<RowView>,
    /// Whether the merge control is enabled.
    pub merge_enabled: bool,
    /// Placeholder shown when there are no rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
    /// Sum of the sizes of all rows.
    pub total_size: u64,
}

impl ListView {
    fn from_rows(rows: Vec<RowView>) -> Self {
        Self {
            merge_enabled: rows.len() >= 2,
            empty_message: rows.is_empty().then(|| EMPTY_LIST_MESSAGE.to_string()),
            total_size: rows.iter().map(|r| r.size).sum(),
            rows,
        }
    }

    /// True when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Force the merge control off, e.g. while a merge is running.
    pub fn disable_merge(mut self) -> Self {
        self.merge_enabled = false;
        self
    }

    /// Terminal rendering, one line per row.
    pub fn to_lines(&self) -> Vec<String> {
        match &self.empty_message {
            Some(message) => vec![message.clone()],
            None => self
                .rows
                .iter()
                .map(|row| format!("{}. {}", row.index, row.to_line()))
                .collect(),
        }
    }

    /// HTML rendering.
    pub fn to_html(&self) -> String {
        html::to_html(self)
    }

    /// JSON rendering.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Renders registry state with previews from `P`.
#[derive(Debug, Clone)]
pub struct ListRenderer<P = LopdfPreviewer> {
    previewer: Arc<P>,
    thumbnail_height: f32,
    concurrency: usize,
    previews: bool,
}

impl ListRenderer<LopdfPreviewer> {
    /// Create a renderer with the `lopdf` previewer and default settings.
    pub fn new() -> Self {
        Self::with_previewer(LopdfPreviewer::new())
    }
}

impl Default for ListRenderer<LopdfPreviewer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PreviewRenderer> ListRenderer<P> {
    /// Create a renderer over `previewer`.
    pub fn with_previewer(previewer: P) -> Self {
        Self {
            previewer: Arc::new(previewer),
            thumbnail_height: DEFAULT_THUMBNAIL_HEIGHT,
            concurrency: DEFAULT_PREVIEW_CONCURRENCY,
            previews: true,
        }
    }

    /// Same settings, different previewer.
    pub fn replace_previewer<P2: PreviewRenderer>(&self, previewer: P2) -> ListRenderer<P2> {
        ListRenderer {
            previewer: Arc::new(previewer),
            thumbnail_height: self.thumbnail_height,
            concurrency: self.concurrency,
            previews: self.previews,
        }
    }

    /// Set the thumbnail height in pixels.
    pub fn thumbnail_height(mut self, height: f32) -> Self {
        self.thumbnail_height = height;
        self
    }

    /// Set how many previews run at once (at least one).
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Enable or disable preview generation.
    pub fn previews(mut self, enabled: bool) -> Self {
        self.previews = enabled;
        self
    }

    /// Render `registry` with previews.
    ///
    /// Previews run concurrently but rows keep registry order.
    pub async fn render(&self, registry: &FileRegistry) -> ListView {
        if !self.previews {
            return self.render_without_previews(registry);
        }

        let files = registry.snapshot();
        let previews: Vec<PreviewState> = stream::iter(files.iter().map(|file| self.preview(file)))
            .buffered(self.concurrency)
            .collect()
            .await;

        let rows = files
            .iter()
            .zip(previews)
            .enumerate()
            .map(|(position, (file, preview))| RowView::new(position, file, preview))
            .collect();
        ListView::from_rows(rows)
    }

    /// Render `registry` without touching any file contents.
    pub fn render_without_previews(&self, registry: &FileRegistry) -> ListView {
        let rows = registry
            .iter()
            .enumerate()
            .map(|(position, file)| RowView::new(position, file, PreviewState::Skipped))
            .collect();
        ListView::from_rows(rows)
    }

    /// Preview a single file, turning every failure into
    /// [`PreviewState::Unavailable`].
    pub async fn preview(&self, file: &SelectedFile) -> PreviewState {
        match self.try_preview(file).await {
            Ok(preview) => PreviewState::Ready(preview),
            Err(e) => {
                warn!(name = file.name(), error = %e, "preview unavailable");
                PreviewState::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_preview(&self, file: &SelectedFile) -> Result<Preview, PreviewError> {
        let bytes = file.read().await.map_err(|source| PreviewError::Read {
            name: file.name().to_owned(),
            source,
        })?;

        let previewer = Arc::clone(&self.previewer);
        let name = file.name().to_owned();
        let height = self.thumbnail_height;
        task::spawn_blocking(move || previewer.render(&name, &bytes, height))
            .await
            .map_err(|e| PreviewError::Task {
                reason: e.to_string(),
            })?
    }

    /// Reorder hook for direct manipulation: a row dragged from
    /// `old_index` was dropped at `new_index`.
    pub fn drop_row(
        registry: &mut FileRegistry,
        old_index: usize,
        new_index: usize,
    ) -> Result<(), RegistryError> {
        registry.reorder(old_index, new_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Previewer reporting the byte length as page count; `broken` fails.
    struct LengthPreviewer;

    impl PreviewRenderer for LengthPreviewer {
        fn render(
            &self,
            name: &str,
            bytes: &[u8],
            desired_height: f32,
        ) -> Result<Preview, PreviewError> {
            if bytes == b"broken" {
                return Err(PreviewError::Parse {
                    name: name.to_owned(),
                    reason: "bad xref".into(),
                });
            }
            let thumbnail = Thumbnail::fit(100.0, 200.0, desired_height).unwrap();
            Ok(Preview::new(bytes.len(), thumbnail))
        }
    }

    fn registry(files: &[(&str, &[u8])]) -> FileRegistry {
        let mut registry = FileRegistry::new();
        registry.add(
            files
                .iter()
                .map(|(name, bytes)| SelectedFile::from_bytes(*name, bytes.to_vec())),
        );
        registry
    }

    #[test]
    fn test_page_count_label() {
        assert_eq!(page_count_label(1), "1 Page");
        assert_eq!(page_count_label(0), "0 Pages");
        assert_eq!(page_count_label(12), "12 Pages");
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let view = ListRenderer::new().render(&FileRegistry::new()).await;
        assert!(view.is_empty());
        assert!(!view.merge_enabled);
        assert_eq!(view.empty_message.as_deref(), Some(EMPTY_LIST_MESSAGE));
        assert_eq!(view.to_lines(), [EMPTY_LIST_MESSAGE]);
    }

    #[tokio::test]
    async fn test_rows_follow_registry_order() {
        let registry = registry(&[("B.pdf", b"xx"), ("A.pdf", b"x"), ("C.pdf", b"xxx")]);
        let view = ListRenderer::with_previewer(LengthPreviewer)
            .concurrency(2)
            .render(&registry)
            .await;

        let names: Vec<_> = view.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["B.pdf", "A.pdf", "C.pdf"]);
        assert_eq!(view.rows[0].index, 1);
        assert_eq!(view.rows[2].position, 2);
        assert_eq!(view.rows[1].page_count_label(), "1 Page");
        assert_eq!(view.rows[2].page_count_label(), "3 Pages");
        assert!(view.merge_enabled);
        assert_eq!(view.total_size, 6);
    }

    #[tokio::test]
    async fn test_single_row_disables_merge() {
        let registry = registry(&[("A.pdf", b"x")]);
        let view = ListRenderer::with_previewer(LengthPreviewer).render(&registry).await;
        assert!(!view.merge_enabled);
        assert!(view.empty_message.is_none());
    }

    #[tokio::test]
    async fn test_failed_preview_keeps_row() {
        let registry = registry(&[("A.pdf", b"x"), ("bad.pdf", b"broken"), ("C.pdf", b"xx")]);
        let view = ListRenderer::with_previewer(LengthPreviewer).render(&registry).await;

        assert_eq!(view.rows.len(), 3);
        assert!(matches!(view.rows[1].preview, PreviewState::Unavailable { .. }));
        assert_eq!(view.rows[1].page_count_label(), "Error");
        assert!(view.rows[1].to_line().contains("No Preview"));
        assert_eq!(view.rows[0].page_count_label(), "1 Page");
        assert_eq!(view.rows[2].page_count_label(), "2 Pages");
    }

    #[tokio::test]
    async fn test_unreadable_file_is_unavailable() {
        let mut registry = FileRegistry::new();
        registry.add([SelectedFile::from_path_with_size("/nonexistent/gone.pdf".into(), 5)]);

        let view = ListRenderer::new().render(&registry).await;
        assert!(matches!(view.rows[0].preview, PreviewState::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_thumbnail_height_is_applied() {
        let registry = registry(&[("A.pdf", b"x")]);
        let view = ListRenderer::with_previewer(LengthPreviewer)
            .thumbnail_height(80.0)
            .render(&registry)
            .await;

        let PreviewState::Ready(preview) = &view.rows[0].preview else {
            panic!("expected a preview");
        };
        assert_eq!(preview.thumbnail.height, 80);
        assert_eq!(preview.thumbnail.width, 40);
    }

    #[test]
    fn test_render_without_previews_escapes_names() {
        let registry = registry(&[("<b>&'.pdf", b"x")]);
        let view = ListRenderer::new().render_without_previews(&registry);

        let row = &view.rows[0];
        assert_eq!(row.preview, PreviewState::Skipped);
        assert_eq!(row.escaped_name, "&lt;b&gt;&amp;&#039;.pdf");
        assert_eq!(row.remove_label, "Remove &lt;b&gt;&amp;&#039;.pdf");
        assert_eq!(row.page_count_label(), "");
    }

    #[tokio::test]
    async fn test_replace_previewer_keeps_settings() {
        let registry = registry(&[("A.pdf", b"xx")]);
        let renderer = ListRenderer::new()
            .thumbnail_height(80.0)
            .replace_previewer(LengthPreviewer);

        let view = renderer.render(&registry).await;
        let PreviewState::Ready(preview) = &view.rows[0].preview else {
            panic!("expected a preview");
        };
        assert_eq!(preview.page_count, 2);
        assert_eq!(preview.thumbnail.height, 80);

        let skipped = ListRenderer::new().previews(false).replace_previewer(LengthPreviewer);
        assert_eq!(
            skipped.render(&registry).await.rows[0].preview,
            PreviewState::Skipped
        );
    }

    #[test]
    fn test_drop_row_reorders() {
        let mut registry = registry(&[("A.pdf", b"x"), ("B.pdf", b"xx")]);
        ListRenderer::<LopdfPreviewer>::drop_row(&mut registry, 1, 0).unwrap();
        assert_eq!(registry.entry_at(0).unwrap().name(), "B.pdf");

        assert!(ListRenderer::<LopdfPreviewer>::drop_row(&mut registry, 5, 0).is_err());
    }

    #[test]
    fn test_json_is_camel_case() {
        let registry = registry(&[("A.pdf", b"x"), ("B.pdf", b"xx")]);
        let json = ListRenderer::new()
            .render_without_previews(&registry)
            .to_json()
            .unwrap();

        assert!(json.contains("\"mergeEnabled\": true"));
        assert!(json.contains("\"escapedName\""));
        assert!(json.contains("\"status\": \"skipped\""));
        assert!(!json.contains("emptyMessage"));
    }
}
