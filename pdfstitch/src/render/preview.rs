//! Per-file previews.
//!
//! A preview is the page count of a document, the geometry of a thumbnail
//! of its first page and, when a rasterizer is available, that thumbnail as
//! PNG. [`LopdfPreviewer`] only measures; the `pdfium` feature adds
//! `PdfiumPreviewer`, which draws.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use lopdf::Document;
use serde::{Serialize, Serializer};

use crate::error::PreviewError;
use crate::merge::pages::page_size;

/// Page size assumed when a page declares no usable `MediaBox` (US Letter).
const FALLBACK_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Geometry of a first-page thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    /// Factor applied to the page size.
    pub scale: f32,
    /// Rendered width in pixels.
    pub width: u32,
    /// Rendered height in pixels.
    pub height: u32,
}

impl Thumbnail {
    /// Fit a `page_width` x `page_height` page to `desired_height` pixels.
    ///
    /// Returns `None` for degenerate pages.
    pub fn fit(page_width: f32, page_height: f32, desired_height: f32) -> Option<Self> {
        if !(page_width > 0.0 && page_height > 0.0 && desired_height > 0.0) {
            return None;
        }

        let scale = desired_height / page_height;
        Some(Self {
            scale,
            width: (page_width * scale).round() as u32,
            height: (page_height * scale).round() as u32,
        })
    }
}

/// What the list shows for a successfully previewed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    /// Number of pages in the document.
    pub page_count: usize,
    /// First-page thumbnail.
    pub thumbnail: Thumbnail,
    /// The thumbnail encoded as PNG, if the previewer rasterizes.
    #[serde(
        rename = "image",
        skip_serializing_if = "Option::is_none",
        serialize_with = "png_as_base64"
    )]
    pub png: Option<Vec<u8>>,
}

impl Preview {
    /// A preview without image data.
    pub fn new(page_count: usize, thumbnail: Thumbnail) -> Self {
        Self {
            page_count,
            thumbnail,
            png: None,
        }
    }

    /// Attach the rendered thumbnail.
    pub fn with_png(mut self, png: Vec<u8>) -> Self {
        self.png = Some(png);
        self
    }

    /// The thumbnail as a `data:` URL usable in an `<img src>`.
    pub fn data_url(&self) -> Option<String> {
        self.png
            .as_ref()
            .map(|png| format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }
}

fn png_as_base64<S: Serializer>(png: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    match png {
        Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
        None => serializer.serialize_none(),
    }
}

/// Produces previews from raw document bytes.
///
/// Implementations are called from blocking threads.
pub trait PreviewRenderer: Send + Sync + 'static {
    /// Preview `bytes`, scaling the first page to `desired_height` pixels.
    ///
    /// `name` is only used in error messages.
    fn render(
        &self,
        name: &str,
        bytes: &[u8],
        desired_height: f32,
    ) -> Result<Preview, PreviewError>;
}

impl PreviewRenderer for Box<dyn PreviewRenderer> {
    fn render(
        &self,
        name: &str,
        bytes: &[u8],
        desired_height: f32,
    ) -> Result<Preview, PreviewError> {
        (**self).render(name, bytes, desired_height)
    }
}

/// The best previewer this build can offer.
///
/// With the `pdfium` feature this is a `PdfiumPreviewer` when the PDFium
/// library can be bound. Otherwise it is a
/// [`LopdfPreviewer`] and previews carry no image.
pub fn system_previewer() -> Box<dyn PreviewRenderer> {
    #[cfg(feature = "pdfium")]
    {
        match super::pdfium::PdfiumPreviewer::bind() {
            Ok(previewer) => return Box::new(previewer),
            Err(e) => tracing::debug!(error = %e, "pdfium unavailable, previews carry no image"),
        }
    }

    Box::new(LopdfPreviewer::new())
}

/// [`PreviewRenderer`] that parses with `lopdf` and measures the first page.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfPreviewer;

impl LopdfPreviewer {
    /// Create a previewer.
    pub fn new() -> Self {
        Self
    }
}

impl PreviewRenderer for LopdfPreviewer {
    fn render(
        &self,
        name: &str,
        bytes: &[u8],
        desired_height: f32,
    ) -> Result<Preview, PreviewError> {
        let doc = Document::load_mem(bytes).map_err(|e| PreviewError::Parse {
            name: name.to_owned(),
            reason: e.to_string(),
        })?;

        let pages = doc.get_pages();
        let Some(&first) = pages.values().next() else {
            return Err(PreviewError::NoPages {
                name: name.to_owned(),
            });
        };

        let (width, height) = page_size(&doc, first).unwrap_or(FALLBACK_PAGE_SIZE);
        let thumbnail = Thumbnail::fit(width, height, desired_height).ok_or_else(|| {
            PreviewError::Parse {
                name: name.to_owned(),
                reason: format!("degenerate page size {width}x{height}"),
            }
        })?;

        Ok(Preview::new(pages.len(), thumbnail))
    }
}
