//! First-page thumbnails drawn by PDFium.
//!
//! PDFium is loaded at runtime. [`PdfiumPreviewer::bind`] looks for the
//! shared library named by `PDFSTITCH_PDFIUM_LIB`, then next to the
//! executable, then in the working directory, and finally on the system
//! library path.

use std::env;
use std::path::Path;

use anyhow::Context;
use pdfium_render::prelude::{PdfBitmapFormat, PdfRenderConfig, Pdfium};
use tracing::debug;

use super::preview::{Preview, PreviewRenderer, Thumbnail};
use super::raster::{bgra_to_rgba, encode_png};
use crate::error::PreviewError;

/// Environment variable naming the PDFium library to load.
pub const PDFIUM_LIBRARY_ENV: &str = "PDFSTITCH_PDFIUM_LIB";

/// [`PreviewRenderer`] that rasterizes the first page with PDFium.
pub struct PdfiumPreviewer {
    pdfium: Pdfium,
}

impl PdfiumPreviewer {
    /// Bind PDFium from the usual locations.
    pub fn bind() -> anyhow::Result<Self> {
        if let Ok(path) = env::var(PDFIUM_LIBRARY_ENV) {
            return Self::bind_to(Path::new(&path));
        }

        let mut candidates = Vec::new();
        if let Ok(exe) = env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(Pdfium::pdfium_platform_library_name_at_path(dir));
        }
        candidates.push(Pdfium::pdfium_platform_library_name_at_path(Path::new(".")));

        for path in candidates {
            if let Ok(bindings) = Pdfium::bind_to_library(&path) {
                debug!(path = %path.display(), "bound pdfium");
                return Ok(Self {
                    pdfium: Pdfium::new(bindings),
                });
            }
        }

        let bindings = Pdfium::bind_to_system_library()
            .map_err(|err| anyhow::anyhow!(err))
            .context("PDFium library not found")?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Bind the PDFium library at `path`.
    pub fn bind_to(path: &Path) -> anyhow::Result<Self> {
        let bindings = Pdfium::bind_to_library(path)
            .map_err(|err| anyhow::anyhow!(err))
            .with_context(|| format!("Failed to load PDFium from {}", path.display()))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PreviewRenderer for PdfiumPreviewer {
    fn render(
        &self,
        name: &str,
        bytes: &[u8],
        desired_height: f32,
    ) -> Result<Preview, PreviewError> {
        let failed = |reason: String| PreviewError::Render {
            name: name.to_owned(),
            reason,
        };

        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| PreviewError::Parse {
                name: name.to_owned(),
                reason: e.to_string(),
            })?;

        let pages = document.pages();
        let page_count = pages.len() as usize;
        if page_count == 0 {
            return Err(PreviewError::NoPages {
                name: name.to_owned(),
            });
        }

        let page = pages.get(0).map_err(|e| failed(e.to_string()))?;
        let (width, height) = (page.width().value, page.height().value);
        let thumbnail = Thumbnail::fit(width, height, desired_height)
            .ok_or_else(|| failed(format!("degenerate page size {width}x{height}")))?;

        let config = PdfRenderConfig::new()
            .set_target_height(thumbnail.height as i32)
            .render_form_data(false)
            .set_format(PdfBitmapFormat::BGRA);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| failed(e.to_string()))?;

        let (bitmap_width, bitmap_height) =
            (bitmap.width().max(0) as u32, bitmap.height().max(0) as u32);
        let rgba = bgra_to_rgba(&bitmap.as_raw_bytes(), bitmap_width, bitmap_height);
        let png =
            encode_png(rgba, bitmap_width, bitmap_height).map_err(|e| failed(e.to_string()))?;

        Ok(Preview::new(page_count, thumbnail).with_png(png))
    }
}
