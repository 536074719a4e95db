//! PDF backend: embedded text layer and page rasterization.
//!
//! The text layer is read with `lopdf` (pure Rust, always available); page
//! rasterization binds PDFium lazily, so documents that never need OCR work
//! without the native library installed.

use image::RgbImage;
use lopdf::Document;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

use crate::backends::PdfBackend;
use crate::core::DocError;

/// Rendering limits for rasterized pages.
#[derive(Debug, Clone)]
pub struct PdfRenderSettings {
    /// Maximum dimension for rendered page images.
    pub max_dimension: u32,
}

impl Default for PdfRenderSettings {
    fn default() -> Self {
        Self {
            max_dimension: 4000,
        }
    }
}

/// Standard PDF backend: `lopdf` text layer, PDFium rasterization.
#[derive(Debug, Clone, Default)]
pub struct StandardPdfBackend {
    settings: PdfRenderSettings,
}

impl StandardPdfBackend {
    /// Creates a backend with default render settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend with the given render settings.
    pub fn with_settings(settings: PdfRenderSettings) -> Self {
        Self { settings }
    }

    fn bind_pdfium() -> Result<Pdfium, DocError> {
        // Try common install locations before the system loader.
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("/usr/lib"))
            })
            .or_else(|_| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                    "/usr/local/lib",
                ))
            })
            .or_else(|_| Pdfium::bind_to_system_library())
            .map(Pdfium::new)
            .map_err(|e| DocError::Pdf(format!("could not find PDFium library: {e}")))
    }

    fn render_page(&self, page: &PdfPage, dpi: f32) -> Result<RgbImage, DocError> {
        let width_points = page.width().value;
        let height_points = page.height().value;

        // Points are 1/72 inch.
        let scale = dpi / 72.0;
        let mut width_px = (width_points * scale) as u32;
        let mut height_px = (height_points * scale) as u32;

        if width_px > self.settings.max_dimension || height_px > self.settings.max_dimension {
            let ratio = if width_px > height_px {
                self.settings.max_dimension as f32 / width_px as f32
            } else {
                self.settings.max_dimension as f32 / height_px as f32
            };
            width_px = (width_px as f32 * ratio) as u32;
            height_px = (height_px as f32 * ratio) as u32;
        }

        let render_config = PdfRenderConfig::new()
            .set_target_width(width_px as i32)
            .set_target_height(height_px as i32)
            .render_form_data(true)
            .render_annotations(true);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| DocError::Pdf(format!("page render failed: {e}")))?;

        Ok(bitmap.as_image().to_rgb8())
    }
}

impl PdfBackend for StandardPdfBackend {
    fn extract_text_layer(&self, path: &Path) -> Result<Vec<String>, DocError> {
        let document =
            Document::load(path).map_err(|e| DocError::Pdf(format!("load failed: {e}")))?;

        let mut page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        page_numbers.sort_unstable();

        let texts = page_numbers
            .iter()
            .map(|page| document.extract_text(&[*page]).unwrap_or_default())
            .collect::<Vec<_>>();

        debug!(
            target: "document",
            pages = texts.len(),
            chars = texts.iter().map(|t| t.chars().count()).sum::<usize>(),
            "extracted pdf text layer"
        );
        Ok(texts)
    }

    fn rasterize(&self, path: &Path, dpi: f32) -> Result<Vec<RgbImage>, DocError> {
        let pdfium = Self::bind_pdfium()?;
        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| DocError::Pdf(format!("load failed: {e}")))?;

        let page_count = document.pages().len();
        if page_count == 0 {
            return Err(DocError::Pdf("pdf has no pages".to_string()));
        }

        let mut images = Vec::with_capacity(page_count as usize);
        for (index, page) in document.pages().iter().enumerate() {
            let image = self
                .render_page(&page, dpi)
                .map_err(|e| DocError::Pdf(format!("page {}: {e}", index + 1)))?;
            images.push(image);
        }

        debug!(target: "document", pages = images.len(), dpi, "rasterized pdf");
        Ok(images)
    }
}

/// Check if a file path has a PDF extension.
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_ascii_lowercase() == "pdf")
        .unwrap_or(false)
}
