//! The document processor: top-level dispatch over the OCR pipeline.
//!
//! One processor is built per process lifetime; backend handles are acquired
//! once and shared across documents. Optional backends (entity extraction,
//! the plain-text cascade) degrade gracefully when absent.

use image::RgbImage;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use super::pdf::{is_pdf_path, StandardPdfBackend};
use super::result::{DocumentResult, PageResult};
use super::tables::TextLayerTableExtractor;
use crate::analysis::{detect_document_type, ImportantDetails, MAX_ENTITIES};
use crate::backends::{
    EntityExtractor, EntityLabel, LexicalEntityExtractor, PdfBackend, PlainTextRecognizer,
    Recognizer, TableExtractor, TesseractBackend, TesseractPlainText,
};
use crate::core::{DocError, PipelineConfig};
use crate::pipeline::{Token, VariantDriver, VariantSearch};
use crate::utils::normalize_input_path;

/// Builder for [`DocumentProcessor`].
///
/// Every backend slot has a concrete default; tests and alternative
/// deployments inject their own adapters.
#[derive(Default)]
pub struct DocumentProcessorBuilder {
    recognizer: Option<Arc<dyn Recognizer>>,
    // Nested options: the outer level distinguishes "unset, use the
    // standard adapter" from "explicitly disabled".
    plain_text_fallback: Option<Option<Arc<dyn PlainTextRecognizer>>>,
    entity_extractor: Option<Option<Arc<dyn EntityExtractor>>>,
    pdf_backend: Option<Arc<dyn PdfBackend>>,
    table_extractor: Option<Arc<dyn TableExtractor>>,
    config: Option<PipelineConfig>,
}

impl DocumentProcessorBuilder {
    /// Sets the recognition backend.
    pub fn recognizer(mut self, recognizer: Arc<dyn Recognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Sets the secondary plain-text recognizer used when the token
    /// pipeline comes up short.
    pub fn plain_text_fallback(mut self, fallback: Arc<dyn PlainTextRecognizer>) -> Self {
        self.plain_text_fallback = Some(Some(fallback));
        self
    }

    /// Disables the plain-text cascade entirely.
    pub fn without_plain_text_fallback(mut self) -> Self {
        self.plain_text_fallback = Some(None);
        self
    }

    /// Sets the entity extraction backend.
    pub fn entity_extractor(mut self, extractor: Arc<dyn EntityExtractor>) -> Self {
        self.entity_extractor = Some(Some(extractor));
        self
    }

    /// Disables entity extraction; details will carry empty entity lists.
    pub fn without_entity_extractor(mut self) -> Self {
        self.entity_extractor = Some(None);
        self
    }

    /// Sets the PDF backend.
    pub fn pdf_backend(mut self, backend: Arc<dyn PdfBackend>) -> Self {
        self.pdf_backend = Some(backend);
        self
    }

    /// Sets the table extraction backend.
    pub fn table_extractor(mut self, extractor: Arc<dyn TableExtractor>) -> Self {
        self.table_extractor = Some(extractor);
        self
    }

    /// Sets the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Validates the configuration and builds the processor, filling unset
    /// slots with the standard adapters.
    pub fn build(self) -> Result<DocumentProcessor, DocError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(DocumentProcessor {
            recognizer: self
                .recognizer
                .unwrap_or_else(|| Arc::new(TesseractBackend::new("eng"))),
            plain_text_fallback: match self.plain_text_fallback {
                Some(choice) => choice,
                None => Some(Arc::new(TesseractPlainText::new("eng"))),
            },
            entity_extractor: match self.entity_extractor {
                Some(choice) => choice,
                None => Some(Arc::new(LexicalEntityExtractor::new())),
            },
            pdf_backend: self
                .pdf_backend
                .unwrap_or_else(|| Arc::new(StandardPdfBackend::new())),
            table_extractor: self
                .table_extractor
                .unwrap_or_else(|| Arc::new(TextLayerTableExtractor::new())),
            config,
        })
    }
}

/// Processes documents end to end: path resolution, PDF/image dispatch,
/// OCR, and detail extraction.
pub struct DocumentProcessor {
    recognizer: Arc<dyn Recognizer>,
    plain_text_fallback: Option<Arc<dyn PlainTextRecognizer>>,
    entity_extractor: Option<Arc<dyn EntityExtractor>>,
    pdf_backend: Arc<dyn PdfBackend>,
    table_extractor: Arc<dyn TableExtractor>,
    config: PipelineConfig,
}

impl DocumentProcessor {
    /// Returns a builder with standard backends.
    pub fn builder() -> DocumentProcessorBuilder {
        DocumentProcessorBuilder::default()
    }

    /// The processor's pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes one document, given a file path or `file:///` URI.
    ///
    /// Never fails: problems surface in the result's `error` field.
    pub fn process(&self, input: &str) -> DocumentResult {
        let path = normalize_input_path(input);
        if !path.exists() {
            return DocumentResult::not_found(&path.to_string_lossy());
        }

        let result = if is_pdf_path(&path) {
            self.process_pdf(&path)
        } else {
            self.process_image(&path)
        };
        debug!(target: "document", %result, "document processed");
        result
    }

    fn process_pdf(&self, path: &Path) -> DocumentResult {
        let mut result = DocumentResult::new("pdf", file_name_of(path));

        // Cheap path for born-digital PDFs: accept the embedded text layer
        // page-for-page and skip rasterization entirely.
        match self.pdf_backend.extract_text_layer(path) {
            Ok(texts) => {
                let total: usize = texts.iter().map(|t| t.chars().count()).sum();
                if total > self.config.success_threshold {
                    result.full_text = texts.join("\n");
                    result.pages = texts
                        .into_iter()
                        .enumerate()
                        .map(|(index, text)| PageResult {
                            page_number: index + 1,
                            text,
                            tokens: Vec::new(),
                        })
                        .collect();
                    return result;
                }
                debug!(
                    target: "document",
                    chars = total,
                    "text layer below threshold; falling back to ocr"
                );
            }
            Err(err) => {
                warn!(target: "document", error = %err, "text layer extraction failed; falling back to ocr");
            }
        }

        match self.pdf_backend.rasterize(path, self.config.pdf_dpi) {
            Ok(pages) => {
                let mut page_texts = Vec::with_capacity(pages.len());
                for (index, image) in pages.iter().enumerate() {
                    let (text, tokens) = self.page_text(image);
                    page_texts.push(text.clone());
                    result.pages.push(PageResult {
                        page_number: index + 1,
                        text,
                        tokens,
                    });
                }
                result.full_text = page_texts.join("\n");
            }
            Err(err) => {
                warn!(target: "document", error = %err, "pdf rasterization failed");
                result.error = Some(err.to_string());
            }
        }

        // Best-effort side operation; a failure yields an empty table list
        // and never blocks text extraction.
        match self.table_extractor.extract_tables(path) {
            Ok(tables) => result.tables = tables,
            Err(err) => {
                debug!(target: "document", error = %err, "table extraction failed; ignoring");
            }
        }

        result
    }

    fn process_image(&self, path: &Path) -> DocumentResult {
        let mut result = DocumentResult::new("image", file_name_of(path));

        let image = match image::open(path) {
            Ok(decoded) => decoded.to_rgb8(),
            Err(err) => {
                let err = DocError::from(err);
                warn!(target: "document", error = %err, "image load failed");
                result.error = Some(err.to_string());
                return result;
            }
        };

        let (text, tokens) = self.page_text(&image);
        result.full_text = text.clone();
        result.pages.push(PageResult {
            page_number: 1,
            text,
            tokens,
        });
        result
    }

    /// Runs the variant pipeline on one page image, then the plain-text
    /// cascade when the token pipeline came up short.
    fn page_text(&self, image: &RgbImage) -> (String, Vec<Token>) {
        let driver = VariantDriver::new(self.recognizer.as_ref(), &self.config);
        match driver.run(image) {
            VariantSearch::Accepted { text, tokens, .. } => (text, tokens),
            VariantSearch::Exhausted { text, tokens } => {
                if let Some(fallback) = &self.plain_text_fallback {
                    match fallback.extract_plain_text(image) {
                        Ok(plain) => {
                            let plain = plain.trim();
                            if plain.chars().count() > text.chars().count() {
                                debug!(
                                    target: "document",
                                    chars = plain.chars().count(),
                                    "plain-text cascade beat the token pipeline"
                                );
                                return (plain.to_string(), Vec::new());
                            }
                        }
                        Err(err) => {
                            warn!(target: "document", error = %err, "plain-text cascade failed; keeping partial result");
                        }
                    }
                }
                (text, tokens)
            }
        }
    }

    /// Extracts the condensed important details from a processed result.
    ///
    /// An absent or failing entity backend yields empty entity lists, not an
    /// error.
    pub fn extract_important_details(&self, result: &DocumentResult) -> ImportantDetails {
        let text = &result.full_text;
        let document_type = detect_document_type(text);

        let (persons, organizations) = match &self.entity_extractor {
            Some(extractor) => match extractor.extract(text) {
                Ok(entities) => {
                    let persons = entities
                        .iter()
                        .filter(|e| e.label == EntityLabel::Person)
                        .map(|e| e.text.clone())
                        .take(MAX_ENTITIES)
                        .collect();
                    let organizations = entities
                        .iter()
                        .filter(|e| e.label == EntityLabel::Org)
                        .map(|e| e.text.clone())
                        .take(MAX_ENTITIES)
                        .collect();
                    (persons, organizations)
                }
                Err(err) => {
                    warn!(target: "document", error = %err, "entity extraction failed; omitting entities");
                    (Vec::new(), Vec::new())
                }
            },
            None => (Vec::new(), Vec::new()),
        };

        ImportantDetails {
            document_type,
            persons,
            organizations,
            raw_preview: ImportantDetails::preview_of(text),
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
