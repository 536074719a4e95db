//! Document-level orchestration.
//!
//! Thin dispatch over the per-image pipeline: PDFs try the cheap embedded
//! text layer before rasterizing, images run the pipeline once, and every
//! external failure is downgraded to a structured field on the result.

pub mod pdf;
pub mod processor;
pub mod result;
pub mod tables;

pub use pdf::StandardPdfBackend;
pub use processor::{DocumentProcessor, DocumentProcessorBuilder};
pub use result::{DocumentResult, PageResult, TableRegion};
pub use tables::TextLayerTableExtractor;
