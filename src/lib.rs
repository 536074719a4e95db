//! # scandoc
//!
//! A Rust library that extracts text from scanned or digitally-authored
//! documents (images and PDFs) and reconstructs readable text from raw OCR
//! output.
//!
//! ## Features
//!
//! - Token-to-text reconstruction: spatially scattered recognition tokens are
//!   regrouped into reading-order lines with inferred inter-word spacing
//! - Preprocessing variant cascade to maximize recognition odds on degraded
//!   scans (contrast equalization, denoising, thresholding, inversion)
//! - Cheap text-layer path for born-digital PDFs, OCR fallback for scans
//! - Coarse document classification and lightweight entity extraction
//!
//! ## Modules
//!
//! * [`core`] - Error handling and pipeline configuration
//! * [`backends`] - Recognition, NLP, and PDF backend boundaries
//! * [`pipeline`] - The per-image OCR pipeline (preprocess, extract, group,
//!   reconstruct, variant selection)
//! * [`document`] - Document-level dispatch and result types
//! * [`analysis`] - Document type detection and important-detail extraction
//! * [`utils`] - Path normalization and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scandoc::document::DocumentProcessor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let processor = DocumentProcessor::builder().build()?;
//! let result = processor.process("file:///home/user/scan.pdf");
//!
//! println!("{}", result.full_text);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod backends;
pub mod core;
pub mod document;
pub mod pipeline;
pub mod utils;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::analysis::{detect_document_type, DocumentKind, ImportantDetails};
    pub use crate::backends::{
        Entity, EntityExtractor, EntityLabel, PdfBackend, PlainTextRecognizer, QuadDetection,
        RawRecognition, RecognitionRecord, Recognizer, TableExtractor,
    };
    pub use crate::core::{DocError, PipelineConfig};
    pub use crate::document::{DocumentProcessor, DocumentResult, PageResult, TableRegion};
    pub use crate::pipeline::{Token, VariantSearch};
}
