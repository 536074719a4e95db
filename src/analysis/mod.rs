//! Document analysis over reconstructed text.
//!
//! Consumes the final full text as plain input: a coarse keyword-based
//! document classification and a small set of important details (entities
//! and a preview) for downstream consumers.

pub mod details;
pub mod doc_type;

pub use details::{ImportantDetails, MAX_ENTITIES, PREVIEW_CHARS};
pub use doc_type::{detect_document_type, DocumentKind};
