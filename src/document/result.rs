//! Result types for document processing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pipeline::Token;

/// Extraction results for a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-based page number.
    pub page_number: usize,
    /// Reconstructed text for this page.
    pub text: String,
    /// The recognition tokens behind the text. Empty when the text came
    /// from a PDF's embedded text layer.
    pub tokens: Vec<Token>,
}

/// A table-like region pulled from a PDF, best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRegion {
    /// 1-based page number the table was found on.
    pub page: u32,
    /// Row-major cell text.
    pub rows: Vec<Vec<String>>,
}

/// Result of processing one document.
///
/// Built once per top-level invocation and immutable once returned. A
/// failure never aborts processing; it lands in [`DocumentResult::error`]
/// instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    /// `"pdf"` or `"image"`; empty when the input path did not resolve.
    pub file_type: String,
    /// The input's file name, without directories.
    pub file_name: String,
    /// Per-page extraction results, in page order.
    pub pages: Vec<PageResult>,
    /// Tables found in the document (PDF OCR path only).
    pub tables: Vec<TableRegion>,
    /// All page texts joined with newlines.
    pub full_text: String,
    /// Structured error description, when something went wrong.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentResult {
    /// Creates an empty result for the given file type and name.
    pub fn new(file_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            file_type: file_type.into(),
            file_name: file_name.into(),
            pages: Vec::new(),
            tables: Vec::new(),
            full_text: String::new(),
            error: None,
        }
    }

    /// Creates the structured result for a path that does not exist.
    pub fn not_found(path: &str) -> Self {
        let mut result = Self::new("", "");
        result.error = Some(format!("File not found: {path}"));
        result
    }

    /// Total number of recognition tokens across all pages.
    pub fn token_count(&self) -> usize {
        self.pages.iter().map(|p| p.tokens.len()).sum()
    }
}

impl fmt::Display for DocumentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}': {} page(s), {} token(s), {} chars",
            if self.file_type.is_empty() {
                "document"
            } else {
                &self.file_type
            },
            self.file_name,
            self.pages.len(),
            self.token_count(),
            self.full_text.chars().count()
        )?;
        if let Some(error) = &self.error {
            write!(f, " [error: {error}]")?;
        }
        Ok(())
    }
}
