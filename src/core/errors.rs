//! Core error types for the document pipeline.
//!
//! This module defines the crate-wide `DocError` enum. Every external-library
//! failure point in the pipeline is caught at its call boundary and either
//! recovered locally (backend failures substitute an empty result) or
//! reported through the result object's `error` field; nothing here is meant
//! to abort the process.

use thiserror::Error;

/// Convenience alias for pipeline results.
pub type DocResult<T> = Result<T, DocError>;

/// Errors that can occur while processing a document.
#[derive(Error, Debug)]
pub enum DocError {
    /// The input image could not be decoded. Fatal for that image; reported
    /// in the result's `error` field, no retry.
    #[error("image decode failed: {0}")]
    ImageDecode(#[source] image::ImageError),

    /// A recognition or NLP backend invocation failed. Recovered locally by
    /// substituting an empty result and continuing.
    #[error("backend '{backend}' failed: {message}")]
    Backend {
        /// Name of the backend that failed.
        backend: String,
        /// Short description of what went wrong.
        message: String,
    },

    /// The resolved input path does not exist. Surfaces as a structured
    /// error object, not a process failure.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The normalized path that was checked.
        path: String,
    },

    /// PDF loading, text extraction, or rasterization failed.
    #[error("pdf: {0}")]
    Pdf(String),

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for DocError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageDecode(error)
    }
}

impl DocError {
    /// Creates a backend invocation error with context.
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error for invalid field values.
    pub fn invalid_field(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Config {
            message: format!(
                "invalid value for field '{}': expected {}, got {}",
                field.into(),
                expected.into(),
                actual.into()
            ),
        }
    }

    /// Creates a file-not-found error for the given normalized path.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_message_carries_path() {
        let err = DocError::file_not_found("/tmp/missing.pdf");
        assert_eq!(err.to_string(), "File not found: /tmp/missing.pdf");
    }

    #[test]
    fn invalid_field_formats_expectation() {
        let err = DocError::invalid_field("confidence_threshold", "value in [0, 1]", "1.5");
        assert!(matches!(err, DocError::Config { .. }));
        assert!(err.to_string().contains("confidence_threshold"));
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn backend_error_names_the_backend() {
        let err = DocError::backend("tesseract", "binary not on PATH");
        assert!(err.to_string().contains("tesseract"));
    }
}
