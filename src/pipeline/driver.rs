//! Preprocessing-variant selection.
//!
//! Runs the recognition pipeline across the variant catalog and applies the
//! acceptance rule: the first variant whose reconstructed text is long
//! enough wins outright; otherwise the longest partial result is kept. The
//! tie-break is length-only on purpose; no quality scoring is applied to
//! partial results.

use image::RgbImage;
use tracing::{debug, warn};

use super::{extract_tokens, group_tokens_into_lines, preprocessing_variants, reconstruct_text, Token};
use crate::backends::Recognizer;
use crate::core::PipelineConfig;

/// Outcome of a variant search.
#[derive(Debug, Clone)]
pub enum VariantSearch {
    /// A variant met the success threshold; later variants were never tried.
    Accepted {
        /// Label of the accepted variant.
        variant: &'static str,
        /// The reconstructed text, trimmed.
        text: String,
        /// The tokens behind the accepted text.
        tokens: Vec<Token>,
    },
    /// The catalog ran out; this is the longest partial result seen, which
    /// may be empty.
    Exhausted {
        /// The best partial text, trimmed.
        text: String,
        /// The tokens behind the best partial text.
        tokens: Vec<Token>,
    },
}

impl VariantSearch {
    /// The reconstructed text, regardless of outcome.
    pub fn text(&self) -> &str {
        match self {
            VariantSearch::Accepted { text, .. } | VariantSearch::Exhausted { text, .. } => text,
        }
    }

    /// True when a variant met the success threshold.
    pub fn is_accepted(&self) -> bool {
        matches!(self, VariantSearch::Accepted { .. })
    }

    /// Consumes the outcome into `(text, tokens)`.
    pub fn into_text_and_tokens(self) -> (String, Vec<Token>) {
        match self {
            VariantSearch::Accepted { text, tokens, .. }
            | VariantSearch::Exhausted { text, tokens } => (text, tokens),
        }
    }
}

/// Drives the recognition pipeline across preprocessing variants.
pub struct VariantDriver<'a> {
    recognizer: &'a dyn Recognizer,
    config: &'a PipelineConfig,
}

impl<'a> VariantDriver<'a> {
    /// Creates a driver over the given backend and configuration.
    pub fn new(recognizer: &'a dyn Recognizer, config: &'a PipelineConfig) -> Self {
        Self { recognizer, config }
    }

    /// Runs recognition, extraction, grouping, and reconstruction for each
    /// variant in catalog order until one is accepted or the catalog is
    /// exhausted.
    ///
    /// Backend failures are recovered here: the failing variant simply
    /// produces nothing and the search continues, since the remaining
    /// variants provide redundancy.
    pub fn run(&self, image: &RgbImage) -> VariantSearch {
        let mut best_text = String::new();
        let mut best_tokens: Vec<Token> = Vec::new();

        for variant in preprocessing_variants(image, self.config.max_side) {
            let raw = match self.recognizer.recognize(&variant.image) {
                Ok(raw) => Some(raw),
                Err(err) => {
                    warn!(
                        target: "pipeline",
                        backend = self.recognizer.name(),
                        variant = variant.label,
                        error = %err,
                        "recognition failed; variant produces nothing"
                    );
                    None
                }
            };

            let tokens = extract_tokens(raw, self.config.confidence_threshold);
            let lines = group_tokens_into_lines(tokens.clone());
            let text = reconstruct_text(&lines);

            if text.trim().chars().count() >= self.config.success_threshold {
                debug!(
                    target: "pipeline",
                    variant = variant.label,
                    chars = text.trim().chars().count(),
                    "variant accepted"
                );
                return VariantSearch::Accepted {
                    variant: variant.label,
                    text: text.trim().to_string(),
                    tokens,
                };
            }

            if text.chars().count() > best_text.chars().count() {
                best_text = text;
                best_tokens = tokens;
            }
        }

        debug!(
            target: "pipeline",
            chars = best_text.trim().chars().count(),
            "variant catalog exhausted; keeping best partial result"
        );
        VariantSearch::Exhausted {
            text: best_text.trim().to_string(),
            tokens: best_tokens,
        }
    }
}
