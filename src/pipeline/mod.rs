//! The per-image OCR pipeline.
//!
//! Raw recognition output flows through four deterministic stages:
//!
//! 1. [`preprocess`] - produce a fixed catalog of image variants
//! 2. [`tokens`] - normalize backend output into confidence-filtered tokens
//! 3. [`lines`] - cluster tokens into reading-order lines
//! 4. [`reconstruct`] - order tokens within lines and infer word spacing
//!
//! [`driver`] runs the stages across preprocessing variants and applies the
//! first-acceptable / best-partial selection rule.

pub mod driver;
pub mod lines;
pub mod preprocess;
pub mod reconstruct;
pub mod tokens;

pub use driver::{VariantDriver, VariantSearch};
pub use lines::group_tokens_into_lines;
pub use preprocess::{preprocessing_variants, PreprocessVariant};
pub use reconstruct::reconstruct_text;
pub use tokens::{extract_tokens, Token};

/// Median of a slice of finite values. The slice is copied and sorted; even
/// counts average the two middle values.
pub(crate) fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
