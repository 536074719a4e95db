//! Important-detail extraction.

use serde::{Deserialize, Serialize};

use super::DocumentKind;

/// Number of characters kept in the raw text preview.
pub const PREVIEW_CHARS: usize = 800;

/// Maximum entities reported per label.
pub const MAX_ENTITIES: usize = 5;

/// The condensed, downstream-facing summary of one processed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportantDetails {
    /// Coarse document category.
    pub document_type: DocumentKind,
    /// Up to five detected person names, in document order.
    pub persons: Vec<String>,
    /// Up to five detected organization names, in document order.
    pub organizations: Vec<String>,
    /// The first 800 characters of the full text.
    pub raw_preview: String,
}

impl ImportantDetails {
    /// Builds the preview string from full text.
    pub fn preview_of(text: &str) -> String {
        text.chars().take(PREVIEW_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_caps_at_limit_on_char_boundaries() {
        let text = "ß".repeat(1000);
        let preview = ImportantDetails::preview_of(&text);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS);
    }

    #[test]
    fn short_text_previews_whole() {
        assert_eq!(ImportantDetails::preview_of("short"), "short");
    }
}
