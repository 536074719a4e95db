//! Coarse document type detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse document categories, detected from keywords in the full text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Academic mark sheet or transcript.
    Marksheet,
    /// Invoice or bill.
    FinancialBill,
    /// Research paper.
    ResearchPaper,
    /// Contract or agreement.
    LegalDocument,
    /// Schedule or timeline.
    Schedule,
    /// Anything else.
    General,
}

impl DocumentKind {
    /// Stable string form, as used in output artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Marksheet => "marksheet",
            DocumentKind::FinancialBill => "financial_bill",
            DocumentKind::ResearchPaper => "research_paper",
            DocumentKind::LegalDocument => "legal_document",
            DocumentKind::Schedule => "schedule",
            DocumentKind::General => "general",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies text into a coarse category by keyword. First match wins, in
/// a fixed priority order.
pub fn detect_document_type(text: &str) -> DocumentKind {
    let low = text.to_lowercase();
    if low.contains("marksheet") || low.contains("roll no") {
        DocumentKind::Marksheet
    } else if low.contains("invoice") || low.contains("amount due") {
        DocumentKind::FinancialBill
    } else if low.contains("abstract") || low.contains("references") {
        DocumentKind::ResearchPaper
    } else if low.contains("contract") || low.contains("agreement") {
        DocumentKind::LegalDocument
    } else if low.contains("schedule") || low.contains("deadline") {
        DocumentKind::Schedule
    } else {
        DocumentKind::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_category() {
        assert_eq!(detect_document_type("Roll No: 42"), DocumentKind::Marksheet);
        assert_eq!(
            detect_document_type("INVOICE #123"),
            DocumentKind::FinancialBill
        );
        assert_eq!(
            detect_document_type("Abstract\nWe study..."),
            DocumentKind::ResearchPaper
        );
        assert_eq!(
            detect_document_type("This Agreement is made..."),
            DocumentKind::LegalDocument
        );
        assert_eq!(
            detect_document_type("Project deadline: Friday"),
            DocumentKind::Schedule
        );
        assert_eq!(detect_document_type("hello world"), DocumentKind::General);
    }

    #[test]
    fn earlier_categories_take_priority() {
        // "invoice" and "roll no" both present: marksheet wins.
        assert_eq!(
            detect_document_type("roll no 7, invoice attached"),
            DocumentKind::Marksheet
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            detect_document_type("AMOUNT DUE: $50"),
            DocumentKind::FinancialBill
        );
    }

    #[test]
    fn serializes_to_snake_case_strings() {
        let json = serde_json::to_string(&DocumentKind::FinancialBill).unwrap();
        assert_eq!(json, "\"financial_bill\"");
        assert_eq!(DocumentKind::LegalDocument.as_str(), "legal_document");
    }
}
