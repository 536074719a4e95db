//! Lexical entity extraction.
//!
//! A dependency-free NLP adapter used when no model-backed extractor is
//! available. It finds candidate person names (titled names, pairs of
//! capitalized words) and organization names (capitalized phrases ending in
//! a corporate or institutional suffix) with compiled-once regexes. Precision
//! is deliberately favored over recall; downstream consumers only keep the
//! first few entities anyway.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::{Entity, EntityExtractor, EntityLabel};
use crate::core::DocError;

static TITLED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Mr|Mrs|Ms|Dr|Prof)\.?\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,2}")
        .expect("titled-name pattern")
});

static PLAIN_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z]\.)?\s+[A-Z][a-z]+\b").expect("plain-name pattern")
});

static ORG_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:[A-Z][A-Za-z&]+\s+)+(?:Inc|Ltd|LLC|Corp|Corporation|Company|University|College|Institute|Bank|Department|Ministry|Agency|Association|Foundation)\b\.?",
    )
    .expect("org-name pattern")
});

/// First words that disqualify a plain two-word candidate from being a name.
const NAME_STOPWORDS: &[&str] = &[
    "The", "This", "That", "These", "Those", "New", "North", "South", "East", "West", "United",
    "Total", "Amount", "Invoice", "Page", "Dear", "Best", "Kind",
];

/// Heuristic, regex-based entity extractor.
#[derive(Debug, Default, Clone)]
pub struct LexicalEntityExtractor;

impl LexicalEntityExtractor {
    /// Creates a new lexical extractor.
    pub fn new() -> Self {
        Self
    }
}

impl EntityExtractor for LexicalEntityExtractor {
    fn extract(&self, text: &str) -> Result<Vec<Entity>, DocError> {
        let mut entities = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        // Organizations first: their surface text often embeds name-shaped
        // word pairs that must not double as persons.
        let mut org_spans: Vec<(usize, usize)> = Vec::new();
        for m in ORG_NAME.find_iter(text) {
            org_spans.push((m.start(), m.end()));
            let surface = m.as_str().trim_end_matches('.').to_string();
            if seen.insert(surface.clone()) {
                entities.push(Entity {
                    text: surface,
                    label: EntityLabel::Org,
                });
            }
        }

        for m in TITLED_NAME.find_iter(text) {
            if overlaps(&org_spans, m.start(), m.end()) {
                continue;
            }
            let surface = m.as_str().to_string();
            if seen.insert(surface.clone()) {
                entities.push(Entity {
                    text: surface,
                    label: EntityLabel::Person,
                });
            }
        }

        for m in PLAIN_NAME.find_iter(text) {
            if overlaps(&org_spans, m.start(), m.end()) {
                continue;
            }
            let surface = m.as_str();
            let first_word = surface.split_whitespace().next().unwrap_or("");
            if NAME_STOPWORDS.contains(&first_word) {
                continue;
            }
            if seen.insert(surface.to_string()) {
                entities.push(Entity {
                    text: surface.to_string(),
                    label: EntityLabel::Person,
                });
            }
        }

        Ok(entities)
    }
}

fn overlaps(spans: &[(usize, usize)], start: usize, end: usize) -> bool {
    spans.iter().any(|&(s, e)| start < e && end > s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(text: &str) -> Vec<(String, EntityLabel)> {
        LexicalEntityExtractor::new()
            .extract(text)
            .unwrap()
            .into_iter()
            .map(|e| (e.text, e.label))
            .collect()
    }

    #[test]
    fn finds_titled_person() {
        let found = labels("Please contact Dr. Jane Smith for details.");
        assert!(found
            .iter()
            .any(|(t, l)| t == "Dr. Jane Smith" && *l == EntityLabel::Person));
    }

    #[test]
    fn finds_org_with_suffix() {
        let found = labels("Payment due to Acme Widget Corp by Friday.");
        assert!(found
            .iter()
            .any(|(t, l)| t == "Acme Widget Corp" && *l == EntityLabel::Org));
    }

    #[test]
    fn org_words_do_not_double_as_person() {
        let found = labels("Stanford University announced the results.");
        assert!(found
            .iter()
            .all(|(t, l)| !(t.contains("Stanford") && *l == EntityLabel::Person)));
    }

    #[test]
    fn stopword_pairs_are_not_persons() {
        let found = labels("Total Amount due this month: New York office.");
        assert!(found.iter().all(|(_, l)| *l != EntityLabel::Person));
    }

    #[test]
    fn duplicates_collapse_in_order() {
        let found = labels("John Carter met John Carter and Mary Olsen.");
        let persons: Vec<_> = found
            .iter()
            .filter(|(_, l)| *l == EntityLabel::Person)
            .collect();
        assert_eq!(persons.len(), 2);
        assert_eq!(persons[0].0, "John Carter");
        assert_eq!(persons[1].0, "Mary Olsen");
    }

    #[test]
    fn empty_text_yields_no_entities() {
        assert!(labels("").is_empty());
    }
}
