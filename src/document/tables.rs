//! Best-effort table extraction from the PDF text layer.
//!
//! Looks for runs of consecutive lines that split into multiple cells on
//! tabs or wide space runs. This is deliberately shallow: tables are opaque
//! to the rest of the system, and any failure here yields an empty list
//! rather than blocking text extraction.

use lopdf::Document;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use super::TableRegion;
use crate::backends::TableExtractor;
use crate::core::DocError;

static CELL_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t|\s{2,}").expect("cell pattern"));

/// Minimum cells per row for a line to look tabular.
const MIN_CELLS: usize = 2;
/// Minimum consecutive tabular lines to report a table.
const MIN_ROWS: usize = 2;

/// Table extractor over the embedded text layer.
#[derive(Debug, Default, Clone)]
pub struct TextLayerTableExtractor;

impl TextLayerTableExtractor {
    /// Creates a new text-layer table extractor.
    pub fn new() -> Self {
        Self
    }
}

impl TableExtractor for TextLayerTableExtractor {
    fn extract_tables(&self, path: &Path) -> Result<Vec<TableRegion>, DocError> {
        let document =
            Document::load(path).map_err(|e| DocError::Pdf(format!("load failed: {e}")))?;

        let mut page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        page_numbers.sort_unstable();

        let mut tables = Vec::new();
        for page in page_numbers {
            let Ok(text) = document.extract_text(&[page]) else {
                continue;
            };
            tables.extend(detect_tables(page, &text));
        }
        Ok(tables)
    }
}

/// Splits one text line into cells on tabs or runs of 2+ spaces.
fn split_cells(line: &str) -> Vec<String> {
    CELL_SEPARATOR
        .split(line.trim())
        .filter(|cell| !cell.is_empty())
        .map(|cell| cell.to_string())
        .collect()
}

/// Finds runs of consecutive multi-cell lines in one page's text.
fn detect_tables(page: u32, text: &str) -> Vec<TableRegion> {
    let mut tables = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    let mut flush = |rows: &mut Vec<Vec<String>>| {
        if rows.len() >= MIN_ROWS {
            tables.push(TableRegion {
                page,
                rows: std::mem::take(rows),
            });
        } else {
            rows.clear();
        }
    };

    for line in text.lines() {
        let cells = split_cells(line);
        if cells.len() >= MIN_CELLS {
            rows.push(cells);
        } else {
            flush(&mut rows);
        }
    }
    flush(&mut rows);

    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_tabs_and_wide_space_runs() {
        assert_eq!(split_cells("a\tb  c"), vec!["a", "b", "c"]);
        assert_eq!(split_cells("one two"), vec!["one two"]);
    }

    #[test]
    fn detects_a_run_of_tabular_lines() {
        let text = "Title line\nName  Amount\nWidgets  12.50\nGadgets  3.00\nfooter";
        let tables = detect_tables(3, text);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].page, 3);
        assert_eq!(tables[0].rows.len(), 3);
        assert_eq!(tables[0].rows[1], vec!["Widgets", "12.50"]);
    }

    #[test]
    fn a_single_tabular_line_is_not_a_table() {
        let tables = detect_tables(1, "plain\nName  Amount\nplain again");
        assert!(tables.is_empty());
    }

    #[test]
    fn separate_runs_become_separate_tables() {
        let text = "a  b\nc  d\nplain\ne  f\ng  h";
        let tables = detect_tables(1, text);
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn missing_file_is_a_pdf_error() {
        let err = TextLayerTableExtractor::new()
            .extract_tables(Path::new("/nonexistent/never.pdf"))
            .unwrap_err();
        assert!(matches!(err, DocError::Pdf(_)));
    }
}
