//! Text reconstruction.
//!
//! Turns grouped lines back into readable text. Within a line, the gap
//! between neighboring boxes decides whether the recognizer split one word
//! into fragments (concatenate directly) or whether two genuinely distinct
//! words follow each other (insert a space). The gap threshold is scaled
//! from a single document-wide median token width, not a per-line one.

use super::{median, Token};

/// Fraction of the median token width a horizontal gap must exceed to count
/// as a word boundary.
const SPACE_GAP_FACTOR: f32 = 0.6;

/// Fallback median width when no token reports a usable width.
const DEFAULT_MEDIAN_WIDTH: f32 = 10.0;

/// Reconstructs text from grouped lines, one text line per input line,
/// joined with single newlines.
///
/// Zero tokens yield an empty string; a single-token line is emitted
/// verbatim with no gap evaluation.
pub fn reconstruct_text(lines: &[Vec<Token>]) -> String {
    let widths: Vec<f32> = lines
        .iter()
        .flatten()
        .map(|t| t.width().max(1.0))
        .collect();
    let median_width = median(&widths).unwrap_or(DEFAULT_MEDIAN_WIDTH);
    let space_gap = median_width * SPACE_GAP_FACTOR;

    let mut out_lines: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        let Some(first) = line.first() else {
            continue;
        };
        let mut text = first.text.clone();
        for (previous, token) in line.iter().zip(line.iter().skip(1)) {
            let gap = token.xmin - previous.xmax;
            if gap > space_gap {
                text.push(' ');
            }
            text.push_str(&token.text);
        }
        out_lines.push(text);
    }

    out_lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, xmin: f32, xmax: f32) -> Token {
        Token {
            text: text.to_string(),
            confidence: 1.0,
            xmin,
            xmax,
            ymin: 0.0,
            ymax: 12.0,
        }
    }

    #[test]
    fn no_lines_yield_empty_string() {
        assert_eq!(reconstruct_text(&[]), "");
    }

    #[test]
    fn single_token_line_is_emitted_verbatim() {
        let lines = vec![vec![token("Solo", 5.0, 45.0)]];
        assert_eq!(reconstruct_text(&lines), "Solo");
    }

    #[test]
    fn wide_gap_inserts_a_space() {
        // Both tokens are 10 wide, so the median width is 10 and the space
        // threshold is 6; a 7px gap separates two words.
        let lines = vec![vec![token("Hello", 40.0, 50.0), token("World", 57.0, 67.0)]];
        assert_eq!(reconstruct_text(&lines), "Hello World");
    }

    #[test]
    fn narrow_gap_concatenates_fragments() {
        let lines = vec![vec![token("Hello", 40.0, 50.0), token("World", 52.0, 62.0)]];
        assert_eq!(reconstruct_text(&lines), "HelloWorld");
    }

    #[test]
    fn gap_equal_to_threshold_does_not_split() {
        // gap == 0.6 x median is not strictly greater; no space.
        let lines = vec![vec![token("Hello", 40.0, 50.0), token("World", 56.0, 66.0)]];
        assert_eq!(reconstruct_text(&lines), "HelloWorld");
    }

    #[test]
    fn median_width_is_document_wide_not_per_line() {
        // The second line's tokens are 100 wide; pooled with the four
        // 10-wide tokens the median stays 10, so the 7px gap on line one
        // still splits words.
        let lines = vec![
            vec![token("a", 0.0, 10.0), token("b", 17.0, 27.0)],
            vec![
                token("c", 0.0, 10.0),
                token("d", 12.0, 22.0),
                token("wide", 30.0, 130.0),
            ],
        ];
        assert_eq!(reconstruct_text(&lines), "a b\ncd wide");
    }

    #[test]
    fn lines_join_with_single_newlines() {
        let lines = vec![
            vec![token("first", 0.0, 30.0)],
            vec![token("second", 0.0, 30.0)],
        ];
        assert_eq!(reconstruct_text(&lines), "first\nsecond");
    }

    #[test]
    fn reconstruction_is_deterministic() {
        let lines = vec![vec![token("Hello", 40.0, 50.0), token("World", 57.0, 67.0)]];
        assert_eq!(reconstruct_text(&lines), reconstruct_text(&lines));
    }
}
