//! Line grouping.
//!
//! Clusters tokens into reading-order lines by vertical proximity. The
//! membership tolerance adapts to the document's typical token height, and
//! the running line center is updated as tokens join so that slightly skewed
//! lines stay together across their full width.

use tracing::trace;

use super::{median, Token};

/// Floor for the line-membership tolerance, in pixels. Avoids
/// over-fragmenting lines made of very small or noisy tokens.
const MIN_LINE_TOLERANCE: f32 = 10.0;

/// Fraction of the median token height two vertical centers may differ by
/// and still share a line.
const LINE_TOLERANCE_FACTOR: f32 = 0.7;

/// Fallback median height when no token reports a usable height.
const DEFAULT_MEDIAN_HEIGHT: f32 = 12.0;

/// Groups tokens into lines, top-to-bottom, each line sorted left-to-right.
///
/// Tokens are sorted by vertical center first, so insertion order does not
/// affect the clustering. A token joins the current line when its vertical
/// center is within tolerance of the line's running mean center; otherwise
/// the line is closed and a new one starts.
pub fn group_tokens_into_lines(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut sorted = tokens;
    sorted.sort_by(|a, b| a.center_y().total_cmp(&b.center_y()));

    let heights: Vec<f32> = sorted.iter().map(|t| t.height().max(1.0)).collect();
    let median_height = median(&heights).unwrap_or(DEFAULT_MEDIAN_HEIGHT);
    let tolerance = (median_height * LINE_TOLERANCE_FACTOR).max(MIN_LINE_TOLERANCE);
    trace!(
        target: "pipeline",
        median_height,
        tolerance,
        token_count = sorted.len(),
        "grouping tokens into lines"
    );

    let mut lines: Vec<Vec<Token>> = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut running_center = 0.0_f32;

    for token in sorted {
        let center = token.center_y();
        if current.is_empty() {
            running_center = center;
            current.push(token);
            continue;
        }
        if (center - running_center).abs() <= tolerance {
            current.push(token);
            // Incremental mean: the line's center drifts with its members,
            // which keeps long, slightly skewed lines in one cluster.
            let n = current.len() as f32;
            running_center = (running_center * (n - 1.0) + center) / n;
        } else {
            current.sort_by(|a, b| a.xmin.total_cmp(&b.xmin));
            lines.push(std::mem::take(&mut current));
            running_center = center;
            current.push(token);
        }
    }

    if !current.is_empty() {
        current.sort_by(|a, b| a.xmin.total_cmp(&b.xmin));
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, xmin: f32, ymin: f32, width: f32, height: f32) -> Token {
        Token {
            text: text.to_string(),
            confidence: 1.0,
            xmin,
            xmax: xmin + width,
            ymin,
            ymax: ymin + height,
        }
    }

    fn texts(lines: &[Vec<Token>]) -> Vec<Vec<&str>> {
        lines
            .iter()
            .map(|line| line.iter().map(|t| t.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(group_tokens_into_lines(Vec::new()).is_empty());
    }

    #[test]
    fn tokens_on_one_band_form_one_sorted_line() {
        let tokens = vec![
            token("world", 60.0, 10.0, 40.0, 12.0),
            token("hello", 10.0, 11.0, 40.0, 12.0),
        ];
        let lines = group_tokens_into_lines(tokens);
        assert_eq!(texts(&lines), vec![vec!["hello", "world"]]);
    }

    #[test]
    fn distant_bands_split_into_separate_lines() {
        let tokens = vec![
            token("bottom", 0.0, 100.0, 30.0, 12.0),
            token("top", 0.0, 10.0, 30.0, 12.0),
        ];
        let lines = group_tokens_into_lines(tokens);
        assert_eq!(texts(&lines), vec![vec!["top"], vec!["bottom"]]);
    }

    #[test]
    fn grouping_is_stable_under_insertion_order() {
        // Two tokens within tolerance of each other must share a line no
        // matter which order they arrive in.
        let a = token("a", 0.0, 10.0, 20.0, 12.0);
        let b = token("b", 30.0, 14.0, 20.0, 12.0);

        let forward = group_tokens_into_lines(vec![a.clone(), b.clone()]);
        let reverse = group_tokens_into_lines(vec![b, a]);

        assert_eq!(forward.len(), 1);
        assert_eq!(texts(&forward), texts(&reverse));
    }

    #[test]
    fn tolerance_floor_keeps_tiny_tokens_together() {
        // Median height 2 would give a 1.4px tolerance without the floor;
        // these centers are 6px apart and must still share a line.
        let tokens = vec![
            token("x", 0.0, 10.0, 5.0, 2.0),
            token("y", 10.0, 16.0, 5.0, 2.0),
        ];
        let lines = group_tokens_into_lines(tokens);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn running_mean_follows_skewed_lines() {
        // A gently rising line: every join stays within tolerance of the
        // running mean, although the last center is 12px above the first --
        // past tolerance if the line center were pinned to the first token.
        let tokens = vec![
            token("a", 0.0, 10.0, 20.0, 12.0),
            token("b", 30.0, 14.0, 20.0, 12.0),
            token("c", 60.0, 18.0, 20.0, 12.0),
            token("d", 90.0, 22.0, 20.0, 12.0),
        ];
        let lines = group_tokens_into_lines(tokens);
        assert_eq!(lines.len(), 1);
        assert_eq!(texts(&lines), vec![vec!["a", "b", "c", "d"]]);
    }

    #[test]
    fn lines_emit_in_top_to_bottom_order() {
        let tokens = vec![
            token("middle", 0.0, 50.0, 30.0, 12.0),
            token("top", 0.0, 10.0, 30.0, 12.0),
            token("bottom", 0.0, 90.0, 30.0, 12.0),
        ];
        let lines = group_tokens_into_lines(tokens);
        assert_eq!(texts(&lines), vec![vec!["top"], vec!["middle"], vec!["bottom"]]);
    }
}
