//! Recognition token extraction.
//!
//! This stage is the single normalization point between backend-specific raw
//! output shapes and the uniform [`Token`] model the rest of the pipeline
//! consumes. Swapping recognition backends means producing one of the
//! [`RawRecognition`] variants; line grouping and text reconstruction never
//! see backend-specific data.

use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use crate::backends::{Point, RawRecognition};

/// A single recognized text fragment with a confidence score and an
/// axis-aligned bounding box.
///
/// Tokens are created here and immutable afterwards; each token belongs to
/// exactly one pipeline invocation. Every token that leaves the extractor
/// carries a confidence at or above the configured threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The recognized text, non-empty and whitespace-trimmed.
    pub text: String,
    /// Recognition confidence in [0, 1].
    pub confidence: f32,
    /// Left edge of the bounding box.
    pub xmin: f32,
    /// Right edge of the bounding box.
    pub xmax: f32,
    /// Top edge of the bounding box.
    pub ymin: f32,
    /// Bottom edge of the bounding box.
    pub ymax: f32,
}

impl Token {
    /// Width of the bounding box.
    #[inline]
    pub fn width(&self) -> f32 {
        self.xmax - self.xmin
    }

    /// Height of the bounding box.
    #[inline]
    pub fn height(&self) -> f32 {
        self.ymax - self.ymin
    }

    /// Horizontal center of the bounding box.
    #[inline]
    pub fn center_x(&self) -> f32 {
        (self.xmin + self.xmax) / 2.0
    }

    /// Vertical center of the bounding box.
    #[inline]
    pub fn center_y(&self) -> f32 {
        (self.ymin + self.ymax) / 2.0
    }
}

/// Normalizes one recognition call's raw output into a flat token list.
///
/// A missing raw output (failed or silent backend) yields an empty list.
/// Records with empty or whitespace-only text are dropped before the
/// confidence filter; malformed records are skipped one at a time without
/// aborting the rest of the batch. Tokens below `confidence_threshold` are
/// dropped last.
pub fn extract_tokens(raw: Option<RawRecognition>, confidence_threshold: f32) -> Vec<Token> {
    let mut tokens = Vec::new();

    match raw {
        None => return tokens,
        Some(RawRecognition::Detections(detections)) => {
            for detection in detections {
                let text = detection.text.trim();
                if text.is_empty() || !detection.confidence.is_finite() {
                    continue;
                }
                // A quad without points has no envelope; malformed, skip it.
                let Some((xmin, xmax, ymin, ymax)) = envelope(&detection.quad) else {
                    continue;
                };
                tokens.push(Token {
                    text: text.to_string(),
                    confidence: detection.confidence,
                    xmin,
                    xmax,
                    ymin,
                    ymax,
                });
            }
        }
        Some(RawRecognition::Records(records)) => {
            for record in records {
                let text = record.text.trim();
                if text.is_empty() {
                    continue;
                }
                let confidence = record.confidence.unwrap_or(1.0);
                // An absent or short position polygon collapses the box to
                // the origin; this degenerate case is intentional.
                let (xmin, xmax, ymin, ymax) = match record.position.as_deref() {
                    Some(points) if points.len() >= 4 => {
                        envelope(points).unwrap_or((0.0, 0.0, 0.0, 0.0))
                    }
                    _ => (0.0, 0.0, 0.0, 0.0),
                };
                tokens.push(Token {
                    text: text.to_string(),
                    confidence,
                    xmin,
                    xmax,
                    ymin,
                    ymax,
                });
            }
        }
    }

    tokens.retain(|t| t.confidence >= confidence_threshold);
    tokens
}

/// Axis-aligned envelope of a point set: `(xmin, xmax, ymin, ymax)`.
fn envelope(points: &[Point]) -> Option<(f32, f32, f32, f32)> {
    let (xmin, xmax) = span(points.iter().map(|p| p.x))?;
    let (ymin, ymax) = span(points.iter().map(|p| p.y))?;
    Some((xmin, xmax, ymin, ymax))
}

fn span(values: impl Iterator<Item = f32>) -> Option<(f32, f32)> {
    match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{QuadDetection, RecognitionRecord};

    fn quad(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    fn detection(text: &str, confidence: f32, x0: f32, y0: f32, x1: f32, y1: f32) -> QuadDetection {
        QuadDetection {
            quad: quad(x0, y0, x1, y1),
            text: text.to_string(),
            confidence,
        }
    }

    #[test]
    fn missing_raw_output_yields_empty_list() {
        assert!(extract_tokens(None, 0.35).is_empty());
    }

    #[test]
    fn detections_become_envelope_tokens() {
        let raw = RawRecognition::Detections(vec![QuadDetection {
            // Skewed quad: the envelope must cover all four corners.
            quad: vec![
                Point::new(12.0, 4.0),
                Point::new(50.0, 6.0),
                Point::new(52.0, 20.0),
                Point::new(10.0, 18.0),
            ],
            text: "  Hello ".to_string(),
            confidence: 0.9,
        }]);

        let tokens = extract_tokens(Some(raw), 0.35);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "Hello");
        assert_eq!(tokens[0].xmin, 10.0);
        assert_eq!(tokens[0].xmax, 52.0);
        assert_eq!(tokens[0].ymin, 4.0);
        assert_eq!(tokens[0].ymax, 20.0);
    }

    #[test]
    fn whitespace_only_text_is_dropped_before_confidence_filter() {
        let raw = RawRecognition::Detections(vec![
            detection("   ", 0.99, 0.0, 0.0, 10.0, 10.0),
            detection("kept", 0.99, 0.0, 0.0, 10.0, 10.0),
        ]);
        let tokens = extract_tokens(Some(raw), 0.0);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "kept");
    }

    #[test]
    fn all_surviving_tokens_meet_the_confidence_threshold() {
        let raw = RawRecognition::Detections(vec![
            detection("low", 0.1, 0.0, 0.0, 10.0, 10.0),
            detection("edge", 0.35, 0.0, 0.0, 10.0, 10.0),
            detection("high", 0.9, 0.0, 0.0, 10.0, 10.0),
        ]);
        let tokens = extract_tokens(Some(raw), 0.35);
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.confidence >= 0.35));
    }

    #[test]
    fn malformed_detection_is_skipped_without_aborting() {
        let raw = RawRecognition::Detections(vec![
            QuadDetection {
                quad: Vec::new(),
                text: "no-box".to_string(),
                confidence: 0.9,
            },
            detection("nan-conf", f32::NAN, 0.0, 0.0, 5.0, 5.0),
            detection("ok", 0.8, 0.0, 0.0, 5.0, 5.0),
        ]);
        let tokens = extract_tokens(Some(raw), 0.35);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "ok");
    }

    #[test]
    fn record_confidence_defaults_to_one() {
        let raw = RawRecognition::Records(vec![RecognitionRecord {
            text: "sure".to_string(),
            confidence: None,
            position: Some(quad(0.0, 0.0, 8.0, 4.0)),
        }]);
        let tokens = extract_tokens(Some(raw), 0.99);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].confidence, 1.0);
        assert_eq!(tokens[0].xmax, 8.0);
    }

    #[test]
    fn malformed_record_position_collapses_to_origin() {
        let raw = RawRecognition::Records(vec![
            RecognitionRecord {
                text: "no-position".to_string(),
                confidence: Some(0.9),
                position: None,
            },
            RecognitionRecord {
                text: "short-polygon".to_string(),
                confidence: Some(0.9),
                position: Some(vec![Point::new(3.0, 3.0), Point::new(9.0, 9.0)]),
            },
        ]);
        let tokens = extract_tokens(Some(raw), 0.35);
        assert_eq!(tokens.len(), 2);
        for token in &tokens {
            assert_eq!(
                (token.xmin, token.xmax, token.ymin, token.ymax),
                (0.0, 0.0, 0.0, 0.0)
            );
        }
    }

    #[test]
    fn token_geometry_accessors() {
        let token = Token {
            text: "t".to_string(),
            confidence: 1.0,
            xmin: 10.0,
            xmax: 30.0,
            ymin: 4.0,
            ymax: 12.0,
        };
        assert_eq!(token.width(), 20.0);
        assert_eq!(token.height(), 8.0);
        assert_eq!(token.center_x(), 20.0);
        assert_eq!(token.center_y(), 8.0);
    }
}
