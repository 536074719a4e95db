//! Backend boundaries for the document pipeline.
//!
//! The pipeline treats recognition, NLP, and PDF handling as opaque
//! capabilities behind narrow traits. Concrete adapters live in submodules;
//! swapping a recognition backend only requires producing one of the
//! [`RawRecognition`] shapes, never a change to line grouping or text
//! reconstruction.

pub mod lexical;
pub mod tesseract;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::core::DocError;
use crate::document::TableRegion;

pub use lexical::LexicalEntityExtractor;
pub use tesseract::{TesseractBackend, TesseractPlainText};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One geometric detection: a quadrilateral region with recognized text and
/// a confidence score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadDetection {
    /// The four corners of the detected region. An empty or short polygon is
    /// treated as a malformed record and skipped during extraction.
    pub quad: Vec<Point>,
    /// The recognized text.
    pub text: String,
    /// Recognition confidence in [0, 1].
    pub confidence: f32,
}

/// One structured recognition record. Confidence defaults to 1.0 when the
/// backend does not report one; a missing or malformed position polygon
/// collapses the bounding box to (0, 0, 0, 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionRecord {
    /// The recognized text.
    pub text: String,
    /// Recognition confidence in [0, 1], if the backend reports one.
    pub confidence: Option<f32>,
    /// Region polygon, if the backend reports one. Fewer than 4 points is
    /// treated as malformed.
    pub position: Option<Vec<Point>>,
}

/// Raw output of one recognition call, before normalization into tokens.
///
/// Backends differ in the shape of what they return; the token extractor is
/// the single place that understands both shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RawRecognition {
    /// A list of geometric detections (quadrilateral, text, confidence).
    Detections(Vec<QuadDetection>),
    /// A list of structured records with optional confidence and position.
    Records(Vec<RecognitionRecord>),
}

impl RawRecognition {
    /// Returns true if the raw output carries no records at all.
    pub fn is_empty(&self) -> bool {
        match self {
            RawRecognition::Detections(d) => d.is_empty(),
            RawRecognition::Records(r) => r.is_empty(),
        }
    }
}

/// A recognition backend: one image in, one raw output out.
///
/// Invocations are blocking; a failure is recovered by the caller, which
/// substitutes an empty result and moves on to the next preprocessing
/// variant.
pub trait Recognizer: Send + Sync {
    /// Runs recognition on the given image.
    fn recognize(&self, image: &RgbImage) -> Result<RawRecognition, DocError>;

    /// Short backend name used in log messages.
    fn name(&self) -> &str;
}

/// A whole-image plain-text recognizer, used as a secondary cascade when the
/// token pipeline comes up short.
pub trait PlainTextRecognizer: Send + Sync {
    /// Extracts plain text from the image, with no token geometry.
    fn extract_plain_text(&self, image: &RgbImage) -> Result<String, DocError>;
}

/// Entity labels the pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityLabel {
    /// A person's name.
    Person,
    /// An organization name.
    Org,
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityLabel::Person => write!(f, "PERSON"),
            EntityLabel::Org => write!(f, "ORG"),
        }
    }
}

/// A named entity detected in reconstructed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// The entity's surface text.
    pub text: String,
    /// The entity label.
    pub label: EntityLabel,
}

/// An NLP backend extracting named entities from plain text.
///
/// Optional: a processor without one simply reports empty entity lists.
pub trait EntityExtractor: Send + Sync {
    /// Extracts entities from the text, in document order.
    fn extract(&self, text: &str) -> Result<Vec<Entity>, DocError>;
}

/// PDF handling capability: per-page text-layer extraction and page
/// rasterization. Both operations are blocking.
pub trait PdfBackend: Send + Sync {
    /// Extracts the embedded text layer, one string per page in page order.
    /// Pages without a text layer yield empty strings.
    fn extract_text_layer(&self, path: &Path) -> Result<Vec<String>, DocError>;

    /// Rasterizes every page at the given DPI.
    fn rasterize(&self, path: &Path, dpi: f32) -> Result<Vec<RgbImage>, DocError>;
}

/// Best-effort table extraction from a PDF. Failures are swallowed by the
/// caller and yield an empty table list; this never blocks text extraction.
pub trait TableExtractor: Send + Sync {
    /// Extracts table-like regions from the document.
    fn extract_tables(&self, path: &Path) -> Result<Vec<TableRegion>, DocError>;
}
