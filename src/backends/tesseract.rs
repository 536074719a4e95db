//! Tesseract CLI adapters.
//!
//! Both adapters shell out to the `tesseract` binary: the image is written to
//! a temporary PNG and recognition output is read from stdout. The TSV mode
//! yields word-level boxes and confidences, which the token extractor
//! normalizes; the plain mode yields whole-image text for the secondary
//! cascade.

use image::{ImageFormat, RgbImage};
use std::io::Write;
use std::path::Path;
use std::process::Command;

use super::{PlainTextRecognizer, Point, QuadDetection, RawRecognition, Recognizer};
use crate::core::DocError;

/// Word-level columns in tesseract's TSV output.
const TSV_WORD_LEVEL: &str = "5";

/// Recognition backend that invokes the `tesseract` CLI in TSV mode.
#[derive(Debug, Clone)]
pub struct TesseractBackend {
    languages: String,
    page_seg_mode: u32,
}

impl TesseractBackend {
    /// Creates a backend for the given tesseract language string (e.g.
    /// `"eng"` or `"eng+deu"`).
    pub fn new(languages: impl Into<String>) -> Self {
        Self {
            languages: languages.into(),
            // Assume a uniform block of text; matches scanned documents.
            page_seg_mode: 6,
        }
    }

    /// Overrides the page segmentation mode.
    pub fn with_page_seg_mode(mut self, psm: u32) -> Self {
        self.page_seg_mode = psm;
        self
    }

    fn run(&self, image: &RgbImage, output_mode: &str) -> Result<String, DocError> {
        let mut tmp = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .map_err(|e| DocError::backend("tesseract", format!("temp file: {e}")))?;
        image
            .write_to(&mut tmp, ImageFormat::Png)
            .map_err(|e| DocError::backend("tesseract", format!("temp image write: {e}")))?;
        tmp.flush().ok();

        run_tesseract(tmp.path(), &self.languages, self.page_seg_mode, output_mode)
    }
}

impl Recognizer for TesseractBackend {
    fn recognize(&self, image: &RgbImage) -> Result<RawRecognition, DocError> {
        let tsv = self.run(image, "tsv")?;
        Ok(RawRecognition::Detections(parse_tsv_detections(&tsv)))
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

/// Plain-text adapter over the same CLI, for the secondary cascade.
#[derive(Debug, Clone)]
pub struct TesseractPlainText {
    inner: TesseractBackend,
}

impl TesseractPlainText {
    /// Creates a plain-text adapter for the given language string.
    pub fn new(languages: impl Into<String>) -> Self {
        Self {
            inner: TesseractBackend::new(languages),
        }
    }
}

impl PlainTextRecognizer for TesseractPlainText {
    fn extract_plain_text(&self, image: &RgbImage) -> Result<String, DocError> {
        self.inner.run(image, "txt")
    }
}

fn run_tesseract(
    image_path: &Path,
    languages: &str,
    psm: u32,
    output_mode: &str,
) -> Result<String, DocError> {
    let mut command = Command::new("tesseract");
    command
        .arg(image_path)
        .arg("stdout")
        .args(["-l", languages])
        .args(["--psm", &psm.to_string()]);
    if output_mode != "txt" {
        command.arg(output_mode);
    }

    let output = command
        .output()
        .map_err(|e| DocError::backend("tesseract", format!("invocation failed: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DocError::backend(
            "tesseract",
            format!(
                "exited with {}: {}",
                output.status,
                stderr.lines().next().unwrap_or("")
            ),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parses word-level rows out of tesseract's TSV output.
///
/// Malformed rows and rows with negative confidence (structural rows, empty
/// words) are skipped one at a time; a bad row never aborts the batch.
fn parse_tsv_detections(tsv: &str) -> Vec<QuadDetection> {
    let mut detections = Vec::new();

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != TSV_WORD_LEVEL {
            continue;
        }
        let (Ok(left), Ok(top), Ok(width), Ok(height)) = (
            cols[6].parse::<f32>(),
            cols[7].parse::<f32>(),
            cols[8].parse::<f32>(),
            cols[9].parse::<f32>(),
        ) else {
            continue;
        };
        let Ok(conf) = cols[10].parse::<f32>() else {
            continue;
        };
        let text = cols[11];
        if conf < 0.0 || text.trim().is_empty() {
            continue;
        }

        detections.push(QuadDetection {
            quad: vec![
                Point::new(left, top),
                Point::new(left + width, top),
                Point::new(left + width, top + height),
                Point::new(left, top + height),
            ],
            text: text.to_string(),
            confidence: (conf / 100.0).clamp(0.0, 1.0),
        });
    }

    detections
}
