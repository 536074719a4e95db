//! CLI processing: run the document pipeline and emit JSON artifacts.

use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use scandoc::analysis::{DocumentKind, ImportantDetails};
use scandoc::backends::{TesseractBackend, TesseractPlainText};
use scandoc::document::{DocumentProcessor, DocumentResult};

use crate::config::RunSettings;

/// The processing-result artifact written beside the executable.
#[derive(Serialize)]
struct ProcessingArtifact<'a> {
    file_type: &'a str,
    file_name: &'a str,
    text: &'a str,
    error: &'a str,
}

/// The combined object printed to stdout for the calling process.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CombinedOutput<'a> {
    raw_text: &'a str,
    parsed_json: &'a ImportantDetails,
    suggested_collection: DocumentKind,
}

/// Processes one document and writes all output artifacts.
pub fn run(
    input: &str,
    settings: RunSettings,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let start = Instant::now();

    info!("Initializing document processor...");
    let processor = DocumentProcessor::builder()
        .recognizer(Arc::new(TesseractBackend::new(&settings.lang)))
        .plain_text_fallback(Arc::new(TesseractPlainText::new(&settings.lang)))
        .config(settings.pipeline)
        .build()?;

    info!("Processing document: {}", input);
    let result = processor.process(input);
    debug!(%result, "processing finished");

    let details = processor.extract_important_details(&result);
    info!(
        "Processed in {:.2}ms ({} chars, type '{}')",
        start.elapsed().as_secs_f64() * 1000.0,
        result.full_text.chars().count(),
        details.document_type
    );

    write_artifacts(&result, &details, settings.out_dir)?;

    let combined = CombinedOutput {
        raw_text: &result.full_text,
        parsed_json: &details,
        suggested_collection: details.document_type,
    };
    println!("{}", serde_json::to_string(&combined)?);

    Ok(())
}

fn write_artifacts(
    result: &DocumentResult,
    details: &ImportantDetails,
    out_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let dir = match out_dir {
        Some(dir) => dir,
        None => default_artifact_dir(),
    };

    let result_path = dir.join("processing_result.json");
    let details_path = dir.join("important_details.json");

    let artifact = ProcessingArtifact {
        file_type: &result.file_type,
        file_name: &result.file_name,
        text: &result.full_text,
        error: result.error.as_deref().unwrap_or(""),
    };
    fs::write(&result_path, serde_json::to_string_pretty(&artifact)?)?;
    fs::write(&details_path, serde_json::to_string_pretty(details)?)?;

    debug!(
        "Artifacts written: {} and {}",
        result_path.display(),
        details_path.display()
    );
    Ok(())
}

/// Artifacts land beside the invoking executable; falls back to the current
/// directory when the executable's location is unknown.
fn default_artifact_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}
