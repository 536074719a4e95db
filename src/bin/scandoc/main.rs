//! scandoc CLI
//!
//! Extracts text and key details from one scanned document or PDF and emits
//! JSON artifacts for a calling process.
//!
//! # Usage
//!
//! ```bash
//! scandoc invoice.pdf
//! scandoc file:///home/user/scan.png --lang eng
//! scandoc report.pdf --out-dir /tmp/results
//! ```

mod cli;
mod config;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scandoc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract text and key details from scanned documents and PDFs", long_about = None)]
struct Cli {
    /// File path or file:/// URI of the document to process
    input: Option<String>,

    /// Recognition language string passed to the OCR backend
    #[arg(long, default_value = "eng", env = "SCANDOC_LANG")]
    lang: String,

    /// Directory for the JSON artifacts (defaults to the executable's directory)
    #[arg(long, env = "SCANDOC_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Minimum reconstructed-text length that counts as a successful extraction
    #[arg(long, default_value_t = 30, env = "SCANDOC_SUCCESS_THRESHOLD")]
    success_threshold: usize,

    /// Minimum per-token recognition confidence to keep a token
    #[arg(long, default_value_t = 0.35, env = "SCANDOC_CONFIDENCE_THRESHOLD")]
    confidence_threshold: f32,

    /// DPI used when rasterizing PDF pages for OCR
    #[arg(long, default_value_t = 300.0, env = "SCANDOC_PDF_DPI")]
    pdf_dpi: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    scandoc::utils::init_tracing();

    let cli = Cli::parse();

    let Some(input) = cli.input else {
        // Contract with the calling process: a missing argument is itself a
        // structured result, not a usage failure.
        println!("{}", serde_json::json!({ "error": "No file provided" }));
        return Ok(());
    };

    let settings = config::RunSettings {
        lang: cli.lang,
        out_dir: cli.out_dir,
        pipeline: scandoc::core::PipelineConfig {
            confidence_threshold: cli.confidence_threshold,
            success_threshold: cli.success_threshold,
            pdf_dpi: cli.pdf_dpi,
            ..Default::default()
        },
    };

    cli::run(&input, settings)
}
