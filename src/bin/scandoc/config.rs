//! Run settings shared across the CLI.

use scandoc::core::PipelineConfig;
use std::path::PathBuf;

/// Settings for one CLI invocation.
pub struct RunSettings {
    /// Recognition language string for the OCR backend.
    pub lang: String,
    /// Directory for JSON artifacts; `None` means beside the executable.
    pub out_dir: Option<PathBuf>,
    /// Pipeline tunables.
    pub pipeline: PipelineConfig,
}
