//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use super::errors::DocError;

/// Tunable parameters for the document pipeline.
///
/// The defaults reproduce the behavior the pipeline was tuned with; override
/// individual fields and call [`PipelineConfig::validate`] before handing the
/// config to a processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum per-token recognition confidence. Tokens below this are
    /// dropped by the extractor and never reach line grouping.
    pub confidence_threshold: f32,
    /// Minimum reconstructed-text length (in characters, after trimming)
    /// that ends the preprocessing-variant search early. Also gates the
    /// cheap PDF text-layer path.
    pub success_threshold: usize,
    /// Maximum length of an input image's longer side; larger images are
    /// shrunk, preserving aspect ratio.
    pub max_side: u32,
    /// Resolution used when rasterizing PDF pages for OCR.
    pub pdf_dpi: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.35,
            success_threshold: 30,
            max_side: 2000,
            pdf_dpi: 300.0,
        }
    }
}

impl PipelineConfig {
    /// Checks that every field is in its valid range.
    pub fn validate(&self) -> Result<(), DocError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(DocError::invalid_field(
                "confidence_threshold",
                "value in [0, 1]",
                format!("{}", self.confidence_threshold),
            ));
        }
        if self.max_side == 0 {
            return Err(DocError::invalid_field("max_side", "positive pixels", "0"));
        }
        if !self.pdf_dpi.is_finite() || self.pdf_dpi <= 0.0 {
            return Err(DocError::invalid_field(
                "pdf_dpi",
                "positive finite dpi",
                format!("{}", self.pdf_dpi),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.success_threshold, 30);
        assert_eq!(config.max_side, 2000);
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        let config = PipelineConfig {
            confidence_threshold: 1.5,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_max_side() {
        let config = PipelineConfig {
            max_side: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_dpi() {
        let config = PipelineConfig {
            pdf_dpi: f32::NAN,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
