//! Configuration structures for the extraction and learning pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the bulex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BulexConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Payslip extraction configuration.
    pub extraction: ExtractionConfig,

    /// Learning subsystem configuration.
    pub learning: LearningConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Process all pages or only the first.
    pub process_all_pages: bool,

    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,

    /// Minimum embedded-text length to consider a PDF as text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            process_all_pages: true,
            max_pages: 10,
            min_text_length: 50,
        }
    }
}

/// Payslip extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Enable SIRET/SIREN checksum validation.
    pub validate_siret: bool,

    /// Enable NIR (social security number) key validation.
    pub validate_nir: bool,

    /// Minimum confidence to accept an extracted field.
    pub min_field_confidence: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            validate_siret: true,
            validate_nir: true,
            min_field_confidence: 0.5,
        }
    }
}

/// Learning subsystem configuration.
///
/// The thresholds feed the advisory heuristics; they are tuning knobs, not
/// contractual limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Directory holding the persisted rule and correction collections.
    pub data_dir: PathBuf,

    /// Rules below this success rate are flagged as needing more corrections.
    pub low_confidence_threshold: f64,

    /// Window for the recent-correction volume signal, in days.
    pub recent_window_days: i64,

    /// Corrections within the window above which volume is flagged.
    pub recent_volume_threshold: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("learning"),
            low_confidence_threshold: 0.5,
            recent_window_days: 7,
            recent_volume_threshold: 5,
        }
    }
}

impl BulexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BulexConfig::default();
        assert_eq!(config.learning.low_confidence_threshold, 0.5);
        assert_eq!(config.learning.recent_window_days, 7);
        assert_eq!(config.learning.recent_volume_threshold, 5);
        assert!(config.extraction.validate_siret);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: BulexConfig =
            serde_json::from_str(r#"{"learning": {"recent_window_days": 14}}"#).unwrap();
        assert_eq!(config.learning.recent_window_days, 14);
        assert_eq!(config.learning.low_confidence_threshold, 0.5);
        assert_eq!(config.pdf.max_pages, 10);
    }
}
