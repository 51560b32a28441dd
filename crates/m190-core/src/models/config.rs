//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Main configuration for the m190 pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct M190Config {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Recipient and declarant extraction configuration.
///
/// Defaults reproduce the layout of the AEAT Modelo 190 summary printout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Caption word printed before each recipient ordinal ("Percepción 1").
    pub recipient_marker: String,

    /// Caption of monetary amounts (dinerarias).
    pub monetary_label: String,

    /// Caption of in-kind valuations (especie).
    pub inkind_label: String,

    /// Characters scanned after a caption when looking for its amount.
    pub lookahead_chars: usize,

    /// Zero-based index of the page carrying the declarant summary.
    pub summary_page_index: usize,

    /// Lines scanned after a "declarante" line when no fiscal-ID caption exists.
    pub tax_id_window_lines: usize,

    /// Lines scanned after the legal-name caption.
    pub legal_name_window_lines: usize,

    /// Lines scanned after a bare "declarante" heading.
    pub heading_window_lines: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            recipient_marker: "Percepción".to_string(),
            monetary_label: "Percepción íntegra".to_string(),
            inkind_label: "Valoración".to_string(),
            lookahead_chars: 200,
            summary_page_index: 1,
            tax_id_window_lines: 12,
            legal_name_window_lines: 7,
            heading_window_lines: 14,
        }
    }
}

/// PDF processing configuration.
///
/// Blank pages are always kept: page positions drive both the summary page
/// lookup and the page numbers stamped on records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format when none is given on the command line.
    pub default_format: String,

    /// Add a column listing amount fields that were not found.
    pub include_absent_column: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "csv".to_string(),
            include_absent_column: false,
        }
    }
}

impl M190Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Check values the extractor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ex = &self.extraction;
        let labels = [
            ("extraction.recipient_marker", &ex.recipient_marker),
            ("extraction.monetary_label", &ex.monetary_label),
            ("extraction.inkind_label", &ex.inkind_label),
        ];
        for (key, value) in labels {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: key.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        if ex.lookahead_chars == 0 {
            return Err(ConfigError::Invalid {
                key: "extraction.lookahead_chars".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: M190Config =
            serde_json::from_str(r#"{"extraction": {"lookahead_chars": 150}}"#).unwrap();
        assert_eq!(config.extraction.lookahead_chars, 150);
        assert_eq!(config.extraction.inkind_label, "Valoración");
        assert_eq!(config.extraction.summary_page_index, 1);
        assert_eq!(config.pdf.max_pages, 0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = M190Config::default();
        config.output.include_absent_column = true;
        config.save(&path).unwrap();

        let loaded = M190Config::from_file(&path).unwrap();
        assert!(loaded.output.include_absent_column);
    }

    #[test]
    fn test_validate_rejects_empty_label() {
        let mut config = M190Config::default();
        config.extraction.monetary_label = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref key, .. }) if key == "extraction.monetary_label"
        ));
    }
}
