//! Application configuration.
//!
//! Loaded from YAML; every field has a default so an empty document is a
//! valid configuration.
//!
//! ```yaml
//! data:
//!   report: data/report.json
//!   fact_checks: data/fact_checks.json
//!   rules: data/rules.yaml
//! fact_check:
//!   include_swot: true
//!   strict_references: false
//!   confidence_thresholds: { high: 80, medium: 60, low: 40 }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::resolver::DEFAULT_FALLBACK_EXPLANATION;
use crate::types::ConfidenceBand;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Locations of the three data documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DataPaths {
    pub report: PathBuf,
    pub fact_checks: PathBuf,
    /// `.yaml`/`.yml` is read as YAML, anything else as JSON
    pub rules: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            report: PathBuf::from("data/report.json"),
            fact_checks: PathBuf::from("data/fact_checks.json"),
            rules: PathBuf::from("data/rules.yaml"),
        }
    }
}

/// Lower bounds (inclusive) of each confidence band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfidenceThresholds {
    pub high: u8,
    pub medium: u8,
    pub low: u8,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 80,
            medium: 60,
            low: 40,
        }
    }
}

impl ConfidenceThresholds {
    /// Classify a confidence score.
    pub fn band(&self, confidence: u8) -> ConfidenceBand {
        if confidence >= self.high {
            ConfidenceBand::High
        } else if confidence >= self.medium {
            ConfidenceBand::Medium
        } else if confidence >= self.low {
            ConfidenceBand::Low
        } else {
            ConfidenceBand::Minimal
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.high > 100 {
            return Err(ConfigError::Invalid(format!(
                "confidence_thresholds.high is {} but must be at most 100",
                self.high
            )));
        }
        if !(self.high >= self.medium && self.medium >= self.low) {
            return Err(ConfigError::Invalid(format!(
                "confidence_thresholds must satisfy high >= medium >= low (got {}/{}/{})",
                self.high, self.medium, self.low
            )));
        }
        Ok(())
    }
}

/// Fact-check behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FactCheckConfig {
    /// When false, every passage resolves to the fallback
    pub enabled: bool,

    /// Also check SWOT bullets, not just section paragraphs
    pub include_swot: bool,

    /// Refuse to load a rule table that references unknown records
    pub strict_references: bool,

    /// Explanation shown for passages without a prepared fact-check
    pub fallback_explanation: String,

    pub confidence_thresholds: ConfidenceThresholds,
}

impl Default for FactCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_swot: true,
            strict_references: false,
            fallback_explanation: DEFAULT_FALLBACK_EXPLANATION.to_string(),
            confidence_thresholds: ConfidenceThresholds::default(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataPaths,
    pub fact_check: FactCheckConfig,
}

impl AppConfig {
    /// Parse a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = if yaml.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file. Relative data paths are resolved
    /// against the directory containing the file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Make relative data paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.data.report,
            &mut self.data.fact_checks,
            &mut self.data.rules,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fact_check.fallback_explanation.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "fact_check.fallback_explanation must not be empty".to_string(),
            ));
        }
        self.fact_check.confidence_thresholds.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_yaml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.fact_check.enabled);
        assert!(!config.fact_check.strict_references);
        assert_eq!(config.data.rules, PathBuf::from("data/rules.yaml"));
    }

    #[test]
    fn test_partial_config() {
        let yaml = r#"
fact_check:
  strict_references: true
  confidence_thresholds:
    high: 90
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert!(config.fact_check.strict_references);
        assert!(config.fact_check.include_swot);
        assert_eq!(config.fact_check.confidence_thresholds.high, 90);
        assert_eq!(config.fact_check.confidence_thresholds.medium, 60);
    }

    #[test]
    fn test_threshold_order_enforced() {
        let yaml = r#"
fact_check:
  confidence_thresholds: { high: 50, medium: 60, low: 40 }
"#;
        assert!(matches!(
            AppConfig::from_yaml(yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_threshold_above_100_rejected() {
        let yaml = r#"
fact_check:
  confidence_thresholds: { high: 120, medium: 60, low: 40 }
"#;
        assert!(AppConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_blank_fallback_rejected() {
        let yaml = r#"
fact_check:
  fallback_explanation: "  "
"#;
        assert!(AppConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_confidence_bands() {
        let thresholds = ConfidenceThresholds::default();
        assert_eq!(thresholds.band(94), ConfidenceBand::High);
        assert_eq!(thresholds.band(80), ConfidenceBand::High);
        assert_eq!(thresholds.band(78), ConfidenceBand::Medium);
        assert_eq!(thresholds.band(45), ConfidenceBand::Low);
        assert_eq!(thresholds.band(0), ConfidenceBand::Minimal);
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = AppConfig::default();
        config.data.fact_checks = PathBuf::from("/srv/booth/fact_checks.json");
        config.resolve_paths(Path::new("/etc/booth"));

        assert_eq!(config.data.report, PathBuf::from("/etc/booth/data/report.json"));
        assert_eq!(
            config.data.fact_checks,
            PathBuf::from("/srv/booth/fact_checks.json")
        );
    }
}
