//! Configuration schema (framecheck.toml)

use crate::diagnostic::{DiagnosticCode, Severity};
use crate::schema::DTypeAliases;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Severity overrides for specific diagnostic codes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Map of diagnostic code to severity override
    #[serde(default)]
    pub overrides: HashMap<String, Severity>,
}

impl SeverityThreshold {
    /// Get severity for a diagnostic code, falling back to the code's default
    pub fn get_severity(&self, code: DiagnosticCode) -> Severity {
        self.overrides
            .get(code.as_str())
            .copied()
            .unwrap_or_else(|| code.default_severity())
    }

    /// Set severity override for a code
    pub fn set_override(&mut self, code: DiagnosticCode, severity: Severity) {
        self.overrides.insert(code.as_str().to_string(), severity);
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Also require identical column order
    #[serde(default)]
    pub check_column_order: bool,

    /// Extra dtype spellings, keyed by normalized label
    #[serde(default, skip_serializing_if = "DTypeAliases::is_empty")]
    pub dtype_aliases: DTypeAliases,

    /// Severity thresholds
    #[serde(default)]
    pub severity: SeverityThreshold,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DType;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(!config.check_column_order);
        assert!(config.dtype_aliases.is_empty());
    }

    #[test]
    fn severity_override() {
        let mut threshold = SeverityThreshold::default();
        threshold.set_override(DiagnosticCode::SchemaOrderMismatch, Severity::Info);

        assert_eq!(threshold.get_severity(DiagnosticCode::SchemaOrderMismatch), Severity::Info);
        assert_eq!(threshold.get_severity(DiagnosticCode::SchemaColumnMissing), Severity::Error);
    }

    #[test]
    fn parse_full_config() {
        let config = Config::from_toml(
            r#"
            check_column_order = true

            [dtype_aliases]
            money = "float64"

            [severity.overrides]
            SCHEMA_ORDER_MISMATCH = "info"
            "#,
        )
        .unwrap();

        assert!(config.check_column_order);
        assert_eq!(config.dtype_aliases.resolve(DType::parse("money")), DType::Float(64));
        assert_eq!(
            config.severity.get_severity(DiagnosticCode::SchemaOrderMismatch),
            Severity::Info
        );
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = Config::from_toml("check_column_order = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("framecheck.toml");

        let mut config = Config::default();
        config.check_column_order = true;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::from_file(std::path::Path::new("/nonexistent/framecheck.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
