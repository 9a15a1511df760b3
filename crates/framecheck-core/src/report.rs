//! Report schema (stable v1)
//!
//! Breaking changes require a new version.

use crate::diagnostic::{Diagnostic, Severity};
use crate::result::ValidationResult;
use serde::{Deserialize, Serialize};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of diagnostics
    pub total: usize,

    pub errors: usize,

    pub warnings: usize,

    pub info: usize,

    /// Number of tables compared, reference included
    pub tables_checked: usize,
}

/// Tables sharing one exact schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaGroup {
    /// Hex fingerprint of the shared schema
    pub fingerprint: String,

    /// Table names in input order
    pub tables: Vec<String>,
}

/// Validation report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (RFC 3339)
    pub timestamp: String,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Boolean validation flags
    pub result: ValidationResult,

    /// Every mismatch found, in table order
    pub diagnostics: Vec<Diagnostic>,

    /// Tables grouped by identical schema
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schema_groups: Vec<SchemaGroup>,
}

impl Report {
    /// Create a report from a result and its diagnostics
    pub fn new(result: ValidationResult, diagnostics: Vec<Diagnostic>, tables_checked: usize) -> Self {
        let summary = ReportSummary {
            total: diagnostics.len(),
            errors: diagnostics.iter().filter(|d| d.severity == Severity::Error).count(),
            warnings: diagnostics.iter().filter(|d| d.severity == Severity::Warn).count(),
            info: diagnostics.iter().filter(|d| d.severity == Severity::Info).count(),
            tables_checked,
        };

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary,
            result,
            diagnostics,
            schema_groups: Vec::new(),
        }
    }

    /// Attach schema groups
    pub fn with_schema_groups(mut self, groups: Vec<SchemaGroup>) -> Self {
        self.schema_groups = groups;
        self
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// True when the validator found nothing to complain about
    pub fn passed(&self) -> bool {
        self.result.is_consistent()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;

    #[test]
    fn empty_report() {
        let report = Report::new(ValidationResult::consistent(false), Vec::new(), 2);
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.summary.tables_checked, 2);
        assert!(!report.has_errors());
        assert!(report.passed());
    }

    #[test]
    fn report_with_diagnostics() {
        let diagnostics = vec![
            Diagnostic::new(DiagnosticCode::SchemaColumnMissing, Severity::Error, "Missing column"),
            Diagnostic::new(DiagnosticCode::SchemaOrderMismatch, Severity::Warn, "Order differs"),
        ];

        let mut result = ValidationResult::consistent(true);
        result.same_col_names = false;
        result.same_col_order = Some(false);

        let report = Report::new(result, diagnostics, 2);
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.errors, 1);
        assert_eq!(report.summary.warnings, 1);
        assert!(report.has_errors());
        assert!(!report.passed());
    }

    #[test]
    fn report_serialization() {
        let report = Report::new(ValidationResult::consistent(false), Vec::new(), 1)
            .with_schema_groups(vec![SchemaGroup {
                fingerprint: "abc".into(),
                tables: vec!["t0".into()],
            }]);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"diagnostics\""));
        assert!(json.contains("\"schema_groups\""));
        assert!(!json.contains("same_col_order"));
    }

    #[test]
    fn save_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        Report::new(ValidationResult::consistent(false), Vec::new(), 1)
            .save_to_file(&path)
            .unwrap();

        let written: Report = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.summary.tables_checked, 1);
    }
}
