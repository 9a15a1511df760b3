//! Diagnostic codes and error reporting
//!
//! Diagnostic codes are part of the report format.
//! Never rename or remove codes, only add new ones.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Schema mismatches
    /// A reference column is missing from the table
    SchemaColumnMissing,

    /// The table has a column the reference does not
    SchemaColumnExtra,

    /// A shared column has a different dtype
    SchemaDtypeMismatch,

    /// Same column set, different column order
    SchemaOrderMismatch,

    // Validation could not run
    /// No tables were supplied
    EmptyInput,

    /// Column or dtype metadata could not be read
    SchemaExtractionFailed,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaColumnMissing => "SCHEMA_COLUMN_MISSING",
            Self::SchemaColumnExtra => "SCHEMA_COLUMN_EXTRA",
            Self::SchemaDtypeMismatch => "SCHEMA_DTYPE_MISMATCH",
            Self::SchemaOrderMismatch => "SCHEMA_ORDER_MISMATCH",
            Self::EmptyInput => "EMPTY_INPUT",
            Self::SchemaExtractionFailed => "SCHEMA_EXTRACTION_FAILED",
        }
    }

    /// Severity used when no override is configured
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::SchemaOrderMismatch => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Should be reviewed but not blocking
    Warn,

    /// Blocking issue
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Which table (and optionally which column) a diagnostic points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Position of the table in the input sequence (0 is the reference)
    pub table_index: usize,

    /// Table display name
    pub table: String,

    /// Column name, when the issue is about a single column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl Location {
    /// Location of a whole table
    pub fn table(table_index: usize, table: impl Into<String>) -> Self {
        Self {
            table_index,
            table: table.into(),
            column: None,
        }
    }

    /// Location of a single column in a table
    pub fn column(table_index: usize, table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table_index,
            table: table.into(),
            column: Some(column.into()),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Table/column the issue belongs to
    pub location: Option<Location>,

    /// Expected value (for comparison diagnostics)
    pub expected: Option<String>,

    /// Actual value (for comparison diagnostics)
    pub actual: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
            expected: None,
            actual: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set expected/actual values
    pub fn with_comparison(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}
