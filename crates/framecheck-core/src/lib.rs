//! framecheck core
//!
//! Domain model shared by the validator and the CLI.
//! Never rename diagnostic codes - they are part of the report format.

pub mod config;
pub mod diagnostic;
pub mod report;
pub mod result;
pub mod schema;
pub mod table;

pub use config::{Config, ConfigError, SeverityThreshold};
pub use diagnostic::{Diagnostic, DiagnosticCode, Location, Severity};
pub use report::{Report, ReportSummary, ReportVersion, SchemaGroup};
pub use result::ValidationResult;
pub use schema::{Column, DType, DTypeAliases, Schema};
pub use table::{ExtractionError, Frame, Table};
