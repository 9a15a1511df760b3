//! Per-table schema diff against the reference table
//!
//! Where the validator only reports batch-wide flags, the diff lists every
//! individual mismatch so a caller can see which columns disagree.

use framecheck_core::{Config, Diagnostic, DiagnosticCode, Location, Schema};
use std::collections::HashSet;

/// Result of comparing one table's schema against the reference schema
#[derive(Debug, Clone)]
pub struct SchemaDiff {
    /// Position of the table in the input sequence
    pub table_index: usize,

    /// Table display name
    pub table: String,

    /// Diagnostics produced by the comparison
    pub diagnostics: Vec<Diagnostic>,
}

impl SchemaDiff {
    /// Compare `actual` against `reference`
    ///
    /// Missing and mistyped columns are reported in reference order, extra
    /// columns in table order. An order diagnostic is only produced when
    /// `config.check_column_order` is set.
    pub fn compare(
        table_index: usize,
        table: impl Into<String>,
        reference: &Schema,
        actual: &Schema,
        config: &Config,
    ) -> Self {
        let table = table.into();
        let severity = |code: DiagnosticCode| config.severity.get_severity(code);
        let mut diagnostics = Vec::new();

        let mut seen_reference_cols = HashSet::new();

        for expected_col in &reference.columns {
            if !seen_reference_cols.insert(expected_col.name.as_str()) {
                continue;
            }

            match actual.find_column(&expected_col.name) {
                Some(actual_col) => {
                    if expected_col.dtype != actual_col.dtype {
                        let message = format!(
                            "Column '{}' dtype mismatch: expected {}, got {}",
                            expected_col.name, expected_col.dtype, actual_col.dtype
                        );

                        diagnostics.push(
                            Diagnostic::new(
                                DiagnosticCode::SchemaDtypeMismatch,
                                severity(DiagnosticCode::SchemaDtypeMismatch),
                                message,
                            )
                            .with_location(Location::column(table_index, &table, &expected_col.name))
                            .with_comparison(expected_col.dtype.label(), actual_col.dtype.label()),
                        );
                    }
                }
                None => {
                    let message = format!(
                        "Column '{}' from the reference table is missing",
                        expected_col.name
                    );

                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticCode::SchemaColumnMissing,
                            severity(DiagnosticCode::SchemaColumnMissing),
                            message,
                        )
                        .with_location(Location::column(table_index, &table, &expected_col.name)),
                    );
                }
            }
        }

        let mut seen_extra_cols = HashSet::new();
        for actual_col in &actual.columns {
            let name = actual_col.name.as_str();
            if seen_reference_cols.contains(name) || !seen_extra_cols.insert(name) {
                continue;
            }

            let message = format!("Column '{}' is not in the reference table", name);

            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::SchemaColumnExtra,
                    severity(DiagnosticCode::SchemaColumnExtra),
                    message,
                )
                .with_location(Location::column(table_index, &table, name)),
            );
        }

        if config.check_column_order {
            let expected = reference.column_names();
            let actual_order = actual.column_names();

            if expected != actual_order {
                let expected = format!("[{}]", expected.join(", "));
                let actual_order = format!("[{}]", actual_order.join(", "));

                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::SchemaOrderMismatch,
                        severity(DiagnosticCode::SchemaOrderMismatch),
                        format!("Column order differs: expected {}, got {}", expected, actual_order),
                    )
                    .with_location(Location::table(table_index, &table))
                    .with_comparison(expected, actual_order),
                );
            }
        }

        Self {
            table_index,
            table,
            diagnostics,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics with the given code
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }
}
