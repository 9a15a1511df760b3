//! Schema consistency validator
//!
//! Compares every table's schema against the first table's schema and
//! reports three batch-wide flags: same column names, same column order
//! (on request) and same dtypes. `validate` never fails; anything that stops
//! the check is folded into a fail-closed result with an `error` message.

use crate::schema_diff::SchemaDiff;
use framecheck_core::{
    Column, Config, DType, DTypeAliases, Diagnostic, DiagnosticCode, ExtractionError, Location,
    Report, Schema, SchemaGroup, Table, ValidationResult,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Reasons a validation run could not complete
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty list: no tables to validate.")]
    EmptyInput,

    #[error("failed to read schema of table {index}: {source}")]
    SchemaExtraction {
        index: usize,
        #[source]
        source: ExtractionError,
    },
}

impl ValidationError {
    fn code(&self) -> DiagnosticCode {
        match self {
            Self::EmptyInput => DiagnosticCode::EmptyInput,
            Self::SchemaExtraction { .. } => DiagnosticCode::SchemaExtractionFailed,
        }
    }
}

/// Schema metadata pulled out of one table
#[derive(Debug, Clone)]
pub(crate) struct ExtractedSchema {
    /// Ordered columns; dtype taken from the name lookup
    pub(crate) schema: Schema,
    names: HashSet<String>,
    dtypes: HashMap<String, DType>,
}

impl ExtractedSchema {
    pub(crate) fn extract<T: Table + ?Sized>(
        table: &T,
        index: usize,
        aliases: &DTypeAliases,
    ) -> Result<Self, ValidationError> {
        let wrap = |source: ExtractionError| ValidationError::SchemaExtraction { index, source };

        let order = table.column_names().map_err(wrap)?;

        // Duplicate names: the last declaration wins
        let dtypes: HashMap<String, DType> = table
            .dtypes()
            .map_err(wrap)?
            .into_iter()
            .map(|(name, dtype)| (name, aliases.resolve(dtype)))
            .collect();

        let mut columns = Vec::with_capacity(order.len());
        for name in &order {
            let dtype = dtypes
                .get(name)
                .cloned()
                .ok_or_else(|| wrap(ExtractionError::MissingDtype(name.clone())))?;
            columns.push(Column::new(name.clone(), dtype));
        }

        Ok(Self {
            names: order.iter().cloned().collect(),
            schema: Schema::from_columns(columns),
            dtypes,
        })
    }

    fn same_names(&self, other: &Self) -> bool {
        self.names == other.names
    }

    fn same_order(&self, other: &Self) -> bool {
        self.schema
            .columns
            .iter()
            .map(|c| &c.name)
            .eq(other.schema.columns.iter().map(|c| &c.name))
    }

    /// Every reference column present in `other` with the same dtype
    fn same_dtypes(&self, other: &Self) -> bool {
        self.names.iter().all(|name| {
            match (self.dtypes.get(name), other.dtypes.get(name)) {
                (Some(expected), Some(actual)) => expected == actual,
                _ => false,
            }
        })
    }

    /// Fold one table's comparison into the batch result
    fn accumulate(&self, other: &Self, index: usize, result: &mut ValidationResult) {
        let names = self.same_names(other);
        if !names {
            result.same_col_names = false;
        }

        if let Some(flag) = result.same_col_order.as_mut() {
            if !self.same_order(other) {
                *flag = false;
            }
        }

        let dtypes = self.same_dtypes(other);
        if !dtypes {
            result.same_dtypes = false;
        }

        debug!(table = index, same_col_names = names, same_dtypes = dtypes, "compared table schema");
    }
}

/// Configured schema validator
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    config: Config,
}

impl SchemaValidator {
    /// Create a validator from configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Validator that only differs from the default in order checking
    pub fn with_column_order(check_column_order: bool) -> Self {
        Self::new(Config {
            check_column_order,
            ..Config::default()
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the check, surfacing failures as errors
    pub fn try_validate<T: Table>(&self, tables: &[T]) -> Result<ValidationResult, ValidationError> {
        let (first, rest) = tables.split_first().ok_or(ValidationError::EmptyInput)?;
        let aliases = &self.config.dtype_aliases;

        let reference = ExtractedSchema::extract(first, 0, aliases)?;
        let mut result = ValidationResult::consistent(self.config.check_column_order);

        for (offset, table) in rest.iter().enumerate() {
            let index = offset + 1;
            let current = ExtractedSchema::extract(table, index, aliases)?;
            reference.accumulate(&current, index, &mut result);
        }

        Ok(result)
    }

    /// Run the check; failures become a fail-closed result with `error` set
    pub fn validate<T: Table>(&self, tables: &[T]) -> ValidationResult {
        match self.try_validate(tables) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "schema validation could not complete");
                ValidationResult::failed(self.config.check_column_order, e.to_string())
            }
        }
    }

    /// Full report: flags, every individual mismatch, and schema groups
    ///
    /// `names` labels tables in diagnostics; missing entries fall back to
    /// `table_<index>`.
    pub fn explain<T: Table>(&self, tables: &[T], names: &[String]) -> Report {
        let name_of = |index: usize| {
            names
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("table_{}", index))
        };

        let extracted = match self.extract_all(tables) {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!(error = %e, "schema validation could not complete");

                let mut diagnostic = Diagnostic::new(
                    e.code(),
                    self.config.severity.get_severity(e.code()),
                    e.to_string(),
                );
                if let ValidationError::SchemaExtraction { index, .. } = &e {
                    diagnostic = diagnostic.with_location(Location::table(*index, name_of(*index)));
                }

                let result = ValidationResult::failed(self.config.check_column_order, e.to_string());
                return Report::new(result, vec![diagnostic], tables.len());
            }
        };

        let reference = &extracted[0];
        let mut result = ValidationResult::consistent(self.config.check_column_order);
        let mut diagnostics = Vec::new();

        for (index, current) in extracted.iter().enumerate().skip(1) {
            reference.accumulate(current, index, &mut result);

            let diff = SchemaDiff::compare(
                index,
                name_of(index),
                &reference.schema,
                &current.schema,
                &self.config,
            );
            diagnostics.extend(diff.diagnostics);
        }

        let groups = group_by_fingerprint(extracted.iter().map(|e| &e.schema), name_of);
        Report::new(result, diagnostics, tables.len()).with_schema_groups(groups)
    }

    fn extract_all<T: Table>(&self, tables: &[T]) -> Result<Vec<ExtractedSchema>, ValidationError> {
        if tables.is_empty() {
            return Err(ValidationError::EmptyInput);
        }

        tables
            .iter()
            .enumerate()
            .map(|(index, table)| ExtractedSchema::extract(table, index, &self.config.dtype_aliases))
            .collect()
    }
}

/// Group tables with identical schemas, in order of first appearance
fn group_by_fingerprint<'a>(
    schemas: impl Iterator<Item = &'a Schema>,
    name_of: impl Fn(usize) -> String,
) -> Vec<SchemaGroup> {
    let mut groups: Vec<SchemaGroup> = Vec::new();

    for (index, schema) in schemas.enumerate() {
        let fingerprint = schema.fingerprint();
        match groups.iter_mut().find(|g| g.fingerprint == fingerprint) {
            Some(group) => group.tables.push(name_of(index)),
            None => groups.push(SchemaGroup {
                fingerprint,
                tables: vec![name_of(index)],
            }),
        }
    }

    groups
}

/// Check that `tables` share the first table's schema
pub fn try_validate<T: Table>(
    tables: &[T],
    check_column_order: bool,
) -> Result<ValidationResult, ValidationError> {
    SchemaValidator::with_column_order(check_column_order).try_validate(tables)
}

/// Check that `tables` share the first table's schema, never failing
///
/// On failure every flag is `false` and `error` describes what went wrong.
pub fn validate<T: Table>(tables: &[T], check_column_order: bool) -> ValidationResult {
    SchemaValidator::with_column_order(check_column_order).validate(tables)
}
