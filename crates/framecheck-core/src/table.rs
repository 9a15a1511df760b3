//! Table capability trait and the in-memory frame

use crate::schema::{Column, DType, Schema};
use serde::{Deserialize, Serialize};

/// Errors raised while reading a table's schema metadata
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("no dtype declared for column '{0}'")]
    MissingDtype(String),

    #[error("malformed table metadata: {0}")]
    Malformed(String),
}

/// Anything that can report its columns and their dtypes
///
/// Row data is never read through this trait.
pub trait Table {
    /// Column names in declaration order
    fn column_names(&self) -> Result<Vec<String>, ExtractionError>;

    /// `(column, dtype)` pairs in declaration order
    fn dtypes(&self) -> Result<Vec<(String, DType)>, ExtractionError>;
}

impl<T: Table + ?Sized> Table for &T {
    fn column_names(&self) -> Result<Vec<String>, ExtractionError> {
        (**self).column_names()
    }

    fn dtypes(&self) -> Result<Vec<(String, DType)>, ExtractionError> {
        (**self).dtypes()
    }
}

impl<T: Table + ?Sized> Table for Box<T> {
    fn column_names(&self) -> Result<Vec<String>, ExtractionError> {
        (**self).column_names()
    }

    fn dtypes(&self) -> Result<Vec<(String, DType)>, ExtractionError> {
        (**self).dtypes()
    }
}

impl Table for Schema {
    fn column_names(&self) -> Result<Vec<String>, ExtractionError> {
        Ok(self.columns.iter().map(|c| c.name.clone()).collect())
    }

    fn dtypes(&self) -> Result<Vec<(String, DType)>, ExtractionError> {
        Ok(self
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.dtype.clone()))
            .collect())
    }
}

/// In-memory table: named columns with dtypes plus JSON-valued rows
///
/// This is also the on-disk descriptor format read by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Display name (defaults to the descriptor file stem)
    #[serde(default)]
    pub name: String,

    /// Ordered columns
    pub columns: Vec<Column>,

    /// Row data, one inner vector per row
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl Frame {
    /// Create an empty frame with no columns
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a column, parsing its dtype label
    pub fn with_column(mut self, name: impl Into<String>, dtype: &str) -> Self {
        self.columns.push(Column::new(name, DType::parse(dtype)));
        self
    }

    /// Append a row
    pub fn with_row(mut self, row: Vec<serde_json::Value>) -> Self {
        self.rows.push(row);
        self
    }

    /// Parse a descriptor from JSON
    pub fn from_json(json: &str) -> Result<Self, ExtractionError> {
        serde_json::from_str(json).map_err(|e| ExtractionError::Malformed(e.to_string()))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column schema of this frame
    pub fn schema(&self) -> Schema {
        Schema::from_columns(self.columns.clone())
    }
}

impl Table for Frame {
    fn column_names(&self) -> Result<Vec<String>, ExtractionError> {
        Ok(self.columns.iter().map(|c| c.name.clone()).collect())
    }

    fn dtypes(&self) -> Result<Vec<(String, DType)>, ExtractionError> {
        Ok(self
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.dtype.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn frame_exposes_columns_in_order() {
        let frame = Frame::new("users")
            .with_column("id", "int")
            .with_column("name", "str")
            .with_row(vec![json!(1), json!("ada")]);

        assert_eq!(frame.column_names().unwrap(), vec!["id", "name"]);
        assert_eq!(
            frame.dtypes().unwrap(),
            vec![("id".to_string(), DType::Int(64)), ("name".to_string(), DType::String)]
        );
        assert_eq!(frame.row_count(), 1);
    }

    #[test]
    fn descriptor_parsing() {
        let frame = Frame::from_json(
            r#"{
                "name": "orders",
                "columns": [
                    {"name": "order_id", "dtype": "Int64"},
                    {"name": "total", "dtype": "double"}
                ],
                "rows": [[1, 9.5]]
            }"#,
        )
        .unwrap();

        assert_eq!(frame.name, "orders");
        assert_eq!(frame.columns[1].dtype, DType::Float(64));
        assert_eq!(frame.row_count(), 1);
    }

    #[test]
    fn descriptor_without_columns_is_malformed() {
        let err = Frame::from_json(r#"{"name": "broken"}"#).unwrap_err();
        assert!(matches!(err, ExtractionError::Malformed(_)));
    }

    #[test]
    fn schema_is_a_table() {
        let schema = Frame::new("t").with_column("a", "bool").schema();
        assert_eq!(Table::column_names(&schema).unwrap(), vec!["a"]);
    }
}
