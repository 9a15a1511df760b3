//! framecheck engine
//!
//! - Schema consistency validation across a batch of tables
//! - Per-table schema diff diagnostics
//! - Report generation

pub mod schema_diff;
pub mod validator;

pub use schema_diff::SchemaDiff;
pub use validator::{try_validate, validate, SchemaValidator, ValidationError};
