//! Validation result shape

use serde::{Deserialize, Serialize};

/// Outcome of a schema consistency check
///
/// Every flag is a logical AND across all non-reference tables.
/// `same_col_order` is present only when order checking was requested.
/// A populated `error` means the check could not run and every flag is
/// reported as mismatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub same_col_names: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_col_order: Option<bool>,

    pub same_dtypes: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    /// All-matching result for a run with or without order checking
    pub fn consistent(check_column_order: bool) -> Self {
        Self {
            same_col_names: true,
            same_col_order: check_column_order.then_some(true),
            same_dtypes: true,
            error: None,
        }
    }

    /// Fail-closed result for a run that could not complete
    pub fn failed(check_column_order: bool, error: impl Into<String>) -> Self {
        Self {
            same_col_names: false,
            same_col_order: check_column_order.then_some(false),
            same_dtypes: false,
            error: Some(error.into()),
        }
    }

    /// True when every reported flag holds and no error was recorded
    pub fn is_consistent(&self) -> bool {
        self.error.is_none()
            && self.same_col_names
            && self.same_dtypes
            && self.same_col_order.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_key_omitted_when_not_checked() {
        let json = serde_json::to_value(ValidationResult::consistent(false)).unwrap();
        assert_eq!(json, serde_json::json!({"same_col_names": true, "same_dtypes": true}));
    }

    #[test]
    fn failed_result_is_all_mismatched() {
        let result = ValidationResult::failed(true, "boom");
        assert!(!result.same_col_names);
        assert_eq!(result.same_col_order, Some(false));
        assert!(!result.same_dtypes);
        assert!(!result.is_consistent());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], "boom");
    }

    #[test]
    fn consistency_ignores_absent_order_flag() {
        assert!(ValidationResult::consistent(false).is_consistent());
        assert!(ValidationResult::consistent(true).is_consistent());
    }
}
