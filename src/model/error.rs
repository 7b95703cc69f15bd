//! Validation error types
//!
//! Raised by the API and CLI before user input reaches the tracker.
//! The aggregation engine itself never validates.

use thiserror::Error;

/// Errors produced when validating user-supplied records
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Date is not a `YYYY-MM-DD` calendar date
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Range start is after its end
    #[error("Invalid date range: start {start} is after end {end}")]
    InvertedRange { start: String, end: String },

    /// BMR outside the accepted bounds
    #[error("TMB must be between {min} and {max} kcal/day, got {value}")]
    TmbOutOfRange { value: f64, min: f64, max: f64 },

    /// Settings name left blank
    #[error("Name cannot be empty")]
    EmptyName,

    /// A quantity that must be a non-negative finite number
    #[error("{field} must be a non-negative number, got {value}")]
    InvalidQuantity { field: String, value: f64 },

    /// A quantity given as text that is not a number
    #[error("{field} must be a number, got '{text}'")]
    NotANumber { field: String, text: String },

    /// Macros shorthand with more than four fields
    #[error("Invalid macros '{0}': expected calories[,protein[,carbs[,fat]]]")]
    MalformedMacros(String),

    /// Unknown meal slot name
    #[error("Unknown meal '{0}': use breakfast, lunch, dinner or snack")]
    UnknownMeal(String),

    /// User identifier left blank
    #[error("User id cannot be empty")]
    EmptyUserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::InvertedRange {
            start: "2024-02-01".to_string(),
            end: "2024-01-01".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: start 2024-02-01 is after end 2024-01-01"
        );

        let err = ValidationError::UnknownMeal("brunch".to_string());
        assert!(err.to_string().contains("brunch"));

        let err = ValidationError::NotANumber {
            field: "protein".to_string(),
            text: "lots".to_string(),
        };
        assert_eq!(err.to_string(), "protein must be a number, got 'lots'");
    }
}
