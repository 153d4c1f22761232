//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the external data store ports.
///
/// Adapters translate their transport failures into these variants so that
/// application services can decide whether to fail closed or report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or timed out.
    #[error("Data store unavailable: {0}")]
    Unavailable(String),

    /// The store answered, but rejected the query.
    #[error("Query on '{table}' rejected: {message}")]
    QueryRejected { table: String, message: String },

    /// A returned row could not be decoded into a domain record.
    #[error("Malformed row in '{table}': {message}")]
    Decode { table: String, message: String },
}

impl StoreError {
    /// Creates an unavailable error with a message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a decode error for a table.
    pub fn decode(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Returns true if retrying the same query may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("email");
        assert_eq!(format!("{}", err), "Field 'email' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("required_level", 1, 255, 0);
        assert_eq!(
            format!("{}", err),
            "Field 'required_level' must be between 1 and 255, got 0"
        );
    }

    #[test]
    fn validation_error_invalid_format_displays_correctly() {
        let err = ValidationError::invalid_format("email", "missing @ symbol");
        assert_eq!(
            format!("{}", err),
            "Field 'email' has invalid format: missing @ symbol"
        );
    }

    #[test]
    fn store_error_unavailable_is_transient() {
        assert!(StoreError::unavailable("connection reset").is_transient());
        assert!(!StoreError::decode("movies", "missing title").is_transient());
    }

    #[test]
    fn store_error_decode_names_table() {
        let err = StoreError::decode("shows", "bad price");
        assert_eq!(format!("{}", err), "Malformed row in 'shows': bad price");
    }
}
