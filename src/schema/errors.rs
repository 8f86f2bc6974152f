//! Field validation errors
//!
//! Error codes:
//! - TL_ARGUMENT_COUNT (REJECT)
//! - TL_FIELD_PARSE (REJECT)
//! - TL_ENUM_VALIDATION (REJECT)
//!
//! Every variant carries the raw input that failed so callers can report
//! exactly what was rejected.

use std::fmt;

use thiserror::Error;

/// Severity levels shared by every engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller input rejected, nothing written
    Reject,
    /// Operation failed for an environmental reason (I/O)
    Error,
    /// Persisted state cannot be trusted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// A single field (or the argument list as a whole) failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Wrong number of positional arguments for an operation
    #[error("{operation} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        operation: String,
        expected: usize,
        actual: usize,
    },

    /// Amount, decimal, or date did not match its format
    #[error("field '{field}': cannot parse '{value}': {reason}")]
    FieldParse {
        field: String,
        value: String,
        reason: String,
    },

    /// Value outside the field's fixed vocabulary
    #[error("field '{field}': '{value}' is not one of [{allowed}]")]
    EnumValidation {
        field: String,
        value: String,
        allowed: String,
    },
}

impl FieldError {
    pub fn argument_count(operation: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ArgumentCount {
            operation: operation.into(),
            expected,
            actual,
        }
    }

    pub fn field_parse(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::FieldParse {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn enum_validation(
        field: impl Into<String>,
        value: impl Into<String>,
        allowed: &[&str],
    ) -> Self {
        Self::EnumValidation {
            field: field.into(),
            value: value.into(),
            allowed: allowed.join(", "),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::ArgumentCount { .. } => "TL_ARGUMENT_COUNT",
            FieldError::FieldParse { .. } => "TL_FIELD_PARSE",
            FieldError::EnumValidation { .. } => "TL_ENUM_VALIDATION",
        }
    }

    /// Validation failures are always caller errors
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }

    /// Returns the offending raw value, if the error concerns a single field
    pub fn offending_value(&self) -> Option<&str> {
        match self {
            FieldError::ArgumentCount { .. } => None,
            FieldError::FieldParse { value, .. } | FieldError::EnumValidation { value, .. } => {
                Some(value)
            }
        }
    }
}

/// Result type for field validation
pub type FieldResult<T> = Result<T, FieldError>;
