//! Entity service errors
//!
//! Aggregates every failure an operation can end in. Codes are those of the
//! underlying subsystem, plus:
//! - TL_REFERENCE_NOT_FOUND (REJECT)
//! - TL_NOT_FOUND (REJECT)

use thiserror::Error;

use crate::record::DecodeError;
use crate::schema::{EntityKind, FieldError, Severity};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Strict mode only: a reference field names a key with no stored value.
    #[error("field '{field}' references {target} '{key}', which does not exist")]
    ReferenceNotFound {
        field: String,
        target: EntityKind,
        key: String,
    },

    #[error("no {kind} stored under key '{key}'")]
    NotFound { kind: EntityKind, key: String },

    #[error("stored {kind} '{key}' cannot be decoded: {source}")]
    Decode {
        kind: EntityKind,
        key: String,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Field(e) => e.code(),
            ServiceError::ReferenceNotFound { .. } => "TL_REFERENCE_NOT_FOUND",
            ServiceError::NotFound { .. } => "TL_NOT_FOUND",
            ServiceError::Decode { source, .. } => source.code(),
            ServiceError::Store(e) => e.code(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ServiceError::Field(e) => e.severity(),
            ServiceError::ReferenceNotFound { .. } | ServiceError::NotFound { .. } => {
                Severity::Reject
            }
            ServiceError::Decode { .. } => Severity::Reject,
            ServiceError::Store(e) => e.severity(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Store(e) => e.is_retryable(),
            _ => false,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
