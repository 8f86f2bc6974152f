//! Dispatch errors
//!
//! Codes from the service pass through unchanged. Dispatch adds:
//! - TL_INVALID_REQUEST (REJECT)
//! - TL_UNKNOWN_OPERATION (REJECT)

use thiserror::Error;

use crate::schema::{FieldError, Severity};
use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The invocation itself could not be parsed
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown operation '{function}' on contract '{contract}'")]
    UnknownOperation { contract: String, function: String },

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl DispatchError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }

    pub fn unknown_operation(contract: impl Into<String>, function: impl Into<String>) -> Self {
        Self::UnknownOperation {
            contract: contract.into(),
            function: function.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::InvalidRequest(_) => "TL_INVALID_REQUEST",
            DispatchError::UnknownOperation { .. } => "TL_UNKNOWN_OPERATION",
            DispatchError::Service(e) => e.code(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DispatchError::InvalidRequest(_) | DispatchError::UnknownOperation { .. } => {
                Severity::Reject
            }
            DispatchError::Service(e) => e.severity(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            DispatchError::Service(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<FieldError> for DispatchError {
    fn from(e: FieldError) -> Self {
        DispatchError::Service(ServiceError::Field(e))
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;
