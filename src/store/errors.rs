//! Ledger store errors
//!
//! Error codes:
//! - TL_CONFLICT (REJECT, retryable)
//! - TL_STORAGE_IO (ERROR; FATAL once the ledger is poisoned)
//! - TL_DATA_CORRUPTION (FATAL)

use std::io;

use thiserror::Error;

use super::{Precondition, Version};
use crate::schema::Severity;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A put's precondition did not hold: another writer got there first.
    #[error("conflicting write to '{key}': expected {expected}, found {}", describe(.actual))]
    Conflict {
        key: String,
        expected: Precondition,
        actual: Option<Version>,
    },

    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("ledger corrupted at offset {offset}: {message}")]
    Corruption { offset: u64, message: String },

    /// An earlier failed put could not be rolled back past `offset`.
    #[error("ledger {path} refuses writes: failed append past offset {offset} was not rolled back")]
    Poisoned { path: String, offset: u64 },
}

fn describe(actual: &Option<Version>) -> String {
    match actual {
        Some(v) => format!("version {}", v.value()),
        None => "no value".to_string(),
    }
}

impl StoreError {
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    pub fn corruption(offset: u64, message: impl Into<String>) -> Self {
        Self::Corruption {
            offset,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Conflict { .. } => "TL_CONFLICT",
            StoreError::Io { .. } | StoreError::Poisoned { .. } => "TL_STORAGE_IO",
            StoreError::Corruption { .. } => "TL_DATA_CORRUPTION",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            StoreError::Conflict { .. } => Severity::Reject,
            StoreError::Io { .. } => Severity::Error,
            StoreError::Corruption { .. } | StoreError::Poisoned { .. } => Severity::Fatal,
        }
    }

    /// Only conflicts are worth retrying; the caller owns the retry policy.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
