//! CLI errors
//!
//! These end the process with a non-zero exit code. Failures of individual
//! invocations are not CLI errors: they are reported in the response.

use std::io;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Io(String),

    #[error("Data directory already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("Data directory not initialized: {0}. Run 'tradeledger init' first.")]
    NotInitialized(String),

    #[error("Failed to open ledger: {0}")]
    Ledger(#[from] StoreError),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "TL_CLI_CONFIG_ERROR",
            CliError::Io(_) => "TL_CLI_IO_ERROR",
            CliError::AlreadyInitialized(_) => "TL_CLI_ALREADY_INITIALIZED",
            CliError::NotInitialized(_) => "TL_CLI_NOT_INITIALIZED",
            CliError::Ledger(e) => e.code(),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(CliError::config_error("x").code(), "TL_CLI_CONFIG_ERROR");
        assert_eq!(
            CliError::from(io::Error::new(io::ErrorKind::Other, "pipe")).code(),
            "TL_CLI_IO_ERROR"
        );
        let err: CliError = StoreError::corruption(0, "bad").into();
        assert_eq!(err.code(), "TL_DATA_CORRUPTION");
    }
}
