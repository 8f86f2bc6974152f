//! Invocation parsing
//!
//! One JSON object per invocation:
//! `{"contract": "wallet", "function": "newWallet", "args": ["W1", "1000"]}`

use serde::{Deserialize, Serialize};

use super::errors::{DispatchError, DispatchResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub contract: String,
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(
        contract: impl Into<String>,
        function: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            contract: contract.into(),
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses an invocation from a JSON string.
    pub fn parse(json: &str) -> DispatchResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DispatchError::invalid_request(format!("Invalid JSON: {}", e)))
    }

    /// First positional argument, the entity key for every operation.
    pub fn key(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_invocation() {
        let inv = Invocation::parse(
            r#"{"contract":"wallet","function":"newWallet","args":["W1","1000"]}"#,
        )
        .unwrap();
        assert_eq!(inv, Invocation::new("wallet", "newWallet", ["W1", "1000"]));
        assert_eq!(inv.key(), Some("W1"));
    }

    #[test]
    fn test_args_default_to_empty() {
        let inv = Invocation::parse(r#"{"contract":"wallet","function":"getWallet"}"#).unwrap();
        assert!(inv.args.is_empty());
        assert_eq!(inv.key(), None);
    }

    #[test]
    fn test_non_string_args_rejected() {
        let err = Invocation::parse(r#"{"contract":"wallet","function":"newWallet","args":["W1",1000]}"#)
            .unwrap_err();
        assert_eq!(err.code(), "TL_INVALID_REQUEST");
    }

    #[test]
    fn test_missing_function_rejected() {
        assert!(Invocation::parse(r#"{"contract":"wallet"}"#).is_err());
        assert!(Invocation::parse("not json").is_err());
    }
}
