//! Invocation responses
//!
//! `{"status":"ok","data":...}` or
//! `{"status":"error","code":"TL_...","message":"...","retryable":false}`

use serde_json::{json, Value};

use super::errors::DispatchError;

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Success {
        data: Value,
    },
    Error {
        code: String,
        message: String,
        retryable: bool,
    },
}

impl Response {
    pub fn success(data: Value) -> Self {
        Response::Success { data }
    }

    /// Success without a payload, as returned by writes.
    pub fn ok() -> Self {
        Response::Success { data: Value::Null }
    }

    pub fn error(err: &DispatchError) -> Self {
        Response::Error {
            code: err.code().to_string(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    pub fn to_value(&self) -> Value {
        match self {
            Response::Success { data } => json!({
                "status": "ok",
                "data": data,
            }),
            Response::Error {
                code,
                message,
                retryable,
            } => json!({
                "status": "error",
                "code": code,
                "message": message,
                "retryable": retryable,
            }),
        }
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let json = Response::success(json!({"balance": 500})).to_json();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"balance\":500"));
    }

    #[test]
    fn test_ok_has_null_data() {
        assert_eq!(Response::ok().to_value(), json!({"status": "ok", "data": null}));
    }

    #[test]
    fn test_error_response() {
        let err = DispatchError::unknown_operation("wallet", "burnWallet");
        let value = Response::error(&err).to_value();
        assert_eq!(value["status"], "error");
        assert_eq!(value["code"], "TL_UNKNOWN_OPERATION");
        assert_eq!(value["retryable"], false);
    }
}
