use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{code, message, data}` wrapper every mock endpoint answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self::with_message(200, "success", data)
    }

    pub fn with_message<S: Into<String>>(code: u16, message: S, data: T) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error<S: Into<String>>(code: u16, message: S) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}
