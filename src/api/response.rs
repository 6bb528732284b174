use serde::Serialize;
use serde_json::Value;

use crate::errors::ApiError;

/// Uniform response envelope. Absent members are omitted on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    /// Status hint for the transport; not serialized.
    #[serde(skip)]
    pub status: u16,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ApiResponse {
    fn ok() -> Self {
        Self {
            status: 200,
            success: true,
            data: None,
            count: None,
            message: None,
            error: None,
            timestamp: None,
        }
    }

    #[must_use]
    pub fn list(items: Vec<Value>) -> Self {
        let count = items.len();
        Self { data: Some(Value::Array(items)), count: Some(count), ..Self::ok() }
    }

    #[must_use]
    pub fn item(item: Value) -> Self {
        Self { data: Some(item), ..Self::ok() }
    }

    pub fn message(msg: impl Into<String>) -> Self {
        Self { message: Some(msg.into()), ..Self::ok() }
    }

    /// Failure envelope; the status follows the error kind.
    pub fn failure(err: &ApiError, msg: impl Into<String>) -> Self {
        Self { status: err.status_code(), success: false, error: Some(msg.into()), ..Self::ok() }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
