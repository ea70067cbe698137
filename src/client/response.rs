//! Relay responses
//!
//! The relay answers every call with a JSON body. [`ApiResponse`] keeps that
//! body untouched next to the HTTP status so callers decide what counts as a
//! failure; [`SendReceipt`] and [`HealthStatus`] are typed views over it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, AppResult};

/// Longest slice of a non-JSON body quoted in the decoding error.
const BODY_SNIPPET_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: u16,
    body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Decode a raw response body, whatever the status code.
    pub fn from_bytes(status: u16, bytes: &[u8]) -> AppResult<Self> {
        let body = serde_json::from_slice(bytes).map_err(|e| {
            let snippet: String = String::from_utf8_lossy(bytes)
                .chars()
                .take(BODY_SNIPPET_LEN)
                .collect();
            AppError::JsonDeserialization {
                context: format!("HTTP {status} response body is not JSON: {snippet:?}"),
                source: Some(Box::new(e)),
            }
        })?;
        Ok(Self { status, body })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// 2xx and the body does not report `"success": false`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
            && self.body.get("success").and_then(Value::as_bool) != Some(false)
    }

    /// The relay's `error` field, if present.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }

    /// Decode the body into a typed view.
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<T> {
        Ok(T::deserialize(&self.body)?)
    }

    /// Turn an unsuccessful response into [`AppError::Api`].
    pub fn into_result(self) -> AppResult<Value> {
        if self.is_success() {
            return Ok(self.body);
        }
        let message = self
            .error_message()
            .map(str::to_string)
            .unwrap_or_else(|| self.body.to_string());
        Err(AppError::Api {
            status: self.status,
            message,
        })
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Body of the send endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub response: Option<DeliveryResult>,
}

/// WeCom's own verdict, forwarded by the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryResult {
    #[serde(default)]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
    #[serde(default)]
    pub invaliduser: String,
    #[serde(default)]
    pub invalidparty: String,
    #[serde(default)]
    pub invalidtag: String,
}
