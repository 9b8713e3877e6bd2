//! The `{ success, data, message }` wrapper every API reply uses.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::GatewayError;

/// API response wrapper.
///
/// `data` stays untyped until the call knows it succeeded, so a failure
/// reply with an unexpected `data` shape still surfaces its message.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    /// Parse a reply body.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Malformed` if the body is not a JSON envelope.
    pub fn parse(status: StatusCode, body: &[u8]) -> Result<Self, GatewayError> {
        serde_json::from_slice(body).map_err(|e| {
            if status.is_success() {
                GatewayError::Malformed(format!("invalid envelope: {e}"))
            } else {
                GatewayError::Malformed(format!("HTTP {status} without an envelope"))
            }
        })
    }

    /// Extract the typed payload of a successful reply.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Rejected` with the server's message (or
    /// `fallback`) when `success` is false, and `GatewayError::Malformed`
    /// when `data` is missing or has the wrong shape.
    pub fn into_data<T: DeserializeOwned>(self, fallback: &str) -> Result<T, GatewayError> {
        let data = self.check(fallback)?.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(data)
            .map_err(|e| GatewayError::Malformed(format!("unexpected data: {e}")))
    }

    /// Confirm a successful reply whose payload is irrelevant.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Rejected` when `success` is false.
    pub fn into_unit(self, fallback: &str) -> Result<(), GatewayError> {
        self.check(fallback).map(drop)
    }

    fn check(self, fallback: &str) -> Result<Option<serde_json::Value>, GatewayError> {
        if self.success {
            return Ok(self.data);
        }

        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Err(GatewayError::Rejected(message))
    }
}
