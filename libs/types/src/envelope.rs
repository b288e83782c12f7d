//! Reply shapes
//!
//! `ExchangeResponse` is what Kraken sends back; `ResultEnvelope` is the
//! uniform body the gateway returns to its own callers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Separator used when flattening Kraken's error list into one message
pub const ERROR_SEPARATOR: &str = " | ";

/// Body of a Kraken private REST reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeResponse {
    /// Application-level errors, e.g. `EGeneral:Invalid arguments`
    #[serde(default, deserialize_with = "nullable_list")]
    pub error: Vec<String>,
    /// Opaque result payload; `Null` when absent
    #[serde(default)]
    pub result: Value,
}

impl ExchangeResponse {
    /// Error list joined with [`ERROR_SEPARATOR`], `None` when there are no errors.
    pub fn joined_errors(&self) -> Option<String> {
        if self.error.is_empty() {
            None
        } else {
            Some(self.error.join(ERROR_SEPARATOR))
        }
    }
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Uniform success/failure body returned to gateway callers.
///
/// `result` is always present on success (possibly `null`) and omitted on
/// failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl ResultEnvelope {
    pub fn success(message: impl Into<String>, result: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            result: Some(result),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            result: None,
        }
    }
}
