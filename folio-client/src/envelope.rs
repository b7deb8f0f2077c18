//! Response envelopes used by the backend

use folio_core::ApiError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// `{"message": ..., "data": ...}` wrapper around most payloads
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
    #[allow(dead_code)]
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body; validation failures carry a field map under `errors`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Best human-readable description of the failure
    pub fn describe(&self) -> Option<String> {
        let base = self.message.clone().or_else(|| self.detail.clone());
        let fields = self.errors.as_ref().and_then(flatten_errors);
        match (base, fields) {
            (Some(m), Some(f)) => Some(format!("{} ({})", m, f)),
            (Some(m), None) => Some(m),
            (None, f) => f,
        }
    }
}

/// Render `{"field": ["msg", ...]}` as `field: msg; ...`
fn flatten_errors(errors: &serde_json::Value) -> Option<String> {
    let map = errors.as_object()?;
    let parts: Vec<String> = map
        .iter()
        .map(|(field, msgs)| {
            let text = match msgs {
                serde_json::Value::Array(items) => items
                    .iter()
                    .map(|m| m.as_str().map(str::to_string).unwrap_or_else(|| m.to_string()))
                    .collect::<Vec<_>>()
                    .join(", "),
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{}: {}", field, text)
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

pub(crate) fn decode_data<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    decode::<DataEnvelope<T>>(bytes).map(|envelope| envelope.data)
}
