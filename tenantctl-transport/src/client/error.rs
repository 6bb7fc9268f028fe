use serde::Deserialize;

use crate::http::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("invalid uri given: {0}")]
    InvalidUrl(String),
    #[error("invalid method given: {0}, accepting only GET, POST, PUT, PATCH, DELETE")]
    InvalidMethod(String),
    #[error("invalid json data given: {0}")]
    InvalidData(String),
    #[error("{} is not a collection; it has no items to address by id", .0)]
    NotACollection(&'static str),
    #[error("{message} (status {status})")]
    Api {
        status: u16,
        message: String,
        error_code: Option<String>,
    },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Error body returned by the management API on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ApiErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
    pub error_code: Option<String>,
}

impl ClientError {
    pub(crate) fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed: ApiErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                if text.is_empty() { format!("request failed with status {status}") } else { text }
            });
        ClientError::Api {
            status,
            message,
            error_code: parsed.error_code,
        }
    }
}
