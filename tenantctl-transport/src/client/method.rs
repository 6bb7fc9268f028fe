use std::fmt;
use std::str::FromStr;

use crate::client::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl ApiMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiMethod::Get => "GET",
            ApiMethod::Post => "POST",
            ApiMethod::Put => "PUT",
            ApiMethod::Patch => "PATCH",
            ApiMethod::Delete => "DELETE",
        }
    }

    /// Method for a raw API call. Without an explicit method, GET, or POST when a payload is sent.
    pub fn resolve(explicit: Option<&str>, has_data: bool) -> Result<Self, ClientError> {
        match explicit {
            Some(m) => m.parse(),
            None if has_data => Ok(ApiMethod::Post),
            None => Ok(ApiMethod::Get),
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiMethod {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(ApiMethod::Get),
            "POST" => Ok(ApiMethod::Post),
            "PUT" => Ok(ApiMethod::Put),
            "PATCH" => Ok(ApiMethod::Patch),
            "DELETE" => Ok(ApiMethod::Delete),
            _ => Err(ClientError::InvalidMethod(s.to_string())),
        }
    }
}

/// Rejects non-empty payloads that are not JSON.
pub fn validate_payload(data: &[u8]) -> Result<(), ClientError> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }
    serde_json::from_slice::<serde::de::IgnoredAny>(data)
        .map(|_| ())
        .map_err(|_| ClientError::InvalidData(String::from_utf8_lossy(data).into_owned()))
}
