use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::http::{ErrorKind, HttpRequest, HttpResponse, Transport, TransportError};

const MAX_REDIRECTS: usize = 10;
const DEFAULT_MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

/// Base transport: a single exchange over a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    max_response_bytes: usize,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(user_agent)
            .build()
            .map_err(|e| TransportError::other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    pub fn max_response_bytes(mut self, max: usize) -> Self {
        self.max_response_bytes = max;
        self
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let scheme = req.url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(TransportError::new(
                ErrorKind::UnsupportedScheme,
                format!("unsupported protocol scheme \"{scheme}\""),
            ));
        }

        let method = req
            .method
            .parse::<reqwest::Method>()
            .map_err(|e| TransportError::other(format!("invalid method {}: {e}", req.method)))?;
        let mut rb = self.client.request(method, req.url);

        if let Some(deadline) = req.deadline {
            rb = rb.timeout(deadline.saturating_duration_since(Instant::now()).max(Duration::from_millis(1)));
        }

        for (k, v) in req.headers {
            rb = rb.header(k, v);
        }

        rb = rb.body(req.body);

        let mut resp = rb.send().await.map_err(map_reqwest_error)?;
        let status = resp.status().as_u16();

        let mut headers = BTreeMap::new();
        for (k, v) in resp.headers().iter() {
            if let Ok(s) = v.to_str() {
                headers.insert(k.to_string(), s.to_string());
            }
        }

        let too_large = || {
            TransportError::new(
                ErrorKind::ResponseTooLarge,
                format!("response too large (>{} bytes)", self.max_response_bytes),
            )
        };
        if resp.content_length().is_some_and(|n| n > self.max_response_bytes as u64) {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await.map_err(map_reqwest_error)? {
            if body.len() + chunk.len() > self.max_response_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(HttpResponse { status, headers, body })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_redirect() {
        return TransportError::new(
            ErrorKind::TooManyRedirects,
            format!("stopped after {MAX_REDIRECTS} redirects"),
        );
    }
    if e.is_timeout() {
        return TransportError::new(ErrorKind::Timeout, e.to_string());
    }
    match kind_from_error_chain(&e) {
        ErrorKind::Other if e.is_connect() => TransportError::new(ErrorKind::Connect, e.to_string()),
        kind => TransportError::new(kind, e.to_string()),
    }
}

/// Inspects every error in the source chain for TLS trust and scheme failures.
///
/// TLS backends surface these only through their display text, so matching is textual.
/// Unknown-issuer wins over the generic verification failure wherever it appears.
pub fn kind_from_error_chain(err: &(dyn StdError + 'static)) -> ErrorKind {
    let mut messages = Vec::new();
    let mut cur = Some(err);
    while let Some(e) = cur {
        messages.push(e.to_string().to_ascii_lowercase());
        cur = e.source();
    }

    if contains_any(&messages, &["unknownissuer", "unknown issuer", "unable to get local issuer certificate", "unknown ca"]) {
        return ErrorKind::UnknownAuthority;
    }
    if contains_any(&messages, &["invalid peer certificate", "certificate verify failed", "certificate verification"]) {
        return ErrorKind::CertificateVerification;
    }
    if contains_any(&messages, &["url scheme is not allowed", "unsupported protocol scheme"]) {
        return ErrorKind::UnsupportedScheme;
    }
    ErrorKind::Other
}

fn contains_any(messages: &[String], needles: &[&str]) -> bool {
    messages.iter().any(|m| needles.iter().any(|n| m.contains(n)))
}
