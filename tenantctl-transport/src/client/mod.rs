//! Authenticated client for the tenant management API.
//!
//! Every request goes through whatever [`Transport`] the client was built with; in the
//! CLI that is the resilient chain from [`crate::retry::resilient_transport`].

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::http::{HttpRequest, HttpResponse, Transport};

mod error;
mod method;
mod redact;
mod resource;
mod token;

pub use error::ClientError;
pub use method::{ApiMethod, validate_payload};
pub use redact::redact_headers;
pub use resource::Resource;
pub use token::AccessToken;

pub const USER_AGENT: &str = concat!("tenantctl/", env!("CARGO_PKG_VERSION"));

pub struct ManagementClient {
    transport: Arc<dyn Transport>,
    base_url: url::Url,
    token: AccessToken,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl ManagementClient {
    /// Client for `https://<domain>/api/v2/`.
    pub fn new(domain: &str, token: AccessToken, transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        let domain = domain.trim().trim_end_matches('/');
        let base = url::Url::parse(&format!("https://{domain}/api/v2/"))
            .map_err(|e| ClientError::InvalidUrl(format!("{domain}: {e}")))?;
        Ok(Self::with_base_url(base, token, transport))
    }

    /// Client for an explicit API base such as `http://127.0.0.1:8080/api/v2`.
    pub fn from_api_url(api_url: &str, token: AccessToken, transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        let base = url::Url::parse(api_url.trim()).map_err(|e| ClientError::InvalidUrl(format!("{api_url}: {e}")))?;
        Ok(Self::with_base_url(base, token, transport))
    }

    pub fn with_base_url(mut base_url: url::Url, token: AccessToken, transport: Arc<dyn Transport>) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        base_url.set_query(None);
        base_url.set_fragment(None);
        Self {
            transport,
            base_url,
            token,
            timeout: None,
            cancel: None,
        }
    }

    /// Overall budget per call, retries and waits included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Appends `path` to the API base and sets `query` on it, replacing existing keys.
    ///
    /// The path is never resolved as a URL of its own, so the token only goes to the base host.
    pub fn endpoint(&self, path: &str, query: &BTreeMap<String, String>) -> Result<url::Url, ClientError> {
        let raw = format!("{}{}", self.base_url, path.trim().trim_matches('/'));
        let mut url = url::Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))?;

        if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path()) {
            return Err(ClientError::InvalidUrl(format!("{path}: escapes {}", self.base_url)));
        }

        if !query.is_empty() {
            let mut pairs: BTreeMap<String, String> = url.query_pairs().into_owned().collect();
            for (k, v) in query {
                pairs.insert(k.clone(), v.clone());
            }
            url.query_pairs_mut().clear().extend_pairs(pairs.iter());
        }
        Ok(url)
    }

    fn item_endpoint(&self, resource: Resource, id: &str) -> Result<url::Url, ClientError> {
        if !resource.is_collection() {
            return Err(ClientError::NotACollection(resource.name()));
        }
        let mut url = self.endpoint(resource.path(), &BTreeMap::new())?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .push(id);
        Ok(url)
    }

    pub fn request(&self, method: ApiMethod, url: url::Url, body: Vec<u8>) -> HttpRequest {
        let mut req = HttpRequest::new(method.as_str(), url)
            .header("Authorization", format!("Bearer {}", self.token.expose()))
            .header("Content-Type", "application/json")
            .header("User-Agent", USER_AGENT)
            .body(body);
        if let Some(t) = self.timeout {
            req = req.deadline(Instant::now() + t);
        }
        if let Some(c) = &self.cancel {
            req = req.cancellation(c.clone());
        }
        req
    }

    /// Sends a prepared request. Any HTTP status counts as success here.
    pub async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ClientError> {
        tracing::debug!(
            method = %req.method,
            url = %req.url,
            headers = ?redact_headers(&req.headers),
            "sending management API request"
        );
        let resp = self.transport.send(req).await?;
        tracing::debug!(status = resp.status, bytes = resp.body.len(), "received response");
        Ok(resp)
    }

    /// Raw call used by the `api` passthrough: returns the response whatever its status.
    pub async fn call(
        &self,
        method: ApiMethod,
        path: &str,
        query: &BTreeMap<String, String>,
        body: Vec<u8>,
    ) -> Result<HttpResponse, ClientError> {
        validate_payload(&body)?;
        let url = self.endpoint(path, query)?;
        self.send(self.request(method, url, body)).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: url::Url) -> Result<T, ClientError> {
        let resp = self.send(self.request(ApiMethod::Get, url, Vec::new())).await?;
        let resp = ensure_success(resp)?;
        Ok(serde_json::from_slice(&resp.body)?)
    }

    pub async fn list(&self, resource: Resource) -> Result<serde_json::Value, ClientError> {
        self.get_json(self.endpoint(resource.path(), &BTreeMap::new())?).await
    }

    /// Fetches one item of a collection, or the resource itself when it is a singleton.
    pub async fn show(&self, resource: Resource, id: Option<&str>) -> Result<serde_json::Value, ClientError> {
        let url = match id {
            Some(id) => self.item_endpoint(resource, id)?,
            None => self.endpoint(resource.path(), &BTreeMap::new())?,
        };
        self.get_json(url).await
    }
}

/// Turns a non-2xx response into [`ClientError::Api`].
pub fn ensure_success(resp: HttpResponse) -> Result<HttpResponse, ClientError> {
    if resp.is_success() {
        Ok(resp)
    } else {
        Err(ClientError::from_response(resp.status, &resp.body))
    }
}
