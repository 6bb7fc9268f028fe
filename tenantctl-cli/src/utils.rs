use std::collections::BTreeMap;
use std::io::{IsTerminal, Read};
use std::sync::Arc;

use tenantctl_transport::client::USER_AGENT;
use tenantctl_transport::{
    AccessToken, ClientError, ManagementClient, RateLimitConfig, ReqwestTransport, RetryConfig, Transport,
    resilient_transport,
};
use tokio_util::sync::CancellationToken;

use crate::args::RequestArgs;
use crate::config::Tenant;
use crate::exit_codes;

/// Parses repeated `KEY=VALUE` flags; later keys replace earlier ones.
pub fn parse_query(raw: &[String]) -> Result<BTreeMap<String, String>, String> {
    let mut out = BTreeMap::new();
    for s in raw {
        match s.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() => {
                out.insert(k.trim().to_string(), v.to_string());
            }
            _ => return Err(format!("invalid query param '{s}', expected KEY=VALUE")),
        }
    }
    Ok(out)
}

/// Reads stdin when something is piped in; empty when stdin is a terminal.
pub fn read_piped_stdin() -> std::io::Result<Vec<u8>> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(Vec::new());
    }
    let mut buf = Vec::new();
    stdin.read_to_end(&mut buf)?;
    Ok(buf)
}

pub fn build_client(
    tenant: &Tenant,
    request: &RequestArgs,
    cancel: &CancellationToken,
) -> Result<ManagementClient, ClientError> {
    let base: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(USER_AGENT)?);
    let transport: Arc<dyn Transport> =
        Arc::new(resilient_transport(base, RateLimitConfig::default(), RetryConfig::default()));
    let token = AccessToken::new(tenant.access_token.clone());

    if tenant.is_expired(chrono::Utc::now()) {
        tracing::warn!(tenant = %tenant.domain, "access token has expired; requests will likely fail with 401");
    }

    let client = match &tenant.api_url {
        Some(api_url) => ManagementClient::from_api_url(api_url, token, transport)?,
        None => ManagementClient::new(&tenant.domain, token, transport)?,
    };

    let client = client.cancellation(cancel.clone());
    Ok(match request.timeout() {
        Some(t) => client.timeout(t),
        None => client,
    })
}

pub fn exit_code_for(err: &ClientError) -> i32 {
    match err {
        ClientError::InvalidUrl(_)
        | ClientError::InvalidMethod(_)
        | ClientError::InvalidData(_)
        | ClientError::NotACollection(_) => exit_codes::INVALID_INPUT,
        ClientError::Transport(_) | ClientError::Api { .. } => exit_codes::REQUEST_FAILED,
        ClientError::Decode(_) => exit_codes::RUNTIME_ERROR,
    }
}
