use std::sync::LazyLock;

use regex::Regex;

use crate::http::{ErrorKind, TransportError};

static TOO_MANY_REDIRECTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"stopped after \d+ redirects\z").expect("valid regex"));
static UNSUPPORTED_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"unsupported protocol scheme").expect("valid regex"));

/// Whether a failed exchange is worth trying again.
///
/// Redirect loops, bad schemes, TLS trust failures and oversized bodies are never retried. Neither is a
/// request the caller gave up on. Everything else is assumed transient.
pub fn is_retryable_error(err: Option<&TransportError>) -> bool {
    let Some(err) = err else {
        return false;
    };

    match err.kind {
        ErrorKind::TooManyRedirects
        | ErrorKind::UnsupportedScheme
        | ErrorKind::CertificateVerification
        | ErrorKind::UnknownAuthority
        | ErrorKind::ResponseTooLarge => return false,
        _ => {}
    }

    // Errors that never went through a structured mapping still carry the text.
    if TOO_MANY_REDIRECTS.is_match(&err.message) || UNSUPPORTED_SCHEME.is_match(&err.message) {
        return false;
    }

    !matches!(err.kind, ErrorKind::Cancelled | ErrorKind::DeadlineExceeded)
}
