use std::time::{Duration, SystemTime};

use tenantctl_transport::retry::{
    Attempt, RateLimitConfig, RetryConfig, RetryDecision, RetryReason, decide_rate_limit, decide_server_error,
};
use tenantctl_transport::{ErrorKind, HttpRequest, HttpResponse, TransportError};

fn req() -> HttpRequest {
    HttpRequest::new("GET", url::Url::parse("https://tenant.example.com/api/v2/users").unwrap())
}

fn attempt<'a>(
    request: &'a HttpRequest,
    result: &'a Result<HttpResponse, TransportError>,
    index: usize,
) -> Attempt<'a> {
    Attempt::from_result(request, result, index, Duration::ZERO)
}

#[test]
fn server_error_retries_listed_statuses() {
    let cfg = RetryConfig::default();
    let r = req();
    for status in [500u16, 502, 503, 504, 524] {
        let result = Ok(HttpResponse::new(status));
        let d = decide_server_error(&cfg, &attempt(&r, &result, 0), || 0.999);
        assert!(d.should_retry(), "status {status}");
    }
}

#[test]
fn server_error_ignores_other_statuses() {
    let cfg = RetryConfig::default();
    let r = req();
    for status in [200u16, 400, 401, 404, 429, 501] {
        let result = Ok(HttpResponse::new(status));
        let d = decide_server_error(&cfg, &attempt(&r, &result, 0), || 0.5);
        assert_eq!(
            d,
            RetryDecision::Stop {
                reason: RetryReason::NotRetryable
            },
            "status {status}"
        );
    }
}

#[test]
fn server_error_backoff_is_jittered_exponential() {
    let cfg = RetryConfig::default();
    let r = req();
    let result = Ok(HttpResponse::new(503));

    let d = decide_server_error(&cfg, &attempt(&r, &result, 2), || 0.5);
    assert_eq!(
        d,
        RetryDecision::RetryAfter {
            delay: Duration::from_secs(1),
            reason: RetryReason::HttpStatus(503)
        }
    );
}

#[test]
fn server_error_stops_after_three_retries() {
    let cfg = RetryConfig::default();
    let r = req();
    let result = Ok(HttpResponse::new(500));

    assert!(decide_server_error(&cfg, &attempt(&r, &result, 2), || 0.0).should_retry());
    assert_eq!(
        decide_server_error(&cfg, &attempt(&r, &result, 3), || 0.0),
        RetryDecision::Stop {
            reason: RetryReason::AttemptsExhausted
        }
    );
}

#[test]
fn server_error_retries_transient_network_errors_only() {
    let cfg = RetryConfig::default();
    let r = req();

    let reset: Result<HttpResponse, TransportError> = Err(TransportError::new(ErrorKind::Connect, "connection reset"));
    assert_eq!(
        decide_server_error(&cfg, &attempt(&r, &reset, 0), || 0.0),
        RetryDecision::RetryAfter {
            delay: Duration::ZERO,
            reason: RetryReason::NetworkFailure
        }
    );

    let tls: Result<HttpResponse, TransportError> =
        Err(TransportError::new(ErrorKind::UnknownAuthority, "unknown issuer"));
    assert!(!decide_server_error(&cfg, &attempt(&r, &tls, 0), || 0.0).should_retry());
}

#[test]
fn rate_limit_only_reacts_to_429() {
    let cfg = RateLimitConfig::default();
    let r = req();

    for result in [
        Ok(HttpResponse::new(200)),
        Ok(HttpResponse::new(503)),
        Err(TransportError::other("connection refused")),
    ] {
        let d = decide_rate_limit(&cfg, &attempt(&r, &result, 0), SystemTime::now());
        assert!(!d.should_retry());
    }
}

#[test]
fn rate_limit_waits_for_reset_header() {
    let cfg = RateLimitConfig::default();
    let r = req();
    let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let mut resp = HttpResponse::new(429);
    resp.headers.insert("X-RateLimit-Reset".to_string(), "1700000002".to_string());
    let result = Ok(resp);

    assert_eq!(
        decide_rate_limit(&cfg, &attempt(&r, &result, 0), now),
        RetryDecision::RetryAfter {
            delay: Duration::from_secs(2),
            reason: RetryReason::RateLimited
        }
    );
}

#[test]
fn rate_limit_without_header_uses_fallback() {
    let cfg = RateLimitConfig::default();
    let r = req();
    let result = Ok(HttpResponse::new(429));

    assert_eq!(
        decide_rate_limit(&cfg, &attempt(&r, &result, 0), SystemTime::now()),
        RetryDecision::RetryAfter {
            delay: Duration::from_secs(5),
            reason: RetryReason::RateLimitFallback
        }
    );
}

#[test]
fn rate_limit_is_unbounded_by_default() {
    let cfg = RateLimitConfig::default();
    let r = req();
    let result = Ok(HttpResponse::new(429));
    assert!(decide_rate_limit(&cfg, &attempt(&r, &result, 10_000), SystemTime::now()).should_retry());

    let capped = RateLimitConfig {
        max_retries: Some(2),
        ..Default::default()
    };
    assert!(!decide_rate_limit(&capped, &attempt(&r, &result, 2), SystemTime::now()).should_retry());
}
