use std::time::{Duration, SystemTime};

use tenantctl_transport::HttpResponse;
use tenantctl_transport::retry::{RateLimitConfig, rate_limit_delay};

fn rate_limited(reset: Option<&str>) -> HttpResponse {
    let mut resp = HttpResponse::new(429);
    if let Some(v) = reset {
        resp.headers.insert("X-RateLimit-Reset".to_string(), v.to_string());
    }
    resp
}

fn unix(t: SystemTime) -> u64 {
    t.duration_since(SystemTime::UNIX_EPOCH).unwrap().as_secs()
}

#[test]
fn delay_runs_until_reset_timestamp() {
    let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let resp = rate_limited(Some(&(unix(now) + 7).to_string()));

    let delay = rate_limit_delay(&resp, &RateLimitConfig::default(), now);
    assert_eq!(delay, Duration::from_secs(7));
}

#[test]
fn reset_in_the_past_means_no_wait() {
    let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let resp = rate_limited(Some(&(unix(now) - 30).to_string()));

    let delay = rate_limit_delay(&resp, &RateLimitConfig::default(), now);
    assert_eq!(delay, Duration::ZERO);
}

#[test]
fn missing_header_falls_back_to_five_seconds() {
    let delay = rate_limit_delay(&rate_limited(None), &RateLimitConfig::default(), SystemTime::now());
    assert_eq!(delay, Duration::from_secs(5));
}

#[test]
fn malformed_header_falls_back_to_five_seconds() {
    for bad in ["", "soon", "12.5", "Wed, 21 Oct 2015 07:28:00 GMT"] {
        let delay = rate_limit_delay(&rate_limited(Some(bad)), &RateLimitConfig::default(), SystemTime::now());
        assert_eq!(delay, Duration::from_secs(5), "header value {bad:?}");
    }
}

#[test]
fn header_lookup_is_case_insensitive() {
    let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let mut resp = HttpResponse::new(429);
    resp.headers.insert("x-ratelimit-reset".to_string(), (unix(now) + 3).to_string());

    let delay = rate_limit_delay(&resp, &RateLimitConfig::default(), now);
    assert_eq!(delay, Duration::from_secs(3));
}

#[test]
fn custom_header_and_fallback() {
    let cfg = RateLimitConfig {
        reset_header: "X-Reset-At".to_string(),
        fallback_delay: Duration::from_secs(2),
        max_retries: None,
    };
    let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);

    let mut resp = HttpResponse::new(429);
    resp.headers.insert("X-Reset-At".to_string(), (unix(now) + 4).to_string());
    assert_eq!(rate_limit_delay(&resp, &cfg, now), Duration::from_secs(4));

    // The default header name is ignored once another one is configured.
    let resp = rate_limited(Some(&(unix(now) + 9).to_string()));
    assert_eq!(rate_limit_delay(&resp, &cfg, now), Duration::from_secs(2));
}
