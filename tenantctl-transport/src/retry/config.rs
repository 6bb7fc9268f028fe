use std::collections::BTreeSet;
use std::time::Duration;

/// 524: the CDN reached the origin but got no HTTP response back.
pub const CDN_ORIGIN_TIMEOUT: u16 = 524;

pub const RATE_LIMIT_RESET_HEADER: &str = "X-RateLimit-Reset";

/// Policy for transient server failures and recoverable network errors.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub retry_statuses: BTreeSet<u16>,
    /// Retries after the initial attempt.
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_statuses: [503u16, 500, 502, 504, CDN_ORIGIN_TIMEOUT].into_iter().collect(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

/// Policy for HTTP 429 responses.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Response header holding the Unix timestamp (seconds) at which capacity resets.
    pub reset_header: String,
    pub fallback_delay: Duration,
    /// `None` keeps retrying for as long as the server answers 429.
    pub max_retries: Option<usize>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            reset_header: RATE_LIMIT_RESET_HEADER.to_string(),
            fallback_delay: Duration::from_secs(5),
            max_retries: None,
        }
    }
}
