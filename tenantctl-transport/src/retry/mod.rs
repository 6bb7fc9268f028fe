mod backoff;
mod classify;
mod config;
mod decision;
mod headers;
mod transport;

pub use backoff::exp_jitter_delay;
pub use classify::is_retryable_error;
pub use config::{CDN_ORIGIN_TIMEOUT, RATE_LIMIT_RESET_HEADER, RateLimitConfig, RetryConfig};
pub use decision::{
    Attempt, RateLimitPolicy, RetryDecision, RetryPolicy, RetryReason, ServerErrorPolicy, decide_rate_limit,
    decide_server_error,
};
pub use headers::rate_limit_delay;
pub use transport::{RateLimitTransport, RetryTransport, RetryableErrorTransport, resilient_transport};
