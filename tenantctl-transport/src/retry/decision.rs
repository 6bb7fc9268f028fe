use std::time::{Duration, SystemTime};

use crate::http::{HttpRequest, HttpResponse, TransportError};
use crate::retry::backoff::exp_jitter_delay;
use crate::retry::classify::is_retryable_error;
use crate::retry::config::{RateLimitConfig, RetryConfig};
use crate::retry::headers::rate_limit_delay;

/// One finished try of a request, handed to a policy and then dropped.
#[derive(Debug, Clone, Copy)]
pub struct Attempt<'a> {
    pub request: &'a HttpRequest,
    pub response: Option<&'a HttpResponse>,
    pub error: Option<&'a TransportError>,
    /// 0-based.
    pub index: usize,
    pub elapsed: Duration,
}

impl<'a> Attempt<'a> {
    pub fn from_result(
        request: &'a HttpRequest,
        result: &'a Result<HttpResponse, TransportError>,
        index: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            request,
            response: result.as_ref().ok(),
            error: result.as_ref().err(),
            index,
            elapsed,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response.map(|r| r.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter { delay: Duration, reason: RetryReason },
    Stop { reason: RetryReason },
}

impl RetryDecision {
    pub fn should_retry(&self) -> bool {
        matches!(self, RetryDecision::RetryAfter { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    NotRetryable,
    AttemptsExhausted,
    RateLimited,
    RateLimitFallback,
    HttpStatus(u16),
    NetworkFailure,
}

/// Pure mapping from a finished attempt to whether, and when, to try again.
pub trait RetryPolicy: Send + Sync {
    fn decide(&self, attempt: &Attempt<'_>) -> RetryDecision;
}

/// Retry on 429 only, waiting until the server-advertised reset.
pub fn decide_rate_limit(cfg: &RateLimitConfig, attempt: &Attempt<'_>, now: SystemTime) -> RetryDecision {
    let Some(resp) = attempt.response.filter(|r| r.status == 429) else {
        return RetryDecision::Stop {
            reason: RetryReason::NotRetryable,
        };
    };

    if cfg.max_retries.is_some_and(|max| attempt.index >= max) {
        return RetryDecision::Stop {
            reason: RetryReason::AttemptsExhausted,
        };
    }

    let reason = if resp.header(&cfg.reset_header).is_some_and(|v| v.trim().parse::<i64>().is_ok()) {
        RetryReason::RateLimited
    } else {
        RetryReason::RateLimitFallback
    };
    RetryDecision::RetryAfter {
        delay: rate_limit_delay(resp, cfg, now),
        reason,
    }
}

/// Retry on retryable statuses or transient network errors, with jittered backoff.
///
/// `unit` supplies the jitter factor in `[0, 1)`.
pub fn decide_server_error(cfg: &RetryConfig, attempt: &Attempt<'_>, unit: impl Fn() -> f64) -> RetryDecision {
    let reason = match attempt.response {
        Some(resp) if cfg.retry_statuses.contains(&resp.status) => RetryReason::HttpStatus(resp.status),
        Some(_) => {
            return RetryDecision::Stop {
                reason: RetryReason::NotRetryable,
            };
        }
        None if is_retryable_error(attempt.error) => RetryReason::NetworkFailure,
        None => {
            return RetryDecision::Stop {
                reason: RetryReason::NotRetryable,
            };
        }
    };

    if attempt.index >= cfg.max_retries {
        return RetryDecision::Stop {
            reason: RetryReason::AttemptsExhausted,
        };
    }

    RetryDecision::RetryAfter {
        delay: exp_jitter_delay(cfg.base_delay, cfg.max_delay, attempt.index, unit()),
        reason,
    }
}

#[derive(Debug, Clone, Default)]
pub struct RateLimitPolicy {
    pub config: RateLimitConfig,
}

impl RateLimitPolicy {
    pub fn new(config: RateLimitConfig) -> Self {
        Self { config }
    }
}

impl RetryPolicy for RateLimitPolicy {
    fn decide(&self, attempt: &Attempt<'_>) -> RetryDecision {
        decide_rate_limit(&self.config, attempt, SystemTime::now())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServerErrorPolicy {
    pub config: RetryConfig,
}

impl ServerErrorPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }
}

impl RetryPolicy for ServerErrorPolicy {
    fn decide(&self, attempt: &Attempt<'_>) -> RetryDecision {
        decide_server_error(&self.config, attempt, fastrand::f64)
    }
}
