use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::retry::config::{RateLimitConfig, RetryConfig};
use crate::retry::decision::{
    Attempt, RateLimitPolicy, RetryDecision, RetryPolicy, RetryReason, ServerErrorPolicy,
};

/// Decorator that re-sends a request through `next` for as long as its policy says so.
///
/// Attempts are strictly sequential. The loop holds no state beyond the current request,
/// so one instance can serve any number of concurrent requests.
pub struct RetryTransport<P> {
    next: Arc<dyn Transport>,
    policy: P,
    name: &'static str,
}

pub type RateLimitTransport = RetryTransport<RateLimitPolicy>;
pub type RetryableErrorTransport = RetryTransport<ServerErrorPolicy>;

impl<P: RetryPolicy> RetryTransport<P> {
    pub fn new(next: Arc<dyn Transport>, policy: P) -> Self {
        Self {
            next,
            policy,
            name: "retry",
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    async fn attempt(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let send = self.next.send(req.clone());
        let cancelled = async {
            match &req.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let deadline = async {
            match req.deadline {
                Some(d) => tokio::time::sleep_until(d).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            res = send => res,
            _ = cancelled => Err(TransportError::cancelled()),
            _ = deadline => Err(TransportError::deadline_exceeded()),
        }
    }

    /// Sleeps for `delay` unless the caller cancels first.
    ///
    /// A wait that would end past the deadline fails at once instead of sleeping.
    async fn wait(&self, req: &HttpRequest, delay: Duration) -> Result<(), TransportError> {
        if req.deadline.is_some_and(|d| Instant::now() + delay > d) {
            return Err(TransportError::deadline_exceeded());
        }

        match &req.cancel {
            Some(token) => tokio::select! {
                _ = tokio::time::sleep(delay) => Ok(()),
                _ = token.cancelled() => Err(TransportError::cancelled()),
            },
            None => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}

impl RateLimitTransport {
    pub fn rate_limit(next: Arc<dyn Transport>, config: RateLimitConfig) -> Self {
        Self {
            name: "rate-limit",
            ..Self::new(next, RateLimitPolicy::new(config))
        }
    }
}

impl RetryableErrorTransport {
    pub fn retryable_errors(next: Arc<dyn Transport>, config: RetryConfig) -> Self {
        Self {
            name: "retryable-error",
            ..Self::new(next, ServerErrorPolicy::new(config))
        }
    }
}

#[async_trait]
impl<P: RetryPolicy> Transport for RetryTransport<P> {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let started = Instant::now();
        let mut index = 0usize;

        loop {
            if let Some(err) = req.abandoned() {
                return Err(err);
            }

            let result = self.attempt(&req).await;
            let attempt = Attempt::from_result(&req, &result, index, started.elapsed());

            match self.policy.decide(&attempt) {
                RetryDecision::Stop { reason } => {
                    if reason == RetryReason::AttemptsExhausted {
                        tracing::warn!(
                            layer = self.name,
                            attempts = index + 1,
                            "retry budget exhausted for {} {}",
                            req.method,
                            req.url
                        );
                    } else if index > 0 {
                        tracing::debug!(
                            layer = self.name,
                            attempts = index + 1,
                            ?reason,
                            "giving up retrying {} {}",
                            req.method,
                            req.url
                        );
                    }
                    return result;
                }
                RetryDecision::RetryAfter { delay, reason } => {
                    tracing::debug!(
                        layer = self.name,
                        attempt = index,
                        ?reason,
                        delay_ms = delay.as_millis() as u64,
                        "retrying {} {}",
                        req.method,
                        req.url
                    );
                    self.wait(&req, delay).await?;
                    index += 1;
                }
            }
        }
    }
}

/// Builds the standard chain: rate-limit handling around transient-error retries around `base`.
pub fn resilient_transport(
    base: Arc<dyn Transport>,
    rate_limit: RateLimitConfig,
    retry: RetryConfig,
) -> RateLimitTransport {
    let retrying: Arc<dyn Transport> = Arc::new(RetryableErrorTransport::retryable_errors(base, retry));
    RateLimitTransport::rate_limit(retrying, rate_limit)
}
