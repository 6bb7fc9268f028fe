use std::time::{Duration, SystemTime};

use crate::http::HttpResponse;
use crate::retry::config::RateLimitConfig;

/// Time to wait before re-sending a rate-limited request.
///
/// Reads the reset header as Unix seconds. A reset in the past yields zero; a missing
/// or non-integer header yields the configured fallback.
pub fn rate_limit_delay(resp: &HttpResponse, cfg: &RateLimitConfig, now: SystemTime) -> Duration {
    match resp.header(&cfg.reset_header).and_then(parse_unix_seconds) {
        Some(reset_at) => {
            let now_secs = unix_seconds(now);
            Duration::from_secs(reset_at.saturating_sub(now_secs).max(0) as u64)
        }
        None => cfg.fallback_delay,
    }
}

fn parse_unix_seconds(v: &str) -> Option<i64> {
    v.trim().parse::<i64>().ok()
}

fn unix_seconds(t: SystemTime) -> i64 {
    match t.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}
