use std::time::Duration;

/// Capped exponential backoff with multiplicative full jitter.
///
/// `top = min(max, base * 2^attempt)`; the result is `top * unit` where `unit` is
/// expected in `[0, 1)`. Out-of-range `unit` values are clamped.
pub fn exp_jitter_delay(base: Duration, max: Duration, attempt: usize, unit: f64) -> Duration {
    let exp = attempt.min(i32::MAX as usize) as i32;
    let raw = base.as_secs_f64() * 2f64.powi(exp);
    let top = raw.min(max.as_secs_f64()).max(0.0);
    let unit = if unit.is_finite() { unit.clamp(0.0, 1.0) } else { 0.0 };
    Duration::from_secs_f64(top * unit)
}
