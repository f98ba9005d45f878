//! Retry policy and the sleep abstraction used by the fetcher

use async_trait::async_trait;
use std::time::Duration;

use crate::config::RetrySettings;
use crate::constants::retry;

/// Waits the fetcher performs. Swapped out in tests so no real time passes.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// How long to wait between calls and retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Courtesy delay before every fetch, independent of retries
    pub request_delay: Duration,
    /// Total attempts per fetch
    pub max_retries: u32,
    /// Upper bound for any wait after a 429, including Retry-After
    pub rate_limit_cap: Duration,
    /// Upper bound for the wait after a transport failure
    pub transport_cap: Duration,
    pub max_jitter: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_millis(retry::REQUEST_DELAY_MS),
            max_retries: retry::MAX_RETRIES,
            rate_limit_cap: Duration::from_secs(retry::RATE_LIMIT_CAP_SECONDS),
            transport_cap: Duration::from_secs(retry::TRANSPORT_CAP_SECONDS),
            max_jitter: Duration::from_millis(retry::MAX_JITTER_MS),
        }
    }
}

impl From<&RetrySettings> for BackoffPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            request_delay: Duration::from_millis(settings.request_delay_ms),
            max_retries: settings.max_retries.max(1),
            rate_limit_cap: Duration::from_secs(settings.rate_limit_cap_seconds),
            transport_cap: Duration::from_secs(settings.transport_cap_seconds),
            max_jitter: Duration::from_millis(retry::MAX_JITTER_MS),
        }
    }
}

impl BackoffPolicy {
    /// Policy without any waiting, for tests.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            request_delay: Duration::ZERO,
            max_retries: max_retries.max(1),
            rate_limit_cap: Duration::ZERO,
            transport_cap: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    /// `min(cap, 2^(attempt-1)s + jitter)` where `jitter_sample` in `[0, 1)`
    /// is scaled by `max_jitter`. `attempt` starts at 1.
    pub fn delay_for(&self, attempt: u32, cap: Duration, jitter_sample: f64) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let base = Duration::from_secs(1u64 << exponent);
        let jitter = self.max_jitter.mul_f64(jitter_sample.clamp(0.0, 1.0));
        base.saturating_add(jitter).min(cap)
    }

    /// Wait after a 429. A whole-second Retry-After wins over the exponential
    /// delay but is still held to `rate_limit_cap`.
    pub fn rate_limit_delay(
        &self,
        attempt: u32,
        retry_after: Option<Duration>,
        jitter_sample: f64,
    ) -> Duration {
        match retry_after {
            Some(hint) => hint.min(self.rate_limit_cap),
            None => self.delay_for(attempt, self.rate_limit_cap, jitter_sample),
        }
    }

    pub fn transport_delay(&self, attempt: u32, jitter_sample: f64) -> Duration {
        self.delay_for(attempt, self.transport_cap, jitter_sample)
    }

    /// Worst-case retry sleeping for one fetch, excluding the courtesy delay.
    pub fn max_total_wait(&self) -> Duration {
        self.rate_limit_cap.max(self.transport_cap) * self.max_retries
    }
}

/// Parses a Retry-After value given in whole seconds. HTTP dates are ignored.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> BackoffPolicy {
        BackoffPolicy {
            request_delay: Duration::from_millis(350),
            max_retries: 6,
            rate_limit_cap: Duration::from_secs(30),
            transport_cap: Duration::from_secs(20),
            max_jitter: Duration::from_millis(1000),
        }
    }

    #[test]
    fn test_delay_grows_exponentially() {
        let p = policy();
        let cap = Duration::from_secs(30);
        assert_eq!(p.delay_for(1, cap, 0.0), Duration::from_secs(1));
        assert_eq!(p.delay_for(2, cap, 0.0), Duration::from_secs(2));
        assert_eq!(p.delay_for(3, cap, 0.0), Duration::from_secs(4));
        assert_eq!(p.delay_for(5, cap, 0.0), Duration::from_secs(16));
    }

    #[test]
    fn test_delay_is_capped() {
        let p = policy();
        assert_eq!(p.delay_for(6, Duration::from_secs(30), 0.0), Duration::from_secs(30));
        assert_eq!(p.transport_delay(6, 0.9), Duration::from_secs(20));
        // Huge attempt numbers must not overflow
        assert_eq!(p.delay_for(u32::MAX, Duration::from_secs(30), 0.5), Duration::from_secs(30));
    }

    #[test]
    fn test_jitter_is_added_below_cap() {
        let p = policy();
        assert_eq!(
            p.delay_for(2, Duration::from_secs(30), 0.5),
            Duration::from_millis(2500)
        );
        // Out-of-range samples are clamped
        assert_eq!(
            p.delay_for(1, Duration::from_secs(30), 7.0),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_retry_after_is_clamped() {
        let p = policy();
        assert_eq!(
            p.rate_limit_delay(1, Some(Duration::from_secs(5)), 0.0),
            Duration::from_secs(5)
        );
        assert_eq!(
            p.rate_limit_delay(1, Some(Duration::from_secs(600)), 0.0),
            Duration::from_secs(30)
        );
        assert_eq!(p.rate_limit_delay(3, None, 0.0), Duration::from_secs(4));
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("7"), Some(Duration::from_secs(7)));
        assert_eq!(parse_retry_after(" 0 "), Some(Duration::ZERO));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2026 07:28:00 GMT"), None);
        assert_eq!(parse_retry_after("-3"), None);
        assert_eq!(parse_retry_after(""), None);
    }

    #[test]
    fn test_policy_from_settings() {
        let settings = RetrySettings {
            request_delay_ms: 100,
            max_retries: 0,
            rate_limit_cap_seconds: 10,
            transport_cap_seconds: 5,
        };
        let p = BackoffPolicy::from(&settings);
        assert_eq!(p.request_delay, Duration::from_millis(100));
        assert_eq!(p.max_retries, 1);
        assert_eq!(p.max_total_wait(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_tokio_sleeper_zero_returns() {
        TokioSleeper.sleep(Duration::ZERO).await;
    }
}
