//! Bounded exponential backoff for idempotent API calls.
//!
//! Only failures for which [`ApiError::is_retryable`] holds are retried.
//! Maintenance, client errors, and decode failures surface immediately so
//! the game loop can apply its own, coarser recovery policy.

use std::future::Future;
use std::time::Duration;

use molty_core::config::RetryConfig;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Attempt budget and delay curve for [`with_retry`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero behaves like one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub min_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier: f64,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    /// Delay to wait after the failed attempt with zero-based index `retry`.
    ///
    /// `min_delay * multiplier^retry`, clamped to `[min_delay, max_delay]`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let growth = if self.multiplier.is_finite() && self.multiplier >= 1.0 {
            self.multiplier.powi(exponent)
        } else {
            1.0
        };
        let secs = self.min_delay.as_secs_f64() * growth;
        Duration::try_from_secs_f64(secs)
            .unwrap_or(self.max_delay)
            .clamp(self.min_delay.min(self.max_delay), self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            min_delay: Duration::from_millis(config.min_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            multiplier: config.multiplier,
        }
    }
}

/// Run `operation` until it succeeds, fails permanently, or the attempt
/// budget is spent. Returns the last error in the latter two cases.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt: u32 = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation = operation_name, attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = policy.delay_for(attempt.saturating_sub(1));
                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "Request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt = attempt.saturating_add(1);
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            min_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            multiplier: 2.0,
        }
    }

    #[test]
    fn default_delays_double_up_to_the_cap() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay_for(0), Duration::from_secs(2));
        assert_eq!(policy.delay_for(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for(2), Duration::from_secs(8));
        assert_eq!(policy.delay_for(3), Duration::from_secs(10));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn degenerate_multiplier_keeps_min_delay() {
        let policy = RetryPolicy {
            multiplier: f64::NAN,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for(5), Duration::from_secs(2));
        assert_eq!(RetryPolicy::none().delay_for(3), Duration::ZERO);
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast(3), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ApiError::Transport("reset".to_owned()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert!(matches!(result, Ok(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn attempts_are_bounded() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast(3), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiError::Transport("timeout".to_owned())) }
        })
        .await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        for err in [
            ApiError::Maintenance,
            ApiError::Rejected("no".to_owned()),
            ApiError::Decode("eof".to_owned()),
        ] {
            let calls = AtomicU32::new(0);
            let mut once = Some(err);
            let result: Result<(), _> = with_retry(&fast(3), "test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                let err = once.take().unwrap_or(ApiError::Maintenance);
                async move { Err(err) }
            })
            .await;
            assert!(result.is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }
}
