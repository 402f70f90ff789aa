//! Retry combinator for inference calls
//!
//! Wraps `tokio-retry` with a randomized exponential backoff: the delay before
//! retry `n` is drawn uniformly from `[min_delay, min(max_delay, min_delay * 2^(n-1))]`.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use crate::errors::AdapterError;

pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: usize,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_delay: DEFAULT_MIN_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: usize, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            min_delay,
            max_delay: max_delay.max(min_delay),
        }
    }

    /// Upper bound of each backoff window, one entry per retry.
    pub fn delay_ceilings(&self) -> impl Iterator<Item = Duration> + use<> {
        let min_ms = u64::try_from(self.min_delay.as_millis()).unwrap_or(u64::MAX);
        let max_delay = self.max_delay;

        // ExponentialBackoff yields 2^n * factor; halve it so the first window is min_delay.
        ExponentialBackoff::from_millis(2)
            .factor(min_ms)
            .max_delay(max_delay.saturating_mul(2))
            .map(move |d| (d / 2).min(max_delay))
            .take(self.max_attempts.saturating_sub(1))
    }

    /// Randomized delays fed to the retry loop.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let min_delay = self.min_delay;
        self.delay_ceilings()
            .map(move |ceiling| min_delay + jitter(ceiling.saturating_sub(min_delay)))
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// `policy.max_attempts` attempts have been made. The last error is returned
/// unchanged.
///
/// # Errors
///
/// Returns the error of the final attempt.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, operation: F) -> Result<T, AdapterError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AdapterError>>,
{
    let attempts = AtomicUsize::new(0);
    let max_attempts = policy.max_attempts.max(1);

    let result = RetryIf::start(policy.delays(), operation, |err: &AdapterError| {
        let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
        let retryable = err.is_retryable();
        if !retryable {
            debug!(attempt, "Not retrying: {}", err);
        } else if attempt < max_attempts {
            warn!(attempt, max_attempts, "Attempt failed, retrying: {}", err);
        }
        retryable
    })
    .await;

    if let Err(err) = &result {
        let made = attempts.load(Ordering::Relaxed);
        if err.is_retryable() && made >= max_attempts {
            warn!(attempts = made, "Giving up after {} attempts: {}", made, err);
        }
    }

    result
}
