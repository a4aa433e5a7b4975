//! Exponential backoff for venue requests.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::app::config::RetryConfig;
use crate::error::FetchError;

/// Run `call` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent.
///
/// Only [`FetchError::is_retryable`] errors are retried. The delay starts
/// at `initial_delay_ms` and grows by `backoff_multiplier` up to
/// `max_delay_ms`.
pub async fn with_backoff<T, F, Fut>(
    policy: &RetryConfig,
    operation: &str,
    mut call: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let max_delay = Duration::from_millis(policy.max_delay_ms);
    let mut delay = Duration::from_millis(policy.initial_delay_ms).min(max_delay);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Request failed, retrying"
                );
                sleep(delay).await;
                delay = next_delay(delay, policy.backoff_multiplier, max_delay);
            }
            Err(err) => return Err(err),
        }
    }
}

fn next_delay(current: Duration, multiplier: f64, max: Duration) -> Duration {
    Duration::try_from_secs_f64(current.as_secs_f64() * multiplier)
        .unwrap_or(max)
        .min(max)
}
