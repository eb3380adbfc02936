//! Retry policy evaluation for remote calls
//!
//! Every remote client (background removal, storage upload, storage delete)
//! owns its own [`RetryPolicy`] and its own error classification. The policy
//! itself never looks at error text: callers classify a failure once, at the
//! call site, by implementing [`RetryClassification`] on their error type.
//!
//! [`RetryPolicy::decide`] is pure and deterministic so the backoff schedule
//! can be asserted directly in tests. [`retry_with_policy`] is the only place
//! that actually sleeps.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Classification of a failed remote call, supplied by the calling client.
pub trait RetryClassification {
    /// Whether another attempt could plausibly succeed.
    fn is_retryable(&self) -> bool;
}

/// Outcome of evaluating a failure against a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    pub retry: bool,
    pub delay: Duration,
}

impl RetryDecision {
    pub const STOP: RetryDecision = RetryDecision {
        retry: false,
        delay: Duration::ZERO,
    };
}

/// Exponential backoff parameters for one remote client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub const fn new(base_delay: Duration, max_attempts: u32) -> Self {
        Self {
            base_delay,
            max_attempts,
        }
    }

    /// A single attempt; failures propagate immediately.
    pub const fn no_retry() -> Self {
        Self::new(Duration::ZERO, 1)
    }

    /// Segmentation service: 2s base delay, 3 attempts.
    pub const fn background_removal() -> Self {
        Self::new(Duration::from_millis(2000), 3)
    }

    /// Storage uploads are never retried.
    pub const fn storage_upload() -> Self {
        Self::no_retry()
    }

    /// Storage deletes: 1s base delay, 3 attempts.
    pub const fn storage_delete() -> Self {
        Self::new(Duration::from_millis(1000), 3)
    }

    /// `base_delay * 2^(attempt - 1)`, saturating at `Duration::MAX`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        2u32.checked_pow(exponent)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// Decide whether attempt number `attempt` (1-based) should be followed by another.
    pub fn decide<E>(&self, outcome: &E, attempt: u32) -> RetryDecision
    where
        E: RetryClassification + ?Sized,
    {
        if attempt >= self.max_attempts || !outcome.is_retryable() {
            return RetryDecision::STOP;
        }

        RetryDecision {
            retry: true,
            delay: self.backoff_delay(attempt),
        }
    }
}

/// Run `operation` until it succeeds or `policy` says stop.
///
/// The closure receives the 1-based attempt number. The last error is
/// returned unchanged once retries are exhausted.
pub async fn retry_with_policy<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &'static str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryClassification + Display,
{
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(
                        operation = operation_name,
                        attempt,
                        "Remote call succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Err(error) => {
                let decision = policy.decide(&error, attempt);

                if !decision.retry {
                    tracing::warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts = policy.max_attempts,
                        retryable = error.is_retryable(),
                        error = %error,
                        "Remote call failed, giving up"
                    );
                    return Err(error);
                }

                tracing::warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = decision.delay.as_millis() as u64,
                    error = %error,
                    "Remote call failed, retrying"
                );

                tokio::time::sleep(decision.delay).await;
                attempt += 1;
            }
        }
    }
}
