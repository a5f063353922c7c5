//! Bounded retry with exponential backoff and jitter for remote calls.
//!
//! Only errors for which [`LabstubError::is_retryable`] holds are retried;
//! everything else returns after the first attempt. The error of the last
//! attempt is returned unchanged so callers can still tell a timeout from
//! any other transport failure.

use std::future::Future;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::errors::LabstubResult;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first one. Never less than 1.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(2000),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// No retries at all.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }
}

/// Delay before the retry that follows attempt number `attempt` (0-based).
pub fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config.initial_delay.as_millis() as f64;
    let exponential = base * config.backoff_multiplier.powi(attempt as i32);
    let capped = exponential.min(config.max_delay.as_millis() as f64);

    let millis = if config.jitter && capped > 0.0 {
        // +/-50%, still never above the cap
        let factor = rand::thread_rng().gen_range(0.5..1.5);
        (capped * factor).min(config.max_delay.as_millis() as f64)
    } else {
        capped
    };
    Duration::from_millis(millis.max(0.0) as u64)
}

/// Run `operation` until it succeeds, fails permanently, or the attempt
/// budget is spent.
pub async fn execute_with_retry<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> LabstubResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = LabstubResult<T>>,
{
    let started = Instant::now();
    let attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    info!(
                        operation = operation_name,
                        retries = attempt,
                        elapsed = ?started.elapsed(),
                        "operation succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Err(err) => {
                let last = attempt + 1 >= attempts;
                if last || !err.is_retryable() {
                    debug!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        kind = err.kind(),
                        "operation failed permanently"
                    );
                    return Err(err);
                }
                let delay = backoff_delay(config, attempt);
                warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    ?delay,
                    error = %err,
                    "operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
