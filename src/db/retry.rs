//! Bounded retry for writes that hit SQLite lock contention.
//!
//! `busy_timeout` already makes SQLite wait for a lock; this loop covers the
//! cases where it still gives up (e.g. a lock upgrade deadlock between two
//! deferred transactions) by backing off and trying the whole write again.

use std::thread;
use std::time::Duration;

use super::StoreError;

/// Default number of attempts per write before surfacing `StoreError::Busy`.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default backoff step; attempt `n` sleeps `n * step`.
const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_step: DEFAULT_BACKOFF_STEP,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff_step: Duration::ZERO,
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

/// Run `op` until it succeeds, fails with a non-lock error, or the policy's
/// attempts are exhausted.
pub fn with_write_retry<T, F>(policy: &RetryPolicy, operation: &str, mut op: F) -> Result<T, StoreError>
where
    F: FnMut() -> Result<T, StoreError>,
{
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_lock_contention() && attempt < max_attempts => {
                let wait = policy.backoff(attempt);
                tracing::warn!(
                    operation,
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    error = %e,
                    "Database locked, retrying"
                );
                thread::sleep(wait);
            }
            Err(e) if e.is_lock_contention() => {
                tracing::warn!(operation, attempts = max_attempts, "Giving up on locked database");
                return Err(StoreError::Busy {
                    attempts: max_attempts,
                });
            }
            Err(e) => return Err(e),
        }
    }

    Err(StoreError::Busy {
        attempts: max_attempts,
    })
}
