//! Retry supervisor
//!
//! Keeps re-running an attempt under a consecutive failure budget with a
//! fixed delay after each failure. Used for jobs that are expected to run
//! indefinitely, where a finished or dead job must simply be started again.
//!
//! ## Budget boundary
//!
//! After every attempt the remaining budget is checked:
//!
//! ```text
//! (remaining < 1 && max > 0) || remaining < 0  → give up
//! remaining < 1                                → stop cleanly
//! otherwise                                    → run again
//! ```
//!
//! With `max > 0` a success resets the budget, so the loop only ends by
//! giving up. With `max = 0` the first attempt decides: success stops
//! cleanly, failure gives up. Both follow from the single signed counter and
//! are kept as-is.

use std::future::Future;
use std::time::Duration;

use tokio::time;
use tracing::{info, warn};

use crate::error::{Result, RunError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Consecutive failures tolerated; 0 runs a single attempt
    pub max_consecutive_errors: u32,
    /// Pause after a failed attempt
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_consecutive_errors: u32, delay: Duration) -> Self {
        Self {
            max_consecutive_errors,
            delay,
        }
    }
}

/// What the supervisor does after an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Continue,
    Stop,
    GiveUp,
}

fn next_step(remaining: i64, max: i64) -> Next {
    if (remaining < 1 && max > 0) || remaining < 0 {
        Next::GiveUp
    } else if remaining < 1 {
        Next::Stop
    } else {
        Next::Continue
    }
}

/// Counters of a supervisor run that stopped cleanly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempts: u64,
    pub failures: u64,
}

pub struct RetrySupervisor {
    policy: RetryPolicy,
}

impl RetrySupervisor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Runs `attempt` until the budget says stop or give up
    ///
    /// Errors that are not retryable are returned straight away without
    /// sleeping or touching the budget.
    pub async fn run<F, Fut, T>(&self, mut attempt: F) -> Result<RunSummary>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max = i64::from(self.policy.max_consecutive_errors);
        let delay = self.policy.delay;

        let mut remaining = max;
        let mut summary = RunSummary::default();
        let mut last_error = None;

        loop {
            summary.attempts += 1;

            match attempt().await {
                Ok(_) => {
                    remaining = max;
                }
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => {
                    summary.failures += 1;
                    warn!("{}. Retrying in {} seconds...", err, delay.as_secs());
                    time::sleep(delay).await;
                    remaining -= 1;
                    last_error = Some(Box::new(err));
                }
            }

            match next_step(remaining, max) {
                Next::Continue => {}
                Next::Stop => {
                    info!(
                        "Stopping after {} attempt(s), {} failure(s)",
                        summary.attempts, summary.failures
                    );
                    return Ok(summary);
                }
                Next::GiveUp => {
                    return Err(RunError::GivenUp {
                        attempts: summary.attempts,
                        last_error,
                    });
                }
            }
        }
    }
}
