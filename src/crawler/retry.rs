//! Per-request retry policy
//!
//! Every request owns a [`RetryContext`] created with the run's
//! `max_retries`. Failures are counted on that context, so repeated failures
//! of the same request compound instead of resetting. There is no global
//! budget: each URL gets its own allowance.

use std::time::Duration;

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Re-issue the request; `attempt` is the 1-based retry number
    Retry { attempt: u32 },

    /// The failure is terminal for this request
    GiveUp,
}

/// Retry counter attached to a single request
#[derive(Debug, Clone)]
pub struct RetryContext {
    retries: u32,
    max_retries: u32,
}

impl RetryContext {
    /// Creates a context allowing `max_retries` additional attempts
    pub fn new(max_retries: u32) -> Self {
        Self {
            retries: 0,
            max_retries,
        }
    }

    /// Number of retries issued so far
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Configured retry allowance
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns true if a failure with this status may be retried
    ///
    /// Transport failures (no status) and statuses >= 400 are retryable.
    pub fn is_retryable(status: Option<u16>) -> bool {
        status.map_or(true, |code| code >= 400)
    }

    /// Records a failure and decides whether to re-issue the request
    pub fn record_failure(&mut self) -> RetryDecision {
        if self.retries < self.max_retries {
            self.retries += 1;
            RetryDecision::Retry {
                attempt: self.retries,
            }
        } else {
            RetryDecision::GiveUp
        }
    }

    /// Linear backoff before retry `attempt`: `attempt × unit`
    pub fn backoff(attempt: u32, unit: Duration) -> Duration {
        unit.saturating_mul(attempt)
    }
}
