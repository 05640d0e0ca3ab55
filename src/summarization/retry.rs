//! Retry budgets and backoff for backend calls.
//!
//! A single logical call may be retried a bounded number of times. Connection failures,
//! read failures (timeouts included) and retryable HTTP statuses each draw from their own
//! budget, and every retry also draws from the shared total.

use crate::config::Config;
use backon::ExponentialBuilder;
use reqwest::StatusCode;
use std::time::Duration;

/// Statuses that trigger another attempt.
pub const RETRYABLE_STATUSES: [StatusCode; 5] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

const BACKOFF_MAX: Duration = Duration::from_secs(120);

/// Which budget a failed attempt draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Connection could not be established.
    Connect,
    /// Connection was established but the exchange failed or timed out.
    Read,
    /// Backend answered with a retryable status.
    Status,
}

/// Retry configuration for one logical backend call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum retries across all failure classes.
    pub total: usize,
    /// Maximum retries after connection failures.
    pub connect: usize,
    /// Maximum retries after read failures.
    pub read: usize,
    /// Maximum retries after retryable statuses.
    pub status: usize,
    /// Delay before the first retry; doubles for each following retry.
    pub backoff_factor: Duration,
    /// Upper bound on a single delay.
    pub backoff_max: Duration,
}

impl RetryPolicy {
    /// Same budget for every class, as configured through `OLLAMA_MAX_RETRIES`.
    pub fn from_config(config: &Config) -> Self {
        let retries = config.ollama_max_retries;
        Self {
            total: retries,
            connect: retries,
            read: retries,
            status: retries,
            backoff_factor: config.ollama_backoff,
            backoff_max: BACKOFF_MAX,
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self {
            total: 0,
            connect: 0,
            read: 0,
            status: 0,
            backoff_factor: Duration::ZERO,
            backoff_max: Duration::ZERO,
        }
    }

    /// Fresh per-call budget.
    pub fn budget(&self) -> RetryBudget {
        RetryBudget {
            total: self.total,
            connect: self.connect,
            read: self.read,
            status: self.status,
        }
    }

    /// Capped exponential backoff without jitter.
    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.backoff_factor)
            .with_max_delay(self.backoff_max.max(self.backoff_factor))
            .with_factor(2.0)
            .with_max_times(self.total)
    }
}

/// Remaining retries for an in-flight call.
#[derive(Debug, Clone)]
pub struct RetryBudget {
    total: usize,
    connect: usize,
    read: usize,
    status: usize,
}

impl RetryBudget {
    /// Spend one retry for `class`; `false` when either budget is exhausted.
    pub fn try_consume(&mut self, class: FailureClass) -> bool {
        let bucket = match class {
            FailureClass::Connect => &mut self.connect,
            FailureClass::Read => &mut self.read,
            FailureClass::Status => &mut self.status,
        };
        if self.total == 0 || *bucket == 0 {
            return false;
        }
        *bucket -= 1;
        self.total -= 1;
        true
    }
}

/// Whether a status should be retried.
pub fn is_retryable_status(status: StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}
