// src/config.rs

//! Configuration types for admission control and call retries

// dependencies
use crate::errors::GuardError;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Configuration for a sliding-window admission controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    pub(crate) max_requests: usize,
    pub(crate) window: Duration,
}

impl RateLimiterConfig {
    /// Create a new configuration allowing `max_requests` per trailing `window`
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    /// Profile for authentication endpoints: 5 requests per minute
    pub fn strict() -> Self {
        Self::new(5, Duration::from_secs(60))
    }

    /// Profile for general API traffic: 100 requests per minute
    pub fn loose() -> Self {
        Self::new(100, Duration::from_secs(60))
    }

    /// Builder-style: set the request quota
    pub fn max_requests(mut self, max_requests: usize) -> Self {
        self.max_requests = max_requests;
        self
    }

    /// Builder-style: set the window length
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GuardError> {
        if self.max_requests == 0 {
            return Err(GuardError::InvalidMaxRequests);
        }
        if self.window.is_zero() {
            return Err(GuardError::InvalidWindow);
        }
        Ok(())
    }
}

/// Retry behaviour for the resilient call wrapper.
///
/// Only capacity-exhaustion failures are retried. Attempt `n` (zero based)
/// that fails that way waits `base_delay * 2^n` before the next attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Upper bound for a single attempt; an attempt that overruns it counts
    /// as a non-retryable failure.
    pub attempt_timeout: Option<Duration>,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            attempt_timeout: None,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Delay after failed attempt `attempt`: `base_delay * 2^attempt`,
    /// saturating at `Duration::MAX`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let nanos = self
            .base_delay
            .as_nanos()
            .saturating_mul(2u128.saturating_pow(attempt));
        let secs = nanos / NANOS_PER_SEC;
        if secs > u64::MAX as u128 {
            return Duration::MAX;
        }
        Duration::new(secs as u64, (nanos % NANOS_PER_SEC) as u32)
    }

    /// Longest total time `invoke` can spend sleeping under this policy.
    pub fn max_total_backoff(&self) -> Duration {
        (0..self.max_retries).fold(Duration::ZERO, |acc, attempt| {
            acc.saturating_add(self.backoff(attempt))
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_secs(1))
    }
}
