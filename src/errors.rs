// src/errors.rs

// error types for admission control and configuration

// dependencies
use std::time::Duration;
use thiserror::Error;

/// Error type for limiter and settings configuration issues.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("max_requests must be greater than zero")]
    InvalidMaxRequests,
    #[error("window duration must be greater than zero")]
    InvalidWindow,
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

/// A caller exceeded its window quota.
///
/// This is the only error that reaches the edge of the request path: the
/// dispatcher turns it into a "too many requests" rejection and does not run
/// the downstream handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Too many requests. Please try again later.")]
pub struct AdmissionRejected {
    /// Time until the oldest admission in the window expires
    pub retry_after: Option<Duration>,
}

impl AdmissionRejected {
    /// HTTP status the dispatcher should answer with.
    pub fn status_code(&self) -> u16 {
        429
    }

    /// Whole seconds for a `Retry-After` header, rounded up.
    pub fn retry_after_secs(&self) -> Option<u64> {
        self.retry_after.map(|d| {
            let secs = d.as_secs();
            if d.subsec_nanos() > 0 { secs + 1 } else { secs }
        })
    }
}
