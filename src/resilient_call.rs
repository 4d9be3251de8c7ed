// src/resilient_call.rs

//! Bounded-retry wrapper around the external text-generation call.
//!
//! [`ResilientCaller::invoke`] never surfaces an upstream failure. Every call
//! ends in exactly one [`CallOutcome`] whose text can be shown to the user:
//!
//! - success: the trimmed generated text
//! - capacity exhaustion (HTTP 429 or quota): retried with exponential
//!   backoff, then [`CAPACITY_FALLBACK`] once retries run out
//! - anything else: no retry, [`TRANSIENT_FALLBACK`] immediately

// dependencies
use crate::config::RetryPolicy;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

/// Shown when the provider keeps reporting capacity exhaustion.
pub const CAPACITY_FALLBACK: &str = "Oh dear! I'm getting a lot of questions right now and need a short break. Could you please try again in a few seconds? I promise I'll be right here waiting to help you!";

/// Shown for any other upstream failure.
pub const TRANSIENT_FALLBACK: &str = "I'm having a small technical hiccup right now. Please try again in a moment. If this keeps happening, please let someone know so they can help fix it!";

const PROBE_PROMPT: &str = "test";

/// Sampling parameters forwarded to the provider with every attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
}

impl GenerationParams {
    /// Minimal request used by [`ResilientCaller::probe`]. Only the output
    /// length is cut; sampling stays at the defaults so the check exercises
    /// the same request shape as real traffic.
    pub fn probe() -> Self {
        Self {
            max_output_tokens: 5,
            ..Self::default()
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            max_output_tokens: 1500,
            top_p: 0.95,
        }
    }
}

/// Failure reported by a [`TextGenerator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GenerationError {
    /// HTTP status from the provider, when there was one
    pub status: Option<u16>,
    pub message: String,
}

impl GenerationError {
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Provider-side capacity or quota exhaustion.
    pub fn capacity(message: impl Into<String>) -> Self {
        Self::with_status(429, message)
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Whether the failure signature says the provider is out of capacity.
    /// Providers are inconsistent about status codes, so the message is
    /// checked for "429" and "quota" as well.
    pub fn is_capacity_exhausted(&self) -> bool {
        self.status == Some(429)
            || self.message.contains("429")
            || self.message.to_lowercase().contains("quota")
    }
}

/// The external generative-AI service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError>;
}

/// Waits between retry attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Suspends only the calling task; other requests keep being served.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Result of one [`ResilientCaller::invoke`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Success(String),
    RateLimitedExhausted(String),
    TransientFailure(String),
}

impl CallOutcome {
    /// Text to return to the user, generated or fallback.
    pub fn text(&self) -> &str {
        match self {
            CallOutcome::Success(text)
            | CallOutcome::RateLimitedExhausted(text)
            | CallOutcome::TransientFailure(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            CallOutcome::Success(text)
            | CallOutcome::RateLimitedExhausted(text)
            | CallOutcome::TransientFailure(text) => text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success(_))
    }
}

#[derive(Debug)]
pub struct ResilientCaller<G, S = TokioSleeper> {
    generator: G,
    sleeper: S,
    params: GenerationParams,
}

impl<G: TextGenerator> ResilientCaller<G> {
    pub fn new(generator: G) -> Self {
        Self::with_sleeper(generator, TokioSleeper)
    }
}

impl<G, S> ResilientCaller<G, S>
where
    G: TextGenerator,
    S: Sleeper,
{
    pub fn with_sleeper(generator: G, sleeper: S) -> Self {
        Self {
            generator,
            sleeper,
            params: GenerationParams::default(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Send `prompt` to the generator, retrying capacity failures with
    /// exponential backoff as `policy` allows.
    pub async fn invoke(&self, prompt: &str, policy: &RetryPolicy) -> CallOutcome {
        let total_attempts = policy.max_retries.saturating_add(1);
        let mut attempt: u32 = 0;

        loop {
            let err = match self.attempt(prompt, &self.params, policy.attempt_timeout).await {
                Ok(text) => return CallOutcome::Success(text.trim().to_owned()),
                Err(err) => err,
            };

            warn!(
                attempt = attempt.saturating_add(1),
                total_attempts,
                status = ?err.status,
                error = %err,
                "text generation attempt failed"
            );

            if !err.is_capacity_exhausted() {
                error!(error = %err, "non-retryable text generation failure");
                return CallOutcome::TransientFailure(TRANSIENT_FALLBACK.to_owned());
            }

            if attempt >= policy.max_retries {
                return CallOutcome::RateLimitedExhausted(CAPACITY_FALLBACK.to_owned());
            }

            self.sleeper.sleep(policy.backoff(attempt)).await;
            attempt += 1;
        }
    }

    /// Single unretried request to check that the provider is reachable.
    pub async fn probe(&self) -> bool {
        match self.attempt(PROBE_PROMPT, &GenerationParams::probe(), None).await {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "text generation probe failed");
                false
            }
        }
    }

    async fn attempt(
        &self,
        prompt: &str,
        params: &GenerationParams,
        timeout: Option<Duration>,
    ) -> Result<String, GenerationError> {
        let call = self.generator.generate(prompt, params);
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(GenerationError::other(format!(
                    "attempt timed out after {}ms",
                    limit.as_millis()
                ))),
            },
            None => call.await,
        }
    }
}
