// src/settings.rs

//! Process-start configuration.
//!
//! Read once from the environment (and a `.env` file, if present). Keys use
//! the `SAKHI` prefix with `__` between levels:
//!
//! ```text
//! SAKHI__AUTH_LIMIT__MAX_REQUESTS=5
//! SAKHI__AUTH_LIMIT__WINDOW_SECS=60
//! SAKHI__API_LIMIT__MAX_REQUESTS=100
//! SAKHI__RETRY__MAX_RETRIES=2
//! SAKHI__RETRY__BASE_DELAY_MS=1000
//! SAKHI__RETRY__ATTEMPT_TIMEOUT_MS=30000
//! SAKHI__SWEEP_INTERVAL_SECS=300
//! ```
//!
//! Anything left unset falls back to the built-in profiles.

// dependencies
use crate::config::{RateLimiterConfig, RetryPolicy};
use crate::errors::GuardError;
use ::config::{Config, Environment};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const ENV_PREFIX: &str = "SAKHI";
const ENV_SEPARATOR: &str = "__";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Overrides for one admission profile. Unset fields keep the profile value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    pub max_requests: Option<usize>,
    pub window_secs: Option<u64>,
}

impl LimitSettings {
    fn apply(&self, mut profile: RateLimiterConfig) -> RateLimiterConfig {
        if let Some(max_requests) = self.max_requests {
            profile = profile.max_requests(max_requests);
        }
        if let Some(window_secs) = self.window_secs {
            profile = profile.window(Duration::from_secs(window_secs));
        }
        profile
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub attempt_timeout_ms: Option<u64>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            base_delay_ms: policy.base_delay.as_millis() as u64,
            attempt_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Strict profile, guards authentication endpoints
    pub auth_limit: LimitSettings,
    /// Loose profile, guards general API traffic
    pub api_limit: LimitSettings,
    pub retry: RetrySettings,
    /// How often expired admission windows are swept
    pub sweep_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auth_limit: LimitSettings::default(),
            api_limit: LimitSettings::default(),
            retry: RetrySettings::default(),
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl Settings {
    /// Load `.env` (if any), then the `SAKHI__*` environment variables.
    pub fn load() -> Result<Self, GuardError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env file"),
            Err(err) if err.not_found() => {}
            Err(err) => debug!(error = %err, "ignoring unreadable .env file"),
        }

        let source = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;
        let settings = Self::from_config(source)?;

        let auth = settings.auth_limiter_config();
        let api = settings.api_limiter_config();
        let retry = settings.retry_policy();
        info!(
            auth_max_requests = auth.max_requests,
            auth_window_secs = auth.window.as_secs(),
            api_max_requests = api.max_requests,
            api_window_secs = api.window.as_secs(),
            max_retries = retry.max_retries,
            base_delay_ms = retry.base_delay.as_millis() as u64,
            "guard settings loaded"
        );
        Ok(settings)
    }

    /// Deserialize and validate settings from an already built source.
    pub fn from_config(source: Config) -> Result<Self, GuardError> {
        let settings: Settings = source.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), GuardError> {
        self.auth_limiter_config().validate()?;
        self.api_limiter_config().validate()
    }

    pub fn auth_limiter_config(&self) -> RateLimiterConfig {
        self.auth_limit.apply(RateLimiterConfig::strict())
    }

    pub fn api_limiter_config(&self) -> RateLimiterConfig {
        self.api_limit.apply(RateLimiterConfig::loose())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::new(
            self.retry.max_retries,
            Duration::from_millis(self.retry.base_delay_ms),
        );
        match self.retry.attempt_timeout_ms {
            Some(ms) => policy.with_attempt_timeout(Duration::from_millis(ms)),
            None => policy,
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
