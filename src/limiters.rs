// src/limiters.rs

//! The two admission controllers every request passes through.
//!
//! Built once by the composition root and handed to the dispatcher; the
//! strict and loose controllers keep entirely separate identity maps.

// dependencies
use crate::admission::AdmissionController;
use crate::clock::{Clock, SystemClock};
use crate::config::RateLimiterConfig;
use crate::errors::GuardError;
use crate::identity::ClientIdentity;
use crate::settings::Settings;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct Limiters<C: Clock = SystemClock> {
    /// Strict profile for authentication endpoints
    pub auth: Arc<AdmissionController<ClientIdentity, C>>,
    /// Loose profile for everything else
    pub api: Arc<AdmissionController<ClientIdentity, C>>,
}

impl Limiters {
    pub fn new(auth: RateLimiterConfig, api: RateLimiterConfig) -> Result<Self, GuardError> {
        Self::with_clock(auth, api, SystemClock::new())
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, GuardError> {
        Self::new(settings.auth_limiter_config(), settings.api_limiter_config())
    }
}

impl<C: Clock + Clone> Limiters<C> {
    pub fn with_clock(
        auth: RateLimiterConfig,
        api: RateLimiterConfig,
        clock: C,
    ) -> Result<Self, GuardError> {
        Ok(Self {
            auth: Arc::new(AdmissionController::with_config(auth, clock.clone())?),
            api: Arc::new(AdmissionController::with_config(api, clock)?),
        })
    }
}

impl<C: Clock + 'static> Limiters<C> {
    /// Start the periodic sweep for both controllers.
    pub fn spawn_cleanup(&self, every: Duration) -> [JoinHandle<()>; 2] {
        [self.auth.spawn_cleanup(every), self.api.spawn_cleanup(every)]
    }
}
