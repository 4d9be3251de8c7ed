// src/admission.rs

// sakhi-guard: per-identity sliding-window admission control.

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::RateLimiterConfig;
use crate::errors::{AdmissionRejected, GuardError};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// The admission controller.
/// T is the type used to identify callers (e.g., ClientIdentity, String, &str).
/// C is the clock type, defaulting to SystemClock.
/// Each identity owns the timestamps (clock nanoseconds) of its admissions
/// inside the trailing window, oldest first.
#[derive(Debug)]
pub struct AdmissionController<T, C = SystemClock>
where
    T: Hash + Eq + Clone + fmt::Debug,
    C: Clock,
{
    max_requests: usize,
    window_nanos: u64,
    windows: DashMap<T, VecDeque<u64>>,
    clock: C,
}

impl<T, C> AdmissionController<T, C>
where
    T: Hash + Eq + Clone + fmt::Debug,
    C: Clock,
{
    // method to create a new controller from a config object
    pub fn with_config(config: RateLimiterConfig, clock: C) -> Result<Self, GuardError> {
        config.validate()?;
        Ok(Self {
            max_requests: config.max_requests,
            window_nanos: config.window.as_nanos().min(u64::MAX as u128) as u64,
            windows: DashMap::new(),
            clock,
        })
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        Duration::from_nanos(self.window_nanos)
    }

    /// Number of identities currently holding a window record.
    pub fn tracked_identities(&self) -> usize {
        self.windows.len()
    }

    /// Admit or reject one unit of work for `identity`, recording it when admitted.
    pub fn check_and_record(&self, identity: T) -> bool {
        self.check(identity).allowed
    }

    /// Like [`check_and_record`](Self::check_and_record), but turns a rejection
    /// into the error the request dispatcher surfaces to the caller.
    pub fn admit(&self, identity: T) -> Result<AdmissionDecision, AdmissionRejected> {
        let decision = self.check(identity);
        if decision.allowed {
            Ok(decision)
        } else {
            Err(AdmissionRejected {
                retry_after: decision.retry_after,
            })
        }
    }

    pub fn check(&self, identity: T) -> AdmissionDecision {
        // The entry guard holds the shard write lock, so prune, count and
        // append are atomic for this identity.
        let mut entry = self.windows.entry(identity).or_default();
        let now = self.clock.now();
        let window = entry.value_mut();

        prune_expired(window, now, self.window_nanos);

        if window.len() >= self.max_requests {
            let retry_after = window.front().map(|&oldest| {
                let expires = oldest.saturating_add(self.window_nanos);
                Duration::from_nanos(expires.saturating_sub(now))
            });
            debug!(
                identity = ?entry.key(),
                limit = self.max_requests,
                window_secs = self.window().as_secs_f64(),
                "admission rejected"
            );
            return AdmissionDecision {
                allowed: false,
                remaining: 0,
                retry_after,
            };
        }

        window.push_back(now);
        AdmissionDecision {
            allowed: true,
            remaining: self.max_requests - window.len(),
            retry_after: None,
        }
    }

    /// Drop every identity whose newest admission has left the window.
    /// Such an identity behaves exactly like one never seen before.
    /// Returns how many identities were removed.
    pub fn cleanup_stale_identities(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.windows.retain(|_, window| {
            let live = window
                .back()
                .is_some_and(|&newest| now.saturating_sub(newest) < self.window_nanos);
            if !live {
                removed += 1;
            }
            live
        });
        removed
    }
}

impl<T, C> AdmissionController<T, C>
where
    T: Hash + Eq + Clone + fmt::Debug + Send + Sync + 'static,
    C: Clock + 'static,
{
    /// Run [`cleanup_stale_identities`](Self::cleanup_stale_identities) every
    /// `every` on the tokio runtime. The task ends once the controller is dropped.
    pub fn spawn_cleanup(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let controller = Arc::downgrade(self);
        let every = every.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let Some(controller) = controller.upgrade() else {
                    break;
                };
                let removed = controller.cleanup_stale_identities();
                if removed > 0 {
                    debug!(
                        removed,
                        remaining = controller.tracked_identities(),
                        "swept stale admission windows"
                    );
                }
            }
        })
    }
}

// pop timestamps that are `window_nanos` or more older than `now`
fn prune_expired(window: &mut VecDeque<u64>, now: u64, window_nanos: u64) {
    while let Some(&oldest) = window.front() {
        if now.saturating_sub(oldest) >= window_nanos {
            window.pop_front();
        } else {
            break;
        }
    }
}

/// Result of an admission check with metadata for HTTP responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionDecision {
    /// Whether the unit of work may proceed
    pub allowed: bool,
    /// Admissions left in the current window after this decision
    pub remaining: usize,
    /// Time until the oldest admission leaves the window (when rejected)
    pub retry_after: Option<Duration>,
}
