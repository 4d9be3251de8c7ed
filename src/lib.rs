// src/lib.rs

//! # Sakhi Guard
//!
//! Admission control and resilient text generation for the request path.
//!
//! - [`AdmissionController`]: per-identity sliding-window request counter.
//!   Every request is checked (and recorded) before any handler runs.
//! - [`ResilientCaller`]: wraps the external text-generation call, retrying
//!   capacity failures with exponential backoff and always returning
//!   user-presentable text.
//!
//! The two share no state; they compose only by both sitting on the request path.
//!
//! ## Quick Example
//!
//! ```rust
//! use sakhi_guard::{ClientIdentity, Limiters, RateLimiterConfig};
//!
//! let limiters = Limiters::new(RateLimiterConfig::strict(), RateLimiterConfig::loose()).unwrap();
//! let caller = ClientIdentity::from_origin(Some("203.0.113.9"), Some("user-42"));
//!
//! match limiters.api.admit(caller) {
//!     Ok(decision) => println!("admitted, {} left in window", decision.remaining),
//!     Err(rejected) => println!("{} ({})", rejected, rejected.status_code()),
//! }
//! ```

// private modules
mod admission;
mod clock;
mod config;
mod errors;
mod identity;
mod limiters;
mod resilient_call;
mod settings;

// public API exports
pub use admission::{AdmissionController, AdmissionDecision};
pub use clock::{Clock, SystemClock};
pub use self::config::{RateLimiterConfig, RetryPolicy};
pub use errors::{AdmissionRejected, GuardError};
pub use identity::ClientIdentity;
pub use limiters::Limiters;
pub use resilient_call::{
    CAPACITY_FALLBACK, CallOutcome, GenerationError, GenerationParams, ResilientCaller, Sleeper,
    TRANSIENT_FALLBACK, TextGenerator, TokioSleeper,
};
pub use settings::{LimitSettings, RetrySettings, Settings};
