// src/clock.rs

// clock module definition and implementations

// dependencies
use std::time::Instant;

/// Clock trait to abstract time retrieval.
/// Implementors must be thread-safe (Send + Sync).
/// The `now` method returns monotonic nanoseconds since the clock's own origin.
/// Admission windows only compare readings taken from the same clock, so the origin is arbitrary.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// SystemClock implementation backed by `Instant`.
/// The origin is fixed when the clock is created.
/// Cloned clocks share the same origin.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

// Make SystemClock the default
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // u64 nanoseconds covers several centuries of uptime
        self.origin.elapsed().as_nanos() as u64
    }
}
