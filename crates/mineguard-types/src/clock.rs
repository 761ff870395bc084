//! Wall-clock capability
//!
//! Alerts and telemetry packets carry an epoch-millisecond timestamp. Every
//! wall-clock read in the workspace goes through [`Clock`] so the rest of the
//! computation can be driven by a [`FixedClock`] in tests.

use chrono::Utc;

/// Source of epoch-millisecond timestamps
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Reads the system clock (UTC)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}
