//! Simulated time.
//!
//! [`SimTime`] is a timestamp measured in milliseconds since the simulation
//! started. It is advanced only by the simulation clock, never read from the
//! wall clock, so restock timers replay identically for the same inputs.

use core::time::Duration;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A point in simulated time, in milliseconds since simulation start.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct SimTime(pub u64);

impl SimTime {
    /// The start of the simulation.
    pub const ZERO: Self = Self(0);

    /// Build a timestamp from whole milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Build a timestamp from whole seconds.
    ///
    /// Returns `None` if the millisecond value overflows `u64`.
    pub const fn from_secs(secs: u64) -> Option<Self> {
        match secs.checked_mul(1000) {
            Some(millis) => Some(Self(millis)),
            None => None,
        }
    }

    /// Milliseconds since simulation start.
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Add a duration, returning `None` on overflow.
    pub fn checked_add(self, delta: Duration) -> Option<Self> {
        let millis = u64::try_from(delta.as_millis()).ok()?;
        self.0.checked_add(millis).map(Self)
    }

    /// Add a number of whole seconds, returning `None` on overflow.
    pub fn checked_add_secs(self, secs: u32) -> Option<Self> {
        self.checked_add(Duration::from_secs(u64::from(secs)))
    }
}

impl core::fmt::Display for SimTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_secs_converts_to_millis() {
        let t = SimTime::from_millis(500).checked_add_secs(60);
        assert_eq!(t, Some(SimTime(60_500)));
    }

    #[test]
    fn add_overflow_is_none() {
        let t = SimTime(u64::MAX).checked_add(Duration::from_millis(1));
        assert_eq!(t, None);
    }

    #[test]
    fn from_secs_overflow_is_none() {
        assert_eq!(SimTime::from_secs(u64::MAX), None);
        assert_eq!(SimTime::from_secs(2), Some(SimTime(2000)));
    }
}
