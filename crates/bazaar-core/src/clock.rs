//! Simulation clock.
//!
//! The clock counts ticks and maps each tick onto simulated time by a fixed
//! step. Both counters use checked arithmetic; the tick number is the source
//! of truth and `now` is always `tick * step`.

use std::time::Duration;

use bazaar_types::SimTime;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Simulated time would overflow.
    #[error("simulated time overflow at tick {tick}")]
    TimeOverflow {
        /// The tick that could not be reached.
        tick: u64,
    },

    /// A zero step would freeze simulated time.
    #[error("clock step must be at least one millisecond")]
    ZeroStep,
}

/// Tick counter plus simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimClock {
    /// Ticks completed so far (0 before the first tick).
    tick: u64,
    /// Simulated time of the current tick.
    now: SimTime,
    /// Simulated time advanced per tick.
    step: Duration,
}

impl SimClock {
    /// Create a clock at tick 0, time 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::ZeroStep`] if `step` is shorter than 1ms.
    pub fn new(step: Duration) -> Result<Self, ClockError> {
        if step.as_millis() == 0 {
            return Err(ClockError::ZeroStep);
        }
        Ok(Self {
            tick: 0,
            now: SimTime::ZERO,
            step,
        })
    }

    /// Current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Current simulated time.
    pub const fn now(&self) -> SimTime {
        self.now
    }

    /// Advance by one tick and return the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] or [`ClockError::TimeOverflow`]
    /// if either counter would overflow; the clock is left unchanged.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        let tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        let now = self
            .now
            .checked_add(self.step)
            .ok_or(ClockError::TimeOverflow { tick })?;
        self.tick = tick;
        self.now = now;
        Ok(tick)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_step_is_rejected() {
        assert!(matches!(
            SimClock::new(Duration::ZERO),
            Err(ClockError::ZeroStep)
        ));
        assert!(SimClock::new(Duration::from_micros(10)).is_err());
    }

    #[test]
    fn advance_moves_tick_and_time() {
        let mut clock = SimClock::new(Duration::from_millis(250)).unwrap();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.advance().unwrap(), 1);
        assert_eq!(clock.advance().unwrap(), 2);
        assert_eq!(clock.now(), SimTime::from_millis(500));
    }

    #[test]
    fn time_overflow_leaves_clock_unchanged() {
        let mut clock = SimClock::new(Duration::from_millis(u64::MAX)).unwrap();
        clock.advance().unwrap();
        let before = clock;
        assert!(matches!(
            clock.advance(),
            Err(ClockError::TimeOverflow { tick: 2 })
        ));
        assert_eq!(clock, before);
    }
}
