//! Market loop runner.
//!
//! [`run_market`] drives [`run_tick`] until the configured tick bound is
//! reached, optionally pacing ticks in wall-clock time with a tokio
//! interval. Callers that want to stop early drop the future (for example
//! by racing it against `ctrl_c` in a `select!`).
//!
//! [`run_tick`]: crate::tick::run_tick

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::queue::RequestQueue;
use crate::tick::{self, MarketState, TickError, TickSummary};

/// Errors that can occur during the market run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// When to stop and how fast to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunBounds {
    /// Stop after this many ticks. `0` runs until the future is dropped.
    pub max_ticks: u64,
    /// Wall-clock time between ticks, or `None` to run unpaced.
    pub pace: Option<Duration>,
}

/// Result of a bounded run.
#[derive(Debug)]
pub struct MarketRunResult {
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// Purchases completed over the whole run.
    pub completed_purchases: u64,
}

/// Callback invoked after each tick completes.
///
/// Implementations can forward catalog updates to a presentation layer,
/// feed scripted buyers, and so on.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &MarketState);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &MarketState) {}
}

/// Run the market loop until the tick bound is reached.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails.
pub async fn run_market(
    state: &mut MarketState,
    requests: &mut RequestQueue,
    bounds: RunBounds,
    callback: &mut dyn TickCallback,
) -> Result<MarketRunResult, RunnerError> {
    let mut total_ticks: u64 = 0;
    let mut completed_purchases: u64 = 0;

    let mut pacer = bounds.pace.filter(|p| !p.is_zero()).map(|period| {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    info!(
        max_ticks = bounds.max_ticks,
        pace_ms = bounds.pace.map(|p| p.as_millis()),
        traders = state.traders.len(),
        "Market starting"
    );

    loop {
        if let Some(interval) = pacer.as_mut() {
            interval.tick().await;
        } else {
            tokio::task::yield_now().await;
        }

        let summary = tick::run_tick(state, requests)?;
        total_ticks = total_ticks.saturating_add(1);
        completed_purchases = completed_purchases
            .saturating_add(u64::try_from(summary.completed_purchases()).unwrap_or(u64::MAX));

        callback.on_tick(&summary, state);

        if bounds.max_ticks > 0 && summary.tick >= bounds.max_ticks {
            info!(tick = summary.tick, max_ticks = bounds.max_ticks, "Tick limit reached");
            return Ok(MarketRunResult {
                final_summary: Some(summary),
                total_ticks,
                completed_purchases,
            });
        }
    }
}

/// Log the end of a run.
pub fn log_market_end(result: &MarketRunResult) {
    info!(
        total_ticks = result.total_ticks,
        completed_purchases = result.completed_purchases,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Market ended"
    );
    if result.final_summary.is_none() {
        warn!("Market ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_trader::TraderConfig;
    use bazaar_world::{PrototypeRegistry, SimWorld};

    use super::*;
    use crate::clock::SimClock;
    use crate::queue::request_channel;

    struct Counting {
        ticks: Vec<u64>,
    }

    impl TickCallback for Counting {
        fn on_tick(&mut self, summary: &TickSummary, _state: &MarketState) {
            self.ticks.push(summary.tick);
        }
    }

    fn empty_market() -> MarketState {
        MarketState::new(
            SimClock::new(Duration::from_millis(100)).unwrap(),
            SimWorld::new(),
            PrototypeRegistry::new(),
            TraderConfig::default(),
            42,
        )
    }

    #[tokio::test]
    async fn stops_at_max_ticks() {
        let mut state = empty_market();
        let (_sender, mut queue) = request_channel();
        let mut callback = Counting { ticks: Vec::new() };
        let bounds = RunBounds {
            max_ticks: 4,
            pace: None,
        };

        let result = run_market(&mut state, &mut queue, bounds, &mut callback)
            .await
            .unwrap();

        assert_eq!(result.total_ticks, 4);
        assert_eq!(result.final_summary.map(|s| s.tick), Some(4));
        assert_eq!(callback.ticks, [1, 2, 3, 4]);
        assert_eq!(state.clock.tick(), 4);
    }

    #[tokio::test]
    async fn paced_run_completes() {
        let mut state = empty_market();
        let (_sender, mut queue) = request_channel();
        let bounds = RunBounds {
            max_ticks: 3,
            pace: Some(Duration::from_millis(50)),
        };

        let result = run_market(&mut state, &mut queue, bounds, &mut NoOpCallback)
            .await
            .unwrap();
        assert_eq!(result.total_ticks, 3);
        assert_eq!(result.completed_purchases, 0);
    }
}
