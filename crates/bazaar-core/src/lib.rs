//! Clock, configuration, request queue, and tick orchestration for the
//! Bazaar merchant simulation.
//!
//! This crate owns the per-tick loop: restock every trader, then resolve
//! every queued buy request, then let the world flush destroyed entities
//! and publish storefront updates.
//!
//! # Modules
//!
//! - [`clock`] -- [`SimClock`], tick counter and simulated time
//! - [`config`] -- YAML configuration ([`SimulationConfig`])
//! - [`queue`] -- Buy request channel ([`RequestSender`], [`RequestQueue`])
//! - [`runner`] -- Async loop with tick bound and pacing
//! - [`tick`] -- [`MarketState`] and [`run_tick`]

pub mod clock;
pub mod config;
pub mod queue;
pub mod runner;
pub mod tick;

pub use clock::{ClockError, SimClock};
pub use config::{ConfigError, LoggingConfig, SimulationConfig, TraderSettings, WorldConfig};
pub use queue::{QueueError, RequestQueue, RequestSender, request_channel};
pub use runner::{
    MarketRunResult, NoOpCallback, RunBounds, RunnerError, TickCallback, log_market_end,
    run_market,
};
pub use tick::{MarketState, PurchaseResult, TickError, TickSummary, run_tick};
