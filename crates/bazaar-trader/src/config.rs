//! Trader tuning knobs.

use std::time::Duration;

use crate::payment::SearchLimits;

/// Default interval between two restock ticks of one trader.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Default radius (in world units) searched for loose payment items.
pub const DEFAULT_SEARCH_RADIUS: f32 = 1.0;

/// Default cap on container nesting explored by the payment locator.
pub const DEFAULT_MAX_CONTAINER_DEPTH: u32 = 16;

/// Per-trader behaviour parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraderConfig {
    /// Minimum time between two restock ticks.
    pub tick_interval: Duration,
    /// Radius around the trader searched for uncontained payment items.
    pub search_radius: f32,
    /// Maximum container nesting the payment locator descends into.
    pub max_container_depth: u32,
}

impl TraderConfig {
    /// Search limits handed to the payment locator.
    pub const fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            radius: self.search_radius,
            max_depth: self.max_container_depth,
        }
    }
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            search_radius: DEFAULT_SEARCH_RADIUS,
            max_container_depth: DEFAULT_MAX_CONTAINER_DEPTH,
        }
    }
}
