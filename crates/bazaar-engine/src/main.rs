//! Market engine binary for the Bazaar merchant simulation.
//!
//! Wires together configuration, the demo world, scripted shoppers, and the
//! tick loop.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `bazaar-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Build the demo market and open every trader
//! 4. Run the market loop until the tick bound or Ctrl-C
//! 5. Log the result

mod demo;
mod error;
mod shopper;

use std::path::Path;

use bazaar_core::{RunBounds, SimulationConfig, request_channel, runner};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::shopper::ShopperCallback;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "bazaar-config.yaml";

/// Application entry point for the market engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the market run fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG overrides the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        max_ticks = config.world.max_ticks,
        from_file,
        "Configuration loaded"
    );

    // 3. Build the demo market.
    let mut market = demo::build_demo_market(&config)?;
    info!(
        traders = market.state.traders.len(),
        shoppers = market.shoppers.len(),
        "Demo market assembled"
    );

    // 4. Run the market.
    let (sender, mut queue) = request_channel();
    let mut callback = ShopperCallback::new(sender, market.shoppers.clone(), config.world.seed);
    let bounds = RunBounds {
        max_ticks: config.world.max_ticks,
        pace: config.world.real_time.then(|| config.world.tick_interval()),
    };

    tokio::select! {
        result = runner::run_market(&mut market.state, &mut queue, bounds, &mut callback) => {
            let result = result.map_err(EngineError::from)?;
            // 5. Log results.
            runner::log_market_end(&result);
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "failed to listen for Ctrl-C");
            }
            info!("Interrupted, stopping market");
        }
    }

    info!(
        purchases_recorded = market.state.audit.len(),
        final_tick = market.state.clock.tick(),
        "bazaar-engine shutdown complete"
    );
    Ok(())
}

/// Load the simulation configuration from [`CONFIG_PATH`].
///
/// Returns the configuration and whether it came from the file.
fn load_config() -> Result<(SimulationConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((SimulationConfig::from_file(config_path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}
