//! Error types for the market engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and the market run.

/// Top-level error for the market engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: bazaar_core::ConfigError,
    },

    /// Clock initialization failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: bazaar_core::ClockError,
    },

    /// Building the demo world failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: bazaar_world::WorldError,
    },

    /// Constructing a trader failed.
    #[error("trader error: {source}")]
    Trader {
        /// The underlying trader error.
        #[from]
        source: bazaar_trader::TraderError,
    },

    /// Registering a trader failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: bazaar_core::TickError,
    },

    /// The market loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: bazaar_core::RunnerError,
    },
}
