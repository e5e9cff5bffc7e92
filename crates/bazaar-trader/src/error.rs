//! Error types for the trader crate.
//!
//! Business outcomes (out of stock, insufficient payment, unknown product)
//! are not errors; they are reported through
//! [`PurchaseOutcome`](crate::purchase::PurchaseOutcome). The variants here
//! cover construction mistakes and failures bubbling up from the world.

use bazaar_world::WorldError;

/// Errors that can occur while operating a trader.
#[derive(Debug, thiserror::Error)]
pub enum TraderError {
    /// A speech line set was constructed without any phrases.
    #[error("speech line set `{set}` must contain at least one phrase")]
    EmptySpeechLines {
        /// Which set was empty.
        set: &'static str,
    },

    /// A world collaborator rejected an operation.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Adding a delay to the simulated clock overflowed.
    #[error("simulated time overflow while {context}")]
    TimeOverflow {
        /// What was being scheduled.
        context: &'static str,
    },
}
