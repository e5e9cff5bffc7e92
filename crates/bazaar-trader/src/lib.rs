//! NPC trader logic for the Bazaar merchant simulation.
//!
//! A trader owns a stock table seeded from authored sales catalogs, a
//! baseline snapshot of that table, and a schedule of pending restocks.
//! Buyers pay with items found on their person or lying nearby; payment is
//! all-or-nothing.
//!
//! Everything here is synchronous and deterministic given an injected RNG.
//! The tick loop that drives traders lives in `bazaar-core`.
//!
//! # Modules
//!
//! - [`catalog`] -- One-shot catalog resolution and baseline capture
//! - [`config`] -- [`TraderConfig`] tuning knobs
//! - [`error`] -- [`TraderError`]
//! - [`payment`] -- Depth-first payment locator with earmarking
//! - [`purchase`] -- The all-or-nothing buy transaction
//! - [`restock`] -- Periodic restock scheduling and firing
//! - [`speech`] -- Randomized in-character responses
//! - [`state`] -- [`TraderState`], the per-trader record

pub mod catalog;
pub mod config;
pub mod error;
pub mod payment;
pub mod purchase;
pub mod restock;
pub mod speech;
pub mod state;

pub use catalog::{ResolveReport, resolve_catalog};
pub use config::TraderConfig;
pub use error::TraderError;
pub use payment::{EarmarkSet, SearchLimits, locate};
pub use purchase::{
    DropReason, PurchaseContext, PurchaseOutcome, PurchaseReceipt, attempt_buy,
};
pub use restock::{RestockReport, run_restock};
pub use speech::{SpeechKind, SpeechLines};
pub use state::{PendingRestock, TraderState};
