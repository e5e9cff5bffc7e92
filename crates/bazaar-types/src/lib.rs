//! Shared type definitions for the Bazaar merchant simulation.
//!
//! This crate is the single source of truth for the data exchanged between
//! the trader logic, the world collaborators, and the presentation layer.
//! Storefront types flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Entity identifiers and prototype keys
//! - [`prototypes`] -- Authored catalog data ([`CatalogEntry`], [`SalesCatalog`])
//! - [`stock`] -- [`Stock`] and [`RestockAmount`] with their `-1` sentinels
//! - [`structs`] -- Inbound requests, audit records, storefront views
//! - [`time`] -- Simulated timestamps

pub mod ids;
pub mod prototypes;
pub mod stock;
pub mod structs;
pub mod time;

// Re-export all public types at crate root for convenience.
pub use ids::{CatalogId, EntityId, ItemKind, PhraseKey, ProductId, PurchaseId};
pub use prototypes::{CatalogEntry, CatalogItemRef, SalesCatalog};
pub use stock::{RestockAmount, Stock};
pub use structs::{
    BuyRequest, Cartridge, CatalogUpdate, PurchaseRecord, StorefrontEntry, StorefrontView,
};
pub use time::SimTime;
