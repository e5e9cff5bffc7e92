//! World collaborators for the Bazaar merchant simulation.
//!
//! The trader logic consumes the surrounding world only through the traits
//! in [`services`] and [`prototype`]. This crate defines those seams and
//! ships in-memory implementations used by the engine binary and the tests.
//!
//! # Modules
//!
//! - [`audit`] -- [`AuditLog`], an append-only purchase trail.
//! - [`error`] -- Error types for world operations.
//! - [`prototype`] -- [`PrototypeLookup`] and the in-memory [`PrototypeRegistry`].
//! - [`services`] -- Inventory, spatial, storage, item, lifecycle, chat, and
//!   audit traits.
//! - [`sim_world`] -- [`SimWorld`], an in-memory entity store with hands,
//!   equipment slots, nested storage, and queued destruction.

pub mod audit;
pub mod error;
pub mod prototype;
pub mod services;
pub mod sim_world;

// Re-export primary types at crate root.
pub use audit::AuditLog;
pub use error::WorldError;
pub use prototype::{PrototypeLookup, PrototypeRegistry};
pub use services::{
    AuditSink, ChatService, EntityLifecycle, InventoryService, ItemQuery, SpatialService,
    StorageService, TraderWorld,
};
pub use sim_world::{Position, SimWorld, SpokenLine};
