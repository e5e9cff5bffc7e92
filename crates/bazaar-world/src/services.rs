//! Collaborator traits consumed by the trader logic.
//!
//! The merchant subsystem never touches entity storage directly. Everything
//! it needs from the surrounding simulation goes through these narrow traits,
//! so the trader crate can run against the in-memory [`SimWorld`] in tests
//! and against a real entity store in a host game.
//!
//! [`SimWorld`]: crate::sim_world::SimWorld

use bazaar_types::{Cartridge, EntityId, ItemKind, PhraseKey, PurchaseRecord};

use crate::error::WorldError;

/// Hands and equipment of an actor, plus item spawning.
pub trait InventoryService {
    /// Items currently held, one per occupied hand, in hand order.
    fn held_items(&self, actor: EntityId) -> Vec<EntityId>;

    /// Items in equipped slots (pockets, belt, back, bag...).
    fn equipped_items(&self, actor: EntityId) -> Vec<EntityId>;

    /// Create `count` new entities of `kind` on the actor.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] if the actor does not exist.
    fn spawn_on(
        &mut self,
        actor: EntityId,
        kind: &ItemKind,
        count: u32,
    ) -> Result<Vec<EntityId>, WorldError>;
}

/// Proximity queries.
pub trait SpatialService {
    /// Uncontained entities within `radius` of `origin`, excluding `origin`.
    fn uncontained_near(&self, origin: EntityId, radius: f32) -> Vec<EntityId>;
}

/// Container contents.
pub trait StorageService {
    /// Contents of `container`, or `None` if it has no storage.
    fn stored_items(&self, container: EntityId) -> Option<Vec<EntityId>>;
}

/// Per-entity metadata.
pub trait ItemQuery {
    /// Whether the entity exists and is not queued for destruction.
    fn exists(&self, entity: EntityId) -> bool;

    /// Resolved item kind (prototype id) of the entity.
    fn kind_of(&self, entity: EntityId) -> Option<ItemKind>;

    /// Cartridge state, if the entity is an ammunition cartridge.
    fn cartridge(&self, entity: EntityId) -> Option<Cartridge>;
}

/// Entity destruction. Destruction is queued, not instantaneous.
pub trait EntityLifecycle {
    /// Queue `entity` for destruction at the end of the tick.
    fn queue_destroy(&mut self, entity: EntityId);
}

/// In-character speech.
pub trait ChatService {
    /// Make `speaker` say the localized line behind `phrase`.
    fn say(&mut self, speaker: EntityId, phrase: &PhraseKey);
}

/// Structured audit trail for completed purchases.
pub trait AuditSink {
    /// Append a purchase record.
    fn record(&mut self, record: PurchaseRecord);
}

/// Everything a purchase needs from the world, as one bound.
pub trait TraderWorld:
    InventoryService + SpatialService + StorageService + ItemQuery + EntityLifecycle + ChatService
{
}

impl<T> TraderWorld for T where
    T: InventoryService
        + SpatialService
        + StorageService
        + ItemQuery
        + EntityLifecycle
        + ChatService
{
}
