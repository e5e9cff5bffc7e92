//! Error types for the `bazaar-world` crate.
//!
//! All fallible world operations return [`WorldError`].

use bazaar_types::EntityId;

/// Errors that can occur while querying or mutating the world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The entity does not exist (or is already queued for destruction).
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// The entity has no storage and cannot hold other entities.
    #[error("entity {0} is not a container")]
    NotAContainer(EntityId),

    /// The actor has no hand slot with the given index.
    #[error("actor {actor} has no hand {hand}")]
    NoSuchHand {
        /// The actor.
        actor: EntityId,
        /// The requested hand index.
        hand: usize,
    },

    /// The hand slot already holds an item.
    #[error("hand {hand} of actor {actor} is occupied")]
    HandOccupied {
        /// The actor.
        actor: EntityId,
        /// The occupied hand index.
        hand: usize,
    },

    /// Inserting the entity would make it contain itself.
    #[error("inserting {item} into {container} would create a containment cycle")]
    ContainmentCycle {
        /// The container receiving the item.
        container: EntityId,
        /// The item being inserted.
        item: EntityId,
    },
}
