//! In-memory world used by the engine binary and by tests.
//!
//! [`SimWorld`] is a deliberately small entity store: every entity has an
//! item kind and a position, may have storage (a list of contained
//! entities), may be an ammunition cartridge, and may be an actor with hand
//! slots and named equipment slots. It implements every collaborator trait
//! from [`services`](crate::services).
//!
//! Containment is tracked through a single `parent` link. An entity with no
//! parent lies loose in the world; anything in a container, a hand, or an
//! equipment slot is contained. Insertions that would create a containment
//! cycle are refused, so storage queries never recurse forever.
//!
//! Destruction is queued. Queued entities are hidden from every query
//! immediately and removed for real by [`SimWorld::flush_destroyed`].

use std::collections::{BTreeMap, BTreeSet};

use bazaar_types::{Cartridge, EntityId, ItemKind, PhraseKey};
use tracing::debug;

use crate::error::WorldError;
use crate::services::{
    ChatService, EntityLifecycle, InventoryService, ItemQuery, SpatialService, StorageService,
};

/// A 2D world position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Position {
    /// Create a position.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance_squared(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }
}

/// A line spoken through the [`ChatService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenLine {
    /// Who spoke.
    pub speaker: EntityId,
    /// The phrase key.
    pub phrase: PhraseKey,
}

#[derive(Debug, Clone)]
struct EntityRecord {
    kind: ItemKind,
    position: Position,
    parent: Option<EntityId>,
    storage: Option<Vec<EntityId>>,
    cartridge: Option<Cartridge>,
    hands: Vec<Option<EntityId>>,
    equipment: BTreeMap<String, EntityId>,
}

impl EntityRecord {
    const fn new(kind: ItemKind, position: Position) -> Self {
        Self {
            kind,
            position,
            parent: None,
            storage: None,
            cartridge: None,
            hands: Vec::new(),
            equipment: BTreeMap::new(),
        }
    }
}

/// In-memory entity store implementing all world collaborators.
#[derive(Debug, Clone, Default)]
pub struct SimWorld {
    entities: BTreeMap<EntityId, EntityRecord>,
    pending_destroy: BTreeSet<EntityId>,
    spoken: Vec<SpokenLine>,
}

impl SimWorld {
    /// Create an empty world.
    pub const fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            pending_destroy: BTreeSet::new(),
            spoken: Vec::new(),
        }
    }

    /// Spawn a loose entity at a position.
    pub fn spawn(&mut self, kind: impl Into<ItemKind>, position: Position) -> EntityId {
        let id = EntityId::new();
        self.entities
            .insert(id, EntityRecord::new(kind.into(), position));
        id
    }

    /// Spawn a loose entity with empty storage.
    pub fn spawn_container(&mut self, kind: impl Into<ItemKind>, position: Position) -> EntityId {
        let id = self.spawn(kind, position);
        if let Some(record) = self.entities.get_mut(&id) {
            record.storage = Some(Vec::new());
        }
        id
    }

    /// Spawn an ammunition cartridge.
    pub fn spawn_cartridge(
        &mut self,
        kind: impl Into<ItemKind>,
        position: Position,
        spent: bool,
    ) -> EntityId {
        let id = self.spawn(kind, position);
        if let Some(record) = self.entities.get_mut(&id) {
            record.cartridge = Some(Cartridge { spent });
        }
        id
    }

    /// Spawn an actor with the given number of (empty) hands.
    pub fn spawn_actor(
        &mut self,
        kind: impl Into<ItemKind>,
        position: Position,
        hand_count: usize,
    ) -> EntityId {
        let id = self.spawn(kind, position);
        if let Some(record) = self.entities.get_mut(&id) {
            record.hands = vec![None; hand_count];
        }
        id
    }

    /// Put `item` into the storage of `container`.
    ///
    /// # Errors
    ///
    /// Fails if either entity is missing, the container has no storage, or
    /// the insertion would make an entity contain itself.
    pub fn insert_into(&mut self, container: EntityId, item: EntityId) -> Result<(), WorldError> {
        self.ensure_exists(item)?;
        let storage_present = self
            .entities
            .get(&container)
            .ok_or(WorldError::EntityNotFound(container))?
            .storage
            .is_some();
        if !storage_present {
            return Err(WorldError::NotAContainer(container));
        }
        if self.is_ancestor_or_self(item, container) {
            return Err(WorldError::ContainmentCycle { container, item });
        }

        self.detach(item);
        if let Some(storage) = self
            .entities
            .get_mut(&container)
            .and_then(|record| record.storage.as_mut())
        {
            storage.push(item);
        }
        self.set_parent(item, container);
        Ok(())
    }

    /// Place `item` in hand `hand` of `actor`.
    ///
    /// # Errors
    ///
    /// Fails if either entity is missing, the hand does not exist, or the
    /// hand is already occupied.
    pub fn put_in_hand(
        &mut self,
        actor: EntityId,
        hand: usize,
        item: EntityId,
    ) -> Result<(), WorldError> {
        self.ensure_exists(item)?;
        let slot = self
            .entities
            .get(&actor)
            .ok_or(WorldError::EntityNotFound(actor))?
            .hands
            .get(hand)
            .copied()
            .ok_or(WorldError::NoSuchHand { actor, hand })?;
        if slot.is_some() {
            return Err(WorldError::HandOccupied { actor, hand });
        }
        if self.is_ancestor_or_self(item, actor) {
            return Err(WorldError::ContainmentCycle {
                container: actor,
                item,
            });
        }

        self.detach(item);
        if let Some(slot) = self
            .entities
            .get_mut(&actor)
            .and_then(|record| record.hands.get_mut(hand))
        {
            *slot = Some(item);
        }
        self.set_parent(item, actor);
        Ok(())
    }

    /// Equip `item` into the named slot of `actor`, replacing (and dropping)
    /// whatever was there.
    ///
    /// # Errors
    ///
    /// Fails if either entity is missing or the insertion would create a
    /// containment cycle.
    pub fn equip(
        &mut self,
        actor: EntityId,
        slot: impl Into<String>,
        item: EntityId,
    ) -> Result<(), WorldError> {
        self.ensure_exists(item)?;
        self.ensure_exists(actor)?;
        if self.is_ancestor_or_self(item, actor) {
            return Err(WorldError::ContainmentCycle {
                container: actor,
                item,
            });
        }

        self.detach(item);
        let previous = self
            .entities
            .get_mut(&actor)
            .and_then(|record| record.equipment.insert(slot.into(), item));
        if let Some(previous) = previous {
            self.release(previous);
        }
        self.set_parent(item, actor);
        Ok(())
    }

    /// Lines spoken so far, oldest first.
    pub fn spoken(&self) -> &[SpokenLine] {
        &self.spoken
    }

    /// Entities queued for destruction but not yet flushed.
    pub const fn pending_destroy(&self) -> &BTreeSet<EntityId> {
        &self.pending_destroy
    }

    /// Whether the entity is stored in any container, hand, or slot.
    pub fn is_contained(&self, entity: EntityId) -> bool {
        self.entities
            .get(&entity)
            .is_some_and(|record| record.parent.is_some())
    }

    /// Count live entities of `kind` reachable from `actor` through hands,
    /// equipment, and nested storage.
    pub fn count_carried(&self, actor: EntityId, kind: &ItemKind) -> usize {
        let mut roots = self.held_items(actor);
        roots.extend(self.equipped_items(actor));
        let mut count: usize = 0;
        let mut stack = roots;
        while let Some(entity) = stack.pop() {
            if self.kind_of(entity).as_ref() == Some(kind) {
                count = count.saturating_add(1);
            }
            if let Some(contents) = self.stored_items(entity) {
                stack.extend(contents);
            }
        }
        count
    }

    /// Destroy every queued entity, together with everything it contains.
    ///
    /// Returns the ids removed, in removal order.
    pub fn flush_destroyed(&mut self) -> Vec<EntityId> {
        let queued: Vec<EntityId> = core::mem::take(&mut self.pending_destroy)
            .into_iter()
            .collect();
        let mut removed = Vec::new();
        for root in queued {
            if !self.entities.contains_key(&root) {
                continue;
            }
            self.detach(root);
            let mut stack = vec![root];
            while let Some(entity) = stack.pop() {
                if let Some(record) = self.entities.remove(&entity) {
                    stack.extend(record.storage.unwrap_or_default());
                    stack.extend(record.hands.into_iter().flatten());
                    stack.extend(record.equipment.into_values());
                    removed.push(entity);
                }
            }
        }
        if !removed.is_empty() {
            debug!(count = removed.len(), "Flushed destroyed entities");
        }
        removed
    }

    fn ensure_exists(&self, entity: EntityId) -> Result<(), WorldError> {
        if self.entities.contains_key(&entity) {
            Ok(())
        } else {
            Err(WorldError::EntityNotFound(entity))
        }
    }

    fn is_live(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity) && !self.pending_destroy.contains(&entity)
    }

    /// Whether `candidate` is `entity` or one of its containers, walking up
    /// the parent chain.
    fn is_ancestor_or_self(&self, candidate: EntityId, entity: EntityId) -> bool {
        let mut cursor = Some(entity);
        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            cursor = self.entities.get(&current).and_then(|record| record.parent);
        }
        false
    }

    fn set_parent(&mut self, item: EntityId, parent: EntityId) {
        let position = self.entities.get(&parent).map(|record| record.position);
        if let Some(record) = self.entities.get_mut(&item) {
            record.parent = Some(parent);
            if let Some(position) = position {
                record.position = position;
            }
        }
    }

    /// Remove `item` from whatever holds it, leaving it loose in place.
    fn detach(&mut self, item: EntityId) {
        let Some(parent) = self.entities.get(&item).and_then(|record| record.parent) else {
            return;
        };
        if let Some(holder) = self.entities.get_mut(&parent) {
            if let Some(storage) = holder.storage.as_mut() {
                storage.retain(|stored| *stored != item);
            }
            for slot in &mut holder.hands {
                if *slot == Some(item) {
                    *slot = None;
                }
            }
            holder.equipment.retain(|_, equipped| *equipped != item);
        }
        if let Some(record) = self.entities.get_mut(&item) {
            record.parent = None;
        }
    }

    fn release(&mut self, item: EntityId) {
        if let Some(record) = self.entities.get_mut(&item) {
            record.parent = None;
        }
    }

    fn place_on(&mut self, actor: EntityId, item: EntityId) {
        let free_hand = self
            .entities
            .get(&actor)
            .and_then(|record| record.hands.iter().position(Option::is_none));
        match free_hand {
            Some(hand) => {
                if let Some(slot) = self
                    .entities
                    .get_mut(&actor)
                    .and_then(|record| record.hands.get_mut(hand))
                {
                    *slot = Some(item);
                }
                self.set_parent(item, actor);
            }
            None => {
                // No free hand: the item lands loose at the actor's feet.
                let position = self.entities.get(&actor).map(|record| record.position);
                if let (Some(position), Some(record)) = (position, self.entities.get_mut(&item)) {
                    record.position = position;
                }
            }
        }
    }
}

impl InventoryService for SimWorld {
    fn held_items(&self, actor: EntityId) -> Vec<EntityId> {
        self.entities
            .get(&actor)
            .map(|record| {
                record
                    .hands
                    .iter()
                    .flatten()
                    .copied()
                    .filter(|item| self.is_live(*item))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn equipped_items(&self, actor: EntityId) -> Vec<EntityId> {
        self.entities
            .get(&actor)
            .map(|record| {
                record
                    .equipment
                    .values()
                    .copied()
                    .filter(|item| self.is_live(*item))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn spawn_on(
        &mut self,
        actor: EntityId,
        kind: &ItemKind,
        count: u32,
    ) -> Result<Vec<EntityId>, WorldError> {
        if !self.is_live(actor) {
            return Err(WorldError::EntityNotFound(actor));
        }
        let position = self
            .entities
            .get(&actor)
            .map(|record| record.position)
            .unwrap_or_default();
        let mut spawned = Vec::new();
        for _ in 0..count {
            let item = self.spawn(kind.clone(), position);
            self.place_on(actor, item);
            spawned.push(item);
        }
        Ok(spawned)
    }
}

impl SpatialService for SimWorld {
    fn uncontained_near(&self, origin: EntityId, radius: f32) -> Vec<EntityId> {
        let Some(center) = self.entities.get(&origin).map(|record| record.position) else {
            return Vec::new();
        };
        let radius_squared = radius * radius;
        self.entities
            .iter()
            .filter(|(id, record)| {
                **id != origin
                    && record.parent.is_none()
                    && !self.pending_destroy.contains(*id)
                    && record.position.distance_squared(center) <= radius_squared
            })
            .map(|(id, _)| *id)
            .collect()
    }
}

impl StorageService for SimWorld {
    fn stored_items(&self, container: EntityId) -> Option<Vec<EntityId>> {
        if !self.is_live(container) {
            return None;
        }
        self.entities
            .get(&container)
            .and_then(|record| record.storage.as_ref())
            .map(|storage| {
                storage
                    .iter()
                    .copied()
                    .filter(|item| self.is_live(*item))
                    .collect()
            })
    }
}

impl ItemQuery for SimWorld {
    fn exists(&self, entity: EntityId) -> bool {
        self.is_live(entity)
    }

    fn kind_of(&self, entity: EntityId) -> Option<ItemKind> {
        if !self.is_live(entity) {
            return None;
        }
        self.entities.get(&entity).map(|record| record.kind.clone())
    }

    fn cartridge(&self, entity: EntityId) -> Option<Cartridge> {
        self.entities.get(&entity).and_then(|record| record.cartridge)
    }
}

impl EntityLifecycle for SimWorld {
    fn queue_destroy(&mut self, entity: EntityId) {
        if self.entities.contains_key(&entity) {
            self.pending_destroy.insert(entity);
        }
    }
}

impl ChatService for SimWorld {
    fn say(&mut self, speaker: EntityId, phrase: &PhraseKey) {
        debug!(%speaker, phrase = %phrase, "Trader speaks");
        self.spoken.push(SpokenLine {
            speaker,
            phrase: phrase.clone(),
        });
    }
}
