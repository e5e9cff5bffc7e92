//! Locating payment items on or around a buyer.
//!
//! The search visits the buyer's hands, then equipped slots, then loose
//! entities near the trader. The trader and the buyer themselves are never
//! candidates. Containers are explored depth-first and their
//! contents are tried before the container itself, so a wallet full of coins
//! pays with a coin rather than being taken whole. Every accepted item is
//! earmarked so a single purchase never counts the same entity twice.

use bazaar_types::{EntityId, ItemKind};
use bazaar_world::{InventoryService, ItemQuery, SpatialService, StorageService};
use tracing::{debug, trace, warn};

/// Items reserved as payment during one purchase attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EarmarkSet {
    items: Vec<EntityId>,
}

impl EarmarkSet {
    /// Create an empty set.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Whether `entity` is already reserved.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.items.contains(&entity)
    }

    /// Reserved items in the order they were found.
    pub fn as_slice(&self) -> &[EntityId] {
        &self.items
    }

    /// Number of reserved items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is reserved.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the set, yielding the reserved items.
    pub fn into_vec(self) -> Vec<EntityId> {
        self.items
    }

    fn insert(&mut self, entity: EntityId) {
        self.items.push(entity);
    }
}

/// Bounds on how far the locator looks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchLimits {
    /// Radius around the trader searched for loose items.
    pub radius: f32,
    /// Maximum container nesting explored.
    pub max_depth: u32,
}

/// Where a payment item was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaymentSource {
    /// In one of the buyer's hands, or inside something held.
    Hands,
    /// In an equipped slot, or inside something equipped.
    Equipment,
    /// Lying near the trader, or inside something lying there.
    Nearby,
}

impl PaymentSource {
    const ORDER: [Self; 3] = [Self::Hands, Self::Equipment, Self::Nearby];
}

/// Find one unreserved, usable item of `kind` and earmark it.
///
/// Returns `false` when every source is exhausted.
pub fn locate<W>(
    world: &W,
    trader: EntityId,
    kind: &ItemKind,
    buyer: EntityId,
    earmarks: &mut EarmarkSet,
    limits: SearchLimits,
) -> bool
where
    W: InventoryService + SpatialService + StorageService + ItemQuery + ?Sized,
{
    let mut search = Search {
        world,
        kind,
        earmarks,
        max_depth: limits.max_depth,
    };

    for source in PaymentSource::ORDER {
        let roots = match source {
            PaymentSource::Hands => world.held_items(buyer),
            PaymentSource::Equipment => world.equipped_items(buyer),
            PaymentSource::Nearby => world.uncontained_near(trader, limits.radius),
        };
        for root in roots.into_iter().filter(|root| *root != buyer) {
            if let Some(found) = search.visit(root, 0) {
                trace!(%buyer, item = %found, kind = %kind, ?source, "Payment item located");
                return true;
            }
        }
    }
    false
}

struct Search<'a, W: ?Sized> {
    world: &'a W,
    kind: &'a ItemKind,
    earmarks: &'a mut EarmarkSet,
    max_depth: u32,
}

impl<W> Search<'_, W>
where
    W: StorageService + ItemQuery + ?Sized,
{
    fn visit(&mut self, entity: EntityId, depth: u32) -> Option<EntityId> {
        if let Some(contents) = self.world.stored_items(entity) {
            if depth >= self.max_depth {
                warn!(
                    container = %entity,
                    depth,
                    "Container nesting exceeds payment search depth; contents skipped"
                );
            } else {
                let next = depth.saturating_add(1);
                for item in contents {
                    if let Some(found) = self.visit(item, next) {
                        return Some(found);
                    }
                }
            }
        }
        self.accept(entity).then_some(entity)
    }

    fn accept(&mut self, entity: EntityId) -> bool {
        if self.world.kind_of(entity).as_ref() != Some(self.kind) {
            return false;
        }
        if self.earmarks.contains(entity) {
            return false;
        }
        if self.world.cartridge(entity).is_some_and(|c| c.spent) {
            debug!(item = %entity, kind = %self.kind, "Spent cartridge refused as payment");
            return false;
        }
        self.earmarks.insert(entity);
        true
    }
}
