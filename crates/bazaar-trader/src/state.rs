//! Per-trader mutable state.
//!
//! A [`TraderState`] is exclusively owned by the market tick; the catalog,
//! restock, and purchase operations are the only writers. Mutators are
//! crate-private so the stock-versus-baseline invariant can only be touched
//! through those operations.

use std::collections::BTreeMap;
use std::time::Duration;

use bazaar_types::{
    CatalogId, EntityId, ProductId, RestockAmount, SimTime, Stock, StorefrontEntry,
    StorefrontView,
};
use bazaar_world::PrototypeLookup;

use crate::config::TraderConfig;
use crate::speech::SpeechLines;

/// A scheduled restock for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRestock {
    /// Fires once the simulated time is strictly past this instant.
    pub restock_at: SimTime,
    /// How much the firing restores.
    pub amount: RestockAmount,
}

/// Inventory, baseline, restock schedule, and speech of one trader.
#[derive(Debug, Clone)]
pub struct TraderState {
    entity: EntityId,
    catalog_sources: Vec<CatalogId>,
    stock: BTreeMap<ProductId, Stock>,
    baseline: Option<BTreeMap<ProductId, Stock>>,
    pending_restocks: BTreeMap<ProductId, PendingRestock>,
    next_tick_at: SimTime,
    tick_interval: Duration,
    speech: SpeechLines,
    dirty: bool,
}

impl TraderState {
    /// Create a trader with no stock yet. Stock is filled by
    /// [`resolve_catalog`](crate::catalog::resolve_catalog).
    pub fn new(
        entity: EntityId,
        catalog_sources: Vec<CatalogId>,
        speech: SpeechLines,
        config: &TraderConfig,
    ) -> Self {
        Self {
            entity,
            catalog_sources,
            stock: BTreeMap::new(),
            baseline: None,
            pending_restocks: BTreeMap::new(),
            next_tick_at: SimTime::ZERO,
            tick_interval: config.tick_interval,
            speech,
            dirty: false,
        }
    }

    /// Seed a stock line before the catalog is resolved. Authored stock wins
    /// over catalog quantities for the same product.
    #[must_use]
    pub fn with_stock(mut self, product: impl Into<ProductId>, stock: Stock) -> Self {
        self.stock.insert(product.into(), stock);
        self
    }

    /// The entity this state belongs to.
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// Catalogs merged into stock on the first resolution, in priority order.
    pub fn catalog_sources(&self) -> &[CatalogId] {
        &self.catalog_sources
    }

    /// Current stock of every product.
    pub const fn stock(&self) -> &BTreeMap<ProductId, Stock> {
        &self.stock
    }

    /// Current stock of one product.
    pub fn stock_of(&self, product: &ProductId) -> Option<Stock> {
        self.stock.get(product).copied()
    }

    /// Snapshot captured at initialization, or `None` before that.
    pub const fn baseline(&self) -> Option<&BTreeMap<ProductId, Stock>> {
        self.baseline.as_ref()
    }

    /// Baseline quantity of one product.
    pub fn baseline_of(&self, product: &ProductId) -> Option<Stock> {
        self.baseline.as_ref()?.get(product).copied()
    }

    /// Whether the baseline has been captured.
    pub const fn is_initialized(&self) -> bool {
        self.baseline.is_some()
    }

    /// All scheduled restocks.
    pub const fn pending_restocks(&self) -> &BTreeMap<ProductId, PendingRestock> {
        &self.pending_restocks
    }

    /// The scheduled restock of one product, if any.
    pub fn pending_restock(&self, product: &ProductId) -> Option<PendingRestock> {
        self.pending_restocks.get(product).copied()
    }

    /// Earliest time the next restock tick may run (exclusive).
    pub const fn next_tick_at(&self) -> SimTime {
        self.next_tick_at
    }

    /// Interval between restock ticks.
    pub const fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Phrase sets this trader speaks from.
    pub const fn speech(&self) -> &SpeechLines {
        &self.speech
    }

    /// Whether stock changed since the last [`take_dirty`](Self::take_dirty).
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return and clear the change flag.
    pub const fn take_dirty(&mut self) -> bool {
        let was = self.dirty;
        self.dirty = false;
        was
    }

    /// Every finite stock is at most its baseline.
    pub fn within_baseline(&self) -> bool {
        let Some(baseline) = &self.baseline else {
            return true;
        };
        self.stock.iter().all(|(product, stock)| {
            match (stock.finite(), baseline.get(product).and_then(|b| b.finite())) {
                (Some(current), Some(cap)) => current <= cap,
                _ => true,
            }
        })
    }

    /// Presentation view of the current stock joined with catalog metadata.
    pub fn storefront(&self, prototypes: &(impl PrototypeLookup + ?Sized)) -> StorefrontView {
        let entries = self
            .stock
            .iter()
            .map(|(product, stock)| {
                let entry = prototypes.product(product);
                StorefrontEntry {
                    product_id: product.clone(),
                    name: entry.and_then(|e| e.name.clone()),
                    description: entry.and_then(|e| e.description.clone()),
                    price: entry.map(|e| e.giving_items.clone()).unwrap_or_default(),
                    goods: entry.map(|e| e.taking_items.clone()).unwrap_or_default(),
                    stock: stock.as_sentinel(),
                }
            })
            .collect();
        StorefrontView {
            trader: self.entity,
            entries,
        }
    }

    // -- crate-private mutators --------------------------------------------

    pub(crate) fn insert_stock_if_absent(&mut self, product: ProductId, stock: Stock) -> bool {
        if self.stock.contains_key(&product) {
            return false;
        }
        self.stock.insert(product, stock);
        true
    }

    /// Capture the baseline. Returns `false` if it was already captured.
    pub(crate) fn capture_baseline(&mut self) -> bool {
        if self.baseline.is_some() {
            return false;
        }
        self.baseline = Some(self.stock.clone());
        self.dirty = true;
        true
    }

    pub(crate) const fn set_next_tick_at(&mut self, at: SimTime) {
        self.next_tick_at = at;
    }

    pub(crate) fn schedule_restock(&mut self, product: ProductId, pending: PendingRestock) {
        self.pending_restocks.insert(product, pending);
    }

    pub(crate) fn clear_restock(&mut self, product: &ProductId) -> Option<PendingRestock> {
        self.pending_restocks.remove(product)
    }

    /// Apply a restock firing. Returns the new stock if anything changed.
    ///
    /// Unlimited or unknown products are left untouched; finite products
    /// never exceed their baseline.
    pub(crate) fn apply_restock(&mut self, product: &ProductId, amount: RestockAmount) -> Option<Stock> {
        let cap = self.baseline_of(product)?.finite()?;
        let slot = self.stock.get_mut(product)?;
        let current = slot.finite()?;
        let restored = match amount {
            RestockAmount::Full => cap,
            RestockAmount::Units(units) => current.checked_add(units).map_or(cap, |sum| sum.min(cap)),
        };
        if restored == current {
            return None;
        }
        *slot = Stock::Finite(restored);
        let stock = *slot;
        self.dirty = true;
        debug_assert!(self.within_baseline());
        Some(stock)
    }

    /// Take one unit of a finite product. Unlimited stock is unchanged.
    pub(crate) fn consume_one(&mut self, product: &ProductId) -> Option<Stock> {
        let slot = self.stock.get_mut(product)?;
        if let Stock::Finite(units) = *slot {
            *slot = Stock::Finite(units.saturating_sub(1));
            self.dirty = true;
        }
        Some(*slot)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_types::CatalogEntry;
    use bazaar_world::PrototypeRegistry;

    use super::*;

    fn trader() -> TraderState {
        TraderState::new(
            EntityId::new(),
            vec![CatalogId::from("general")],
            SpeechLines::default(),
            &TraderConfig::default(),
        )
    }

    #[test]
    fn new_trader_is_uninitialized() {
        let state = trader();
        assert!(!state.is_initialized());
        assert!(state.stock().is_empty());
        assert_eq!(state.next_tick_at(), SimTime::ZERO);
        assert_eq!(state.tick_interval(), Duration::from_secs(5));
        assert!(!state.is_dirty());
    }

    #[test]
    fn baseline_is_captured_once() {
        let mut state = trader().with_stock("rope", Stock::Finite(3));
        assert!(state.capture_baseline());
        state.consume_one(&ProductId::from("rope"));
        assert!(!state.capture_baseline());
        assert_eq!(state.baseline_of(&ProductId::from("rope")), Some(Stock::Finite(3)));
        assert_eq!(state.stock_of(&ProductId::from("rope")), Some(Stock::Finite(2)));
    }

    #[test]
    fn unit_restock_is_clamped_to_baseline() {
        let rope = ProductId::from("rope");
        let mut state = trader().with_stock("rope", Stock::Finite(10));
        state.capture_baseline();
        for _ in 0..9 {
            state.consume_one(&rope);
        }
        assert_eq!(state.apply_restock(&rope, RestockAmount::Units(4)), Some(Stock::Finite(5)));
        assert_eq!(
            state.apply_restock(&rope, RestockAmount::Units(u32::MAX)),
            Some(Stock::Finite(10))
        );
        assert_eq!(state.apply_restock(&rope, RestockAmount::Full), None);
        assert!(state.within_baseline());
    }

    #[test]
    fn unlimited_stock_never_changes() {
        let water = ProductId::from("water");
        let mut state = trader().with_stock("water", Stock::Unlimited);
        state.capture_baseline();
        state.take_dirty();

        assert_eq!(state.consume_one(&water), Some(Stock::Unlimited));
        assert_eq!(state.apply_restock(&water, RestockAmount::Full), None);
        assert!(!state.is_dirty());
    }

    #[test]
    fn take_dirty_clears_the_flag() {
        let mut state = trader().with_stock("rope", Stock::Finite(1));
        state.capture_baseline();
        assert!(state.take_dirty());
        assert!(!state.take_dirty());
    }

    #[test]
    fn storefront_joins_catalog_metadata() {
        let registry = PrototypeRegistry::new().with_product(
            CatalogEntry::new("rope")
                .costing("coin", 2)
                .granting("rope-coil", 1),
        );
        let state = trader()
            .with_stock("rope", Stock::Finite(4))
            .with_stock("water", Stock::Unlimited);

        let view = state.storefront(&registry);
        assert_eq!(view.trader, state.entity());
        assert_eq!(view.entries.len(), 2);

        let rope = view.entries.first().unwrap();
        assert_eq!(rope.product_id.as_str(), "rope");
        assert_eq!(rope.stock, 4);
        assert_eq!(rope.price.get("coin"), Some(&2));

        let water = view.entries.get(1).unwrap();
        assert_eq!(water.stock, -1);
        assert!(water.price.is_empty());
    }
}
