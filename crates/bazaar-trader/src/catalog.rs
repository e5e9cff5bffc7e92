//! One-shot merge of authored sales catalogs into trader stock.
//!
//! Catalogs are visited in the order the trader lists them and entries in
//! declaration order. The first quantity seen for a product wins. A trader
//! whose stock was seeded before resolution keeps exactly that stock and its
//! catalogs are not merged. Once the baseline has been captured, resolution
//! is a no-op.

use bazaar_types::{CatalogId, ProductId, SimTime};
use bazaar_world::PrototypeLookup;
use tracing::{debug, info, warn};

use crate::error::TraderError;
use crate::state::TraderState;

/// What a call to [`resolve_catalog`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// The trader was already initialized; nothing changed.
    pub already_initialized: bool,
    /// Stock was seeded before resolution; catalogs were not merged.
    pub pre_seeded: bool,
    /// Products added to stock, in merge order.
    pub inserted: Vec<ProductId>,
    /// Products skipped because an earlier source already listed them.
    pub duplicates: Vec<ProductId>,
    /// Catalog ids that did not resolve.
    pub missing_catalogs: Vec<CatalogId>,
    /// Catalog references whose product did not resolve.
    pub missing_products: Vec<ProductId>,
}

/// Populate stock from the trader's catalogs, capture the baseline, and
/// arm the first restock tick at `now + tick_interval`.
pub fn resolve_catalog(
    trader: &mut TraderState,
    prototypes: &(impl PrototypeLookup + ?Sized),
    now: SimTime,
) -> Result<ResolveReport, TraderError> {
    let mut report = ResolveReport::default();
    if trader.is_initialized() {
        report.already_initialized = true;
        return Ok(report);
    }

    if trader.stock().is_empty() {
        merge_catalogs(trader, prototypes, &mut report);
    } else {
        debug!(
            trader = %trader.entity(),
            products = trader.stock().len(),
            "Stock already seeded; catalogs not merged"
        );
        report.pre_seeded = true;
    }

    trader.capture_baseline();
    let first_tick = now
        .checked_add(trader.tick_interval())
        .ok_or(TraderError::TimeOverflow {
            context: "arming the first restock tick",
        })?;
    trader.set_next_tick_at(first_tick);

    info!(
        trader = %trader.entity(),
        products = trader.stock().len(),
        first_tick = %first_tick,
        "Trader catalog resolved"
    );
    Ok(report)
}

fn merge_catalogs(
    trader: &mut TraderState,
    prototypes: &(impl PrototypeLookup + ?Sized),
    report: &mut ResolveReport,
) {
    for catalog_id in trader.catalog_sources().to_vec() {
        let Some(catalog) = prototypes.catalog(&catalog_id) else {
            debug!(trader = %trader.entity(), catalog = %catalog_id, "Unknown sales catalog skipped");
            report.missing_catalogs.push(catalog_id);
            continue;
        };

        for item in &catalog.entries {
            let Some(entry) = prototypes.product(&item.product) else {
                warn!(
                    trader = %trader.entity(),
                    catalog = %catalog_id,
                    product = %item.product,
                    "Catalog references unknown product"
                );
                report.missing_products.push(item.product.clone());
                continue;
            };

            if trader.insert_stock_if_absent(entry.id.clone(), item.quantity) {
                report.inserted.push(entry.id.clone());
            } else {
                debug!(
                    trader = %trader.entity(),
                    product = %entry.id,
                    "Product already stocked; keeping first quantity"
                );
                report.duplicates.push(entry.id.clone());
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_types::{CatalogEntry, EntityId, SalesCatalog, Stock};
    use bazaar_world::PrototypeRegistry;

    use super::*;
    use crate::config::TraderConfig;
    use crate::speech::SpeechLines;

    fn registry() -> PrototypeRegistry {
        PrototypeRegistry::new()
            .with_product(CatalogEntry::new("rope").costing("coin", 1))
            .with_product(CatalogEntry::new("lamp").costing("coin", 3))
            .with_product(CatalogEntry::new("water").costing("coin", 1))
            .with_catalog(
                SalesCatalog::new("general")
                    .with("rope", Stock::Finite(5))
                    .with("lamp", Stock::Finite(2)),
            )
            .with_catalog(
                SalesCatalog::new("extras")
                    .with("rope", Stock::Finite(99))
                    .with("water", Stock::Unlimited)
                    .with("ghost", Stock::Finite(1)),
            )
    }

    fn trader(sources: &[&str]) -> TraderState {
        TraderState::new(
            EntityId::new(),
            sources.iter().map(|s| CatalogId::from(*s)).collect(),
            SpeechLines::default(),
            &TraderConfig::default(),
        )
    }

    #[test]
    fn first_catalog_wins_on_duplicates() {
        let mut state = trader(&["general", "extras"]);
        let report = resolve_catalog(&mut state, &registry(), SimTime::ZERO).unwrap();

        assert_eq!(state.stock_of(&ProductId::from("rope")), Some(Stock::Finite(5)));
        assert_eq!(state.stock_of(&ProductId::from("water")), Some(Stock::Unlimited));
        assert_eq!(report.duplicates, vec![ProductId::from("rope")]);
        assert_eq!(report.missing_products, vec![ProductId::from("ghost")]);
        assert_eq!(state.stock().len(), 3);
    }

    #[test]
    fn seeded_stock_is_kept_and_catalogs_are_not_merged() {
        let mut state = trader(&["general"]).with_stock("lamp", Stock::Finite(9));
        let report = resolve_catalog(&mut state, &registry(), SimTime::ZERO).unwrap();

        assert!(report.pre_seeded);
        assert!(report.inserted.is_empty());
        assert_eq!(state.stock().len(), 1);
        assert_eq!(state.stock_of(&ProductId::from("rope")), None);
        assert_eq!(state.stock_of(&ProductId::from("lamp")), Some(Stock::Finite(9)));
        assert_eq!(state.baseline(), Some(state.stock()));
        assert_eq!(state.next_tick_at(), SimTime::from_millis(5_000));
        assert!(state.is_initialized());
    }

    #[test]
    fn missing_catalog_is_skipped() {
        let mut state = trader(&["nowhere", "general"]);
        let report = resolve_catalog(&mut state, &registry(), SimTime::ZERO).unwrap();

        assert_eq!(report.missing_catalogs, vec![CatalogId::from("nowhere")]);
        assert_eq!(state.stock().len(), 2);
        assert!(state.is_initialized());
    }

    #[test]
    fn baseline_equals_stock_and_first_tick_is_armed() {
        let mut state = trader(&["general"]);
        let now = SimTime::from_millis(1_000);
        resolve_catalog(&mut state, &registry(), now).unwrap();

        assert_eq!(state.baseline(), Some(state.stock()));
        assert_eq!(state.next_tick_at(), SimTime::from_millis(6_000));
        assert!(state.take_dirty());
    }

    #[test]
    fn second_resolution_is_a_no_op() {
        let mut state = trader(&["general"]);
        resolve_catalog(&mut state, &registry(), SimTime::ZERO).unwrap();
        let before = state.stock().clone();

        let report = resolve_catalog(
            &mut state,
            &registry().with_catalog(SalesCatalog::new("general").with("water", Stock::Finite(1))),
            SimTime::from_millis(50_000),
        )
        .unwrap();

        assert!(report.already_initialized);
        assert_eq!(state.stock(), &before);
        assert_eq!(state.next_tick_at(), SimTime::from_millis(5_000));
    }
}
