//! Periodic restocking of depleted products.
//!
//! Each trader ticks at most once per `tick_interval`. A tick first fires
//! every pending restock whose time has passed, then schedules a restock for
//! every product that is below its baseline, may respawn, and has nothing
//! pending. A fired entry is removed, so a product that is still short after
//! a partial restock is re-armed in the same tick with a fresh delay.

use bazaar_types::{ProductId, SimTime, Stock};
use bazaar_world::PrototypeLookup;
use tracing::{debug, trace};

use crate::error::TraderError;
use crate::state::{PendingRestock, TraderState};

/// What a call to [`run_restock`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestockReport {
    /// Whether the tick interval had elapsed and the tick ran.
    pub ticked: bool,
    /// Products restored by fired entries, with their new stock.
    pub restored: Vec<(ProductId, Stock)>,
    /// Products newly scheduled for restock.
    pub scheduled: Vec<ProductId>,
}

/// Run one restock tick for `trader` if its interval has elapsed.
pub fn run_restock(
    trader: &mut TraderState,
    prototypes: &(impl PrototypeLookup + ?Sized),
    now: SimTime,
) -> Result<RestockReport, TraderError> {
    let mut report = RestockReport::default();
    if now <= trader.next_tick_at() {
        return Ok(report);
    }

    let next = now
        .checked_add(trader.tick_interval())
        .ok_or(TraderError::TimeOverflow {
            context: "arming the next restock tick",
        })?;
    trader.set_next_tick_at(next);
    report.ticked = true;

    if trader.stock().is_empty() {
        return Ok(report);
    }

    fire_due(trader, now, &mut report);
    schedule_depleted(trader, prototypes, now, &mut report)?;

    if !report.restored.is_empty() || !report.scheduled.is_empty() {
        debug!(
            trader = %trader.entity(),
            restored = report.restored.len(),
            scheduled = report.scheduled.len(),
            "Restock tick"
        );
    }
    Ok(report)
}

fn fire_due(trader: &mut TraderState, now: SimTime, report: &mut RestockReport) {
    let due: Vec<(ProductId, PendingRestock)> = trader
        .pending_restocks()
        .iter()
        .filter(|(_, pending)| pending.restock_at < now)
        .map(|(product, pending)| (product.clone(), *pending))
        .collect();

    for (product, pending) in due {
        trader.clear_restock(&product);
        if let Some(stock) = trader.apply_restock(&product, pending.amount) {
            trace!(trader = %trader.entity(), product = %product, stock = %stock, "Restocked");
            report.restored.push((product, stock));
        }
    }
}

fn schedule_depleted(
    trader: &mut TraderState,
    prototypes: &(impl PrototypeLookup + ?Sized),
    now: SimTime,
    report: &mut RestockReport,
) -> Result<(), TraderError> {
    let depleted: Vec<ProductId> = trader
        .stock()
        .iter()
        .filter(|(product, stock)| {
            trader.baseline_of(product) != Some(**stock)
                && trader.pending_restock(product).is_none()
        })
        .map(|(product, _)| product.clone())
        .collect();

    for product in depleted {
        let Some(entry) = prototypes.product(&product) else {
            continue;
        };
        if !entry.can_respawn {
            continue;
        }
        let restock_at = now
            .checked_add_secs(entry.restock_delay_secs)
            .ok_or(TraderError::TimeOverflow {
                context: "scheduling a restock",
            })?;
        trader.schedule_restock(
            product.clone(),
            PendingRestock {
                restock_at,
                amount: entry.restock_amount,
            },
        );
        trace!(trader = %trader.entity(), product = %product, at = %restock_at, "Restock scheduled");
        report.scheduled.push(product);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_types::{CatalogEntry, CatalogId, EntityId, RestockAmount, SalesCatalog};
    use bazaar_world::PrototypeRegistry;

    use super::*;
    use crate::catalog::resolve_catalog;
    use crate::config::TraderConfig;
    use crate::speech::SpeechLines;

    fn secs(s: u64) -> SimTime {
        SimTime::from_secs(s).unwrap()
    }

    fn registry(amount: RestockAmount, can_respawn: bool) -> PrototypeRegistry {
        let mut rope = CatalogEntry::new("rope").costing("coin", 1).restocking(60, amount);
        rope.can_respawn = can_respawn;
        PrototypeRegistry::new()
            .with_product(rope)
            .with_product(CatalogEntry::new("water").costing("coin", 1))
            .with_catalog(
                SalesCatalog::new("general")
                    .with("rope", Stock::Finite(10))
                    .with("water", Stock::Unlimited),
            )
    }

    fn resolved(registry: &PrototypeRegistry) -> TraderState {
        let mut state = TraderState::new(
            EntityId::new(),
            vec![CatalogId::from("general")],
            SpeechLines::default(),
            &TraderConfig::default(),
        );
        resolve_catalog(&mut state, registry, SimTime::ZERO).unwrap();
        state
    }

    fn sell(state: &mut TraderState, product: &str, times: usize) {
        let product = ProductId::from(product);
        for _ in 0..times {
            state.consume_one(&product);
        }
    }

    #[test]
    fn tick_is_gated_by_strict_interval() {
        let registry = registry(RestockAmount::Full, true);
        let mut state = resolved(&registry);

        let report = run_restock(&mut state, &registry, secs(5)).unwrap();
        assert!(!report.ticked);

        let report = run_restock(&mut state, &registry, SimTime::from_millis(5_001)).unwrap();
        assert!(report.ticked);
        assert_eq!(state.next_tick_at(), SimTime::from_millis(10_001));
    }

    #[test]
    fn depleted_product_is_scheduled_once() {
        let registry = registry(RestockAmount::Full, true);
        let mut state = resolved(&registry);
        sell(&mut state, "rope", 3);

        let report = run_restock(&mut state, &registry, secs(6)).unwrap();
        assert_eq!(report.scheduled, vec![ProductId::from("rope")]);
        let pending = state.pending_restock(&ProductId::from("rope")).unwrap();
        assert_eq!(pending.restock_at, secs(66));

        let report = run_restock(&mut state, &registry, secs(12)).unwrap();
        assert!(report.scheduled.is_empty());
        assert_eq!(state.pending_restock(&ProductId::from("rope")), Some(pending));
    }

    #[test]
    fn full_restock_restores_baseline() {
        let registry = registry(RestockAmount::Full, true);
        let mut state = resolved(&registry);
        sell(&mut state, "rope", 10);

        run_restock(&mut state, &registry, secs(6)).unwrap();
        let report = run_restock(&mut state, &registry, secs(67)).unwrap();

        assert_eq!(report.restored, vec![(ProductId::from("rope"), Stock::Finite(10))]);
        assert!(state.pending_restocks().is_empty());
        assert!(state.within_baseline());
    }

    #[test]
    fn partial_restock_rearms_with_fresh_delay() {
        let registry = registry(RestockAmount::Units(4), true);
        let mut state = resolved(&registry);
        sell(&mut state, "rope", 10);

        run_restock(&mut state, &registry, secs(6)).unwrap();
        let report = run_restock(&mut state, &registry, secs(67)).unwrap();

        assert_eq!(state.stock_of(&ProductId::from("rope")), Some(Stock::Finite(4)));
        assert_eq!(report.scheduled, vec![ProductId::from("rope")]);
        assert_eq!(
            state.pending_restock(&ProductId::from("rope")).map(|p| p.restock_at),
            Some(secs(127))
        );
    }

    #[test]
    fn restock_never_exceeds_baseline() {
        let registry = registry(RestockAmount::Units(8), true);
        let mut state = resolved(&registry);
        sell(&mut state, "rope", 2);

        run_restock(&mut state, &registry, secs(6)).unwrap();
        run_restock(&mut state, &registry, secs(67)).unwrap();

        assert_eq!(state.stock_of(&ProductId::from("rope")), Some(Stock::Finite(10)));
        assert!(state.pending_restocks().is_empty());
    }

    #[test]
    fn non_respawning_products_stay_depleted() {
        let registry = registry(RestockAmount::Full, false);
        let mut state = resolved(&registry);
        sell(&mut state, "rope", 10);

        for t in [6, 12, 100, 1_000] {
            let report = run_restock(&mut state, &registry, secs(t)).unwrap();
            assert!(report.scheduled.is_empty());
        }
        assert_eq!(state.stock_of(&ProductId::from("rope")), Some(Stock::Finite(0)));
    }

    #[test]
    fn unlimited_products_are_never_scheduled() {
        let registry = registry(RestockAmount::Full, true);
        let mut state = resolved(&registry);
        sell(&mut state, "water", 50);

        let report = run_restock(&mut state, &registry, secs(6)).unwrap();
        assert!(report.scheduled.is_empty());
        assert_eq!(state.stock_of(&ProductId::from("water")), Some(Stock::Unlimited));
    }
}
