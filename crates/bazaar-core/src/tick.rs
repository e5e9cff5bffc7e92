//! Tick cycle: the phase loop that drives every trader in the market.
//!
//! Each tick runs through these phases:
//!
//! 1. **Clock** -- advance the tick counter and simulated time.
//! 2. **Restock** -- run the restock scheduler of every trader.
//! 3. **Purchases** -- drain the request queue and resolve each buy request
//!    against its trader. Restocks from phase 2 are visible here.
//! 4. **Flush** -- the world destroys everything queued during the tick.
//! 5. **Publish** -- emit a [`CatalogUpdate`] for every trader whose stock
//!    changed.
//!
//! The tick is deterministic given the same initial state, request order,
//! and RNG seed. A failure inside one trader is logged and contained: the
//! request is recorded as dropped and every other trader keeps running. Only
//! the clock can abort a tick.

use std::collections::BTreeMap;

use bazaar_trader::{
    DropReason, PurchaseContext, PurchaseOutcome, ResolveReport, RestockReport, TraderConfig,
    TraderError, TraderState, attempt_buy, resolve_catalog, run_restock,
};
use bazaar_types::{BuyRequest, CatalogUpdate, EntityId, SimTime};
use bazaar_world::{AuditLog, PrototypeRegistry, SimWorld};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::clock::{ClockError, SimClock};
use crate::queue::RequestQueue;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// Registering a trader failed.
    #[error("trader {trader} failed: {source}")]
    Trader {
        /// The trader that failed.
        trader: EntityId,
        /// The underlying trader error.
        source: TraderError,
    },

    /// A trader was registered twice.
    #[error("trader {trader} is already registered")]
    DuplicateTrader {
        /// The entity that was already present.
        trader: EntityId,
    },
}

/// One resolved buy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseResult {
    /// The request as received.
    pub request: BuyRequest,
    /// What happened.
    pub outcome: PurchaseOutcome,
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Simulated time of this tick.
    pub now: SimTime,
    /// Restock reports of the traders whose interval elapsed.
    pub restocks: BTreeMap<EntityId, RestockReport>,
    /// Buy requests resolved this tick, in arrival order.
    pub purchases: Vec<PurchaseResult>,
    /// Storefront refreshes for traders whose stock changed.
    pub catalog_updates: Vec<CatalogUpdate>,
    /// Number of entities destroyed at the end of the tick.
    pub destroyed: usize,
}

impl TickSummary {
    /// Number of purchases that completed.
    pub fn completed_purchases(&self) -> usize {
        self.purchases
            .iter()
            .filter(|p| p.outcome.is_completed())
            .count()
    }
}

/// The mutable market state passed through the tick cycle.
#[derive(Debug)]
pub struct MarketState {
    /// The simulation clock.
    pub clock: SimClock,
    /// Entity store.
    pub world: SimWorld,
    /// Authored catalogs and products.
    pub prototypes: PrototypeRegistry,
    /// Trader state by trader entity.
    pub traders: BTreeMap<EntityId, TraderState>,
    /// Purchase audit trail.
    pub audit: AuditLog,
    /// Parameters shared by every trader.
    pub trader_config: TraderConfig,
    /// Speech selection RNG.
    pub rng: StdRng,
}

impl MarketState {
    /// Create an empty market.
    pub fn new(
        clock: SimClock,
        world: SimWorld,
        prototypes: PrototypeRegistry,
        trader_config: TraderConfig,
        seed: u64,
    ) -> Self {
        Self {
            clock,
            world,
            prototypes,
            traders: BTreeMap::new(),
            audit: AuditLog::new(),
            trader_config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Register a trader and resolve its catalog at the current time.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::DuplicateTrader`] if a trader for the same
    /// entity exists, or [`TickError::Trader`] if resolution fails.
    pub fn add_trader(&mut self, mut trader: TraderState) -> Result<ResolveReport, TickError> {
        let entity = trader.entity();
        if self.traders.contains_key(&entity) {
            return Err(TickError::DuplicateTrader { trader: entity });
        }
        let report = resolve_catalog(&mut trader, &self.prototypes, self.clock.now())
            .map_err(|source| TickError::Trader {
                trader: entity,
                source,
            })?;
        self.traders.insert(entity, trader);
        Ok(report)
    }

    /// Look up a trader.
    pub fn trader(&self, entity: EntityId) -> Option<&TraderState> {
        self.traders.get(&entity)
    }
}

/// Execute one complete tick of the market.
pub fn run_tick(
    state: &mut MarketState,
    requests: &mut RequestQueue,
) -> Result<TickSummary, TickError> {
    // --- Phase 1: Clock ---
    let tick = state.clock.advance()?;
    let now = state.clock.now();

    // --- Phase 2: Restock ---
    let restocks = phase_restock(state, now);

    // --- Phase 3: Purchases ---
    let purchases = phase_purchases(state, requests, now);

    // --- Phase 4: Flush ---
    let destroyed = state.world.flush_destroyed().len();

    // --- Phase 5: Publish ---
    let catalog_updates: Vec<CatalogUpdate> = state
        .traders
        .values_mut()
        .filter_map(|trader| {
            trader.take_dirty().then(|| CatalogUpdate {
                tick,
                view: trader.storefront(&state.prototypes),
            })
        })
        .collect();

    let summary = TickSummary {
        tick,
        now,
        restocks,
        purchases,
        catalog_updates,
        destroyed,
    };
    debug!(
        tick,
        now = %now,
        purchases = summary.purchases.len(),
        completed = summary.completed_purchases(),
        updates = summary.catalog_updates.len(),
        destroyed,
        "Tick complete"
    );
    Ok(summary)
}

fn phase_restock(state: &mut MarketState, now: SimTime) -> BTreeMap<EntityId, RestockReport> {
    let mut reports = BTreeMap::new();
    for (entity, trader) in &mut state.traders {
        match run_restock(trader, &state.prototypes, now) {
            Ok(report) if report.ticked => {
                reports.insert(*entity, report);
            }
            Ok(_) => {}
            Err(e) => warn!(trader = %entity, error = %e, "Restock failed; trader skipped this tick"),
        }
    }
    reports
}

fn phase_purchases(
    state: &mut MarketState,
    requests: &mut RequestQueue,
    now: SimTime,
) -> Vec<PurchaseResult> {
    let limits = state.trader_config.search_limits();
    let mut results = Vec::new();

    for request in requests.drain() {
        let Some(trader) = state.traders.get_mut(&request.trader) else {
            debug!(trader = %request.trader, "Buy request for unknown trader dropped");
            results.push(PurchaseResult {
                request,
                outcome: PurchaseOutcome::Dropped(DropReason::UnknownTrader),
            });
            continue;
        };

        let mut ctx = PurchaseContext {
            world: &mut state.world,
            prototypes: &state.prototypes,
            audit: &mut state.audit,
            rng: &mut state.rng,
            limits,
            now,
        };
        let outcome = attempt_buy(trader, &request, &mut ctx).unwrap_or_else(|e| {
            warn!(
                trader = %request.trader,
                buyer = %request.buyer,
                product = %request.product_id,
                error = %e,
                "Buy request failed; dropped"
            );
            PurchaseOutcome::Dropped(DropReason::WorldFault)
        });
        results.push(PurchaseResult { request, outcome });
    }
    results
}
