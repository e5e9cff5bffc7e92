//! Scripted shoppers and storefront publishing.
//!
//! After each tick the callback publishes every catalog update as a JSON
//! payload on the `storefront` tracing target, logs how each buy request
//! ended, and then queues new buy requests for the next tick.

use bazaar_core::{MarketState, RequestSender, TickCallback, TickSummary};
use bazaar_types::{BuyRequest, ProductId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::demo::Shopper;

/// Chance (percent) that a given shopper places an order on a tick.
const ORDER_CHANCE_PERCENT: u32 = 25;

/// Tick callback that drives the demo shoppers.
pub struct ShopperCallback {
    sender: RequestSender,
    shoppers: Vec<Shopper>,
    rng: StdRng,
}

impl ShopperCallback {
    /// Create a callback submitting requests through `sender`.
    pub fn new(sender: RequestSender, shoppers: Vec<Shopper>, seed: u64) -> Self {
        Self {
            sender,
            shoppers,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn publish(summary: &TickSummary) {
        for update in &summary.catalog_updates {
            match serde_json::to_string(&update.view) {
                Ok(payload) => info!(
                    target: "storefront",
                    tick = update.tick,
                    trader = %update.view.trader,
                    payload = %payload,
                    "Catalog update"
                ),
                Err(e) => warn!(error = %e, "failed to serialize storefront view"),
            }
        }
        for purchase in &summary.purchases {
            debug!(
                tick = summary.tick,
                buyer = %purchase.request.buyer,
                product = %purchase.request.product_id,
                outcome = ?purchase.outcome,
                "Buy request resolved"
            );
        }
    }

    fn pick_product(&mut self, state: &MarketState, shopper: Shopper) -> Option<ProductId> {
        let stock = state.trader(shopper.trader)?.stock();
        if stock.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..stock.len());
        stock.keys().nth(index).cloned()
    }
}

impl TickCallback for ShopperCallback {
    fn on_tick(&mut self, summary: &TickSummary, state: &MarketState) {
        Self::publish(summary);

        for shopper in self.shoppers.clone() {
            if self.rng.random_range(0..100) >= ORDER_CHANCE_PERCENT {
                continue;
            }
            let Some(product_id) = self.pick_product(state, shopper) else {
                continue;
            };
            let request = BuyRequest {
                trader: shopper.trader,
                buyer: shopper.buyer,
                product_id,
            };
            if let Err(e) = self.sender.send(request) {
                warn!(error = %e, "failed to queue buy request");
                return;
            }
        }
    }
}
