//! The buy transaction.
//!
//! A purchase either completes in full or leaves the world untouched apart
//! from one spoken line. Payment is located and earmarked first; only when
//! every unit of every price component is covered are the goods spawned.
//! Once every grant has succeeded the earmarked items are queued for
//! destruction and stock is decremented. A failed grant takes back the goods
//! already spawned and leaves the payment where it was.

use std::collections::BTreeMap;

use bazaar_types::{
    BuyRequest, CatalogEntry, EntityId, ItemKind, PurchaseId, PurchaseRecord, SimTime, Stock,
};
use bazaar_world::{
    AuditSink, ChatService, EntityLifecycle, InventoryService, ItemQuery, PrototypeLookup,
    TraderWorld,
};
use chrono::Utc;
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::error::TraderError;
use crate::payment::{self, EarmarkSet, SearchLimits};
use crate::speech::SpeechKind;
use crate::state::TraderState;

/// Collaborators a purchase needs besides the trader itself.
pub struct PurchaseContext<'a> {
    /// Entity store the payment is taken from and goods are spawned into.
    pub world: &'a mut dyn TraderWorld,
    /// Catalog entry lookup.
    pub prototypes: &'a dyn PrototypeLookup,
    /// Where completed purchases are recorded.
    pub audit: &'a mut dyn AuditSink,
    /// Source of randomness for speech selection.
    pub rng: &'a mut dyn RngCore,
    /// Payment search bounds.
    pub limits: SearchLimits,
    /// Current simulated time.
    pub now: SimTime,
}

/// Why a request was dropped without any reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// No trader state exists for the addressed entity.
    UnknownTrader,
    /// The trader does not stock the product.
    UnknownProduct,
    /// The buyer entity does not exist.
    UnknownBuyer,
    /// The product is stocked but its catalog entry is gone.
    MissingPrototype,
    /// A world collaborator failed while the purchase was applied; nothing
    /// was taken from the buyer.
    WorldFault,
}

/// Details of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    /// Audit record id.
    pub purchase_id: PurchaseId,
    /// Items taken as payment.
    pub consumed: Vec<EntityId>,
    /// Goods handed to the buyer.
    pub granted: BTreeMap<ItemKind, u32>,
    /// Stock left after the sale.
    pub remaining: Stock,
}

/// Result of one buy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// Payment taken, goods granted.
    Completed(PurchaseReceipt),
    /// The product is sold out.
    OutOfStock,
    /// The buyer could not cover the price.
    InsufficientPayment,
    /// The request was ignored.
    Dropped(DropReason),
}

impl PurchaseOutcome {
    /// Whether the purchase went through.
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Process one buy request against `trader`.
pub fn attempt_buy(
    trader: &mut TraderState,
    request: &BuyRequest,
    ctx: &mut PurchaseContext<'_>,
) -> Result<PurchaseOutcome, TraderError> {
    let product = &request.product_id;
    let buyer = request.buyer;

    let Some(stock) = trader.stock_of(product) else {
        debug!(trader = %trader.entity(), product = %product, "Buy request for unstocked product dropped");
        return Ok(PurchaseOutcome::Dropped(DropReason::UnknownProduct));
    };
    if !ctx.world.exists(buyer) {
        debug!(trader = %trader.entity(), %buyer, "Buy request from unknown buyer dropped");
        return Ok(PurchaseOutcome::Dropped(DropReason::UnknownBuyer));
    }
    if stock.is_exhausted() {
        speak(trader, ctx, SpeechKind::NoStock);
        return Ok(PurchaseOutcome::OutOfStock);
    }

    let prototypes = ctx.prototypes;
    let Some(entry) = prototypes.product(product) else {
        warn!(trader = %trader.entity(), product = %product, "Stocked product has no catalog entry");
        return Ok(PurchaseOutcome::Dropped(DropReason::MissingPrototype));
    };

    let mut earmarks = EarmarkSet::new();
    if !cover_price(&*ctx.world, trader.entity(), buyer, entry, &mut earmarks, ctx.limits) {
        speak(trader, ctx, SpeechKind::InsufficientPayment);
        return Ok(PurchaseOutcome::InsufficientPayment);
    }

    let granted = grant_goods(&mut *ctx.world, buyer, entry)?;

    let consumed = earmarks.into_vec();
    for item in &consumed {
        ctx.world.queue_destroy(*item);
    }

    let remaining = trader.consume_one(product).unwrap_or(stock);
    speak(trader, ctx, SpeechKind::ThankYou);

    let purchase_id = PurchaseId::new();
    ctx.audit.record(PurchaseRecord {
        id: purchase_id,
        trader: trader.entity(),
        buyer,
        product_id: product.clone(),
        consumed: consumed.clone(),
        granted: granted.clone(),
        at: ctx.now,
        recorded_at: Utc::now(),
    });

    info!(
        trader = %trader.entity(),
        %buyer,
        product = %product,
        paid_items = consumed.len(),
        remaining = %remaining,
        "Purchase completed"
    );

    Ok(PurchaseOutcome::Completed(PurchaseReceipt {
        purchase_id,
        consumed,
        granted,
        remaining,
    }))
}

/// Earmark one item per unit of every price component.
fn cover_price(
    world: &dyn TraderWorld,
    trader: EntityId,
    buyer: EntityId,
    entry: &CatalogEntry,
    earmarks: &mut EarmarkSet,
    limits: SearchLimits,
) -> bool {
    for (kind, &units) in &entry.giving_items {
        for _ in 0..units {
            if !payment::locate(world, trader, kind, buyer, earmarks, limits) {
                debug!(%buyer, kind = %kind, units, found = earmarks.len(), "Payment short");
                return false;
            }
        }
    }
    true
}

/// Spawn every granted kind on the buyer. On failure the goods spawned so
/// far are queued for destruction before the error is returned.
fn grant_goods(
    world: &mut dyn TraderWorld,
    buyer: EntityId,
    entry: &CatalogEntry,
) -> Result<BTreeMap<ItemKind, u32>, TraderError> {
    let mut spawned = Vec::new();
    let mut granted = BTreeMap::new();
    for (kind, &units) in &entry.taking_items {
        if units == 0 {
            continue;
        }
        match world.spawn_on(buyer, kind, units) {
            Ok(items) => {
                spawned.extend(items);
                granted.insert(kind.clone(), units);
            }
            Err(source) => {
                warn!(
                    %buyer,
                    kind = %kind,
                    rolled_back = spawned.len(),
                    error = %source,
                    "Grant failed; spawned goods taken back"
                );
                for item in spawned {
                    world.queue_destroy(item);
                }
                return Err(source.into());
            }
        }
    }
    Ok(granted)
}

fn speak(trader: &TraderState, ctx: &mut PurchaseContext<'_>, kind: SpeechKind) {
    if let Some(phrase) = trader.speech().pick(kind, &mut *ctx.rng) {
        ctx.world.say(trader.entity(), phrase);
    }
}
