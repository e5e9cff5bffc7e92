//! Request, record, and view structs exchanged with the outside world.
//!
//! - [`BuyRequest`] is the only inbound message.
//! - [`PurchaseRecord`] is written to the audit sink after a completed sale.
//! - [`StorefrontView`] / [`CatalogUpdate`] are pushed to the presentation
//!   layer whenever a trader's stock table changed during a tick.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{EntityId, ItemKind, ProductId, PurchaseId};
use crate::time::SimTime;

/// A buyer pressed "buy" on a trader's storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BuyRequest {
    /// The trader entity whose storefront was used.
    pub trader: EntityId,
    /// The entity paying and receiving goods.
    pub buyer: EntityId,
    /// The product being bought.
    pub product_id: ProductId,
}

/// Ammunition-cartridge state of an item.
///
/// A spent cartridge is an empty casing: it still has the item kind of a
/// live round but cannot be used as payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cartridge {
    /// Whether the round has already been fired.
    pub spent: bool,
}

/// Audit record of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PurchaseRecord {
    /// Unique purchase identifier.
    pub id: PurchaseId,
    /// The selling trader.
    pub trader: EntityId,
    /// The buying entity.
    pub buyer: EntityId,
    /// The product that was bought.
    pub product_id: ProductId,
    /// Payment entities queued for destruction.
    pub consumed: Vec<EntityId>,
    /// Goods spawned on the buyer, by item kind.
    pub granted: BTreeMap<ItemKind, u32>,
    /// Simulated time of the sale.
    pub at: SimTime,
    /// Real-world timestamp when the record was created.
    pub recorded_at: DateTime<Utc>,
}

/// One row of a trader's storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StorefrontEntry {
    /// Product identifier to send back in a [`BuyRequest`].
    pub product_id: ProductId,
    /// Display name, when authored.
    pub name: Option<String>,
    /// Display description, when authored.
    pub description: Option<String>,
    /// What the buyer pays.
    pub price: BTreeMap<ItemKind, u32>,
    /// What the buyer receives.
    pub goods: BTreeMap<ItemKind, u32>,
    /// Current stock; `-1` means unlimited.
    pub stock: i64,
}

/// Everything the presentation layer needs to draw a storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StorefrontView {
    /// The trader entity.
    pub trader: EntityId,
    /// Rows in product-id order.
    pub entries: Vec<StorefrontEntry>,
}

/// Outbound notification that a trader's stock changed this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CatalogUpdate {
    /// Tick on which the change was observed.
    pub tick: u64,
    /// The refreshed storefront.
    pub view: StorefrontView,
}
