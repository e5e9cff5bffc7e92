//! Externally authored static data: catalog entries and sales catalogs.
//!
//! These types are loaded by an authoring pipeline outside this workspace and
//! handed to the simulation through a prototype lookup. All fields default so
//! that sparse authored entries deserialize.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{CatalogId, ItemKind, ProductId};
use crate::stock::{RestockAmount, Stock};

/// A purchasable product: what the buyer pays and what they receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Canonical product identifier (the trader's stock key).
    pub id: ProductId,
    /// Optional display name for the storefront.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional display description for the storefront.
    #[serde(default)]
    pub description: Option<String>,
    /// Payment cost: item kind to number of units taken from the buyer.
    #[serde(default)]
    pub giving_items: BTreeMap<ItemKind, u32>,
    /// Goods: item kind to number of units created for the buyer.
    #[serde(default)]
    pub taking_items: BTreeMap<ItemKind, u32>,
    /// Whether depleted stock comes back over time.
    #[serde(default)]
    pub can_respawn: bool,
    /// Delay between depletion being noticed and the restock firing.
    #[serde(default)]
    pub restock_delay_secs: u32,
    /// Units restored per firing.
    #[serde(default)]
    pub restock_amount: RestockAmount,
}

impl CatalogEntry {
    /// Create an entry with no cost, no goods, and no restocking.
    pub fn new(id: impl Into<ProductId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            giving_items: BTreeMap::new(),
            taking_items: BTreeMap::new(),
            can_respawn: false,
            restock_delay_secs: 0,
            restock_amount: RestockAmount::Full,
        }
    }

    /// Add a payment requirement.
    #[must_use]
    pub fn costing(mut self, kind: impl Into<ItemKind>, units: u32) -> Self {
        self.giving_items.insert(kind.into(), units);
        self
    }

    /// Add a granted good.
    #[must_use]
    pub fn granting(mut self, kind: impl Into<ItemKind>, units: u32) -> Self {
        self.taking_items.insert(kind.into(), units);
        self
    }

    /// Enable restocking with the given delay and amount.
    #[must_use]
    pub fn restocking(mut self, delay_secs: u32, amount: RestockAmount) -> Self {
        self.can_respawn = true;
        self.restock_delay_secs = delay_secs;
        self.restock_amount = amount;
        self
    }
}

/// One product reference inside a [`SalesCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItemRef {
    /// The referenced product.
    pub product: ProductId,
    /// Initial stock granted to a trader carrying this catalog.
    pub quantity: Stock,
}

/// A named, ordered list of product references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesCatalog {
    /// Catalog identifier referenced by traders.
    pub id: CatalogId,
    /// Product references in authored order.
    #[serde(default)]
    pub entries: Vec<CatalogItemRef>,
}

impl SalesCatalog {
    /// Create an empty catalog.
    pub fn new(id: impl Into<CatalogId>) -> Self {
        Self {
            id: id.into(),
            entries: Vec::new(),
        }
    }

    /// Append a product reference.
    #[must_use]
    pub fn with(mut self, product: impl Into<ProductId>, quantity: Stock) -> Self {
        self.entries.push(CatalogItemRef {
            product: product.into(),
            quantity,
        });
        self
    }
}
