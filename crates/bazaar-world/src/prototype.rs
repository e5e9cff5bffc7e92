//! Prototype lookup for authored catalog data.
//!
//! Lookups are tolerant: a missing catalog or product yields `None` and the
//! caller skips the entry.

use std::collections::BTreeMap;

use bazaar_types::{CatalogEntry, CatalogId, ProductId, SalesCatalog};

/// Read access to authored catalogs and catalog entries.
pub trait PrototypeLookup {
    /// Resolve a sales catalog by id.
    fn catalog(&self, id: &CatalogId) -> Option<&SalesCatalog>;

    /// Resolve a catalog entry by product id.
    fn product(&self, id: &ProductId) -> Option<&CatalogEntry>;
}

/// In-memory prototype store.
#[derive(Debug, Clone, Default)]
pub struct PrototypeRegistry {
    catalogs: BTreeMap<CatalogId, SalesCatalog>,
    products: BTreeMap<ProductId, CatalogEntry>,
}

impl PrototypeRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            catalogs: BTreeMap::new(),
            products: BTreeMap::new(),
        }
    }

    /// Register (or replace) a sales catalog.
    pub fn insert_catalog(&mut self, catalog: SalesCatalog) {
        self.catalogs.insert(catalog.id.clone(), catalog);
    }

    /// Register (or replace) a catalog entry.
    pub fn insert_product(&mut self, entry: CatalogEntry) {
        self.products.insert(entry.id.clone(), entry);
    }

    /// Builder-style [`insert_catalog`](Self::insert_catalog).
    #[must_use]
    pub fn with_catalog(mut self, catalog: SalesCatalog) -> Self {
        self.insert_catalog(catalog);
        self
    }

    /// Builder-style [`insert_product`](Self::insert_product).
    #[must_use]
    pub fn with_product(mut self, entry: CatalogEntry) -> Self {
        self.insert_product(entry);
        self
    }

    /// Number of registered catalog entries.
    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

impl PrototypeLookup for PrototypeRegistry {
    fn catalog(&self, id: &CatalogId) -> Option<&SalesCatalog> {
        self.catalogs.get(id)
    }

    fn product(&self, id: &ProductId) -> Option<&CatalogEntry> {
        self.products.get(id)
    }
}

#[cfg(test)]
mod tests {
    use bazaar_types::Stock;

    use super::*;

    #[test]
    fn missing_lookups_return_none() {
        let registry = PrototypeRegistry::new();
        assert!(registry.catalog(&CatalogId::from("nope")).is_none());
        assert!(registry.product(&ProductId::from("nope")).is_none());
    }

    #[test]
    fn registered_prototypes_resolve() {
        let registry = PrototypeRegistry::new()
            .with_product(CatalogEntry::new("rope").costing("coin", 2))
            .with_catalog(SalesCatalog::new("general").with("rope", Stock::Finite(4)));

        let rope = registry.product(&ProductId::from("rope"));
        assert_eq!(
            rope.and_then(|e| e.giving_items.get("coin").copied()),
            Some(2)
        );
        let general = registry.catalog(&CatalogId::from("general"));
        assert_eq!(general.map(|c| c.entries.len()), Some(1));
        assert_eq!(registry.product_count(), 1);
    }
}
