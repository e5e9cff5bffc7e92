//! Type-safe identifiers.
//!
//! Two families of identifiers exist in the merchant simulation:
//!
//! - **Entity ids** ([`EntityId`], [`PurchaseId`]) wrap a [`Uuid`] and name a
//!   concrete instance: a trader, a buyer, a single coin lying on the floor.
//! - **Prototype keys** ([`ProductId`], [`CatalogId`], [`ItemKind`],
//!   [`PhraseKey`]) wrap a `String` and name externally authored static data.
//!   Many entities share the same [`ItemKind`].
//!
//! Keeping them as distinct newtypes stops a product id from being used where
//! an item kind is expected, which is easy to get wrong because catalog
//! entries and entity prototypes are both keyed by plain strings in authored
//! data.

use core::borrow::Borrow;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Generates a newtype wrapper around `String` for prototype keys.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create a key from anything convertible into a `String`.
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for any entity in the world: traders, buyers,
    /// containers and individual items.
    EntityId
}

define_id! {
    /// Unique identifier for a completed purchase in the audit log.
    PurchaseId
}

define_key! {
    /// Identifier of a catalog entry (the key of a trader's stock table).
    ProductId
}

define_key! {
    /// Identifier of a sales catalog: a named list of product references.
    CatalogId
}

define_key! {
    /// Identifier for a category of item (an entity prototype), not a
    /// specific instance.
    ItemKind
}

define_key! {
    /// Localizable phrase key spoken by a trader. Resolution to display
    /// text happens outside this workspace.
    PhraseKey
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn entity_ids_are_unique() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
        assert_ne!(a.into_inner(), Uuid::nil());
    }

    #[test]
    fn entity_id_display_matches_uuid() {
        let id = EntityId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }

    #[test]
    fn keys_serialize_as_plain_strings() {
        let json = serde_json::to_string(&ProductId::new("widget")).ok();
        assert_eq!(json.as_deref(), Some("\"widget\""));
        let restored: Result<ItemKind, _> = serde_json::from_str("\"coin\"");
        assert_eq!(restored.ok(), Some(ItemKind::from("coin")));
    }

    #[test]
    fn keyed_maps_accept_str_lookups() {
        let mut stock = BTreeMap::new();
        stock.insert(ProductId::from("widget"), 3_u32);
        assert_eq!(stock.get("widget").copied(), Some(3));
        assert_eq!(stock.get("gizmo"), None);
    }
}
