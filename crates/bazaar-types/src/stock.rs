//! Stock quantities and restock amounts.
//!
//! Authored trader data uses `-1` as a sentinel in two places: a stock of `-1`
//! means the product never runs out, and a restock amount of `-1` means
//! "restore to the baseline in one go". Both are modelled as enums here and
//! only collapse back to the sentinel on the wire.

use serde::{Deserialize, Serialize};

/// Wire sentinel shared by [`Stock::Unlimited`] and [`RestockAmount::Full`].
pub const SENTINEL: i64 = -1;

/// Purchasable quantity of one product at one trader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Stock {
    /// Never depletes; purchases leave it unchanged.
    Unlimited,
    /// A finite number of units left.
    Finite(u32),
}

impl Stock {
    /// The finite quantity, or `None` when unlimited.
    pub const fn finite(self) -> Option<u32> {
        match self {
            Self::Unlimited => None,
            Self::Finite(n) => Some(n),
        }
    }

    /// Whether a finite stock has reached zero.
    pub const fn is_exhausted(self) -> bool {
        matches!(self, Self::Finite(0))
    }

    /// Signed wire representation (`-1` for unlimited).
    pub fn as_sentinel(self) -> i64 {
        i64::from(self)
    }
}

impl From<Stock> for i64 {
    fn from(stock: Stock) -> Self {
        match stock {
            Stock::Unlimited => SENTINEL,
            Stock::Finite(n) => Self::from(n),
        }
    }
}

impl TryFrom<i64> for Stock {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        if raw == SENTINEL {
            return Ok(Self::Unlimited);
        }
        u32::try_from(raw)
            .map(Self::Finite)
            .map_err(|_err| format!("stock must be -1 or a non-negative u32, got {raw}"))
    }
}

impl core::fmt::Display for Stock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unlimited => f.write_str("unlimited"),
            Self::Finite(n) => write!(f, "{n}"),
        }
    }
}

/// How much a single restock firing restores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum RestockAmount {
    /// Snap straight back to the baseline.
    #[default]
    Full,
    /// Add this many units, never exceeding the baseline.
    Units(u32),
}

impl From<RestockAmount> for i64 {
    fn from(amount: RestockAmount) -> Self {
        match amount {
            RestockAmount::Full => SENTINEL,
            RestockAmount::Units(n) => Self::from(n),
        }
    }
}

impl TryFrom<i64> for RestockAmount {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        if raw == SENTINEL {
            return Ok(Self::Full);
        }
        u32::try_from(raw)
            .map(Self::Units)
            .map_err(|_err| format!("restock amount must be -1 or a non-negative u32, got {raw}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_parses_as_unlimited() {
        let stock: Result<Stock, _> = serde_json::from_str("-1");
        assert_eq!(stock.ok(), Some(Stock::Unlimited));
    }

    #[test]
    fn finite_stock_roundtrips_as_integer() {
        let json = serde_json::to_string(&Stock::Finite(7)).ok();
        assert_eq!(json.as_deref(), Some("7"));
        assert_eq!(Stock::Unlimited.as_sentinel(), -1);
    }

    #[test]
    fn negative_stock_other_than_sentinel_is_rejected() {
        let stock: Result<Stock, _> = serde_json::from_str("-3");
        assert!(stock.is_err());
    }

    #[test]
    fn restock_amount_defaults_to_full() {
        assert_eq!(RestockAmount::default(), RestockAmount::Full);
        let amount: Result<RestockAmount, _> = serde_json::from_str("2");
        assert_eq!(amount.ok(), Some(RestockAmount::Units(2)));
    }

    #[test]
    fn exhausted_only_for_finite_zero() {
        assert!(Stock::Finite(0).is_exhausted());
        assert!(!Stock::Finite(1).is_exhausted());
        assert!(!Stock::Unlimited.is_exhausted());
    }
}
