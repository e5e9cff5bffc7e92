//! Demo market assembled in code.
//!
//! Two stalls share a general catalog; the second also sells from an
//! armoury catalog that takes shotgun shells as payment. Shoppers stand next
//! to their stall with a wallet of coins, and a few carry cartridges (some
//! of them spent).

use bazaar_core::{MarketState, SimClock, SimulationConfig};
use bazaar_trader::{SpeechLines, TraderState};
use bazaar_types::{
    CatalogEntry, CatalogId, EntityId, PhraseKey, RestockAmount, SalesCatalog, Stock,
};
use bazaar_world::{Position, PrototypeRegistry, SimWorld};
use tracing::info;

use crate::error::EngineError;

/// A shopper and the stall they visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shopper {
    /// Buyer entity.
    pub buyer: EntityId,
    /// Trader entity the buyer stands next to.
    pub trader: EntityId,
}

/// A ready-to-run market plus the actors populating it.
#[derive(Debug)]
pub struct DemoMarket {
    /// Market state with every trader registered.
    pub state: MarketState,
    /// Shoppers, one entry per buyer.
    pub shoppers: Vec<Shopper>,
}

/// Authored products and catalogs of the demo.
pub fn demo_prototypes() -> PrototypeRegistry {
    let mut lantern = CatalogEntry::new("lantern")
        .costing("coin", 3)
        .granting("lantern", 1)
        .restocking(30, RestockAmount::Units(1));
    lantern.name = Some("Storm lantern".to_owned());

    let mut rope = CatalogEntry::new("rope")
        .costing("coin", 1)
        .granting("rope", 1)
        .restocking(20, RestockAmount::Full);
    rope.name = Some("Hemp rope".to_owned());

    let mut water = CatalogEntry::new("water").costing("coin", 1).granting("waterskin", 1);
    water.description = Some("Never runs dry.".to_owned());

    let flare = CatalogEntry::new("flare")
        .costing("shell", 2)
        .granting("flare", 1);

    PrototypeRegistry::new()
        .with_product(lantern)
        .with_product(rope)
        .with_product(water)
        .with_product(flare)
        .with_catalog(
            SalesCatalog::new("general")
                .with("lantern", Stock::Finite(4))
                .with("rope", Stock::Finite(6))
                .with("water", Stock::Unlimited),
        )
        .with_catalog(
            SalesCatalog::new("armoury")
                .with("flare", Stock::Finite(3))
                .with("rope", Stock::Finite(2)),
        )
}

fn stall_speech() -> Result<SpeechLines, EngineError> {
    let keys = |raw: &[&str]| raw.iter().map(|k| PhraseKey::from(*k)).collect::<Vec<_>>();
    Ok(SpeechLines::new(
        keys(&["trader-out-of-stock", "trader-come-back-later"]),
        keys(&["trader-insufficient-payment", "trader-no-credit"]),
        keys(&["trader-thank-you", "trader-come-again", "trader-pleasure"]),
    )?)
}

/// Build the demo market from configuration.
pub fn build_demo_market(config: &SimulationConfig) -> Result<DemoMarket, EngineError> {
    let clock = SimClock::new(config.world.tick_interval())?;
    let trader_config = config.trader.to_trader_config();
    let mut world = SimWorld::new();

    let stalls = [
        ("general-store", Position::new(0.0, 0.0), vec![CatalogId::from("general")]),
        (
            "quartermaster",
            Position::new(12.0, 0.0),
            vec![CatalogId::from("armoury"), CatalogId::from("general")],
        ),
    ];

    let mut traders = Vec::new();
    let mut shoppers = Vec::new();
    for (kind, position, catalogs) in stalls {
        let trader = world.spawn_actor(kind, position, 0);
        traders.push(TraderState::new(trader, catalogs, stall_speech()?, &trader_config));

        for (offset, coins) in [(0.3_f32, 8_usize), (-0.4, 3), (0.6, 0)] {
            let buyer = world.spawn_actor(
                "shopper",
                Position::new(position.x + offset, position.y),
                2,
            );
            give_wallet(&mut world, buyer, coins)?;
            shoppers.push(Shopper { buyer, trader });
        }
    }

    // One quartermaster shopper carries a bandolier with a spent shell.
    if let Some(armed) = shoppers.get(3).copied() {
        let bandolier = world.spawn_container("bandolier", Position::default());
        for spent in [true, false, false] {
            let shell = world.spawn_cartridge("shell", Position::default(), spent);
            world.insert_into(bandolier, shell)?;
        }
        world.equip(armed.buyer, "chest", bandolier)?;
    }

    // Loose change on the general store's counter.
    for x in [0.2_f32, 0.5] {
        world.spawn("coin", Position::new(x, 0.2));
    }

    let mut state = MarketState::new(
        clock,
        world,
        demo_prototypes(),
        trader_config,
        config.world.seed,
    );
    for trader in traders {
        let entity = trader.entity();
        let report = state.add_trader(trader)?;
        info!(
            trader = %entity,
            products = report.inserted.len(),
            duplicates = report.duplicates.len(),
            "Trader opened"
        );
    }

    Ok(DemoMarket { state, shoppers })
}

fn give_wallet(world: &mut SimWorld, buyer: EntityId, coins: usize) -> Result<(), EngineError> {
    if coins == 0 {
        return Ok(());
    }
    let wallet = world.spawn_container("wallet", Position::default());
    for _ in 0..coins {
        let coin = world.spawn("coin", Position::default());
        world.insert_into(wallet, coin)?;
    }
    world.equip(buyer, "belt", wallet)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_types::ProductId;

    use super::*;

    #[test]
    fn demo_market_opens_both_stalls() {
        let market = build_demo_market(&SimulationConfig::default()).unwrap();
        assert_eq!(market.state.traders.len(), 2);
        assert_eq!(market.shoppers.len(), 6);

        let quartermaster = market.shoppers.get(3).unwrap().trader;
        let stall = market.state.trader(quartermaster).unwrap();
        // Armoury is listed first, so its rope quantity wins.
        assert_eq!(stall.stock_of(&ProductId::from("rope")), Some(Stock::Finite(2)));
        assert_eq!(stall.stock_of(&ProductId::from("water")), Some(Stock::Unlimited));
        assert!(stall.is_initialized());
    }
}
