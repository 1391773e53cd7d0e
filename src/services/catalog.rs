// src/services/catalog.rs

use serde::{Deserialize, Serialize};

/// Static catalog entry. Immutable for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub name: String,
    pub icon: String,
    pub initial_quantity: f64,
    pub base_price: f64,
    /// Fractional daily std-dev proxy, e.g. 0.02 = 2 %
    pub volatility: f64,
}

/// Read-only asset catalog, built once at start-up and shared via `.data()`.
#[derive(Debug, Clone)]
pub struct Catalog {
    assets: Vec<Asset>,
}

fn asset(
    symbol: &str,
    name: &str,
    icon: &str,
    initial_quantity: f64,
    base_price: f64,
    volatility: f64,
) -> Asset {
    Asset {
        symbol: symbol.into(),
        name: name.into(),
        icon: icon.into(),
        initial_quantity,
        base_price,
        volatility,
    }
}

impl Catalog {
    /// The six simulated assets every market view is built from.
    pub fn standard() -> Self {
        Self {
            assets: vec![
                asset("BTC", "Bitcoin", "₿", 2.5, 94_250.0, 0.02),
                asset("ETH", "Ethereum", "Ξ", 10.25, 6_015.0, 0.025),
                asset("BNB", "Binance Coin", "BNB", 5.0, 2_780.0, 0.03),
                asset("ADA", "Cardano", "ADA", 500.0, 4.00, 0.04),
                asset("SOL", "Solana", "SOL", 25.5, 145.0, 0.035),
                asset("DOT", "Polkadot", "DOT", 100.0, 69.0, 0.04),
            ],
        }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Case-insensitive lookup; catalog symbols are stored uppercase.
    pub fn get(&self, symbol: &str) -> Option<&Asset> {
        let wanted = symbol.to_ascii_uppercase();
        self.assets.iter().find(|a| a.symbol == wanted)
    }
}

// ======================================================================
// UNIT TESTS
// ======================================================================
