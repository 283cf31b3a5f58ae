// Asset registry
// Static per-asset configuration shared by every engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TerminalError;

/// The nine tradeable symbols, ordered by unlock cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Doge,
    Ltc,
    Ada,
    Xrp,
    Dot,
    Sol,
    Bnb,
    Eth,
    Btc,
}

/// Immutable market parameters for one asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetSpec {
    pub base_price: f64,
    pub volatility: f64,
    pub unlock_cost: f64,
    pub name: &'static str,
    /// Multiplier applied to synthetic order sizes (books and tapes)
    pub lot_scale: f64,
}

impl Asset {
    pub const ALL: [Asset; 9] = [
        Asset::Doge,
        Asset::Ltc,
        Asset::Ada,
        Asset::Xrp,
        Asset::Dot,
        Asset::Sol,
        Asset::Bnb,
        Asset::Eth,
        Asset::Btc,
    ];

    pub fn spec(self) -> AssetSpec {
        match self {
            Asset::Doge => AssetSpec { base_price: 0.4285, volatility: 0.005, unlock_cost: 0.0, name: "Dogecoin", lot_scale: 100.0 },
            Asset::Ltc => AssetSpec { base_price: 124.50, volatility: 0.8, unlock_cost: 5_000.0, name: "Litecoin", lot_scale: 1.0 },
            Asset::Ada => AssetSpec { base_price: 1.1501, volatility: 0.02, unlock_cost: 25_000.0, name: "Cardano", lot_scale: 100.0 },
            Asset::Xrp => AssetSpec { base_price: 2.6842, volatility: 0.05, unlock_cost: 75_000.0, name: "Ripple", lot_scale: 100.0 },
            Asset::Dot => AssetSpec { base_price: 84.20, volatility: 1.2, unlock_cost: 200_000.0, name: "Polkadot", lot_scale: 1.0 },
            Asset::Sol => AssetSpec { base_price: 342.88, volatility: 4.5, unlock_cost: 500_000.0, name: "Solana", lot_scale: 1.0 },
            Asset::Bnb => AssetSpec { base_price: 1458.45, volatility: 15.0, unlock_cost: 1_500_000.0, name: "Binance Coin", lot_scale: 0.1 },
            Asset::Eth => AssetSpec { base_price: 4826.92, volatility: 50.0, unlock_cost: 5_000_000.0, name: "Ethereum", lot_scale: 0.1 },
            Asset::Btc => AssetSpec { base_price: 98580.61, volatility: 1000.0, unlock_cost: 20_000_000.0, name: "Bitcoin", lot_scale: 0.01 },
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Asset::Doge => "DOGE",
            Asset::Ltc => "LTC",
            Asset::Ada => "ADA",
            Asset::Xrp => "XRP",
            Asset::Dot => "DOT",
            Asset::Sol => "SOL",
            Asset::Bnb => "BNB",
            Asset::Eth => "ETH",
            Asset::Btc => "BTC",
        }
    }

    /// Largest amount a synthetic tape trade can carry
    pub fn max_tape_amount(self) -> f64 {
        match self {
            Asset::Btc => 0.005,
            _ => 50.0,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Asset {
    type Err = TerminalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Asset::ALL
            .into_iter()
            .find(|asset| asset.symbol() == upper)
            .ok_or_else(|| TerminalError::UnknownAsset(s.to_string()))
    }
}
