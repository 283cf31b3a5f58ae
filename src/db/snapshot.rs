//! Persisted terminal state
//!
//! Each field lives under its own key so a single corrupt value only resets
//! that field.

use super::Database;
use crate::config::SimConfig;
use crate::core::assets::Asset;
use crate::core::ledger::Ledger;
use crate::error::TerminalResult;
use crate::progression::idle::Upgrade;
use crate::progression::quests::Quest;
use crate::types::Trade;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

pub const KEY_PORTFOLIO: &str = "portfolio";
pub const KEY_UPGRADES: &str = "upgrades";
pub const KEY_QUESTS: &str = "quests";
pub const KEY_QUEST_COOLDOWN_END: &str = "quest_cooldown_end";
pub const KEY_CLICK_VALUE: &str = "click_value";
pub const KEY_PASSIVE_INCOME: &str = "passive_income";
pub const KEY_LANGUAGE: &str = "language";
pub const KEY_PURCHASED_ASSETS: &str = "purchased_assets";
pub const KEY_FAVORITES: &str = "favorites";
pub const KEY_USER_TRADES: &str = "user_trades";
pub const KEY_MARKET_PRICES: &str = "market_prices";
pub const KEY_MARKET_STATS: &str = "market_stats";
pub const KEY_SELECTED_ASSET: &str = "selected_asset";

/// Everything that survives a restart
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedState {
    pub portfolio: Ledger,
    pub upgrades: BTreeMap<Upgrade, u32>,
    /// Empty means "generate a fresh set"
    pub quests: Vec<Quest>,
    pub quest_cooldown_end: Option<i64>,
    pub click_value: f64,
    pub passive_income: f64,
    pub language: String,
    pub purchased_assets: Vec<Asset>,
    pub favorites: Vec<Asset>,
    pub user_trades: BTreeMap<Asset, Vec<Trade>>,
    /// Empty means base prices
    pub market_prices: BTreeMap<Asset, f64>,
    /// Empty means freshly seeded stats
    pub market_stats: BTreeMap<Asset, f64>,
    pub selected_asset: Asset,
}

impl PersistedState {
    /// Documented defaults for a first launch
    pub fn defaults(config: &SimConfig) -> Self {
        Self {
            portfolio: Ledger::with_holdings(config.account.starting_cash, config.account.starting_holdings.clone()),
            upgrades: Upgrade::ALL.into_iter().map(|u| (u, 0)).collect(),
            quests: Vec::new(),
            quest_cooldown_end: None,
            click_value: config.idle.base_click_value,
            passive_income: 0.0,
            language: config.account.language.clone(),
            purchased_assets: vec![Asset::Doge],
            favorites: vec![Asset::Doge],
            user_trades: BTreeMap::new(),
            market_prices: BTreeMap::new(),
            market_stats: BTreeMap::new(),
            selected_asset: Asset::Doge,
        }
    }

    /// Read every key independently. Missing keys take their default;
    /// unreadable ones are logged and take their default too.
    pub fn load(db: &Database, config: &SimConfig) -> Self {
        let defaults = Self::defaults(config);
        let state = Self {
            portfolio: read_key(db, KEY_PORTFOLIO, defaults.portfolio),
            upgrades: read_key(db, KEY_UPGRADES, defaults.upgrades),
            quests: read_key(db, KEY_QUESTS, defaults.quests),
            quest_cooldown_end: read_key(db, KEY_QUEST_COOLDOWN_END, defaults.quest_cooldown_end),
            click_value: read_key(db, KEY_CLICK_VALUE, defaults.click_value),
            passive_income: read_key(db, KEY_PASSIVE_INCOME, defaults.passive_income),
            language: read_key(db, KEY_LANGUAGE, defaults.language),
            purchased_assets: read_key(db, KEY_PURCHASED_ASSETS, defaults.purchased_assets),
            favorites: read_key(db, KEY_FAVORITES, defaults.favorites),
            user_trades: read_key(db, KEY_USER_TRADES, defaults.user_trades),
            market_prices: read_key(db, KEY_MARKET_PRICES, defaults.market_prices),
            market_stats: read_key(db, KEY_MARKET_STATS, defaults.market_stats),
            selected_asset: read_key(db, KEY_SELECTED_ASSET, defaults.selected_asset),
        };
        info!(
            "📂 Loaded terminal state: cash ${:.2}, {} assets unlocked",
            state.portfolio.cash_balance(),
            state.purchased_assets.len()
        );
        state
    }

    /// Write every key in one transaction
    pub fn save(&self, db: &Database) -> TerminalResult<()> {
        let entries = vec![
            encode(KEY_PORTFOLIO, &self.portfolio)?,
            encode(KEY_UPGRADES, &self.upgrades)?,
            encode(KEY_QUESTS, &self.quests)?,
            encode(KEY_QUEST_COOLDOWN_END, &self.quest_cooldown_end)?,
            encode(KEY_CLICK_VALUE, &self.click_value)?,
            encode(KEY_PASSIVE_INCOME, &self.passive_income)?,
            encode(KEY_LANGUAGE, &self.language)?,
            encode(KEY_PURCHASED_ASSETS, &self.purchased_assets)?,
            encode(KEY_FAVORITES, &self.favorites)?,
            encode(KEY_USER_TRADES, &self.user_trades)?,
            encode(KEY_MARKET_PRICES, &self.market_prices)?,
            encode(KEY_MARKET_STATS, &self.market_stats)?,
            encode(KEY_SELECTED_ASSET, &self.selected_asset)?,
        ];
        db.put_many(&entries)
    }
}

fn encode<T: Serialize>(key: &str, value: &T) -> TerminalResult<(String, String)> {
    Ok((key.to_string(), serde_json::to_string(value)?))
}

fn read_key<T: DeserializeOwned>(db: &Database, key: &str, default: T) -> T {
    match db.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("⚠️  Stored '{}' is unreadable ({}), using default", key, e);
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            warn!("⚠️  Could not read '{}' ({}), using default", key, e);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Database {
        let db = Database::new_in_memory().unwrap();
        db.run_migrations().unwrap();
        db
    }

    #[test]
    fn test_empty_store_yields_defaults() {
        let config = SimConfig::default();
        let state = PersistedState::load(&store(), &config);
        assert_eq!(state, PersistedState::defaults(&config));
        assert_eq!(state.portfolio.cash_balance(), 1_000.0);
        assert_eq!(state.portfolio.holding(Asset::Doge), 1_000.0);
        assert_eq!(state.language, "ru");
    }

    #[test]
    fn test_save_then_load() {
        let config = SimConfig::default();
        let db = store();
        let mut state = PersistedState::defaults(&config);
        state.language = "en".to_string();
        state.purchased_assets.push(Asset::Ltc);
        state.upgrades.insert(Upgrade::Cpu, 4);
        state.quest_cooldown_end = Some(123_456);
        state.save(&db).unwrap();

        assert_eq!(PersistedState::load(&db, &config), state);
    }

    #[test]
    fn test_corrupt_key_falls_back_alone() {
        let config = SimConfig::default();
        let db = store();
        let mut state = PersistedState::defaults(&config);
        state.language = "en".to_string();
        state.save(&db).unwrap();
        db.put(KEY_PURCHASED_ASSETS, "{not json").unwrap();

        let loaded = PersistedState::load(&db, &config);
        assert_eq!(loaded.purchased_assets, vec![Asset::Doge]);
        assert_eq!(loaded.language, "en");
    }
}
