// Configuration management for the terminal simulator

use crate::core::assets::Asset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Upper bound on a market event's lifetime (one hour)
pub const MAX_EVENT_DURATION_MS: u64 = 3_600_000;
/// Upper bound on the quest cooldown (one week)
pub const MAX_COOLDOWN_SECS: u64 = 604_800;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_candle_window")]
    pub candle_window: usize,      // Max candles kept for the focused asset
    #[serde(default = "default_candle_window")]
    pub backfill_points: usize,
    #[serde(default = "default_wick_factor")]
    pub wick_factor: f64,          // High/low extension per unit of volatility
    #[serde(default = "default_price_floor")]
    pub price_floor: f64,
    #[serde(default = "default_market_trade_chance")]
    pub market_trade_chance: f64,  // Per asset, per tick
    #[serde(default = "default_market_tape_len")]
    pub market_tape_len: usize,
    #[serde(default = "default_user_tape_len")]
    pub user_tape_len: usize,
    #[serde(default = "default_book_depth")]
    pub order_book_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    #[serde(default = "default_event_interval")]
    pub check_interval_ms: u64,
    #[serde(default = "default_event_probability")]
    pub probability: f64,
    #[serde(default = "default_event_duration")]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestConfig {
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    #[serde(default = "default_cooldown_check")]
    pub cooldown_check_ms: u64,
    #[serde(default = "default_difficulty_step")]
    pub difficulty_step: f64,      // Target multiplier added per purchased asset
}

impl EventConfig {
    /// Event lifetime as a timestamp offset
    pub fn duration(&self) -> i64 {
        i64::try_from(self.duration_ms).unwrap_or(i64::MAX)
    }
}

impl QuestConfig {
    /// Quest cooldown in milliseconds
    pub fn cooldown_ms(&self) -> i64 {
        i64::try_from(self.cooldown_secs.saturating_mul(1_000)).unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleConfig {
    #[serde(default = "default_income_interval")]
    pub income_interval_ms: u64,
    #[serde(default = "default_click_value")]
    pub base_click_value: f64,
    #[serde(default = "default_ad_reward")]
    pub ad_reward_per_asset: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    #[serde(default = "default_starting_cash")]
    pub starting_cash: f64,
    #[serde(default = "default_starting_holdings")]
    pub starting_holdings: BTreeMap<Asset, f64>,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub enable_tick_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub events: EventConfig,
    #[serde(default)]
    pub quests: QuestConfig,
    #[serde(default)]
    pub idle: IdleConfig,
    #[serde(default)]
    pub account: AccountConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default value functions
fn default_tick_interval() -> u64 { 1_000 }
fn default_candle_window() -> usize { 150 }
fn default_wick_factor() -> f64 { 0.6 }
fn default_price_floor() -> f64 { 1e-7 }
fn default_market_trade_chance() -> f64 { 0.2 }
fn default_market_tape_len() -> usize { 25 }
fn default_user_tape_len() -> usize { 50 }
fn default_book_depth() -> usize { 20 }
fn default_event_interval() -> u64 { 45_000 }
fn default_event_probability() -> f64 { 0.2 }
fn default_event_duration() -> u64 { 8_000 }
fn default_cooldown_secs() -> u64 { 300 }
fn default_cooldown_check() -> u64 { 1_000 }
fn default_difficulty_step() -> f64 { 0.8 }
fn default_income_interval() -> u64 { 100 }
fn default_click_value() -> f64 { 10.0 }
fn default_ad_reward() -> f64 { 5_000.0 }
fn default_starting_cash() -> f64 { 1_000.0 }
fn default_starting_holdings() -> BTreeMap<Asset, f64> {
    BTreeMap::from([(Asset::Doge, 1_000.0)])
}
fn default_language() -> String { "ru".to_string() }
fn default_db_path() -> String { "data/terminal.db".to_string() }
fn default_snapshot_interval() -> u64 { 10_000 }
fn default_log_level() -> String { "info".to_string() }

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            candle_window: default_candle_window(),
            backfill_points: default_candle_window(),
            wick_factor: default_wick_factor(),
            price_floor: default_price_floor(),
            market_trade_chance: default_market_trade_chance(),
            market_tape_len: default_market_tape_len(),
            user_tape_len: default_user_tape_len(),
            order_book_depth: default_book_depth(),
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: default_event_interval(),
            probability: default_event_probability(),
            duration_ms: default_event_duration(),
        }
    }
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            cooldown_check_ms: default_cooldown_check(),
            difficulty_step: default_difficulty_step(),
        }
    }
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            income_interval_ms: default_income_interval(),
            base_click_value: default_click_value(),
            ad_reward_per_asset: default_ad_reward(),
        }
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            starting_cash: default_starting_cash(),
            starting_holdings: default_starting_holdings(),
            language: default_language(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            snapshot_interval_ms: default_snapshot_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            enable_tick_logging: false,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            events: EventConfig::default(),
            quests: QuestConfig::default(),
            idle: IdleConfig::default(),
            account: AccountConfig::default(),
            persistence: PersistenceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path)
            .map_err(|e| ConfigError::FileRead(format!("{}: {}", path.as_ref().display(), e)))?;

        let config: SimConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Load configuration from file, or create default if file doesn't exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Self::default();
            config.to_file(&path)?;
            info!("📁 Created default config file: {}", path.as_ref().display());
            Ok(config)
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("market.tick_interval_ms", self.market.tick_interval_ms),
            ("events.check_interval_ms", self.events.check_interval_ms),
            ("events.duration_ms", self.events.duration_ms),
            ("quests.cooldown_check_ms", self.quests.cooldown_check_ms),
            ("idle.income_interval_ms", self.idle.income_interval_ms),
            ("persistence.snapshot_interval_ms", self.persistence.snapshot_interval_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(ConfigError::Validation(format!("{} must be greater than 0", name)));
            }
        }

        if self.market.candle_window == 0 {
            return Err(ConfigError::Validation("candle_window must be greater than 0".to_string()));
        }

        if self.market.backfill_points == 0 {
            return Err(ConfigError::Validation("backfill_points must be greater than 0".to_string()));
        }

        if self.events.duration_ms > MAX_EVENT_DURATION_MS {
            return Err(ConfigError::Validation(format!(
                "events.duration_ms must not exceed {}",
                MAX_EVENT_DURATION_MS
            )));
        }

        if self.quests.cooldown_secs > MAX_COOLDOWN_SECS {
            return Err(ConfigError::Validation(format!(
                "quests.cooldown_secs must not exceed {}",
                MAX_COOLDOWN_SECS
            )));
        }

        if self.market.backfill_points > self.market.candle_window {
            return Err(ConfigError::Validation(
                "backfill_points must not exceed candle_window".to_string(),
            ));
        }

        if !(self.market.price_floor > 0.0) {
            return Err(ConfigError::Validation("price_floor must be positive".to_string()));
        }

        for (name, p) in [
            ("market.market_trade_chance", self.market.market_trade_chance),
            ("events.probability", self.events.probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Validation(format!("{} must be within [0, 1]", name)));
            }
        }

        if self.market.order_book_depth == 0 {
            return Err(ConfigError::Validation("order_book_depth must be greater than 0".to_string()));
        }

        if self.account.starting_cash < 0.0 || !self.account.starting_cash.is_finite() {
            return Err(ConfigError::Validation("starting_cash must be a non-negative number".to_string()));
        }

        if self.account.starting_holdings.values().any(|q| *q < 0.0 || !q.is_finite()) {
            return Err(ConfigError::Validation("starting_holdings must be non-negative".to_string()));
        }

        if self.idle.base_click_value < 0.0 || self.quests.difficulty_step < 0.0 {
            return Err(ConfigError::Validation(
                "base_click_value and difficulty_step must be non-negative".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to write config file: {0}")]
    FileWrite(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
