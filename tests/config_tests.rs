// Integration tests for configuration loading and validation

mod common;

use crypto_terminal_sim::{Asset, ConfigError, SimConfig};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_config_values() {
    let config = SimConfig::default();
    assert_eq!(config.market.tick_interval_ms, 1_000);
    assert_eq!(config.market.candle_window, 150);
    assert_eq!(config.events.check_interval_ms, 45_000);
    assert_eq!(config.events.duration_ms, 8_000);
    assert_eq!(config.quests.cooldown_secs, 300);
    assert_eq!(config.idle.income_interval_ms, 100);
    assert_eq!(config.account.starting_cash, 1_000.0);
    assert_eq!(config.account.starting_holdings.get(&Asset::Doge), Some(&1_000.0));
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_file_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("terminal.toml");

    let mut config = SimConfig::default();
    config.market.tick_interval_ms = 250;
    config.account.language = "en".to_string();
    config.to_file(&config_path).expect("Failed to write config");

    let loaded = SimConfig::from_file(&config_path).expect("Failed to load config");
    assert_eq!(loaded.market.tick_interval_ms, 250);
    assert_eq!(loaded.account.language, "en");
}

#[test]
fn test_partial_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("terminal.toml");
    fs::write(&config_path, "[events]\nprobability = 0.5\n").unwrap();

    let loaded = SimConfig::from_file(&config_path).expect("Partial config should load");
    assert_eq!(loaded.events.probability, 0.5);
    assert_eq!(loaded.events.duration_ms, 8_000);
    assert_eq!(loaded.market.order_book_depth, 20);
}

#[test]
fn test_load_or_create_writes_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("terminal.toml");
    assert!(!config_path.exists());

    SimConfig::load_or_create(&config_path).expect("Should create config");
    assert!(config_path.exists());
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("tick_interval_ms"));
}

#[test]
fn test_invalid_values_are_rejected() {
    let mut config = SimConfig::default();
    config.events.probability = 1.5;
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

    let mut config = SimConfig::default();
    config.market.tick_interval_ms = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

    let mut config = SimConfig::default();
    config.market.price_floor = 0.0;
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn test_empty_backfill_is_rejected() {
    let mut config = SimConfig::default();
    config.market.backfill_points = 0;
    let err = config.validate().expect_err("empty backfill must be rejected");
    assert!(err.to_string().contains("backfill_points"));

    config.market.backfill_points = 1;
    assert!(config.validate().is_ok());
}

#[test]
fn test_malformed_file_is_a_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("terminal.toml");
    fs::write(&config_path, "[market\ntick_interval_ms = ").unwrap();
    assert!(matches!(SimConfig::from_file(&config_path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_missing_file_is_a_read_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = SimConfig::from_file(temp_dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}
