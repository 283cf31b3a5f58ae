// Common test utilities and helpers
#![allow(dead_code)]

use crypto_terminal_sim::{
    Database, Quest, QuestKind, Session, SimConfig, StdRandom, Terminal,
};
use std::path::PathBuf;
use tempfile::TempDir;

/// Default configuration with persistence pointed at `db_path`
pub fn create_test_config(db_path: &str) -> SimConfig {
    let mut config = SimConfig::default();
    config.persistence.db_path = db_path.to_string();
    config
}

/// Create a temporary directory for test databases
pub fn create_temp_db_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("terminal.db");
    (temp_dir, db_path)
}

/// Fresh seeded terminal at t=0
pub fn seeded_terminal(seed: u64) -> Terminal {
    Terminal::new(SimConfig::default(), Box::new(StdRandom::seeded(seed)), 0)
}

/// Seeded terminal with extra cash credited through the ad bonus
pub fn funded_terminal(seed: u64, ad_bonuses: usize) -> Terminal {
    let mut terminal = seeded_terminal(seed);
    for _ in 0..ad_bonuses {
        terminal.claim_ad_bonus();
    }
    terminal
}

/// In-memory store with the schema applied
pub fn memory_store() -> Database {
    let db = Database::new_in_memory().expect("Failed to open in-memory database");
    db.run_migrations().expect("Failed to run migrations");
    db
}

/// Session backed by an on-disk database
pub fn disk_session(db_path: &PathBuf, seed: u64, now: i64) -> Session {
    let config = create_test_config(&db_path.to_string_lossy());
    let store = Database::open(db_path).expect("Failed to open database");
    Session::open(config, store, Box::new(StdRandom::seeded(seed)), now)
}

pub fn quest_of(terminal: &Terminal, kind: QuestKind) -> Quest {
    terminal
        .quests()
        .iter()
        .find(|q| q.kind == kind)
        .cloned()
        .expect("Quest kind missing from the set")
}
