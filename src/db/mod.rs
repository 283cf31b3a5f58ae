//! Database module for the SQLite-backed terminal snapshot store

use crate::error::{TerminalError, TerminalResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

pub mod snapshot;

pub use snapshot::PersistedState;

/// Key/value store over a single shared connection
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) a database file; parent directories are created
    pub fn new<P: AsRef<Path>>(path: P) -> TerminalResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> TerminalResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open and migrate in one step
    pub fn open<P: AsRef<Path>>(path: P) -> TerminalResult<Self> {
        let db = Self::new(path)?;
        db.run_migrations()?;
        Ok(db)
    }

    fn lock(&self) -> TerminalResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| TerminalError::Persistence("database connection lock poisoned".to_string()))
    }

    /// Run migrations to set up or update the schema
    pub fn run_migrations(&self) -> TerminalResult<()> {
        let conn = self.lock()?;
        let migration_sql = include_str!("migrations/V1__initial_schema.sql");
        conn.execute_batch(migration_sql)?;
        Ok(())
    }

    /// Raw JSON text stored under `key`
    pub fn get(&self, key: &str) -> TerminalResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row("SELECT value FROM terminal_state WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn put(&self, key: &str, value: &str) -> TerminalResult<()> {
        self.put_many(&[(key.to_string(), value.to_string())])
    }

    /// Upsert every entry inside one transaction
    pub fn put_many(&self, entries: &[(String, String)]) -> TerminalResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let updated_at = Utc::now().to_rfc3339();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO terminal_state (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            )?;
            for (key, value) in entries {
                stmt.execute(params![key, value, updated_at])?;
            }
        }
        tx.commit()?;
        debug!("💾 Stored {} keys", entries.len());
        Ok(())
    }

    /// Stored keys in alphabetical order
    pub fn keys(&self) -> TerminalResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key FROM terminal_state ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Check database health
    pub fn health_check(&self) -> TerminalResult<bool> {
        let conn = self.lock()?;
        let result: i32 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(result == 1)
    }
}
