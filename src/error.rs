//! Unified error handling for the trading terminal simulator
//!
//! Every rejection the engine can produce is local and recoverable. The
//! infrastructure variants cover configuration and the snapshot store.

use crate::core::assets::Asset;
use std::io;

/// Main error type for the terminal simulator
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    // Ledger rejections
    #[error("Insufficient funds: required ${required:.2}, available ${available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("Insufficient {asset} holding: required {required}, available {available}")]
    InsufficientHolding {
        asset: Asset,
        required: f64,
        available: f64,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // Catalogue rejections
    #[error("Asset {0} is locked")]
    AssetLocked(Asset),

    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    #[error("Unknown upgrade: {0}")]
    UnknownUpgrade(String),

    #[error("Quest not found: {0}")]
    QuestNotFound(String),

    // Configuration errors
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Configuration validation error: {0}")]
    ConfigValidation(String),

    // Storage errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl TerminalError {
    /// Get a user-friendly error message with helpful context
    pub fn user_message(&self) -> String {
        match self {
            TerminalError::InsufficientFunds { required, available } => {
                format!(
                    "Insufficient USDT balance\n\
                    Required: ${:.2}\n\
                    Available: ${:.2}\n\n\
                    💡 Either:\n\
                    - Collect clicks or passive income\n\
                    - Reduce the order size",
                    required, available
                )
            }
            TerminalError::InsufficientHolding { asset, required, available } => {
                format!(
                    "Insufficient {} to sell\n\
                    Required: {}\n\
                    Available: {}",
                    asset, required, available
                )
            }
            TerminalError::AssetLocked(asset) => {
                format!(
                    "{} is not unlocked yet\n\n\
                    💡 Run: terminal-sim unlock {}",
                    asset, asset
                )
            }
            TerminalError::ConfigNotFound(path) => {
                format!(
                    "Configuration file not found: {}\n\n\
                    💡 Quick fix:\n\
                    1. Run: terminal-sim init\n\
                    2. Try again",
                    path
                )
            }
            _ => self.to_string(),
        }
    }

    /// Rejections the user can fix by changing input; everything else is
    /// an environment problem.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.category(), "ledger" | "catalogue")
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            TerminalError::InsufficientFunds { .. }
            | TerminalError::InsufficientHolding { .. }
            | TerminalError::InvalidAmount(_) => "ledger",

            TerminalError::AssetLocked(_)
            | TerminalError::UnknownAsset(_)
            | TerminalError::UnknownUpgrade(_)
            | TerminalError::QuestNotFound(_) => "catalogue",

            TerminalError::ConfigNotFound(_)
            | TerminalError::ConfigParse(_)
            | TerminalError::ConfigValidation(_) => "config",

            TerminalError::Persistence(_) | TerminalError::Io(_) => "storage",
        }
    }
}

impl From<io::Error> for TerminalError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => TerminalError::ConfigNotFound(err.to_string()),
            _ => TerminalError::Io(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for TerminalError {
    fn from(err: rusqlite::Error) -> Self {
        TerminalError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for TerminalError {
    fn from(err: serde_json::Error) -> Self {
        TerminalError::Persistence(format!("JSON error: {}", err))
    }
}

impl From<toml::de::Error> for TerminalError {
    fn from(err: toml::de::Error) -> Self {
        TerminalError::ConfigParse(format!("TOML parse error: {}", err))
    }
}

impl From<crate::config::ConfigError> for TerminalError {
    fn from(err: crate::config::ConfigError) -> Self {
        use crate::config::ConfigError;
        match err {
            ConfigError::FileRead(msg) => TerminalError::ConfigNotFound(msg),
            ConfigError::FileWrite(msg) => TerminalError::Io(msg),
            ConfigError::Parse(msg) => TerminalError::ConfigParse(msg),
            ConfigError::Serialize(msg) => TerminalError::ConfigParse(msg),
            ConfigError::Validation(msg) => TerminalError::ConfigValidation(msg),
        }
    }
}

/// Result type alias using TerminalError
pub type TerminalResult<T> = Result<T, TerminalError>;
