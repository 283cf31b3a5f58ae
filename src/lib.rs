// Crypto Terminal Simulator Library
//
// A single-user simulated crypto exchange terminal: synthetic prices, charts,
// order books, trade tapes, a portfolio ledger, quests and idle income.

pub mod core;
pub mod config;
pub mod db;          // SQLite snapshot store
pub mod error;       // Unified error handling
pub mod types;
pub mod progression;
pub mod simulation;
pub mod runtime;
pub mod progress;

// Re-export core market types
pub use core::{
    Asset, AssetSpec, CandleHistory, EventKind, EventModulator, EventState, Ledger, MarketEvent,
    Modulation, PriceEngine, PriceTick, RandomSource, Scheduler, ScriptedRandom, Settlement, StdRandom,
};

// Re-export shared value types
pub use types::{Direction, PricePoint, Side, Trade};

// Re-export error types
pub use error::{TerminalError, TerminalResult};

// Re-export configuration
pub use config::{
    AccountConfig, ConfigError, EventConfig, IdleConfig, LoggingConfig, MarketConfig, PersistenceConfig,
    QuestConfig, SimConfig,
};

// Re-export database types
pub use db::{Database, PersistedState};

// Re-export progression components
pub use progression::{
    AdOutcome, AlwaysFails, AlwaysRewarded, ClaimOutcome, IdleIncome, Quest, QuestBoard, QuestKind,
    QuestPhase, RewardedVideo, Upgrade,
};

// Re-export simulation components
pub use simulation::{
    BookView, OrderBookLevel, OrderBookSide, SyntheticOrderBook, Terminal, TerminalStats, TickReport,
    TradeReceipt, TradeRecorder, UnlockOutcome, UpgradeReceipt,
};

pub use runtime::{standard_schedule, Session};
pub use progress::{SimulationProgress, Spinner};
