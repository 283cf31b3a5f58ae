// Core market engines: assets, randomness, prices, events, charts, timers and the ledger

pub mod assets;
pub mod rng;
pub mod price_engine;
pub mod market_events;
pub mod candles;
pub mod scheduler;
pub mod ledger;

// Re-export commonly used types
pub use assets::{Asset, AssetSpec};
pub use rng::{RandomSource, ScriptedRandom, StdRandom};
pub use price_engine::{PriceEngine, PriceTick, Modulation};
pub use market_events::{EventKind, EventModulator, EventState, MarketEvent};
pub use candles::CandleHistory;
pub use scheduler::Scheduler;
pub use ledger::{Ledger, Settlement};
