// Simulation Module
// Synthetic market microstructure plus the terminal that ties every engine together

pub mod order_book;
pub mod trade_tape;
pub mod terminal;

pub use order_book::{BookView, OrderBookLevel, OrderBookSide, SyntheticOrderBook};
pub use trade_tape::TradeRecorder;
pub use terminal::{Terminal, TerminalStats, TickReport, TradeReceipt, UnlockOutcome, UpgradeReceipt};
