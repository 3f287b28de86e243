//! Watchlist alert engine
//!
//! Stateless threshold conditions evaluated against point-in-time market
//! metrics. Evaluation never errors: a condition whose inputs are missing is
//! silently skipped for that round, and conditions re-fire on every check
//! while they hold.

pub mod condition;
pub mod engine;
pub mod store;

pub use condition::{WatchCondition, WatchConditionKind};
pub use engine::{evaluate, TickerMetrics};
pub use store::{WatchAlert, WatchlistItem, WatchlistStore};
