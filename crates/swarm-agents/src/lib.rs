//! Agent swarm orchestration for swarm-rs
//!
//! One swarm run fans four analyst personas (macro, fundamental, technical,
//! sentiment) out against a single ticker, streams their progress back to
//! observers in real time, and aggregates whatever finished into a consensus
//! signal. Individual agent failures never abort the siblings; a cancelled
//! run produces no consensus at all.

pub mod consensus;
pub mod context;
pub mod error;
pub mod prompts;
pub mod runner;
pub mod swarm;

pub use consensus::synthesize;
pub use context::{Fundamentals, IndicatorSet, Ohlcv, StockInfo, StockSnapshot};
pub use error::{Result, SwarmError};
pub use runner::AgentRunner;
pub use swarm::{AgentSwarm, SwarmEvent, SwarmRequest, SwarmState};
