//! Shared vocabulary for the swarm-rs stock dashboard
//!
//! This crate defines the types every other crate in the workspace speaks:
//! the five-level trade signal, the four analyst agent kinds, per-agent
//! results with their streaming lifecycle, and the swarm consensus record.

pub mod agent;
pub mod consensus;
pub mod market;
pub mod signal;

pub use agent::{AgentKind, AgentMeta, AgentResult, AgentStatus, parse_agent_meta};
pub use consensus::SwarmConsensus;
pub use market::Market;
pub use signal::Signal;
