//! Swarm consensus record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AgentResult, Market, Signal};

/// Aggregated verdict of one completed swarm run
///
/// Created once per non-cancelled run and never mutated; the next run
/// supersedes it. `agents` holds only the runs that reached `Done`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmConsensus {
    /// Re-bucketed average signal
    pub overall_signal: Signal,
    /// Rounded mean confidence over done agents; 0 when none finished
    pub avg_confidence: u8,
    /// Done agents with a positive score
    pub bull_count: usize,
    /// Done agents with a negative score
    pub bear_count: usize,
    /// Templated one-line summary
    pub summary: String,
    /// The done agent results that were aggregated
    pub agents: Vec<AgentResult>,
    /// Ticker the swarm analyzed
    pub ticker: String,
    /// Market of the ticker
    pub market: Market,
    /// When the consensus was synthesized
    pub analyzed_at: DateTime<Utc>,
}

impl SwarmConsensus {
    /// Done agents that voted neither bull nor bear
    pub fn neutral_count(&self) -> usize {
        self.agents.len() - self.bull_count - self.bear_count
    }
}
