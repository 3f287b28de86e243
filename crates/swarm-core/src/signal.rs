//! Five-level trade signal with its integer score mapping

use serde::{Deserialize, Serialize};

/// Trade recommendation emitted by an analyst agent or by the swarm consensus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Strongly positive; multiple indicators point to a sharp upside
    StrongBuy,
    /// Positive; most indicators point up
    Buy,
    /// Neutral; mixed signals
    Hold,
    /// Negative; most indicators point down
    Sell,
    /// Strongly negative; multiple indicators point to a sharp downside
    StrongSell,
}

impl Signal {
    /// Integer score used for consensus averaging
    pub fn score(self) -> i32 {
        match self {
            Self::StrongBuy => 2,
            Self::Buy => 1,
            Self::Hold => 0,
            Self::Sell => -1,
            Self::StrongSell => -2,
        }
    }

    /// Re-bucket an averaged score back into a signal
    ///
    /// Thresholds are checked in priority order: >= 1.5 strong buy,
    /// >= 0.5 buy, <= -1.5 strong sell, <= -0.5 sell, otherwise hold.
    pub fn from_avg_score(avg: f64) -> Self {
        if avg >= 1.5 {
            Self::StrongBuy
        } else if avg >= 0.5 {
            Self::Buy
        } else if avg <= -1.5 {
            Self::StrongSell
        } else if avg <= -0.5 {
            Self::Sell
        } else {
            Self::Hold
        }
    }

    /// Parse the snake_case wire form; anything unrecognized is `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "strong_buy" => Some(Self::StrongBuy),
            "buy" => Some(Self::Buy),
            "hold" => Some(Self::Hold),
            "sell" => Some(Self::Sell),
            "strong_sell" => Some(Self::StrongSell),
            _ => None,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::StrongBuy => "Strong Buy",
            Self::Buy => "Buy",
            Self::Hold => "Hold",
            Self::Sell => "Sell",
            Self::StrongSell => "Strong Sell",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
