//! Watch condition records

use serde::{Deserialize, Serialize};

/// The seven supported threshold conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchConditionKind {
    /// Last price strictly above the threshold
    PriceAbove,
    /// Last price strictly below the threshold
    PriceBelow,
    /// Day change percentage strictly above the threshold
    ChangeAbove,
    /// Day change percentage strictly below the negated threshold
    ChangeBelow,
    /// RSI(14) strictly above the threshold
    RsiAbove,
    /// RSI(14) strictly below the threshold
    RsiBelow,
    /// Volume over average volume strictly above the threshold ratio
    VolumeSpike,
}

/// One armed condition: a kind plus its threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WatchCondition {
    #[serde(rename = "type")]
    pub kind: WatchConditionKind,
    pub threshold: f64,
}

impl WatchCondition {
    pub fn new(kind: WatchConditionKind, threshold: f64) -> Self {
        Self { kind, threshold }
    }

    /// Human-readable form used in alert messages
    pub fn describe(&self) -> String {
        let t = self.threshold;
        match self.kind {
            WatchConditionKind::PriceAbove => format!("price above {t}"),
            WatchConditionKind::PriceBelow => format!("price below {t}"),
            WatchConditionKind::ChangeAbove => format!("day change above {t}%"),
            WatchConditionKind::ChangeBelow => format!("day change below -{t}%"),
            WatchConditionKind::RsiAbove => format!("RSI above {t}"),
            WatchConditionKind::RsiBelow => format!("RSI below {t}"),
            WatchConditionKind::VolumeSpike => format!("volume above {t}x average"),
        }
    }
}
