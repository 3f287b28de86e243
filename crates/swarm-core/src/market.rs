//! Market identifier shared by agents, watchlist, and context formatting

use serde::{Deserialize, Serialize};

/// Supported exchanges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    /// US listings (NYSE/NASDAQ)
    Us,
    /// Korean listings (KRX)
    Kr,
}

impl Market {
    /// Exchange description used in prompts
    pub fn describe(self) -> &'static str {
        match self {
            Self::Us => "US (NYSE/NASDAQ)",
            Self::Kr => "Korea (KRX)",
        }
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Us => f.write_str("us"),
            Self::Kr => f.write_str("kr"),
        }
    }
}

impl std::str::FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "us" => Ok(Self::Us),
            "kr" => Ok(Self::Kr),
            other => Err(format!("unknown market: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("US".parse::<Market>().unwrap(), Market::Us);
        assert_eq!("kr".parse::<Market>().unwrap(), Market::Kr);
        assert!("jp".parse::<Market>().is_err());
        assert_eq!(Market::Us.to_string(), "us");
    }
}
