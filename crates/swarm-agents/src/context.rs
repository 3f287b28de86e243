//! Market context records and their prompt rendering
//!
//! The swarm consumes market data as pre-formatted text blocks. Fetching is
//! someone else's job (the dashboard's quote proxy); this module owns the
//! typed records and the deterministic rendering into the context strings
//! fed to the agents. Missing data renders as a placeholder line, never an
//! error.

use serde::{Deserialize, Serialize};
use swarm_core::Market;

/// One daily OHLCV bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ohlcv {
    /// Trading day, YYYY-MM-DD
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Static listing information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockInfo {
    pub ticker: String,
    pub name: String,
    pub market: Market,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Quote currency, e.g. "USD" or "KRW"
    pub currency: String,
}

/// Quote summary plus price history for one ticker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub info: StockInfo,
    pub ohlcv: Vec<Ohlcv>,
    pub current_price: f64,
    /// Absolute change versus previous close
    pub change: f64,
    /// Percentage change versus previous close
    pub change_percent: f64,
}

/// Fundamentals record; every field optional, provider-dependent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fundamentals {
    #[serde(default)]
    pub pe: Option<f64>,
    #[serde(default)]
    pub forward_pe: Option<f64>,
    #[serde(default)]
    pub pb: Option<f64>,
    #[serde(default)]
    pub ps: Option<f64>,
    #[serde(default)]
    pub roe: Option<f64>,
    #[serde(default)]
    pub revenue_growth: Option<f64>,
    #[serde(default)]
    pub earnings_growth: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
    #[serde(default)]
    pub debt_to_equity: Option<f64>,
    #[serde(default)]
    pub free_cash_flow: Option<f64>,
}

/// MACD triple
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Macd {
    pub value: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Bollinger band triple
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Technical indicator snapshot computed elsewhere from the closing series
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorSet {
    #[serde(default)]
    pub rsi14: Option<f64>,
    #[serde(default)]
    pub macd: Option<Macd>,
    #[serde(default)]
    pub bollinger: Option<BollingerBands>,
    #[serde(default)]
    pub sma20: Option<f64>,
    #[serde(default)]
    pub sma50: Option<f64>,
    #[serde(default)]
    pub sma200: Option<f64>,
}

impl StockSnapshot {
    /// Render the snapshot into the shared stock context block
    ///
    /// Includes the most recent 20 OHLCV rows.
    pub fn format_context(&self) -> String {
        let recent_start = self.ohlcv.len().saturating_sub(20);
        let ohlcv_lines = self.ohlcv[recent_start..]
            .iter()
            .map(|d| {
                format!(
                    "{}: O={} H={} L={} C={} V={}",
                    d.date, d.open, d.high, d.low, d.close, d.volume
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let sign = if self.change > 0.0 { "+" } else { "" };
        let pct_sign = if self.change_percent > 0.0 { "+" } else { "" };

        format!(
            "Name: {} ({})\nMarket: {}\nSector: {}\nPrice: {} {}\nChange: {sign}{} ({pct_sign}{}%)\nMarket cap: {}\n\n### Last 20 days OHLCV\n{ohlcv_lines}",
            self.info.name,
            self.info.ticker,
            self.info.market.describe(),
            self.info.sector.as_deref().unwrap_or("N/A"),
            self.current_price,
            self.info.currency,
            self.change,
            self.change_percent,
            self.info.market_cap.map_or_else(|| "N/A".to_string(), format_large_number),
        )
    }
}

impl Fundamentals {
    /// Render available fields line-by-line; a placeholder when all absent
    pub fn format_context(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        if let Some(v) = self.pe {
            lines.push(format!("PER: {v:.2}"));
        }
        if let Some(v) = self.forward_pe {
            lines.push(format!("Forward PER: {v:.2}"));
        }
        if let Some(v) = self.pb {
            lines.push(format!("PBR: {v:.2}"));
        }
        if let Some(v) = self.ps {
            lines.push(format!("PSR: {v:.2}"));
        }
        if let Some(v) = self.roe {
            lines.push(format!("ROE: {:.2}%", v * 100.0));
        }
        if let Some(v) = self.revenue_growth {
            lines.push(format!("Revenue growth: {:.2}%", v * 100.0));
        }
        if let Some(v) = self.earnings_growth {
            lines.push(format!("Earnings growth: {:.2}%", v * 100.0));
        }
        if let Some(v) = self.dividend_yield {
            lines.push(format!("Dividend yield: {:.2}%", v * 100.0));
        }
        if let Some(v) = self.debt_to_equity {
            lines.push(format!("Debt/equity: {v:.2}"));
        }
        if let Some(v) = self.free_cash_flow {
            lines.push(format!("FCF: {}", format_large_number(v)));
        }

        if lines.is_empty() { "No financial data available".to_string() } else { lines.join("\n") }
    }
}

impl IndicatorSet {
    /// Render available indicators line-by-line; a placeholder when all absent
    pub fn format_context(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        if let Some(v) = self.rsi14 {
            lines.push(format!("RSI(14): {v:.2}"));
        }
        if let Some(m) = self.macd {
            lines.push(format!(
                "MACD: {:.4} / Signal: {:.4} / Histogram: {:.4}",
                m.value, m.signal, m.histogram
            ));
        }
        if let Some(b) = self.bollinger {
            lines.push(format!(
                "Bollinger: Upper={:.2} Middle={:.2} Lower={:.2}",
                b.upper, b.middle, b.lower
            ));
        }
        if let Some(v) = self.sma20 {
            lines.push(format!("SMA20: {v:.2}"));
        }
        if let Some(v) = self.sma50 {
            lines.push(format!("SMA50: {v:.2}"));
        }
        if let Some(v) = self.sma200 {
            lines.push(format!("SMA200: {v:.2}"));
        }

        if lines.is_empty() { "No indicator data available".to_string() } else { lines.join("\n") }
    }
}

/// Human-scale rendering of large magnitudes (K/M/B/T)
fn format_large_number(n: f64) -> String {
    let abs = n.abs();
    if abs >= 1e12 {
        format!("{:.2}T", n / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", n / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", n / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", n / 1e3)
    } else {
        format!("{n:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StockSnapshot {
        StockSnapshot {
            info: StockInfo {
                ticker: "AAPL".to_string(),
                name: "Apple Inc.".to_string(),
                market: Market::Us,
                sector: Some("Technology".to_string()),
                industry: None,
                market_cap: Some(3.4e12),
                currency: "USD".to_string(),
            },
            ohlcv: (0..30)
                .map(|i| Ohlcv {
                    date: format!("2025-07-{:02}", i + 1),
                    open: 100.0 + f64::from(i),
                    high: 101.0 + f64::from(i),
                    low: 99.0 + f64::from(i),
                    close: 100.5 + f64::from(i),
                    volume: 1_000_000.0,
                })
                .collect(),
            current_price: 230.1,
            change: 2.3,
            change_percent: 1.01,
        }
    }

    #[test]
    fn test_snapshot_context() {
        let text = snapshot().format_context();
        assert!(text.contains("Apple Inc. (AAPL)"));
        assert!(text.contains("Price: 230.1 USD"));
        assert!(text.contains("Change: +2.3 (+1.01%)"));
        assert!(text.contains("Market cap: 3.40T"));
        // only the last 20 bars are included
        assert!(!text.contains("2025-07-01"));
        assert!(text.contains("2025-07-30"));
    }

    #[test]
    fn test_fundamentals_context() {
        let funds = Fundamentals {
            pe: Some(28.123),
            roe: Some(0.456),
            free_cash_flow: Some(98.7e9),
            ..Fundamentals::default()
        };
        let text = funds.format_context();
        assert!(text.contains("PER: 28.12"));
        assert!(text.contains("ROE: 45.60%"));
        assert!(text.contains("FCF: 98.70B"));
        assert!(!text.contains("PBR"));
    }

    #[test]
    fn test_empty_records_render_placeholders() {
        assert_eq!(Fundamentals::default().format_context(), "No financial data available");
        assert_eq!(IndicatorSet::default().format_context(), "No indicator data available");
    }

    #[test]
    fn test_indicator_context() {
        let ind = IndicatorSet {
            rsi14: Some(61.237),
            macd: Some(Macd { value: 1.2345, signal: 1.1111, histogram: 0.1234 }),
            sma20: Some(224.5),
            ..IndicatorSet::default()
        };
        let text = ind.format_context();
        assert!(text.contains("RSI(14): 61.24"));
        assert!(text.contains("MACD: 1.2345 / Signal: 1.1111 / Histogram: 0.1234"));
        assert!(text.contains("SMA20: 224.50"));
        assert!(!text.contains("SMA200"));
    }

    #[test]
    fn test_large_number_scaling() {
        assert_eq!(format_large_number(1.5e12), "1.50T");
        assert_eq!(format_large_number(-2.5e9), "-2.50B");
        assert_eq!(format_large_number(3.2e6), "3.20M");
        assert_eq!(format_large_number(9_500.0), "9.50K");
        assert_eq!(format_large_number(12.3), "12.30");
    }
}
