//! Agent kinds, streaming result lifecycle, and metadata extraction
//!
//! Every agent is asked to end its free-text analysis with a fenced JSON
//! block describing its verdict. The block is a textual protocol, not a
//! validated schema: [`parse_agent_meta`] tolerates a missing block, broken
//! JSON, and individually absent or malformed fields. The prose is the
//! primary value; the metadata is best-effort.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Signal;

/// The four fixed analyst personas of a swarm run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Macro economist: rates, FX, volatility, sector rotation
    Macro,
    /// Fundamental analyst: valuation, profitability, balance sheet
    Fundamental,
    /// Technical analyst: trend, momentum, volume
    Technical,
    /// Sentiment analyst: positioning, news flow, crowd psychology
    Sentiment,
}

impl AgentKind {
    /// All four kinds, in the order a swarm starts them
    pub const ALL: [Self; 4] = [Self::Macro, Self::Fundamental, Self::Technical, Self::Sentiment];

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Macro => "Macro",
            Self::Fundamental => "Fundamental",
            Self::Technical => "Technical",
            Self::Sentiment => "Sentiment",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle state of one agent run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Chunks are still arriving; `text` is append-only
    Streaming,
    /// Stream finished; `meta` has been extracted from the final text
    Done,
    /// Transport or HTTP failure; `error` carries the message
    Error,
}

/// Structured verdict extracted from an agent's final text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMeta {
    /// Trade recommendation
    pub signal: Signal,
    /// Conviction, 0-100
    pub confidence: u8,
    /// Optional price target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_target: Option<f64>,
    /// Supporting factors, in the agent's stated order
    pub key_factors: Vec<String>,
    /// Identified risks, in the agent's stated order
    pub risks: Vec<String>,
}

impl Default for AgentMeta {
    fn default() -> Self {
        Self {
            signal: Signal::Hold,
            confidence: 50,
            price_target: None,
            key_factors: Vec::new(),
            risks: Vec::new(),
        }
    }
}

/// Result of one agent run, observable while streaming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    /// Which persona produced this
    pub kind: AgentKind,
    /// Accumulated analysis text; append-only while streaming
    pub text: String,
    /// Extracted verdict; only meaningful once `status` is `Done`
    pub meta: AgentMeta,
    /// Lifecycle state
    pub status: AgentStatus,
    /// Failure message when `status` is `Error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run reached `Done` or `Error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl AgentResult {
    /// Create a fresh result at the start of a run
    pub fn streaming(kind: AgentKind) -> Self {
        Self {
            kind,
            text: String::new(),
            meta: AgentMeta::default(),
            status: AgentStatus::Streaming,
            error: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Transition to `Done`, extracting metadata from the accumulated text
    pub fn finish(&mut self) {
        self.meta = parse_agent_meta(&self.text);
        self.status = AgentStatus::Done;
        self.completed_at = Some(Utc::now());
    }

    /// Transition to `Error`
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = AgentStatus::Error;
        self.error = Some(message.into());
        self.completed_at = Some(Utc::now());
    }

    /// Whether this run finished successfully
    pub fn is_done(&self) -> bool {
        self.status == AgentStatus::Done
    }
}

/// Extract the fenced JSON metadata block from an agent's output
///
/// Fields are defaulted individually: a block with a valid signal but no
/// confidence keeps the signal and takes confidence 50. An absent block,
/// unparseable JSON, or an unrecognized signal string falls back to the
/// respective default rather than failing the run.
pub fn parse_agent_meta(text: &str) -> AgentMeta {
    let Some(block) = extract_json_block(text) else {
        return AgentMeta::default();
    };

    let Ok(value) = serde_json::from_str::<serde_json::Value>(&block) else {
        return AgentMeta::default();
    };

    let defaults = AgentMeta::default();

    let signal = value
        .get("signal")
        .and_then(serde_json::Value::as_str)
        .and_then(Signal::parse)
        .unwrap_or(defaults.signal);

    let confidence = value
        .get("confidence")
        .and_then(serde_json::Value::as_f64)
        .map_or(defaults.confidence, |c| c.round().clamp(0.0, 100.0) as u8);

    let price_target = value.get("priceTarget").and_then(serde_json::Value::as_f64);

    AgentMeta {
        signal,
        confidence,
        price_target,
        key_factors: string_list(&value, "keyFactors"),
        risks: string_list(&value, "risks"),
    }
}

fn extract_json_block(text: &str) -> Option<String> {
    // (?s) so the block may span lines
    let re = Regex::new(r"(?s)```json\s*(.*?)```").ok()?;
    re.captures(text).map(|c| c[1].to_string())
}

fn string_list(value: &serde_json::Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_block() {
        let text = "Solid quarter overall.\n```json\n{\"signal\":\"buy\",\"confidence\":72,\"keyFactors\":[\"a\"],\"risks\":[]}\n```";
        let meta = parse_agent_meta(text);
        assert_eq!(meta.signal, Signal::Buy);
        assert_eq!(meta.confidence, 72);
        assert_eq!(meta.key_factors, vec!["a".to_string()]);
        assert!(meta.risks.is_empty());
        assert_eq!(meta.price_target, None);
    }

    #[test]
    fn test_parse_with_price_target() {
        let text = "```json\n{\"signal\":\"strong_buy\",\"confidence\":90,\"priceTarget\":215.5,\"keyFactors\":[],\"risks\":[\"fx\"]}\n```";
        let meta = parse_agent_meta(text);
        assert_eq!(meta.signal, Signal::StrongBuy);
        assert_eq!(meta.price_target, Some(215.5));
        assert_eq!(meta.risks, vec!["fx".to_string()]);
    }

    #[test]
    fn test_missing_block_yields_defaults() {
        let meta = parse_agent_meta("No metadata here, just prose.");
        assert_eq!(meta, AgentMeta::default());
        assert_eq!(meta.signal, Signal::Hold);
        assert_eq!(meta.confidence, 50);
    }

    #[test]
    fn test_malformed_json_yields_defaults() {
        let meta = parse_agent_meta("```json\n{signal: buy,,}\n```");
        assert_eq!(meta, AgentMeta::default());
    }

    #[test]
    fn test_per_field_defaulting() {
        // Valid signal, missing confidence: keep the signal, default the rest
        let meta = parse_agent_meta("```json\n{\"signal\":\"sell\"}\n```");
        assert_eq!(meta.signal, Signal::Sell);
        assert_eq!(meta.confidence, 50);
        assert!(meta.key_factors.is_empty());

        // Unknown signal string defaults to hold without dropping the block
        let meta = parse_agent_meta("```json\n{\"signal\":\"yolo\",\"confidence\":80}\n```");
        assert_eq!(meta.signal, Signal::Hold);
        assert_eq!(meta.confidence, 80);
    }

    #[test]
    fn test_confidence_clamped() {
        let meta = parse_agent_meta("```json\n{\"signal\":\"buy\",\"confidence\":400}\n```");
        assert_eq!(meta.confidence, 100);

        let meta = parse_agent_meta("```json\n{\"signal\":\"buy\",\"confidence\":-5}\n```");
        assert_eq!(meta.confidence, 0);
    }

    #[test]
    fn test_fractional_confidence_rounded() {
        let meta = parse_agent_meta("```json\n{\"signal\":\"buy\",\"confidence\":72.5}\n```");
        assert_eq!(meta.confidence, 73);

        let meta = parse_agent_meta("```json\n{\"signal\":\"buy\",\"confidence\":72.0}\n```");
        assert_eq!(meta.confidence, 72);
    }

    #[test]
    fn test_non_string_factors_skipped() {
        let meta = parse_agent_meta("```json\n{\"keyFactors\":[\"ok\",42,null,\"fine\"]}\n```");
        assert_eq!(meta.key_factors, vec!["ok".to_string(), "fine".to_string()]);
    }

    #[test]
    fn test_result_lifecycle() {
        let mut result = AgentResult::streaming(AgentKind::Technical);
        assert_eq!(result.status, AgentStatus::Streaming);
        assert!(result.text.is_empty());
        assert!(result.completed_at.is_none());

        result.text.push_str("Uptrend intact. ");
        result.text.push_str("```json\n{\"signal\":\"buy\",\"confidence\":65}\n```");
        result.finish();

        assert!(result.is_done());
        assert_eq!(result.meta.signal, Signal::Buy);
        assert!(result.completed_at.is_some());
    }

    #[test]
    fn test_result_failure() {
        let mut result = AgentResult::streaming(AgentKind::Macro);
        result.fail("connection reset");
        assert_eq!(result.status, AgentStatus::Error);
        assert_eq!(result.error.as_deref(), Some("connection reset"));
        assert!(!result.is_done());
    }
}
