//! Consensus synthesis
//!
//! Deterministic and total: any subset of the four agents (including none)
//! yields a defined consensus. Only results with `Done` status count.

use chrono::Utc;
use swarm_core::{AgentResult, Market, Signal, SwarmConsensus};

/// Aggregate settled agent results into one consensus record
///
/// Scores map strong_buy..strong_sell to 2..-2, the mean score is
/// re-bucketed via [`Signal::from_avg_score`], and confidence is the rounded
/// mean over done agents. Agents in `Error` or still-streaming (cancelled)
/// state are excluded. With zero done agents the consensus is hold with zero
/// confidence.
pub fn synthesize(results: &[AgentResult], ticker: &str, market: Market) -> SwarmConsensus {
    let agents: Vec<AgentResult> = results.iter().filter(|r| r.is_done()).cloned().collect();

    let mut total_score = 0i32;
    let mut total_confidence = 0u32;
    let mut bull_count = 0usize;
    let mut bear_count = 0usize;

    for agent in &agents {
        let score = agent.meta.signal.score();
        total_score += score;
        total_confidence += u32::from(agent.meta.confidence);
        if score > 0 {
            bull_count += 1;
        }
        if score < 0 {
            bear_count += 1;
        }
    }

    let (avg_score, avg_confidence) = if agents.is_empty() {
        (0.0, 0)
    } else {
        let n = agents.len() as f64;
        (
            f64::from(total_score) / n,
            (f64::from(total_confidence) / n).round_ties_even() as u8,
        )
    };

    let overall_signal = Signal::from_avg_score(avg_score);
    let neutral_count = agents.len() - bull_count - bear_count;

    let summary = format!(
        "Consensus across {} completed agents: **{}** (average confidence: {avg_confidence}%). \
         {bull_count} bullish, {bear_count} bearish, {neutral_count} neutral.",
        agents.len(),
        overall_signal.label(),
    );

    SwarmConsensus {
        overall_signal,
        avg_confidence,
        bull_count,
        bear_count,
        summary,
        agents,
        ticker: ticker.to_string(),
        market,
        analyzed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use swarm_core::AgentKind;

    use super::*;

    fn done(kind: AgentKind, signal: Signal, confidence: u8) -> AgentResult {
        let mut result = AgentResult::streaming(kind);
        result.text = format!(
            "analysis\n```json\n{{\"signal\":\"{}\",\"confidence\":{confidence}}}\n```",
            serde_json::to_value(signal).unwrap().as_str().unwrap()
        );
        result.finish();
        assert_eq!(result.meta.signal, signal);
        result
    }

    #[test]
    fn test_reference_aggregation() {
        let results = vec![
            done(AgentKind::Macro, Signal::Buy, 80),
            done(AgentKind::Fundamental, Signal::Buy, 70),
            done(AgentKind::Technical, Signal::Hold, 50),
            done(AgentKind::Sentiment, Signal::StrongBuy, 90),
        ];
        let consensus = synthesize(&results, "AAPL", Market::Us);

        // avg score (1+1+0+2)/4 = 1.0 -> buy
        assert_eq!(consensus.overall_signal, Signal::Buy);
        assert_eq!(consensus.avg_confidence, 72); // 290/4 = 72.5, ties round to even
        assert_eq!(consensus.bull_count, 3);
        assert_eq!(consensus.bear_count, 0);
        assert_eq!(consensus.neutral_count(), 1);
        assert_eq!(consensus.agents.len(), 4);
        assert!(consensus.summary.contains("Buy"));
    }

    #[test]
    fn test_order_invariance() {
        let mut results = vec![
            done(AgentKind::Macro, Signal::Buy, 80),
            done(AgentKind::Fundamental, Signal::Buy, 70),
            done(AgentKind::Technical, Signal::Hold, 50),
            done(AgentKind::Sentiment, Signal::StrongBuy, 90),
        ];
        let baseline = synthesize(&results, "AAPL", Market::Us);

        results.reverse();
        let reversed = synthesize(&results, "AAPL", Market::Us);
        results.swap(0, 2);
        let swapped = synthesize(&results, "AAPL", Market::Us);

        for other in [&reversed, &swapped] {
            assert_eq!(other.overall_signal, baseline.overall_signal);
            assert_eq!(other.avg_confidence, baseline.avg_confidence);
            assert_eq!(other.bull_count, baseline.bull_count);
            assert_eq!(other.bear_count, baseline.bear_count);
        }
    }

    #[test]
    fn test_zero_done_agents() {
        let consensus = synthesize(&[], "AAPL", Market::Us);
        assert_eq!(consensus.overall_signal, Signal::Hold);
        assert_eq!(consensus.avg_confidence, 0);
        assert_eq!(consensus.bull_count, 0);
        assert_eq!(consensus.bear_count, 0);
        assert!(consensus.agents.is_empty());

        // errored/streaming results are not done agents either
        let mut failed = AgentResult::streaming(AgentKind::Macro);
        failed.fail("network down");
        let still_streaming = AgentResult::streaming(AgentKind::Technical);
        let consensus = synthesize(&[failed, still_streaming], "AAPL", Market::Us);
        assert_eq!(consensus.overall_signal, Signal::Hold);
        assert!(consensus.agents.is_empty());
    }

    #[test]
    fn test_bearish_bucketing() {
        let results = vec![
            done(AgentKind::Macro, Signal::StrongSell, 85),
            done(AgentKind::Fundamental, Signal::Sell, 75),
            done(AgentKind::Technical, Signal::StrongSell, 90),
            done(AgentKind::Sentiment, Signal::Sell, 60),
        ];
        let consensus = synthesize(&results, "TSLA", Market::Us);
        // avg score (-2-1-2-1)/4 = -1.5 -> strong sell
        assert_eq!(consensus.overall_signal, Signal::StrongSell);
        assert_eq!(consensus.bull_count, 0);
        assert_eq!(consensus.bear_count, 4);
    }

    #[test]
    fn test_partial_swarm() {
        // one agent errored out, three settled
        let mut failed = AgentResult::streaming(AgentKind::Macro);
        failed.fail("HTTP 429");
        let results = vec![
            failed,
            done(AgentKind::Fundamental, Signal::Hold, 55),
            done(AgentKind::Technical, Signal::Buy, 65),
            done(AgentKind::Sentiment, Signal::Hold, 45),
        ];
        let consensus = synthesize(&results, "005930", Market::Kr);
        assert_eq!(consensus.agents.len(), 3);
        // avg score 1/3 -> hold
        assert_eq!(consensus.overall_signal, Signal::Hold);
        assert_eq!(consensus.avg_confidence, 55); // round(165/3)
        assert_eq!(consensus.market, Market::Kr);
    }

    #[test]
    fn test_default_meta_counts_as_neutral() {
        // a done agent whose output had no metadata block votes hold@50
        let mut bare = AgentResult::streaming(AgentKind::Sentiment);
        bare.text = "prose only, no block".to_string();
        bare.finish();
        let consensus = synthesize(&[bare], "AAPL", Market::Us);
        assert_eq!(consensus.overall_signal, Signal::Hold);
        assert_eq!(consensus.avg_confidence, 50);
        assert_eq!(consensus.neutral_count(), 1);
    }
}
