//! Condition evaluation
//!
//! Pure and stateless: one pass over an item's conditions against one
//! metrics snapshot. A condition whose inputs are absent is skipped, not an
//! error, and a condition that keeps holding fires again on every pass.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::condition::WatchConditionKind;
use crate::store::{WatchAlert, WatchlistItem};

/// Point-in-time metrics for one ticker
///
/// Only price and day change are guaranteed by the quote feed; RSI and the
/// volume pair are provider-dependent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TickerMetrics {
    pub price: f64,
    pub change_percent: f64,
    #[serde(default)]
    pub rsi: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub avg_volume: Option<f64>,
}

/// Evaluate every condition on `item` against `metrics`
///
/// Returns one alert per condition that holds right now.
pub fn evaluate(item: &WatchlistItem, metrics: &TickerMetrics) -> Vec<WatchAlert> {
    let mut alerts = Vec::new();

    for condition in &item.conditions {
        let observed = match condition.kind {
            WatchConditionKind::PriceAbove => {
                (metrics.price > condition.threshold).then_some(metrics.price)
            }
            WatchConditionKind::PriceBelow => {
                (metrics.price < condition.threshold).then_some(metrics.price)
            }
            WatchConditionKind::ChangeAbove => {
                (metrics.change_percent > condition.threshold).then_some(metrics.change_percent)
            }
            WatchConditionKind::ChangeBelow => {
                (metrics.change_percent < -condition.threshold).then_some(metrics.change_percent)
            }
            WatchConditionKind::RsiAbove => {
                metrics.rsi.filter(|rsi| *rsi > condition.threshold)
            }
            WatchConditionKind::RsiBelow => {
                metrics.rsi.filter(|rsi| *rsi < condition.threshold)
            }
            WatchConditionKind::VolumeSpike => match (metrics.volume, metrics.avg_volume) {
                // an average of zero means the ratio is undefined, skip
                (Some(volume), Some(avg)) if avg > 0.0 => {
                    let ratio = volume / avg;
                    (ratio > condition.threshold).then_some(ratio)
                }
                _ => None,
            },
        };

        if let Some(observed) = observed {
            debug!(ticker = %item.ticker, condition = ?condition.kind, observed, "condition fired");
            alerts.push(WatchAlert::fire(item, *condition, observed));
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use swarm_core::Market;

    use crate::condition::WatchCondition;
    use crate::store::WatchlistItem;

    use super::*;

    fn item(conditions: Vec<WatchCondition>) -> WatchlistItem {
        WatchlistItem::new("AAPL", "Apple Inc.", Market::Us, conditions)
    }

    #[test]
    fn test_price_thresholds_are_strict() {
        let watched = item(vec![
            WatchCondition::new(WatchConditionKind::PriceAbove, 230.0),
            WatchCondition::new(WatchConditionKind::PriceBelow, 230.0),
        ]);
        // exactly at the threshold fires neither side
        let at = TickerMetrics { price: 230.0, ..TickerMetrics::default() };
        assert!(evaluate(&watched, &at).is_empty());

        let above = TickerMetrics { price: 230.01, ..TickerMetrics::default() };
        let alerts = evaluate(&watched, &above);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].condition.kind, WatchConditionKind::PriceAbove);
        assert_eq!(alerts[0].observed_value, 230.01);
    }

    #[test]
    fn test_change_below_negates_threshold() {
        let watched = item(vec![WatchCondition::new(WatchConditionKind::ChangeBelow, 5.0)]);

        let down = TickerMetrics { change_percent: -6.2, ..TickerMetrics::default() };
        assert_eq!(evaluate(&watched, &down).len(), 1);

        // -4% is not below -5%
        let mild = TickerMetrics { change_percent: -4.0, ..TickerMetrics::default() };
        assert!(evaluate(&watched, &mild).is_empty());

        // a positive change never fires the downside condition
        let up = TickerMetrics { change_percent: 6.0, ..TickerMetrics::default() };
        assert!(evaluate(&watched, &up).is_empty());
    }

    #[test]
    fn test_missing_inputs_skip_silently() {
        let watched = item(vec![
            WatchCondition::new(WatchConditionKind::RsiAbove, 70.0),
            WatchCondition::new(WatchConditionKind::RsiBelow, 30.0),
            WatchCondition::new(WatchConditionKind::VolumeSpike, 2.0),
        ]);
        let bare = TickerMetrics { price: 100.0, ..TickerMetrics::default() };
        assert!(evaluate(&watched, &bare).is_empty());

        // volume without the average is still not enough
        let partial = TickerMetrics {
            price: 100.0,
            volume: Some(9_000_000.0),
            ..TickerMetrics::default()
        };
        assert!(evaluate(&watched, &partial).is_empty());
    }

    #[test]
    fn test_zero_average_volume_never_divides() {
        let watched = item(vec![WatchCondition::new(WatchConditionKind::VolumeSpike, 2.0)]);
        let metrics = TickerMetrics {
            volume: Some(5_000_000.0),
            avg_volume: Some(0.0),
            ..TickerMetrics::default()
        };
        assert!(evaluate(&watched, &metrics).is_empty());
    }

    #[test]
    fn test_volume_spike_ratio() {
        let watched = item(vec![WatchCondition::new(WatchConditionKind::VolumeSpike, 2.0)]);
        let metrics = TickerMetrics {
            volume: Some(6_000_000.0),
            avg_volume: Some(2_000_000.0),
            ..TickerMetrics::default()
        };
        let alerts = evaluate(&watched, &metrics);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].observed_value, 3.0);
        assert!(alerts[0].message.contains("volume above 2x average"));
    }

    #[test]
    fn test_multiple_conditions_fire_together() {
        let watched = item(vec![
            WatchCondition::new(WatchConditionKind::PriceAbove, 100.0),
            WatchCondition::new(WatchConditionKind::ChangeAbove, 3.0),
            WatchCondition::new(WatchConditionKind::RsiAbove, 70.0),
        ]);
        let metrics = TickerMetrics {
            price: 110.0,
            change_percent: 4.5,
            rsi: Some(75.0),
            ..TickerMetrics::default()
        };
        assert_eq!(evaluate(&watched, &metrics).len(), 3);
    }
}
