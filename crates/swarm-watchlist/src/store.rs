//! Watchlist items and the alert log

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use swarm_core::Market;
use tracing::info;
use uuid::Uuid;

use crate::condition::WatchCondition;
use crate::engine::{evaluate, TickerMetrics};

/// Alert log high-water mark; oldest entries fall off beyond this
pub const MAX_ALERTS: usize = 100;

/// One watched ticker and its armed conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistItem {
    pub id: String,
    pub ticker: String,
    pub name: String,
    pub market: Market,
    pub conditions: Vec<WatchCondition>,
}

impl WatchlistItem {
    pub fn new(
        ticker: impl Into<String>,
        name: impl Into<String>,
        market: Market,
        conditions: Vec<WatchCondition>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticker: ticker.into(),
            name: name.into(),
            market,
            conditions,
        }
    }
}

/// One fired condition, frozen at evaluation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchAlert {
    pub id: String,
    /// The [`WatchlistItem`] this alert came from
    pub watch_id: String,
    pub ticker: String,
    /// Copy of the condition as armed when it fired
    pub condition: WatchCondition,
    pub observed_value: f64,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub dismissed: bool,
}

impl WatchAlert {
    /// Build the alert for a condition that just fired
    pub fn fire(item: &WatchlistItem, condition: WatchCondition, observed: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            watch_id: item.id.clone(),
            ticker: item.ticker.clone(),
            condition,
            observed_value: observed,
            message: format!("{}: {} (observed {observed:.2})", item.ticker, condition.describe()),
            created_at: Utc::now(),
            dismissed: false,
        }
    }
}

/// In-memory watchlist with a bounded, newest-first alert log
#[derive(Debug, Default)]
pub struct WatchlistStore {
    items: Vec<WatchlistItem>,
    alerts: Vec<WatchAlert>,
}

impl WatchlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[WatchlistItem] {
        &self.items
    }

    /// Alert log, newest first
    pub fn alerts(&self) -> &[WatchAlert] {
        &self.alerts
    }

    /// Add an item; returns its id
    pub fn add_item(&mut self, item: WatchlistItem) -> String {
        let id = item.id.clone();
        info!(ticker = %item.ticker, conditions = item.conditions.len(), "watching");
        self.items.push(item);
        id
    }

    /// Remove an item; its past alerts stay in the log
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() < before
    }

    /// Replace the armed conditions on one item
    pub fn update_conditions(&mut self, id: &str, conditions: Vec<WatchCondition>) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.conditions = conditions;
                true
            }
            None => false,
        }
    }

    /// Evaluate every item against the supplied per-ticker metrics
    ///
    /// Tickers absent from `metrics` are skipped this round. Newly fired
    /// alerts are returned and prepended to the log, which is then trimmed
    /// to [`MAX_ALERTS`].
    pub fn check(&mut self, metrics: &HashMap<String, TickerMetrics>) -> Vec<WatchAlert> {
        let mut fired = Vec::new();
        for item in &self.items {
            if let Some(m) = metrics.get(&item.ticker) {
                fired.extend(evaluate(item, m));
            }
        }

        if !fired.is_empty() {
            let mut log = fired.clone();
            log.extend(self.alerts.drain(..));
            log.truncate(MAX_ALERTS);
            self.alerts = log;
        }
        fired
    }

    /// Mark one alert dismissed; it stays in the log
    pub fn dismiss_alert(&mut self, id: &str) -> bool {
        match self.alerts.iter_mut().find(|alert| alert.id == id) {
            Some(alert) => {
                alert.dismissed = true;
                true
            }
            None => false,
        }
    }

    pub fn clear_alerts(&mut self) {
        self.alerts.clear();
    }
}
