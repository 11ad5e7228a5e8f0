//! Process-local counters surfaced on `/health`
//!
//! Counters are keyed by the names in [`metrics`] and only ever grow.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Shared handle over tick, signal and delivery counters
#[derive(Clone)]
pub struct MetricsCollector {
    counters: Arc<RwLock<HashMap<&'static str, u64>>>,
    started: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            counters: Arc::new(RwLock::new(HashMap::new())),
            started: Instant::now(),
        }
    }

    pub async fn increment(&self, name: &'static str, by: u64) {
        *self.counters.write().await.entry(name).or_default() += by;
    }

    /// Bump `notifications_sent_total` or `notifications_failed_total`
    pub async fn record_delivery(&self, delivered: bool) {
        let name = if delivered {
            metrics::NOTIFICATIONS_SENT
        } else {
            metrics::NOTIFICATIONS_FAILED
        };
        self.increment(name, 1).await;
    }

    /// Zero when the counter was never bumped
    pub async fn get_counter(&self, name: &str) -> u64 {
        self.counters.read().await.get(name).copied().unwrap_or(0)
    }

    pub async fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .read()
            .await
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        MetricsSnapshot {
            counters,
            uptime_secs: self.started.elapsed().as_secs(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter values plus process uptime, as reported by `/health`
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub counters: HashMap<String, u64>,
    pub uptime_secs: u64,
}

pub mod metrics {
    /// Simulator ticks executed by the fast loop
    pub const TICKS: &str = "ticks_total";
    /// Edge-triggered BUY/SELL transitions
    pub const SIGNALS_RAISED: &str = "signals_raised_total";
    pub const NOTIFICATIONS_SENT: &str = "notifications_sent_total";
    pub const NOTIFICATIONS_FAILED: &str = "notifications_failed_total";
    /// Digests delivered, scheduled or manual
    pub const REPORTS_SENT: &str = "reports_sent_total";
}
