//! Monitoring operations over the shared state
//!
//! Every method copies what it needs out of the locks before calling the
//! notifier, so dashboard reads never wait on Telegram.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::observability::metrics;
use crate::types::{AlertRecord, MarketState, SignalEvent, SignalType};
use crate::AppState;

/// Fixed payload of the manual test alert
pub fn test_alert_event() -> SignalEvent {
    SignalEvent {
        symbol: "TEST".to_string(),
        signal: SignalType::Buy,
        price: 0.00001234,
        oscillator: 25.5,
        volume: 1_000_000.0,
        confidence: 85.0,
    }
}

impl AppState {
    /// Advance the simulator once and notify every edge-triggered signal.
    ///
    /// Each alert is dispatched on its own task. A dispatch that panics is
    /// still logged as undelivered and the remaining events go out.
    /// Returns the number of alerts raised.
    pub async fn run_tick(self: &Arc<Self>) -> usize {
        let events = {
            let mut market = self.market.write().await;
            market.tick()
        };
        self.metrics.increment(metrics::TICKS, 1).await;

        let raised = events.len();
        for event in events {
            self.metrics.increment(metrics::SIGNALS_RAISED, 1).await;
            info!(
                symbol = %event.symbol,
                signal = %event.signal,
                price = event.price,
                rsi = event.oscillator,
                "Signal raised"
            );

            let state = Arc::clone(self);
            let pending = event.clone();
            let dispatch = tokio::spawn(async move { state.dispatch_alert(pending).await });
            if let Err(e) = dispatch.await {
                error!(symbol = %event.symbol, "Alert dispatch failed: {}", e);
                self.metrics.record_delivery(false).await;
                self.alerts
                    .write()
                    .await
                    .push(AlertRecord::from_event(&event, false));
            }
        }
        raised
    }

    /// Send an alert and append it to the log whatever the outcome
    pub async fn dispatch_alert(&self, event: SignalEvent) -> bool {
        let delivered = self.notifier.send_alert(&event).await;
        self.metrics.record_delivery(delivered).await;
        if !delivered {
            warn!(symbol = %event.symbol, "Alert notification not delivered");
        }

        let record = AlertRecord::from_event(&event, delivered);
        self.alerts.write().await.push(record);
        delivered
    }

    /// Synthesize the fixed test alert
    pub async fn trigger_test_alert(&self) -> bool {
        self.dispatch_alert(test_alert_event()).await
    }

    /// Send the digest built from the current market snapshot
    pub async fn send_report(&self) -> bool {
        let rows = self.market.read().await.report_rows();
        let sent = self.notifier.send_daily_report(&rows).await;
        if sent {
            self.metrics.increment(metrics::REPORTS_SENT, 1).await;
        } else {
            warn!("Digest report not delivered");
        }
        self.metrics.record_delivery(sent).await;
        sent
    }

    pub async fn market_snapshot(&self) -> Vec<MarketState> {
        self.market.read().await.snapshot()
    }

    /// Most recent alerts within the configured window, oldest first
    pub async fn recent_alerts(&self) -> Vec<AlertRecord> {
        self.alerts.read().await.recent(self.alert_window)
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring.load(Ordering::SeqCst)
    }

    /// Flip the monitoring flag and return the new value
    pub fn toggle_monitoring(&self) -> bool {
        let active = !self.monitoring.fetch_xor(true, Ordering::SeqCst);
        info!(active, "Monitoring toggled");
        active
    }
}
