//! Periodic background loops
//!
//! Both loops live for the whole process. While monitoring is paused they keep
//! sleeping and skip their work; the flag is read again after every sleep, so
//! a toggle takes effect at the next boundary.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::AppState;

/// Spawn the fast loop driving simulator ticks
pub fn spawn_tick_loop(state: Arc<AppState>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Tick loop started (every {:?})", interval);
        loop {
            if state.is_monitoring() {
                let tick_state = Arc::clone(&state);
                // A panicking tick must not take the loop down with it
                match tokio::spawn(async move { tick_state.run_tick().await }).await {
                    Ok(raised) => debug!(raised, "Tick complete"),
                    Err(e) => error!("Tick failed: {}", e),
                }
            }
            sleep(interval).await;
        }
    })
}

/// Spawn the slow loop driving digest reports
pub fn spawn_report_loop(state: Arc<AppState>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Report loop started (every {:?})", interval);
        loop {
            if state.is_monitoring() {
                info!("Sending scheduled report...");
                let report_state = Arc::clone(&state);
                match tokio::spawn(async move { report_state.send_report().await }).await {
                    Ok(sent) => debug!(sent, "Scheduled report dispatched"),
                    Err(e) => error!("Scheduled report failed: {}", e),
                }
            }
            sleep(interval).await;
        }
    })
}
