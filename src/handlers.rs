use axum::{extract::State, response::Html, Json};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::types::{AlertRecord, MarketState, Portfolio};
use crate::AppState;

const DASHBOARD_HTML: &str = include_str!("../assets/dashboard.html");

/// GET / - Browser dashboard
pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// GET /api/cryptos - Full market snapshot
pub async fn get_cryptos(State(state): State<Arc<AppState>>) -> Json<CryptosResponse> {
    Json(CryptosResponse {
        cryptos: state.market_snapshot().await,
    })
}

/// GET /api/alerts - Most recent alerts, oldest first
pub async fn get_alerts(State(state): State<Arc<AppState>>) -> Json<AlertsResponse> {
    Json(AlertsResponse {
        alerts: state.recent_alerts().await,
    })
}

/// POST /api/test-alert - Synthesize and dispatch a fixed alert
pub async fn test_alert(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    info!("Manual test alert requested");
    let success = state.trigger_test_alert().await;
    Json(SuccessResponse { success })
}

/// POST /api/daily-report - Dispatch the digest now
pub async fn daily_report(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    info!("Manual digest requested");
    let success = state.send_report().await;
    Json(SuccessResponse { success })
}

/// POST /api/test-telegram - Connectivity check
pub async fn test_telegram(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    let success = state.notifier.send_test_message().await;
    state.metrics.record_delivery(success).await;
    Json(SuccessResponse { success })
}

/// POST /api/toggle-monitoring - Flip the background loops on or off
pub async fn toggle_monitoring(State(state): State<Arc<AppState>>) -> Json<MonitoringResponse> {
    Json(MonitoringResponse {
        monitoring: state.toggle_monitoring(),
    })
}

/// POST /api/portfolio-summary - Send a portfolio summary message
pub async fn portfolio_summary(
    State(state): State<Arc<AppState>>,
    Json(portfolio): Json<Portfolio>,
) -> Json<SuccessResponse> {
    let success = state.notifier.send_portfolio_summary(&portfolio).await;
    state.metrics.record_delivery(success).await;
    Json(SuccessResponse { success })
}

/// GET /health - Service status and counters
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let metrics = state.metrics.snapshot().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        monitoring: state.is_monitoring(),
        uptime_secs: metrics.uptime_secs,
        counters: metrics.counters,
    })
}

// Response types
#[derive(Debug, Serialize)]
pub struct CryptosResponse {
    pub cryptos: Vec<MarketState>,
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<AlertRecord>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct MonitoringResponse {
    pub monitoring: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub monitoring: bool,
    pub uptime_secs: u64,
    pub counters: HashMap<String, u64>,
}
