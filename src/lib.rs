//! Signal Monitor
//!
//! Simulates a small crypto market, raises edge-triggered BUY/SELL signals
//! from an RSI-like oscillator, and relays alerts plus periodic digests to a
//! Telegram chat. State is exposed to a browser dashboard over HTTP.

pub mod alerts;
pub mod config;
pub mod handlers;
pub mod market;
pub mod messages;
pub mod monitor;
pub mod notifier;
pub mod observability;
pub mod scheduler;
pub mod signal;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use alerts::AlertLog;
pub use config::AppConfig;
pub use market::{MarketSimulator, SimulationParams};
pub use notifier::{Notifier, TelegramNotifier};
pub use observability::MetricsCollector;
pub use types::*;

/// Application state shared across handlers and background loops
pub struct AppState {
    /// Written only by the tick loop
    pub market: RwLock<MarketSimulator>,
    pub alerts: RwLock<AlertLog>,
    pub notifier: Arc<dyn Notifier>,
    pub metrics: MetricsCollector,
    /// Number of alerts exposed by the alerts endpoint
    pub alert_window: usize,
    monitoring: AtomicBool,
}

impl AppState {
    pub fn new(
        market: MarketSimulator,
        notifier: Arc<dyn Notifier>,
        alert_window: usize,
        start_active: bool,
    ) -> Self {
        Self {
            market: RwLock::new(market),
            alerts: RwLock::new(AlertLog::new()),
            notifier,
            metrics: MetricsCollector::new(),
            alert_window,
            monitoring: AtomicBool::new(start_active),
        }
    }
}

/// Build the API router
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/cryptos", get(handlers::get_cryptos))
        .route("/alerts", get(handlers::get_alerts))
        .route("/test-alert", post(handlers::test_alert))
        .route("/daily-report", post(handlers::daily_report))
        .route("/test-telegram", post(handlers::test_telegram))
        .route("/toggle-monitoring", post(handlers::toggle_monitoring))
        .route("/portfolio-summary", post(handlers::portfolio_summary));

    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
