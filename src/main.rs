use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use signal_monitor::{
    config::{AppConfig, LoggingSettings},
    scheduler, AppState, MarketSimulator, TelegramNotifier,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    info!("Starting Signal Monitor...");
    info!("Telegram token: {}", config.telegram.masked_token());
    info!(
        "Telegram chat: {}",
        config.telegram.chat_id.as_deref().unwrap_or("<unset>")
    );

    let notifier = TelegramNotifier::new(&config.telegram)?;
    if notifier.is_configured() {
        info!("✓ Telegram notifier initialized");
    } else {
        warn!("⚠ Telegram credentials missing, notifications will fail until configured");
    }

    let state = Arc::new(AppState::new(
        MarketSimulator::new(),
        Arc::new(notifier),
        config.monitor.alert_window,
        config.monitor.start_active,
    ));

    scheduler::spawn_tick_loop(state.clone(), config.monitor.tick_interval());
    scheduler::spawn_report_loop(state.clone(), config.monitor.report_interval());
    info!("✓ Background loops started");

    let app = signal_monitor::app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("🚀 Signal Monitor listening on {}", config.bind_addr());

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_str()));

    if settings.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
