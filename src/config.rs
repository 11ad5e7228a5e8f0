//! Service configuration
//!
//! Layered: built-in defaults, then `config/default.toml`, then
//! `config/<SIGNAL_MONITOR_ENV>.toml`, then `SIGNAL_MONITOR__*` environment
//! variables. A plain `PORT` variable overrides `server.port`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub telegram: TelegramSettings,
    pub monitor: MonitorSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSettings {
    /// Bot token; sends fail while unset
    #[serde(default)]
    pub bot_token: Option<String>,
    /// Recipient chat id; sends fail while unset
    #[serde(default)]
    pub chat_id: Option<String>,
    pub api_base_url: String,
    pub timeout_secs: u64,
}

impl TelegramSettings {
    /// Token prefix safe to print in logs
    pub fn masked_token(&self) -> String {
        match self.bot_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => {
                let prefix: String = token.chars().take(6).collect();
                format!("{}…", prefix)
            }
            _ => "<unset>".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSettings {
    /// Seconds between simulator ticks
    pub tick_interval_secs: u64,
    /// Seconds between digest reports
    pub report_interval_secs: u64,
    /// Number of alerts returned by the alerts endpoint
    pub alert_window: usize,
    /// Whether the loops start active
    pub start_active: bool,
}

impl MonitorSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the `config` directory and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let env_name =
            std::env::var("SIGNAL_MONITOR_ENV").unwrap_or_else(|_| "development".to_string());

        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("telegram.api_base_url", "https://api.telegram.org")?
            .set_default("telegram.timeout_secs", 10)?
            .set_default("monitor.tick_interval_secs", 5)?
            .set_default("monitor.report_interval_secs", 1200)?
            .set_default("monitor.alert_window", 20)?
            .set_default("monitor.start_active", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", env_name))).required(false))
            .add_source(
                Environment::with_prefix("SIGNAL_MONITOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?
            .try_deserialize()
    }

    /// Defaults only, for tests and embedding
    pub fn defaults() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            telegram: TelegramSettings {
                bot_token: None,
                chat_id: None,
                api_base_url: "https://api.telegram.org".to_string(),
                timeout_secs: 10,
            },
            monitor: MonitorSettings {
                tick_interval_secs: 5,
                report_interval_secs: 1200,
                alert_window: 20,
                start_active: true,
            },
            logging: LoggingSettings::default(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_without_files() {
        let config = AppConfig::load_from("/nonexistent-config-dir").unwrap();
        assert_eq!(config.monitor.tick_interval_secs, 5);
        assert_eq!(config.monitor.report_interval_secs, 1200);
        assert_eq!(config.monitor.alert_window, 20);
        assert_eq!(config.telegram.timeout_secs, 10);
        assert_eq!(config.telegram.api_base_url, "https://api.telegram.org");
    }

    #[test]
    fn test_masked_token() {
        let mut telegram = AppConfig::defaults().telegram;
        assert_eq!(telegram.masked_token(), "<unset>");

        telegram.bot_token = Some("1234567890:SECRET".to_string());
        assert_eq!(telegram.masked_token(), "123456…");
    }

    #[test]
    fn test_bind_addr() {
        assert_eq!(AppConfig::defaults().bind_addr(), "0.0.0.0:5000");
    }
}
