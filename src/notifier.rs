//! Outbound notifications to a Telegram chat
//!
//! The notifier is stateless: it formats and sends, and reports the outcome
//! as a boolean. Keeping a record of what was sent is the caller's job.

use chrono::Local;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::config::TelegramSettings;
use crate::messages;
use crate::types::{NotifyError, Portfolio, ReportRow, SignalEvent};

/// Delivery seam for formatted messages.
///
/// Only `send_message` talks to the network; the higher-level operations are
/// templates on top of it. Implementations must never panic and must fold
/// every failure into `false`.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver raw HTML text; `true` on a 2xx response
    async fn send_message(&self, text: &str) -> bool;

    /// Notify about a symbol entering a BUY or SELL state
    async fn send_alert(&self, event: &SignalEvent) -> bool {
        self.send_message(&messages::alert(event, Local::now())).await
    }

    /// Send the aggregate market digest
    async fn send_daily_report(&self, rows: &[ReportRow]) -> bool {
        self.send_message(&messages::daily_report(rows, Local::now())).await
    }

    /// Static connectivity check
    async fn send_test_message(&self) -> bool {
        self.send_message(&messages::connectivity_check()).await
    }

    async fn send_portfolio_summary(&self, portfolio: &Portfolio) -> bool {
        self.send_message(&messages::portfolio_summary(portfolio, Local::now()))
            .await
    }
}

/// Telegram Bot API client
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    base_url: String,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramNotifier {
    pub fn new(settings: &TelegramSettings) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            bot_token: non_empty(settings.bot_token.as_deref()),
            chat_id: non_empty(settings.chat_id.as_deref()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }

    /// Send and surface the failure reason
    pub async fn try_send(&self, text: &str) -> Result<(), NotifyError> {
        let (token, chat_id) = match (&self.bot_token, &self.chat_id) {
            (Some(token), Some(chat_id)) => (token, chat_id),
            _ => return Err(NotifyError::NotConfigured),
        };

        let url = format!("{}/bot{}/sendMessage", self.base_url, token);
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        let response = self.client.post(&url).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status { status, body });
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, text: &str) -> bool {
        match self.try_send(text).await {
            Ok(()) => {
                debug!("✓ Telegram message sent");
                true
            }
            Err(NotifyError::NotConfigured) => {
                warn!("Telegram not configured, message dropped");
                false
            }
            Err(e) => {
                error!("✗ Failed to send Telegram message: {}", e);
                false
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(token: Option<&str>, chat: Option<&str>) -> TelegramSettings {
        TelegramSettings {
            bot_token: token.map(str::to_string),
            chat_id: chat.map(str::to_string),
            api_base_url: "https://api.telegram.org/".to_string(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn test_blank_credentials_are_unconfigured() {
        let notifier = TelegramNotifier::new(&settings(Some("  "), Some("123"))).unwrap();
        assert!(!notifier.is_configured());

        let notifier = TelegramNotifier::new(&settings(Some("abc"), Some("123"))).unwrap();
        assert!(notifier.is_configured());
        assert_eq!(notifier.base_url, "https://api.telegram.org");
    }

    #[tokio::test]
    async fn test_unconfigured_send_returns_false() {
        let notifier = TelegramNotifier::new(&settings(None, None)).unwrap();
        assert!(matches!(
            notifier.try_send("hi").await,
            Err(NotifyError::NotConfigured)
        ));
        assert!(!notifier.send_test_message().await);
    }
}
