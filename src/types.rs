use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trading signal raised when the oscillator leaves the neutral band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    /// Oscillator below the oversold threshold
    Buy,
    /// Oscillator above the overbought threshold
    Sell,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Buy => "BUY",
            SignalType::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simulated market state for one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketState {
    pub symbol: String,
    pub price: f64,
    #[serde(rename = "change24h")]
    pub change_24h: f64,
    /// RSI-like oscillator, always within [0, 100]
    #[serde(rename = "rsi")]
    pub oscillator: f64,
    pub volume: f64,
    /// `None` while the oscillator sits in the neutral band
    pub signal: Option<SignalType>,
}

/// Edge-triggered signal produced by a simulator tick
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub symbol: String,
    pub signal: SignalType,
    pub price: f64,
    pub oscillator: f64,
    pub volume: f64,
    pub confidence: f64,
}

/// Entry of the append-only alert log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub signal: SignalType,
    pub price: f64,
    #[serde(rename = "rsi")]
    pub oscillator: f64,
    pub confidence: f64,
    pub volume: f64,
    /// Whether the Telegram notification for this alert went through
    pub delivered: bool,
}

impl AlertRecord {
    pub fn from_event(event: &SignalEvent, delivered: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            symbol: event.symbol.clone(),
            signal: event.signal,
            price: event.price,
            oscillator: event.oscillator,
            confidence: event.confidence,
            volume: event.volume,
            delivered,
        }
    }
}

/// Per-symbol row of the periodic digest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub symbol: String,
    #[serde(rename = "change24h")]
    pub change_24h: f64,
    #[serde(rename = "rsi")]
    pub oscillator: f64,
    pub signal: Option<SignalType>,
}

impl From<&MarketState> for ReportRow {
    fn from(state: &MarketState) -> Self {
        Self {
            symbol: state.symbol.clone(),
            change_24h: state.change_24h,
            oscillator: state.oscillator,
            signal: state.signal,
        }
    }
}

/// Portfolio snapshot for the on-demand summary message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default)]
    pub total_value: f64,
    /// 24h change of the whole portfolio, in percent
    #[serde(default)]
    pub total_change: f64,
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub value: f64,
    #[serde(rename = "change24h", default)]
    pub change_24h: f64,
}

/// Error types for Telegram delivery
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Telegram credentials are not configured")]
    NotConfigured,

    #[error("Telegram request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Telegram API error ({status}): {body}")]
    Status { status: u16, body: String },
}

