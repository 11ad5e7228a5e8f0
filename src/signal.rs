//! Oscillator threshold rule and edge detection
//!
//! Each symbol is a three-state machine (none / BUY / SELL) re-evaluated on
//! every tick. A notification fires only when the machine moves into a
//! non-neutral state it was not already in.

use crate::types::SignalType;

/// Oscillator values strictly below this are oversold
pub const OVERSOLD_THRESHOLD: f64 = 30.0;
/// Oscillator values strictly above this are overbought
pub const OVERBOUGHT_THRESHOLD: f64 = 70.0;

/// Map an oscillator reading to its signal state
pub fn classify(oscillator: f64) -> Option<SignalType> {
    if oscillator < OVERSOLD_THRESHOLD {
        Some(SignalType::Buy)
    } else if oscillator > OVERBOUGHT_THRESHOLD {
        Some(SignalType::Sell)
    } else {
        None
    }
}

/// Returns the signal to notify about when moving from `previous` to `next`.
///
/// Staying in the same state or falling back to neutral never notifies.
pub fn edge(previous: Option<SignalType>, next: Option<SignalType>) -> Option<SignalType> {
    match next {
        Some(signal) if previous != Some(signal) => Some(signal),
        _ => None,
    }
}
