//! Telegram message templates (HTML parse mode)

use chrono::{DateTime, Local};

use crate::types::{Portfolio, ReportRow, SignalEvent, SignalType};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const FOOTER: &str = "Signal Monitor - Market Intelligence";

/// Aggregate statistics behind the periodic digest
#[derive(Debug, Clone, PartialEq)]
pub struct DigestStats {
    pub total: usize,
    pub gainers: usize,
    pub losers: usize,
    pub avg_oscillator: f64,
    pub buy_signals: usize,
    pub sell_signals: usize,
    /// (symbol, change24h) of the best performer; first wins ties
    pub best: Option<(String, f64)>,
    /// (symbol, change24h) of the worst performer; first wins ties
    pub worst: Option<(String, f64)>,
}

impl DigestStats {
    pub fn compute(rows: &[ReportRow]) -> Self {
        let total = rows.len();
        let gainers = rows.iter().filter(|r| r.change_24h > 0.0).count();
        let avg_oscillator = if total > 0 {
            rows.iter().map(|r| r.oscillator).sum::<f64>() / total as f64
        } else {
            0.0
        };

        let mut best: Option<&ReportRow> = None;
        let mut worst: Option<&ReportRow> = None;
        for row in rows {
            if best.map_or(true, |b| row.change_24h > b.change_24h) {
                best = Some(row);
            }
            if worst.map_or(true, |w| row.change_24h < w.change_24h) {
                worst = Some(row);
            }
        }

        Self {
            total,
            gainers,
            losers: total - gainers,
            avg_oscillator,
            buy_signals: rows.iter().filter(|r| r.signal == Some(SignalType::Buy)).count(),
            sell_signals: rows.iter().filter(|r| r.signal == Some(SignalType::Sell)).count(),
            best: best.map(|r| (r.symbol.clone(), r.change_24h)),
            worst: worst.map(|r| (r.symbol.clone(), r.change_24h)),
        }
    }
}

pub fn alert(event: &SignalEvent, at: DateTime<Local>) -> String {
    let (emoji, action) = match event.signal {
        SignalType::Buy => ("🟢", "ENTRY RECOMMENDED"),
        SignalType::Sell => ("🔴", "EXIT RECOMMENDED"),
    };

    format!(
        "\n{emoji} <b>{signal} ALERT</b> {emoji}\n\n\
         <b>Symbol:</b> {symbol}\n\
         <b>Price:</b> $ {price:.8}\n\
         <b>RSI:</b> {rsi:.2}\n\
         <b>Volume:</b> {volume}\n\
         <b>Confidence:</b> {confidence:.1}%\n\n\
         <b>Action:</b> {action}\n\
         <b>Time:</b> {time}\n\n\
         {RULE}\n\
         {FOOTER}\n",
        signal = event.signal,
        symbol = event.symbol,
        price = event.price,
        rsi = event.oscillator,
        volume = group_thousands(event.volume, 0),
        confidence = event.confidence,
        time = at.format("%H:%M:%S"),
    )
}

pub fn daily_report(rows: &[ReportRow], at: DateTime<Local>) -> String {
    let stats = DigestStats::compute(rows);
    let performer = |p: &Option<(String, f64)>| match p {
        Some((symbol, change)) => format!("{} ({:+.2}%)", symbol, change),
        None => "N/A".to_string(),
    };

    let mut message = format!(
        "\n📊 <b>DAILY REPORT - Signal Monitor</b> 📊\n\n\
         <b>Date:</b> {date}\n\n\
         {RULE}\n\n\
         <b>MARKET SUMMARY:</b>\n\
         • Symbols analysed: {total}\n\
         • Gainers: {gainers} 📈\n\
         • Losers: {losers} 📉\n\
         • Average RSI: {avg:.2}\n\n\
         <b>SIGNALS DETECTED:</b>\n\
         • BUY signals: {buys} 🟢\n\
         • SELL signals: {sells} 🔴\n\n\
         <b>PERFORMANCE:</b>\n\
         • Best: {best}\n\
         • Worst: {worst}\n\n\
         {RULE}\n\n\
         <b>RECOMMENDATIONS:</b>\n",
        date = at.format("%d/%m/%Y %H:%M:%S"),
        total = stats.total,
        gainers = stats.gainers,
        losers = stats.losers,
        avg = stats.avg_oscillator,
        buys = stats.buy_signals,
        sells = stats.sell_signals,
        best = performer(&stats.best),
        worst = performer(&stats.worst),
    );

    if stats.buy_signals > 0 {
        message.push_str(&format!(
            "\n✓ {} BUY opportunities identified",
            stats.buy_signals
        ));
    }
    if stats.sell_signals > 0 {
        message.push_str(&format!(
            "\n✓ {} SELL opportunities identified",
            stats.sell_signals
        ));
    }
    message.push_str("\n\n💡 Check the dashboard for details!");

    message
}

pub fn connectivity_check() -> String {
    "\n✅ <b>Signal Monitor - Connectivity Test</b> ✅\n\n\
     The Telegram integration is <b>working correctly!</b>\n\n\
     You will receive BUY/SELL alerts and periodic reports in this chat.\n\n\
     🔔 Enable notifications so you never miss an alert!\n"
        .to_string()
}

pub fn portfolio_summary(portfolio: &Portfolio, at: DateTime<Local>) -> String {
    let mut message = format!(
        "\n💼 <b>PORTFOLIO SUMMARY</b> 💼\n\n\
         <b>Time:</b> {time}\n\n\
         <b>Total value:</b> $ {value}\n\
         <b>24h change:</b> {change:+.2}%\n\n\
         <b>HOLDINGS:</b>\n",
        time = at.format("%H:%M:%S"),
        value = group_thousands(portfolio.total_value, 2),
        change = portfolio.total_change,
    );

    for holding in &portfolio.holdings {
        let emoji = if holding.change_24h > 0.0 { "📈" } else { "📉" };
        message.push_str(&format!(
            "\n• {}: {:.8} ($ {}) {} {:+.2}%",
            holding.symbol,
            holding.amount,
            group_thousands(holding.value, 2),
            emoji,
            holding.change_24h,
        ));
    }

    message
}

/// Format with `decimals` places and comma-separated thousands
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Holding;

    fn row(symbol: &str, change: f64, rsi: f64, signal: Option<SignalType>) -> ReportRow {
        ReportRow {
            symbol: symbol.to_string(),
            change_24h: change,
            oscillator: rsi,
            signal,
        }
    }

    #[test]
    fn test_digest_best_and_worst() {
        let rows = vec![row("A", 5.0, 50.0, None), row("B", -3.0, 50.0, None)];
        let stats = DigestStats::compute(&rows);

        assert_eq!(stats.best, Some(("A".to_string(), 5.0)));
        assert_eq!(stats.worst, Some(("B".to_string(), -3.0)));
        assert_eq!(stats.gainers, 1);
        assert_eq!(stats.losers, 1);
    }

    #[test]
    fn test_digest_ties_keep_first() {
        let rows = vec![
            row("X", 2.0, 10.0, Some(SignalType::Buy)),
            row("Y", 2.0, 80.0, Some(SignalType::Sell)),
            row("Z", 0.0, 60.0, None),
            row("W", 0.0, 50.0, None),
        ];
        let stats = DigestStats::compute(&rows);

        assert_eq!(stats.best.as_ref().map(|b| b.0.as_str()), Some("X"));
        assert_eq!(stats.worst.as_ref().map(|w| w.0.as_str()), Some("Z"));
        // zero change counts as a loser
        assert_eq!(stats.gainers, 2);
        assert_eq!(stats.losers, 2);
        assert_eq!(stats.buy_signals, 1);
        assert_eq!(stats.sell_signals, 1);
        assert!((stats.avg_oscillator - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_digest_empty_input() {
        let stats = DigestStats::compute(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.avg_oscillator, 0.0);
        assert!(stats.best.is_none());

        let text = daily_report(&[], Local::now());
        assert!(text.contains("Best: N/A"));
        assert!(!text.contains("opportunities"));
    }

    #[test]
    fn test_daily_report_text() {
        let rows = vec![
            row("A", 5.0, 25.0, Some(SignalType::Buy)),
            row("B", -3.0, 75.0, Some(SignalType::Sell)),
        ];
        let text = daily_report(&rows, Local::now());

        assert!(text.contains("Symbols analysed: 2"));
        assert!(text.contains("Best: A (+5.00%)"));
        assert!(text.contains("Worst: B (-3.00%)"));
        assert!(text.contains("Average RSI: 50.00"));
        assert!(text.contains("1 BUY opportunities"));
        assert!(text.contains("1 SELL opportunities"));
    }

    #[test]
    fn test_alert_text() {
        let event = SignalEvent {
            symbol: "PEPE".to_string(),
            signal: SignalType::Sell,
            price: 0.00000077,
            oscillator: 71.234,
            volume: 2_100_000.0,
            confidence: 84.56,
        };
        let text = alert(&event, Local::now());

        assert!(text.contains("🔴 <b>SELL ALERT</b> 🔴"));
        assert!(text.contains("<b>Price:</b> $ 0.00000077"));
        assert!(text.contains("<b>RSI:</b> 71.23"));
        assert!(text.contains("<b>Volume:</b> 2,100,000"));
        assert!(text.contains("<b>Confidence:</b> 84.6%"));
        assert!(text.contains("EXIT RECOMMENDED"));
    }

    #[test]
    fn test_portfolio_lines() {
        let portfolio = Portfolio {
            total_value: 12_345.678,
            total_change: -1.5,
            holdings: vec![Holding {
                symbol: "XTZ".to_string(),
                amount: 10.0,
                value: 7.91,
                change_24h: 2.0,
            }],
        };
        let text = portfolio_summary(&portfolio, Local::now());

        assert!(text.contains("<b>Total value:</b> $ 12,345.68"));
        assert!(text.contains("<b>24h change:</b> -1.50%"));
        assert!(text.contains("• XTZ: 10.00000000 ($ 7.91) 📈 +2.00%"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0, 0), "0");
        assert_eq!(group_thousands(999.0, 0), "999");
        assert_eq!(group_thousands(1000.0, 0), "1,000");
        assert_eq!(group_thousands(1_250_000.0, 0), "1,250,000");
        assert_eq!(group_thousands(-1234.5, 2), "-1,234.50");
        assert_eq!(group_thousands(-0.001, 2), "0.00");
    }
}
