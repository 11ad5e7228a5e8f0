//! Random-walk market simulator

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::signal;
use crate::types::{MarketState, ReportRow, SignalEvent};

/// Bounds of the per-tick random walk
#[derive(Debug, Clone, Copy)]
pub struct SimulationParams {
    /// Max absolute price move per tick, in percent
    pub price_step_pct: f64,
    /// Max absolute change24h drift per tick, in percentage points
    pub change_step: f64,
    /// Max absolute oscillator move per tick
    pub oscillator_step: f64,
    /// Centre of the confidence attached to raised signals
    pub base_confidence: f64,
    /// Max absolute deviation around `base_confidence`
    pub confidence_jitter: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            price_step_pct: 0.5,
            change_step: 0.1,
            oscillator_step: 2.0,
            base_confidence: 85.0,
            confidence_jitter: 5.0,
        }
    }
}

/// Random draws applied to one symbol in one tick
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Step {
    pub price_pct: f64,
    pub change: f64,
    pub oscillator: f64,
    pub confidence: f64,
}

/// (symbol, price, change24h, oscillator, volume)
const SEED: [(&str, f64, f64, f64, f64); 7] = [
    ("JASMY", 0.00604622, -0.10, 53.06, 1_250_000.0),
    ("MOG", 0.00000085, 4.31, 30.99, 890_000.0),
    ("VISTA", 0.03106417, 0.02, 71.50, 450_000.0),
    ("XTZ", 0.79112302, -2.25, 74.34, 320_000.0),
    ("TRUMP", 0.03296450, 1.08, 52.67, 780_000.0),
    ("PEPE", 0.00000077, 3.85, 32.74, 2_100_000.0),
    ("WLFI", 0.00071164, -1.82, 70.35, 150_000.0),
];

/// Owns the simulated state of every tracked symbol, in insertion order
pub struct MarketSimulator {
    markets: Vec<MarketState>,
    params: SimulationParams,
    rng: StdRng,
}

impl MarketSimulator {
    /// Simulator over the built-in symbol set
    pub fn new() -> Self {
        Self::with_markets(
            seed_markets(),
            SimulationParams::default(),
            StdRng::from_entropy(),
        )
    }

    /// Deterministic simulator for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self::with_markets(
            seed_markets(),
            SimulationParams::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    pub fn with_markets(
        mut markets: Vec<MarketState>,
        params: SimulationParams,
        rng: StdRng,
    ) -> Self {
        for market in &mut markets {
            market.oscillator = market.oscillator.clamp(0.0, 100.0);
            market.signal = signal::classify(market.oscillator);
        }
        Self { markets, params, rng }
    }

    pub fn set_params(&mut self, params: SimulationParams) {
        self.params = params;
    }

    /// Advance every symbol by one random step.
    ///
    /// Returns one event per symbol whose signal changed into BUY or SELL.
    pub fn tick(&mut self) -> Vec<SignalEvent> {
        let mut events = Vec::new();
        for idx in 0..self.markets.len() {
            let step = self.draw_step();
            if let Some(event) = self.apply_step(idx, step) {
                events.push(event);
            }
        }
        events
    }

    fn draw_step(&mut self) -> Step {
        let p = self.params;
        Step {
            price_pct: symmetric(&mut self.rng, p.price_step_pct),
            change: symmetric(&mut self.rng, p.change_step),
            oscillator: symmetric(&mut self.rng, p.oscillator_step),
            confidence: p.base_confidence + symmetric(&mut self.rng, p.confidence_jitter),
        }
    }

    pub(crate) fn apply_step(&mut self, idx: usize, step: Step) -> Option<SignalEvent> {
        let market = self.markets.get_mut(idx)?;

        market.price *= 1.0 + step.price_pct / 100.0;
        // change24h drifts without bound
        market.change_24h += step.change;
        market.oscillator = (market.oscillator + step.oscillator).clamp(0.0, 100.0);

        let previous = market.signal;
        market.signal = signal::classify(market.oscillator);

        let raised = signal::edge(previous, market.signal)?;
        debug!(
            symbol = %market.symbol,
            signal = %raised,
            rsi = market.oscillator,
            "Signal transition"
        );
        Some(SignalEvent {
            symbol: market.symbol.clone(),
            signal: raised,
            price: market.price,
            oscillator: market.oscillator,
            volume: market.volume,
            confidence: step.confidence,
        })
    }

    /// Copy of the current state of every symbol
    pub fn snapshot(&self) -> Vec<MarketState> {
        self.markets.clone()
    }

    /// Digest rows for the periodic report
    pub fn report_rows(&self) -> Vec<ReportRow> {
        self.markets.iter().map(ReportRow::from).collect()
    }
}

impl Default for MarketSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in starting state
pub fn seed_markets() -> Vec<MarketState> {
    SEED.iter()
        .map(|&(symbol, price, change_24h, oscillator, volume)| MarketState {
            symbol: symbol.to_string(),
            price,
            change_24h,
            oscillator,
            volume,
            signal: signal::classify(oscillator),
        })
        .collect()
}

fn symmetric(rng: &mut StdRng, bound: f64) -> f64 {
    if bound <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-bound..=bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignalType;

    fn single(oscillator: f64) -> MarketSimulator {
        let market = MarketState {
            symbol: "AAA".to_string(),
            price: 1.0,
            change_24h: 0.0,
            oscillator,
            volume: 1000.0,
            signal: None,
        };
        MarketSimulator::with_markets(
            vec![market],
            SimulationParams::default(),
            StdRng::seed_from_u64(7),
        )
    }

    fn move_to(sim: &mut MarketSimulator, target: f64) -> Option<SignalEvent> {
        let current = sim.markets[0].oscillator;
        sim.apply_step(
            0,
            Step {
                oscillator: target - current,
                confidence: 85.0,
                ..Step::default()
            },
        )
    }

    #[test]
    fn test_seed_signals_follow_threshold_rule() {
        let snapshot = MarketSimulator::seeded(1).snapshot();
        let symbols: Vec<_> = snapshot.iter().map(|m| m.symbol.as_str()).collect();
        assert_eq!(
            symbols,
            vec!["JASMY", "MOG", "VISTA", "XTZ", "TRUMP", "PEPE", "WLFI"]
        );

        let signals: Vec<_> = snapshot.iter().map(|m| m.signal).collect();
        let sell = Some(SignalType::Sell);
        assert_eq!(signals, vec![None, None, sell, sell, None, None, sell]);
    }

    #[test]
    fn test_oscillator_stays_clamped_under_wide_steps() {
        let mut sim = MarketSimulator::seeded(42);
        sim.set_params(SimulationParams {
            oscillator_step: 250.0,
            ..SimulationParams::default()
        });

        for _ in 0..500 {
            sim.tick();
            for market in sim.snapshot() {
                assert!((0.0..=100.0).contains(&market.oscillator), "{}", market.oscillator);
                assert_eq!(market.signal, signal::classify(market.oscillator));
            }
        }
    }

    #[test]
    fn test_volume_is_constant_and_price_positive() {
        let mut sim = MarketSimulator::seeded(3);
        let before = sim.snapshot();
        for _ in 0..200 {
            sim.tick();
        }
        for (old, new) in before.iter().zip(sim.snapshot()) {
            assert_eq!(old.volume, new.volume);
            assert!(new.price > 0.0);
        }
    }

    #[test]
    fn test_edge_trigger_sequence() {
        let mut sim = single(50.0);

        // NONE, BUY, BUY, NONE, BUY
        let fired: Vec<bool> = [50.0, 25.0, 20.0, 45.0, 28.0]
            .iter()
            .map(|t| move_to(&mut sim, *t).is_some())
            .collect();

        assert_eq!(fired, vec![false, true, false, false, true]);
    }

    #[test]
    fn test_event_carries_post_tick_values() {
        let mut sim = single(31.0);
        let event = sim
            .apply_step(
                0,
                Step {
                    price_pct: 10.0,
                    change: 0.05,
                    oscillator: -3.0,
                    confidence: 88.0,
                },
            )
            .expect("should cross into BUY");

        assert_eq!(event.symbol, "AAA");
        assert_eq!(event.signal, SignalType::Buy);
        assert!((event.price - 1.1).abs() < 1e-12);
        assert!((event.oscillator - 28.0).abs() < 1e-12);
        assert_eq!(event.volume, 1000.0);
        assert_eq!(event.confidence, 88.0);
    }

    #[test]
    fn test_clamp_at_bounds() {
        let mut sim = single(1.0);
        sim.apply_step(0, Step { oscillator: -40.0, ..Step::default() });
        assert_eq!(sim.markets[0].oscillator, 0.0);

        sim.apply_step(0, Step { oscillator: 400.0, ..Step::default() });
        assert_eq!(sim.markets[0].oscillator, 100.0);
        assert_eq!(sim.markets[0].signal, Some(SignalType::Sell));
    }

    #[test]
    fn test_change_24h_drifts_unclamped() {
        let mut sim = single(50.0);
        for _ in 0..100 {
            sim.apply_step(0, Step { change: 5.0, ..Step::default() });
        }
        assert!((sim.markets[0].change_24h - 500.0).abs() < 1e-9);
    }
}
