//! Deterministic synthetic candle series.
//!
//! Two flavors:
//! - a seeded random walk with drift/volatility knobs, for demo runs and
//!   stress tests (`generate_series`);
//! - shaped deterministic builders (steady riser/faller) for scenario tests
//!   that need a known price path.
//!
//! The walk seed is derived with BLAKE3 from the symbol and the numeric
//! seed, so the same spec always produces the same series, on any platform.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stratsim_core::domain::{Candle, Timeframe};

/// Timestamp of the first synthetic candle (fixed so runs are reproducible).
pub const SERIES_START_MS: i64 = 1_690_000_000_000;

/// Parameters for the random-walk generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSpec {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub count: usize,
    pub start_price: f64,
    /// Mean close-to-close return per candle.
    pub drift: f64,
    /// Half-width of the uniform return noise around the drift.
    pub volatility: f64,
    pub seed: u64,
}

impl SyntheticSpec {
    pub fn new(symbol: &str, count: usize) -> Self {
        Self {
            symbol: symbol.to_string(),
            timeframe: Timeframe::H1,
            count,
            start_price: 100.0,
            drift: 0.0,
            volatility: 0.01,
            seed: 42,
        }
    }
}

/// Generates a seeded random-walk series.
///
/// Volume is drawn around 1000 with occasional multi-candle-scale surges so
/// volume-sensitive rules have something to react to.
pub fn generate_series(spec: &SyntheticSpec) -> Vec<Candle> {
    let mut rng = StdRng::from_seed(walk_seed(spec));
    let step_ms = spec.timeframe.duration_ms();
    let mut price = spec.start_price;

    (0..spec.count)
        .map(|i| {
            let step = if spec.volatility > 0.0 {
                spec.drift + rng.gen_range(-spec.volatility..spec.volatility)
            } else {
                spec.drift
            };
            let open = price;
            let close = price * (1.0 + step);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.005));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.005));
            let base_volume = rng.gen_range(800.0..1_200.0);
            let volume = if rng.gen_bool(0.08) {
                base_volume * rng.gen_range(3.0..6.0)
            } else {
                base_volume
            };
            price = close;

            Candle {
                symbol: spec.symbol.clone(),
                timestamp: SERIES_START_MS + i as i64 * step_ms,
                open,
                high,
                low,
                close,
                volume,
                timeframe: spec.timeframe,
            }
        })
        .collect()
}

/// A geometric riser: every close is `step` above the previous, highs and
/// lows in lockstep. ADX saturates and momentum stays positive on this path.
pub fn steady_riser(symbol: &str, timeframe: Timeframe, count: usize, step: f64) -> Vec<Candle> {
    shaped_walk(symbol, timeframe, count, step)
}

/// Mirror of [`steady_riser`]: every close is `step` below the previous.
pub fn steady_faller(symbol: &str, timeframe: Timeframe, count: usize, step: f64) -> Vec<Candle> {
    shaped_walk(symbol, timeframe, count, -step)
}

fn shaped_walk(symbol: &str, timeframe: Timeframe, count: usize, step: f64) -> Vec<Candle> {
    let step_ms = timeframe.duration_ms();
    let mut price = 100.0;

    (0..count)
        .map(|i| {
            let open = price;
            let close = price * (1.0 + step);
            let high = open.max(close) * 1.005;
            let low = open.min(close) * 0.995;
            price = close;

            Candle {
                symbol: symbol.to_string(),
                timestamp: SERIES_START_MS + i as i64 * step_ms,
                open,
                high,
                low,
                close,
                volume: 1_000.0,
                timeframe,
            }
        })
        .collect()
}

fn walk_seed(spec: &SyntheticSpec) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(spec.symbol.as_bytes());
    hasher.update(&spec.seed.to_le_bytes());
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_spec_same_series() {
        let spec = SyntheticSpec::new("SYN", 120);
        assert_eq!(generate_series(&spec), generate_series(&spec));
    }

    #[test]
    fn seed_and_symbol_change_the_series() {
        let base = SyntheticSpec::new("SYN", 60);
        let reseeded = SyntheticSpec {
            seed: 43,
            ..base.clone()
        };
        let renamed = SyntheticSpec {
            symbol: "OTHER".to_string(),
            ..base.clone()
        };

        let base_series = generate_series(&base);
        assert_ne!(base_series, generate_series(&reseeded));
        // Closes differ even though the symbol field obviously differs.
        let renamed_series = generate_series(&renamed);
        let base_closes: Vec<f64> = base_series.iter().map(|c| c.close).collect();
        let renamed_closes: Vec<f64> = renamed_series.iter().map(|c| c.close).collect();
        assert_ne!(base_closes, renamed_closes);
    }

    #[test]
    fn generated_candles_are_sane_and_ordered() {
        let spec = SyntheticSpec::new("SYN", 200);
        let candles = generate_series(&spec);

        assert_eq!(candles.len(), 200);
        for candle in &candles {
            assert!(candle.is_sane());
        }
        for pair in candles.windows(2) {
            assert_eq!(
                pair[1].timestamp - pair[0].timestamp,
                Timeframe::H1.duration_ms()
            );
            // Each candle opens where the last one closed.
            assert_eq!(pair[1].open, pair[0].close);
        }
    }

    #[test]
    fn zero_volatility_walk_is_pure_drift() {
        let spec = SyntheticSpec {
            drift: 0.01,
            volatility: 0.0,
            ..SyntheticSpec::new("SYN", 10)
        };
        let candles = generate_series(&spec);

        for (i, candle) in candles.iter().enumerate() {
            let expected = 100.0 * 1.01_f64.powi(i as i32 + 1);
            assert!((candle.close - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn riser_and_faller_are_monotonic() {
        let up = steady_riser("UP", Timeframe::H1, 80, 0.01);
        for pair in up.windows(2) {
            assert!(pair[1].close > pair[0].close);
            assert!(pair[1].high > pair[0].high);
            assert!(pair[1].low > pair[0].low);
        }

        let down = steady_faller("DOWN", Timeframe::H1, 80, 0.01);
        for pair in down.windows(2) {
            assert!(pair[1].close < pair[0].close);
        }
        for candle in up.iter().chain(down.iter()) {
            assert!(candle.is_sane());
        }
    }
}
