//! Stochastic oscillator (%K / %D).
//!
//! %K = 100 × (close - lowest_low) / (highest_high - lowest_low) over the
//! last `k_period` candles; %D = SMA of the last `d_period` %K values.
//! Edge case: a flat window (highest == lowest) reads 50.
//! Degradation: fewer than `k_period` candles → { k: 50, d: 50 }.

use serde::{Deserialize, Serialize};

use crate::domain::Candle;

/// Oscillator reading when the window cannot support the formula.
pub const NEUTRAL_STOCHASTIC: f64 = 50.0;

/// Fast %K and its smoothed %D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticValue {
    pub k: f64,
    pub d: f64,
}

impl StochasticValue {
    pub fn neutral() -> Self {
        Self {
            k: NEUTRAL_STOCHASTIC,
            d: NEUTRAL_STOCHASTIC,
        }
    }
}

/// Latest stochastic over `candles`.
pub fn stochastic(candles: &[Candle], k_period: usize, d_period: usize) -> StochasticValue {
    assert!(k_period >= 1, "stochastic %K period must be >= 1");
    assert!(d_period >= 1, "stochastic %D period must be >= 1");
    if candles.len() < k_period {
        return StochasticValue::neutral();
    }

    let k = percent_k(candles, k_period);

    // %D: average %K over the most recent windows that fit.
    let mut k_values = Vec::with_capacity(d_period);
    for back in 0..d_period {
        if candles.len() < k_period + back {
            break;
        }
        let end = candles.len() - back;
        k_values.push(percent_k(&candles[..end], k_period));
    }
    let d = k_values.iter().sum::<f64>() / k_values.len() as f64;

    StochasticValue { k, d }
}

fn percent_k(candles: &[Candle], k_period: usize) -> f64 {
    let window = &candles[candles.len() - k_period..];
    let highest = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let lowest = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
    let range = highest - lowest;
    if range == 0.0 {
        return NEUTRAL_STOCHASTIC;
    }
    let close = candles[candles.len() - 1].close;
    100.0 * (close - lowest) / range
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_candles, DEFAULT_EPSILON};

    #[test]
    fn stochastic_close_at_high_is_100() {
        let candles = make_ohlc_candles(&[
            (100.0, 102.0, 98.0, 101.0),
            (101.0, 104.0, 100.0, 103.0),
            (103.0, 106.0, 102.0, 106.0), // close == window high
        ]);
        let value = stochastic(&candles, 3, 1);
        assert_approx(value.k, 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn stochastic_close_at_low_is_0() {
        let candles = make_ohlc_candles(&[
            (106.0, 107.0, 103.0, 104.0),
            (104.0, 105.0, 100.0, 101.0),
            (101.0, 102.0, 97.0, 97.0), // close == window low
        ]);
        let value = stochastic(&candles, 3, 1);
        assert_approx(value.k, 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn stochastic_midpoint() {
        // Window spans 90..110, close 100 → %K = 50
        let candles = make_ohlc_candles(&[
            (100.0, 110.0, 90.0, 100.0),
            (100.0, 105.0, 95.0, 100.0),
        ]);
        let value = stochastic(&candles, 2, 1);
        assert_approx(value.k, 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn stochastic_d_smooths_k() {
        // %K at the last three window ends: hand-check that %D is their mean.
        let candles = make_ohlc_candles(&[
            (100.0, 110.0, 90.0, 95.0),
            (95.0, 110.0, 90.0, 100.0),
            (100.0, 110.0, 90.0, 105.0),
            (105.0, 110.0, 90.0, 110.0),
        ]);
        // Range is 90..110 for every window:
        // %K(end=4) = 100, %K(end=3) = 75, %K(end=2) = 50 → %D = 75
        let value = stochastic(&candles, 2, 3);
        assert_approx(value.k, 100.0, DEFAULT_EPSILON);
        assert_approx(value.d, 75.0, DEFAULT_EPSILON);
    }

    #[test]
    fn stochastic_flat_window_is_neutral() {
        let candles = make_ohlc_candles(&[(100.0, 100.0, 100.0, 100.0); 5]);
        let value = stochastic(&candles, 3, 3);
        assert_eq!(value.k, NEUTRAL_STOCHASTIC);
        assert_eq!(value.d, NEUTRAL_STOCHASTIC);
    }

    #[test]
    fn stochastic_short_window_is_neutral() {
        let candles = make_ohlc_candles(&[(100.0, 102.0, 98.0, 101.0)]);
        assert_eq!(stochastic(&candles, 14, 3), StochasticValue::neutral());
    }
}
