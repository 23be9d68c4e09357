//! Pure indicator kernels.
//!
//! Each kernel reduces a candle (or close) window to its latest value. There
//! is no warmup NaN region: a window too short for the formula degrades to a
//! neutral default instead, so the snapshot layer always has a usable reading
//! for every field. `snapshot.rs` bundles the kernels into the per-style
//! `IndicatorSnapshot` the signal rules consume.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod donchian;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod snapshot;
pub mod stochastic;

pub use adx::adx;
pub use atr::{atr, tr_series, true_range, wilder_smooth};
pub use bollinger::{bollinger, BollingerBands};
pub use donchian::{donchian, DonchianChannel};
pub use ema::{ema, ema_series};
pub use macd::{macd, MacdValue};
pub use rsi::rsi;
pub use sma::sma;
pub use snapshot::{
    annualized_volatility, calculate_indicators, volume_change_pct, IndicatorSnapshot,
    StyleIndicators, MIN_CANDLES,
};
pub use stochastic::{stochastic, StochasticValue};

/// Create synthetic candles from close prices for testing.
///
/// Generates plausible OHLCV: open = prev_close (or close for the first
/// candle), high = max(open,close) + 1.0, low = min(open,close) - 1.0,
/// volume = 1000, hourly timestamps.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<crate::domain::Candle> {
    use crate::domain::{Candle, Timeframe};
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Candle {
                symbol: "TEST".to_string(),
                timestamp: 1_700_000_000_000 + i as i64 * 3_600_000,
                open,
                high,
                low,
                close,
                volume: 1000.0,
                timeframe: Timeframe::H1,
            }
        })
        .collect()
}

/// Create candles from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_candles(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Candle> {
    use crate::domain::{Candle, Timeframe};
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Candle {
            symbol: "TEST".to_string(),
            timestamp: 1_700_000_000_000 + i as i64 * 3_600_000,
            open,
            high,
            low,
            close,
            volume: 1000.0,
            timeframe: Timeframe::H1,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
