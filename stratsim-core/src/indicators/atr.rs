//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|); the first
//! candle has no previous close and falls back to high-low. ATR is the
//! Wilder-smoothed TR series (alpha = 1/period).
//! Degradation: fewer than `period` TR values → their mean; empty → 0.

use crate::domain::Candle;

/// True Range for one candle against the previous close.
pub fn true_range(current: &Candle, previous: Option<&Candle>) -> f64 {
    let range = current.high - current.low;
    match previous {
        Some(prev) => range
            .max((current.high - prev.close).abs())
            .max((current.low - prev.close).abs()),
        None => range,
    }
}

/// True Range series aligned with `candles`.
pub fn tr_series(candles: &[Candle]) -> Vec<f64> {
    candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let prev = if i == 0 { None } else { Some(&candles[i - 1]) };
            true_range(c, prev)
        })
        .collect()
}

/// Wilder smoothing aligned with `values`.
///
/// Seed at index `period - 1` is the mean of the first `period` values;
/// after that smoothed[t] = (smoothed[t-1] × (period-1) + value[t]) / period.
/// Indexes before the seed are NaN. Shared with the ADX kernel.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        let smoothed = (prev * (period as f64 - 1.0) + values[i]) / period as f64;
        result[i] = smoothed;
        prev = smoothed;
    }
    result
}

/// Latest ATR over `candles`.
pub fn atr(candles: &[Candle], period: usize) -> f64 {
    assert!(period >= 1, "ATR period must be >= 1");
    if candles.is_empty() {
        return 0.0;
    }
    let trs = tr_series(candles);
    if trs.len() < period {
        return trs.iter().sum::<f64>() / trs.len() as f64;
    }
    wilder_smooth(&trs, period).last().copied().unwrap_or(0.0)
}
