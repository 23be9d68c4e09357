//! Donchian channel.
//!
//! Upper = highest high, lower = lowest low over the last `period` candles;
//! middle = their midpoint.
//! Degradation: fewer than `period` candles → channel over what exists;
//! empty → all zeros.

use serde::{Deserialize, Serialize};

use crate::domain::Candle;

/// Channel bounds and midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DonchianChannel {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Latest Donchian channel over `candles`.
pub fn donchian(candles: &[Candle], period: usize) -> DonchianChannel {
    assert!(period >= 1, "Donchian period must be >= 1");
    if candles.is_empty() {
        return DonchianChannel {
            upper: 0.0,
            middle: 0.0,
            lower: 0.0,
        };
    }

    let window = &candles[candles.len().saturating_sub(period)..];
    let upper = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let lower = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
    DonchianChannel {
        upper,
        middle: (upper + lower) / 2.0,
        lower,
    }
}
