//! Average Directional Index (ADX).
//!
//! +DM/-DM from successive highs and lows, Wilder-smoothed alongside the TR
//! series to form DI+ and DI-. DX = 100 × |DI+ - DI-| / (DI+ + DI-), and ADX
//! is the Wilder-smoothed DX. Needs roughly 2 × period candles for a fully
//! smoothed value.
//! Degradation: fewer DX values than `period` → their mean; fewer than
//! `period + 1` candles → 0.

use crate::domain::Candle;

use super::atr::{true_range, wilder_smooth};

/// Latest ADX over `candles`. Bounded to [0, 100].
pub fn adx(candles: &[Candle], period: usize) -> f64 {
    assert!(period >= 1, "ADX period must be >= 1");
    if candles.len() < period + 1 {
        return 0.0;
    }

    // Directional movement and true range per step.
    let steps = candles.len() - 1;
    let mut plus_dm = Vec::with_capacity(steps);
    let mut minus_dm = Vec::with_capacity(steps);
    let mut trs = Vec::with_capacity(steps);
    for i in 1..candles.len() {
        let up = candles[i].high - candles[i - 1].high;
        let down = candles[i - 1].low - candles[i].low;
        plus_dm.push(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dm.push(if down > up && down > 0.0 { down } else { 0.0 });
        trs.push(true_range(&candles[i], Some(&candles[i - 1])));
    }

    let sm_plus = wilder_smooth(&plus_dm, period);
    let sm_minus = wilder_smooth(&minus_dm, period);
    let sm_tr = wilder_smooth(&trs, period);

    // DX wherever the smoothed series exist.
    let mut dx = Vec::with_capacity(steps - period + 1);
    for i in (period - 1)..steps {
        let tr = sm_tr[i];
        if tr == 0.0 {
            dx.push(0.0);
            continue;
        }
        let di_plus = 100.0 * sm_plus[i] / tr;
        let di_minus = 100.0 * sm_minus[i] / tr;
        let sum = di_plus + di_minus;
        dx.push(if sum == 0.0 {
            0.0
        } else {
            100.0 * (di_plus - di_minus).abs() / sum
        });
    }

    if dx.len() < period {
        return dx.iter().sum::<f64>() / dx.len() as f64;
    }
    wilder_smooth(&dx, period).last().copied().unwrap_or(0.0)
}
