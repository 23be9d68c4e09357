//! Exponential moving average.
//!
//! Multiplier k = 2 / (period + 1); seeded with the SMA of the first
//! `period` values, then EMA[t] = value[t] × k + EMA[t-1] × (1 - k).
//! Degradation: fewer than `period` values → mean of what exists; empty → 0.

/// Full EMA series aligned with `values`.
///
/// Index `period - 1` holds the SMA seed; earlier indexes are NaN. Used by
/// the MACD kernel, which needs the whole fast/slow series.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "EMA period must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n < period {
        return result;
    }

    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let k = 2.0 / (period as f64 + 1.0);
    let mut prev = seed;
    for i in period..n {
        let next = values[i] * k + prev * (1.0 - k);
        result[i] = next;
        prev = next;
    }
    result
}

/// Latest EMA over `values`.
pub fn ema(values: &[f64], period: usize) -> f64 {
    assert!(period >= 1, "EMA period must be >= 1");
    if values.is_empty() {
        return 0.0;
    }
    if values.len() < period {
        return values.iter().sum::<f64>() / values.len() as f64;
    }
    ema_series(values, period).last().copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_seed_then_recursion() {
        // period 3 over [1, 2, 3, 4, 5]: seed = mean(1, 2, 3) = 2, k = 0.5
        // ema[3] = 4*0.5 + 2*0.5 = 3; ema[4] = 5*0.5 + 3*0.5 = 4
        let series = ema_series(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert!(series[0].is_nan());
        assert!(series[1].is_nan());
        assert_approx(series[2], 2.0, DEFAULT_EPSILON);
        assert_approx(series[3], 3.0, DEFAULT_EPSILON);
        assert_approx(series[4], 4.0, DEFAULT_EPSILON);
        assert_approx(ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 3), 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_constant_series_is_constant() {
        assert_approx(ema(&[5.0; 10], 4), 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_short_window_degrades_to_mean() {
        // 2 values, period 5 → mean(10, 14) = 12
        assert_approx(ema(&[10.0, 14.0], 5), 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_empty_is_zero() {
        assert_eq!(ema(&[], 20), 0.0);
    }

    #[test]
    fn ema_tracks_faster_than_sma() {
        // After a jump, the EMA sits closer to the new level than the SMA.
        let values = [10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 20.0, 20.0];
        let e = ema(&values, 5);
        let s = crate::indicators::sma(&values, 5);
        assert!(e > s, "ema {e} should exceed sma {s} after an up-jump");
    }
}
