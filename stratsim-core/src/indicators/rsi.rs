//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses over successive
//! close changes. RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Edge cases: no movement → 50; avg_loss == 0 → 100; avg_gain == 0 → 0.
//! Degradation: fewer than `period + 1` closes → 50 (neutral).

/// RSI reading when the window cannot support the formula.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Latest RSI over `closes`.
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    assert!(period >= 1, "RSI period must be >= 1");
    if closes.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    // Seed: average gain and average loss over the first `period` changes.
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    // Wilder smoothing for the remaining changes.
    let alpha = 1.0 / period as f64;
    for i in (period + 1)..closes.len() {
        let change = closes[i] - closes[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
    }

    rs_to_rsi(avg_gain, avg_loss)
}

fn rs_to_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        NEUTRAL_RSI // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
