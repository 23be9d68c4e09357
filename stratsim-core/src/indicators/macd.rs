//! Moving Average Convergence Divergence (MACD).
//!
//! Line = EMA(fast) - EMA(slow); signal = EMA(signal_period) of the line;
//! histogram = line - signal. Standard parameters are 12/26/9.
//! Degradation: fewer than `slow` closes → all zeros (neutral).

use serde::{Deserialize, Serialize};

use super::ema::{ema, ema_series};

/// MACD line, signal line, and their difference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdValue {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdValue {
    pub fn neutral() -> Self {
        Self {
            line: 0.0,
            signal: 0.0,
            histogram: 0.0,
        }
    }
}

/// Latest MACD over `closes`.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdValue {
    assert!(
        fast >= 1 && slow > fast,
        "MACD periods must satisfy 1 <= fast < slow"
    );
    assert!(signal_period >= 1, "MACD signal period must be >= 1");
    if closes.len() < slow {
        return MacdValue::neutral();
    }

    let fast_series = ema_series(closes, fast);
    let slow_series = ema_series(closes, slow);

    // The line exists wherever the slow EMA does.
    let line_values: Vec<f64> = (slow - 1..closes.len())
        .map(|i| fast_series[i] - slow_series[i])
        .collect();

    let line = line_values.last().copied().unwrap_or(0.0);
    let signal = ema(&line_values, signal_period);
    MacdValue {
        line,
        signal,
        histogram: line - signal,
    }
}
