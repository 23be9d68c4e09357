//! Bollinger Bands.
//!
//! Middle = SMA(period); upper/lower = middle ± width × σ, where σ is the
//! population standard deviation of the window.
//! Degradation: fewer than `period` closes → bands over what exists;
//! empty → all zeros.

use serde::{Deserialize, Serialize};

/// Upper, middle, and lower band values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Latest Bollinger Bands over `closes`.
pub fn bollinger(closes: &[f64], period: usize, width: f64) -> BollingerBands {
    assert!(period >= 1, "Bollinger period must be >= 1");
    if closes.is_empty() {
        return BollingerBands {
            upper: 0.0,
            middle: 0.0,
            lower: 0.0,
        };
    }

    let window = &closes[closes.len().saturating_sub(period)..];
    let middle = window.iter().sum::<f64>() / window.len() as f64;
    let variance =
        window.iter().map(|v| (v - middle).powi(2)).sum::<f64>() / window.len() as f64;
    let sigma = variance.sqrt();

    BollingerBands {
        upper: middle + width * sigma,
        middle,
        lower: middle - width * sigma,
    }
}
