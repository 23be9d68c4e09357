//! Simple moving average.
//!
//! SMA = mean of the last `period` values.
//! Degradation: fewer than `period` values → mean of what exists; empty → 0.

/// Latest SMA over `values`.
pub fn sma(values: &[f64], period: usize) -> f64 {
    assert!(period >= 1, "SMA period must be >= 1");
    if values.is_empty() {
        return 0.0;
    }
    let window = &values[values.len().saturating_sub(period)..];
    window.iter().sum::<f64>() / window.len() as f64
}
