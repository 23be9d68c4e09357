//! Content hashes for reproducibility.
//!
//! Every exported run records what it ran on (`dataset_hash`) and what it
//! ran (`strategy_hash`). Two artifacts with equal hashes came from
//! byte-identical inputs, which is what makes a backtest claim checkable
//! after the fact.

use stratsim_core::domain::{Candle, StrategyConfig};

/// BLAKE3 hash over a candle series, as lowercase hex.
///
/// Covers symbol and timeframe once (series are homogeneous; the loader and
/// the generator both guarantee it), then every candle's timestamp and OHLCV
/// as little-endian bytes. Float bit patterns are hashed directly, so the
/// hash is exact, not precision-trimmed.
pub fn dataset_hash(candles: &[Candle]) -> String {
    let mut hasher = blake3::Hasher::new();

    if let Some(first) = candles.first() {
        hasher.update(first.symbol.as_bytes());
        hasher.update(first.timeframe.to_string().as_bytes());
    }
    for candle in candles {
        hasher.update(&candle.timestamp.to_le_bytes());
        hasher.update(&candle.open.to_le_bytes());
        hasher.update(&candle.high.to_le_bytes());
        hasher.update(&candle.low.to_le_bytes());
        hasher.update(&candle.close.to_le_bytes());
        hasher.update(&candle.volume.to_le_bytes());
    }

    hasher.finalize().to_hex().to_string()
}

/// BLAKE3 hash of a strategy's canonical JSON form, as lowercase hex.
///
/// serde_json writes struct fields in declaration order, so the encoding is
/// deterministic.
pub fn strategy_hash(strategy: &StrategyConfig) -> String {
    let json = serde_json::to_string(strategy).expect("StrategyConfig serialization failed");
    blake3::hash(json.as_bytes()).to_hex().to_string()
}
