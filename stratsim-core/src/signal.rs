//! Signal rules — pure mapping from (candle, snapshot) to a direction.
//!
//! Every rule set reads only the fields its style's snapshot variant carries.
//! A price-only snapshot is always Neutral.

use serde::{Deserialize, Serialize};

use crate::domain::Candle;
use crate::indicators::{IndicatorSnapshot, StyleIndicators};

// ── Rule thresholds ──

/// ADX above this marks a trend strong enough to trade.
pub const ADX_TREND_THRESHOLD: f64 = 25.0;
/// RSI bounds for the mean-reversion extremes.
pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
/// Tolerance factors for "at the band" checks against the Bollinger bands:
/// a close within 1% of the lower band still counts as touching it.
pub const LOWER_BAND_TOLERANCE: f64 = 1.01;
pub const UPPER_BAND_TOLERANCE: f64 = 0.99;
/// Volume expansion (percent) required to confirm a breakout.
pub const BREAKOUT_VOLUME_THRESHOLD: f64 = 20.0;

/// Trade direction for the decision candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Long,
    Short,
    Neutral,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Long => f.write_str("Long"),
            Signal::Short => f.write_str("Short"),
            Signal::Neutral => f.write_str("Neutral"),
        }
    }
}

/// Evaluate the style's rules for one decision candle.
///
/// `candle` is the decision candle; `snapshot` was computed over the window
/// before it, so band and channel breaks compare the fresh close against
/// history it is not part of.
pub fn generate_signal(candle: &Candle, snapshot: &IndicatorSnapshot) -> Signal {
    match &snapshot.style {
        StyleIndicators::Trend {
            sma50,
            ema20,
            adx,
            macd,
        } => {
            if ema20 > sma50 && macd.histogram > 0.0 && *adx > ADX_TREND_THRESHOLD {
                Signal::Long
            } else if ema20 < sma50 && macd.histogram < 0.0 && *adx > ADX_TREND_THRESHOLD {
                Signal::Short
            } else {
                Signal::Neutral
            }
        }
        StyleIndicators::MeanReversion { bollinger, rsi, .. } => {
            if *rsi < RSI_OVERSOLD && candle.close < bollinger.lower * LOWER_BAND_TOLERANCE {
                Signal::Long
            } else if *rsi > RSI_OVERBOUGHT && candle.close > bollinger.upper * UPPER_BAND_TOLERANCE
            {
                Signal::Short
            } else {
                Signal::Neutral
            }
        }
        StyleIndicators::Breakout {
            donchian,
            volume_change_pct,
            ..
        } => {
            if candle.close > donchian.upper && *volume_change_pct > BREAKOUT_VOLUME_THRESHOLD {
                Signal::Long
            } else if candle.close < donchian.lower
                && *volume_change_pct > BREAKOUT_VOLUME_THRESHOLD
            {
                Signal::Short
            } else {
                Signal::Neutral
            }
        }
        StyleIndicators::PriceOnly => Signal::Neutral,
    }
}
