//! Per-style indicator snapshots.
//!
//! `calculate_indicators` reduces a candle window to the readings one
//! strategy style consults. The per-style payload is a tagged union: a style
//! only carries the fields its rules read, so a rule reaching for an
//! indicator that was never computed is a compile error, not a lookup miss.
//!
//! Below `MIN_CANDLES` of history the snapshot degrades to price-only rather
//! than failing; the signal layer maps that to Neutral.

use serde::{Deserialize, Serialize};

use crate::domain::{Candle, StrategyConfig, StrategyStyle};

use super::adx::adx;
use super::atr::atr;
use super::bollinger::{bollinger, BollingerBands};
use super::donchian::{donchian, DonchianChannel};
use super::ema::ema;
use super::macd::{macd, MacdValue};
use super::rsi::rsi;
use super::sma::sma;
use super::stochastic::{stochastic, StochasticValue};

/// Minimum history for a full snapshot; below this only price is reported.
pub const MIN_CANDLES: usize = 50;

/// How many candles back the price-change reading compares against.
pub const PRICE_CHANGE_LOOKBACK: usize = 25;

// ── Per-style indicator parameters ──
pub const TREND_SMA_PERIOD: usize = 50;
pub const TREND_EMA_PERIOD: usize = 20;
pub const ADX_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_WIDTH: f64 = 2.0;
pub const RSI_PERIOD: usize = 14;
pub const STOCHASTIC_K_PERIOD: usize = 14;
pub const STOCHASTIC_D_PERIOD: usize = 3;
pub const ATR_PERIOD: usize = 14;
pub const DONCHIAN_PERIOD: usize = 20;
pub const VOLUME_FAST_WINDOW: usize = 5;
pub const VOLUME_SLOW_WINDOW: usize = 15;

/// Indicator readings for one decision point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Close of the last candle in the window.
    pub price: f64,
    /// Percent change vs. the candle `PRICE_CHANGE_LOOKBACK` back; 0 when absent.
    pub price_change_pct: f64,
    /// Annualized close-to-close volatility, percent.
    pub volatility: f64,
    /// Style-specific readings.
    pub style: StyleIndicators,
}

/// The style-specific half of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StyleIndicators {
    Trend {
        sma50: f64,
        ema20: f64,
        adx: f64,
        macd: MacdValue,
    },
    MeanReversion {
        bollinger: BollingerBands,
        rsi: f64,
        stochastic: StochasticValue,
    },
    Breakout {
        atr: f64,
        donchian: DonchianChannel,
        volume_change_pct: f64,
    },
    /// Degraded form for windows under `MIN_CANDLES`.
    PriceOnly,
}

impl IndicatorSnapshot {
    /// ATR reading, when the style computes one.
    pub fn atr(&self) -> Option<f64> {
        match &self.style {
            StyleIndicators::Breakout { atr, .. } => Some(*atr),
            _ => None,
        }
    }

    pub fn is_price_only(&self) -> bool {
        matches!(self.style, StyleIndicators::PriceOnly)
    }
}

/// Compute the snapshot for a strategy over a candle window.
///
/// The window is everything the decision may look at; callers exclude the
/// decision candle itself.
pub fn calculate_indicators(candles: &[Candle], strategy: &StrategyConfig) -> IndicatorSnapshot {
    let price = candles.last().map(|c| c.close).unwrap_or(0.0);
    if candles.len() < MIN_CANDLES {
        return IndicatorSnapshot {
            price,
            price_change_pct: 0.0,
            volatility: 0.0,
            style: StyleIndicators::PriceOnly,
        };
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let style = match strategy.style {
        StrategyStyle::Trend => StyleIndicators::Trend {
            sma50: sma(&closes, TREND_SMA_PERIOD),
            ema20: ema(&closes, TREND_EMA_PERIOD),
            adx: adx(candles, ADX_PERIOD),
            macd: macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL),
        },
        StrategyStyle::MeanReversion => StyleIndicators::MeanReversion {
            bollinger: bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_WIDTH),
            rsi: rsi(&closes, RSI_PERIOD),
            stochastic: stochastic(candles, STOCHASTIC_K_PERIOD, STOCHASTIC_D_PERIOD),
        },
        StrategyStyle::Breakout => StyleIndicators::Breakout {
            atr: atr(candles, ATR_PERIOD),
            donchian: donchian(candles, DONCHIAN_PERIOD),
            volume_change_pct: volume_change_pct(candles),
        },
    };

    IndicatorSnapshot {
        price,
        price_change_pct: price_change_pct(&closes),
        volatility: annualized_volatility(candles),
        style,
    }
}

fn price_change_pct(closes: &[f64]) -> f64 {
    if closes.len() <= PRICE_CHANGE_LOOKBACK {
        return 0.0;
    }
    let last = closes[closes.len() - 1];
    let past = closes[closes.len() - 1 - PRICE_CHANGE_LOOKBACK];
    if past == 0.0 {
        return 0.0;
    }
    (last - past) / past * 100.0
}

/// Annualized close-to-close volatility, percent.
///
/// Population standard deviation of per-candle fractional returns, scaled
/// by 100 and √(candles per day), read from the series' timeframe: hourly
/// candles scale by √24, daily by 1. Also used by regime detection.
pub fn annualized_volatility(candles: &[Candle]) -> f64 {
    if candles.len() < 3 {
        return 0.0;
    }
    let periods_per_day = candles[0].timeframe.periods_per_day();
    let returns: Vec<f64> = candles
        .windows(2)
        .map(|w| {
            if w[0].close == 0.0 {
                0.0
            } else {
                (w[1].close - w[0].close) / w[0].close
            }
        })
        .collect();
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    variance.sqrt() * 100.0 * periods_per_day.sqrt()
}

/// Percent change of the recent volume average vs. the prior baseline.
///
/// Recent = last `VOLUME_FAST_WINDOW` candles; baseline = the
/// `VOLUME_SLOW_WINDOW` candles before them. 0 when the window is too short
/// or the baseline is 0. Also used by regime detection as a surge gauge.
pub fn volume_change_pct(candles: &[Candle]) -> f64 {
    if candles.len() < VOLUME_FAST_WINDOW + VOLUME_SLOW_WINDOW {
        return 0.0;
    }
    let n = candles.len();
    let recent = &candles[n - VOLUME_FAST_WINDOW..];
    let prior = &candles[n - VOLUME_FAST_WINDOW - VOLUME_SLOW_WINDOW..n - VOLUME_FAST_WINDOW];
    let recent_avg = recent.iter().map(|c| c.volume).sum::<f64>() / recent.len() as f64;
    let prior_avg = prior.iter().map(|c| c.volume).sum::<f64>() / prior.len() as f64;
    if prior_avg == 0.0 {
        return 0.0;
    }
    (recent_avg - prior_avg) / prior_avg * 100.0
}
