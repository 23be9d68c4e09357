//! StrategyConfig — serializable description of a trading strategy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trading style. Selects both the indicator set and the signal rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyStyle {
    Trend,
    MeanReversion,
    Breakout,
}

impl std::fmt::Display for StrategyStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StrategyStyle::Trend => "trend",
            StrategyStyle::MeanReversion => "mean_reversion",
            StrategyStyle::Breakout => "breakout",
        };
        f.write_str(s)
    }
}

/// How the stop distance is derived at entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopLossType {
    /// 2 x ATR(14) of the indicator window, falling back to the decision
    /// candle's range when the style computes no ATR.
    Atr,
    /// Fixed fraction of the entry price.
    Percentage,
}

/// Broad market condition label produced by regime detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketRegime {
    Trending,
    Ranging,
    Volatile,
}

impl std::fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MarketRegime::Trending => "trending",
            MarketRegime::Ranging => "ranging",
            MarketRegime::Volatile => "volatile",
        };
        f.write_str(s)
    }
}

/// Names of the indicators a strategy consults, for display and manifests.
///
/// The computed indicator set is fixed per style; this list documents which
/// of those the rules lean on (`primary`) versus confirm with. Run files may
/// omit it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub primary: Vec<String>,
    pub confirmation: Vec<String>,
}

/// Full configuration of a single strategy candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub id: String,
    pub name: String,
    pub style: StrategyStyle,

    /// Fraction of current capital risked per trade. 0 < r <= 1.
    pub risk_per_trade: f64,

    /// Take-profit distance as a multiple of the stop distance. > 0.
    pub take_profit_ratio: f64,

    pub stop_loss_type: StopLossType,
    #[serde(default)]
    pub indicators: IndicatorSpec,

    /// Regimes this strategy is allowed to trade in. The validator drops
    /// candidates whose list does not contain the observed regime.
    pub suitable_regimes: Vec<MarketRegime>,
}

/// Constraint violations found by [`StrategyConfig::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum StrategyError {
    #[error("risk_per_trade must be in (0, 1], got {got}")]
    RiskOutOfRange { got: f64 },

    #[error("take_profit_ratio must be positive, got {got}")]
    TakeProfitNotPositive { got: f64 },

    #[error("strategy id must not be empty")]
    EmptyId,

    #[error("suitable_regimes must not be empty")]
    NoSuitableRegimes,
}

impl StrategyConfig {
    /// Checks numeric and structural constraints. Called at config-load and
    /// before validation runs; the engine assumes a validated config.
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.id.is_empty() {
            return Err(StrategyError::EmptyId);
        }
        if !(self.risk_per_trade > 0.0 && self.risk_per_trade <= 1.0) {
            return Err(StrategyError::RiskOutOfRange {
                got: self.risk_per_trade,
            });
        }
        if !(self.take_profit_ratio > 0.0) {
            return Err(StrategyError::TakeProfitNotPositive {
                got: self.take_profit_ratio,
            });
        }
        if self.suitable_regimes.is_empty() {
            return Err(StrategyError::NoSuitableRegimes);
        }
        Ok(())
    }

    /// Trend-following preset: EMA/SMA alignment confirmed by MACD and ADX.
    pub fn trend_following() -> Self {
        Self {
            id: "trend-following".into(),
            name: "Trend Following".into(),
            style: StrategyStyle::Trend,
            risk_per_trade: 0.02,
            take_profit_ratio: 2.0,
            stop_loss_type: StopLossType::Atr,
            indicators: IndicatorSpec {
                primary: vec!["ema20".into(), "sma50".into()],
                confirmation: vec!["macd".into(), "adx".into()],
            },
            suitable_regimes: vec![MarketRegime::Trending],
        }
    }

    /// Mean-reversion preset: RSI extremes at the Bollinger bands.
    pub fn mean_reversion() -> Self {
        Self {
            id: "mean-reversion".into(),
            name: "Mean Reversion".into(),
            style: StrategyStyle::MeanReversion,
            risk_per_trade: 0.01,
            take_profit_ratio: 1.5,
            stop_loss_type: StopLossType::Percentage,
            indicators: IndicatorSpec {
                primary: vec!["rsi".into(), "bollinger".into()],
                confirmation: vec!["stochastic".into()],
            },
            suitable_regimes: vec![MarketRegime::Ranging],
        }
    }

    /// Breakout preset: Donchian channel break on a volume surge.
    pub fn breakout() -> Self {
        Self {
            id: "breakout".into(),
            name: "Breakout".into(),
            style: StrategyStyle::Breakout,
            risk_per_trade: 0.02,
            take_profit_ratio: 2.5,
            stop_loss_type: StopLossType::Atr,
            indicators: IndicatorSpec {
                primary: vec!["donchian".into()],
                confirmation: vec!["atr".into(), "volume".into()],
            },
            suitable_regimes: vec![MarketRegime::Trending, MarketRegime::Volatile],
        }
    }

    /// All built-in presets, one per style.
    pub fn presets() -> Vec<Self> {
        vec![
            Self::trend_following(),
            Self::mean_reversion(),
            Self::breakout(),
        ]
    }
}
