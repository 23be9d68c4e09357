//! Core domain types: candles, strategies, positions, trades.

pub mod candle;
pub mod position;
pub mod strategy;
pub mod trade;

pub use candle::{Candle, Timeframe};
pub use position::{PositionSide, SimulatedPosition};
pub use strategy::{
    IndicatorSpec, MarketRegime, StopLossType, StrategyConfig, StrategyError, StrategyStyle,
};
pub use trade::{ExitReason, Trade};
