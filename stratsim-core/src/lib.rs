//! StratSim Core — domain types, indicators, signal rules, backtest engine, metrics.
//!
//! This crate contains the heart of the strategy evaluator:
//! - Domain types (candles, strategies, positions, trades)
//! - Indicator kernels and the per-style snapshot
//! - Pure signal rules (candle + snapshot in, signal out)
//! - Walk-forward backtest simulator with a single-position state machine
//! - Performance aggregation (win rate, profit factor, Sharpe, drawdown)
//!
//! Everything here is deterministic and side-effect free: the same candle
//! series and strategy configuration always produce the same result.

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod metrics;
pub mod signal;
