//! Engine configuration, the fold accumulator, and the run result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{SimulatedPosition, Timeframe, Trade};

/// Starting capital when none is configured.
pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;

/// Which bracket leg fills when one candle spans both.
///
/// Candle data cannot say whether the stop or the target traded first inside
/// the interval, so the resolution is a configuration choice, not a code
/// path buried in the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitPriority {
    /// Conservative: a candle touching both legs is scored as a stop.
    #[default]
    StopFirst,
    /// Optimistic mirror, for sensitivity checks.
    TargetFirst,
}

/// Knobs for a single backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_capital: f64,
    pub exit_priority: ExitPriority,
}

impl EngineConfig {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            exit_priority: ExitPriority::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPITAL)
    }
}

/// Errors from `run_backtest`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BacktestError {
    #[error("insufficient data: got {got} candles, need at least {min}")]
    InsufficientData { got: usize, min: usize },
}

/// Accumulator threaded through the candle fold.
///
/// `equity` is realized equity only: open positions are not marked to
/// market, so the curve moves exactly when a trade closes.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    pub capital: f64,
    pub position: Option<SimulatedPosition>,
    pub equity: Vec<f64>,
    pub drawdowns: Vec<f64>,
    pub max_equity: f64,
    pub max_drawdown: f64,
    pub trades: Vec<Trade>,
}

impl EngineState {
    /// Seeds the curves: equity starts at the initial capital, drawdown at 0.
    pub fn new(initial_capital: f64) -> Self {
        Self {
            capital: initial_capital,
            position: None,
            equity: vec![initial_capital],
            drawdowns: vec![0.0],
            max_equity: initial_capital,
            max_drawdown: 0.0,
            trades: Vec::new(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    /// Appends the equity point for a processed candle and rolls the
    /// drawdown bookkeeping forward.
    pub fn record_equity(&mut self) {
        self.equity.push(self.capital);
        if self.capital > self.max_equity {
            self.max_equity = self.capital;
        }
        let drawdown = if self.max_equity > 0.0 {
            (self.max_equity - self.capital) / self.max_equity * 100.0
        } else {
            0.0
        };
        self.drawdowns.push(drawdown);
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }
    }
}

/// Everything a finished backtest reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub strategy_id: String,
    pub strategy_name: String,
    pub symbol: String,
    pub timeframe: Timeframe,
    pub start_time: i64,
    pub end_time: i64,

    // ── Capital ──
    pub initial_capital: f64,
    pub final_capital: f64,
    pub total_pnl: f64,
    pub total_pnl_percentage: f64,

    // ── Trade statistics ──
    pub win_rate: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub profit_factor: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,

    // ── Series ──
    pub trades: Vec<Trade>,
    /// One point per processed candle, seeded with the initial capital.
    pub equity: Vec<f64>,
    /// Drawdown-from-peak percentages, parallel to `equity`.
    pub drawdowns: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_seeds_curves() {
        let state = EngineState::new(10_000.0);
        assert_eq!(state.equity, vec![10_000.0]);
        assert_eq!(state.drawdowns, vec![0.0]);
        assert_eq!(state.max_equity, 10_000.0);
        assert!(state.is_flat());
        assert!(state.trades.is_empty());
    }

    #[test]
    fn record_equity_tracks_drawdown() {
        let mut state = EngineState::new(10_000.0);
        state.capital = 11_000.0;
        state.record_equity();
        state.capital = 9_900.0;
        state.record_equity();

        assert_eq!(state.equity, vec![10_000.0, 11_000.0, 9_900.0]);
        assert_eq!(state.max_equity, 11_000.0);
        // (11000 - 9900) / 11000 * 100 = 10%
        assert!((state.drawdowns[2] - 10.0).abs() < 1e-10);
        assert!((state.max_drawdown - 10.0).abs() < 1e-10);
    }

    #[test]
    fn max_drawdown_keeps_worst() {
        let mut state = EngineState::new(10_000.0);
        state.capital = 8_000.0; // 20% down
        state.record_equity();
        state.capital = 9_500.0; // recovered to 5% down
        state.record_equity();

        assert!((state.max_drawdown - 20.0).abs() < 1e-10);
        assert!((state.drawdowns[2] - 5.0).abs() < 1e-10);
    }

    #[test]
    fn config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.initial_capital, DEFAULT_INITIAL_CAPITAL);
        assert_eq!(config.exit_priority, ExitPriority::StopFirst);
    }

    #[test]
    fn exit_priority_wire_form() {
        assert_eq!(
            serde_json::to_string(&ExitPriority::StopFirst).unwrap(),
            "\"stop_first\""
        );
    }

    #[test]
    fn insufficient_data_message() {
        let err = BacktestError::InsufficientData { got: 49, min: 50 };
        assert_eq!(
            err.to_string(),
            "insufficient data: got 49 candles, need at least 50"
        );
    }
}
