//! Walk-forward backtest simulator.
//!
//! Replays a candle series against one strategy, candle by candle. For the
//! candle at index `i` the indicator snapshot is computed over `candles[..i]`
//! only, so the decision candle never feeds its own signal. A single
//! position is open at most; entries fill at the decision candle's close,
//! bracket exits fill at their bracket price, reversals at the close.
//!
//! Candle handling order:
//! 1. If a position is open, check stop, target, then signal reversal.
//!    A candle that closes a position never opens a new one.
//! 2. If flat and the signal is directional, open a position sized so a
//!    stop exit loses `capital * risk_per_trade`.
//! 3. Record the equity point.
//!
//! A position still open after the last candle is closed at that candle's
//! close with reason "End of Test". The forced close adjusts the final
//! capital but appends no equity point.

use crate::domain::{
    Candle, ExitReason, PositionSide, SimulatedPosition, StopLossType, StrategyConfig, Trade,
};
use crate::indicators::{calculate_indicators, IndicatorSnapshot, MIN_CANDLES};
use crate::metrics;
use crate::signal::{generate_signal, Signal};

use super::state::{BacktestError, BacktestResult, EngineConfig, EngineState, ExitPriority};

/// Stop distance for ATR-based stops, in ATR multiples.
pub const ATR_STOP_MULTIPLE: f64 = 2.0;

/// Stop distance for percentage-based stops, as a fraction of entry price.
pub const PERCENT_STOP_FRACTION: f64 = 0.02;

/// Runs one full backtest of `strategy` over `candles`.
///
/// Deterministic: identical inputs produce an identical result. Fails only
/// when the series is shorter than the indicator warmup window.
pub fn run_backtest(
    candles: &[Candle],
    strategy: &StrategyConfig,
    config: &EngineConfig,
) -> Result<BacktestResult, BacktestError> {
    if candles.len() < MIN_CANDLES {
        return Err(BacktestError::InsufficientData {
            got: candles.len(),
            min: MIN_CANDLES,
        });
    }

    let mut state = EngineState::new(config.initial_capital);

    for i in MIN_CANDLES..candles.len() {
        let window = &candles[..i];
        let candle = &candles[i];
        let snapshot = calculate_indicators(window, strategy);
        let signal = generate_signal(candle, &snapshot);
        process_candle(&mut state, candle, &snapshot, signal, strategy, config);
        state.record_equity();
    }

    // Forced close happens after the last equity point.
    if let Some(last) = candles.last() {
        close_open_position(&mut state, last);
    }

    let summary = metrics::aggregate(&state.trades, &state.equity);
    let total_pnl = state.capital - config.initial_capital;
    let total_pnl_percentage = if config.initial_capital > 0.0 {
        total_pnl / config.initial_capital * 100.0
    } else {
        0.0
    };
    let first = &candles[0];
    let last = &candles[candles.len() - 1];

    Ok(BacktestResult {
        strategy_id: strategy.id.clone(),
        strategy_name: strategy.name.clone(),
        symbol: first.symbol.clone(),
        timeframe: first.timeframe,
        start_time: first.timestamp,
        end_time: last.timestamp,
        initial_capital: config.initial_capital,
        final_capital: state.capital,
        total_pnl,
        total_pnl_percentage,
        win_rate: summary.win_rate,
        average_win: summary.average_win,
        average_loss: summary.average_loss,
        profit_factor: summary.profit_factor,
        max_drawdown: state.max_drawdown,
        sharpe_ratio: summary.sharpe_ratio,
        trades: state.trades,
        equity: state.equity,
        drawdowns: state.drawdowns,
    })
}

/// One step of the fold: applies a single candle to the engine state.
fn process_candle(
    state: &mut EngineState,
    candle: &Candle,
    snapshot: &IndicatorSnapshot,
    signal: Signal,
    strategy: &StrategyConfig,
    config: &EngineConfig,
) {
    if let Some(position) = state.position.clone() {
        if let Some((exit_price, reason)) =
            exit_for(&position, candle, signal, config.exit_priority)
        {
            state.position = None;
            realize_exit(state, position, candle.timestamp, exit_price, reason);
        }
        // Exit or not, an in-position candle never opens a new trade.
        return;
    }

    match signal {
        Signal::Long => open_position(state, candle, snapshot, PositionSide::Long, strategy),
        Signal::Short => open_position(state, candle, snapshot, PositionSide::Short, strategy),
        Signal::Neutral => {}
    }
}

/// Decides whether `candle` closes `position`, and at what price.
///
/// Stop and target are checked against the candle's full range; when both
/// lie inside one candle the configured priority wins. Reversal is checked
/// last and fills at the close.
fn exit_for(
    position: &SimulatedPosition,
    candle: &Candle,
    signal: Signal,
    priority: ExitPriority,
) -> Option<(f64, ExitReason)> {
    let (stop_hit, target_hit) = match position.side {
        PositionSide::Long => (
            candle.low <= position.stop_loss,
            candle.high >= position.take_profit,
        ),
        PositionSide::Short => (
            candle.high >= position.stop_loss,
            candle.low <= position.take_profit,
        ),
    };

    match (stop_hit, target_hit) {
        (true, true) => match priority {
            ExitPriority::StopFirst => Some((position.stop_loss, ExitReason::StopLoss)),
            ExitPriority::TargetFirst => Some((position.take_profit, ExitReason::TakeProfit)),
        },
        (true, false) => Some((position.stop_loss, ExitReason::StopLoss)),
        (false, true) => Some((position.take_profit, ExitReason::TakeProfit)),
        (false, false) => {
            let reversed = match position.side {
                PositionSide::Long => signal == Signal::Short,
                PositionSide::Short => signal == Signal::Long,
            };
            if reversed {
                Some((candle.close, ExitReason::SignalReversal))
            } else {
                None
            }
        }
    }
}

/// Opens a position at the candle's close, sized from the risk budget.
///
/// Stop distance comes from the strategy's stop type: `Atr` uses the
/// snapshot ATR (falling back to the candle's range when the style carries
/// no ATR), `Percentage` uses a fixed fraction of the close. A distance
/// that is zero, negative, or NaN cannot size a position, so no entry
/// happens; same when the risk budget itself is gone.
fn open_position(
    state: &mut EngineState,
    candle: &Candle,
    snapshot: &IndicatorSnapshot,
    side: PositionSide,
    strategy: &StrategyConfig,
) {
    let distance = match strategy.stop_loss_type {
        StopLossType::Atr => {
            ATR_STOP_MULTIPLE * snapshot.atr().unwrap_or_else(|| candle.range())
        }
        StopLossType::Percentage => PERCENT_STOP_FRACTION * candle.close,
    };
    if !(distance > 0.0) {
        return;
    }

    let risk = state.capital * strategy.risk_per_trade;
    let size = risk / distance;
    if !(size > 0.0) {
        return;
    }

    let sign = side.sign();
    state.position = Some(SimulatedPosition {
        side,
        entry_price: candle.close,
        entry_time: candle.timestamp,
        size,
        stop_loss: candle.close - sign * distance,
        take_profit: candle.close + sign * distance * strategy.take_profit_ratio,
    });
}

/// Books the exit: realizes pnl into capital and appends the trade.
fn realize_exit(
    state: &mut EngineState,
    position: SimulatedPosition,
    exit_time: i64,
    exit_price: f64,
    reason: ExitReason,
) {
    let pnl = position.pnl_at(exit_price);
    let pnl_percentage = position.pnl_percentage_at(exit_price);
    state.capital += pnl;
    state.trades.push(Trade {
        entry_time: position.entry_time,
        entry_price: position.entry_price,
        exit_time,
        exit_price,
        exit_reason: reason,
        side: position.side,
        size: position.size,
        pnl,
        pnl_percentage,
    });
}

/// Closes any position left open after the final candle, at its close.
fn close_open_position(state: &mut EngineState, last: &Candle) {
    if let Some(position) = state.position.take() {
        realize_exit(
            state,
            position,
            last.timestamp,
            last.close,
            ExitReason::EndOfTest,
        );
    }
}
