//! Performance metrics over a finished run.
//!
//! Every function is total: denominators are guarded, and a degenerate input
//! (no trades, flat curve, too few points) produces 0 rather than NaN or an
//! error.

use serde::{Deserialize, Serialize};

use crate::domain::Trade;

/// Trading periods per year for Sharpe annualization.
pub const SHARPE_PERIODS_PER_YEAR: f64 = 252.0;

/// The trade and equity statistics a run reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub win_rate: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub profit_factor: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub trade_count: usize,
}

/// Bundle the individual metrics for a trade list and equity curve.
pub fn aggregate(trades: &[Trade], equity: &[f64]) -> PerformanceSummary {
    let average_win = average_win(trades);
    let average_loss = average_loss(trades);
    PerformanceSummary {
        win_rate: win_rate(trades),
        average_win,
        average_loss,
        profit_factor: profit_factor(average_win, average_loss),
        sharpe_ratio: sharpe_ratio(equity),
        max_drawdown: max_drawdown(equity),
        trade_count: trades.len(),
    }
}

/// Fraction of trades with positive pnl. 0 when there are no trades.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.pnl > 0.0).count();
    winners as f64 / trades.len() as f64
}

/// Mean pnl of winning trades. 0 when there are none.
pub fn average_win(trades: &[Trade]) -> f64 {
    mean_filtered(trades, |pnl| pnl > 0.0)
}

/// Mean pnl of non-winning trades (always <= 0). 0 when there are none.
pub fn average_loss(trades: &[Trade]) -> f64 {
    mean_filtered(trades, |pnl| pnl <= 0.0)
}

fn mean_filtered(trades: &[Trade], keep: impl Fn(f64) -> bool) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for trade in trades {
        if keep(trade.pnl) {
            sum += trade.pnl;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// |average win / average loss| — the per-trade magnitude ratio, not the
/// gross-sum ratio. 0 when the average loss is 0.
pub fn profit_factor(average_win: f64, average_loss: f64) -> f64 {
    if average_loss == 0.0 {
        return 0.0;
    }
    (average_win / average_loss).abs()
}

/// Per-step fractional returns of an equity curve. A zero-equity step
/// contributes 0.
pub fn equity_returns(equity: &[f64]) -> Vec<f64> {
    equity
        .windows(2)
        .map(|w| if w[0] == 0.0 { 0.0 } else { (w[1] - w[0]) / w[0] })
        .collect()
}

/// Annualized Sharpe ratio of the equity curve, risk-free rate 0.
///
/// Mean return over its population standard deviation, scaled by
/// √`SHARPE_PERIODS_PER_YEAR`. 0 when the curve has fewer than 2 points or
/// zero variance.
pub fn sharpe_ratio(equity: &[f64]) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }
    let returns = equity_returns(equity);
    let mean = mean_f64(&returns);
    let stdev = std_dev_population(&returns);
    if stdev == 0.0 {
        return 0.0;
    }
    mean / stdev * SHARPE_PERIODS_PER_YEAR.sqrt()
}

/// Largest peak-to-trough decline of the equity curve, percent, >= 0.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0;
    for &point in equity {
        if point > peak {
            peak = point;
        }
        if peak > 0.0 {
            let dd = (peak - point) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; the observed series is the population.
fn std_dev_population(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(values);
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExitReason, PositionSide};

    fn trade_with_pnl(pnl: f64) -> Trade {
        Trade {
            entry_time: 0,
            entry_price: 100.0,
            exit_time: 3_600_000,
            exit_price: 100.0 + pnl,
            exit_reason: ExitReason::SignalReversal,
            side: PositionSide::Long,
            size: 1.0,
            pnl,
            pnl_percentage: pnl,
        }
    }

    // ── Trade metrics ──

    #[test]
    fn win_rate_two_of_three() {
        let trades = [
            trade_with_pnl(50.0),
            trade_with_pnl(-30.0),
            trade_with_pnl(10.0),
        ];
        let expected = 2.0 / 3.0;
        assert!((win_rate(&trades) - expected).abs() < 1e-10);
    }

    #[test]
    fn averages_split_by_sign() {
        let trades = [
            trade_with_pnl(60.0),
            trade_with_pnl(40.0),
            trade_with_pnl(-30.0),
            trade_with_pnl(0.0), // breakeven counts as a loss
        ];
        assert_eq!(average_win(&trades), 50.0);
        assert_eq!(average_loss(&trades), -15.0);
    }

    #[test]
    fn profit_factor_magnitude_ratio() {
        // |50 / -25| = 2
        assert_eq!(profit_factor(50.0, -25.0), 2.0);
    }

    #[test]
    fn no_trades_yields_zeros() {
        let summary = aggregate(&[], &[10_000.0, 10_000.0]);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.average_win, 0.0);
        assert_eq!(summary.average_loss, 0.0);
        assert_eq!(summary.profit_factor, 0.0);
        assert_eq!(summary.sharpe_ratio, 0.0);
        assert_eq!(summary.max_drawdown, 0.0);
        assert_eq!(summary.trade_count, 0);
    }

    #[test]
    fn all_winners_profit_factor_is_zero() {
        // No losses → average_loss 0 → guarded to 0, not infinity.
        let trades = [trade_with_pnl(10.0), trade_with_pnl(20.0)];
        let summary = aggregate(&trades, &[10_000.0]);
        assert_eq!(summary.average_loss, 0.0);
        assert_eq!(summary.profit_factor, 0.0);
    }

    // ── Equity metrics ──

    #[test]
    fn equity_returns_per_step() {
        let returns = equity_returns(&[100.0, 110.0, 99.0]);
        assert!((returns[0] - 0.1).abs() < 1e-10);
        assert!((returns[1] - (-0.1)).abs() < 1e-10);
    }

    #[test]
    fn sharpe_constant_returns_is_zero() {
        // 1% every step → zero variance → guarded 0.
        assert_eq!(sharpe_ratio(&[100.0, 101.0, 102.01]), 0.0);
    }

    #[test]
    fn sharpe_sign_follows_drift() {
        let rising = [100.0, 102.0, 101.0, 104.0, 103.0, 107.0];
        let falling = [107.0, 103.0, 104.0, 101.0, 102.0, 100.0];
        assert!(sharpe_ratio(&rising) > 0.0);
        assert!(sharpe_ratio(&falling) < 0.0);
    }

    #[test]
    fn sharpe_short_curve_is_zero() {
        assert_eq!(sharpe_ratio(&[10_000.0]), 0.0);
        assert_eq!(sharpe_ratio(&[]), 0.0);
    }

    #[test]
    fn max_drawdown_peak_to_trough() {
        // Peak 120, trough 90 → 25%
        assert!((max_drawdown(&[100.0, 120.0, 90.0, 110.0]) - 25.0).abs() < 1e-10);
    }

    #[test]
    fn max_drawdown_monotone_rise_is_zero() {
        assert_eq!(max_drawdown(&[100.0, 110.0, 120.0]), 0.0);
    }

    #[test]
    fn aggregate_bundles_consistently() {
        let trades = [trade_with_pnl(100.0), trade_with_pnl(-50.0)];
        let equity = [10_000.0, 10_100.0, 10_050.0];
        let summary = aggregate(&trades, &equity);
        assert_eq!(summary.win_rate, 0.5);
        assert_eq!(summary.average_win, 100.0);
        assert_eq!(summary.average_loss, -50.0);
        assert_eq!(summary.profit_factor, 2.0);
        assert_eq!(summary.trade_count, 2);
        assert!(summary.max_drawdown > 0.0);
    }
}
