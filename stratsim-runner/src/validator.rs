//! Candidate strategy validation and expectancy ranking.
//!
//! Given a list of candidate strategies and a candle series, keeps the
//! candidates suited to the observed regime, scores each one on a held-out
//! slice, and returns them ranked by expectancy with non-positive scorers
//! dropped.
//!
//! Scoring is a one-step-ahead proxy, deliberately cheaper than the full
//! simulator: for each test candle the signal is compared against the next
//! candle's close. A Long wins when the next close is higher, a Short when
//! it is lower; the scored amount is the absolute fractional move. No
//! position sizing, no stops, no capital path. This ranks many candidates
//! quickly; the winner still goes through `run_backtest` for real numbers.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stratsim_core::domain::{Candle, MarketRegime, StrategyConfig};
use stratsim_core::indicators::{calculate_indicators, MIN_CANDLES};
use stratsim_core::signal::{generate_signal, Signal};

/// Knobs for the validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Fraction of the series reserved for the (unused) training prefix;
    /// scoring runs on the remainder.
    pub train_fraction: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            train_fraction: 0.7,
        }
    }
}

/// Errors from the validation layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidateError {
    #[error("insufficient data: got {got} candles, need at least {min}")]
    InsufficientData { got: usize, min: usize },

    #[error("no candidate strategy is suitable for the {regime} regime")]
    NoCandidates { regime: MarketRegime },
}

/// One candidate's score card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyEvaluation {
    pub strategy: StrategyConfig,
    /// `win_rate * avg_win - (1 - win_rate) * avg_loss`, in fractional move
    /// units per signal.
    pub expectancy: f64,
    /// Fraction of scored signals that won, in [0, 1].
    pub win_rate: f64,
    /// Mean absolute fractional move across winning signals.
    pub average_win: f64,
    /// Mean absolute fractional move across losing signals.
    pub average_loss: f64,
    pub signals_scored: usize,
}

/// Scores regime-suitable candidates on the held-out slice and ranks them.
///
/// The returned list contains only candidates with positive expectancy,
/// sorted descending; ties keep candidate order. A candidate that never
/// signals on the test slice scores 0 and is dropped.
pub fn rank_strategies(
    candidates: &[StrategyConfig],
    candles: &[Candle],
    regime: MarketRegime,
    config: &ValidatorConfig,
) -> Result<Vec<StrategyEvaluation>, ValidateError> {
    if candles.len() < MIN_CANDLES {
        return Err(ValidateError::InsufficientData {
            got: candles.len(),
            min: MIN_CANDLES,
        });
    }

    let suitable: Vec<&StrategyConfig> = candidates
        .iter()
        .filter(|candidate| candidate.suitable_regimes.contains(&regime))
        .collect();
    if suitable.is_empty() {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        return Err(ValidateError::NoCandidates { regime });
    }

    let train_len = (candles.len() as f64 * config.train_fraction).floor() as usize;
    let test = &candles[train_len.min(candles.len())..];

    let mut evaluations: Vec<StrategyEvaluation> = suitable
        .par_iter()
        .map(|candidate| score_candidate(candidate, test))
        .collect();

    evaluations.retain(|evaluation| evaluation.expectancy > 0.0);
    // Vec::sort_by is stable, so equal expectancies keep candidate order.
    evaluations.sort_by(|a, b| {
        b.expectancy
            .partial_cmp(&a.expectancy)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(evaluations)
}

/// Thin wrapper over [`rank_strategies`] returning just the ranked configs.
pub fn validate(
    candidates: &[StrategyConfig],
    candles: &[Candle],
    regime: MarketRegime,
    config: &ValidatorConfig,
) -> Result<Vec<StrategyConfig>, ValidateError> {
    let evaluations = rank_strategies(candidates, candles, regime, config)?;
    Ok(evaluations
        .into_iter()
        .map(|evaluation| evaluation.strategy)
        .collect())
}

/// One-step-ahead scoring of a single candidate on the test slice.
///
/// For `i` in `50 ..= test.len() - 2`: snapshot over `test[..i]`, signal for
/// `test[i]`, outcome judged against `test[i + 1].close`. A zero move counts
/// as a loss of zero magnitude.
fn score_candidate(candidate: &StrategyConfig, test: &[Candle]) -> StrategyEvaluation {
    let mut wins = 0usize;
    let mut losses = 0usize;
    let mut win_sum = 0.0;
    let mut loss_sum = 0.0;

    if test.len() >= MIN_CANDLES + 2 {
        for i in MIN_CANDLES..=test.len() - 2 {
            let snapshot = calculate_indicators(&test[..i], candidate);
            let signal = generate_signal(&test[i], &snapshot);
            let direction = match signal {
                Signal::Long => 1.0,
                Signal::Short => -1.0,
                Signal::Neutral => continue,
            };

            let current = test[i].close;
            if current == 0.0 {
                continue;
            }
            let fractional_move = (test[i + 1].close - current) / current;
            let outcome = fractional_move * direction;
            if outcome > 0.0 {
                wins += 1;
                win_sum += outcome;
            } else {
                losses += 1;
                loss_sum += -outcome;
            }
        }
    }

    let scored = wins + losses;
    let win_rate = if scored > 0 {
        wins as f64 / scored as f64
    } else {
        0.0
    };
    let average_win = if wins > 0 { win_sum / wins as f64 } else { 0.0 };
    let average_loss = if losses > 0 {
        loss_sum / losses as f64
    } else {
        0.0
    };
    let expectancy = win_rate * average_win - (1.0 - win_rate) * average_loss;

    StrategyEvaluation {
        strategy: candidate.clone(),
        expectancy,
        win_rate,
        average_win,
        average_loss,
        signals_scored: scored,
    }
}
