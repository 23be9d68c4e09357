//! SimulatedPosition — one open position inside the backtest engine.

use serde::{Deserialize, Serialize};

/// Direction of a position or trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// +1 for Long, -1 for Short. Lets pnl math stay branch-free.
    pub fn sign(&self) -> f64 {
        match self {
            PositionSide::Long => 1.0,
            PositionSide::Short => -1.0,
        }
    }

    pub fn opposite(&self) -> PositionSide {
        match self {
            PositionSide::Long => PositionSide::Short,
            PositionSide::Short => PositionSide::Long,
        }
    }
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionSide::Long => f.write_str("Long"),
            PositionSide::Short => f.write_str("Short"),
        }
    }
}

/// An open position with its protective bracket.
///
/// The engine holds at most one of these at a time. Both bracket legs are
/// absolute prices fixed at entry; they never move during the trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedPosition {
    pub side: PositionSide,
    pub entry_price: f64,
    /// Milliseconds since the Unix epoch, from the entry candle.
    pub entry_time: i64,
    /// Units of the instrument, sized so a stop exit loses the risk amount.
    pub size: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl SimulatedPosition {
    /// Realized pnl if the position were closed at `exit_price`.
    pub fn pnl_at(&self, exit_price: f64) -> f64 {
        (exit_price - self.entry_price) * self.size * self.side.sign()
    }

    /// Pnl as a percentage of the entry notional. 0 when the notional is 0.
    pub fn pnl_percentage_at(&self, exit_price: f64) -> f64 {
        let notional = self.entry_price * self.size;
        if notional == 0.0 {
            return 0.0;
        }
        self.pnl_at(exit_price) / notional * 100.0
    }
}
