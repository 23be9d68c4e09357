//! Trade — a completed round-trip with its exit cause.

use super::position::PositionSide;
use serde::{Deserialize, Serialize};

/// Why a position was closed.
///
/// Wire form matches the dashboard labels exactly (`"Stop Loss"` etc.), so
/// exported artifacts stay readable by the existing front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    #[serde(rename = "Stop Loss")]
    StopLoss,
    #[serde(rename = "Take Profit")]
    TakeProfit,
    #[serde(rename = "Signal Reversal")]
    SignalReversal,
    #[serde(rename = "End of Test")]
    EndOfTest,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExitReason::StopLoss => "Stop Loss",
            ExitReason::TakeProfit => "Take Profit",
            ExitReason::SignalReversal => "Signal Reversal",
            ExitReason::EndOfTest => "End of Test",
        };
        f.write_str(s)
    }
}

/// A complete round-trip trade: entry through exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    // ── Entry ──
    pub entry_time: i64,
    pub entry_price: f64,

    // ── Exit ──
    pub exit_time: i64,
    pub exit_price: f64,
    pub exit_reason: ExitReason,

    // ── Direction & size ──
    pub side: PositionSide,
    pub size: f64,

    // ── PnL ──
    pub pnl: f64,
    /// Return on the entry notional, percent.
    pub pnl_percentage: f64,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    /// Holding time in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.exit_time - self.entry_time
    }
}
