//! Backtest engine: state machine, simulator loop, and run result.

pub mod simulator;
pub mod state;

pub use simulator::{run_backtest, ATR_STOP_MULTIPLE, PERCENT_STOP_FRACTION};
pub use state::{
    BacktestError, BacktestResult, EngineConfig, EngineState, ExitPriority,
    DEFAULT_INITIAL_CAPITAL,
};
