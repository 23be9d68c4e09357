//! Run files — TOML descriptions of a single backtest run.
//!
//! A run file has a `[strategy]` table deserializing straight into
//! `StrategyConfig` and an optional `[backtest]` table overriding engine and
//! validator defaults:
//!
//! ```toml
//! [strategy]
//! id = "trend-custom"
//! name = "Custom Trend"
//! style = "trend"
//! risk_per_trade = 0.015
//! take_profit_ratio = 2.0
//! stop_loss_type = "atr"
//! suitable_regimes = ["trending"]
//!
//! [backtest]
//! initial_capital = 25000.0
//! exit_priority = "target_first"
//! train_fraction = 0.8
//! ```
//!
//! Strategy constraints are checked at parse time; the engine assumes a
//! validated config.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stratsim_core::domain::{StrategyConfig, StrategyError};
use stratsim_core::engine::EngineConfig;

use crate::validator::ValidatorConfig;

/// Errors from the run-file layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read run file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse run file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid strategy: {0}")]
    Invalid(#[from] StrategyError),
}

/// A parsed run file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFile {
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub backtest: Option<BacktestSection>,
}

/// Optional `[backtest]` overrides. Absent fields fall back to the engine
/// and validator defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    pub initial_capital: Option<f64>,
    pub exit_priority: Option<stratsim_core::engine::ExitPriority>,
    pub train_fraction: Option<f64>,
}

impl RunFile {
    /// Parse and validate a run file from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let run: RunFile = toml::from_str(text)?;
        run.strategy.validate()?;
        Ok(run)
    }

    /// Parse and validate a run file from disk.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Engine configuration with this file's overrides applied.
    pub fn engine_config(&self) -> EngineConfig {
        let section = self.backtest.unwrap_or_default();
        let mut config = EngineConfig::default();
        if let Some(capital) = section.initial_capital {
            config.initial_capital = capital;
        }
        if let Some(priority) = section.exit_priority {
            config.exit_priority = priority;
        }
        config
    }

    /// Validator configuration with this file's overrides applied.
    pub fn validator_config(&self) -> ValidatorConfig {
        let section = self.backtest.unwrap_or_default();
        let mut config = ValidatorConfig::default();
        if let Some(fraction) = section.train_fraction {
            config.train_fraction = fraction;
        }
        config
    }
}
