//! StratSim Runner — orchestration around the core engine.
//!
//! This crate builds on `stratsim-core` to provide:
//! - CSV candle loading with data-quality warnings and content hashing
//! - Seeded synthetic candle generation
//! - Market regime detection
//! - Candidate validation and expectancy ranking
//! - TOML run files
//! - JSON/CSV run artifact export with schema versioning

pub mod config;
pub mod data;
pub mod export;
pub mod fingerprint;
pub mod regime;
pub mod synthetic;
pub mod validator;

pub use config::{BacktestSection, ConfigError, RunFile};
pub use data::{load_candles, parse_candles, LoadError, LoadedSeries};
pub use export::{
    export_equity_csv, export_json, export_trades_csv, import_json, load_artifacts,
    save_artifacts, RunArtifact, RunManifest, SCHEMA_VERSION,
};
pub use fingerprint::{dataset_hash, strategy_hash};
pub use regime::detect_regime;
pub use synthetic::{generate_series, steady_faller, steady_riser, SyntheticSpec};
pub use validator::{rank_strategies, validate, StrategyEvaluation, ValidateError, ValidatorConfig};
