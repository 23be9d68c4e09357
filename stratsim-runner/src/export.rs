//! Run artifact export — JSON and CSV persistence for backtest results.
//!
//! A run is persisted as a directory of three files:
//! - `result.json` — manifest (hashes, provenance) plus the full result
//! - `trades.csv` — the trade log for external analysis tools
//! - `equity.csv` — per-candle equity and drawdown columns
//!
//! The manifest carries a `schema_version`; files written by a newer schema
//! are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use stratsim_core::domain::Trade;
use stratsim_core::engine::BacktestResult;

/// Version stamp written into every manifest.
pub const SCHEMA_VERSION: u32 = 1;

// ── Manifest ──

/// Provenance record for one run: what data, what strategy, when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    /// RFC 3339 UTC creation time.
    pub created_at: String,
    pub dataset_hash: String,
    pub strategy_hash: String,
    /// True when the candles came from the synthetic generator.
    pub synthetic_data: bool,
}

impl RunManifest {
    pub fn new(dataset_hash: String, strategy_hash: String, synthetic_data: bool) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            created_at: chrono::Utc::now().to_rfc3339(),
            dataset_hash,
            strategy_hash,
            synthetic_data,
        }
    }
}

/// The unit persisted to `result.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunArtifact {
    pub manifest: RunManifest,
    pub result: BacktestResult,
}

// ── JSON ──

/// Serialize a run artifact to pretty JSON.
pub fn export_json(artifact: &RunArtifact) -> Result<String> {
    serde_json::to_string_pretty(artifact).context("failed to serialize run artifact to JSON")
}

/// Deserialize a run artifact, rejecting manifests from a newer schema.
pub fn import_json(json: &str) -> Result<RunArtifact> {
    let artifact: RunArtifact =
        serde_json::from_str(json).context("failed to deserialize run artifact from JSON")?;
    if artifact.manifest.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            artifact.manifest.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(artifact)
}

// ── CSV ──

/// Export the trade log as CSV.
///
/// Columns: side, entry_time, entry_date, entry_price, exit_time, exit_date,
/// exit_price, exit_reason, size, pnl, pnl_percentage. Dates are UTC renderings
/// of the millisecond timestamps.
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "side",
        "entry_time",
        "entry_date",
        "entry_price",
        "exit_time",
        "exit_date",
        "exit_price",
        "exit_reason",
        "size",
        "pnl",
        "pnl_percentage",
    ])?;

    for t in trades {
        wtr.write_record([
            &t.side.to_string(),
            &t.entry_time.to_string(),
            &format_timestamp(t.entry_time),
            &format!("{:.6}", t.entry_price),
            &t.exit_time.to_string(),
            &format_timestamp(t.exit_time),
            &format!("{:.6}", t.exit_price),
            &t.exit_reason.to_string(),
            &format!("{:.6}", t.size),
            &format!("{:.2}", t.pnl),
            &format!("{:.2}", t.pnl_percentage),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the equity curve and drawdown track as CSV.
///
/// The two slices are parallel; rows are truncated to the shorter one.
pub fn export_equity_csv(equity: &[f64], drawdowns: &[f64]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["candle_index", "equity", "drawdown_pct"])?;
    for (i, (eq, dd)) in equity.iter().zip(drawdowns.iter()).enumerate() {
        wtr.write_record([
            &i.to_string(),
            &format!("{:.2}", eq),
            &format!("{:.4}", dd),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ── Artifact bundle ──

/// Save the full artifact set for one run.
///
/// Creates `{symbol}_{strategy_id}_{timestamp}/` under `output_dir` with
/// `result.json`, `trades.csv`, and `equity.csv`. Returns the created
/// directory.
pub fn save_artifacts(
    result: &BacktestResult,
    manifest: &RunManifest,
    output_dir: &Path,
) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}_{}",
        result.symbol,
        result.strategy_id,
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let artifact = RunArtifact {
        manifest: manifest.clone(),
        result: result.clone(),
    };
    std::fs::write(run_dir.join("result.json"), export_json(&artifact)?)?;
    std::fs::write(run_dir.join("trades.csv"), export_trades_csv(&result.trades)?)?;
    std::fs::write(
        run_dir.join("equity.csv"),
        export_equity_csv(&result.equity, &result.drawdowns)?,
    )?;

    Ok(run_dir)
}

/// Load a run artifact back from its directory. Rejects newer schemas.
pub fn load_artifacts(dir: &Path) -> Result<RunArtifact> {
    let path = dir.join("result.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
