//! StratSim CLI — backtest and strategy-selection commands.
//!
//! Commands:
//! - `run` — execute a backtest from a TOML run file or named preset
//! - `select` — detect the market regime and rank candidates by expectancy
//!
//! Both commands take their candles from `--data <csv>` or from the seeded
//! synthetic generator (`--synthetic`), never from the network.

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use stratsim_core::domain::{Candle, StrategyConfig, Timeframe};
use stratsim_core::engine::{run_backtest, BacktestResult, EngineConfig};
use stratsim_runner::{
    dataset_hash, detect_regime, generate_series, load_candles, rank_strategies, save_artifacts,
    strategy_hash, RunFile, RunManifest, SyntheticSpec, ValidatorConfig,
};

#[derive(Parser)]
#[command(
    name = "stratsim",
    about = "StratSim CLI — deterministic strategy backtesting"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML run file or named preset.
    Run {
        /// Path to a TOML run file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Named preset: trend-following, mean-reversion, breakout.
        #[arg(long)]
        preset: Option<String>,

        #[command(flatten)]
        data: DataArgs,

        /// Save artifacts (result.json, trades.csv, equity.csv) under this directory.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Detect the market regime and rank candidate strategies by expectancy.
    Select {
        /// Rank the run file's strategy instead of the built-in presets.
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        data: DataArgs,
    },
}

/// Candle-source flags shared by both commands.
#[derive(Args)]
struct DataArgs {
    /// Candle CSV file (timestamp,open,high,low,close,volume).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Generate a seeded synthetic series instead of loading a file.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Symbol label for the series.
    #[arg(long, default_value = "SYNTH")]
    symbol: String,

    /// Candle interval: 1m, 5m, 15m, 1h, 4h, 1d.
    #[arg(long, default_value = "1h")]
    timeframe: String,

    /// Synthetic series length.
    #[arg(long, default_value_t = 500)]
    candles: usize,

    /// Synthetic seed; the same seed always yields the same series.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Synthetic mean close-to-close return per candle.
    #[arg(long, default_value_t = 0.0)]
    drift: f64,

    /// Synthetic return noise half-width per candle.
    #[arg(long, default_value_t = 0.01)]
    volatility: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            preset,
            data,
            output,
        } => run_cmd(config, preset, data, output),
        Commands::Select { config, data } => select_cmd(config, data),
    }
}

/// A candle series plus the provenance the manifest records.
struct Series {
    candles: Vec<Candle>,
    dataset_hash: String,
    synthetic: bool,
}

fn load_series(args: &DataArgs) -> Result<Series> {
    if args.data.is_some() && args.synthetic {
        bail!("--data and --synthetic are mutually exclusive");
    }

    let timeframe: Timeframe = args
        .timeframe
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    if let Some(path) = &args.data {
        let loaded = load_candles(path, &args.symbol, timeframe)?;
        for warning in &loaded.warnings {
            eprintln!("WARNING: {warning}");
        }
        return Ok(Series {
            candles: loaded.candles,
            dataset_hash: loaded.dataset_hash,
            synthetic: false,
        });
    }

    if !args.synthetic {
        bail!("one of --data or --synthetic is required");
    }

    let spec = SyntheticSpec {
        timeframe,
        drift: args.drift,
        volatility: args.volatility,
        seed: args.seed,
        ..SyntheticSpec::new(&args.symbol, args.candles)
    };
    let candles = generate_series(&spec);
    let hash = dataset_hash(&candles);

    Ok(Series {
        candles,
        dataset_hash: hash,
        synthetic: true,
    })
}

fn preset_strategy(name: &str) -> Result<StrategyConfig> {
    match name {
        "trend-following" => Ok(StrategyConfig::trend_following()),
        "mean-reversion" => Ok(StrategyConfig::mean_reversion()),
        "breakout" => Ok(StrategyConfig::breakout()),
        _ => bail!("unknown preset '{name}'. Valid: trend-following, mean-reversion, breakout"),
    }
}

fn run_cmd(
    config_path: Option<PathBuf>,
    preset_name: Option<String>,
    data: DataArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    if config_path.is_some() && preset_name.is_some() {
        bail!("--config and --preset are mutually exclusive");
    }

    let (strategy, engine_config) = if let Some(path) = config_path {
        let run_file = RunFile::from_file(&path)?;
        let engine_config = run_file.engine_config();
        (run_file.strategy, engine_config)
    } else if let Some(name) = preset_name {
        (preset_strategy(&name)?, EngineConfig::default())
    } else {
        bail!("one of --config or --preset is required");
    };

    let series = load_series(&data)?;
    let result = run_backtest(&series.candles, &strategy, &engine_config)?;

    print_summary(&result, series.synthetic);

    if let Some(output_dir) = output {
        let manifest = RunManifest::new(
            series.dataset_hash,
            strategy_hash(&strategy),
            series.synthetic,
        );
        let run_dir = save_artifacts(&result, &manifest, &output_dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }

    Ok(())
}

fn select_cmd(config_path: Option<PathBuf>, data: DataArgs) -> Result<()> {
    let (candidates, validator_config) = match config_path {
        Some(path) => {
            let run_file = RunFile::from_file(&path)?;
            let validator_config = run_file.validator_config();
            (vec![run_file.strategy], validator_config)
        }
        None => (StrategyConfig::presets(), ValidatorConfig::default()),
    };

    let series = load_series(&data)?;
    let regime = detect_regime(&series.candles);
    println!("Detected regime: {regime}");

    let ranked = rank_strategies(&candidates, &series.candles, regime, &validator_config)?;
    if ranked.is_empty() {
        println!("No candidate beats zero expectancy on the held-out slice.");
        return Ok(());
    }

    println!();
    println!(
        "{:<4} {:<18} {:>12} {:>10} {:>8}",
        "#", "Strategy", "Expectancy", "Win Rate", "Signals"
    );
    println!("{}", "-".repeat(56));
    for (rank, eval) in ranked.iter().enumerate() {
        println!(
            "{:<4} {:<18} {:>11.4}% {:>9.1}% {:>8}",
            rank + 1,
            eval.strategy.id,
            eval.expectancy * 100.0,
            eval.win_rate * 100.0,
            eval.signals_scored,
        );
    }
    if series.synthetic {
        println!();
        println!("WARNING: Ranking based on SYNTHETIC data");
    }

    Ok(())
}

fn print_summary(result: &BacktestResult, synthetic: bool) {
    println!();
    println!("=== Backtest Result ===");
    println!(
        "Strategy:       {} ({})",
        result.strategy_name, result.strategy_id
    );
    println!("Symbol:         {} {}", result.symbol, result.timeframe);
    println!(
        "Period:         {} to {}",
        format_timestamp(result.start_time),
        format_timestamp(result.end_time)
    );
    println!("Trades:         {}", result.trades.len());
    println!();
    println!("--- Performance ---");
    println!("Initial:        ${:.2}", result.initial_capital);
    println!("Final:          ${:.2}", result.final_capital);
    println!(
        "Total PnL:      ${:.2} ({:.2}%)",
        result.total_pnl, result.total_pnl_percentage
    );
    println!("Win Rate:       {:.1}%", result.win_rate * 100.0);
    println!("Avg Win:        ${:.2}", result.average_win);
    println!("Avg Loss:       ${:.2}", result.average_loss);
    println!("Profit Factor:  {:.2}", result.profit_factor);
    println!("Max Drawdown:   {:.2}%", result.max_drawdown);
    println!("Sharpe:         {:.3}", result.sharpe_ratio);
    if synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}

fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}
