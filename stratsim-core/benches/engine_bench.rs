//! Criterion benchmarks for simulator hot paths.
//!
//! Benchmarks:
//! 1. Full backtest loop (per preset, per series length)
//! 2. Indicator snapshot calculation (per style, per window length)
//! 3. Performance aggregation over a large trade log

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use stratsim_core::domain::{Candle, ExitReason, PositionSide, StrategyConfig, Timeframe, Trade};
use stratsim_core::engine::{run_backtest, EngineConfig};
use stratsim_core::indicators::calculate_indicators;
use stratsim_core::metrics;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_candles(n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close - 0.3;
            let high = close + 1.5;
            let low = close - 1.8;
            Candle {
                symbol: "BENCH".to_string(),
                timestamp: 1_700_000_000_000 + i as i64 * 3_600_000,
                open,
                high,
                low,
                close,
                volume: 1_000.0 + (i % 50) as f64 * 100.0,
                timeframe: Timeframe::H1,
            }
        })
        .collect()
}

fn make_trades(n: usize) -> Vec<Trade> {
    (0..n)
        .map(|i| {
            let win = i % 3 != 0;
            let pnl = if win { 120.0 } else { -80.0 };
            Trade {
                entry_time: 1_700_000_000_000 + i as i64 * 7_200_000,
                entry_price: 100.0,
                exit_time: 1_700_000_000_000 + i as i64 * 7_200_000 + 3_600_000,
                exit_price: 100.0 + pnl / 10.0,
                exit_reason: if win {
                    ExitReason::TakeProfit
                } else {
                    ExitReason::StopLoss
                },
                side: PositionSide::Long,
                size: 10.0,
                pnl,
                pnl_percentage: pnl / 10.0,
            }
        })
        .collect()
}

// ── 1. Full Backtest Loop ────────────────────────────────────────────

fn bench_backtest_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("backtest_loop");
    let config = EngineConfig::default();

    // A month, a quarter, and a year of hourly candles.
    for &candle_count in &[720, 2_160, 8_760] {
        let candles = make_candles(candle_count);
        for strategy in StrategyConfig::presets() {
            group.bench_with_input(
                BenchmarkId::new(strategy.id.clone(), candle_count),
                &candle_count,
                |b, _| {
                    b.iter(|| {
                        run_backtest(black_box(&candles), black_box(&strategy), &config)
                    });
                },
            );
        }
    }

    group.finish();
}

// ── 2. Indicator Snapshot ────────────────────────────────────────────

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_snapshot");

    for &window in &[200, 1_000] {
        let candles = make_candles(window);
        for strategy in StrategyConfig::presets() {
            group.bench_with_input(
                BenchmarkId::new(strategy.id.clone(), window),
                &window,
                |b, _| {
                    b.iter(|| {
                        calculate_indicators(black_box(&candles), black_box(&strategy))
                    });
                },
            );
        }
    }

    group.finish();
}

// ── 3. Performance Aggregation ───────────────────────────────────────

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    let trades = make_trades(500);
    let equity: Vec<f64> = (0..2_000)
        .scan(10_000.0_f64, |capital, i| {
            *capital += (i as f64 * 0.07).sin() * 25.0;
            Some(*capital)
        })
        .collect();

    group.bench_function("500_trades_2000_points", |b| {
        b.iter(|| metrics::aggregate(black_box(&trades), black_box(&equity)));
    });

    group.finish();
}

criterion_group!(benches, bench_backtest_loop, bench_snapshot, bench_aggregate);
criterion_main!(benches);
