//! Benchmarks for indicator implementations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use screener_core::traits::{BarIndicator, Indicator, MultiOutputIndicator};
use screener_core::types::Bar;
use screener_indicators::{AccumulationDistribution, Atr, Macd, RollingHigh, Rsi, Sma};

fn generate_bars(size: usize) -> Vec<Bar> {
    (0..size)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar::new(i as i64, close, close + 1.0, close - 1.0, close, 1_000.0 + i as f64)
        })
        .collect()
}

fn benchmark_close_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("close");

    for size in [90, 1000, 10000].iter() {
        let closes: Vec<f64> = generate_bars(*size).iter().map(|b| b.close).collect();

        group.bench_with_input(BenchmarkId::new("sma20", size), &closes, |b, data| {
            let sma = Sma::new(20);
            b.iter(|| sma.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("rsi14", size), &closes, |b, data| {
            let rsi = Rsi::new(14);
            b.iter(|| rsi.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("macd", size), &closes, |b, data| {
            let macd = Macd::new();
            b.iter(|| macd.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("high20", size), &closes, |b, data| {
            let high = RollingHigh::new(20);
            b.iter(|| high.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_bar_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("bars");

    for size in [90, 1000, 10000].iter() {
        let bars = generate_bars(*size);

        group.bench_with_input(BenchmarkId::new("atr14", size), &bars, |b, bars| {
            let atr = Atr::new(14);
            b.iter(|| atr.calculate_bars(black_box(bars)))
        });

        group.bench_with_input(BenchmarkId::new("ad_line", size), &bars, |b, bars| {
            let ad = AccumulationDistribution::new();
            b.iter(|| ad.calculate_bars(black_box(bars)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_close_indicators, benchmark_bar_indicators);
criterion_main!(benches);
