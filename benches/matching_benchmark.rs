// ============================================================================
// Matching Engine Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Full Matching - End-to-end submissions through the engine
// 2. Sweeps - Market orders walking many price levels
// 3. Order Book Operations - Snapshot and resting inserts
// 4. Sequencer - Queue round trip on top of the engine
// ============================================================================

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use order_matcher::prelude::*;
use rust_decimal::Decimal;
use std::hint::black_box;
use std::sync::Arc;

fn engine() -> MatchingEngine {
    MatchingEngineBuilder::new("BTC-USD")
        .build(Arc::new(NoOpEventHandler))
        .unwrap()
}

fn limit(id: String, side: Side, price: i64, qty: i64) -> OrderRequest {
    OrderRequest::limit(id, side, Decimal::from(price), Decimal::from(qty))
}

fn populated(levels: i64, per_level: i64) -> MatchingEngine {
    let engine = engine();
    for level in 0..levels {
        for n in 0..per_level {
            engine
                .submit(limit(format!("s{}-{}", level, n), Side::Sell, 50000 + level, 1))
                .unwrap();
        }
    }
    engine
}

// ============================================================================
// Full Matching Engine Benchmarks
// ============================================================================

fn benchmark_price_time_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_time_matching");

    for num_orders in [100i64, 1000, 10000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_orders),
            num_orders,
            |b, &num_orders| {
                let engine = populated(num_orders / 10, 10);
                let mut next = 0u64;

                b.iter(|| {
                    // Refill the best level, then take one lot from its head
                    next += 1;
                    engine
                        .submit(limit(format!("r{}", next), Side::Sell, 50000, 1))
                        .unwrap();
                    black_box(
                        engine
                            .submit(OrderRequest::market(
                                format!("m{}", next),
                                Side::Buy,
                                Decimal::ONE,
                            ))
                            .unwrap(),
                    );
                });
            },
        );
    }

    group.finish();
}

fn benchmark_market_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_sweep");

    for levels in [10i64, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(levels), levels, |b, &levels| {
            b.iter_batched(
                || populated(levels, 5),
                |engine| {
                    black_box(
                        engine
                            .submit(OrderRequest::market(
                                "sweep",
                                Side::Buy,
                                Decimal::from(levels * 5),
                            ))
                            .unwrap(),
                    )
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// Order Book Operations Benchmarks
// ============================================================================

fn benchmark_order_book_snapshot(c: &mut Criterion) {
    c.bench_function("order_book_snapshot", |b| {
        let engine = engine();

        // Pre-populate book with 100 levels on each side
        for i in 0..100 {
            engine
                .submit(limit(format!("buyer{}", i), Side::Buy, 49900 - i * 10, 1))
                .unwrap();
            engine
                .submit(limit(format!("seller{}", i), Side::Sell, 50100 + i * 10, 1))
                .unwrap();
        }

        b.iter(|| {
            black_box(engine.get_snapshot(10));
        });
    });
}

fn benchmark_order_submission_no_match(c: &mut Criterion) {
    c.bench_function("order_submission_no_match", |b| {
        let engine = populated(100, 1);
        let mut next = 0u64;

        b.iter(|| {
            // Bid below every ask rests without trading
            next += 1;
            black_box(
                engine
                    .submit(limit(format!("b{}", next), Side::Buy, 40000, 1))
                    .unwrap(),
            );
        });
    });
}

// ============================================================================
// Sequencer Benchmarks
// ============================================================================

fn benchmark_sequencer_round_trip(c: &mut Criterion) {
    c.bench_function("sequencer_round_trip", |b| {
        let sequencer = Sequencer::spawn(Arc::new(populated(10, 10))).unwrap();
        let handle = sequencer.handle();
        let mut next = 0u64;

        b.iter(|| {
            next += 1;
            handle
                .submit(limit(format!("r{}", next), Side::Sell, 50000, 1))
                .unwrap();
            black_box(
                handle
                    .submit(OrderRequest::market(format!("m{}", next), Side::Buy, Decimal::ONE))
                    .unwrap(),
            );
        });

        sequencer.shutdown();
    });
}

criterion_group!(
    benches,
    benchmark_price_time_matching,
    benchmark_market_sweep,
    benchmark_order_book_snapshot,
    benchmark_order_submission_no_match,
    benchmark_sequencer_round_trip,
);
criterion_main!(benches);
