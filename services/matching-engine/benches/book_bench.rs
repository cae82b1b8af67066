use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use matching_engine::OrderBook;
use types::{Order, OrderId, OwnerId, PriceTick, Quantity, Side, TimeInForce};

fn limit_order(id: u64, owner: u32, side: Side, price: i64, qty: u32) -> Order {
    Order::limit(
        OrderId::new(id),
        OwnerId::new(owner),
        side,
        PriceTick::new(price),
        Quantity::new(qty),
        TimeInForce::GTC,
    )
}

fn bench_order_submission(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_submission");

    for &num_orders in [100u64, 1_000, 10_000].iter() {
        group.bench_with_input(
            BenchmarkId::new("non_crossing_orders", num_orders),
            &num_orders,
            |b, &num_orders| {
                b.iter(|| {
                    let book = OrderBook::new();
                    for i in 0..num_orders {
                        let order = if i % 2 == 0 {
                            limit_order(i + 1, 1, Side::Buy, 10_000 - i as i64, 100)
                        } else {
                            limit_order(i + 1, 2, Side::Sell, 10_100 + i as i64, 100)
                        };
                        black_box(book.submit_order(order));
                    }
                })
            },
        );
    }

    group.finish();
}

fn bench_order_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_matching");

    for &depth in [10u64, 100, 1_000].iter() {
        group.bench_with_input(
            BenchmarkId::new("crossing_sweep", depth),
            &depth,
            |b, &depth| {
                b.iter_batched(
                    || {
                        let book = OrderBook::new();
                        for i in 0..depth {
                            book.submit_order(limit_order(
                                i + 1,
                                1,
                                Side::Sell,
                                10_000 + i as i64,
                                100,
                            ));
                        }
                        book
                    },
                    |book| {
                        // One marketable buy walks the whole ask ladder.
                        let taker = limit_order(
                            depth + 1,
                            2,
                            Side::Buy,
                            10_000 + depth as i64,
                            100 * depth as u32,
                        );
                        black_box(book.submit_order(taker));
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_cancel(c: &mut Criterion) {
    let mut group = c.benchmark_group("cancel");

    group.bench_function("cancel_resting", |b| {
        b.iter_batched(
            || {
                let book = OrderBook::new();
                for i in 0..1_000u64 {
                    book.submit_order(limit_order(i + 1, 1, Side::Buy, 9_000 + i as i64, 10));
                }
                book
            },
            |book| {
                for i in 0..1_000u64 {
                    black_box(book.cancel_order(OrderId::new(i + 1)));
                }
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_order_submission,
    bench_order_matching,
    bench_cancel
);
criterion_main!(benches);
