//! Performance benchmarks for the book update path

use binance_book::{
    data::*,
    orderbook::BookEngine,
    parser::{BinanceParser, FeedParser},
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;

fn snapshot(depth: usize) -> (Vec<PriceLevel>, Vec<PriceLevel>) {
    let bids = (0..depth)
        .map(|i| PriceLevel::new(Decimal::new(2_007_854 - i as i64, 2), Decimal::new(431, 5)))
        .collect();
    let asks = (0..depth)
        .map(|i| PriceLevel::new(Decimal::new(2_007_891 + i as i64, 2), Decimal::new(3437, 5)))
        .collect();
    (bids, asks)
}

fn bench_replace(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace");

    for depth in [5usize, 10, 20].iter() {
        let (bids, asks) = snapshot(*depth);
        let mut book = BookEngine::new(*depth);

        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, _| {
            b.iter(|| book.replace(black_box(&bids), black_box(&asks)))
        });
    }

    group.finish();
}

fn bench_apply_bbo(c: &mut Criterion) {
    let (bids, asks) = snapshot(20);

    // improving best: append fast path
    let improve = BookTicker::new(
        Decimal::new(2_007_855, 2),
        Decimal::ONE,
        Decimal::new(2_007_890, 2),
        Decimal::ONE,
    );
    // best moves back five ticks: binary search and truncate
    let uncross = BookTicker::new(
        Decimal::new(2_007_849, 2),
        Decimal::ONE,
        Decimal::new(2_007_896, 2),
        Decimal::ONE,
    );

    let mut book = BookEngine::new(20);
    c.bench_function("apply_bbo_improve", |b| {
        b.iter(|| {
            book.replace(&bids, &asks);
            book.apply_bbo(black_box(&improve));
        })
    });

    c.bench_function("apply_bbo_uncross", |b| {
        b.iter(|| {
            book.replace(&bids, &asks);
            book.apply_bbo(black_box(&uncross));
        })
    });
}

fn bench_parse(c: &mut Criterion) {
    let parser = BinanceParser::new();
    let ticker = r#"{"u":34698491814,"s":"BTCUSDT","b":"20078.54000000","B":"0.00431000","a":"20078.91000000","A":"0.03497000"}"#;
    let depth = r#"{"lastUpdateId":34698491742,"bids":[["20078.54000000","0.00431000"],["20078.39000000","0.00100000"],["20078.27000000","0.00070000"],["20078.21000000","0.00066000"],["20077.91000000","0.03781000"]],"asks":[["20078.91000000","0.03437000"],["20078.95000000","0.00100000"],["20078.99000000","0.00498000"],["20079.01000000","0.04981000"],["20079.09000000","0.00070000"]]}"#;

    c.bench_function("parse_ticker", |b| {
        b.iter(|| {
            let _ = parser.parse_message(black_box(ticker));
        })
    });

    c.bench_function("parse_depth", |b| {
        b.iter(|| {
            let _ = parser.parse_message(black_box(depth));
        })
    });
}

criterion_group!(benches, bench_replace, bench_apply_bbo, bench_parse);
criterion_main!(benches);
