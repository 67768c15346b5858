//! Benchmarks for iran_banks performance testing.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use iran_banks::{
    batch::{count_valid, detect_batch},
    bank::BinTable,
    check, clean_card_number, detect_bank, luhn, mask_card_number, BankDetector, BatchDetector,
};

// Test card numbers
const MELLI: &str = "6037991234567893";
const MELLI_FORMATTED: &str = "6037-9912-3456-7893";
const MELLAT: &str = "6104331234567890";
const UNKNOWN_BIN: &str = "1234561234567896";
const BAD_CHECKSUM: &str = "6037991234567890";

const MELLI_DIGITS: [u8; 16] = [6, 0, 3, 7, 9, 9, 1, 2, 3, 4, 5, 6, 7, 8, 9, 3];

/// Benchmark single card detection
fn bench_single_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_detection");

    group.bench_function("valid_raw", |b| {
        b.iter(|| detect_bank(black_box(MELLI), "en"))
    });

    group.bench_function("valid_formatted", |b| {
        b.iter(|| detect_bank(black_box(MELLI_FORMATTED), "en"))
    });

    group.bench_function("valid_persian", |b| {
        b.iter(|| detect_bank(black_box(MELLI), "fa"))
    });

    group.bench_function("unknown_bank", |b| {
        b.iter(|| detect_bank(black_box(UNKNOWN_BIN), "en"))
    });

    group.bench_function("invalid_format", |b| {
        b.iter(|| detect_bank(black_box("1234"), "en"))
    });

    group.bench_function("typed_check", |b| b.iter(|| check(black_box(MELLI))));

    group.finish();
}

/// Benchmark the pipeline stages on their own
fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");

    group.bench_function("clean", |b| {
        b.iter(|| clean_card_number(black_box(MELLI_FORMATTED)))
    });

    group.bench_function("luhn_16_generic", |b| {
        b.iter(|| luhn::validate(black_box(&MELLI_DIGITS)))
    });

    group.bench_function("luhn_16_optimized", |b| {
        b.iter(|| luhn::validate_16(black_box(&MELLI_DIGITS)))
    });

    let table = BinTable::builtin();
    group.bench_function("bin_lookup", |b| b.iter(|| table.get(black_box("603799"))));

    group.bench_function("mask", |b| {
        b.iter(|| mask_card_number(black_box(MELLI_FORMATTED)))
    });

    group.finish();
}

/// Benchmark batch detection with various sizes
fn bench_batch_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_detection");
    let detector = BankDetector::new();

    for size in [10, 100, 1000, 10000].iter() {
        let cards: Vec<&str> = (0..*size)
            .map(|i| match i % 4 {
                0 => MELLI,
                1 => MELLAT,
                2 => UNKNOWN_BIN,
                _ => BAD_CHECKSUM,
            })
            .collect();

        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("detect_batch", size), &cards, |b, cards| {
            b.iter(|| detect_batch(black_box(cards), "en"))
        });

        group.bench_with_input(BenchmarkId::new("count_valid", size), &cards, |b, cards| {
            b.iter(|| count_valid(black_box(cards)))
        });

        group.bench_with_input(
            BenchmarkId::new("batch_detector", size),
            &cards,
            |b, cards| {
                let batch = BatchDetector::new(&detector);
                b.iter(|| batch.detect_valid_only(black_box(cards)))
            },
        );
    }

    group.finish();
}

/// Benchmark table snapshot and refresh
fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");
    let detector = BankDetector::new();

    group.bench_function("snapshot", |b| b.iter(|| black_box(&detector).table()));

    group.bench_function("publish_builtin", |b| {
        b.iter(|| detector.publish(BinTable::builtin().clone()))
    });

    group.bench_function("get_all_banks", |b| {
        b.iter(|| black_box(&detector).get_all_banks())
    });

    group.finish();
}

#[cfg(feature = "parallel")]
fn bench_parallel(c: &mut Criterion) {
    use iran_banks::batch::count_valid_parallel;

    let mut group = c.benchmark_group("parallel");
    let detector = BankDetector::new();

    for size in [1000, 10000, 100000].iter() {
        let cards: Vec<String> = (0..*size).map(|_| MELLI.to_string()).collect();

        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(
            BenchmarkId::new("detect_parallel", size),
            &cards,
            |b, cards| {
                let batch = BatchDetector::new(&detector);
                b.iter(|| batch.detect_parallel(black_box(cards), "en"))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("count_parallel", size),
            &cards,
            |b, cards| b.iter(|| count_valid_parallel(black_box(cards))),
        );
    }

    group.finish();
}

#[cfg(not(feature = "parallel"))]
fn bench_parallel(_c: &mut Criterion) {
    // Parallel benchmarks disabled - enable 'parallel' feature
}

criterion_group!(
    benches,
    bench_single_detection,
    bench_stages,
    bench_batch_detection,
    bench_registry,
    bench_parallel,
);

criterion_main!(benches);
