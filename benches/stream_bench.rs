//! Benchmarks for batch streaming.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use catan_rl_data::data::{BatchStream, LearningMode, StreamConfig, DISCOUNT_FACTOR};
use catan_rl_data::games::random_games::{record_games, simulate_many};

fn stream_benchmark(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    record_games(&simulate_many(20, 42), DISCOUNT_FACTOR)
        .write(dir.path())
        .unwrap();

    for mode in LearningMode::ALL {
        let config = StreamConfig::new(255, "DISCOUNTED_RETURN").with_learning_mode(mode);
        let mut stream = BatchStream::new(dir.path(), config).unwrap();

        c.bench_function(&format!("stream_batch_256_{}", mode), |b| {
            b.iter(|| black_box(stream.next().unwrap().unwrap()))
        });
    }
}

fn record_benchmark(c: &mut Criterion) {
    c.bench_function("simulate_and_record_10_games", |b| {
        b.iter(|| record_games(&simulate_many(black_box(10), 7), DISCOUNT_FACTOR))
    });
}

criterion_group!(benches, stream_benchmark, record_benchmark);
criterion_main!(benches);
