use criterion::{black_box, criterion_group, criterion_main, Criterion};

use minimax_engine::perft::*;
use minimax_engine::*;

fn depth(plies: u32) -> Depth {
    Depth::new(plies).unwrap()
}

pub fn criterion_perft_benchmark(c: &mut Criterion) {
    // Setup
    let starting_position = ChessPosition::start_position();

    // Benchmarks
    c.bench_function("start_position: perft(1)", |b| {
        b.iter(|| {
            let mut position = starting_position.clone();
            let info = perft(black_box(&mut position), black_box(depth(1)));
            assert_eq!(info.nodes, 20);
        })
    });

    c.bench_function("start_position: perft(2)", |b| {
        b.iter(|| {
            let mut position = starting_position.clone();
            let info = perft(black_box(&mut position), black_box(depth(2)));
            assert_eq!(info.nodes, 400);
        })
    });

    c.bench_function("start_position: perft(3)", |b| {
        b.iter(|| {
            let mut position = starting_position.clone();
            let info = perft(black_box(&mut position), black_box(depth(3)));
            assert_eq!(info.nodes, 8_902);
        })
    });
}

pub fn criterion_perft_large_benchmark(c: &mut Criterion) {
    let starting_position = ChessPosition::start_position();

    c.bench_function("start_position: perft(4)", |b| {
        b.iter(|| {
            let mut position = starting_position.clone();
            let info = perft(black_box(&mut position), black_box(depth(4)));
            assert_eq!(info.nodes, 197_281);
        })
    });
}

criterion_group! {
    name = small_benches;
    config = Criterion::default().without_plots().sample_size(50);
    targets = criterion_perft_benchmark
}
criterion_group! {
    name = large_benches;
    config = Criterion::default().without_plots().sample_size(10);
    targets = criterion_perft_large_benchmark
}
criterion_main!(small_benches, large_benches);
