use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use maze_rl_env::{MazeEnv, MazeGenerator};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for size in [10usize, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut generator = MazeGenerator::with_seed(7);
            b.iter(|| generator.generate(black_box(size), black_box(size)));
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let text = MazeGenerator::with_seed(7)
        .generate(100, 100)
        .map(|maze| maze.to_description().to_string())
        .unwrap_or_default();
    c.bench_function("parse 100x100", |b| b.iter(|| MazeEnv::new(black_box(&text))));
}

criterion_group!(benches, bench_generate, bench_parse);
criterion_main!(benches);
