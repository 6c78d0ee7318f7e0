use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use maze_rl_agent::{QLearningAgent, QLearningConfig, Trainer, TrainingConfig};
use maze_rl_env::{MazeActions, MazeEnv, MazeEnvConfig, MazeGenerator};

fn bench_training(c: &mut Criterion) {
    let trainer = Trainer::new(TrainingConfig {
        episodes: 100,
        ..TrainingConfig::default()
    })
    .expect("valid training config");

    let mut group = c.benchmark_group("train 100 episodes");
    group.sample_size(10);
    for size in [5usize, 10, 20] {
        let maze = MazeGenerator::with_seed(3)
            .generate(size, size)
            .expect("non-empty maze");
        group.bench_with_input(BenchmarkId::from_parameter(size), &maze, |b, maze| {
            b.iter(|| {
                let mut env = MazeEnv::from_maze(maze, MazeEnvConfig::default()).ok()?;
                let config = QLearningConfig {
                    seed: Some(11),
                    ..QLearningConfig::default()
                };
                let mut agent = QLearningAgent::new(MazeActions, config).ok()?;
                trainer.run(black_box(&mut env), &mut agent).ok()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_training);
criterion_main!(benches);
