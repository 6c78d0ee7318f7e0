//! End-to-end learning on small mazes

use std::collections::{HashMap, VecDeque};
use std::ops::ControlFlow;

use maze_rl_agent::{evaluate_greedy, QLearningAgent, QLearningConfig, Trainer, TrainingConfig};
use maze_rl_core::{Agent, Cell, Environment, MoveAction};
use maze_rl_env::{MazeActions, MazeEnv, MazeEnvConfig, MazeGenerator};

/// One row, five columns, no interior walls, closed border
const CORRIDOR: &str = "\
1 5
12
0 0 0 1
0 1 0 2
0 2 0 3
0 3 0 4
0 4 0 5
1 0 1 1
1 1 1 2
1 2 1 3
1 3 1 4
1 4 1 5
0 0 1 0
0 5 1 5
";

fn seeded_agent(seed: u64) -> QLearningAgent<MazeActions> {
    let config = QLearningConfig {
        seed: Some(seed),
        ..QLearningConfig::default()
    };
    QLearningAgent::new(MazeActions, config).unwrap()
}

fn trainer(episodes: usize) -> Trainer {
    Trainer::new(TrainingConfig {
        episodes,
        ..TrainingConfig::default()
    })
    .unwrap()
}

/// Fewest moves from start to goal, following the environment's own dynamics
fn shortest_path_len(env: &MazeEnv) -> Option<usize> {
    let mut dist = HashMap::from([(env.start(), 0usize)]);
    let mut queue = VecDeque::from([env.start()]);
    while let Some(cell) = queue.pop_front() {
        if cell == env.goal() {
            return dist.get(&cell).copied();
        }
        let d = dist[&cell];
        for action in MoveAction::ALL {
            let next = env.transition(cell, action).state;
            if !dist.contains_key(&next) {
                dist.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }
    None
}

#[test]
fn corridor_policy_points_at_the_goal() {
    let config = MazeEnvConfig {
        start: Some(Cell::new(0, 0)),
        goal: Some(Cell::new(0, 4)),
        ..MazeEnvConfig::default()
    };
    let mut env = MazeEnv::with_config(CORRIDOR, config).unwrap();
    assert_eq!(env.wall_count(), 12);

    let mut agent = seeded_agent(42);
    let report = trainer(2000).run(&mut env, &mut agent).unwrap();
    assert_eq!(report.episodes, 2000);
    assert!(report.successes > 1900);

    for col in 0..4 {
        assert_eq!(
            agent.best_action(&Cell::new(0, col)).unwrap(),
            MoveAction::Right,
            "column {col}"
        );
    }

    let rollout = evaluate_greedy(&mut env, &mut agent, 10).unwrap();
    assert!(rollout.solved);
    assert_eq!(rollout.steps(), 4);
    assert_eq!(
        rollout.path(),
        (0..5).map(|col| Cell::new(0, col)).collect::<Vec<_>>()
    );
}

#[test]
fn generated_maze_is_solved_along_its_shortest_path() {
    let maze = MazeGenerator::with_seed(17).generate(4, 4).unwrap();
    let mut env = MazeEnv::from_maze(&maze, MazeEnvConfig::default()).unwrap();
    assert_eq!(env.start(), maze.entrance());
    assert_eq!(env.goal(), maze.exit());
    let shortest = shortest_path_len(&env).unwrap();

    let mut agent = seeded_agent(2024);
    let trainer = trainer(3000);
    trainer.run(&mut env, &mut agent).unwrap();

    let limit = trainer.eval_limit(&env);
    assert_eq!(limit, 32);
    let rollout = evaluate_greedy(&mut env, &mut agent, limit).unwrap();
    assert!(rollout.solved);
    assert_eq!(rollout.steps(), shortest);
    assert_eq!(rollout.path().first(), Some(&env.start()));
    assert_eq!(rollout.path().last(), Some(&env.goal()));
}

#[test]
fn training_can_be_interrupted() {
    let maze = MazeGenerator::with_seed(5).generate(6, 6).unwrap();
    let mut env = MazeEnv::from_maze(&maze, MazeEnvConfig::default()).unwrap();
    let mut agent = seeded_agent(5);

    let mut seen = Vec::new();
    let report = trainer(500)
        .run_with(&mut env, &mut agent, |episode| {
            seen.push(episode.index);
            if seen.len() == 25 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();

    assert!(report.interrupted);
    assert_eq!(report.episodes, 25);
    assert_eq!(seen, (0..25).collect::<Vec<_>>());
    assert_eq!(agent.metrics().total_episodes, 25);
    assert_eq!(agent.metrics().total_steps, report.total_steps);
}

#[test]
fn identical_seeds_learn_identical_tables() {
    let maze = MazeGenerator::with_seed(9).generate(5, 3).unwrap();

    let mut runs = Vec::new();
    for _ in 0..2 {
        let mut env = MazeEnv::from_maze(&maze, MazeEnvConfig::default()).unwrap();
        let mut agent = seeded_agent(77);
        let report = trainer(50).run(&mut env, &mut agent).unwrap();
        runs.push((report.total_steps, agent.table().len(), *env.state()));
    }
    assert_eq!(runs[0], runs[1]);
}
