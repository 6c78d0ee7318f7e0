// Subcommand implementations for mazectl

use anyhow::{Context, Result};
use maze_rl_agent::{evaluate_greedy, QLearningAgent, Schedule, Trainer, TrainingReport};
use maze_rl_core::Cell;
use maze_rl_env::{MazeActions, MazeDescription, MazeEnv, MazeGenerator};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::config::RunConfig;

/// Result of one train-then-evaluate run
#[derive(Debug, Serialize)]
struct RunOutcome {
    seed: Option<u64>,
    report: TrainingReport,
    solved: bool,
    path: Vec<Cell>,
}

pub fn generate(cols: usize, rows: usize, seed: Option<u64>, output: Option<&Path>) -> Result<()> {
    let mut generator = seed.map_or_else(MazeGenerator::new, MazeGenerator::with_seed);
    let maze = generator.generate(cols, rows)?;
    let text = maze.to_description().to_string();

    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write maze to {}", path.display()))?;
            info!(
                path = %path.display(),
                entrance = %maze.entrance(),
                exit = %maze.exit(),
                "Maze written"
            );
        }
        None => print!("{text}"),
    }
    Ok(())
}

pub fn train(maze: &Path, run: &RunConfig, json: bool) -> Result<()> {
    let description = read_maze(maze)?;
    let outcome = train_once(&description, run)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let report = &outcome.report;
    println!("Episodes:      {}", report.episodes);
    println!(
        "Successes:     {} ({:.1}%)",
        report.successes,
        report.success_rate() * 100.0
    );
    println!("Mean reward:   {:.2}", report.mean_reward);
    println!("Final epsilon: {:.4}", report.final_epsilon);
    println!("Q-table size:  {}", report.table_size);
    println!("Elapsed:       {:.2}s", report.elapsed_secs);
    if outcome.solved {
        println!("Greedy path ({} steps):", outcome.path.len() - 1);
    } else {
        println!("Greedy rollout did not reach the goal:");
    }
    let cells: Vec<String> = outcome.path.iter().map(ToString::to_string).collect();
    println!("{}", cells.join(" -> "));
    Ok(())
}

pub fn sweep(maze: &Path, run: &RunConfig, seeds: &[u64]) -> Result<()> {
    let description = read_maze(maze)?;
    let outcomes = run_sweep(&description, run, seeds)?;

    println!(
        "{:>10} {:>9} {:>12} {:>8} {:>6}",
        "seed", "success", "mean reward", "solved", "steps"
    );
    for outcome in &outcomes {
        println!(
            "{:>10} {:>8.1}% {:>12.2} {:>8} {:>6}",
            outcome.seed.map_or_else(|| "-".to_string(), |s| s.to_string()),
            outcome.report.success_rate() * 100.0,
            outcome.report.mean_reward,
            outcome.solved,
            outcome.path.len() - 1
        );
    }
    Ok(())
}

/// One independent run per seed on blocking worker tasks, results in seed order
fn run_sweep(
    description: &MazeDescription,
    run: &RunConfig,
    seeds: &[u64],
) -> Result<Vec<RunOutcome>> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start worker runtime")?;

    runtime.block_on(async {
        let handles: Vec<_> = seeds
            .iter()
            .map(|&seed| {
                let description = description.clone();
                let run = run.with_seed(seed);
                tokio::task::spawn_blocking(move || train_once(&description, &run))
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(handle.await.context("Training task panicked")??);
        }
        Ok::<_, anyhow::Error>(outcomes)
    })
}

fn read_maze(path: &Path) -> Result<MazeDescription> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read maze {}", path.display()))?;
    text.parse::<MazeDescription>()
        .with_context(|| format!("Failed to parse maze {}", path.display()))
}

fn train_once(description: &MazeDescription, run: &RunConfig) -> Result<RunOutcome> {
    let mut env = MazeEnv::from_description(description, run.environment.clone())?;
    let mut agent = QLearningAgent::new(MazeActions, run.agent.clone())?;
    let trainer = Trainer::new(run.training.clone())?;

    let planned = run.agent.epsilon_schedule().value(run.training.episodes);
    info!(
        rows = env.rows(),
        cols = env.cols(),
        start = %env.start(),
        goal = %env.goal(),
        seed = ?run.agent.seed,
        final_epsilon = planned,
        "Training run configured"
    );

    let report = trainer.run(&mut env, &mut agent)?;
    let limit = trainer.eval_limit(&env);
    let rollout = evaluate_greedy(&mut env, &mut agent, limit)?;
    if !rollout.solved {
        warn!(steps = rollout.steps(), "Greedy policy did not reach the goal");
    }

    Ok(RunOutcome {
        seed: run.agent.seed,
        report,
        solved: rollout.solved,
        path: rollout.path(),
    })
}
