// mazectl: generate mazes and train tabular agents on them

use anyhow::Result;
use clap::{Parser, Subcommand};
use maze_rl_core::Cell;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "mazectl")]
#[command(about = "Maze generation and Q-learning CLI", version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a perfect maze and print its description
    Generate {
        /// Number of columns
        #[arg(long)]
        cols: usize,

        /// Number of rows
        #[arg(long)]
        rows: usize,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Write the description here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Train a Q-learning agent on a maze and walk its greedy policy
    Train {
        /// Maze description file
        #[arg(short, long)]
        maze: PathBuf,

        /// Number of training episodes
        #[arg(long)]
        episodes: Option<usize>,

        /// Random seed for the agent
        #[arg(long)]
        seed: Option<u64>,

        /// JSON run configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Start cell as "row,col"
        #[arg(long)]
        start: Option<Cell>,

        /// Goal cell as "row,col"
        #[arg(long)]
        goal: Option<Cell>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Train independent agents, one per seed, in parallel
    Sweep {
        /// Maze description file
        #[arg(short, long)]
        maze: PathBuf,

        /// Comma-separated agent seeds
        #[arg(long, value_delimiter = ',', required = true)]
        seeds: Vec<u64>,

        /// Number of training episodes per run
        #[arg(long)]
        episodes: Option<usize>,

        /// JSON run configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Generate {
            cols,
            rows,
            seed,
            output,
        } => {
            commands::generate(cols, rows, seed, output.as_deref())?;
        }

        Commands::Train {
            maze,
            episodes,
            seed,
            config,
            start,
            goal,
            json,
        } => {
            let mut run = config::RunConfig::load(config.as_deref())?;
            run.apply_overrides(episodes, seed, start, goal);
            commands::train(&maze, &run, json)?;
        }

        Commands::Sweep {
            maze,
            seeds,
            episodes,
            config,
        } => {
            let mut run = config::RunConfig::load(config.as_deref())?;
            run.apply_overrides(episodes, None, None, None);
            commands::sweep(&maze, &run, &seeds)?;
        }
    }

    Ok(())
}
