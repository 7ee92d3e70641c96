#![allow(non_snake_case)]

use std::str::FromStr;
use anyhow::{Context, Result};
use clap::Parser;
use ChanceOfGames::self_play::{run_games, Algorithm, ArenaConfig};
use ChanceOfGames::utils::Reward;

/// Pit two search agents against each other at Tic-Tac-Toe and report the tallies.
#[derive(Parser)]
#[command(name = "chance-of-games")]
#[command(about = "Compare negamax and expectiminimax over many simulated games")]
struct Cli {
    /// Number of games to play.
    #[arg(short, long, default_value = "100")]
    games: usize,

    /// Search depth for AI 1.
    #[arg(long, default_value = "3")]
    depth_1: usize,

    /// Search depth for AI 2.
    #[arg(long, default_value = "3")]
    depth_2: usize,

    /// Skip each turn with probability 0.2.
    #[arg(short, long)]
    probabilistic: bool,

    /// Root window for negamax seats, (-win_score, +win_score).
    #[arg(long, default_value = "inf")]
    win_score: Reward,

    /// negamax, expectiminimax or mixed (AI 1 negamax, AI 2 expectiminimax).
    #[arg(short, long, default_value = "negamax")]
    algorithm: String,

    /// Random seed for reproducibility.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ArenaConfig {
        games: cli.games,
        depth_1: cli.depth_1,
        depth_2: cli.depth_2,
        probabilistic: cli.probabilistic,
        win_score: cli.win_score,
        algorithm: Algorithm::from_str(&cli.algorithm)?,
        seed: cli.seed,
    };
    let summary = run_games(&config).context("game batch aborted")?;
    println!("{}", summary);
    Ok(())
}
