use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{Duration, Instant};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::error::{ArenaError, Result};
use crate::expectiminimax::ExpectiMinimax;
use crate::games::tictactoe::TicTacToe;
use crate::negamax::Negamax;
use crate::utils::{Game, Player, Reward, Strategy, SKIP_PROBABILITY};

// ---------- Configuration ---------- //
/// Which search each seat gets
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Algorithm {
    /// Both seats use the baseline negamax
    Negamax,
    /// Both seats use expectiminimax
    ExpectiMinimax,
    /// Seat 1 negamax, seat 2 expectiminimax
    Mixed,
}

impl FromStr for Algorithm {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "negamax" => Ok(Algorithm::Negamax),
            "expectiminimax" => Ok(Algorithm::ExpectiMinimax),
            "mixed" => Ok(Algorithm::Mixed),
            other => Err(ArenaError::InvalidConfiguration(format!(
                "unknown algorithm '{}', choose 'negamax', 'expectiminimax' or 'mixed'", other
            ))),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Algorithm::Negamax => "negamax",
            Algorithm::ExpectiMinimax => "expectiminimax",
            Algorithm::Mixed => "mixed",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct ArenaConfig {
    pub games: usize,
    pub depth_1: usize,
    pub depth_2: usize,
    /// Each turn is passed with probability SKIP_PROBABILITY
    pub probabilistic: bool,
    /// Only read by negamax seats
    pub win_score: Reward,
    pub algorithm: Algorithm,
    /// Fixes starting players and skips for a reproducible batch
    pub seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            games: 100,
            depth_1: 3,
            depth_2: 3,
            probabilistic: false,
            win_score: Reward::INFINITY,
            algorithm: Algorithm::Negamax,
            seed: None,
        }
    }
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.games == 0 {
            return Err(ArenaError::InvalidConfiguration("number of games must be positive".into()));
        }
        if self.depth_1 == 0 || self.depth_2 == 0 {
            return Err(ArenaError::InvalidConfiguration(format!(
                "search depths must be positive, got {} and {}", self.depth_1, self.depth_2
            )));
        }
        Ok(())
    }

    /// Build the two seats described by this config
    pub fn agents<G: Game>(&self) -> [Agent<G>; 2] {
        let negamax = |label, depth| Agent::new(label, Negamax::new(depth).with_win_score(self.win_score));
        let expecti = |label, depth| Agent::new(label, ExpectiMinimax::new(depth));
        match self.algorithm {
            Algorithm::Negamax => [negamax("AI 1", self.depth_1), negamax("AI 2", self.depth_2)],
            Algorithm::ExpectiMinimax => [expecti("AI 1", self.depth_1), expecti("AI 2", self.depth_2)],
            Algorithm::Mixed => [negamax("AI 1", self.depth_1), expecti("AI 2", self.depth_2)],
        }
    }
}

// ---------- Agents ---------- //
/// A seat at the table: a label plus the search that picks its moves
pub struct Agent<G: Game> {
    label: &'static str,
    strategy: Box<dyn Strategy<G>>,
}

impl<G: Game> Agent<G> {
    pub fn new<S: Strategy<G> + 'static>(label: &'static str, strategy: S) -> Self {
        Self { label, strategy: Box::new(strategy) }
    }

    pub fn label(&self) -> &'static str { self.label }
    pub fn algorithm(&self) -> &'static str { self.strategy.name() }

    pub fn ask_move(&mut self, game: &mut G) -> Result<Option<G::Move>> {
        self.strategy.choose_move(game)
    }
}

// ---------- Results ---------- //
/// What happened in one game
#[derive(Debug, Clone, Default)]
pub struct GameRecord {
    /// None for a draw
    pub winner: Option<Player>,
    pub plies: usize,
    pub skipped_turns: usize,
    /// Indexed by Player::index
    pub decision_times: [Vec<Duration>; 2],
}

/// Totals over a batch of games
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub games: usize,
    pub wins: [usize; 2],
    pub draws: usize,
    pub plies: usize,
    pub skipped_turns: usize,
    pub decision_times: [Vec<Duration>; 2],
}

impl Summary {
    pub fn absorb(&mut self, record: GameRecord) {
        self.games += 1;
        match record.winner {
            Some(player) => self.wins[player.index()] += 1,
            None => self.draws += 1,
        }
        self.plies += record.plies;
        self.skipped_turns += record.skipped_turns;
        for (total, times) in self.decision_times.iter_mut().zip(record.decision_times) {
            total.extend(times);
        }
    }

    pub fn decisions(&self) -> usize {
        self.decision_times.iter().map(Vec::len).sum()
    }

    /// Mean seconds per timed decision for a seat, 0 if it never decided
    pub fn mean_decision_time(&self, player: Player) -> f64 {
        let times = &self.decision_times[player.index()];
        if times.is_empty() {
            return 0.0;
        }
        times.iter().map(Duration::as_secs_f64).sum::<f64>() / times.len() as f64
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Summary after {} games:", self.games)?;
        writeln!(f, "AI 1 wins: {}", self.wins[0])?;
        writeln!(f, "AI 2 wins: {}", self.wins[1])?;
        writeln!(f, "Draws: {}", self.draws)?;
        writeln!(f, "Average decision time for AI 1: {:.4} seconds", self.mean_decision_time(Player::P1))?;
        write!(f, "Average decision time for AI 2: {:.4} seconds", self.mean_decision_time(Player::P2))
    }
}

// ---------- Play ---------- //
/// Play `game` to the end, seat `agents[i]` moving for the player with index i
pub fn play_game<G: Game, R: Rng>(
    game: &mut G,
    agents: &mut [Agent<G>; 2],
    probabilistic: bool,
    rng: &mut R,
) -> Result<GameRecord> {
    let mut record = GameRecord::default();
    while !game.is_over() {
        let player = game.current_player();
        let agent = &mut agents[player.index()];
        if probabilistic && rng.random::<f64>() < SKIP_PROBABILITY {
            debug!("{} ({:?}) skips its turn", agent.label(), player);
            record.skipped_turns += 1;
            game.switch_player();
            continue;
        }

        let start = Instant::now();
        let action = agent.ask_move(game)?;
        let elapsed = start.elapsed();
        record.decision_times[player.index()].push(elapsed);
        let action = action.ok_or(ArenaError::NoMoveAvailable)?;
        debug!("{} ({}) plays {:?} after {:?}", agent.label(), agent.algorithm(), action, elapsed);

        game.make_move(&action)?;
        record.plies += 1;
        game.switch_player();
    }
    // lose() reports on the player who would move next, so the other one won
    record.winner = if game.lose() { Some(game.current_player().other()) } else { None };
    Ok(record)
}

/// Run a batch of Tic-Tac-Toe games described by `config`
pub fn run_games(config: &ArenaConfig) -> Result<Summary> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    run_games_with_rng(config, &mut rng)
}

pub fn run_games_with_rng<R: Rng>(config: &ArenaConfig, rng: &mut R) -> Result<Summary> {
    config.validate()?;
    let mut agents: [Agent<TicTacToe>; 2] = config.agents();
    info!(
        "Running {} {} games: AI 1 {} depth {}, AI 2 {} depth {}, probabilistic {}",
        config.games, config.algorithm, agents[0].algorithm(), config.depth_1, agents[1].algorithm(), config.depth_2, config.probabilistic
    );

    let mut summary = Summary::default();
    for game_idx in 0..config.games {
        let starting_player = Player::random(rng);
        let mut game = TicTacToe::new(starting_player);
        let record = play_game(&mut game, &mut agents, config.probabilistic, rng)?;
        info!(
            "Game {}: {:?} started, {} plies, {} skipped, winner {:?}",
            game_idx, starting_player, record.plies, record.skipped_turns, record.winner
        );
        debug!("Final position:\n{}", game);
        summary.absorb(record);
    }
    info!("Finished {} games: wins {:?}, draws {}", summary.games, summary.wins, summary.draws);
    Ok(summary)
}
