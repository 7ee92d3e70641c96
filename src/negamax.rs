//! Baseline fully adversarial search: negamax with alpha-beta pruning.
//!
//! Unlike the expectiminimax engine this one passes the turn on every ply, so
//! `scoring()` is always read from the side to move and negated on the way up.

use log::trace;
use crate::error::Result;
use crate::expectiminimax::SearchStats;
use crate::utils::{Game, Reward, Strategy};

/// Leaves found with more depth left are worth slightly more (faster wins, slower losses)
const DEPTH_BONUS: Reward = 0.001;

#[derive(Debug, Clone)]
pub struct Negamax {
    depth: usize,
    win_score: Reward,
    stats: SearchStats,
}

impl Negamax {
    pub fn new(depth: usize) -> Self {
        Self { depth, win_score: Reward::INFINITY, stats: SearchStats::default() }
    }

    /// Root window becomes (-win_score, +win_score)
    pub fn with_win_score(mut self, win_score: Reward) -> Self {
        self.win_score = win_score;
        self
    }

    pub fn depth(&self) -> usize { self.depth }
    pub fn stats(&self) -> SearchStats { self.stats }

    pub fn best_move<G: Game>(&mut self, game: &mut G) -> Result<(Reward, Option<G::Move>)> {
        self.stats = SearchStats::default();
        self.negamax(game, self.depth, -self.win_score, self.win_score)
    }

    /// Value for the side to move. The move is the first legal one unless some
    /// child strictly raised alpha, in which case it is the last such child.
    fn negamax<G: Game>(
        &mut self,
        game: &mut G,
        depth: usize,
        mut alpha: Reward,
        beta: Reward,
    ) -> Result<(Reward, Option<G::Move>)> {
        self.stats.nodes += 1;
        if depth == 0 || game.is_over() {
            return Ok((game.scoring() * (1.0 + DEPTH_BONUS * depth as Reward), None));
        }
        let moves = game.possible_moves();
        let mut best_move = match moves.first() {
            Some(action) => Some(action.clone()),
            None => return Ok((game.scoring(), None)),
        };
        let mut best_value = Reward::NEG_INFINITY;

        for action in moves {
            game.make_move(&action)?;
            game.switch_player();
            let child = self.negamax(game, depth - 1, -beta, -alpha);
            game.switch_player();
            game.unmake_move(&action);
            let value = -child?.0;

            if best_value < value {
                best_value = value;
            }
            if alpha < value {
                alpha = value;
                best_move = Some(action);
                if alpha >= beta { break; }
            }
        }
        Ok((best_value, best_move))
    }
}

impl<G: Game> Strategy<G> for Negamax {
    fn choose_move(&mut self, game: &mut G) -> Result<Option<G::Move>> {
        let (value, action) = self.best_move(game)?;
        trace!("negamax depth {} searched {} nodes, value {:.3}, move {:?}", self.depth(), self.stats().nodes, value, action);
        Ok(action)
    }

    fn name(&self) -> &'static str { "negamax" }
}
