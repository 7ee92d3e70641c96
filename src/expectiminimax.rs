//! Expectiminimax with alpha-beta pruning.
//!
//! Plies alternate between a maximizing node (the searching agent picks its best
//! move) and a chance node (every legal reply is taken as equally likely and the
//! children are averaged). The position is explored in place: each move is made,
//! searched and unmade before the next sibling is looked at, and the board's turn
//! field is never touched. Whose ply it is comes only from the node kind.
//!
//! Chance nodes share the parent's window and cut with the same `beta <= alpha`
//! test as maximizing nodes after folding each child into `beta`. On a cut the
//! running sum is still divided by the full number of legal moves.

use log::trace;
use crate::error::Result;
use crate::utils::{Game, Reward, Strategy};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NodeKind { Max, Chance }

impl NodeKind {
    #[inline] fn child(self) -> NodeKind {
        match self { NodeKind::Max => NodeKind::Chance, NodeKind::Chance => NodeKind::Max }
    }
}

/// Basic search stats for a single decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub nodes: u64,
}

#[derive(Debug, Clone)]
pub struct ExpectiMinimax {
    depth: usize,
    alpha: Reward,
    beta: Reward,
    pruning: bool,
    stats: SearchStats,
}

impl ExpectiMinimax {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            alpha: Reward::NEG_INFINITY,
            beta: Reward::INFINITY,
            pruning: true,
            stats: SearchStats::default(),
        }
    }

    /// Start the root with a narrower window than (-inf, +inf)
    pub fn with_bounds(mut self, alpha: Reward, beta: Reward) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    /// Same recursion, but alpha and beta are never tightened
    pub fn without_pruning(mut self) -> Self {
        self.pruning = false;
        self
    }

    pub fn depth(&self) -> usize { self.depth }
    pub fn stats(&self) -> SearchStats { self.stats }

    /// Search from the root as a maximizing node, returning the value and the chosen move
    pub fn best_move<G: Game>(&mut self, game: &mut G) -> Result<(Reward, Option<G::Move>)> {
        self.stats = SearchStats::default();
        self.search(game, self.depth, self.alpha, self.beta, NodeKind::Max)
    }

    /// Evaluate `game` as a node of the given kind with `depth` plies left.
    /// Chance nodes never return a move.
    pub fn search<G: Game>(
        &mut self,
        game: &mut G,
        depth: usize,
        mut alpha: Reward,
        mut beta: Reward,
        kind: NodeKind,
    ) -> Result<(Reward, Option<G::Move>)> {
        self.stats.nodes += 1;
        if depth == 0 || game.is_over() {
            return Ok((game.scoring(), None));
        }
        let moves = game.possible_moves();
        if moves.is_empty() {
            // Only reachable when a game overrides is_over without counting moves
            return Ok((game.scoring(), None));
        }

        match kind {
            NodeKind::Max => {
                let mut best_value = Reward::NEG_INFINITY;
                let mut best_move = None;
                for action in moves {
                    let (value, _) = self.explore(game, &action, depth - 1, alpha, beta, kind.child())?;
                    if value > best_value {
                        best_value = value;
                        best_move = Some(action);
                    }
                    if self.pruning {
                        alpha = alpha.max(value);
                        if beta <= alpha { break; }
                    }
                }
                Ok((best_value, best_move))
            }
            NodeKind::Chance => {
                let n = moves.len();
                let mut total: Reward = 0.0;
                for action in &moves {
                    let (value, _) = self.explore(game, action, depth - 1, alpha, beta, kind.child())?;
                    total += value;
                    if self.pruning {
                        beta = beta.min(value);
                        if beta <= alpha { break; }
                    }
                }
                Ok((total / n as Reward, None))
            }
        }
    }

    /// make -> search -> unmake. The move is taken back before any error is passed up
    fn explore<G: Game>(
        &mut self,
        game: &mut G,
        action: &G::Move,
        depth: usize,
        alpha: Reward,
        beta: Reward,
        kind: NodeKind,
    ) -> Result<(Reward, Option<G::Move>)> {
        game.make_move(action)?;
        let result = self.search(game, depth, alpha, beta, kind);
        game.unmake_move(action);
        result
    }
}

impl<G: Game> Strategy<G> for ExpectiMinimax {
    fn choose_move(&mut self, game: &mut G) -> Result<Option<G::Move>> {
        let (value, action) = self.best_move(game)?;
        trace!("expectiminimax depth {} searched {} nodes, value {:.3}, move {:?}", self.depth(), self.stats().nodes, value, action);
        Ok(action)
    }

    fn name(&self) -> &'static str { "expectiminimax" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArenaError;
    use crate::games::tictactoe::TicTacToe;
    use crate::utils::{Player, LOSS_SCORE};

    /// Uniform tree with fixed leaf scores. Interior nodes score 0.
    #[derive(Clone, Debug)]
    struct TreeGame {
        path: Vec<usize>,
        branching: usize,
        height: usize,
        leaves: Vec<Reward>,
        poisoned: Option<Vec<usize>>,
        player: Player,
    }

    impl TreeGame {
        fn build(branching: usize, height: usize, leaves: Vec<Reward>) -> Self {
            assert_eq!(leaves.len(), branching.pow(height as u32));
            Self { path: vec![], branching, height, leaves, poisoned: None, player: Player::P1 }
        }
    }

    impl Game for TreeGame {
        type Move = usize;

        fn new(starting_player: Player) -> Self {
            let mut g = Self::build(2, 1, vec![0.0, 0.0]);
            g.player = starting_player;
            g
        }
        fn current_player(&self) -> Player { self.player }
        fn switch_player(&mut self) { self.player = self.player.other(); }
        fn possible_moves(&self) -> Vec<usize> {
            if self.path.len() < self.height { (0..self.branching).collect() } else { vec![] }
        }
        fn make_move(&mut self, action: &usize) -> Result<()> {
            self.path.push(*action);
            if self.poisoned.as_ref() == Some(&self.path) {
                self.path.pop();
                return Err(ArenaError::IllegalMove(format!("{:?}", action)));
            }
            Ok(())
        }
        fn unmake_move(&mut self, _action: &usize) { self.path.pop(); }
        fn lose(&self) -> bool { false }
        fn scoring(&self) -> Reward {
            if self.path.len() < self.height { return 0.0; }
            let idx = self.path.iter().fold(0, |acc, m| acc * self.branching + m);
            self.leaves[idx]
        }
    }

    #[test]
    fn terminal_position_returns_no_move() {
        let mut g = TicTacToe::new(Player::P1);
        for m in [0, 3, 1, 4, 2] {
            g.make_move(&m).unwrap();
            g.switch_player();
        }
        assert!(g.is_over());
        let (value, action) = ExpectiMinimax::new(3).best_move(&mut g).unwrap();
        assert_eq!(value, LOSS_SCORE);
        assert_eq!(action, None);
    }

    #[test]
    fn zero_depth_is_a_leaf() {
        let mut g = TicTacToe::new(Player::P1);
        let (value, action) = ExpectiMinimax::new(0).best_move(&mut g).unwrap();
        assert_eq!((value, action), (0.0, None));
    }

    #[test]
    fn chance_node_averages_children() {
        let mut g = TreeGame::build(4, 1, vec![3.0, -1.0, 8.0, 2.0]);
        let mut search = ExpectiMinimax::new(1);
        let (value, action) = search
            .search(&mut g, 1, Reward::NEG_INFINITY, Reward::INFINITY, NodeKind::Chance)
            .unwrap();
        assert!((value - 3.0).abs() < 1e-9);
        assert_eq!(action, None);
    }

    #[test]
    fn chance_node_averages_maximizing_children() {
        // Maxes per branch: 4, 9, 1
        let mut g = TreeGame::build(3, 2, vec![4.0, 2.0, 0.0, 5.0, 9.0, 1.0, -3.0, 1.0, -7.0]);
        let mut search = ExpectiMinimax::new(2).without_pruning();
        let (value, _) = search
            .search(&mut g, 2, Reward::NEG_INFINITY, Reward::INFINITY, NodeKind::Chance)
            .unwrap();
        assert!((value - 14.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn chance_node_cut_divides_by_all_moves() {
        // beta drops to -1 after the second child, which is <= alpha = 0
        let mut g = TreeGame::build(3, 1, vec![5.0, -1.0, 7.0]);
        let mut search = ExpectiMinimax::new(1);
        let (value, _) = search.search(&mut g, 1, 0.0, Reward::INFINITY, NodeKind::Chance).unwrap();
        assert!((value - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(search.stats().nodes, 3);
    }

    #[test]
    fn max_node_first_seen_wins_ties() {
        let mut g = TreeGame::build(3, 1, vec![2.0, 5.0, 5.0]);
        let (value, action) = ExpectiMinimax::new(1).best_move(&mut g).unwrap();
        assert_eq!((value, action), (5.0, Some(1)));
    }

    #[test]
    fn max_node_stops_at_beta() {
        let mut g = TreeGame::build(3, 1, vec![1.0, 4.0, 10.0]);
        let mut search = ExpectiMinimax::new(1).with_bounds(Reward::NEG_INFINITY, 3.0);
        let (value, action) = search.best_move(&mut g).unwrap();
        assert_eq!((value, action), (4.0, Some(1)));
        assert_eq!(search.stats().nodes, 3);
    }

    #[test]
    fn max_cuts_alone_keep_the_unpruned_answer() {
        // Max -> Chance -> Max -> leaf. Each Max node sees its best leaf first and every
        // chance child stays above the root's alpha, so only the two Max cuts fire.
        let leaves = vec![4.0, 1.0, 6.0, 2.0, 9.0, 3.0, 10.0, 0.0];
        let mut pruned = ExpectiMinimax::new(3);
        let mut full = ExpectiMinimax::new(3).without_pruning();
        let with = pruned.best_move(&mut TreeGame::build(2, 3, leaves.clone())).unwrap();
        let without = full.best_move(&mut TreeGame::build(2, 3, leaves)).unwrap();
        assert_eq!(with, (9.5, Some(1)));
        assert_eq!(with, without);
        assert_eq!(full.stats().nodes, 15);
        assert_eq!(pruned.stats().nodes, 13);
    }

    #[test]
    fn chance_cut_can_change_the_decision() {
        // Branch 1 averages 63.3 but its first child (-10) drops beta below the root's
        // alpha of 5, so the chance loop stops and the branch reads -10 / 3.
        let leaves = vec![5.0, 5.0, 5.0, -10.0, 100.0, 100.0, 0.0, 0.0, 0.0];
        let with = ExpectiMinimax::new(2).best_move(&mut TreeGame::build(3, 2, leaves.clone())).unwrap();
        let (value, action) = ExpectiMinimax::new(2)
            .without_pruning()
            .best_move(&mut TreeGame::build(3, 2, leaves))
            .unwrap();
        assert_eq!(with, (5.0, Some(0)));
        assert!((value - 190.0 / 3.0).abs() < 1e-9);
        assert_eq!(action, Some(1));
    }

    #[test]
    fn search_restores_the_position() {
        let mut g = TicTacToe::new(Player::P2);
        for m in [4, 0] {
            g.make_move(&m).unwrap();
            g.switch_player();
        }
        let before = g.clone();
        let action = ExpectiMinimax::new(5).choose_move(&mut g).unwrap();
        assert_eq!(g, before);
        assert!(action.is_some());
    }

    #[test]
    fn error_mid_search_still_unwinds_the_position() {
        let mut g = TreeGame::build(2, 3, vec![0.0; 8]);
        g.poisoned = Some(vec![1, 0, 1]);
        let result = ExpectiMinimax::new(3).without_pruning().best_move(&mut g);
        assert!(matches!(result, Err(ArenaError::IllegalMove(_))));
        assert!(g.path.is_empty());
    }

    #[test]
    fn tictactoe_search_never_sees_a_decided_line() {
        // The searcher only places its own marks, so every explored leaf scores 0
        let mut g = TicTacToe::new(Player::P1);
        let (value, action) = ExpectiMinimax::new(4).best_move(&mut g).unwrap();
        assert_eq!((value, action), (0.0, Some(0)));
    }
}
