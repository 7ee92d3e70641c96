use std::fmt::{Display, Formatter};
use crate::error::{ArenaError, Result};
use crate::utils::*;

// ---------- Reference Game: 3x3 Tic-Tac-Toe ----------
/*
 0 | 1 | 2
---+---+---
 3 | 4 | 5
---+---+---
 6 | 7 | 8
*/

const CELLS: usize = 9;
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8],  // rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8],  // columns
    [0, 4, 8], [2, 4, 6],             // diagonals
];

#[derive(Clone, Eq, Hash, Debug, PartialEq)]
pub struct TicTacToe {
    board: [Option<Player>; CELLS],
    current: Player,
}

impl TicTacToe {
    /// Who (if anyone) has marked `cell`
    pub fn cell(&self, cell: usize) -> Option<Player> {
        self.board.get(cell).copied().flatten()
    }

    pub fn filled(&self) -> usize {
        self.board.iter().filter(|c| c.is_some()).count()
    }

    fn completed_line(&self, player: Player) -> bool {
        LINES.iter().any(|line| line.iter().all(|&c| self.board[c] == Some(player)))
    }
}

impl Game for TicTacToe {
    type Move = usize;

    fn new(starting_player: Player) -> Self {
        Self { board: [None; CELLS], current: starting_player }
    }

    fn current_player(&self) -> Player {
        self.current
    }

    fn switch_player(&mut self) {
        self.current = self.current.other();
    }

    fn possible_moves(&self) -> Vec<Self::Move> {
        (0..CELLS).filter(|&c| self.board[c].is_none()).collect()
    }

    fn make_move(&mut self, action: &Self::Move) -> Result<()> {
        match self.board.get(*action) {
            None => Err(ArenaError::IllegalMove(format!("cell {} is off the board", action))),
            Some(Some(owner)) => Err(ArenaError::IllegalMove(format!("cell {} is already taken by {:?}", action, owner))),
            Some(None) => {
                self.board[*action] = Some(self.current);
                Ok(())
            }
        }
    }

    fn unmake_move(&mut self, action: &Self::Move) {
        debug_assert!(self.board[*action].is_some(), "unmaking empty cell {}", action);
        self.board[*action] = None;
    }

    fn lose(&self) -> bool {
        self.completed_line(self.current.other())
    }

    fn scoring(&self) -> Reward {
        if self.lose() { LOSS_SCORE } else { 0.0 }
    }
}

impl Display for TicTacToe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.board.chunks(3) {
            let line: String = row.iter().map(|c| match c {
                Some(Player::P1) => 'X',
                Some(Player::P2) => 'O',
                None => '.',
            }).collect();
            writeln!(f, "{}", line)?;
        }
        write!(f, "{:?} to play", self.current)
    }
}
