//! # Game Implementations
//!
//! Concrete games searched by the agents. Each one implements the
//! [`Game`](crate::utils::Game) trait directly:
//! - **TicTacToe**: the 3x3 reference game used by the arena

pub mod tictactoe;
