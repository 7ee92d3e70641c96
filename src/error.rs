use thiserror::Error;

/// Errors raised while configuring or playing out a batch of games
#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Agent returned no move for a position that is not over")]
    NoMoveAvailable,
}

/// Convenience Result type for arena operations
pub type Result<T> = std::result::Result<T, ArenaError>;
