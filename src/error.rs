//! Error types for the game engine.
//!
//! The move contract itself is boolean (`apply_move` succeeds or it doesn't);
//! these errors cover notation, configuration, move logs and the network
//! command exchange.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChessError {
    #[error("board of {files}x{ranks} squares does not fit the {max}x{max} maximum")]
    BoardSize { files: usize, ranks: usize, max: usize },

    #[error("invalid move notation: {0:?}")]
    InvalidNotation(String),

    #[error("illegal move {mv} for player {player}")]
    IllegalMove { mv: String, player: u8 },

    #[error("unknown chess variant: {0:?}")]
    UnknownVariant(String),

    #[error("malformed tag pair: {0:?}")]
    MalformedTag(String),

    #[error("expected command {expected}, but received {received:?}")]
    UnexpectedCommand { expected: String, received: String },

    #[error("opponent experienced a fatal error")]
    OpponentFatal,

    #[error("opponent did not confirm {0}")]
    Unconfirmed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type ChessResult<T> = Result<T, ChessError>;
