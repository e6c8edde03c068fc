pub mod board;
pub mod check;
pub mod chess;
pub mod config;
pub mod error;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod pgn;
pub mod piece;
pub mod promotion;
pub mod protocol;
pub mod search;
pub mod variant;
pub mod zobrist;
