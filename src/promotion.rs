//! Pawn promotion choices.
//!
//! The move applier never reads the console itself. When automatic queening
//! is off it asks a [`PromotionPolicy`] for a piece token and keeps asking
//! until it gets one of R, N, B or Q.

use std::collections::VecDeque;
use std::fmt;
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::piece::{PieceType, Player};

/// Number of answers the applier accepts before settling on a queen.
pub const MAX_PROMOTION_ATTEMPTS: usize = 16;

pub trait PromotionPolicy: fmt::Debug + Send {
    /// Token of the piece `player`'s pawn on `square` should become.
    fn choose(&mut self, player: Player, square: (usize, usize)) -> char;
}

/// Policy handle shared between a game and its clones.
pub type SharedPromotionPolicy = Arc<Mutex<dyn PromotionPolicy>>;

pub fn shared(policy: impl PromotionPolicy + 'static) -> SharedPromotionPolicy {
    Arc::new(Mutex::new(policy))
}

/// Always a queen. The default, and the only choice AI players need.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoQueen;

impl PromotionPolicy for AutoQueen {
    fn choose(&mut self, _player: Player, _square: (usize, usize)) -> char {
        PieceType::Queen.token()
    }
}

/// Answers from a fixed script, then queens once the script runs out.
#[derive(Debug, Default, Clone)]
pub struct Scripted {
    answers: VecDeque<char>,
}

impl Scripted {
    pub fn new(answers: impl IntoIterator<Item = char>) -> Self {
        Scripted {
            answers: answers.into_iter().collect(),
        }
    }
}

impl PromotionPolicy for Scripted {
    fn choose(&mut self, _player: Player, _square: (usize, usize)) -> char {
        self.answers
            .pop_front()
            .unwrap_or_else(|| PieceType::Queen.token())
    }
}

/// Prompts on a writer and reads one line per answer, e.g. stdin/stdout for
/// a human player. End of input counts as a queen.
pub struct LineReader<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineReader<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LineReader { input, output }
    }
}

impl<R, W> fmt::Debug for LineReader<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LineReader")
    }
}

impl<R: BufRead + Send, W: Write + Send> PromotionPolicy for LineReader<R, W> {
    fn choose(&mut self, _player: Player, _square: (usize, usize)) -> char {
        let _ = write!(self.output, "\nPAWN PROMOTION (R, N, B, Q): ");
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => PieceType::Queen.token(),
            Ok(_) => line.trim().chars().next().unwrap_or(' '),
        }
    }
}

/// Ask `policy` until it names a piece a pawn may become.
pub fn resolve(
    policy: &SharedPromotionPolicy,
    player: Player,
    square: (usize, usize),
) -> PieceType {
    let mut policy = policy.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    for _ in 0..MAX_PROMOTION_ATTEMPTS {
        let token = policy.choose(player, square);
        match PieceType::from_token(token) {
            Some(pt) if PieceType::PROMOTIONS.contains(&pt) => return pt,
            _ => warn!(%token, "invalid promotion entry"),
        }
    }
    PieceType::Queen
}
