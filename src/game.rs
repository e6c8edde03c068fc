use std::fmt;

use serde::{Deserialize, Serialize};

use crate::moves::Move;
use crate::piece::Player;

/// How a finished game was decided.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub enum WinBy {
    #[default]
    Nothing,
    Resignation,
    Checkmate,
    Stalemate,
    ThreefoldRepetition,
}

impl WinBy {
    pub fn is_draw(self) -> bool {
        matches!(self, WinBy::Stalemate | WinBy::ThreefoldRepetition)
    }
}

impl fmt::Display for WinBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WinBy::Nothing => "nothing",
            WinBy::Resignation => "resignation",
            WinBy::Checkmate => "checkmate",
            WinBy::Stalemate => "stalemate",
            WinBy::ThreefoldRepetition => "drawn by threefold repetition",
        })
    }
}

/// What a search driver, a move log or a network peer needs from a
/// two-player game. Every chess variant is a [`crate::chess::ChessGame`];
/// other board games would plug in here too.
pub trait Game {
    /// Legal moves for `player`, in a deterministic order.
    fn generate_moves(&self, player: Player) -> Vec<Move>;

    /// Apply `mv` for `player`. Returns false, leaving the game untouched,
    /// if the move is not legal.
    fn apply_move(&mut self, player: Player, mv: Move) -> bool;

    /// Decide whether the game is over with `player` to move. Updates
    /// [`Game::winner`] and [`Game::win_by`].
    fn game_ended(&mut self, player: Player) -> bool;

    /// Heuristic score of the position from `player`'s point of view.
    fn evaluate_game_state(&self, player: Player) -> i32;

    /// Winner found by the last [`Game::game_ended`] call; `None` for a draw
    /// or a game still in progress.
    fn winner(&self) -> Option<Player>;

    fn win_by(&self) -> WinBy;

    /// Moves applied so far, resignations excluded.
    fn number_of_moves(&self) -> usize;

    /// Every move applied so far, in order.
    fn history(&self) -> &[Move];

    fn last_move(&self) -> Option<Move> {
        self.history().last().copied()
    }

    fn title(&self) -> String;

    /// Independent deep copy, boxed for callers that only know the trait.
    fn clone_game(&self) -> Box<dyn Game>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_read_like_the_move_log() {
        assert_eq!(WinBy::ThreefoldRepetition.to_string(), "drawn by threefold repetition");
        assert_eq!(WinBy::Checkmate.to_string(), "checkmate");
        assert_eq!(WinBy::default().to_string(), "nothing");
        assert!(WinBy::Stalemate.is_draw());
        assert!(!WinBy::Resignation.is_draw());
    }
}
