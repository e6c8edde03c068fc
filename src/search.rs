// =============================================================================
// Move search
//
// Plain depth-limited minimax over any `Game`: the searching player
// maximizes, the opponent minimizes, and every leaf is scored by the game's
// own evaluation from the searching player's side. Scores saturate at
// i32::MAX / i32::MIN for decided games, so no negation is involved.
//
// Moves tied for the best score are picked at random, which adds variety to
// self-play. A fixed seed makes the choice reproducible.
// =============================================================================

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::Game;
use crate::moves::Move;
use crate::piece::Player;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched, the candidate move itself included. Zero counts as one.
    pub depth: u32,
    /// Choose at random among equally scored moves instead of the first one.
    pub randomize_ties: bool,
    /// Seed for tie-breaking. `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 2,
            randomize_ties: true,
            seed: None,
        }
    }
}

/// The chosen move with its minimax score and the number of static
/// evaluations performed to find it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickResult {
    pub mv: Move,
    pub score: i32,
    pub evals: u64,
}

fn minimax<G: Game + Clone>(
    game: &mut G,
    searcher: Player,
    to_move: Player,
    depth: u32,
    evals: &mut u64,
) -> i32 {
    if game.game_ended(to_move) || depth == 0 {
        *evals += 1;
        return game.evaluate_game_state(searcher);
    }

    let maximizing = to_move == searcher;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for mv in game.generate_moves(to_move) {
        let mut child = game.clone();
        if !child.apply_move(to_move, mv) {
            continue;
        }
        let score = minimax(&mut child, searcher, to_move.opponent(), depth - 1, evals);
        best = if maximizing { best.max(score) } else { best.min(score) };
    }
    best
}

/// Score every legal move for `player` and pick the best one. Returns `None`
/// when `player` has no legal move.
pub fn pick_move<G: Game + Clone>(
    game: &G,
    player: Player,
    config: &SearchConfig,
) -> Option<PickResult> {
    let plies = config.depth.max(1);
    let mut evals: u64 = 0;

    let mut scored: Vec<(Move, i32)> = Vec::new();
    for mv in game.generate_moves(player) {
        let mut child = game.clone();
        if !child.apply_move(player, mv) {
            continue;
        }
        let score = minimax(&mut child, player, player.opponent(), plies - 1, &mut evals);
        scored.push((mv, score));
    }

    let best_score = scored.iter().map(|&(_, score)| score).max()?;
    let best: Vec<Move> = scored
        .iter()
        .filter(|&&(_, score)| score == best_score)
        .map(|&(mv, _)| mv)
        .collect();

    let index = if config.randomize_ties && best.len() > 1 {
        match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed).gen_range(0..best.len()),
            None => rand::thread_rng().gen_range(0..best.len()),
        }
    } else {
        0
    };

    let mv = best[index];
    debug!(%mv, score = best_score, evals, tied = best.len(), "picked move");
    Some(PickResult {
        mv,
        score: best_score,
        evals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::chess::ChessGame;
    use crate::config::Rules;
    use crate::piece::Piece;
    use crate::piece::PieceType::*;
    use crate::piece::Player::{One, Two};
    use crate::variant::ChessVariant;

    fn fixed(depth: u32) -> SearchConfig {
        SearchConfig {
            depth,
            randomize_ties: false,
            seed: None,
        }
    }

    #[test]
    fn takes_a_hanging_queen() {
        let mut board = Board::new(6, 6).unwrap();
        board.place((0, 0), Piece::new(King, One));
        board.place((5, 5), Piece::new(King, Two));
        board.place((2, 0), Piece::new(Rook, One));
        board.place((2, 4), Piece::new(Queen, Two));
        let game = ChessGame::from_board(board, Rules::minichess());

        let result = pick_move(&game, One, &fixed(1)).unwrap();
        assert_eq!(result.mv, "c1c5".parse().unwrap());
        assert!(result.evals > 0);
    }

    #[test]
    fn finds_mate_in_one() {
        // Rook to the eighth rank mates the king boxed in by its own pawns.
        let mut board = Board::new(8, 8).unwrap();
        board.place((6, 0), Piece::new(King, One));
        board.place((0, 0), Piece::new(Rook, One));
        board.place((6, 7), Piece::new(King, Two));
        for x in 5..8 {
            board.place((x, 6), Piece::new(Pawn, Two));
        }
        let game = ChessGame::from_board(board, Rules::default());

        let result = pick_move(&game, One, &fixed(2)).unwrap();
        assert_eq!(result.mv, "a1a8".parse().unwrap());
        assert_eq!(result.score, i32::MAX);
    }

    #[test]
    fn no_moves_means_no_pick() {
        let mut board = Board::new(8, 8).unwrap();
        board.place((0, 0), Piece::new(King, One));
        board.place((1, 2), Piece::new(Queen, Two));
        board.place((2, 1), Piece::new(King, Two));
        let game = ChessGame::from_board(
            board,
            Rules {
                forbid_adjacent_kings: false,
                ..Rules::default()
            },
        );
        assert!(pick_move(&game, One, &fixed(1)).is_none());
    }

    #[test]
    fn seeded_tie_break_is_reproducible() {
        let game = ChessGame::new(ChessVariant::Gardner);
        let config = SearchConfig {
            depth: 1,
            randomize_ties: true,
            seed: Some(42),
        };
        let first = pick_move(&game, One, &config).unwrap();
        let second = pick_move(&game, One, &config).unwrap();
        assert_eq!(first, second);
    }
}
