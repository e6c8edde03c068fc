//! Check detection and move simulation.

use tracing::error;

use crate::chess::ChessGame;
use crate::movegen::Generation;
use crate::moves::Move;
use crate::piece::{PieceType, Player};

impl ChessGame {
    /// True if any opposing piece could move onto `player`'s king.
    ///
    /// # Panics
    ///
    /// If `player` has no king. A board without one is corrupt.
    pub fn king_in_check(&self, player: Player) -> bool {
        let king = self.require_king(player);
        let opponent = player.opponent();

        let mut attacks = Vec::new();
        self.board.pieces_of(opponent).any(|(from, piece)| {
            attacks.clear();
            self.piece_moves(opponent, from, piece, Generation::Attacks, &mut attacks);
            attacks.iter().any(|mv| mv.to == king)
        })
    }

    /// True if `mv` moves `player`'s king next to the opposing king. Moves of
    /// any other piece are never adjacent.
    ///
    /// # Panics
    ///
    /// If the opposing king is missing.
    pub fn adjacent_kings(&self, mv: Move, player: Player) -> bool {
        let moving_king = self
            .board
            .piece_at(mv.from)
            .map_or(false, |p| p.piece_type == PieceType::King);
        if !moving_king {
            return false;
        }

        let (kx, ky) = self.require_king(player.opponent());
        mv.to.0.abs_diff(kx).max(mv.to.1.abs_diff(ky)) == 1
    }

    /// Try `mv` on a snapshot of the game. The real game is never touched.
    pub fn test_move(&self, player: Player, mv: Move) -> bool {
        let mut probe = self.snapshot();
        probe.apply_move(player, mv.as_test())
    }

    fn require_king(&self, player: Player) -> (usize, usize) {
        match self.board.find_king(player) {
            Some(square) => square,
            None => {
                error!(player = player.number(), board = %self.board, "king missing from board");
                panic!("could not find king for player {player}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::chess::ChessGame;
    use crate::config::Rules;
    use crate::moves::Move;
    use crate::piece::PieceType::*;
    use crate::piece::Player::{One, Two};
    use crate::piece::Piece;

    fn game_with(
        pieces: &[((usize, usize), crate::piece::PieceType, crate::piece::Player)],
    ) -> ChessGame {
        let mut board = Board::new(6, 6).unwrap();
        for &(sq, pt, owner) in pieces {
            board.place(sq, Piece::new(pt, owner));
        }
        ChessGame::from_board(board, Rules::minichess())
    }

    #[test]
    fn pawn_checks_diagonally_only() {
        let diagonal = game_with(&[((2, 2), King, One), ((3, 3), Pawn, Two), ((5, 5), King, Two)]);
        assert!(diagonal.king_in_check(One));

        let ahead = game_with(&[((2, 2), King, One), ((2, 3), Pawn, Two), ((5, 5), King, Two)]);
        assert!(!ahead.king_in_check(One));
    }

    #[test]
    fn blocked_ray_is_not_check() {
        let open = game_with(&[((0, 0), King, One), ((0, 5), Rook, Two), ((5, 5), King, Two)]);
        assert!(open.king_in_check(One));

        let blocked = game_with(&[
            ((0, 0), King, One),
            ((0, 2), Knight, One),
            ((0, 5), Rook, Two),
            ((5, 5), King, Two),
        ]);
        assert!(!blocked.king_in_check(One));
    }

    #[test]
    fn test_move_leaves_the_game_alone() {
        let game = game_with(&[
            ((0, 0), King, One),
            ((0, 2), Knight, One),
            ((0, 5), Rook, Two),
            ((5, 5), King, Two),
        ]);
        let before = game.board().clone();

        // Moving the blocking knight exposes the king.
        assert!(!game.test_move(One, Move::new((0, 2), (1, 4))));
        assert!(game.test_move(One, Move::new((0, 0), (1, 0))));
        assert_eq!(game.board(), &before);
        assert!(game.history().is_empty());
        assert_eq!(game.number_of_moves(), 0);
    }

    #[test]
    fn adjacency_only_concerns_kings() {
        let game = game_with(&[((1, 1), King, One), ((1, 3), King, Two), ((3, 1), Rook, One)]);
        assert!(game.adjacent_kings(Move::new((1, 1), (2, 2)), One));
        assert!(!game.adjacent_kings(Move::new((3, 1), (2, 2)), One));
        assert!(game.adjacent_kings(Move::new((1, 3), (0, 2)), Two));
        assert!(!game.adjacent_kings(Move::new((1, 3), (1, 5)), Two));
    }
}
