// =============================================================================
// Move generation
//
// Moves are produced in board scan order (rank by rank from rank 1, file by
// file within a rank), then in a fixed per-piece pattern. Each candidate goes
// through `consider`, which in legal mode applies it to a snapshot of the game
// and keeps it only if the mover's king survives. Look-ahead never goes more
// than one level deep: moves generated inside a snapshot are pseudo-legal.
// =============================================================================

use crate::chess::ChessGame;
use crate::moves::Move;
use crate::piece::{Piece, PieceType, Player};

/// How much checking a generated move gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Generation {
    /// Squares a piece could move to or capture on. No castling and no
    /// check tests; used to find attacks on a king.
    Attacks,
    /// Moves legal by piece movement alone, castling included.
    Pseudo,
    /// Pseudo-legal moves that do not leave the mover's king in check.
    Legal,
}

/// Rook directions: up the file, down the file, toward file a, toward file h.
const ORTHOGONAL: [(i32, i32); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];

const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

const KNIGHT_JUMPS: [(i32, i32); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

impl ChessGame {
    /// All legal moves for `player`.
    pub fn generate_moves(&self, player: Player) -> Vec<Move> {
        let mut moves = Vec::new();
        for (from, piece) in self.board.pieces_of(player) {
            self.piece_moves(player, from, piece, Generation::Legal, &mut moves);
        }
        moves
    }

    /// Moves for the piece on `from`, which must belong to `player`.
    pub fn moves_for_piece(
        &self,
        player: Player,
        from: (usize, usize),
        mode: Generation,
    ) -> Vec<Move> {
        let mut moves = Vec::new();
        if let Some(piece) = self.board.piece_at(from).filter(|p| p.owner == player) {
            self.piece_moves(player, from, piece, mode, &mut moves);
        }
        moves
    }

    pub(crate) fn piece_moves(
        &self,
        player: Player,
        from: (usize, usize),
        piece: Piece,
        mode: Generation,
        out: &mut Vec<Move>,
    ) {
        match piece.piece_type {
            PieceType::Pawn => self.pawn_moves(player, from, piece, mode, out),
            PieceType::Rook => self.slide(player, from, &ORTHOGONAL, true, mode, out),
            PieceType::Knight => self.knight_moves(player, from, mode, out),
            PieceType::Bishop => self.slide(player, from, &DIAGONAL, true, mode, out),
            PieceType::Queen => {
                self.slide(player, from, &ORTHOGONAL, true, mode, out);
                self.slide(player, from, &DIAGONAL, true, mode, out);
            }
            PieceType::King => {
                self.slide(player, from, &ORTHOGONAL, false, mode, out);
                self.slide(player, from, &DIAGONAL, false, mode, out);
                if mode != Generation::Attacks {
                    self.castle_moves(player, from, piece, mode, out);
                }
            }
        }
    }

    /// Keep `mv` if the mode allows it without simulation, or if it
    /// survives a test application.
    fn consider(&self, player: Player, mv: Move, mode: Generation, out: &mut Vec<Move>) {
        if mode != Generation::Legal || self.test_move(player, mv) {
            out.push(mv);
        }
    }

    fn kings_would_touch(&self, player: Player, mv: Move) -> bool {
        self.rules.forbid_adjacent_kings && self.adjacent_kings(mv, player)
    }

    fn pawn_moves(
        &self,
        player: Player,
        (x, y): (usize, usize),
        pawn: Piece,
        mode: Generation,
        out: &mut Vec<Move>,
    ) {
        let (xi, yi) = (x as i32, y as i32);
        let forward = player.forward();
        let ny = yi + forward;
        if !self.board.valid_location(xi, ny) {
            return;
        }

        if !self.board.occupied(xi, ny) {
            self.consider(player, Move::new((x, y), (x, ny as usize)), mode, out);
        }

        for nx in [xi - 1, xi + 1] {
            if self.board.occupied_by(nx, ny, player.opponent()) {
                self.consider(player, Move::new((x, y), (nx as usize, ny as usize)), mode, out);
            }
        }

        if self.rules.double_pawn_move && !pawn.has_moved {
            let dy = yi + 2 * forward;
            if self.board.valid_location(xi, dy)
                && !self.board.occupied(xi, ny)
                && !self.board.occupied(xi, dy)
            {
                self.consider(player, Move::new((x, y), (x, dy as usize)), mode, out);
            }
        }

        if self.rules.en_passant {
            if let Some(to) = self.en_passant_target(player, (x, y)) {
                self.consider(player, Move::new((x, y), to), mode, out);
            }
        }
    }

    /// Square a pawn on `(x, y)` may capture onto en passant: only right
    /// after an opponent pawn double-stepped to land beside it.
    fn en_passant_target(&self, player: Player, (x, y): (usize, usize)) -> Option<(usize, usize)> {
        let last = self.history.last().filter(|m| !m.resignation)?;
        let pushed = self.board.piece_at(last.to)?;
        if !pushed.is(PieceType::Pawn, player.opponent()) {
            return None;
        }

        let (from_x, from_y) = (last.from.0 as i32, last.from.1 as i32);
        let to_y = last.to.1 as i32;
        if (from_y - to_y).abs() != 2 || to_y != y as i32 || (from_x - x as i32).abs() != 1 {
            return None;
        }
        Some((last.from.0, ((from_y + to_y) / 2) as usize))
    }

    /// Rook, bishop, queen and king moves: walk each direction until the
    /// edge or a piece. `unlimited` is false for the king's single step.
    fn slide(
        &self,
        player: Player,
        from: (usize, usize),
        directions: &[(i32, i32)],
        unlimited: bool,
        mode: Generation,
        out: &mut Vec<Move>,
    ) {
        for &(dx, dy) in directions {
            let (mut nx, mut ny) = (from.0 as i32 + dx, from.1 as i32 + dy);
            while self.board.valid_location(nx, ny) {
                let mv = Move::new(from, (nx as usize, ny as usize));
                if !self.linear_step(player, mv, mode, out) || !unlimited {
                    break;
                }
                nx += dx;
                ny += dy;
            }
        }
    }

    /// Handle one square along a ray. Returns true if the ray continues.
    fn linear_step(&self, player: Player, mv: Move, mode: Generation, out: &mut Vec<Move>) -> bool {
        match self.board.piece_at(mv.to) {
            None => {
                if !self.kings_would_touch(player, mv) {
                    self.consider(player, mv, mode, out);
                }
                true
            }
            Some(p) if p.owner == player => false,
            Some(_) => {
                if !self.kings_would_touch(player, mv) {
                    self.consider(player, mv, mode, out);
                }
                false
            }
        }
    }

    fn knight_moves(
        &self,
        player: Player,
        from: (usize, usize),
        mode: Generation,
        out: &mut Vec<Move>,
    ) {
        for (dx, dy) in KNIGHT_JUMPS {
            let (nx, ny) = (from.0 as i32 + dx, from.1 as i32 + dy);
            if self.board.valid_location(nx, ny) && !self.board.occupied_by(nx, ny, player) {
                self.consider(player, Move::new(from, (nx as usize, ny as usize)), mode, out);
            }
        }
    }

    /// Castling with any unmoved rook on the king's rank. The king moves two
    /// files toward the rook. In legal mode the king may not start in check
    /// and must survive a test move onto both the crossed square and the
    /// destination.
    fn castle_moves(
        &self,
        player: Player,
        king: (usize, usize),
        piece: Piece,
        mode: Generation,
        out: &mut Vec<Move>,
    ) {
        if !self.rules.castling || !self.castling_allowed[player.index()] || piece.has_moved {
            return;
        }
        if mode == Generation::Legal && self.king_in_check(player) {
            return;
        }

        let (kx, ky) = king;
        let rook_files: Vec<usize> = (0..self.board.files())
            .filter(|&rx| {
                self.board
                    .piece_at((rx, ky))
                    .map_or(false, |p| p.is(PieceType::Rook, player) && !p.has_moved)
            })
            .collect();

        for rx in rook_files {
            let (low, high, step) = if rx < kx { (rx + 1, kx, -1) } else { (kx + 1, rx, 1) };
            if (low..high).any(|bx| self.board.occupied(bx as i32, ky as i32)) {
                continue;
            }

            let crossed = kx as i32 + step;
            let dest = kx as i32 + 2 * step;
            let y = ky as i32;
            if !self.board.valid_location(dest, y)
                || self.board.occupied(crossed, y)
                || self.board.occupied(dest, y)
            {
                continue;
            }

            let via = Move::new(king, (crossed as usize, ky));
            let castle = Move::new(king, (dest as usize, ky));
            if self.kings_would_touch(player, via) || self.kings_would_touch(player, castle) {
                continue;
            }
            if mode == Generation::Legal
                && !(self.test_move(player, via) && self.test_move(player, castle))
            {
                continue;
            }
            out.push(castle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::config::Rules;
    use crate::piece::PieceType::*;
    use crate::piece::Player::{One, Two};
    use crate::variant::ChessVariant;

    fn lone_piece(pt: PieceType, square: (usize, usize)) -> ChessGame {
        let mut board = Board::new(8, 8).unwrap();
        board.place((0, 0), Piece::new(King, One));
        board.place((7, 7), Piece::new(King, Two));
        board.place(square, Piece::new(pt, One));
        ChessGame::from_board(board, Rules::default())
    }

    fn destinations(moves: &[Move]) -> Vec<String> {
        moves.iter().map(|m| m.announce_to()).collect()
    }

    #[test]
    fn knight_jumps_follow_fixed_order() {
        let game = lone_piece(Knight, (3, 3));
        let moves = game.moves_for_piece(One, (3, 3), Generation::Legal);
        assert_eq!(
            destinations(&moves),
            ["f5", "e6", "c6", "b5", "b3", "c2", "e2", "f3"]
        );
    }

    #[test]
    fn rook_rays_stop_at_pieces() {
        let mut game = lone_piece(Rook, (3, 3));
        game.board.place((3, 5), Piece::new(Pawn, Two));
        game.board.place((1, 3), Piece::new(Pawn, One));
        let moves = game.moves_for_piece(One, (3, 3), Generation::Legal);
        assert_eq!(
            destinations(&moves),
            ["d5", "d6", "d3", "d2", "d1", "c4", "e4", "f4", "g4", "h4"]
        );
    }

    #[test]
    fn queen_combines_rook_and_bishop() {
        let game = lone_piece(Queen, (3, 3));
        let queen = game.moves_for_piece(One, (3, 3), Generation::Pseudo).len();
        let rook = lone_piece(Rook, (3, 3)).moves_for_piece(One, (3, 3), Generation::Pseudo).len();
        let bishop =
            lone_piece(Bishop, (3, 3)).moves_for_piece(One, (3, 3), Generation::Pseudo).len();
        assert_eq!(queen, rook + bishop);
        assert_eq!(rook, 14);
    }

    #[test]
    fn pawn_pushes_and_captures() {
        let mut game = ChessGame::new(ChessVariant::Standard);
        let start = destinations(&game.moves_for_piece(One, (4, 1), Generation::Legal));
        assert_eq!(start, ["e3", "e4"]);

        game.board.place((3, 2), Piece::new(Knight, Two));
        game.board.place((4, 2), Piece::new(Knight, Two));
        let blocked = destinations(&game.moves_for_piece(One, (4, 1), Generation::Legal));
        assert_eq!(blocked, ["d3"], "push and double step are blocked");
    }

    #[test]
    fn double_step_follows_the_rule_switch() {
        let game = ChessGame::new(ChessVariant::Gardner);
        let moves = game.moves_for_piece(One, (2, 1), Generation::Legal);
        assert_eq!(destinations(&moves), ["c3"]);
    }

    #[test]
    fn attacks_mode_has_no_castles() {
        let mut board = Board::new(8, 8).unwrap();
        board.place((4, 0), Piece::new(King, One));
        board.place((7, 0), Piece::new(Rook, One));
        board.place((4, 7), Piece::new(King, Two));
        let game = ChessGame::from_board(board, Rules::default());
        let pseudo = game.moves_for_piece(One, (4, 0), Generation::Pseudo);
        let attacks = game.moves_for_piece(One, (4, 0), Generation::Attacks);
        assert!(pseudo.iter().any(|m| m.to == (6, 0)));
        assert!(!attacks.iter().any(|m| m.to == (6, 0)));
        assert_eq!(pseudo.len(), attacks.len() + 1);
    }

    #[test]
    fn generation_is_deterministic() {
        let game = ChessGame::new(ChessVariant::JacobsMeirovitz);
        assert_eq!(game.generate_moves(Two), game.clone().generate_moves(Two));
        assert!(game.moves_for_piece(One, (4, 4), Generation::Legal).is_empty(), "not our piece");
    }
}
