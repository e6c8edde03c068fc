// =============================================================================
// Position evaluation
//
// Scores a position from one player's side for the minimax driver. The score
// is a weighted sum of independent terms (material, pawn structure, mobility,
// king safety, development), each reported separately in EvalBreakdown. A game
// that is already decided scores i32::MAX for the winner and i32::MIN for the
// loser.
//
// Coordinate system: x = file, y = rank; player one advances toward higher y.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::chess::ChessGame;
use crate::piece::{PieceType, Player};

// =============================================================================
// Configuration
// =============================================================================

/// Tunable weights for the evaluation terms.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Weights {
    /// Per point of material lead (pawn = 1 ... queen = 9).
    pub material: i32,
    /// Penalty per pawn with a friendly pawn right in front of it.
    pub doubled_pawn: i32,
    /// Penalty per pawn with no friendly pawn on a neighbouring file.
    pub isolated_pawn: i32,
    pub passed_pawn: i32,
    /// Per legal move more than the opponent has.
    pub mobility: i32,
    /// Flat bonus once the king has castled.
    pub castled: i32,
    /// Per knight or bishop that has left its starting square.
    pub minor_developed: i32,
    pub rooks_connected: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            material: 30,
            doubled_pawn: 5,
            isolated_pawn: 10,
            passed_pawn: 20,
            mobility: 20,
            castled: 10000,
            minor_developed: 200,
            rooks_connected: 300,
        }
    }
}

/// Which pawns on the file east of a pawn (toward file h) stop it counting
/// as passed. The scan to the west always looks for opponent pawns.
///
/// `FriendlyPawns` is the long-standing behaviour and stays the default so
/// existing weight tunings keep their meaning. `OpponentPawns` makes both
/// sides of the pawn use the same test.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub enum PassedPawnEastScan {
    #[default]
    FriendlyPawns,
    OpponentPawns,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EvalConfig {
    pub weights: Weights,
    pub east_scan: PassedPawnEastScan,
}

// =============================================================================
// Evaluation, top level
// =============================================================================

/// Weighted contribution of each term. `total` is their sum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalBreakdown {
    pub material: i32,
    pub doubled_pawns: i32,
    pub isolated_pawns: i32,
    pub passed_pawns: i32,
    pub mobility: i32,
    pub castled: i32,
    pub minor_developed: i32,
    pub rooks_connected: i32,
    pub total: i32,
}

/// Pawn weaknesses and strengths for one side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PawnStructure {
    pub doubled: i32,
    pub isolated: i32,
    pub passed: i32,
}

impl ChessGame {
    /// Heuristic value of the position for `player`; `i32::MAX` if `player`
    /// has already won and `i32::MIN` if they have lost.
    pub fn evaluate_game_state(&self, player: Player) -> i32 {
        match self.winner() {
            Some(winner) if winner == player => i32::MAX,
            Some(_) => i32::MIN,
            None => self.eval_breakdown(player).total,
        }
    }

    /// The heuristic terms for `player`, ignoring whether the game is over.
    pub fn eval_breakdown(&self, player: Player) -> EvalBreakdown {
        let w = &self.eval.weights;
        let opponent = player.opponent();
        let pawns = pawn_structure(&self.board, player, self.eval.east_scan);
        let mobility =
            self.generate_moves(player).len() as i32 - self.generate_moves(opponent).len() as i32;

        let material = (self.material(player) - self.material(opponent)) * w.material;
        let doubled_pawns = -pawns.doubled * w.doubled_pawn;
        let isolated_pawns = -pawns.isolated * w.isolated_pawn;
        let passed_pawns = pawns.passed * w.passed_pawn;
        let mobility = mobility * w.mobility;
        let castled = if self.king_castled(player) { w.castled } else { 0 };
        let minor_developed = minor_pieces_developed(&self.board, player) * w.minor_developed;
        let rooks_connected =
            if rooks_connected(&self.board, player) { w.rooks_connected } else { 0 };

        EvalBreakdown {
            material,
            doubled_pawns,
            isolated_pawns,
            passed_pawns,
            mobility,
            castled,
            minor_developed,
            rooks_connected,
            total: material
                + doubled_pawns
                + isolated_pawns
                + passed_pawns
                + mobility
                + castled
                + minor_developed
                + rooks_connected,
        }
    }

    /// Sum of the values of `player`'s pieces.
    pub fn material(&self, player: Player) -> i32 {
        self.board.pieces_of(player).map(|(_, p)| p.value).sum()
    }
}

// =============================================================================
// Evaluation terms
// =============================================================================

pub fn pawn_structure(
    board: &Board,
    player: Player,
    east_scan: PassedPawnEastScan,
) -> PawnStructure {
    let pawns_of = |owner: Player| -> Vec<(usize, usize)> {
        board
            .pieces_of(owner)
            .filter(|(_, p)| p.piece_type == PieceType::Pawn)
            .map(|(sq, _)| sq)
            .collect()
    };
    let own = pawns_of(player);
    let theirs = pawns_of(player.opponent());
    let east_pawns = match east_scan {
        PassedPawnEastScan::FriendlyPawns => &own,
        PassedPawnEastScan::OpponentPawns => &theirs,
    };

    let mut structure = PawnStructure::default();
    for &(x, y) in &own {
        let is_ahead = |py: usize| (py as i32 - y as i32) * player.forward() > 0;

        let in_front = board.piece(x as i32, y as i32 + player.forward());
        if in_front.map_or(false, |p| p.is(PieceType::Pawn, player)) {
            structure.doubled += 1;
        }

        if !own.iter().any(|&(px, _)| px.abs_diff(x) == 1) {
            structure.isolated += 1;
        }

        let blocked_west = theirs.iter().any(|&(px, py)| px + 1 == x && is_ahead(py));
        let blocked_east = east_pawns.iter().any(|&(px, py)| px == x + 1 && is_ahead(py));
        if !blocked_west && !blocked_east {
            structure.passed += 1;
        }
    }
    structure
}

/// Knights and bishops that have moved at least once.
pub fn minor_pieces_developed(board: &Board, player: Player) -> i32 {
    board
        .pieces_of(player)
        .filter(|(_, p)| p.piece_type.is_minor() && p.has_moved)
        .count() as i32
}

/// Exactly two rooks on a shared rank or file with nothing between them.
pub fn rooks_connected(board: &Board, player: Player) -> bool {
    let rooks: Vec<(usize, usize)> = board
        .pieces_of(player)
        .filter(|(_, p)| p.piece_type == PieceType::Rook)
        .map(|(sq, _)| sq)
        .collect();
    let &[(ax, ay), (bx, by)] = rooks.as_slice() else {
        return false;
    };

    if ax == bx {
        (ay.min(by) + 1..ay.max(by)).all(|y| !board.occupied(ax as i32, y as i32))
    } else if ay == by {
        (ax.min(bx) + 1..ax.max(bx)).all(|x| !board.occupied(x as i32, ay as i32))
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rules;
    use crate::piece::Piece;
    use crate::piece::PieceType::*;
    use crate::piece::Player::{One, Two};
    use crate::variant::ChessVariant;

    fn board_with(pieces: &[((usize, usize), PieceType, Player)]) -> Board {
        let mut board = Board::new(8, 8).unwrap();
        for &(sq, pt, owner) in pieces {
            board.place(sq, Piece::new(pt, owner));
        }
        board
    }

    #[test]
    fn starting_position_is_balanced() {
        let game = ChessGame::new(ChessVariant::Standard);
        let one = game.eval_breakdown(One);
        assert_eq!(one.material, 0);
        assert_eq!(one.mobility, 0);
        assert_eq!(one.castled, 0);
        assert_eq!(one.minor_developed, 0);
        assert_eq!(one.rooks_connected, 0, "pieces stand between the rooks");
        assert_eq!(game.evaluate_game_state(One), game.evaluate_game_state(Two));
    }

    #[test]
    fn extra_queen_is_worth_thirty_per_point() {
        let board = board_with(&[((4, 0), King, One), ((4, 7), King, Two), ((0, 0), Queen, One)]);
        let game = ChessGame::from_board(board, Rules::default());
        assert_eq!(game.eval_breakdown(One).material, 9 * 30);
        assert_eq!(game.eval_breakdown(Two).material, -9 * 30);
        assert!(game.evaluate_game_state(One) > 0);
    }

    #[test]
    fn doubled_and_isolated_pawns() {
        // a2 a3 doubled and isolated, d2 isolated.
        let board = board_with(&[((0, 1), Pawn, One), ((0, 2), Pawn, One), ((3, 1), Pawn, One)]);
        let pawns = pawn_structure(&board, One, PassedPawnEastScan::FriendlyPawns);
        assert_eq!(pawns.doubled, 1);
        assert_eq!(pawns.isolated, 3);

        let board = board_with(&[((3, 6), Pawn, Two), ((3, 5), Pawn, Two), ((4, 6), Pawn, Two)]);
        let pawns = pawn_structure(&board, Two, PassedPawnEastScan::FriendlyPawns);
        assert_eq!(pawns.doubled, 1, "d7 has d6 in front of it");
        assert_eq!(pawns.isolated, 0);
    }

    #[test]
    fn east_scan_setting_changes_passed_pawns() {
        // White d4 with a black pawn ahead on e6 and a white pawn ahead on e5.
        let board = board_with(&[((3, 3), Pawn, One), ((4, 5), Pawn, Two), ((4, 4), Pawn, One)]);
        let friendly = pawn_structure(&board, One, PassedPawnEastScan::FriendlyPawns);
        let opponent = pawn_structure(&board, One, PassedPawnEastScan::OpponentPawns);
        // d4 is stopped by e5 under the friendly scan and by e6 under the
        // opponent scan. e5 is passed either way.
        assert_eq!(friendly.passed, 1);
        assert_eq!(opponent.passed, 1);

        let board = board_with(&[((3, 3), Pawn, One), ((4, 5), Pawn, Two)]);
        assert_eq!(pawn_structure(&board, One, PassedPawnEastScan::FriendlyPawns).passed, 1);
        assert_eq!(pawn_structure(&board, One, PassedPawnEastScan::OpponentPawns).passed, 0);
    }

    #[test]
    fn west_scan_sees_opponent_pawns_ahead_only() {
        let ahead = board_with(&[((3, 3), Pawn, One), ((2, 5), Pawn, Two)]);
        assert_eq!(pawn_structure(&ahead, One, PassedPawnEastScan::OpponentPawns).passed, 0);

        let behind = board_with(&[((3, 3), Pawn, One), ((2, 1), Pawn, Two)]);
        assert_eq!(pawn_structure(&behind, One, PassedPawnEastScan::OpponentPawns).passed, 1);
    }

    #[test]
    fn rooks_connect_along_open_lines() {
        let open = board_with(&[((0, 0), Rook, One), ((7, 0), Rook, One)]);
        assert!(rooks_connected(&open, One));

        let blocked = board_with(&[((0, 0), Rook, One), ((4, 0), King, One), ((7, 0), Rook, One)]);
        assert!(!rooks_connected(&blocked, One));

        let file = board_with(&[((2, 1), Rook, Two), ((2, 6), Rook, Two)]);
        assert!(rooks_connected(&file, Two));

        let apart = board_with(&[((0, 0), Rook, One), ((7, 7), Rook, One)]);
        assert!(!rooks_connected(&apart, One));

        let three = board_with(&[((0, 0), Rook, One), ((3, 0), Rook, One), ((7, 0), Rook, One)]);
        assert!(!rooks_connected(&three, One));
    }

    #[test]
    fn developed_minors_and_castling_add_up() {
        let mut game = ChessGame::new(ChessVariant::Standard);
        let moves = ["g1f3", "g8f6", "e2e3", "e7e6", "f1e2", "f8e7", "e1g1"];
        let mut player = One;
        for m in moves {
            assert!(game.apply_move(player, m.parse().unwrap()), "{m}");
            player = player.opponent();
        }
        let one = game.eval_breakdown(One);
        assert_eq!(one.minor_developed, 2 * 200);
        assert_eq!(one.castled, 10000);
        assert_eq!(game.eval_breakdown(Two).castled, 0);
    }

    #[test]
    fn custom_weights_apply() {
        let board = board_with(&[((4, 0), King, One), ((4, 7), King, Two), ((0, 0), Rook, One)]);
        let mut game = ChessGame::from_board(board, Rules::default());
        game.set_eval_config(EvalConfig {
            weights: Weights {
                material: 1,
                mobility: 0,
                ..Weights::default()
            },
            ..EvalConfig::default()
        });
        let b = game.eval_breakdown(One);
        assert_eq!(b.material, 5);
        assert_eq!(b.mobility, 0);
        assert_eq!(b.total, 5);
    }
}
