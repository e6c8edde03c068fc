use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, ChessResult};
use crate::piece::{Piece, PieceType, Player};
use crate::zobrist::{piece_square_key, ZobristKey};

/// Largest board any variant may use.
pub const MAX_FILES: usize = 8;
pub const MAX_RANKS: usize = 8;

/// A rectangular grid of squares, indexed `squares[y][x]` with x = file and
/// y = rank, both zero-based. Only the first `files` x `ranks` squares are in
/// play; the rest stay empty.
///
/// The position hash is kept in step with every placement and removal, so it
/// always equals [`Board::compute_zobrist`] for the current contents.
///
/// Deserialized boards are rebuilt through [`Board::new`], so their size is
/// checked again and the stored hash is recomputed.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(try_from = "BoardData")]
pub struct Board {
    files: usize,
    ranks: usize,
    squares: [[Option<Piece>; MAX_FILES]; MAX_RANKS],
    zobrist: ZobristKey,
}

#[derive(Deserialize)]
struct BoardData {
    files: usize,
    ranks: usize,
    squares: [[Option<Piece>; MAX_FILES]; MAX_RANKS],
}

impl TryFrom<BoardData> for Board {
    type Error = ChessError;

    fn try_from(data: BoardData) -> ChessResult<Board> {
        let mut board = Board::new(data.files, data.ranks)?;
        for (y, row) in data.squares.iter().enumerate().take(data.ranks) {
            for (x, square) in row.iter().enumerate().take(data.files) {
                if let Some(piece) = *square {
                    board.place((x, y), piece);
                }
            }
        }
        Ok(board)
    }
}

impl Board {
    /// Create an empty board. Useful for setting up test positions.
    pub fn new(files: usize, ranks: usize) -> ChessResult<Self> {
        if files == 0 || ranks == 0 || files > MAX_FILES || ranks > MAX_RANKS {
            return Err(ChessError::BoardSize {
                files,
                ranks,
                max: MAX_FILES,
            });
        }
        Ok(Board::blank(files, ranks))
    }

    /// Empty board for sizes already known to fit.
    pub(crate) fn blank(files: usize, ranks: usize) -> Self {
        debug_assert!(files <= MAX_FILES && ranks <= MAX_RANKS);
        Board {
            files: files.min(MAX_FILES),
            ranks: ranks.min(MAX_RANKS),
            squares: [[None; MAX_FILES]; MAX_RANKS],
            zobrist: 0,
        }
    }

    pub fn files(&self) -> usize {
        self.files
    }

    pub fn ranks(&self) -> usize {
        self.ranks
    }

    pub fn valid_location(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.files && (y as usize) < self.ranks
    }

    /// The piece on (x, y), or `None` for an empty or off-board square.
    pub fn piece(&self, x: i32, y: i32) -> Option<Piece> {
        if self.valid_location(x, y) {
            self.squares[y as usize][x as usize]
        } else {
            None
        }
    }

    /// True if `(x, y)` is one of the squares in play.
    pub fn contains(&self, (x, y): (usize, usize)) -> bool {
        x < self.files && y < self.ranks
    }

    pub fn piece_at(&self, (x, y): (usize, usize)) -> Option<Piece> {
        if self.contains((x, y)) {
            self.squares[y][x]
        } else {
            None
        }
    }

    pub fn occupied(&self, x: i32, y: i32) -> bool {
        self.piece(x, y).is_some()
    }

    pub fn occupied_by(&self, x: i32, y: i32, player: Player) -> bool {
        self.piece(x, y).map(|p| p.owner == player).unwrap_or(false)
    }

    /// Put `piece` on (x, y), replacing whatever stood there.
    pub fn place(&mut self, (x, y): (usize, usize), piece: Piece) {
        self.remove((x, y));
        self.zobrist ^= piece_square_key(&piece, x, y);
        self.squares[y][x] = Some(piece);
    }

    /// Take the piece off (x, y), if any.
    pub fn remove(&mut self, (x, y): (usize, usize)) -> Option<Piece> {
        let piece = self.squares[y][x].take()?;
        self.zobrist ^= piece_square_key(&piece, x, y);
        Some(piece)
    }

    /// Move the piece on `from` to `to` and mark it as moved. Anything left
    /// on `to` is replaced, so callers remove a captured piece first. Fails
    /// without touching the board if `from` is empty.
    pub fn relocate(&mut self, from: (usize, usize), to: (usize, usize)) -> bool {
        let Some(mut piece) = self.remove(from) else {
            return false;
        };
        piece.has_moved = true;
        self.place(to, piece);
        true
    }

    pub fn zobrist_key(&self) -> ZobristKey {
        self.zobrist
    }

    /// Hash the current contents from scratch, ignoring the incremental key.
    pub fn compute_zobrist(&self) -> ZobristKey {
        self.pieces()
            .fold(0, |hash, ((x, y), p)| hash ^ piece_square_key(&p, x, y))
    }

    /// All pieces in scan order: rank by rank from y = 0, file by file within a rank.
    pub fn pieces(&self) -> impl Iterator<Item = ((usize, usize), Piece)> + '_ {
        (0..self.ranks).flat_map(move |y| {
            (0..self.files).filter_map(move |x| self.squares[y][x].map(|p| ((x, y), p)))
        })
    }

    pub fn pieces_of(&self, player: Player) -> impl Iterator<Item = ((usize, usize), Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.owner == player)
    }

    /// First square in scan order holding `player`'s `piece_type`.
    pub fn find_piece(&self, player: Player, piece_type: PieceType) -> Option<(usize, usize)> {
        self.pieces()
            .find(|(_, p)| p.is(piece_type, player))
            .map(|(sq, _)| sq)
    }

    pub fn find_king(&self, player: Player) -> Option<(usize, usize)> {
        self.find_piece(player, PieceType::King)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.ranks).rev() {
            write!(f, "{} ", y + 1)?;
            for x in 0..self.files {
                let c = self.squares[y][x].map(|p| p.symbol()).unwrap_or('.');
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for x in 0..self.files {
            write!(f, "{}", (b'a' + x as u8) as char)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_corner() -> Board {
        let mut board = Board::new(8, 8).unwrap();
        board.place((4, 0), Piece::new(PieceType::King, Player::One));
        board.place((0, 0), Piece::new(PieceType::Rook, Player::One));
        board.place((4, 7), Piece::new(PieceType::King, Player::Two));
        board.place((3, 6), Piece::new(PieceType::Pawn, Player::Two));
        board
    }

    #[test]
    fn rejects_oversized_boards() {
        assert!(Board::new(9, 8).is_err());
        assert!(Board::new(5, 0).is_err());
        let board = Board::new(5, 6).unwrap();
        assert_eq!((board.files(), board.ranks()), (5, 6));
        assert!(board.valid_location(4, 5));
        assert!(!board.valid_location(5, 5));
        assert!(!board.valid_location(-1, 0));
    }

    #[test]
    fn incremental_key_matches_scratch_hash() {
        let mut board = standard_corner();
        assert_eq!(board.zobrist_key(), board.compute_zobrist());

        assert!(board.relocate((0, 0), (0, 6)));
        assert_eq!(board.zobrist_key(), board.compute_zobrist());

        board.remove((3, 6));
        board.place((3, 6), Piece::new(PieceType::Queen, Player::One));
        assert_eq!(board.zobrist_key(), board.compute_zobrist());
    }

    #[test]
    fn relocate_marks_piece_moved_and_keeps_board_on_failure() {
        let mut board = standard_corner();
        let before = board.clone();
        assert!(!board.relocate((2, 2), (2, 3)));
        assert_eq!(board, before);

        assert!(board.relocate((0, 0), (0, 5)));
        let rook = board.piece(0, 5).unwrap();
        assert!(rook.has_moved);
        assert!(board.piece(0, 0).is_none());
    }

    #[test]
    fn removing_everything_returns_to_empty_hash() {
        let mut board = standard_corner();
        let squares: Vec<_> = board.pieces().map(|(sq, _)| sq).collect();
        for sq in squares {
            board.remove(sq);
        }
        assert_eq!(board.zobrist_key(), 0);
    }

    #[test]
    fn finds_pieces_in_scan_order() {
        let board = standard_corner();
        assert_eq!(board.find_king(Player::Two), Some((4, 7)));
        assert_eq!(board.find_piece(Player::One, PieceType::Rook), Some((0, 0)));
        assert_eq!(board.find_piece(Player::Two, PieceType::Rook), None);
        assert!(board.occupied_by(3, 6, Player::Two));
        assert!(!board.occupied_by(3, 6, Player::One));
        assert!(!board.occupied(20, 20));
    }

    #[test]
    fn renders_rank_eight_first() {
        let text = standard_corner().to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "8 ....k...");
        assert!(text.ends_with("  abcdefgh"));
    }

    #[test]
    fn json_snapshot_keeps_hash_and_flags() {
        let mut board = standard_corner();
        board.relocate((0, 0), (0, 3));
        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);
        assert_eq!(restored.zobrist_key(), restored.compute_zobrist());
        assert!(restored.piece(0, 3).unwrap().has_moved);
    }

    #[test]
    fn deserializing_checks_size_and_rebuilds_hash() {
        let board = standard_corner();
        let mut value = serde_json::to_value(&board).unwrap();
        value["zobrist"] = serde_json::json!(12345);
        let restored: Board = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(restored.zobrist_key(), board.zobrist_key());

        value["files"] = serde_json::json!(9);
        assert!(serde_json::from_value::<Board>(value.clone()).is_err());

        // A piece outside a 5x5 play area is not carried over.
        value["files"] = serde_json::json!(5);
        value["ranks"] = serde_json::json!(5);
        let small: Board = serde_json::from_value(value).unwrap();
        assert_eq!(small.find_king(Player::Two), None);
        assert_eq!(small.find_king(Player::One), Some((4, 0)));
        assert_eq!(small.zobrist_key(), small.compute_zobrist());
    }
}
