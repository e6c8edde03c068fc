use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of distinct (piece type, owner) identities used for hashing.
pub const NUM_PIECE_INDICES: usize = 12;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    /// Player number as used in move logs and on the wire (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn index(self) -> usize {
        self.number() as usize - 1
    }

    /// Rank direction this player's pawns advance in.
    pub fn forward(self) -> i32 {
        match self {
            Player::One => 1,
            Player::Two => -1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
    ];

    pub fn token(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Rook => 'R',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    /// Parse a piece token, case-insensitively.
    pub fn from_token(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceType::Pawn),
            'R' => Some(PieceType::Rook),
            'N' => Some(PieceType::Knight),
            'B' => Some(PieceType::Bishop),
            'Q' => Some(PieceType::Queen),
            'K' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Material value in pawns. Both sides always have a king, so it counts for nothing.
    pub fn value(self) -> i32 {
        match self {
            PieceType::Pawn => 1,
            PieceType::Knight => 3,
            PieceType::Bishop => 3,
            PieceType::Rook => 5,
            PieceType::Queen => 9,
            PieceType::King => 0,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PieceType::Pawn => 0,
            PieceType::Rook => 1,
            PieceType::Knight => 2,
            PieceType::Bishop => 3,
            PieceType::Queen => 4,
            PieceType::King => 5,
        }
    }

    pub fn is_minor(self) -> bool {
        matches!(self, PieceType::Knight | PieceType::Bishop)
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Piece {
    pub piece_type: PieceType,
    pub owner: Player,
    pub value: i32,
    pub has_moved: bool,
    /// Identity used to key the position hash: piece type, offset by owner.
    pub index: usize,
}

impl Piece {
    pub fn new(piece_type: PieceType, owner: Player) -> Self {
        Piece {
            piece_type,
            owner,
            value: piece_type.value(),
            has_moved: false,
            index: piece_type.index() + 6 * owner.index(),
        }
    }

    /// The piece a pawn turns into on promotion. The result keeps the moved flag.
    pub fn promoted(self, piece_type: PieceType) -> Self {
        Piece {
            has_moved: self.has_moved,
            ..Piece::new(piece_type, self.owner)
        }
    }

    pub fn is(&self, piece_type: PieceType, owner: Player) -> bool {
        self.piece_type == piece_type && self.owner == owner
    }

    /// Display token: upper case for player 1, lower case for player 2.
    pub fn symbol(&self) -> char {
        match self.owner {
            Player::One => self.piece_type.token(),
            Player::Two => self.piece_type.token().to_ascii_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_indices_are_distinct_per_owner() {
        let mut seen = std::collections::HashSet::new();
        for owner in Player::BOTH {
            for pt in [
                PieceType::Pawn,
                PieceType::Rook,
                PieceType::Knight,
                PieceType::Bishop,
                PieceType::Queen,
                PieceType::King,
            ] {
                let idx = Piece::new(pt, owner).index;
                assert!(idx < NUM_PIECE_INDICES);
                assert!(seen.insert(idx), "duplicate index {idx}");
            }
        }
    }

    #[test]
    fn promotion_takes_new_value_and_keeps_owner() {
        let mut pawn = Piece::new(PieceType::Pawn, Player::Two);
        pawn.has_moved = true;
        let queen = pawn.promoted(PieceType::Queen);
        assert_eq!(queen.owner, Player::Two);
        assert_eq!(queen.value, 9);
        assert!(queen.has_moved);
        assert_eq!(queen.index, Piece::new(PieceType::Queen, Player::Two).index);
    }

    #[test]
    fn tokens_round_trip_case_insensitively() {
        assert_eq!(PieceType::from_token('n'), Some(PieceType::Knight));
        assert_eq!(PieceType::from_token('Q'), Some(PieceType::Queen));
        assert_eq!(PieceType::from_token('x'), None);
        assert_eq!(Piece::new(PieceType::Rook, Player::Two).symbol(), 'r');
    }
}
