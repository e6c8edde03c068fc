use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChessError;

/// Reserved keyword that stands for a resignation wherever a move is expected.
pub const RESIGN: &str = "RESIGN";

/// A single ply. Coordinates are `(x, y)` pairs: x = file, y = rank, zero-based.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct Move {
    pub from: (usize, usize),
    pub to: (usize, usize),
    /// The move names a source square (board games like Connect Four don't).
    pub use_from: bool,
    /// The move names a rank as well as a file.
    pub use_y: bool,
    /// Look-ahead move used only to simulate legality; never recorded.
    pub test_move: bool,
    pub resignation: bool,
}

impl Move {
    pub fn new(from: (usize, usize), to: (usize, usize)) -> Move {
        Move {
            from,
            to,
            use_from: true,
            use_y: true,
            test_move: false,
            resignation: false,
        }
    }

    pub fn resign() -> Move {
        Move {
            resignation: true,
            ..Move::default()
        }
    }

    /// The same move flagged for simulation.
    pub fn as_test(self) -> Move {
        Move {
            test_move: true,
            ..self
        }
    }

    /// True if both moves land on the same square.
    pub fn same_to(&self, other: &Move) -> bool {
        self.to == other.to
    }

    pub fn announce_from(&self) -> String {
        square_name(self.from, self.use_y)
    }

    pub fn announce_to(&self) -> String {
        square_name(self.to, self.use_y)
    }

    /// Algebraic notation, e.g. "e2e4", or the resignation keyword.
    pub fn to_notation(&self) -> String {
        if self.resignation {
            return RESIGN.to_string();
        }
        if self.use_from {
            format!("{}{}", self.announce_from(), self.announce_to())
        } else {
            self.announce_to()
        }
    }

    /// Parse algebraic notation. A leading match against the resignation
    /// keyword (any case) short-circuits square parsing.
    pub fn parse(s: &str) -> Result<Move, ChessError> {
        let s = s.trim();
        if s.to_ascii_uppercase().starts_with(RESIGN) {
            return Ok(Move::resign());
        }

        let bytes = s.as_bytes();
        if bytes.len() != 4 {
            return Err(ChessError::InvalidNotation(s.to_string()));
        }
        let invalid = || ChessError::InvalidNotation(s.to_string());
        let from = parse_square(bytes[0], bytes[1]).ok_or_else(invalid)?;
        let to = parse_square(bytes[2], bytes[3]).ok_or_else(invalid)?;
        Ok(Move::new(from, to))
    }
}

fn square_name((x, y): (usize, usize), use_y: bool) -> String {
    let file = u8::try_from(x)
        .ok()
        .filter(|&x| x < 26)
        .map_or('?', |x| (b'a' + x) as char);
    if use_y {
        format!("{file}{}", y + 1)
    } else {
        file.to_string()
    }
}

fn parse_square(file: u8, rank: u8) -> Option<(usize, usize)> {
    let file = file.to_ascii_lowercase();
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some(((file - b'a') as usize, (rank - b'1') as usize))
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_notation())
    }
}

impl FromStr for Move {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse(s)
    }
}
