use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::Rules;
use crate::error::ChessError;
use crate::piece::PieceType::{self, *};
use crate::piece::{Piece, Player};

/// Board size and starting layout of each supported chess game.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub enum ChessVariant {
    #[default]
    Standard,
    /// 5x5 minichess.
    Gardner,
    /// 5x5 minichess with the two armies in point-symmetric order.
    JacobsMeirovitz,
    /// 6x6 chess without bishops.
    LosAlamos,
}

impl ChessVariant {
    pub const ALL: [ChessVariant; 4] = [
        ChessVariant::Standard,
        ChessVariant::Gardner,
        ChessVariant::JacobsMeirovitz,
        ChessVariant::LosAlamos,
    ];

    pub fn files(self) -> usize {
        self.back_rank(Player::One).len()
    }

    pub fn ranks(self) -> usize {
        match self {
            ChessVariant::Standard => 8,
            ChessVariant::Gardner | ChessVariant::JacobsMeirovitz => 5,
            ChessVariant::LosAlamos => 6,
        }
    }

    /// Name used on the command line and in move logs.
    pub fn name(self) -> &'static str {
        match self {
            ChessVariant::Standard => "chess",
            ChessVariant::Gardner => "chess-gardner",
            ChessVariant::JacobsMeirovitz => "chess-jacobs-meirovitz",
            ChessVariant::LosAlamos => "chess-los-alamos",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChessVariant::Standard => "Chess",
            ChessVariant::Gardner => "Chess (Gardner Minichess)",
            ChessVariant::JacobsMeirovitz => "Chess (Jacobs-Meirovitz Minichess)",
            ChessVariant::LosAlamos => "Chess (Los Alamos)",
        }
    }

    pub fn default_rules(self) -> Rules {
        match self {
            ChessVariant::Standard => Rules::default(),
            _ => Rules::minichess(),
        }
    }

    /// Pieces on `player`'s back rank, file a first.
    pub fn back_rank(self, player: Player) -> &'static [PieceType] {
        match (self, player) {
            (ChessVariant::Standard, _) => {
                &[Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook]
            }
            (ChessVariant::Gardner, _) => &[Rook, Knight, Bishop, Queen, King],
            (ChessVariant::JacobsMeirovitz, Player::One) => &[King, Queen, Rook, Knight, Bishop],
            (ChessVariant::JacobsMeirovitz, Player::Two) => &[Bishop, Knight, Rook, Queen, King],
            (ChessVariant::LosAlamos, _) => &[Rook, Knight, Queen, King, Knight, Rook],
        }
    }

    /// The starting position: back ranks on the outer ranks, a full row of
    /// pawns in front of each.
    pub fn setup(self) -> Board {
        let files = self.files();
        let ranks = self.ranks();
        let mut board = Board::blank(files, ranks);

        for player in Player::BOTH {
            let (back, pawns) = match player {
                Player::One => (0, 1),
                Player::Two => (ranks - 1, ranks - 2),
            };
            for (x, &pt) in self.back_rank(player).iter().enumerate() {
                board.place((x, back), Piece::new(pt, player));
            }
            for x in 0..files {
                board.place((x, pawns), Piece::new(Pawn, player));
            }
        }
        board
    }
}

impl fmt::Display for ChessVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChessVariant {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChessVariant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChessError::UnknownVariant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_sizes() {
        assert_eq!((ChessVariant::Standard.files(), ChessVariant::Standard.ranks()), (8, 8));
        assert_eq!((ChessVariant::Gardner.files(), ChessVariant::Gardner.ranks()), (5, 5));
        assert_eq!(
            (ChessVariant::JacobsMeirovitz.files(), ChessVariant::JacobsMeirovitz.ranks()),
            (5, 5)
        );
        assert_eq!((ChessVariant::LosAlamos.files(), ChessVariant::LosAlamos.ranks()), (6, 6));
    }

    #[test]
    fn every_setup_has_one_king_each_and_a_consistent_hash() {
        for variant in ChessVariant::ALL {
            let board = variant.setup();
            for player in Player::BOTH {
                let kings = board
                    .pieces_of(player)
                    .filter(|(_, p)| p.piece_type == King)
                    .count();
                assert_eq!(kings, 1, "{variant} player {player}");
                let pawns = board
                    .pieces_of(player)
                    .filter(|(_, p)| p.piece_type == Pawn)
                    .count();
                assert_eq!(pawns, variant.files());
            }
            assert_eq!(board.zobrist_key(), board.compute_zobrist());
        }
    }

    #[test]
    fn los_alamos_has_no_bishops() {
        let board = ChessVariant::LosAlamos.setup();
        assert!(board.pieces().all(|(_, p)| p.piece_type != Bishop));
        assert_eq!(board.find_king(Player::One), Some((3, 0)));
        assert_eq!(board.find_king(Player::Two), Some((3, 5)));
    }

    #[test]
    fn jacobs_meirovitz_kings_sit_in_opposite_corners() {
        let board = ChessVariant::JacobsMeirovitz.setup();
        assert_eq!(board.find_king(Player::One), Some((0, 0)));
        assert_eq!(board.find_king(Player::Two), Some((4, 4)));
    }

    #[test]
    fn parses_names() {
        assert_eq!("chess-gardner".parse::<ChessVariant>().unwrap(), ChessVariant::Gardner);
        assert_eq!("Chess".parse::<ChessVariant>().unwrap(), ChessVariant::Standard);
        assert!("checkers".parse::<ChessVariant>().is_err());
        assert!(!ChessVariant::LosAlamos.default_rules().castling);
        assert!(ChessVariant::Standard.default_rules().en_passant);
    }
}
