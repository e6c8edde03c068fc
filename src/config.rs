// =============================================================================
// Configuration
//
// Rule switches live on the game; evaluation weights and search settings are
// defined next to the code that uses them (eval.rs, search.rs) and gathered
// here into one GameConfig that can be loaded from JSON.
// =============================================================================

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ChessResult;
use crate::eval::EvalConfig;
use crate::search::SearchConfig;
use crate::variant::ChessVariant;

/// Special-move switches. Each variant supplies its own defaults
/// (see [`ChessVariant::default_rules`]).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Rules {
    pub castling: bool,
    pub double_pawn_move: bool,
    pub en_passant: bool,
    /// Promote straight to a queen instead of consulting the promotion policy.
    pub auto_promote_to_queen: bool,
    /// Reject any king move that ends next to the opposing king. Not a rule of
    /// standard chess (there the move is illegal only because it walks into
    /// check), but the generator has always enforced it explicitly.
    pub forbid_adjacent_kings: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            castling: true,
            double_pawn_move: true,
            en_passant: true,
            auto_promote_to_queen: true,
            forbid_adjacent_kings: true,
        }
    }
}

impl Rules {
    /// Plain pawns-and-pieces rules: no castling, no double step, no en passant.
    pub fn minichess() -> Self {
        Rules {
            castling: false,
            double_pawn_move: false,
            en_passant: false,
            ..Rules::default()
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct GameConfig {
    pub variant: ChessVariant,
    /// Overrides the variant's default rules when present.
    pub rules: Option<Rules>,
    pub eval: EvalConfig,
    pub search: SearchConfig,
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> ChessResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ChessResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn rules(&self) -> Rules {
        self.rules.unwrap_or_else(|| self.variant.default_rules())
    }
}
