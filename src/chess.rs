// =============================================================================
// Chess game state
//
// ChessGame owns the board, the move history and the repetition table. Moves
// are generated in movegen.rs and checked for legality in check.rs by applying
// them to a throwaway snapshot of the game; this file holds the applier that
// mutates the real state and the game-end detector.
//
// Coordinate system: x = file (0 = a), y = rank (0 = rank 1). Player one
// starts on rank 1 and pushes pawns toward higher ranks.
// =============================================================================

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::board::Board;
use crate::config::{GameConfig, Rules};
use crate::eval::EvalConfig;
use crate::game::{Game, WinBy};
use crate::movegen::Generation;
use crate::moves::Move;
use crate::piece::{PieceType, Player};
use crate::promotion::{self, AutoQueen, SharedPromotionPolicy};
use crate::variant::ChessVariant;
use crate::zobrist::ZobristKey;

/// Occurrences of one position that end the game in a draw.
pub const MAX_REPETITION: u32 = 3;

#[derive(Clone, Debug)]
pub struct ChessGame {
    variant: Option<ChessVariant>,
    pub(crate) rules: Rules,
    pub(crate) eval: EvalConfig,
    pub(crate) board: Board,
    pub(crate) history: Vec<Move>,
    repetitions: HashMap<ZobristKey, u32>,
    pub(crate) castling_allowed: [bool; 2],
    pub(crate) king_castled: [bool; 2],
    winner: Option<Player>,
    win_by: WinBy,
    number_of_moves: usize,
    promotion: SharedPromotionPolicy,
}

impl ChessGame {
    /// A new game of `variant` with that variant's rules and default weights.
    pub fn new(variant: ChessVariant) -> Self {
        Self::with_config(&GameConfig {
            variant,
            ..GameConfig::default()
        })
    }

    pub fn with_config(config: &GameConfig) -> Self {
        let mut game = Self::from_board(config.variant.setup(), config.rules());
        game.variant = Some(config.variant);
        game.eval = config.eval;
        game
    }

    /// A game starting from an arbitrary position, e.g. a test setup. Both
    /// players must have a king on the board.
    pub fn from_board(board: Board, rules: Rules) -> Self {
        ChessGame {
            variant: None,
            rules,
            eval: EvalConfig::default(),
            board,
            history: Vec::new(),
            repetitions: HashMap::new(),
            castling_allowed: [rules.castling; 2],
            king_castled: [false; 2],
            winner: None,
            win_by: WinBy::Nothing,
            number_of_moves: 0,
            promotion: promotion::shared(AutoQueen),
        }
    }

    /// Replace the source of promotion choices. Only consulted when
    /// automatic queening is off.
    pub fn with_promotion_policy(mut self, policy: SharedPromotionPolicy) -> Self {
        self.promotion = policy;
        self
    }

    pub fn set_eval_config(&mut self, eval: EvalConfig) {
        self.eval = eval;
    }

    pub fn eval_config(&self) -> &EvalConfig {
        &self.eval
    }

    pub fn variant(&self) -> Option<ChessVariant> {
        self.variant
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn win_by(&self) -> WinBy {
        self.win_by
    }

    pub fn number_of_moves(&self) -> usize {
        self.number_of_moves
    }

    pub fn castling_allowed(&self, player: Player) -> bool {
        self.castling_allowed[player.index()]
    }

    pub fn king_castled(&self, player: Player) -> bool {
        self.king_castled[player.index()]
    }

    /// How many times the position with hash `key` has arisen after a move.
    pub fn repetition_count(&self, key: ZobristKey) -> u32 {
        self.repetitions.get(&key).copied().unwrap_or(0)
    }

    pub fn title(&self) -> String {
        self.variant
            .map(|v| v.title().to_string())
            .unwrap_or_else(|| "Chess".to_string())
    }

    /// One line per rule that differs between chess variants.
    pub fn description(&self) -> String {
        let switch = |on: bool| if on { "enabled" } else { "disabled" };
        format!(
            "{}\nBoard: {}x{}\nCastling: {}\nDouble pawn move: {}\nEn passant: {}\n\
             Automatic queen promotion: {}\nAdjacent kings forbidden: {}",
            self.title(),
            self.board.files(),
            self.board.ranks(),
            switch(self.rules.castling),
            switch(self.rules.double_pawn_move),
            switch(self.rules.en_passant),
            switch(self.rules.auto_promote_to_queen),
            switch(self.rules.forbid_adjacent_kings),
        )
    }

    /// Copy of the game for trying out a single move: same position, flags
    /// and last move, but no repetition table and no earlier history.
    pub(crate) fn snapshot(&self) -> ChessGame {
        ChessGame {
            variant: self.variant,
            rules: self.rules,
            eval: self.eval,
            board: self.board.clone(),
            history: self.history.last().copied().into_iter().collect(),
            repetitions: HashMap::new(),
            castling_allowed: self.castling_allowed,
            king_castled: self.king_castled,
            winner: None,
            win_by: WinBy::Nothing,
            number_of_moves: self.number_of_moves,
            promotion: Arc::clone(&self.promotion),
        }
    }

    // =========================================================================
    // Move application
    // =========================================================================

    /// Apply `mv` for `player`. The move must match the destination of one of
    /// the moves generated for the piece on its source square; anything else
    /// is rejected and leaves the game unchanged.
    ///
    /// Test moves are checked against pseudo-legal moves only, then rejected
    /// if they leave the mover in check. They are never recorded.
    pub fn apply_move(&mut self, player: Player, mv: Move) -> bool {
        if mv.resignation {
            debug!(player = player.number(), "resigned");
            self.history.push(mv);
            return true;
        }

        if !self.board.contains(mv.from) || !self.board.contains(mv.to) {
            return false;
        }

        let mode = if mv.test_move {
            Generation::Pseudo
        } else {
            Generation::Legal
        };
        let candidates = self.moves_for_piece(player, mv.from, mode);
        if !candidates.iter().any(|c| c.same_to(&mv)) {
            if !mv.test_move {
                debug!(%mv, player = player.number(), "rejected move");
            }
            return false;
        }
        let Some(piece) = self.board.piece_at(mv.from) else {
            return false;
        };

        let saved = self.board.clone();

        // Captures, including the pawn taken en passant beside the mover.
        if self.board.remove(mv.to).is_none()
            && piece.piece_type == PieceType::Pawn
            && mv.from.0 != mv.to.0
        {
            self.board.remove((mv.to.0, mv.from.1));
        }
        self.board.relocate(mv.from, mv.to);

        let castled = piece.piece_type == PieceType::King && mv.from.0.abs_diff(mv.to.0) > 1;
        if castled {
            self.move_castling_rook(player, mv);
        }

        if self.king_in_check(player) {
            self.board = saved;
            return false;
        }

        if piece.piece_type == PieceType::Pawn && mv.to.1 == self.last_rank(player) {
            self.promote(player, mv);
        }

        if castled {
            self.castling_allowed[player.index()] = false;
            self.king_castled[player.index()] = true;
        }

        if !mv.test_move {
            self.number_of_moves += 1;
            self.history.push(mv);
            *self.repetitions.entry(self.board.zobrist_key()).or_insert(0) += 1;
            debug!(
                number = self.number_of_moves,
                player = player.number(),
                %mv,
                zkey = self.board.zobrist_key(),
                "applied move"
            );
        }

        true
    }

    /// Rank on which `player`'s pawns promote.
    pub fn last_rank(&self, player: Player) -> usize {
        match player {
            Player::One => self.board.ranks() - 1,
            Player::Two => 0,
        }
    }

    /// Second half of a castle: the rook beyond the king's destination jumps
    /// to the square the king crossed.
    fn move_castling_rook(&mut self, player: Player, king_move: Move) {
        let (from_x, y) = king_move.from;
        let to_x = king_move.to.0;
        let is_rook = |x: &usize| {
            self.board
                .piece_at((*x, y))
                .map_or(false, |p| p.is(PieceType::Rook, player))
        };
        let rook_x = if to_x < from_x {
            (0..to_x).rev().find(is_rook)
        } else {
            (to_x + 1..self.board.files()).find(is_rook)
        };

        match rook_x {
            Some(rook_x) => {
                self.board.relocate((rook_x, y), ((from_x + to_x) / 2, y));
            }
            None => warn!(%king_move, "no rook found for castling"),
        }
    }

    fn promote(&mut self, player: Player, mv: Move) {
        let choice = if self.rules.auto_promote_to_queen || mv.test_move {
            PieceType::Queen
        } else {
            promotion::resolve(&self.promotion, player, mv.to)
        };
        if let Some(pawn) = self.board.piece_at(mv.to) {
            self.board.place(mv.to, pawn.promoted(choice));
            debug!(square = %mv.announce_to(), piece = %choice.token(), "promoted pawn");
        }
    }

    // =========================================================================
    // Game end
    // =========================================================================

    /// Decide whether the game is over with `player` to move, recording the
    /// winner and the reason. Checked in order: a resignation on the last
    /// move, threefold repetition, then checkmate or stalemate.
    pub fn game_ended(&mut self, player: Player) -> bool {
        self.winner = None;
        self.win_by = WinBy::Nothing;

        if self.last_move().map_or(false, |m| m.resignation) {
            self.winner = Some(player);
            self.win_by = WinBy::Resignation;
        } else if self.repetition_count(self.board.zobrist_key()) >= MAX_REPETITION {
            self.win_by = WinBy::ThreefoldRepetition;
        } else if self.generate_moves(player).is_empty() {
            if self.king_in_check(player) {
                self.winner = Some(player.opponent());
                self.win_by = WinBy::Checkmate;
            } else {
                self.win_by = WinBy::Stalemate;
            }
        } else {
            return false;
        }

        debug!(
            winner = self.winner.map_or(0, Player::number),
            reason = %self.win_by,
            "game ended"
        );
        true
    }
}

impl fmt::Display for ChessGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

impl Game for ChessGame {
    fn generate_moves(&self, player: Player) -> Vec<Move> {
        ChessGame::generate_moves(self, player)
    }

    fn apply_move(&mut self, player: Player, mv: Move) -> bool {
        ChessGame::apply_move(self, player, mv)
    }

    fn game_ended(&mut self, player: Player) -> bool {
        ChessGame::game_ended(self, player)
    }

    fn evaluate_game_state(&self, player: Player) -> i32 {
        ChessGame::evaluate_game_state(self, player)
    }

    fn winner(&self) -> Option<Player> {
        self.winner
    }

    fn win_by(&self) -> WinBy {
        self.win_by
    }

    fn number_of_moves(&self) -> usize {
        self.number_of_moves
    }

    fn history(&self) -> &[Move] {
        &self.history
    }

    fn title(&self) -> String {
        ChessGame::title(self)
    }

    fn clone_game(&self) -> Box<dyn Game> {
        Box::new(self.clone())
    }
}
