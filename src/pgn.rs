//! PGN-style move log.
//!
//! A log is a block of `[Tag "value"]` lines, a blank line, then the moves in
//! coordinate notation with move numbers, closed by the result token:
//!
//! ```text
//! [Event "GameAI Chess"]
//! [Result "*"]
//!
//! 1. e2e4 e7e5 2. g1f3 *
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{ChessError, ChessResult};
use crate::game::{Game, WinBy};
use crate::moves::Move;
use crate::piece::Player;

pub const PROGRAM_NAME: &str = "GameAI";

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Longest move-text line before wrapping.
const LINE_WIDTH: usize = 79;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerInfo {
    pub name: String,
    /// "human" or "program".
    pub kind: String,
}

impl PlayerInfo {
    pub fn program(name: &str) -> Self {
        PlayerInfo {
            name: name.to_string(),
            kind: "program".to_string(),
        }
    }

    pub fn human(name: &str) -> Self {
        PlayerInfo {
            name: name.to_string(),
            kind: "human".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameRecord {
    pub tags: Vec<(String, String)>,
    pub moves: Vec<Move>,
}

/// PGN result for a game's current state: "*" while undecided.
pub fn result_token(winner: Option<Player>, win_by: WinBy) -> &'static str {
    match (winner, win_by) {
        (_, WinBy::Nothing) => "*",
        (Some(Player::One), _) => "1-0",
        (Some(Player::Two), _) => "0-1",
        (None, _) => "1/2-1/2",
    }
}

impl GameRecord {
    /// Log of `game` so far. Date and time are unknown until set with
    /// [`GameRecord::set_tag`].
    pub fn from_game(game: &dyn Game, white: &PlayerInfo, black: &PlayerInfo) -> Self {
        let mut record = GameRecord::default();
        record.set_tag("Event", &format!("{PROGRAM_NAME} {}", game.title()));
        record.set_tag("Site", "??, ??, ??");
        record.set_tag("Date", "????.??.??");
        record.set_tag("Round", "1");
        record.set_tag("White", &white.name);
        record.set_tag("Black", &black.name);
        record.set_tag("Result", result_token(game.winner(), game.win_by()));
        record.set_tag("Time", "??:??:??");
        record.set_tag("WhiteType", &white.kind);
        record.set_tag("BlackType", &black.kind);
        record.moves = game.history().to_vec();
        record
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a tag, keeping its position if it is already present.
    pub fn set_tag(&mut self, name: &str, value: &str) {
        match self.tags.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.tags.push((name.to_string(), value.to_string())),
        }
    }

    pub fn to_pgn(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.tags {
            let _ = writeln!(out, "[{name} \"{value}\"]");
        }
        out.push('\n');

        let mut tokens: Vec<String> = Vec::new();
        for (i, mv) in self.moves.iter().enumerate() {
            if i % 2 == 0 {
                tokens.push(format!("{}.", i / 2 + 1));
            }
            tokens.push(mv.to_notation());
        }
        tokens.push(self.tag("Result").unwrap_or("*").to_string());

        let mut line = String::new();
        for token in tokens {
            if !line.is_empty() && line.len() + 1 + token.len() > LINE_WIDTH {
                out.push_str(&line);
                out.push('\n');
                line.clear();
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&token);
        }
        out.push_str(&line);
        out.push('\n');
        out
    }

    /// Read a log. Tag lines start with `[`; move numbers and the result
    /// token in the move text are skipped.
    pub fn parse(text: &str) -> ChessResult<Self> {
        let mut record = GameRecord::default();
        for line in text.lines().map(str::trim) {
            if line.starts_with('[') {
                let (name, value) = parse_tag(line)?;
                record.tags.push((name, value));
                continue;
            }
            for token in line.split_whitespace() {
                if is_move_number(token) || RESULT_TOKENS.contains(&token) {
                    continue;
                }
                record.moves.push(Move::parse(token)?);
            }
        }
        Ok(record)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ChessResult<()> {
        fs::write(path.as_ref(), self.to_pgn())?;
        info!(path = %path.as_ref().display(), moves = self.moves.len(), "wrote move log");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> ChessResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Apply the logged moves to `game`, player one first. Returns the
    /// player whose turn is next.
    pub fn replay(&self, game: &mut dyn Game) -> ChessResult<Player> {
        let mut player = Player::One;
        for mv in &self.moves {
            if !game.apply_move(player, *mv) {
                return Err(ChessError::IllegalMove {
                    mv: mv.to_notation(),
                    player: player.number(),
                });
            }
            player = player.opponent();
        }
        Ok(player)
    }
}

fn parse_tag(line: &str) -> ChessResult<(String, String)> {
    let malformed = || ChessError::MalformedTag(line.to_string());
    let inner = line
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .ok_or_else(malformed)?;
    let (name, value) = inner.split_once(' ').ok_or_else(malformed)?;
    let value = value
        .trim()
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(malformed)?;
    Ok((name.to_string(), value.to_string()))
}

fn is_move_number(token: &str) -> bool {
    let digits = token.trim_end_matches('.');
    digits.len() < token.len() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
