//! Line-based command exchange with a networked opponent.
//!
//! Each command is one line: `MOVE e2e4`, `CONFIRM`, `UNCONFIRM`,
//! `DECLARE_WIN` or `FATAL_EXIT`. The side that sends a move waits for a
//! `CONFIRM`; the side that receives one applies it and confirms, or answers
//! `UNCONFIRM` if it is illegal. Any protocol failure, an illegal move
//! included, is reported to the peer with `FATAL_EXIT` before the error is
//! returned.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use tracing::{debug, info};

use crate::error::{ChessError, ChessResult};
use crate::game::Game;
use crate::moves::Move;
use crate::piece::Player;

pub const MOVE: &str = "MOVE";
pub const CONFIRM: &str = "CONFIRM";
pub const UNCONFIRM: &str = "UNCONFIRM";
pub const DECLARE_WIN: &str = "DECLARE_WIN";
pub const FATAL_EXIT: &str = "FATAL_EXIT";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Move),
    Confirm,
    Unconfirm,
    DeclareWin,
    FatalExit,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move(mv) => write!(f, "{MOVE} {mv}"),
            Command::Confirm => f.write_str(CONFIRM),
            Command::Unconfirm => f.write_str(UNCONFIRM),
            Command::DeclareWin => f.write_str(DECLARE_WIN),
            Command::FatalExit => f.write_str(FATAL_EXIT),
        }
    }
}

impl FromStr for Command {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let unexpected = || ChessError::UnexpectedCommand {
            expected: "a command".to_string(),
            received: s.trim().to_string(),
        };
        let keyword = tokens.next().ok_or_else(unexpected)?.to_ascii_uppercase();

        let command = match keyword.as_str() {
            MOVE => Command::Move(tokens.next().ok_or_else(unexpected)?.parse()?),
            CONFIRM => Command::Confirm,
            UNCONFIRM => Command::Unconfirm,
            DECLARE_WIN => Command::DeclareWin,
            FATAL_EXIT => Command::FatalExit,
            _ => return Err(unexpected()),
        };
        Ok(command)
    }
}

/// What arrived when waiting for the opponent's move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Received {
    /// A legal move, already applied and confirmed.
    Move(Move),
    /// The opponent declared the game won; no move follows.
    DeclareWin,
}

/// One end of a command exchange over any line-oriented reader and writer,
/// e.g. the two halves of a TCP stream.
pub struct Connection<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Connection<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Connection { reader, writer }
    }

    pub fn send(&mut self, command: &Command) -> ChessResult<()> {
        debug!(%command, "send");
        writeln!(self.writer, "{command}")?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn recv(&mut self) -> ChessResult<Command> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed").into());
        }
        let command: Command = line.parse()?;
        debug!(%command, "recv");
        Ok(command)
    }

    /// Send our move and wait for the opponent to confirm it.
    pub fn send_move(&mut self, mv: Move) -> ChessResult<()> {
        info!(%mv, "sending move to opponent");
        self.send(&Command::Move(mv))?;
        let result = match self.recv() {
            Ok(Command::Confirm) => return Ok(()),
            Ok(Command::Unconfirm) => Err(ChessError::Unconfirmed(Command::Move(mv).to_string())),
            Ok(other) => Err(ChessError::UnexpectedCommand {
                expected: CONFIRM.to_string(),
                received: other.to_string(),
            }),
            Err(e) => Err(e),
        };
        self.abort();
        result
    }

    /// Wait for the opponent's move and apply it to `game` as `player`.
    /// A legal move is confirmed, followed by `DECLARE_WIN` if it ended the
    /// game; an illegal one is answered with `UNCONFIRM` and `FATAL_EXIT`.
    pub fn receive_move(&mut self, game: &mut dyn Game, player: Player) -> ChessResult<Received> {
        info!("waiting for opponent's move");
        match self.recv() {
            Ok(Command::Move(mv)) => {
                if !game.apply_move(player, mv) {
                    self.send(&Command::Unconfirm)?;
                    self.abort();
                    return Err(ChessError::IllegalMove {
                        mv: mv.to_notation(),
                        player: player.number(),
                    });
                }
                self.send(&Command::Confirm)?;
                if game.game_ended(player.opponent()) {
                    self.send(&Command::DeclareWin)?;
                }
                Ok(Received::Move(mv))
            }
            Ok(Command::DeclareWin) => Ok(Received::DeclareWin),
            Ok(Command::FatalExit) => Err(ChessError::OpponentFatal),
            Ok(other) => {
                self.abort();
                Err(ChessError::UnexpectedCommand {
                    expected: MOVE.to_string(),
                    received: other.to_string(),
                })
            }
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }

    /// Tell the peer we are giving up. Failure to send is ignored: the
    /// connection is already in trouble.
    fn abort(&mut self) {
        let _ = self.send(&Command::FatalExit);
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
