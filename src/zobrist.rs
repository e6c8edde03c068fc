//! Zobrist keys for position hashing.
//!
//! Every (piece identity, square) pair has a fixed random key. A position's
//! hash is the XOR of the keys of all pieces on the board, so the board keeps
//! it up to date by toggling one key per placement or removal.

use crate::board::{MAX_FILES, MAX_RANKS};
use crate::piece::{Piece, NUM_PIECE_INDICES};

pub type ZobristKey = u64;

const NUM_SQUARES: usize = MAX_FILES * MAX_RANKS;

static PIECE_SQUARE_KEYS: [[ZobristKey; NUM_SQUARES]; NUM_PIECE_INDICES] = {
    const fn splitmix64(mut x: u64) -> u64 {
        x = x.wrapping_add(0x9e3779b97f4a7c15);
        x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
        x ^ (x >> 31)
    }

    let mut keys = [[0u64; NUM_SQUARES]; NUM_PIECE_INDICES];
    let mut seed = 0x2014_0d0a_a1c0_ffeeu64;

    let mut i = 0;
    while i < NUM_PIECE_INDICES {
        let mut sq = 0;
        while sq < NUM_SQUARES {
            seed = splitmix64(seed);
            keys[i][sq] = seed;
            sq += 1;
        }
        i += 1;
    }
    keys
};

/// Key contributed by `piece` standing on (x, y).
#[inline]
pub fn piece_square_key(piece: &Piece, x: usize, y: usize) -> ZobristKey {
    PIECE_SQUARE_KEYS[piece.index][y * MAX_FILES + x]
}
