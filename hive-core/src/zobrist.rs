//! Zobrist hashing
//!
//! The key table is generated once per process from a fixed seed, so hashes
//! are reproducible across runs.

use std::sync::OnceLock;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::pieces::{PieceName, NUM_PIECES};
use crate::position::{Position, MAX_COORDINATE};

/// Seed for the key table
const ZOBRIST_SEED: u64 = 0x48_49_56_45;

/// Cells with `|x| <= RADIUS` and `|z| <= RADIUS` get a table entry
const ZOBRIST_RADIUS: i32 = 24;

const GRID_WIDTH: usize = (2 * ZOBRIST_RADIUS + 1) as usize;

/// Highest stack level + 1 (four beetles can climb onto one cell)
pub const MAX_STACK: usize = 5;

const KEYS_PER_PIECE: usize = GRID_WIDTH * GRID_WIDTH * MAX_STACK;

/// Width of one offset coordinate in an off-table key; holds
/// `0..=2 * MAX_COORDINATE`
const COORDINATE_BITS: u32 = 22;

struct ZobristKeys {
    pieces: Vec<u64>,
    turn: u64,
    /// Mixed into off-table positions
    overflow: u64,
}

fn keys() -> &'static ZobristKeys {
    static KEYS: OnceLock<ZobristKeys> = OnceLock::new();
    KEYS.get_or_init(|| {
        let mut rng = ChaCha8Rng::seed_from_u64(ZOBRIST_SEED);
        let pieces = (0..NUM_PIECES * KEYS_PER_PIECE).map(|_| rng.next_u64()).collect();
        ZobristKeys {
            pieces,
            turn: rng.next_u64(),
            overflow: rng.next_u64(),
        }
    })
}

/// Table slot for a position, or `None` when it lies outside the table
fn table_index(position: Position) -> Option<usize> {
    let (x, z) = (position.x + ZOBRIST_RADIUS, position.z + ZOBRIST_RADIUS);
    let in_range = |c: i32| (0..GRID_WIDTH as i32).contains(&c);
    if !in_range(x) || !in_range(z) || position.stack as usize >= MAX_STACK {
        return None;
    }
    Some((x as usize * GRID_WIDTH + z as usize) * MAX_STACK + position.stack as usize)
}

/// SplitMix64 finaliser
fn mix(mut value: u64) -> u64 {
    value = (value ^ (value >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    value = (value ^ (value >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    value ^ (value >> 31)
}

/// Key for `piece` standing on `position`
pub fn piece_key(piece: PieceName, position: Position) -> u64 {
    let keys = keys();
    match table_index(position) {
        Some(index) => keys.pieces[piece.index() * KEYS_PER_PIECE + index],
        None => {
            // x, z, stack and piece occupy disjoint bit ranges and `mix` is a
            // bijection, so distinct off-table placements never share a key
            let offset = |c: i32| {
                (c as i64 + MAX_COORDINATE as i64) as u64 & ((1 << COORDINATE_BITS) - 1)
            };
            let packed = offset(position.x)
                | offset(position.z) << COORDINATE_BITS
                | (position.stack as u64) << (2 * COORDINATE_BITS)
                | (piece.index() as u64) << (2 * COORDINATE_BITS + 8);
            mix(packed ^ keys.overflow)
        }
    }
}

pub fn turn_key() -> u64 {
    keys().turn
}

/// Incrementally maintained board fingerprint
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ZobristHash {
    value: u64,
}

impl ZobristHash {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Called once when `piece` enters `position` and once when it leaves
    #[inline]
    pub fn toggle_piece(&mut self, piece: PieceName, position: Position) {
        self.value ^= piece_key(piece, position);
    }

    /// Called once per turn change
    #[inline]
    pub fn toggle_turn(&mut self) {
        self.value ^= turn_key();
    }
}
