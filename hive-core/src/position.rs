//! Hex geometry with cube coordinates and stack levels

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HiveError;

/// Cube offsets for each direction, indexed by `Direction as usize`
const DIRECTION_DELTAS: [(i32, i32, i32); 6] = [
    (0, 1, -1),  // Up
    (1, 0, -1),  // UpRight
    (1, -1, 0),  // DownRight
    (0, -1, 1),  // Down
    (-1, 0, 1),  // DownLeft
    (-1, 1, 0),  // UpLeft
];

/// One of the six neighbour directions, clockwise from `Up`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Up = 0,
    UpRight = 1,
    DownRight = 2,
    Down = 3,
    DownLeft = 4,
    UpLeft = 5,
}

impl Direction {
    /// All directions in clockwise order
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::UpRight,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::UpLeft,
    ];

    pub const fn from_index(index: usize) -> Direction {
        Self::ALL[index % 6]
    }

    /// Counter-clockwise neighbour direction (d - 1 mod 6)
    pub const fn left_of(self) -> Direction {
        Self::from_index(self as usize + 5)
    }

    /// Clockwise neighbour direction (d + 1 mod 6)
    pub const fn right_of(self) -> Direction {
        Self::from_index(self as usize + 1)
    }

    pub const fn opposite(self) -> Direction {
        Self::from_index(self as usize + 3)
    }
}

/// Largest coordinate magnitude a position may have.
///
/// A hive of 22 pieces never strays this far, and the headroom keeps
/// neighbour and distance arithmetic clear of `i32` overflow.
pub const MAX_COORDINATE: i32 = 1 << 20;

/// A cell on the hex grid plus a stack level.
///
/// Invariant: `x + y + z == 0` and every coordinate lies within
/// `MAX_COORDINATE`. Stack 0 is the ground plane; only beetles ever occupy
/// higher levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub stack: u8,
}

impl Position {
    /// The origin cell, where the first piece is always placed
    pub const ORIGIN: Position = Position { x: 0, y: 0, z: 0, stack: 0 };

    /// Create a ground-level position. Returns `None` when `x + y + z != 0`
    /// or a coordinate is out of range.
    pub fn new(x: i32, y: i32, z: i32) -> Option<Self> {
        Self::with_stack(x, y, z, 0)
    }

    pub fn with_stack(x: i32, y: i32, z: i32, stack: u8) -> Option<Self> {
        let range = -MAX_COORDINATE..=MAX_COORDINATE;
        let in_range = [x, y, z].iter().all(|c| range.contains(c));
        (in_range && x + y + z == 0).then_some(Self { x, y, z, stack })
    }

    /// Neighbour in `direction`, always on the ground plane
    pub fn neighbour(&self, direction: Direction) -> Position {
        let (dx, dy, dz) = DIRECTION_DELTAS[direction as usize];
        Position {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
            stack: 0,
        }
    }

    /// All six ground-level neighbours, clockwise from `Up`
    pub fn neighbours(&self) -> [Position; 6] {
        Direction::ALL.map(|d| self.neighbour(d))
    }

    pub fn above(&self) -> Position {
        Position { stack: self.stack + 1, ..*self }
    }

    /// Position one level lower, or `None` on the ground plane
    pub fn below(&self) -> Option<Position> {
        self.stack.checked_sub(1).map(|stack| Position { stack, ..*self })
    }

    /// Same cell on the ground plane
    pub fn ground(&self) -> Position {
        Position { stack: 0, ..*self }
    }

    /// Same cell at an arbitrary level
    pub fn at_stack(&self, stack: u8) -> Position {
        Position { stack, ..*self }
    }

    /// Whether both positions share a cell, ignoring the stack level
    pub fn same_cell(&self, other: &Position) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }

    /// Whether `other` is one of the six neighbouring cells (stack ignored)
    pub fn is_neighbour(&self, other: &Position) -> bool {
        self.direction_to(other).is_some()
    }

    /// Direction of an adjacent cell, if `other` is adjacent
    pub fn direction_to(&self, other: &Position) -> Option<Direction> {
        let delta = (other.x - self.x, other.y - self.y, other.z - self.z);
        DIRECTION_DELTAS
            .iter()
            .position(|&d| d == delta)
            .map(Direction::from_index)
    }

    /// Hex distance between the two cells
    pub fn distance_to(&self, other: &Position) -> i32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()) / 2
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stack > 0 {
            write!(f, "{},{},{},{}", self.x, self.y, self.z, self.stack)
        } else {
            write!(f, "{},{},{}", self.x, self.y, self.z)
        }
    }
}

impl FromStr for Position {
    type Err = HiveError;

    /// Parses `x,y,z` or `x,y,z,stack`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HiveError::InvalidInput(format!("Unable to parse position \"{s}\""));

        let parts: Vec<&str> = s.trim().split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(invalid());
        }

        let coord = |i: usize| parts[i].parse::<i32>().map_err(|_| invalid());
        let (x, y, z) = (coord(0)?, coord(1)?, coord(2)?);
        let stack = match parts.get(3) {
            Some(level) => level.parse::<u8>().map_err(|_| invalid())?,
            None => 0,
        };

        Position::with_stack(x, y, z, stack).ok_or_else(invalid)
    }
}
