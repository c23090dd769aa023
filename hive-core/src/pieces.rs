//! Piece registry: the closed set of 22 pieces, their colours and bug types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HiveError;

/// Number of pieces in a game
pub const NUM_PIECES: usize = 22;

/// Pieces per colour; slot `i + PIECES_PER_COLOR` is the black analogue of slot `i`
pub const PIECES_PER_COLOR: usize = 11;

/// Player colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Score sign: White maximises, Black minimises
    pub fn sign(self) -> f64 {
        match self {
            Color::White => 1.0,
            Color::Black => -1.0,
        }
    }

    pub fn queen(self) -> PieceName {
        match self {
            Color::White => PieceName::WhiteQueenBee,
            Color::Black => PieceName::BlackQueenBee,
        }
    }

    /// Iterator over this colour's 11 pieces in registry order
    pub fn pieces(self) -> impl Iterator<Item = PieceName> {
        let start = self as usize * PIECES_PER_COLOR;
        PieceName::ALL[start..start + PIECES_PER_COLOR].iter().copied()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

impl FromStr for Color {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("white") => Ok(Color::White),
            s if s.eq_ignore_ascii_case("black") => Ok(Color::Black),
            _ => Err(HiveError::InvalidInput(format!("Unknown colour \"{s}\""))),
        }
    }
}

/// Bug type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BugType {
    QueenBee = 0,
    Spider = 1,
    Beetle = 2,
    Grasshopper = 3,
    SoldierAnt = 4,
}

impl BugType {
    pub const COUNT: usize = 5;

    pub const ALL: [BugType; BugType::COUNT] = [
        BugType::QueenBee,
        BugType::Spider,
        BugType::Beetle,
        BugType::Grasshopper,
        BugType::SoldierAnt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BugType::QueenBee => "QueenBee",
            BugType::Spider => "Spider",
            BugType::Beetle => "Beetle",
            BugType::Grasshopper => "Grasshopper",
            BugType::SoldierAnt => "SoldierAnt",
        }
    }

    pub fn from_name(name: &str) -> Option<BugType> {
        Self::ALL.into_iter().find(|bug| bug.name() == name)
    }
}

/// Static attributes of one piece
#[derive(Clone, Debug)]
pub struct PieceInfo {
    pub short_name: &'static str,
    pub color: Color,
    pub bug_type: BugType,
    /// 1-based index among same-colour pieces of the same bug type
    pub number: u8,
}

impl PieceInfo {
    const fn new(short_name: &'static str, color: Color, bug_type: BugType, number: u8) -> Self {
        Self {
            short_name,
            color,
            bug_type,
            number,
        }
    }
}

/// One entry per `PieceName`, in index order
static PIECE_INFO: [PieceInfo; NUM_PIECES] = [
    PieceInfo::new("WQ", Color::White, BugType::QueenBee, 1),
    PieceInfo::new("WS1", Color::White, BugType::Spider, 1),
    PieceInfo::new("WS2", Color::White, BugType::Spider, 2),
    PieceInfo::new("WB1", Color::White, BugType::Beetle, 1),
    PieceInfo::new("WB2", Color::White, BugType::Beetle, 2),
    PieceInfo::new("WG1", Color::White, BugType::Grasshopper, 1),
    PieceInfo::new("WG2", Color::White, BugType::Grasshopper, 2),
    PieceInfo::new("WG3", Color::White, BugType::Grasshopper, 3),
    PieceInfo::new("WA1", Color::White, BugType::SoldierAnt, 1),
    PieceInfo::new("WA2", Color::White, BugType::SoldierAnt, 2),
    PieceInfo::new("WA3", Color::White, BugType::SoldierAnt, 3),
    PieceInfo::new("BQ", Color::Black, BugType::QueenBee, 1),
    PieceInfo::new("BS1", Color::Black, BugType::Spider, 1),
    PieceInfo::new("BS2", Color::Black, BugType::Spider, 2),
    PieceInfo::new("BB1", Color::Black, BugType::Beetle, 1),
    PieceInfo::new("BB2", Color::Black, BugType::Beetle, 2),
    PieceInfo::new("BG1", Color::Black, BugType::Grasshopper, 1),
    PieceInfo::new("BG2", Color::Black, BugType::Grasshopper, 2),
    PieceInfo::new("BG3", Color::Black, BugType::Grasshopper, 3),
    PieceInfo::new("BA1", Color::Black, BugType::SoldierAnt, 1),
    PieceInfo::new("BA2", Color::Black, BugType::SoldierAnt, 2),
    PieceInfo::new("BA3", Color::Black, BugType::SoldierAnt, 3),
];

/// Stable identity of each of the 22 pieces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceName {
    WhiteQueenBee = 0,
    WhiteSpider1,
    WhiteSpider2,
    WhiteBeetle1,
    WhiteBeetle2,
    WhiteGrasshopper1,
    WhiteGrasshopper2,
    WhiteGrasshopper3,
    WhiteSoldierAnt1,
    WhiteSoldierAnt2,
    WhiteSoldierAnt3,
    BlackQueenBee,
    BlackSpider1,
    BlackSpider2,
    BlackBeetle1,
    BlackBeetle2,
    BlackGrasshopper1,
    BlackGrasshopper2,
    BlackGrasshopper3,
    BlackSoldierAnt1,
    BlackSoldierAnt2,
    BlackSoldierAnt3,
}

impl PieceName {
    pub const ALL: [PieceName; NUM_PIECES] = [
        PieceName::WhiteQueenBee,
        PieceName::WhiteSpider1,
        PieceName::WhiteSpider2,
        PieceName::WhiteBeetle1,
        PieceName::WhiteBeetle2,
        PieceName::WhiteGrasshopper1,
        PieceName::WhiteGrasshopper2,
        PieceName::WhiteGrasshopper3,
        PieceName::WhiteSoldierAnt1,
        PieceName::WhiteSoldierAnt2,
        PieceName::WhiteSoldierAnt3,
        PieceName::BlackQueenBee,
        PieceName::BlackSpider1,
        PieceName::BlackSpider2,
        PieceName::BlackBeetle1,
        PieceName::BlackBeetle2,
        PieceName::BlackGrasshopper1,
        PieceName::BlackGrasshopper2,
        PieceName::BlackGrasshopper3,
        PieceName::BlackSoldierAnt1,
        PieceName::BlackSoldierAnt2,
        PieceName::BlackSoldierAnt3,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<PieceName> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub fn info(self) -> &'static PieceInfo {
        &PIECE_INFO[self.index()]
    }

    #[inline]
    pub fn color(self) -> Color {
        self.info().color
    }

    #[inline]
    pub fn bug_type(self) -> BugType {
        self.info().bug_type
    }

    pub fn short_name(self) -> &'static str {
        self.info().short_name
    }

    pub fn from_short_name(short_name: &str) -> Option<PieceName> {
        let short_name = short_name.trim();
        PIECE_INFO
            .iter()
            .position(|info| info.short_name.eq_ignore_ascii_case(short_name))
            .and_then(Self::from_index)
    }

    /// The same-colour, same-bug piece that must be in play before this one
    pub fn predecessor(self) -> Option<PieceName> {
        (self.info().number > 1).then(|| Self::ALL[self.index() - 1])
    }
}

impl fmt::Display for PieceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for PieceName {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_short_name(s)
            .ok_or_else(|| HiveError::InvalidInput(format!("Unknown piece \"{s}\"")))
    }
}
