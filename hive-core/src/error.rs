//! Engine error types

use std::fmt;

use crate::board::Move;

/// Why a syntactically valid move was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidMoveReason {
    WrongColor,
    QueenBeeOnFirstTurn,
    QueenBeeNotPlacedByFourthTurn,
    OutOfOrderPlacement,
    TargetOccupied,
    PieceCovered,
    QueenBeeNotInPlay,
    PieceJustMoved,
    BreaksHive,
    InvalidPlacement,
    InvalidMovement,
    PassWithValidMoves,
    NothingToUndo,
}

impl fmt::Display for InvalidMoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::WrongColor => "It's not that piece's turn.",
            Self::QueenBeeOnFirstTurn => "You can't place your Queen Bee on your first turn.",
            Self::QueenBeeNotPlacedByFourthTurn => "You must place your Queen Bee by your fourth turn.",
            Self::OutOfOrderPlacement => "You must place pieces of the same bug type in order.",
            Self::TargetOccupied => "That position is already occupied.",
            Self::PieceCovered => "You can't move a piece that's covered by another piece.",
            Self::QueenBeeNotInPlay => "You can't move a piece until your Queen Bee is in play.",
            Self::PieceJustMoved => "You can't move the piece that was moved last.",
            Self::BreaksHive => "You can't move a piece in a way that breaks the hive.",
            Self::InvalidPlacement => "You can't place that piece there.",
            Self::InvalidMovement => "That piece can't move there.",
            Self::PassWithValidMoves => "You can't pass when you have valid moves.",
            Self::NothingToUndo => "There are no moves to undo.",
        };
        f.write_str(message)
    }
}

/// Errors surfaced by the engine
#[derive(Debug, thiserror::Error)]
pub enum HiveError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unable to play {mv}: {reason}")]
    InvalidMove { mv: Move, reason: InvalidMoveReason },

    #[error("No game in progress. Try 'newgame' to start a new game.")]
    NoBoard,

    #[error("The game is over. Try 'newgame' to start a new game.")]
    GameOver,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Search cancelled")]
    Cancelled,
}

impl HiveError {
    pub fn invalid_move(mv: Move, reason: InvalidMoveReason) -> Self {
        HiveError::InvalidMove { mv, reason }
    }
}

pub type Result<T> = std::result::Result<T, HiveError>;
