//! Hive Core - Game engine and AI
//!
//! This crate provides the core game logic for Hive:
//! - Hex geometry with cube coordinates and stacking
//! - Board state, move generation, play and undo
//! - Zobrist hashing and bounded caches
//! - Metric-based position evaluation
//! - Iterative-deepening PVS with a shared transposition table
//! - Move and board notation, configuration, and an engine façade

pub mod position;
pub mod pieces;
pub mod error;
pub mod zobrist;
pub mod board;
mod movegen;
pub mod cache;
pub mod ttable;
pub mod metrics;
pub mod eval;
pub mod ai;
pub mod notation;
pub mod config;
pub mod engine;

// Re-exports for convenient access
pub use position::{Direction, Position};
pub use pieces::{BugType, Color, PieceName, NUM_PIECES};
pub use error::{HiveError, InvalidMoveReason, Result};
pub use board::{Board, BoardState, GameType, Move};
pub use metrics::{BoardFeature, BoardMetrics, PieceFeature};
pub use eval::{BoardMetricWeights, Evaluator, MetricWeights};
pub use ai::{EvaluatedMove, GameAI, OrderVariant, SearchLimits};
pub use ttable::TranspositionTable;
pub use config::{EngineConfig, EngineOption, MaxHelperThreads, PonderDuringIdle};
pub use engine::Engine;
