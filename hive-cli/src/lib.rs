//! Hive CLI - command-line surfaces of the engine
//!
//! - uhp: the line-oriented engine protocol on stdin/stdout
//! - selfplay: the engine plays a full game against itself

pub mod selfplay;
pub mod uhp;

pub use selfplay::{play_game, SelfPlayArgs, SelfPlayResult};
