//! Selfplay command - the engine plays both sides of one game

use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use hive_core::{BoardState, Engine, SearchLimits};

#[derive(Args, Clone, Debug)]
pub struct SelfPlayArgs {
    /// Search depth per move
    #[arg(long, default_value = "2")]
    pub depth: u32,

    /// Stop after this many turns (plies) if the game is still running
    #[arg(long, default_value = "100")]
    pub max_turns: u32,

    /// Optional per-move time limit in seconds, combined with the depth
    #[arg(long)]
    pub time: Option<f64>,
}

/// Summary of a finished selfplay game
#[derive(Clone, Debug, PartialEq)]
pub struct SelfPlayResult {
    pub state: BoardState,
    pub turns: u32,
    pub final_board: String,
}

/// Play one game from a fresh board
pub fn play_game(engine: &mut Engine, args: &SelfPlayArgs) -> Result<SelfPlayResult> {
    let mut limits = SearchLimits::depth(args.depth);
    if let Some(seconds) = args.time {
        let time = Duration::try_from_secs_f64(seconds)
            .ok()
            .filter(|time| !time.is_zero())
            .with_context(|| format!("--time must be a positive number of seconds, got {seconds}"))?;
        limits = limits.with_time(time);
    }

    let cancel = AtomicBool::new(false);
    let mut state = engine.new_game(None)?;
    let mut turns = 0;

    while turns < args.max_turns && !engine.board()?.game_is_over() {
        let best = engine.best_move(limits, &cancel, |_| {})?;
        state = engine.play(&best.mv.to_string())?;
        turns += 1;
        tracing::info!(turn = turns, mv = %best.mv, score = best.score, depth = best.depth, "Selfplay move");
    }

    Ok(SelfPlayResult {
        state: engine.board()?.board_state(),
        turns,
        final_board: state,
    })
}

pub fn run<W: Write>(engine: &mut Engine, args: &SelfPlayArgs, output: &mut W) -> Result<()> {
    let result = play_game(engine, args)?;
    tracing::info!(state = %result.state, turns = result.turns, "Selfplay finished");
    writeln!(output, "{}", result.final_board)?;
    Ok(())
}
