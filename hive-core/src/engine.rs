//! Engine façade: one live board plus the search that plays on it
//!
//! Every mutating operation either fully applies and returns the new state
//! string, or fails and leaves the board untouched.

use std::sync::atomic::AtomicBool;

use crate::ai::{EvaluatedMove, GameAI, SearchLimits};
use crate::board::{Board, Move};
use crate::config::{EngineConfig, EngineOption};
use crate::error::{HiveError, Result};
use crate::eval::Evaluator;
use crate::notation;
use crate::ttable::TranspositionTable;

pub const ENGINE_NAME: &str = "HiveEngine";

pub struct Engine {
    config: EngineConfig,
    ai: GameAI,
    board: Option<Board>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let ai = build_ai(&config);
        Ok(Self {
            config,
            ai,
            board: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ai(&self) -> &GameAI {
        &self.ai
    }

    /// Engine id line
    pub fn info(&self) -> String {
        format!("id {ENGINE_NAME} v{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn board(&self) -> Result<&Board> {
        self.board.as_ref().ok_or(HiveError::NoBoard)
    }

    fn board_mut(&mut self) -> Result<&mut Board> {
        self.board.as_mut().ok_or(HiveError::NoBoard)
    }

    /// Board for a state-changing command
    fn live_board(&mut self) -> Result<&mut Board> {
        let board = self.board_mut()?;
        if board.game_is_over() {
            return Err(HiveError::GameOver);
        }
        Ok(board)
    }

    // ========================================================================
    // GAME COMMANDS
    // ========================================================================

    /// Start a fresh game, or load one from a state string
    pub fn new_game(&mut self, state: Option<&str>) -> Result<String> {
        let board = match state {
            Some(text) => notation::parse_board(text, self.config.game_type)?,
            None => Board::new(self.config.game_type),
        };
        self.ai.reset_caches();
        tracing::info!(game_type = %self.config.game_type, state = %board, "New game");

        let state = board.to_string();
        self.board = Some(board);
        Ok(state)
    }

    /// Play a move given in algebraic or relative notation
    pub fn play(&mut self, text: &str) -> Result<String> {
        let board = self.live_board()?;
        let mv = notation::parse_move(board, text)?;
        board.play(mv)?;
        tracing::debug!(%mv, "Played");
        Ok(board.to_string())
    }

    pub fn pass(&mut self) -> Result<String> {
        let board = self.live_board()?;
        board.pass()?;
        Ok(board.to_string())
    }

    pub fn valid_moves(&mut self) -> Result<Vec<Move>> {
        Ok(self.board_mut()?.valid_moves())
    }

    /// Undo the last `count` moves; nothing changes unless all of them can go
    pub fn undo(&mut self, count: usize) -> Result<String> {
        let board = self.board_mut()?;
        let available = board.history_len();
        if count == 0 || count > available {
            return Err(HiveError::InvalidInput(format!(
                "Unable to undo {count} moves, {available} in history"
            )));
        }
        for _ in 0..count {
            board.undo_last_move()?;
        }
        Ok(board.to_string())
    }

    pub fn history(&self) -> Result<Vec<Move>> {
        Ok(self.board()?.history().collect())
    }

    /// Search the current position.
    ///
    /// `report` sees each completed iteration when intermediate reporting is
    /// switched on.
    pub fn best_move<F>(
        &mut self,
        limits: SearchLimits,
        cancel: &AtomicBool,
        mut report: F,
    ) -> Result<EvaluatedMove>
    where
        F: FnMut(&EvaluatedMove) + Send,
    {
        let report_enabled = self.config.report_intermediate_best_moves;
        let board = self.board.as_mut().ok_or(HiveError::NoBoard)?;
        self.ai.best_move_with_reporter(board, limits, cancel, |best| {
            if report_enabled {
                report(best);
            }
        })
    }

    // ========================================================================
    // OPTIONS
    // ========================================================================

    pub fn option_lines(&self) -> Vec<String> {
        self.config.option_lines()
    }

    pub fn get_option(&self, key: &str) -> Result<String> {
        Ok(self.config.option_line(key.parse()?))
    }

    /// Set an option and apply it to the running search
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<String> {
        let option: EngineOption = key.parse()?;
        self.config.set_option(option, value)?;

        match option {
            EngineOption::MaxBranchingFactor => {
                self.ai.set_max_branching_factor(self.config.max_branching_factor);
            }
            EngineOption::MaxHelperThreads => {
                self.ai
                    .set_helper_threads(self.config.max_helper_threads.helper_count());
            }
            EngineOption::TranspositionTableSizeMB => {
                if self.ai.ttable().size_mb() != self.config.transposition_table_size_mb {
                    self.ai.resize_ttable(self.config.transposition_table_size_mb);
                }
            }
            EngineOption::ReportIntermediateBestMoves => {}
        }
        tracing::debug!(%option, value, "Option set");
        Ok(self.config.option_line(option))
    }
}

fn build_ai(config: &EngineConfig) -> GameAI {
    let evaluator = Evaluator::new(
        config.game_type,
        config.start_metric_weights.clone(),
        config.end_metric_weights.clone(),
        config.board_metric_weights.clone(),
    );
    let mut ai = GameAI::new(evaluator, TranspositionTable::new(config.transposition_table_size_mb));
    ai.set_max_branching_factor(config.max_branching_factor);
    ai.set_helper_threads(config.max_helper_threads.helper_count());
    ai
}
