//! Engine configuration and the runtime option table

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ai::MAX_BRANCHING_FACTOR;
use crate::board::GameType;
use crate::error::{HiveError, Result};
use crate::eval::{BoardMetricWeights, MetricWeights};

pub const DEFAULT_TT_SIZE_MB: usize = 32;
pub const MAX_TT_SIZE_MB: usize = 1024;

// ============================================================================
// HELPER THREADS
// ============================================================================

/// How many helper workers join a search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ThreadsRepr", into = "ThreadsRepr")]
pub enum MaxHelperThreads {
    /// Half the available cores, less the main worker
    #[default]
    Auto,
    None,
    Count(usize),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ThreadsRepr {
    Count(usize),
    Named(String),
}

impl MaxHelperThreads {
    /// Largest explicit count accepted
    pub fn max_count() -> usize {
        available_cores().saturating_sub(1).max(1)
    }

    pub fn helper_count(self) -> usize {
        match self {
            MaxHelperThreads::Auto => (available_cores() / 2).saturating_sub(1),
            MaxHelperThreads::None => 0,
            MaxHelperThreads::Count(n) => n,
        }
    }
}

fn available_cores() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

impl fmt::Display for MaxHelperThreads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxHelperThreads::Auto => f.write_str("Auto"),
            MaxHelperThreads::None => f.write_str("None"),
            MaxHelperThreads::Count(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for MaxHelperThreads {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            Ok(MaxHelperThreads::Auto)
        } else if s.eq_ignore_ascii_case("none") {
            Ok(MaxHelperThreads::None)
        } else {
            s.parse()
                .map(MaxHelperThreads::Count)
                .map_err(|_| HiveError::Config(format!("Invalid helper thread count \"{s}\"")))
        }
    }
}

impl TryFrom<ThreadsRepr> for MaxHelperThreads {
    type Error = HiveError;

    fn try_from(repr: ThreadsRepr) -> Result<Self> {
        match repr {
            ThreadsRepr::Count(n) => Ok(MaxHelperThreads::Count(n)),
            ThreadsRepr::Named(name) => name.parse(),
        }
    }
}

impl From<MaxHelperThreads> for ThreadsRepr {
    fn from(threads: MaxHelperThreads) -> Self {
        match threads {
            MaxHelperThreads::Count(n) => ThreadsRepr::Count(n),
            named => ThreadsRepr::Named(named.to_string()),
        }
    }
}

/// Idle-time search mode. Accepted and stored, never acted on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PonderDuringIdle {
    #[default]
    Disabled,
    SingleThreaded,
    MultiThreaded,
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Everything tunable about the engine, loadable from a JSON file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub transposition_table_size_mb: usize,
    pub max_helper_threads: MaxHelperThreads,
    pub ponder_during_idle: PonderDuringIdle,
    pub report_intermediate_best_moves: bool,
    pub max_branching_factor: usize,
    pub game_type: GameType,
    pub start_metric_weights: MetricWeights,
    pub end_metric_weights: MetricWeights,
    pub board_metric_weights: BoardMetricWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transposition_table_size_mb: DEFAULT_TT_SIZE_MB,
            max_helper_threads: MaxHelperThreads::default(),
            ponder_during_idle: PonderDuringIdle::default(),
            report_intermediate_best_moves: false,
            max_branching_factor: MAX_BRANCHING_FACTOR,
            game_type: GameType::default(),
            start_metric_weights: MetricWeights::default_start(),
            end_metric_weights: MetricWeights::default_end(),
            board_metric_weights: BoardMetricWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HiveError::Config(format!("Unable to read {}: {e}", path.display())))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| HiveError::Config(format!("Unable to parse {}: {e}", path.display())))?;
        config.validate()?;

        if config.ponder_during_idle != PonderDuringIdle::Disabled {
            tracing::warn!(
                mode = ?config.ponder_during_idle,
                "Pondering during idle is not supported; the setting is ignored"
            );
        }
        tracing::info!(path = %path.display(), game_type = %config.game_type, "Loaded config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| HiveError::Config(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| HiveError::Config(format!("Unable to write {}: {e}", path.display())))
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_TT_SIZE_MB).contains(&self.transposition_table_size_mb) {
            return Err(HiveError::Config(format!(
                "transposition_table_size_mb must be between 1 and {MAX_TT_SIZE_MB}"
            )));
        }
        if !(1..=MAX_BRANCHING_FACTOR).contains(&self.max_branching_factor) {
            return Err(HiveError::Config(format!(
                "max_branching_factor must be between 1 and {MAX_BRANCHING_FACTOR}"
            )));
        }
        if let MaxHelperThreads::Count(n) = self.max_helper_threads {
            if !(1..=MaxHelperThreads::max_count()).contains(&n) {
                return Err(HiveError::Config(format!(
                    "max_helper_threads must be Auto, None or between 1 and {}",
                    MaxHelperThreads::max_count()
                )));
            }
        }
        Ok(())
    }

    // ========================================================================
    // OPTIONS
    // ========================================================================

    /// One line per runtime option
    pub fn option_lines(&self) -> Vec<String> {
        EngineOption::ALL.iter().map(|&o| self.option_line(o)).collect()
    }

    /// `<Key>;<type>;<value>;<default>[;<min>;<max> | ;<values...>]`
    pub fn option_line(&self, option: EngineOption) -> String {
        let defaults = EngineConfig::default();
        match option {
            EngineOption::MaxBranchingFactor => format!(
                "{option};int;{};{};1;{MAX_BRANCHING_FACTOR}",
                self.max_branching_factor, defaults.max_branching_factor
            ),
            EngineOption::MaxHelperThreads => {
                let counts = (1..=MaxHelperThreads::max_count())
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(";");
                format!(
                    "{option};enum;{};{};Auto;None;{counts}",
                    self.max_helper_threads, defaults.max_helper_threads
                )
            }
            EngineOption::ReportIntermediateBestMoves => format!(
                "{option};bool;{};{}",
                self.report_intermediate_best_moves, defaults.report_intermediate_best_moves
            ),
            EngineOption::TranspositionTableSizeMB => format!(
                "{option};int;{};{};1;{MAX_TT_SIZE_MB}",
                self.transposition_table_size_mb, defaults.transposition_table_size_mb
            ),
        }
    }

    /// Parse and apply one option value; the config is unchanged on error
    pub fn set_option(&mut self, option: EngineOption, value: &str) -> Result<()> {
        let value = value.trim();
        let bad_value = || HiveError::Config(format!("Invalid value \"{value}\" for {option}"));

        let mut updated = self.clone();
        match option {
            EngineOption::MaxBranchingFactor => {
                updated.max_branching_factor = value.parse().map_err(|_| bad_value())?;
            }
            EngineOption::MaxHelperThreads => {
                updated.max_helper_threads = value.parse()?;
            }
            EngineOption::ReportIntermediateBestMoves => {
                updated.report_intermediate_best_moves =
                    value.to_ascii_lowercase().parse().map_err(|_| bad_value())?;
            }
            EngineOption::TranspositionTableSizeMB => {
                updated.transposition_table_size_mb = value.parse().map_err(|_| bad_value())?;
            }
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

/// Options adjustable through the command loop
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineOption {
    MaxBranchingFactor,
    MaxHelperThreads,
    ReportIntermediateBestMoves,
    TranspositionTableSizeMB,
}

impl EngineOption {
    pub const ALL: [EngineOption; 4] = [
        EngineOption::MaxBranchingFactor,
        EngineOption::MaxHelperThreads,
        EngineOption::ReportIntermediateBestMoves,
        EngineOption::TranspositionTableSizeMB,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EngineOption::MaxBranchingFactor => "MaxBranchingFactor",
            EngineOption::MaxHelperThreads => "MaxHelperThreads",
            EngineOption::ReportIntermediateBestMoves => "ReportIntermediateBestMoves",
            EngineOption::TranspositionTableSizeMB => "TranspositionTableSizeMB",
        }
    }
}

impl fmt::Display for EngineOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineOption {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self> {
        EngineOption::ALL
            .into_iter()
            .find(|o| o.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| HiveError::Config(format!("Unknown option \"{}\"", s.trim())))
    }
}
