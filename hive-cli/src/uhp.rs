//! Line-oriented engine protocol
//!
//! ## Architecture
//!
//! - Level 1: run() - read commands until `exit` or end of input
//! - Level 2: execute() - dispatch one command against the engine
//! - Level 3: per-command handlers returning response lines
//! - Level 4: argument parsing and error formatting
//!
//! Every response, error or not, ends with a line `ok`.

use std::io::{BufRead, Write};
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{Context, Result};

use hive_core::{notation, Engine, EvaluatedMove, HiveError, SearchLimits};

const OK: &str = "ok";

/// Outcome of one command line
enum Response {
    Lines(Vec<String>),
    Exit,
}

// ============================================================================
// LOOP (Level 1)
// ============================================================================

/// Serve commands from `input` until `exit` or end of input
pub fn run<R: BufRead, W: Write + Send>(engine: &mut Engine, input: R, output: &mut W) -> Result<()> {
    writeln!(output, "{}", engine.info())?;
    writeln!(output, "{OK}")?;
    output.flush()?;

    for line in input.lines() {
        let line = line.context("reading command")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        tracing::debug!(command = line, "Received");
        let response = execute(engine, line, output);
        match response {
            Ok(Response::Exit) => break,
            Ok(Response::Lines(lines)) => {
                for text in lines {
                    writeln!(output, "{text}")?;
                }
            }
            Err(err) => writeln!(output, "{}", format_error(&err))?,
        }
        writeln!(output, "{OK}")?;
        output.flush()?;
    }
    Ok(())
}

// ============================================================================
// DISPATCH (Level 2)
// ============================================================================

fn execute<W: Write + Send>(
    engine: &mut Engine,
    line: &str,
    output: &mut W,
) -> std::result::Result<Response, HiveError> {
    let (command, args) = match line.split_once(char::is_whitespace) {
        Some((command, args)) => (command, args.trim()),
        None => (line, ""),
    };

    let lines = match command.to_ascii_lowercase().as_str() {
        "info" => vec![engine.info()],
        "newgame" => vec![engine.new_game((!args.is_empty()).then_some(args))?],
        "play" if !args.is_empty() => vec![engine.play(args)?],
        "pass" => vec![engine.pass()?],
        "validmoves" => vec![notation::format_moves(&engine.valid_moves()?)],
        "bestmove" => best_move(engine, args, output)?,
        "undo" => vec![engine.undo(parse_undo_count(args)?)?],
        "history" => vec![notation::format_moves(&engine.history()?)],
        "options" => options(engine, args)?,
        "exit" => return Ok(Response::Exit),
        _ => {
            return Err(HiveError::InvalidInput(format!(
                "Invalid command \"{line}\". Try 'info' to see the engine id."
            )))
        }
    };
    Ok(Response::Lines(lines))
}

// ============================================================================
// HANDLERS (Level 3)
// ============================================================================

/// `bestmove depth N` or `bestmove time HH:MM:SS`
fn best_move<W: Write + Send>(
    engine: &mut Engine,
    args: &str,
    output: &mut W,
) -> std::result::Result<Vec<String>, HiveError> {
    let limits = parse_limits(args)?;
    let cancel = AtomicBool::new(false);

    let mut write_failed = false;
    let best = engine.best_move(limits, &cancel, |report: &EvaluatedMove| {
        let line = format!("{};{};{:.2}", report.mv, report.depth, report.score);
        write_failed |= writeln!(output, "{line}").and_then(|_| output.flush()).is_err();
    })?;
    if write_failed {
        tracing::warn!("Failed to write an intermediate best move");
    }
    Ok(vec![best.mv.to_string()])
}

/// `options`, `options list`, `options get K`, `options set K V`
fn options(engine: &mut Engine, args: &str) -> std::result::Result<Vec<String>, HiveError> {
    let mut parts = args.split_whitespace();
    match (parts.next().map(str::to_ascii_lowercase).as_deref(), parts.next(), parts.next()) {
        (None | Some("list"), None, None) => Ok(engine.option_lines()),
        (Some("get"), Some(key), None) => Ok(vec![engine.get_option(key)?]),
        (Some("set"), Some(key), Some(value)) if parts.next().is_none() => {
            Ok(vec![engine.set_option(key, value)?])
        }
        _ => Err(HiveError::InvalidInput(format!("Invalid options command \"{args}\""))),
    }
}

// ============================================================================
// PARSING AND FORMATTING (Level 4)
// ============================================================================

pub fn parse_limits(args: &str) -> std::result::Result<SearchLimits, HiveError> {
    let invalid = || HiveError::InvalidInput(format!("Invalid bestmove arguments \"{args}\""));
    let mut parts = args.split_whitespace();
    let (Some(kind), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    match kind.to_ascii_lowercase().as_str() {
        "depth" => value.parse().map(SearchLimits::depth).map_err(|_| invalid()),
        "time" => parse_duration(value).map(SearchLimits::time).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// `HH:MM:SS` or plain seconds; must be positive
pub fn parse_duration(text: &str) -> Option<Duration> {
    let duration = if text.contains(':') {
        let fields = text
            .split(':')
            .map(|f| f.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;
        let [hours, minutes, seconds] = fields[..] else {
            return None;
        };
        if minutes >= 60 || seconds >= 60 {
            return None;
        }
        let total = hours
            .checked_mul(3600)?
            .checked_add(minutes * 60 + seconds)?;
        Duration::from_secs(total)
    } else {
        let seconds: f64 = text.parse().ok()?;
        Duration::try_from_secs_f64(seconds).ok()?
    };
    (!duration.is_zero()).then_some(duration)
}

fn parse_undo_count(args: &str) -> std::result::Result<usize, HiveError> {
    if args.is_empty() {
        return Ok(1);
    }
    args.parse()
        .map_err(|_| HiveError::InvalidInput(format!("Invalid undo count \"{args}\"")))
}

fn format_error(err: &HiveError) -> String {
    match err {
        HiveError::InvalidMove { mv, reason } => format!("invalidmove {mv}: {reason}"),
        other => format!("err {other}"),
    }
}
