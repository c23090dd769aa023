//! Game-tree search
//!
//! Iterative deepening over the root moves, principal-variation search below
//! the root, and a quiescence extension over noisy moves at the leaves.
//! Values are negamax scores from the side to move's point of view; `None`
//! means the search was aborted and every `play` on the way up has already
//! been undone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::board::{Board, Move};
use crate::error::{HiveError, Result};
use crate::eval::Evaluator;
use crate::ttable::{EntryKind, TTEntry, TranspositionTable};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Width of the null window used to test non-principal moves
const NULL_WINDOW: f64 = 1e-6;

/// How far quiescence follows noisy moves
pub const QUIESCENCE_MAX_DEPTH: u32 = 4;

/// Deepest iteration attempted when only a time bound is given
const MAX_SEARCH_DEPTH: u32 = 128;

/// Upper limit for the branching cap
pub const MAX_BRANCHING_FACTOR: usize = 500;

// ============================================================================
// TYPES
// ============================================================================

/// Depth and/or time bound for one search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: Option<u32>,
    pub max_time: Option<Duration>,
}

impl SearchLimits {
    pub fn depth(max_depth: u32) -> Self {
        Self {
            max_depth: Some(max_depth),
            max_time: None,
        }
    }

    pub fn time(max_time: Duration) -> Self {
        Self {
            max_depth: None,
            max_time: Some(max_time),
        }
    }

    pub fn with_time(self, max_time: Duration) -> Self {
        Self {
            max_time: Some(max_time),
            ..self
        }
    }

    fn validate(&self) -> Result<()> {
        match (self.max_depth, self.max_time) {
            (None, None) => Err(HiveError::InvalidInput(
                "A search needs a depth or a time limit".to_string(),
            )),
            (_, Some(time)) if time.is_zero() => Err(HiveError::InvalidInput(
                "Search time must be positive".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Which slice of the ordered move list a worker explores
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrderVariant {
    #[default]
    Default,
    /// Every other move starting with the first
    Skip,
    /// Every other move starting with the second
    SkipOffset,
}

impl OrderVariant {
    pub fn apply(self, moves: Vec<Move>) -> Vec<Move> {
        let offset = match self {
            OrderVariant::Default => return moves,
            OrderVariant::Skip => 0,
            OrderVariant::SkipOffset => 1,
        };
        moves.into_iter().skip(offset).step_by(2).collect()
    }
}

/// A root move with its score at the depth it was last searched to
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvaluatedMove {
    pub mv: Move,
    pub score: f64,
    pub depth: u32,
}

// ============================================================================
// GAME AI
// ============================================================================

/// Search driver owning the evaluator and the transposition table
#[derive(Debug)]
pub struct GameAI {
    evaluator: Evaluator,
    ttable: TranspositionTable,
    max_branching_factor: usize,
    helper_threads: usize,
}

impl GameAI {
    pub fn new(evaluator: Evaluator, ttable: TranspositionTable) -> Self {
        Self {
            evaluator,
            ttable,
            max_branching_factor: MAX_BRANCHING_FACTOR,
            helper_threads: 0,
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn ttable(&self) -> &TranspositionTable {
        &self.ttable
    }

    pub fn max_branching_factor(&self) -> usize {
        self.max_branching_factor
    }

    /// Clamped to `1..=MAX_BRANCHING_FACTOR`
    pub fn set_max_branching_factor(&mut self, max_branching_factor: usize) {
        self.max_branching_factor = max_branching_factor.clamp(1, MAX_BRANCHING_FACTOR);
    }

    pub fn helper_threads(&self) -> usize {
        self.helper_threads
    }

    pub fn set_helper_threads(&mut self, helper_threads: usize) {
        self.helper_threads = helper_threads;
    }

    /// Replace the table with an empty one of a new size
    pub fn resize_ttable(&mut self, size_mb: usize) {
        self.ttable = TranspositionTable::new(size_mb);
    }

    pub fn reset_caches(&self) {
        self.ttable.clear();
        self.evaluator.clear_cache();
        tracing::debug!("Cleared transposition table and board-score cache");
    }

    /// Best move for the side to move
    pub fn best_move(
        &self,
        board: &mut Board,
        limits: SearchLimits,
        cancel: &AtomicBool,
    ) -> Result<EvaluatedMove> {
        self.best_move_with_reporter(board, limits, cancel, |_| {})
    }

    /// Best move for the side to move, reporting the leader after each
    /// completed iteration.
    ///
    /// The board is returned to its exact starting state. A timeout yields
    /// the best move found so far; `Cancelled` is only returned when
    /// `cancel` is raised before the first iteration completes.
    pub fn best_move_with_reporter<F>(
        &self,
        board: &mut Board,
        limits: SearchLimits,
        cancel: &AtomicBool,
        mut report: F,
    ) -> Result<EvaluatedMove>
    where
        F: FnMut(&EvaluatedMove) + Send,
    {
        if board.game_is_over() {
            return Err(HiveError::GameOver);
        }
        limits.validate()?;

        let start = Instant::now();
        let deadline = match limits.max_time {
            Some(time) => Some(start.checked_add(time).ok_or_else(|| {
                HiveError::InvalidInput(format!("Search time {time:?} is too long"))
            })?),
            None => None,
        };
        let valid_moves = board.valid_moves();
        let Some(&first) = valid_moves.first() else {
            return Err(HiveError::GameOver);
        };
        if valid_moves.len() == 1 {
            return Ok(EvaluatedMove {
                mv: first,
                score: 0.0,
                depth: 0,
            });
        }

        let root_entry = self.ttable.probe(board.zobrist_key());
        let tt_best = root_entry
            .and_then(|entry| entry.best_move)
            .filter(|mv| valid_moves.contains(mv));
        if let (Some(entry), Some(mv)) = (root_entry, tt_best) {
            if entry.value == f64::INFINITY {
                tracing::debug!(best = %mv, "Transposition table holds a forced win");
                return Ok(EvaluatedMove {
                    mv,
                    score: entry.value,
                    depth: entry.depth,
                });
            }
        }

        let ordered = self.presort(board, valid_moves, tt_best);
        let max_depth = limits.max_depth.unwrap_or(MAX_SEARCH_DEPTH);
        let stop = AtomicBool::new(false);

        tracing::debug!(
            moves = ordered.len(),
            max_depth,
            max_time = ?limits.max_time,
            helpers = self.helper_threads,
            "Starting search"
        );

        let outcome = if self.helper_threads == 0 {
            let mut search = Search::new(self, deadline, cancel, &stop);
            search.iterate(board, &ordered, max_depth, OrderVariant::Default, &mut report)
        } else {
            rayon::scope(|scope| {
                for helper in 0..self.helper_threads {
                    let variant = if helper % 2 == 0 {
                        OrderVariant::Skip
                    } else {
                        OrderVariant::SkipOffset
                    };
                    let helper_moves = variant.apply(ordered.clone());
                    if helper_moves.is_empty() {
                        continue;
                    }
                    let mut helper_board = board.clone();
                    let stop = &stop;
                    scope.spawn(move |_| {
                        let mut search = Search::new(self, deadline, cancel, stop);
                        search.iterate(&mut helper_board, &helper_moves, max_depth, variant, &mut |_: &EvaluatedMove| {});
                    });
                }

                let mut search = Search::new(self, deadline, cancel, &stop);
                let outcome = search.iterate(board, &ordered, max_depth, OrderVariant::Default, &mut report);
                stop.store(true, Ordering::Relaxed);
                outcome
            })
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let result = match (outcome.completed, outcome.partial) {
            (Some(best), _) => Ok(best),
            (None, _) if cancel.load(Ordering::Relaxed) => Err(HiveError::Cancelled),
            (None, Some(partial)) => Ok(partial),
            (None, None) => Ok(EvaluatedMove {
                mv: ordered[0],
                score: 0.0,
                depth: 0,
            }),
        };

        match &result {
            Ok(best) => tracing::info!(
                best = %best.mv,
                score = best.score,
                depth = best.depth,
                elapsed_ms,
                "Search finished"
            ),
            Err(err) => tracing::info!(%err, elapsed_ms, "Search aborted"),
        }
        result
    }

    /// TT move first, then noisy moves, then the rest; stable within each
    /// group and capped at the branching factor
    pub(crate) fn presort(&self, board: &Board, mut moves: Vec<Move>, best: Option<Move>) -> Vec<Move> {
        moves.sort_by_key(|&mv| {
            if Some(mv) == best {
                0
            } else if board.is_noisy_move(mv) {
                1
            } else {
                2
            }
        });
        moves.truncate(self.max_branching_factor);
        moves
    }
}

// ============================================================================
// SEARCH WORKER
// ============================================================================

/// Result of the root loop
#[derive(Debug, Default)]
struct RootOutcome {
    /// Leader of the last fully searched iteration
    completed: Option<EvaluatedMove>,
    /// Leader among moves searched in an unfinished first iteration
    partial: Option<EvaluatedMove>,
}

/// One worker's view of a running search
pub(crate) struct Search<'a> {
    ai: &'a GameAI,
    deadline: Option<Instant>,
    cancel: &'a AtomicBool,
    stop: &'a AtomicBool,
    nodes: u64,
}

impl<'a> Search<'a> {
    pub(crate) fn new(
        ai: &'a GameAI,
        deadline: Option<Instant>,
        cancel: &'a AtomicBool,
        stop: &'a AtomicBool,
    ) -> Self {
        Self {
            ai,
            deadline,
            cancel,
            stop,
            nodes: 0,
        }
    }

    fn aborted(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
            || self.stop.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Iterative deepening over `root_moves`
    fn iterate(
        &mut self,
        board: &mut Board,
        root_moves: &[Move],
        max_depth: u32,
        variant: OrderVariant,
        report: &mut dyn FnMut(&EvaluatedMove),
    ) -> RootOutcome {
        let sign = board.current_color().sign();
        let start = Instant::now();
        let mut outcome = RootOutcome::default();
        let mut moves: Vec<EvaluatedMove> = root_moves
            .iter()
            .map(|&mv| EvaluatedMove {
                mv,
                score: 0.0,
                depth: 0,
            })
            .collect();

        let first_depth = if max_depth == 0 { 0 } else { 1 };
        for depth in first_depth..=max_depth {
            let mut next = moves.clone();
            let finished = self.search_root(board, &mut next, depth, sign);

            if !finished {
                if outcome.completed.is_none() {
                    outcome.partial = next
                        .iter()
                        .filter(|m| m.depth == depth)
                        .max_by(|a, b| a.score.total_cmp(&b.score))
                        .copied();
                }
                break;
            }

            next.sort_by(|a, b| b.score.total_cmp(&a.score));
            while next.len() > 1 && next.last().is_some_and(|m| m.score == f64::NEG_INFINITY) {
                next.pop();
            }
            moves = next;

            let top = moves[0];
            if variant == OrderVariant::Default {
                if depth > 0 {
                    let key = board.zobrist_key();
                    self.ai.ttable.store(
                        key,
                        TTEntry::new(top.score, f64::NEG_INFINITY, f64::INFINITY, depth, Some(top.mv)),
                    );
                }
                tracing::debug!(
                    depth,
                    best = %top.mv,
                    score = top.score,
                    nodes = self.nodes,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Completed search iteration"
                );
                report(&top);
            }
            outcome.completed = Some(top);

            if top.score == f64::INFINITY || moves.len() == 1 || self.aborted() {
                break;
            }
        }

        outcome
    }

    /// Search every root move to `depth`; false when aborted part-way
    fn search_root(&mut self, board: &mut Board, moves: &mut [EvaluatedMove], depth: u32, sign: f64) -> bool {
        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;

        for (index, entry) in moves.iter_mut().enumerate() {
            if self.aborted() {
                return false;
            }

            board.trusted_play(entry.mv);
            let result = if depth == 0 {
                self.nodes += 1;
                Some(sign * self.ai.evaluator.evaluate(board))
            } else {
                self.child_score(board, depth - 1, alpha, beta, sign, index == 0)
            };
            board.trusted_undo();

            let Some(score) = result else {
                return false;
            };
            entry.score = score;
            entry.depth = depth;
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        true
    }

    /// Value of the position just played into, from the mover's side.
    ///
    /// Non-principal moves are searched with a null window and only
    /// re-searched when they land strictly inside `(alpha, beta)`.
    fn child_score(
        &mut self,
        board: &mut Board,
        depth: u32,
        alpha: f64,
        beta: f64,
        sign: f64,
        principal: bool,
    ) -> Option<f64> {
        if principal || !alpha.is_finite() {
            return self
                .pvs(board, depth, -beta, -alpha, -sign, OrderVariant::Default)
                .map(|v| -v);
        }

        let scout = -self.pvs(board, depth, -alpha - NULL_WINDOW, -alpha, -sign, OrderVariant::Default)?;
        if scout > alpha && scout < beta {
            self.pvs(board, depth, -beta, -alpha, -sign, OrderVariant::Default)
                .map(|v| -v)
        } else {
            Some(scout)
        }
    }

    pub(crate) fn pvs(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        sign: f64,
        variant: OrderVariant,
    ) -> Option<f64> {
        if self.aborted() {
            return None;
        }
        self.nodes += 1;

        let key = board.zobrist_key();
        let entry = self.ai.ttable.probe(key);
        if let Some(entry) = entry.filter(|e| e.depth >= depth) {
            match entry.kind {
                EntryKind::Exact => return Some(entry.value),
                EntryKind::LowerBound => alpha = alpha.max(entry.value),
                EntryKind::UpperBound => beta = beta.min(entry.value),
            }
            if alpha >= beta {
                return Some(entry.value);
            }
        }

        if depth == 0 || board.game_is_over() {
            return self.quiescence(board, QUIESCENCE_MAX_DEPTH, alpha, beta, sign);
        }

        let alpha_original = alpha;
        let moves = self.ordered_moves(board, entry.and_then(|e| e.best_move), variant);

        let mut best = f64::NEG_INFINITY;
        let mut best_move = None;
        for (index, mv) in moves.into_iter().enumerate() {
            board.trusted_play(mv);
            let result = self.child_score(board, depth - 1, alpha, beta, sign, index == 0);
            board.trusted_undo();

            let score = result?;
            if score > best || best_move.is_none() {
                best = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        // A filtered move list says nothing about the node's true value
        if variant == OrderVariant::Default {
            self.ai
                .ttable
                .store(key, TTEntry::new(best, alpha_original, beta, depth, best_move));
        }

        Some(best)
    }

    pub(crate) fn quiescence(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: f64,
        beta: f64,
        sign: f64,
    ) -> Option<f64> {
        if self.aborted() {
            return None;
        }
        self.nodes += 1;

        let stand_pat = sign * self.ai.evaluator.evaluate(board);
        alpha = alpha.max(stand_pat);
        if alpha >= beta || depth == 0 || board.game_is_over() {
            return Some(stand_pat);
        }

        let noisy: Vec<Move> = board
            .valid_moves()
            .into_iter()
            .filter(|&mv| !mv.is_pass() && board.is_noisy_move(mv))
            .collect();

        for mv in noisy {
            board.trusted_play(mv);
            let result = self.quiescence(board, depth - 1, -beta, -alpha, -sign);
            board.trusted_undo();

            alpha = alpha.max(-result?);
            if alpha >= beta {
                break;
            }
        }

        Some(alpha)
    }

    fn ordered_moves(&self, board: &mut Board, best: Option<Move>, variant: OrderVariant) -> Vec<Move> {
        let moves = board.valid_moves();
        variant.apply(self.ai.presort(board, moves, best))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GameType;
    use crate::pieces::PieceName;
    use crate::position::{Direction, Position};

    fn pos(x: i32, y: i32, z: i32) -> Position {
        Position::new(x, y, z).unwrap()
    }

    fn ai() -> GameAI {
        GameAI::new(Evaluator::default(), TranspositionTable::new(4))
    }

    /// Black queen at the origin with five neighbours; a White ant can fill the sixth
    fn mate_in_one() -> Board {
        let q = pos(0, 0, 0);
        let ring = q.neighbours();
        let fillers = [
            PieceName::WhiteSpider1,
            PieceName::WhiteBeetle1,
            PieceName::WhiteGrasshopper1,
            PieceName::BlackSpider1,
            PieceName::WhiteQueenBee,
        ];
        let mut placements = vec![(PieceName::BlackQueenBee, q)];
        placements.extend(fillers.iter().copied().zip(ring));
        // Ant hangs off the White spider, away from the open cell
        placements.push((PieceName::WhiteSoldierAnt1, ring[0].neighbour(Direction::Up)));
        Board::from_placements(GameType::Original, 10, &placements).unwrap()
    }

    /// Plain negamax over the same leaf search
    fn reference_negamax(ai: &GameAI, board: &mut Board, depth: u32, sign: f64) -> f64 {
        let never = AtomicBool::new(false);
        if depth == 0 || board.game_is_over() {
            let mut search = Search::new(ai, None, &never, &never);
            return search
                .quiescence(board, QUIESCENCE_MAX_DEPTH, f64::NEG_INFINITY, f64::INFINITY, sign)
                .unwrap();
        }
        let mut best = f64::NEG_INFINITY;
        for mv in board.valid_moves() {
            board.trusted_play(mv);
            let score = -reference_negamax(ai, board, depth - 1, -sign);
            board.trusted_undo();
            best = best.max(score);
        }
        best
    }

    #[test]
    fn test_order_variant_partition() {
        let moves: Vec<Move> = PieceName::ALL[1..6]
            .iter()
            .map(|&p| Move::play(p, Position::ORIGIN))
            .collect();
        let skip = OrderVariant::Skip.apply(moves.clone());
        let offset = OrderVariant::SkipOffset.apply(moves.clone());
        assert_eq!(skip, vec![moves[0], moves[2], moves[4]]);
        assert_eq!(offset, vec![moves[1], moves[3]]);
        assert_eq!(OrderVariant::Default.apply(moves.clone()), moves);
    }

    #[test]
    fn test_limits_validation() {
        assert!(SearchLimits::default().validate().is_err());
        assert!(SearchLimits::time(Duration::ZERO).validate().is_err());
        assert!(SearchLimits::depth(0).validate().is_ok());
        assert!(SearchLimits::depth(2).with_time(Duration::from_secs(1)).validate().is_ok());
    }

    #[test]
    fn test_finds_mate_in_one() {
        let ai = ai();
        let mut board = mate_in_one();
        let before = (board.to_string(), board.zobrist_key(), board.history_len());
        let cancel = AtomicBool::new(false);

        let best = ai.best_move(&mut board, SearchLimits::depth(2), &cancel).unwrap();
        assert_eq!(best.score, f64::INFINITY);
        assert_eq!(best.mv.target(), Some(pos(0, 0, 0).neighbour(Direction::UpLeft)));
        assert_eq!((board.to_string(), board.zobrist_key(), board.history_len()), before);

        board.play(best.mv).unwrap();
        assert!(board.game_is_over());
    }

    #[test]
    fn test_game_over_rejected() {
        let ai = ai();
        let mut board = mate_in_one();
        let cancel = AtomicBool::new(false);
        let best = ai.best_move(&mut board, SearchLimits::depth(1), &cancel).unwrap();
        board.play(best.mv).unwrap();
        assert!(matches!(
            ai.best_move(&mut board, SearchLimits::depth(1), &cancel),
            Err(HiveError::GameOver)
        ));
    }

    #[test]
    fn test_cancel_before_first_iteration() {
        let ai = ai();
        let mut board = Board::new(GameType::Original);
        let cancel = AtomicBool::new(true);
        assert!(matches!(
            ai.best_move(&mut board, SearchLimits::depth(3), &cancel),
            Err(HiveError::Cancelled)
        ));
        assert_eq!(board.history_len(), 0);
    }

    #[test]
    fn test_time_limited_search_returns_legal_move() {
        let ai = ai();
        let mut board = Board::new(GameType::Original);
        board.play(Move::play(PieceName::WhiteSpider1, Position::ORIGIN)).unwrap();
        let cancel = AtomicBool::new(false);
        let best = ai
            .best_move(&mut board, SearchLimits::time(Duration::from_millis(200)), &cancel)
            .unwrap();
        assert!(board.valid_moves().contains(&best.mv));
    }

    #[test]
    fn test_unrepresentable_deadline_rejected() {
        let ai = ai();
        let mut board = Board::new(GameType::Original);
        board.play(Move::play(PieceName::WhiteSpider1, Position::ORIGIN)).unwrap();
        let before = board.to_string();
        let cancel = AtomicBool::new(false);
        let limits = SearchLimits::depth(1).with_time(Duration::MAX);
        assert!(matches!(
            ai.best_move(&mut board, limits, &cancel),
            Err(HiveError::InvalidInput(_))
        ));
        assert_eq!(board.to_string(), before);
    }

    #[test]
    fn test_reporter_sees_each_depth() {
        let ai = ai();
        let mut board = Board::new(GameType::Original);
        board.play(Move::play(PieceName::WhiteSpider1, Position::ORIGIN)).unwrap();
        let cancel = AtomicBool::new(false);
        let mut depths = Vec::new();
        ai.best_move_with_reporter(&mut board, SearchLimits::depth(2), &cancel, |m| depths.push(m.depth))
            .unwrap();
        assert_eq!(depths, vec![1, 2]);
    }

    #[test]
    fn test_exact_entries_match_negamax() {
        let ai = ai();
        let mut board = Board::from_placements(
            GameType::Original,
            4,
            &[
                (PieceName::WhiteQueenBee, pos(0, 0, 0)),
                (PieceName::BlackQueenBee, pos(0, 1, -1)),
            ],
        )
        .unwrap();
        let cancel = AtomicBool::new(false);
        let depth = 2;
        let best = ai.best_move(&mut board, SearchLimits::depth(depth), &cancel).unwrap();

        let sign = board.current_color().sign();
        let root = ai.ttable().probe(board.zobrist_key()).unwrap();
        assert_eq!(root.kind, EntryKind::Exact);
        assert_eq!(root.depth, depth);
        let expected = reference_negamax(&ai, &mut board, depth, sign);
        assert_eq!(root.value, expected);
        assert_eq!(best.score, expected);

        // Every exact child entry agrees with negamax at its own depth
        for mv in board.valid_moves() {
            board.trusted_play(mv);
            if let Some(entry) = ai.ttable().probe(board.zobrist_key()) {
                if entry.kind == EntryKind::Exact {
                    let value = reference_negamax(&ai, &mut board, entry.depth, -sign);
                    assert_eq!(entry.value, value, "child {mv}");
                }
            }
            board.trusted_undo();
        }
    }

    #[test]
    fn test_helpers_agree_on_forced_win() {
        let mut ai = ai();
        ai.set_helper_threads(2);
        let mut board = mate_in_one();
        let cancel = AtomicBool::new(false);
        let best = ai.best_move(&mut board, SearchLimits::depth(2), &cancel).unwrap();
        assert_eq!(best.score, f64::INFINITY);
        assert_eq!(board.history_len(), 0);
    }

    #[test]
    fn test_branching_cap() {
        let mut ai = ai();
        ai.set_max_branching_factor(0);
        assert_eq!(ai.max_branching_factor(), 1);
        let board = Board::new(GameType::Original);
        let moves = ai.presort(&board, board.clone().valid_moves(), None);
        assert_eq!(moves.len(), 1);
    }
}
