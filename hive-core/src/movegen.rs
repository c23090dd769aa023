//! Move generation
//!
//! Every generator is pure: a moving piece is treated as absent from its
//! starting cell instead of being lifted off the board, so there is nothing to
//! restore on any exit path.

use rustc_hash::FxHashSet;

use crate::board::{Board, Move};
use crate::pieces::{BugType, Color, PieceName};
use crate::position::{Direction, Position};

/// Spider travel distance
const SPIDER_STEPS: usize = 3;

impl Board {
    // ========================================================================
    // MOVE LISTS
    // ========================================================================

    /// All legal moves for the side to move; `[Move::Pass]` when nothing else
    /// is legal, empty once the game is over.
    pub fn valid_moves(&mut self) -> Vec<Move> {
        if let Some((epoch, moves)) = &self.cache.valid_moves {
            if *epoch == self.epoch {
                return moves.clone();
            }
        }

        let moves = if self.game_is_over() {
            Vec::new()
        } else {
            let mut moves: Vec<Move> = self
                .current_color()
                .pieces()
                .flat_map(|piece| self.piece_moves(piece))
                .collect();
            if moves.is_empty() {
                moves.push(Move::Pass);
            }
            moves
        };

        self.cache.valid_moves = Some((self.epoch, moves.clone()));
        moves
    }

    /// Legal moves of one piece, as if it were its owner's turn.
    ///
    /// In-hand pieces yield placements, in-play pieces yield movements.
    pub fn piece_moves(&mut self, piece: PieceName) -> Vec<Move> {
        if let Some((epoch, moves)) = &self.cache.piece_moves[piece.index()] {
            if *epoch == self.epoch {
                return moves.clone();
            }
        }

        let moves = if self.game_is_over() {
            Vec::new()
        } else {
            match self.piece_position(piece) {
                None => self.placement_moves(piece),
                Some(from) => self.movement_moves(piece, from),
            }
        };

        self.cache.piece_moves[piece.index()] = Some((self.epoch, moves.clone()));
        moves
    }

    /// Whether a move brings a piece next to the enemy Queen Bee from a cell
    /// that was not already next to it
    pub fn is_noisy_move(&self, mv: Move) -> bool {
        let Move::Play { piece, to } = mv else {
            return false;
        };
        let Some(queen) = self.piece_position(piece.color().opponent().queen()) else {
            return false;
        };

        let from_adjacent = self
            .piece_position(piece)
            .is_some_and(|from| queen.is_neighbour(&from));

        queen.is_neighbour(&to) && !from_adjacent
    }

    // ========================================================================
    // PLACEMENT
    // ========================================================================

    /// Turn counter as seen by `color` when it is next to act
    fn effective_turn(&self, color: Color) -> u32 {
        if color == self.current_color() {
            self.turn()
        } else {
            self.turn() + 1
        }
    }

    /// Whether an in-hand piece is eligible to be placed now
    fn can_place(&self, piece: PieceName) -> bool {
        let color = piece.color();
        let player_turn = self.effective_turn(color) / 2 + 1;
        let is_queen = piece.bug_type() == BugType::QueenBee;

        if is_queen && player_turn == 1 {
            return false;
        }
        if !is_queen && player_turn >= 4 && !self.piece_in_play(color.queen()) {
            return false;
        }
        piece.predecessor().map_or(true, |p| self.piece_in_play(p))
    }

    fn placement_moves(&mut self, piece: PieceName) -> Vec<Move> {
        if !self.can_place(piece) {
            return Vec::new();
        }
        self.valid_placements(piece.color())
            .into_iter()
            .map(|to| Move::play(piece, to))
            .collect()
    }

    /// Empty cells where `color` may place a piece, sorted
    pub fn valid_placements(&mut self, color: Color) -> Vec<Position> {
        if let Some((epoch, cells)) = &self.cache.placements[color as usize] {
            if *epoch == self.epoch {
                return cells.clone();
            }
        }

        let cells = match self.effective_turn(color) {
            0 => vec![Position::ORIGIN],
            1 => Position::ORIGIN
                .neighbours()
                .into_iter()
                .filter(|&cell| !self.cell_occupied(cell))
                .collect(),
            _ => self.adjacency_placements(color),
        };

        self.cache.placements[color as usize] = Some((self.epoch, cells.clone()));
        cells
    }

    fn adjacency_placements(&self, color: Color) -> Vec<Position> {
        let mut candidates = FxHashSet::default();
        for piece in color.pieces() {
            let Some(position) = self.piece_position(piece) else {
                continue;
            };
            if self.is_covered(piece) {
                continue;
            }
            for cell in position.neighbours() {
                if !self.cell_occupied(cell) {
                    candidates.insert(cell);
                }
            }
        }

        let mut cells: Vec<Position> = candidates
            .into_iter()
            .filter(|cell| {
                cell.neighbours().iter().all(|&n| {
                    self.top_piece_at(n)
                        .map_or(true, |top| top.color() == color)
                })
            })
            .collect();
        cells.sort();
        cells
    }

    // ========================================================================
    // MOVEMENT
    // ========================================================================

    fn movement_moves(&self, piece: PieceName, from: Position) -> Vec<Move> {
        // The last-moved restriction only bites its owner after an opposing pass
        let just_moved =
            self.last_piece_moved() == Some(piece) && piece.color() == self.current_color();
        if !self.piece_in_play(piece.color().queen()) || self.is_covered(piece) || just_moved {
            return Vec::new();
        }

        if from.stack == 0 && !self.can_lift_without_breaking_hive(from) {
            return Vec::new();
        }

        let targets = match piece.bug_type() {
            BugType::QueenBee => self.slide_targets(from, Some(1)),
            BugType::Spider => self.spider_targets(from),
            BugType::Beetle => self.beetle_targets(from),
            BugType::Grasshopper => self.grasshopper_targets(from),
            BugType::SoldierAnt => self.slide_targets(from, None),
        };

        targets.into_iter().map(|to| Move::play(piece, to)).collect()
    }

    /// Occupancy with the moving piece's starting cell treated as empty
    #[inline]
    fn occupied_without(&self, cell: Position, vacated: Position) -> bool {
        cell != vacated && self.cell_occupied(cell)
    }

    /// Single ground-level slides out of `at`.
    ///
    /// A slide in direction `d` needs an empty target and exactly one occupied
    /// cell among the two flanking it: both occupied is a closed gate,
    /// neither means losing contact with the hive.
    pub(crate) fn single_slides(&self, at: Position, vacated: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::ALL.into_iter().filter_map(move |d| {
            let to = at.neighbour(d);
            if self.occupied_without(to, vacated) {
                return None;
            }
            let left = self.occupied_without(at.neighbour(d.left_of()), vacated);
            let right = self.occupied_without(at.neighbour(d.right_of()), vacated);
            (left != right).then_some(to)
        })
    }

    /// Cells reachable by up to `max_steps` slides (unbounded when `None`),
    /// excluding the start
    fn slide_targets(&self, from: Position, max_steps: Option<usize>) -> Vec<Position> {
        let start = from.ground();
        let mut visited = FxHashSet::default();
        visited.insert(start);
        let mut frontier = vec![start];
        let mut steps = 0;

        while !frontier.is_empty() && max_steps.map_or(true, |max| steps < max) {
            let mut next_frontier = Vec::new();
            for cell in frontier {
                for next in self.single_slides(cell, start) {
                    if visited.insert(next) {
                        next_frontier.push(next);
                    }
                }
            }
            frontier = next_frontier;
            steps += 1;
        }

        visited.remove(&start);
        let mut targets: Vec<Position> = visited.into_iter().collect();
        targets.sort();
        targets
    }

    /// Cells reachable in three slides but not in fewer
    fn spider_targets(&self, from: Position) -> Vec<Position> {
        let nearer: FxHashSet<Position> =
            self.slide_targets(from, Some(SPIDER_STEPS - 1)).into_iter().collect();
        self.slide_targets(from, Some(SPIDER_STEPS))
            .into_iter()
            .filter(|cell| !nearer.contains(cell))
            .collect()
    }

    /// One step in any direction, climbing on or off stacks.
    ///
    /// The gate is evaluated at the higher of the source and destination
    /// levels: it is closed when both flanking stacks reach above it.
    fn beetle_targets(&self, from: Position) -> Vec<Position> {
        let mut targets = Vec::new();

        for d in Direction::ALL {
            let cell = from.neighbour(d);
            let destination_level = self.stack_height(cell);
            let gate_level = from.stack.max(destination_level);

            let left = self.stack_height(from.neighbour(d.left_of()));
            let right = self.stack_height(from.neighbour(d.right_of()));

            if left > gate_level && right > gate_level {
                continue;
            }
            // Ground-level slide must keep contact with the hive
            if gate_level == 0 && (left > 0) == (right > 0) {
                continue;
            }

            targets.push(cell.at_stack(destination_level));
        }

        targets
    }

    /// Jump over a contiguous occupied line onto the first empty cell
    fn grasshopper_targets(&self, from: Position) -> Vec<Position> {
        let mut targets = Vec::new();

        for d in Direction::ALL {
            let mut cell = from.neighbour(d);
            if !self.cell_occupied(cell) {
                continue;
            }
            while self.cell_occupied(cell) {
                cell = cell.neighbour(d);
            }
            targets.push(cell);
        }

        targets
    }
}

// ============================================================================
// TESTS
// ============================================================================
