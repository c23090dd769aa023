//! Board state with O(1) play/undo
//!
//! Pieces live in a fixed arena indexed by `PieceName`; stacks are modelled
//! with `above`/`below` links between arena slots. Every occupied
//! `(x, y, z, stack)` maps to exactly one piece in `grid`.

use std::fmt;
use std::str::FromStr;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{HiveError, InvalidMoveReason, Result};
use crate::pieces::{BugType, Color, PieceName, NUM_PIECES};
use crate::position::Position;
use crate::zobrist::ZobristHash;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Which metric set the evaluator uses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    #[default]
    Original,
    Extended,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Original => f.write_str("Original"),
            GameType::Extended => f.write_str("Extended"),
        }
    }
}

/// Game progress
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardState {
    NotStarted,
    InProgress,
    Draw,
    WhiteWins,
    BlackWins,
}

impl BoardState {
    pub fn is_game_over(self) -> bool {
        matches!(self, BoardState::Draw | BoardState::WhiteWins | BoardState::BlackWins)
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoardState::NotStarted => "NotStarted",
            BoardState::InProgress => "InProgress",
            BoardState::Draw => "Draw",
            BoardState::WhiteWins => "WhiteWins",
            BoardState::BlackWins => "BlackWins",
        };
        f.write_str(name)
    }
}

impl FromStr for BoardState {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "NotStarted" => Ok(BoardState::NotStarted),
            "InProgress" => Ok(BoardState::InProgress),
            "Draw" => Ok(BoardState::Draw),
            "WhiteWins" => Ok(BoardState::WhiteWins),
            "BlackWins" => Ok(BoardState::BlackWins),
            other => Err(HiveError::InvalidInput(format!("Unknown board state \"{other}\""))),
        }
    }
}

/// A move: either a pass or a piece going to a target position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Pass,
    Play { piece: PieceName, to: Position },
}

impl Move {
    pub fn play(piece: PieceName, to: Position) -> Self {
        Move::Play { piece, to }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Move::Pass)
    }

    pub fn piece(&self) -> Option<PieceName> {
        match self {
            Move::Pass => None,
            Move::Play { piece, .. } => Some(*piece),
        }
    }

    pub fn target(&self) -> Option<Position> {
        match self {
            Move::Pass => None,
            Move::Play { to, .. } => Some(*to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Pass => f.write_str("pass"),
            Move::Play { piece, to } => write!(f, "{piece}[{to}]"),
        }
    }
}

/// Arena slot for one piece
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct PieceSlot {
    position: Option<Position>,
    above: Option<PieceName>,
    below: Option<PieceName>,
}

/// Enough to reverse one move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HistoryEntry {
    mv: Move,
    from: Option<Position>,
    last_piece_moved: Option<PieceName>,
}

/// Epoch-tagged move caches. A slot is valid only while its epoch matches
/// the board's current epoch, so invalidation is a single increment.
#[derive(Clone, Debug, Default)]
pub(crate) struct MoveCache {
    pub(crate) valid_moves: Option<(u64, Vec<Move>)>,
    pub(crate) piece_moves: [Option<(u64, Vec<Move>)>; NUM_PIECES],
    pub(crate) placements: [Option<(u64, Vec<Position>)>; 2],
}

// ============================================================================
// BOARD
// ============================================================================

#[derive(Clone, Debug)]
pub struct Board {
    game_type: GameType,
    pieces: [PieceSlot; NUM_PIECES],
    grid: FxHashMap<Position, PieceName>,
    turn: u32,
    last_piece_moved: Option<PieceName>,
    state: BoardState,
    zobrist: ZobristHash,
    history: Vec<HistoryEntry>,
    pub(crate) epoch: u64,
    pub(crate) cache: MoveCache,
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board, White to move
    pub fn new(game_type: GameType) -> Self {
        Self {
            game_type,
            pieces: [PieceSlot::default(); NUM_PIECES],
            grid: FxHashMap::default(),
            turn: 0,
            last_piece_moved: None,
            state: BoardState::NotStarted,
            zobrist: ZobristHash::new(),
            history: Vec::new(),
            epoch: 0,
            cache: MoveCache::default(),
        }
    }

    /// Build a board from explicit piece positions with no history.
    ///
    /// Pieces are dropped lowest stack first; the caller validates the result.
    pub(crate) fn from_placements(
        game_type: GameType,
        turn: u32,
        placements: &[(PieceName, Position)],
    ) -> Result<Self> {
        let mut board = Board::new(game_type);

        let mut ordered = placements.to_vec();
        ordered.sort_by_key(|(_, pos)| pos.stack);

        for &(piece, position) in &ordered {
            if board.piece_position(piece).is_some() {
                return Err(HiveError::InvalidInput(format!("Piece {piece} appears more than once")));
            }
            if board.grid.contains_key(&position) {
                return Err(HiveError::InvalidInput(format!("Position {position} is used twice")));
            }
            if let Some(below) = position.below() {
                if !board.grid.contains_key(&below) {
                    return Err(HiveError::InvalidInput(format!(
                        "Piece {piece} at {position} has nothing beneath it"
                    )));
                }
            }
            board.drop_piece(piece, position);
        }

        for _ in 0..turn {
            board.advance_turn();
        }
        board.update_board_state();
        Ok(board)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    /// Number of half-moves played (passes included)
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn current_color(&self) -> Color {
        if self.turn % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// 1-based turn number of the side to move
    pub fn current_player_turn(&self) -> u32 {
        self.turn / 2 + 1
    }

    pub fn board_state(&self) -> BoardState {
        self.state
    }

    pub fn game_is_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn zobrist_key(&self) -> u64 {
        self.zobrist.value()
    }

    pub fn last_piece_moved(&self) -> Option<PieceName> {
        self.last_piece_moved
    }

    /// Moves played so far, oldest first
    pub fn history(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.iter().map(|entry| entry.mv)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn piece_position(&self, piece: PieceName) -> Option<Position> {
        self.pieces[piece.index()].position
    }

    pub fn piece_in_play(&self, piece: PieceName) -> bool {
        self.piece_position(piece).is_some()
    }

    pub fn piece_above(&self, piece: PieceName) -> Option<PieceName> {
        self.pieces[piece.index()].above
    }

    pub fn piece_below(&self, piece: PieceName) -> Option<PieceName> {
        self.pieces[piece.index()].below
    }

    /// Whether another piece sits on top of `piece`
    pub fn is_covered(&self, piece: PieceName) -> bool {
        self.piece_above(piece).is_some()
    }

    /// Piece at the exact position (stack level included)
    pub fn piece_at(&self, position: Position) -> Option<PieceName> {
        self.grid.get(&position).copied()
    }

    /// Whether the cell holds at least one piece
    #[inline]
    pub fn cell_occupied(&self, cell: Position) -> bool {
        self.grid.contains_key(&cell.ground())
    }

    /// Number of pieces stacked on the cell
    pub fn stack_height(&self, cell: Position) -> u8 {
        let mut height = 0;
        while self.grid.contains_key(&cell.at_stack(height)) {
            height += 1;
        }
        height
    }

    /// Topmost piece on the cell
    pub fn top_piece_at(&self, cell: Position) -> Option<PieceName> {
        match self.stack_height(cell) {
            0 => None,
            height => self.piece_at(cell.at_stack(height - 1)),
        }
    }

    /// Pieces currently on the board, in registry order
    pub fn pieces_in_play(&self) -> impl Iterator<Item = PieceName> + '_ {
        PieceName::ALL.into_iter().filter(|&piece| self.piece_in_play(piece))
    }

    pub fn pieces_in_play_count(&self) -> usize {
        self.grid.len()
    }

    pub fn pieces_in_hand_count(&self) -> usize {
        NUM_PIECES - self.grid.len()
    }

    /// Occupied cells around a colour's Queen Bee (0 when it is in hand)
    pub fn queen_neighbour_count(&self, color: Color) -> usize {
        match self.piece_position(color.queen()) {
            Some(queen) => queen
                .neighbours()
                .iter()
                .filter(|&&cell| self.cell_occupied(cell))
                .count(),
            None => 0,
        }
    }

    pub fn queen_surrounded(&self, color: Color) -> bool {
        self.queen_neighbour_count(color) == 6
    }

    // ========================================================================
    // PLAY / UNDO
    // ========================================================================

    /// Validate and apply a move
    pub fn play(&mut self, mv: Move) -> Result<()> {
        if self.game_is_over() {
            return Err(HiveError::GameOver);
        }

        match mv {
            Move::Pass => {
                if self.valid_moves() != [Move::Pass] {
                    return Err(HiveError::invalid_move(mv, InvalidMoveReason::PassWithValidMoves));
                }
            }
            Move::Play { piece, to } => {
                if piece.color() != self.current_color() {
                    return Err(HiveError::invalid_move(mv, InvalidMoveReason::WrongColor));
                }
                if !self.piece_moves(piece).contains(&mv) {
                    return Err(HiveError::invalid_move(mv, self.diagnose_rejection(piece, to)));
                }
            }
        }

        self.trusted_play(mv);
        Ok(())
    }

    /// Pass; only legal when passing is the sole valid move
    pub fn pass(&mut self) -> Result<()> {
        self.play(Move::Pass)
    }

    /// Revert the most recent move or pass
    pub fn undo_last_move(&mut self) -> Result<()> {
        let entry = self
            .history
            .pop()
            .ok_or_else(|| HiveError::invalid_move(Move::Pass, InvalidMoveReason::NothingToUndo))?;
        self.revert(entry);
        Ok(())
    }

    /// Apply a move known to be legal
    pub(crate) fn trusted_play(&mut self, mv: Move) {
        let from = mv.piece().and_then(|piece| self.piece_position(piece));
        self.history.push(HistoryEntry {
            mv,
            from,
            last_piece_moved: self.last_piece_moved,
        });

        if let Move::Play { piece, to } = mv {
            if let Some(from) = from {
                self.lift_piece(piece, from);
            }
            self.drop_piece(piece, to);
            self.last_piece_moved = Some(piece);
        }

        self.advance_turn();
        self.invalidate_caches();
        self.update_board_state();
    }

    /// Undo a move made with `trusted_play`; a no-op on an empty history
    pub(crate) fn trusted_undo(&mut self) {
        if let Some(entry) = self.history.pop() {
            self.revert(entry);
        }
    }

    /// Reverse one popped history entry
    fn revert(&mut self, entry: HistoryEntry) {
        if let Move::Play { piece, to } = entry.mv {
            self.lift_piece(piece, to);
            if let Some(from) = entry.from {
                self.drop_piece(piece, from);
            }
        }

        self.last_piece_moved = entry.last_piece_moved;
        self.turn -= 1;
        self.zobrist.toggle_turn();
        self.invalidate_caches();
        self.update_board_state();
    }

    fn advance_turn(&mut self) {
        self.turn += 1;
        self.zobrist.toggle_turn();
    }

    fn lift_piece(&mut self, piece: PieceName, position: Position) {
        self.grid.remove(&position);
        let slot = &mut self.pieces[piece.index()];
        slot.position = None;
        if let Some(below) = slot.below.take() {
            self.pieces[below.index()].above = None;
        }
        self.zobrist.toggle_piece(piece, position);
    }

    fn drop_piece(&mut self, piece: PieceName, position: Position) {
        let below = position.below().and_then(|pos| self.piece_at(pos));
        self.grid.insert(position, piece);

        let slot = &mut self.pieces[piece.index()];
        slot.position = Some(position);
        slot.below = below;
        if let Some(below) = below {
            self.pieces[below.index()].above = Some(piece);
        }
        self.zobrist.toggle_piece(piece, position);
    }

    fn invalidate_caches(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    fn update_board_state(&mut self) {
        let white_surrounded = self.queen_surrounded(Color::White);
        let black_surrounded = self.queen_surrounded(Color::Black);

        self.state = match (white_surrounded, black_surrounded) {
            (true, true) => BoardState::Draw,
            (true, false) => BoardState::BlackWins,
            (false, true) => BoardState::WhiteWins,
            (false, false) if self.turn == 0 => BoardState::NotStarted,
            (false, false) => BoardState::InProgress,
        };
    }

    /// Most specific reason an illegal move by the side to move is rejected
    fn diagnose_rejection(&self, piece: PieceName, to: Position) -> InvalidMoveReason {
        let color = piece.color();
        let player_turn = self.current_player_turn();
        let queen_in_play = self.piece_in_play(color.queen());

        match self.piece_position(piece) {
            None => {
                if piece.bug_type() == BugType::QueenBee && player_turn == 1 {
                    InvalidMoveReason::QueenBeeOnFirstTurn
                } else if player_turn >= 4 && !queen_in_play && piece != color.queen() {
                    InvalidMoveReason::QueenBeeNotPlacedByFourthTurn
                } else if piece.predecessor().is_some_and(|p| !self.piece_in_play(p)) {
                    InvalidMoveReason::OutOfOrderPlacement
                } else if to.stack > 0 || self.cell_occupied(to) {
                    InvalidMoveReason::TargetOccupied
                } else {
                    InvalidMoveReason::InvalidPlacement
                }
            }
            Some(from) => {
                if !queen_in_play {
                    InvalidMoveReason::QueenBeeNotInPlay
                } else if self.is_covered(piece) {
                    InvalidMoveReason::PieceCovered
                } else if self.last_piece_moved == Some(piece) {
                    InvalidMoveReason::PieceJustMoved
                } else if from.stack == 0 && !self.can_lift_without_breaking_hive(from) {
                    InvalidMoveReason::BreaksHive
                } else if self.piece_at(to).is_some() {
                    InvalidMoveReason::TargetOccupied
                } else {
                    InvalidMoveReason::InvalidMovement
                }
            }
        }
    }

    // ========================================================================
    // ONE-HIVE
    // ========================================================================

    /// Whether all occupied cells form one connected group
    pub fn is_one_hive(&self) -> bool {
        self.ground_connected_without(None)
    }

    /// Whether the ground piece at `from` can leave without splitting the hive.
    ///
    /// If the occupied neighbours form a single contiguous arc (at most two
    /// occupied/empty transitions around the ring) removal cannot disconnect
    /// anything; otherwise fall back to a full connectivity walk.
    pub fn can_lift_without_breaking_hive(&self, from: Position) -> bool {
        let occupied = from.neighbours().map(|cell| self.cell_occupied(cell));
        let occupied_count = occupied.iter().filter(|&&o| o).count();
        if occupied_count <= 1 {
            return true;
        }

        let transitions = (0..6).filter(|&i| occupied[i] != occupied[(i + 1) % 6]).count();
        if transitions <= 2 {
            return true;
        }

        self.ground_connected_without(Some(from.ground()))
    }

    fn ground_connected_without(&self, removed: Option<Position>) -> bool {
        let cells: Vec<Position> = self
            .grid
            .keys()
            .filter(|pos| pos.stack == 0 && Some(**pos) != removed)
            .copied()
            .collect();

        let Some(&start) = cells.first() else {
            return true;
        };

        let mut visited = FxHashSet::default();
        visited.insert(start);
        let mut frontier = vec![start];

        while let Some(cell) = frontier.pop() {
            for next in cell.neighbours() {
                if Some(next) != removed && self.cell_occupied(next) && visited.insert(next) {
                    frontier.push(next);
                }
            }
        }

        visited.len() == cells.len()
    }
}

impl fmt::Display for Board {
    /// State string: `<state>;<colour>[<turn>];<piece>[<position>];...`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{}[{}]",
            self.state,
            self.current_color(),
            self.current_player_turn()
        )?;
        for piece in self.pieces_in_play() {
            if let Some(position) = self.piece_position(piece) {
                write!(f, ";{piece}[{position}]")?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Direction;

    fn pos(x: i32, y: i32, z: i32) -> Position {
        Position::new(x, y, z).unwrap()
    }

    #[test]
    fn test_new_board() {
        let board = Board::new(GameType::Original);
        assert_eq!(board.turn(), 0);
        assert_eq!(board.current_color(), Color::White);
        assert_eq!(board.current_player_turn(), 1);
        assert_eq!(board.board_state(), BoardState::NotStarted);
        assert_eq!(board.zobrist_key(), 0);
        assert_eq!(board.to_string(), "NotStarted;White[1]");
    }

    #[test]
    fn test_play_and_undo_restore_state() {
        let mut board = Board::new(GameType::Original);
        let before = (board.to_string(), board.zobrist_key());

        board.play(Move::play(PieceName::WhiteSpider1, Position::ORIGIN)).unwrap();
        assert_eq!(board.board_state(), BoardState::InProgress);
        assert_eq!(board.current_color(), Color::Black);
        assert_eq!(board.last_piece_moved(), Some(PieceName::WhiteSpider1));

        board.undo_last_move().unwrap();
        assert_eq!((board.to_string(), board.zobrist_key()), before);
        assert_eq!(board.last_piece_moved(), None);
    }

    #[test]
    fn test_undo_empty_history_fails() {
        let mut board = Board::new(GameType::Original);
        let err = board.undo_last_move().unwrap_err();
        assert!(matches!(
            err,
            HiveError::InvalidMove { reason: InvalidMoveReason::NothingToUndo, .. }
        ));
    }

    #[test]
    fn test_trusted_undo_restores_state() {
        let mut board = Board::new(GameType::Original);
        board.play(Move::play(PieceName::WhiteSpider1, Position::ORIGIN)).unwrap();
        board.play(Move::play(PieceName::BlackBeetle1, pos(0, 1, -1))).unwrap();
        let before = (board.to_string(), board.zobrist_key(), board.last_piece_moved());

        let climb = Move::play(PieceName::BlackBeetle1, Position::ORIGIN.above());
        board.trusted_play(Move::play(PieceName::WhiteQueenBee, pos(0, -1, 1)));
        board.trusted_play(climb);
        assert!(board.is_covered(PieceName::WhiteSpider1));
        board.trusted_undo();
        board.trusted_undo();
        assert_eq!((board.to_string(), board.zobrist_key(), board.last_piece_moved()), before);
        assert!(!board.is_covered(PieceName::WhiteSpider1));
        assert_eq!(board.history_len(), 2);

        board.trusted_undo();
        board.trusted_undo();
        assert_eq!(board.to_string(), "NotStarted;White[1]");
        // Nothing left to revert
        board.trusted_undo();
        assert_eq!(board.turn(), 0);
        assert_eq!(board.zobrist_key(), 0);
    }

    #[test]
    fn test_wrong_color_rejected() {
        let mut board = Board::new(GameType::Original);
        let err = board
            .play(Move::play(PieceName::BlackSpider1, Position::ORIGIN))
            .unwrap_err();
        assert!(matches!(err, HiveError::InvalidMove { reason: InvalidMoveReason::WrongColor, .. }));
    }

    #[test]
    fn test_queen_on_first_turn_rejected() {
        let mut board = Board::new(GameType::Original);
        let err = board
            .play(Move::play(PieceName::WhiteQueenBee, Position::ORIGIN))
            .unwrap_err();
        assert!(matches!(
            err,
            HiveError::InvalidMove { reason: InvalidMoveReason::QueenBeeOnFirstTurn, .. }
        ));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut board = Board::new(GameType::Original);
        let err = board
            .play(Move::play(PieceName::WhiteSpider2, Position::ORIGIN))
            .unwrap_err();
        assert!(matches!(
            err,
            HiveError::InvalidMove { reason: InvalidMoveReason::OutOfOrderPlacement, .. }
        ));
    }

    #[test]
    fn test_stacking_links() {
        let board = Board::from_placements(
            GameType::Original,
            4,
            &[
                (PieceName::WhiteQueenBee, Position::ORIGIN),
                (PieceName::BlackQueenBee, pos(0, 1, -1)),
                (PieceName::WhiteBeetle1, Position::ORIGIN.above()),
            ],
        )
        .unwrap();
        assert_eq!(board.piece_above(PieceName::WhiteQueenBee), Some(PieceName::WhiteBeetle1));
        assert_eq!(board.piece_below(PieceName::WhiteBeetle1), Some(PieceName::WhiteQueenBee));
        assert!(board.is_covered(PieceName::WhiteQueenBee));
        assert_eq!(board.stack_height(Position::ORIGIN), 2);
        assert_eq!(board.top_piece_at(Position::ORIGIN), Some(PieceName::WhiteBeetle1));
    }

    #[test]
    fn test_from_placements_rejects_floating_piece() {
        let result = Board::from_placements(
            GameType::Original,
            2,
            &[(PieceName::WhiteBeetle1, Position::ORIGIN.above())],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_board_state_from_queen_neighbours() {
        let q = pos(0, 0, 0);
        let ring = q.neighbours();
        let fillers = [
            PieceName::WhiteSpider1,
            PieceName::WhiteBeetle1,
            PieceName::WhiteGrasshopper1,
            PieceName::BlackSpider1,
            PieceName::BlackBeetle1,
            PieceName::BlackGrasshopper1,
        ];
        let mut placements = vec![
            (PieceName::BlackQueenBee, q),
            (PieceName::WhiteQueenBee, ring[0].neighbour(Direction::Up)),
        ];
        placements.extend(fillers.iter().copied().zip(ring));
        let board = Board::from_placements(GameType::Original, 10, &placements).unwrap();
        assert_eq!(board.board_state(), BoardState::WhiteWins);
        assert!(board.game_is_over());
    }

    #[test]
    fn test_one_hive_edge_heuristic() {
        // Straight line of three: the middle cannot lift, the ends can
        let board = Board::from_placements(
            GameType::Original,
            2,
            &[
                (PieceName::WhiteSpider1, pos(0, 1, -1)),
                (PieceName::WhiteQueenBee, pos(0, 0, 0)),
                (PieceName::BlackSpider1, pos(0, -1, 1)),
            ],
        )
        .unwrap();
        assert!(board.is_one_hive());
        assert!(!board.can_lift_without_breaking_hive(pos(0, 0, 0)));
        assert!(board.can_lift_without_breaking_hive(pos(0, 1, -1)));
        assert!(board.can_lift_without_breaking_hive(pos(0, -1, 1)));
    }

    #[test]
    fn test_one_hive_ring_fallback() {
        // Up and Down neighbours of the centre are joined by a path around the
        // outside, so the transition count is 4 but the hive survives removal
        let centre = pos(0, 0, 0);
        let path = [
            pos(0, 1, -1),
            pos(1, 1, -2),
            pos(2, 0, -2),
            pos(2, -1, -1),
            pos(2, -2, 0),
            pos(1, -2, 1),
            pos(0, -1, 1),
        ];
        let names = [
            PieceName::WhiteSpider1,
            PieceName::WhiteSpider2,
            PieceName::WhiteBeetle1,
            PieceName::WhiteBeetle2,
            PieceName::BlackSpider1,
            PieceName::BlackSpider2,
            PieceName::BlackBeetle1,
        ];
        let mut placements = vec![(PieceName::WhiteQueenBee, centre)];
        placements.extend(names.iter().copied().zip(path));
        let board = Board::from_placements(GameType::Original, 8, &placements).unwrap();
        assert!(board.is_one_hive());
        assert!(board.can_lift_without_breaking_hive(centre));

        // Cut the outer path: now the centre is a bridge
        placements.retain(|(_, p)| *p != pos(2, -1, -1));
        let board = Board::from_placements(GameType::Original, 8, &placements).unwrap();
        assert!(!board.can_lift_without_breaking_hive(centre));
    }
}
