//! Board metrics
//!
//! Per-piece and per-board feature values consumed by the evaluator. The
//! Extended game type adds ring and tight-space features that need probing
//! moves with play/undo, so they are only computed when asked for.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::board::{Board, GameType, Move};
use crate::pieces::{Color, PieceName, NUM_PIECES};
use crate::position::{Direction, Position};

// ============================================================================
// FEATURES
// ============================================================================

/// Feature measured for every piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceFeature {
    InPlay = 0,
    IsPinned,
    IsCovered,
    NoisyMoveCount,
    QuietMoveCount,
    FriendlyNeighbourCount,
    EnemyNeighbourCount,
    /// Extended only
    CanMakeNoisyRing,
    /// Extended only
    CanMakeDefenseRing,
}

impl PieceFeature {
    pub const COUNT: usize = 9;

    pub const ALL: [PieceFeature; PieceFeature::COUNT] = [
        PieceFeature::InPlay,
        PieceFeature::IsPinned,
        PieceFeature::IsCovered,
        PieceFeature::NoisyMoveCount,
        PieceFeature::QuietMoveCount,
        PieceFeature::FriendlyNeighbourCount,
        PieceFeature::EnemyNeighbourCount,
        PieceFeature::CanMakeNoisyRing,
        PieceFeature::CanMakeDefenseRing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PieceFeature::InPlay => "InPlay",
            PieceFeature::IsPinned => "IsPinned",
            PieceFeature::IsCovered => "IsCovered",
            PieceFeature::NoisyMoveCount => "NoisyMoveCount",
            PieceFeature::QuietMoveCount => "QuietMoveCount",
            PieceFeature::FriendlyNeighbourCount => "FriendlyNeighbourCount",
            PieceFeature::EnemyNeighbourCount => "EnemyNeighbourCount",
            PieceFeature::CanMakeNoisyRing => "CanMakeNoisyRing",
            PieceFeature::CanMakeDefenseRing => "CanMakeDefenseRing",
        }
    }

    pub fn from_name(name: &str) -> Option<PieceFeature> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn is_extended(self) -> bool {
        matches!(self, PieceFeature::CanMakeNoisyRing | PieceFeature::CanMakeDefenseRing)
    }
}

impl fmt::Display for PieceFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whole-board feature (Extended only)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoardFeature {
    WhiteQueenLife = 0,
    BlackQueenLife,
    WhiteQueenTightSpaces,
    BlackQueenTightSpaces,
    WhiteNoisyRing,
    BlackNoisyRing,
}

impl BoardFeature {
    pub const COUNT: usize = 6;

    pub const ALL: [BoardFeature; BoardFeature::COUNT] = [
        BoardFeature::WhiteQueenLife,
        BoardFeature::BlackQueenLife,
        BoardFeature::WhiteQueenTightSpaces,
        BoardFeature::BlackQueenTightSpaces,
        BoardFeature::WhiteNoisyRing,
        BoardFeature::BlackNoisyRing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BoardFeature::WhiteQueenLife => "WhiteQueenLife",
            BoardFeature::BlackQueenLife => "BlackQueenLife",
            BoardFeature::WhiteQueenTightSpaces => "WhiteQueenTightSpaces",
            BoardFeature::BlackQueenTightSpaces => "BlackQueenTightSpaces",
            BoardFeature::WhiteNoisyRing => "WhiteNoisyRing",
            BoardFeature::BlackNoisyRing => "BlackNoisyRing",
        }
    }

    pub fn from_name(name: &str) -> Option<BoardFeature> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for BoardFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// METRICS
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PieceMetrics {
    values: [u32; PieceFeature::COUNT],
}

impl PieceMetrics {
    #[inline]
    pub fn get(&self, feature: PieceFeature) -> u32 {
        self.values[feature as usize]
    }

    #[inline]
    pub fn set(&mut self, feature: PieceFeature, value: u32) {
        self.values[feature as usize] = value;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardMetrics {
    pub pieces_in_play: usize,
    pub pieces_in_hand: usize,
    pieces: [PieceMetrics; NUM_PIECES],
    board: [u32; BoardFeature::COUNT],
}

impl BoardMetrics {
    fn new(pieces_in_play: usize, pieces_in_hand: usize) -> Self {
        Self {
            pieces_in_play,
            pieces_in_hand,
            pieces: [PieceMetrics::default(); NUM_PIECES],
            board: [0; BoardFeature::COUNT],
        }
    }

    pub fn piece(&self, piece: PieceName) -> &PieceMetrics {
        &self.pieces[piece.index()]
    }

    pub fn board(&self, feature: BoardFeature) -> u32 {
        self.board[feature as usize]
    }
}

/// Noisy/quiet split of one piece's moves plus the ring checks
#[derive(Clone, Copy, Debug, Default)]
struct MoveSummary {
    noisy: u32,
    quiet: u32,
    makes_noisy_ring: bool,
    makes_defense_ring: bool,
}

// ============================================================================
// COMPUTATION
// ============================================================================

impl Board {
    /// Feature values for the current position.
    ///
    /// The board is left exactly as it was found; Extended probing plays and
    /// undoes moves internally.
    pub fn metrics(&mut self) -> BoardMetrics {
        let mut metrics = BoardMetrics::new(self.pieces_in_play_count(), self.pieces_in_hand_count());
        let extended = self.game_type() == GameType::Extended;

        // Gather every move list up front; probing invalidates the move caches
        let moves: Vec<Vec<Move>> = PieceName::ALL.iter().map(|&p| self.piece_moves(p)).collect();
        let pinned: [bool; NUM_PIECES] = std::array::from_fn(|i| {
            self.piece_in_play(PieceName::ALL[i]) && moves[i].is_empty()
        });

        for piece in PieceName::ALL {
            let piece_moves = &moves[piece.index()];
            let summary = if extended {
                self.extended_move_summary(piece, piece_moves, &pinned)
            } else {
                self.basic_move_summary(piece_moves)
            };

            let m = &mut metrics.pieces[piece.index()];
            m.set(PieceFeature::NoisyMoveCount, summary.noisy);
            m.set(PieceFeature::QuietMoveCount, summary.quiet);
            m.set(PieceFeature::CanMakeNoisyRing, summary.makes_noisy_ring as u32);
            m.set(PieceFeature::CanMakeDefenseRing, summary.makes_defense_ring as u32);

            if let Some(position) = self.piece_position(piece) {
                let (friendly, enemy) = self.neighbour_colour_counts(piece.color(), position);
                m.set(PieceFeature::InPlay, 1);
                m.set(PieceFeature::IsPinned, pinned[piece.index()] as u32);
                m.set(PieceFeature::IsCovered, self.is_covered(piece) as u32);
                m.set(PieceFeature::FriendlyNeighbourCount, friendly);
                m.set(PieceFeature::EnemyNeighbourCount, enemy);
            }
        }

        if extended {
            for color in [Color::White, Color::Black] {
                let (life, tight, ring) = match color {
                    Color::White => (
                        BoardFeature::WhiteQueenLife,
                        BoardFeature::WhiteQueenTightSpaces,
                        BoardFeature::WhiteNoisyRing,
                    ),
                    Color::Black => (
                        BoardFeature::BlackQueenLife,
                        BoardFeature::BlackQueenTightSpaces,
                        BoardFeature::BlackNoisyRing,
                    ),
                };
                metrics.board[life as usize] = self.queen_life(color);
                metrics.board[tight as usize] = self.queen_tight_spaces(color);
                metrics.board[ring as usize] = self.noisy_ring_count(color);
            }
        }

        metrics
    }

    /// Empty cells left around a colour's Queen Bee
    pub fn queen_life(&self, color: Color) -> u32 {
        6 - self.queen_neighbour_count(color) as u32
    }

    /// Empty cells next to a colour's Queen Bee that nothing can slide into
    pub fn queen_tight_spaces(&self, color: Color) -> u32 {
        let Some(queen) = self.piece_position(color.queen()) else {
            return 0;
        };
        queen
            .neighbours()
            .into_iter()
            .filter(|&cell| !self.cell_occupied(cell) && self.is_tight_space(cell))
            .count() as u32
    }

    /// No entry direction has exactly one occupied flank
    fn is_tight_space(&self, cell: Position) -> bool {
        Direction::ALL.into_iter().all(|d| {
            self.cell_occupied(cell.neighbour(d.left_of()))
                == self.cell_occupied(cell.neighbour(d.right_of()))
        })
    }

    /// Closed rings of pieces around one or two empty cells that favour `color`.
    ///
    /// A six-ring surrounds a single empty cell; an eight-ring surrounds two
    /// adjacent empty cells. A ring counts when `color` owns a clear majority
    /// of the top pieces or when the opposing Queen Bee is part of it.
    pub fn noisy_ring_count(&self, color: Color) -> u32 {
        let enemy_queen = self.piece_position(color.opponent().queen());
        let candidates = self.empty_hive_neighbours();
        let mut rings = 0;

        for &centre in &candidates {
            if self.ring_favours(&centre.neighbours(), color, enemy_queen, 4) {
                rings += 1;
            }

            // Each adjacent pair once
            for d in [Direction::Up, Direction::UpRight, Direction::DownRight] {
                let other = centre.neighbour(d);
                if !candidates.contains(&other) {
                    continue;
                }
                let ring: Vec<Position> = centre
                    .neighbours()
                    .into_iter()
                    .chain(other.neighbours())
                    .filter(|cell| *cell != centre && *cell != other)
                    .collect::<FxHashSet<_>>()
                    .into_iter()
                    .collect();
                if self.ring_favours(&ring, color, enemy_queen, 5) {
                    rings += 1;
                }
            }
        }

        rings
    }

    fn ring_favours(
        &self,
        ring: &[Position],
        color: Color,
        enemy_queen: Option<Position>,
        majority: usize,
    ) -> bool {
        let mut owned = 0;
        for cell in ring {
            match self.top_piece_at(*cell) {
                Some(top) => owned += (top.color() == color) as usize,
                None => return false,
            }
        }
        let has_enemy_queen = enemy_queen.is_some_and(|q| ring.iter().any(|c| c.same_cell(&q)));
        owned >= majority || has_enemy_queen
    }

    fn empty_hive_neighbours(&self) -> FxHashSet<Position> {
        self.pieces_in_play()
            .filter_map(|piece| self.piece_position(piece))
            .filter(|pos| pos.stack == 0)
            .flat_map(|pos| pos.neighbours())
            .filter(|&cell| !self.cell_occupied(cell))
            .collect()
    }

    /// Top pieces around `position`, split into `(friendly, enemy)`
    fn neighbour_colour_counts(&self, color: Color, position: Position) -> (u32, u32) {
        position
            .neighbours()
            .into_iter()
            .filter_map(|cell| self.top_piece_at(cell))
            .fold((0, 0), |(friendly, enemy), top| {
                if top.color() == color {
                    (friendly + 1, enemy)
                } else {
                    (friendly, enemy + 1)
                }
            })
    }

    fn basic_move_summary(&self, moves: &[Move]) -> MoveSummary {
        let noisy = moves.iter().filter(|&&mv| self.is_noisy_move(mv)).count() as u32;
        MoveSummary {
            noisy,
            quiet: moves.len() as u32 - noisy,
            ..MoveSummary::default()
        }
    }

    /// Extended classification.
    ///
    /// Besides the basic rule, a move is noisy when it pins an enemy piece
    /// touching the enemy Queen Bee. A non-noisy move that unpins an enemy
    /// piece next to its source is not counted as quiet.
    fn extended_move_summary(
        &mut self,
        piece: PieceName,
        moves: &[Move],
        pinned: &[bool; NUM_PIECES],
    ) -> MoveSummary {
        let mut summary = MoveSummary::default();
        if moves.is_empty() {
            return summary;
        }

        let color = piece.color();
        let enemy = color.opponent();
        let enemy_queen = self.piece_position(enemy.queen());
        let from = self.piece_position(piece);
        let rings_before = self.noisy_ring_count(color);
        let tight_before = self.queen_tight_spaces(color);

        let enemies_around = |board: &Board, cell: Position| -> Vec<PieceName> {
            cell.neighbours()
                .into_iter()
                .filter_map(|n| board.top_piece_at(n))
                .filter(|p| p.color() == enemy)
                .collect()
        };

        for &mv in moves {
            let Some(to) = mv.target() else {
                continue;
            };

            // Enemy pieces that could become pinned next to their own queen
            let trap_candidates: Vec<PieceName> = enemies_around(self, to)
                .into_iter()
                .filter(|e| !pinned[e.index()])
                .filter(|e| {
                    enemy_queen.is_some_and(|q| {
                        *e == enemy.queen()
                            || self.piece_position(*e).is_some_and(|p| p.is_neighbour(&q))
                    })
                })
                .collect();
            // Pinned enemy pieces that may be freed by leaving the source
            let release_candidates: Vec<PieceName> = from
                .map(|f| enemies_around(self, f.ground()))
                .unwrap_or_default()
                .into_iter()
                .filter(|e| pinned[e.index()])
                .collect();
            let basic_noisy = self.is_noisy_move(mv);

            self.trusted_play(mv);
            let traps = trap_candidates.iter().any(|&e| self.piece_moves(e).is_empty());
            let releases = release_candidates.iter().any(|&e| !self.piece_moves(e).is_empty());
            let makes_ring = self.noisy_ring_count(color) > rings_before;
            let makes_defense = self.queen_tight_spaces(color) > tight_before;
            self.trusted_undo();

            if basic_noisy || traps {
                summary.noisy += 1;
            } else if !releases {
                summary.quiet += 1;
            }
            summary.makes_noisy_ring |= makes_ring;
            summary.makes_defense_ring |= makes_defense;
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, y: i32, z: i32) -> Position {
        Position::new(x, y, z).unwrap()
    }

    fn board_with(game_type: GameType, turn: u32, placements: &[(PieceName, Position)]) -> Board {
        Board::from_placements(game_type, turn, placements).unwrap()
    }

    #[test]
    fn test_feature_names() {
        for f in PieceFeature::ALL {
            assert_eq!(PieceFeature::from_name(f.name()), Some(f));
        }
        for f in BoardFeature::ALL {
            assert_eq!(BoardFeature::from_name(f.name()), Some(f));
        }
        assert_eq!(PieceFeature::from_name("Nope"), None);
    }

    #[test]
    fn test_empty_board_metrics() {
        let mut board = Board::new(GameType::Original);
        let metrics = board.metrics();
        assert_eq!(metrics.pieces_in_play, 0);
        assert_eq!(metrics.pieces_in_hand, NUM_PIECES);
        let spider = metrics.piece(PieceName::WhiteSpider1);
        assert_eq!(spider.get(PieceFeature::InPlay), 0);
        assert_eq!(spider.get(PieceFeature::QuietMoveCount), 1);
        assert_eq!(metrics.piece(PieceName::WhiteQueenBee).get(PieceFeature::QuietMoveCount), 0);
    }

    #[test]
    fn test_neighbour_and_pin_features() {
        let mut board = board_with(
            GameType::Original,
            4,
            &[
                (PieceName::WhiteQueenBee, pos(0, 1, -1)),
                (PieceName::WhiteSoldierAnt1, pos(0, 0, 0)),
                (PieceName::BlackQueenBee, pos(0, -1, 1)),
            ],
        );
        let metrics = board.metrics();

        let ant = metrics.piece(PieceName::WhiteSoldierAnt1);
        assert_eq!(ant.get(PieceFeature::InPlay), 1);
        assert_eq!(ant.get(PieceFeature::IsPinned), 1);
        assert_eq!(ant.get(PieceFeature::FriendlyNeighbourCount), 1);
        assert_eq!(ant.get(PieceFeature::EnemyNeighbourCount), 1);

        // Both queen slides stay out of reach of the Black queen
        let queen = metrics.piece(PieceName::WhiteQueenBee);
        assert_eq!(queen.get(PieceFeature::IsPinned), 0);
        assert_eq!(queen.get(PieceFeature::NoisyMoveCount), 0);
        assert_eq!(queen.get(PieceFeature::QuietMoveCount), 2);
    }

    #[test]
    fn test_covered_feature() {
        let mut board = board_with(
            GameType::Original,
            4,
            &[
                (PieceName::WhiteQueenBee, pos(0, 0, 0)),
                (PieceName::BlackQueenBee, pos(0, 1, -1)),
                (PieceName::BlackBeetle1, pos(0, 0, 0).above()),
            ],
        );
        let metrics = board.metrics();
        let queen = metrics.piece(PieceName::WhiteQueenBee);
        assert_eq!(queen.get(PieceFeature::IsCovered), 1);
        assert_eq!(queen.get(PieceFeature::IsPinned), 1);
    }

    #[test]
    fn test_queen_life_and_tight_spaces() {
        // Queen at the origin with a horseshoe of five pieces around it
        let q = pos(0, 0, 0);
        let ring = q.neighbours();
        let fillers = [
            PieceName::WhiteSpider1,
            PieceName::WhiteBeetle1,
            PieceName::BlackSpider1,
            PieceName::BlackBeetle1,
            PieceName::BlackQueenBee,
        ];
        let mut placements = vec![(PieceName::WhiteQueenBee, q)];
        placements.extend(fillers.iter().copied().zip(ring));
        let board = board_with(GameType::Extended, 8, &placements);

        assert_eq!(board.queen_life(Color::White), 1);
        // The open cell still has an entry with a single occupied flank
        assert_eq!(board.queen_tight_spaces(Color::White), 0);
        assert_eq!(board.queen_life(Color::Black), 4);
    }

    #[test]
    fn test_six_ring_detection() {
        // Six pieces around an empty centre, Black queen among them
        let centre = pos(0, 0, 0);
        let names = [
            PieceName::WhiteSpider1,
            PieceName::WhiteSpider2,
            PieceName::WhiteBeetle1,
            PieceName::BlackQueenBee,
            PieceName::WhiteQueenBee,
            PieceName::BlackSpider1,
        ];
        let placements: Vec<_> = names.iter().copied().zip(centre.neighbours()).collect();
        let board = board_with(GameType::Extended, 8, &placements);

        assert_eq!(board.noisy_ring_count(Color::White), 1);
        // Black owns two pieces and the White queen is part of the ring
        assert_eq!(board.noisy_ring_count(Color::Black), 1);
        assert_eq!(board.queen_tight_spaces(Color::White), 1);
    }

    fn move_counts(game_type: GameType, placements: &[(PieceName, Position)], piece: PieceName) -> (u32, u32) {
        let mut board = board_with(game_type, 4, placements);
        let metrics = board.metrics();
        let m = metrics.piece(piece);
        (m.get(PieceFeature::NoisyMoveCount), m.get(PieceFeature::QuietMoveCount))
    }

    #[test]
    fn test_freeing_pinned_enemy_is_not_quiet() {
        // The ant holds the Black ant in place as the middle of a line
        let placements = [
            (PieceName::WhiteQueenBee, pos(0, 2, -2)),
            (PieceName::BlackQueenBee, pos(0, 1, -1)),
            (PieceName::BlackSoldierAnt1, pos(0, 0, 0)),
            (PieceName::WhiteSoldierAnt1, pos(0, -1, 1)),
        ];
        // Four targets touch the Black queen; three at the far end free the Black ant
        assert_eq!(move_counts(GameType::Original, &placements, PieceName::WhiteSoldierAnt1), (4, 5));
        assert_eq!(move_counts(GameType::Extended, &placements, PieceName::WhiteSoldierAnt1), (4, 2));
    }

    #[test]
    fn test_pinning_enemy_beside_its_queen_is_noisy() {
        let placements = [
            (PieceName::WhiteSoldierAnt1, pos(0, 2, -2)),
            (PieceName::WhiteQueenBee, pos(0, 1, -1)),
            (PieceName::BlackQueenBee, pos(0, 0, 0)),
            (PieceName::BlackSoldierAnt1, pos(0, -1, 1)),
        ];
        // Landing below the Black ant turns it into a bridge
        assert_eq!(move_counts(GameType::Original, &placements, PieceName::WhiteSoldierAnt1), (4, 5));
        assert_eq!(move_counts(GameType::Extended, &placements, PieceName::WhiteSoldierAnt1), (7, 2));
    }

    #[test]
    fn test_eight_ring_detection() {
        // Eight pieces around the empty pair (0,0,0) and (0,1,-1), five of them White
        let placements = [
            (PieceName::BlackSpider1, pos(0, 2, -2)),
            (PieceName::WhiteBeetle1, pos(1, 1, -2)),
            (PieceName::WhiteBeetle2, pos(1, 0, -1)),
            (PieceName::WhiteSpider1, pos(1, -1, 0)),
            (PieceName::BlackBeetle1, pos(0, -1, 1)),
            (PieceName::WhiteSpider2, pos(-1, 0, 1)),
            (PieceName::WhiteGrasshopper1, pos(-1, 1, 0)),
            (PieceName::BlackGrasshopper1, pos(-1, 2, -1)),
        ];
        let board = board_with(GameType::Extended, 8, &placements);
        assert_eq!(board.noisy_ring_count(Color::White), 1);
        assert_eq!(board.noisy_ring_count(Color::Black), 0);

        // Remove one piece and the ring is open
        let board = board_with(GameType::Extended, 8, &placements[1..]);
        assert_eq!(board.noisy_ring_count(Color::White), 0);
    }

    #[test]
    fn test_ring_completion_flags() {
        // (0,1,-1) is walled in on five sides; only a White placement can
        // reach the sixth cell (0,2,-2)
        let mut board = board_with(
            GameType::Extended,
            6,
            &[
                (PieceName::WhiteQueenBee, pos(0, 0, 0)),
                (PieceName::BlackQueenBee, pos(1, 0, -1)),
                (PieceName::BlackSpider1, pos(-1, 1, 0)),
                (PieceName::WhiteSpider1, pos(1, 1, -2)),
                (PieceName::WhiteSpider2, pos(-1, 2, -1)),
                (PieceName::BlackBeetle1, pos(2, -1, -1)),
            ],
        );
        assert_eq!(board.queen_tight_spaces(Color::White), 0);
        assert_eq!(board.noisy_ring_count(Color::White), 0);
        assert!(board
            .piece_moves(PieceName::WhiteGrasshopper1)
            .contains(&Move::play(PieceName::WhiteGrasshopper1, pos(0, 2, -2))));

        let metrics = board.metrics();
        let hopper = metrics.piece(PieceName::WhiteGrasshopper1);
        assert_eq!(hopper.get(PieceFeature::CanMakeDefenseRing), 1);
        assert_eq!(hopper.get(PieceFeature::CanMakeNoisyRing), 1);

        // The White queen is the only link between the two halves
        let queen = metrics.piece(PieceName::WhiteQueenBee);
        assert_eq!(queen.get(PieceFeature::IsPinned), 1);
        assert_eq!(queen.get(PieceFeature::CanMakeDefenseRing), 0);

        board.play(Move::play(PieceName::WhiteGrasshopper1, pos(0, 2, -2))).unwrap();
        assert_eq!(board.queen_tight_spaces(Color::White), 1);
        assert_eq!(board.noisy_ring_count(Color::White), 1);
    }

    #[test]
    fn test_extended_metrics_leave_board_untouched() {
        let mut board = board_with(
            GameType::Extended,
            4,
            &[
                (PieceName::WhiteQueenBee, pos(0, 0, 0)),
                (PieceName::BlackQueenBee, pos(0, 1, -1)),
                (PieceName::WhiteSoldierAnt1, pos(0, -1, 1)),
                (PieceName::BlackSpider1, pos(0, 2, -2)),
            ],
        );
        let before = (board.to_string(), board.zobrist_key(), board.history_len());
        let metrics = board.metrics();
        assert_eq!((board.to_string(), board.zobrist_key(), board.history_len()), before);

        let ant = metrics.piece(PieceName::WhiteSoldierAnt1);
        assert!(ant.get(PieceFeature::NoisyMoveCount) > 0);
        assert_eq!(metrics.board(BoardFeature::WhiteQueenLife), 4);
    }
}
