//! Position evaluation
//!
//! Scores are absolute: positive favours White, negative favours Black. The
//! search applies the side-to-move sign itself.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardState, GameType};
use crate::cache::{CacheMetrics, FixedCache};
use crate::error::HiveError;
use crate::metrics::{BoardFeature, BoardMetrics, PieceFeature};
use crate::pieces::{BugType, PieceName};

/// Entries kept in the board-score cache
pub const BOARD_SCORE_CACHE_CAPACITY: usize = 516_240;

/// Board-score cache key. The Zobrist value leaves out the last moved piece,
/// which still decides whether that piece counts as pinned.
type ScoreKey = (u64, Option<PieceName>);

// ============================================================================
// WEIGHTS
// ============================================================================

/// One weight per (bug type, piece feature).
///
/// Serialised as a flat object keyed `"<BugType>.<Feature>"`; missing keys
/// are zero, unknown keys are rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct MetricWeights {
    weights: [[f64; PieceFeature::COUNT]; BugType::COUNT],
}

impl MetricWeights {
    pub fn zero() -> Self {
        Self {
            weights: [[0.0; PieceFeature::COUNT]; BugType::COUNT],
        }
    }

    #[inline]
    pub fn get(&self, bug: BugType, feature: PieceFeature) -> f64 {
        self.weights[bug as usize][feature as usize]
    }

    pub fn set(&mut self, bug: BugType, feature: PieceFeature, value: f64) {
        self.weights[bug as usize][feature as usize] = value;
    }

    /// Weights tuned for the placement-heavy opening
    pub fn default_start() -> Self {
        Self::from_rows(&[
            // InPlay, IsPinned, IsCovered, Noisy, Quiet, Friendly, Enemy
            (BugType::QueenBee, [2.0, -4.0, -6.0, 0.5, 0.5, -2.0, -5.0]),
            (BugType::Spider, [1.0, -1.0, -1.0, 3.0, 0.3, 0.0, 0.5]),
            (BugType::Beetle, [1.5, -1.5, -1.0, 4.0, 0.3, 0.0, 1.0]),
            (BugType::Grasshopper, [1.0, -1.0, -1.0, 3.0, 0.3, 0.0, 0.5]),
            (BugType::SoldierAnt, [2.0, -2.5, -1.0, 4.0, 0.2, 0.0, 0.5]),
        ])
    }

    /// Weights tuned for the movement-heavy endgame
    pub fn default_end() -> Self {
        Self::from_rows(&[
            (BugType::QueenBee, [0.0, -6.0, -10.0, 1.0, 0.5, -8.0, -20.0]),
            (BugType::Spider, [0.5, -2.0, -1.0, 6.0, 0.2, 0.0, 1.0]),
            (BugType::Beetle, [0.5, -3.0, -1.0, 8.0, 0.3, 0.0, 2.0]),
            (BugType::Grasshopper, [0.5, -2.0, -1.0, 6.0, 0.2, 0.0, 1.0]),
            (BugType::SoldierAnt, [0.5, -4.0, -1.0, 8.0, 0.2, 0.0, 1.0]),
        ])
    }

    /// Rows cover the seven features shared by every game type
    fn from_rows(rows: &[(BugType, [f64; 7])]) -> Self {
        let mut weights = Self::zero();
        for (bug, row) in rows {
            for (feature, value) in PieceFeature::ALL.into_iter().zip(row) {
                weights.set(*bug, feature, *value);
            }
        }
        weights
    }
}

impl TryFrom<BTreeMap<String, f64>> for MetricWeights {
    type Error = HiveError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut weights = Self::zero();
        for (key, value) in map {
            let parsed = key.split_once('.').and_then(|(bug, feature)| {
                Some((BugType::from_name(bug)?, PieceFeature::from_name(feature)?))
            });
            let Some((bug, feature)) = parsed else {
                return Err(HiveError::Config(format!("Unknown metric weight \"{key}\"")));
            };
            if !value.is_finite() {
                return Err(HiveError::Config(format!("Weight \"{key}\" must be finite")));
            }
            weights.set(bug, feature, value);
        }
        Ok(weights)
    }
}

impl From<MetricWeights> for BTreeMap<String, f64> {
    fn from(weights: MetricWeights) -> Self {
        let mut map = BTreeMap::new();
        for bug in BugType::ALL {
            for feature in PieceFeature::ALL {
                map.insert(format!("{}.{}", bug.name(), feature.name()), weights.get(bug, feature));
            }
        }
        map
    }
}

/// One signed weight per board feature; only used by the Extended game type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct BoardMetricWeights {
    weights: [f64; BoardFeature::COUNT],
}

impl BoardMetricWeights {
    pub fn zero() -> Self {
        Self {
            weights: [0.0; BoardFeature::COUNT],
        }
    }

    #[inline]
    pub fn get(&self, feature: BoardFeature) -> f64 {
        self.weights[feature as usize]
    }

    pub fn set(&mut self, feature: BoardFeature, value: f64) {
        self.weights[feature as usize] = value;
    }
}

impl Default for BoardMetricWeights {
    fn default() -> Self {
        let mut weights = Self::zero();
        weights.set(BoardFeature::WhiteQueenLife, 5.0);
        weights.set(BoardFeature::BlackQueenLife, -5.0);
        weights.set(BoardFeature::WhiteQueenTightSpaces, 2.0);
        weights.set(BoardFeature::BlackQueenTightSpaces, -2.0);
        weights.set(BoardFeature::WhiteNoisyRing, 3.0);
        weights.set(BoardFeature::BlackNoisyRing, -3.0);
        weights
    }
}

impl TryFrom<BTreeMap<String, f64>> for BoardMetricWeights {
    type Error = HiveError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut weights = Self::zero();
        for (key, value) in map {
            let feature = BoardFeature::from_name(&key)
                .ok_or_else(|| HiveError::Config(format!("Unknown board weight \"{key}\"")))?;
            if !value.is_finite() {
                return Err(HiveError::Config(format!("Weight \"{key}\" must be finite")));
            }
            weights.set(feature, value);
        }
        Ok(weights)
    }
}

impl From<BoardMetricWeights> for BTreeMap<String, f64> {
    fn from(weights: BoardMetricWeights) -> Self {
        BoardFeature::ALL
            .into_iter()
            .map(|f| (f.name().to_string(), weights.get(f)))
            .collect()
    }
}

// ============================================================================
// EVALUATOR
// ============================================================================

/// Linear evaluator blending opening and endgame weights by game phase
#[derive(Debug)]
pub struct Evaluator {
    game_type: GameType,
    start_weights: MetricWeights,
    end_weights: MetricWeights,
    board_weights: BoardMetricWeights,
    cache: RwLock<FixedCache<ScoreKey, f64>>,
}

impl Evaluator {
    pub fn new(
        game_type: GameType,
        start_weights: MetricWeights,
        end_weights: MetricWeights,
        board_weights: BoardMetricWeights,
    ) -> Self {
        Self {
            game_type,
            start_weights,
            end_weights,
            board_weights,
            cache: RwLock::new(FixedCache::new(BOARD_SCORE_CACHE_CAPACITY)),
        }
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    /// Absolute score of the position (memoised by Zobrist key and last
    /// moved piece)
    pub fn evaluate(&self, board: &mut Board) -> f64 {
        match board.board_state() {
            BoardState::WhiteWins => return f64::INFINITY,
            BoardState::BlackWins => return f64::NEG_INFINITY,
            BoardState::Draw => return 0.0,
            BoardState::NotStarted | BoardState::InProgress => {}
        }

        let key = (board.zobrist_key(), board.last_piece_moved());
        if let Some(score) = self.cache.read().try_lookup(&key) {
            return score;
        }

        let score = self.score_metrics(&board.metrics());
        self.cache.write().store(key, score);
        score
    }

    /// Weighted sum of precomputed metrics
    pub fn score_metrics(&self, metrics: &BoardMetrics) -> f64 {
        let in_hand = metrics.pieces_in_hand as f64;
        let in_play = metrics.pieces_in_play as f64;
        let alpha = if in_hand + in_play > 0.0 {
            in_hand / (in_hand + in_play)
        } else {
            0.0
        };

        let mut start_score = 0.0;
        let mut end_score = 0.0;
        for piece in PieceName::ALL {
            let sign = piece.color().sign();
            let bug = piece.bug_type();
            let values = metrics.piece(piece);
            for feature in PieceFeature::ALL {
                let value = values.get(feature) as f64;
                if value == 0.0 {
                    continue;
                }
                start_score += sign * self.start_weights.get(bug, feature) * value;
                end_score += sign * self.end_weights.get(bug, feature) * value;
            }
        }

        let mut score = if metrics.pieces_in_hand == 0 {
            end_score
        } else {
            alpha * start_score + (1.0 - alpha) * end_score
        };

        if self.game_type == GameType::Extended {
            score += BoardFeature::ALL
                .into_iter()
                .map(|f| self.board_weights.get(f) * metrics.board(f) as f64)
                .sum::<f64>();
        }

        score
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    pub fn cache_metrics(&self) -> CacheMetrics {
        self.cache.read().metrics()
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(
            GameType::Original,
            MetricWeights::default_start(),
            MetricWeights::default_end(),
            BoardMetricWeights::default(),
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn pos(x: i32, y: i32, z: i32) -> Position {
        Position::new(x, y, z).unwrap()
    }

    #[test]
    fn test_black_mobility_dominates_opening() {
        // Black may answer on any of six cells, White only on the origin
        let evaluator = Evaluator::default();
        let mut board = Board::new(GameType::Original);
        let score = evaluator.evaluate(&mut board);
        assert!(score.is_finite());
        assert!(score < 0.0);
    }

    #[test]
    fn test_terminal_scores() {
        let evaluator = Evaluator::default();
        let q = pos(0, 0, 0);
        let fillers = [
            PieceName::WhiteSpider1,
            PieceName::WhiteBeetle1,
            PieceName::WhiteGrasshopper1,
            PieceName::BlackSpider1,
            PieceName::BlackBeetle1,
            PieceName::BlackGrasshopper1,
        ];
        let mut placements = vec![(PieceName::BlackQueenBee, q)];
        placements.extend(fillers.iter().copied().zip(q.neighbours()));
        let mut board = Board::from_placements(GameType::Original, 10, &placements).unwrap();
        assert_eq!(evaluator.evaluate(&mut board), f64::INFINITY);
    }

    #[test]
    fn test_symmetric_position_scores_zero() {
        let evaluator = Evaluator::default();
        let mut board = Board::from_placements(
            GameType::Original,
            4,
            &[
                (PieceName::WhiteQueenBee, pos(0, 0, 0)),
                (PieceName::BlackQueenBee, pos(0, 1, -1)),
            ],
        )
        .unwrap();
        let score = evaluator.evaluate(&mut board);
        assert!(score.abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_cache_hit_on_repeat() {
        let evaluator = Evaluator::default();
        let mut board = Board::new(GameType::Original);
        board
            .play(crate::board::Move::play(PieceName::WhiteSpider1, Position::ORIGIN))
            .unwrap();
        let first = evaluator.evaluate(&mut board);
        let second = evaluator.evaluate(&mut board);
        assert_eq!(first, second);
        assert_eq!(evaluator.cache_metrics().hits, 1);

        evaluator.clear_cache();
        assert_eq!(evaluator.cache_metrics().hits, 0);
    }

    #[test]
    fn test_cache_separates_last_moved_piece() {
        let mut weights = MetricWeights::zero();
        weights.set(BugType::QueenBee, PieceFeature::IsPinned, -1.0);
        let evaluator = Evaluator::new(
            GameType::Original,
            weights.clone(),
            weights,
            BoardMetricWeights::zero(),
        );

        let black_queen = (PieceName::BlackQueenBee, pos(0, 1, -1));
        let mut moved = Board::from_placements(
            GameType::Original,
            4,
            &[(PieceName::WhiteQueenBee, pos(0, 0, 0)), black_queen],
        )
        .unwrap();
        let slide = moved.piece_moves(PieceName::WhiteQueenBee)[0];
        moved.trusted_play(slide);
        // Black is forced to pass, so the White queen may not move again
        moved.trusted_play(crate::board::Move::Pass);
        assert_eq!(moved.last_piece_moved(), Some(PieceName::WhiteQueenBee));

        let mut fresh = Board::from_placements(
            GameType::Original,
            6,
            &[(PieceName::WhiteQueenBee, slide.target().unwrap()), black_queen],
        )
        .unwrap();
        assert_eq!(fresh.zobrist_key(), moved.zobrist_key());

        let pinned = evaluator.evaluate(&mut moved);
        assert!((pinned + 1.0).abs() < 1e-9, "score was {pinned}");
        assert!(evaluator.evaluate(&mut fresh).abs() < 1e-9);
        assert_eq!(evaluator.cache_metrics().hits, 0);
        assert_eq!(evaluator.evaluate(&mut moved), pinned);
        assert_eq!(evaluator.cache_metrics().hits, 1);
    }

    #[test]
    fn test_board_weights_only_score_extended() {
        let placements = [
            (PieceName::WhiteQueenBee, pos(0, 0, 0)),
            (PieceName::BlackQueenBee, pos(0, 1, -1)),
            (PieceName::WhiteSpider1, pos(0, -1, 1)),
            (PieceName::BlackSpider1, pos(0, 2, -2)),
            (PieceName::WhiteBeetle1, pos(1, -1, 0)),
        ];
        let mut board = Board::from_placements(GameType::Extended, 5, &placements).unwrap();
        let metrics = board.metrics();
        let white_life = metrics.board(BoardFeature::WhiteQueenLife) as f64;
        let black_life = metrics.board(BoardFeature::BlackQueenLife) as f64;
        assert_eq!((white_life, black_life), (3.0, 4.0));

        let board_weights = BoardMetricWeights::default();
        let board_term: f64 = BoardFeature::ALL
            .into_iter()
            .map(|f| board_weights.get(f) * metrics.board(f) as f64)
            .sum();
        assert!(board_term != 0.0);

        let original = Evaluator::new(
            GameType::Original,
            MetricWeights::default_start(),
            MetricWeights::default_end(),
            board_weights.clone(),
        );
        let extended = Evaluator::new(
            GameType::Extended,
            MetricWeights::default_start(),
            MetricWeights::default_end(),
            board_weights,
        );
        let difference = extended.score_metrics(&metrics) - original.score_metrics(&metrics);
        assert!((difference - board_term).abs() < 1e-9, "{difference} vs {board_term}");
        assert!(extended.evaluate(&mut board).is_finite());
    }

    #[test]
    fn test_phase_blend() {
        let mut start = MetricWeights::zero();
        start.set(BugType::Spider, PieceFeature::InPlay, 1.0);
        let mut end = MetricWeights::zero();
        end.set(BugType::Spider, PieceFeature::InPlay, 3.0);
        let evaluator = Evaluator::new(GameType::Original, start, end, BoardMetricWeights::zero());

        let mut board = Board::new(GameType::Original);
        board
            .play(crate::board::Move::play(PieceName::WhiteSpider1, Position::ORIGIN))
            .unwrap();
        // alpha = 21 / 22
        let alpha = 21.0 / 22.0;
        let expected = alpha * 1.0 + (1.0 - alpha) * 3.0;
        assert!((evaluator.evaluate(&mut board) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_weights_serde() {
        let json = r#"{"QueenBee.EnemyNeighbourCount": -3.5, "SoldierAnt.NoisyMoveCount": 2}"#;
        let weights: MetricWeights = serde_json::from_str(json).unwrap();
        assert_eq!(weights.get(BugType::QueenBee, PieceFeature::EnemyNeighbourCount), -3.5);
        assert_eq!(weights.get(BugType::SoldierAnt, PieceFeature::NoisyMoveCount), 2.0);
        assert_eq!(weights.get(BugType::Spider, PieceFeature::InPlay), 0.0);

        let text = serde_json::to_string(&weights).unwrap();
        assert!(text.contains("\"QueenBee.EnemyNeighbourCount\":-3.5"));

        assert!(serde_json::from_str::<MetricWeights>(r#"{"Queen.InPlay": 1}"#).is_err());
        assert!(serde_json::from_str::<BoardMetricWeights>(r#"{"WhiteQueenLife": 1}"#).is_ok());
        assert!(serde_json::from_str::<BoardMetricWeights>(r#"{"QueenLife": 1}"#).is_err());
    }
}
