//! Text forms of moves and boards
//!
//! Moves are accepted either in algebraic form (`WS1[1,-1,0]`) or relative
//! to another piece (`WS1 BQ-`); output is always algebraic.

use std::str::FromStr;

use crate::board::{Board, BoardState, GameType, Move};
use crate::error::{HiveError, Result};
use crate::pieces::{Color, PieceName};
use crate::position::{Direction, Position};

const PASS: &str = "pass";

/// Separator placement for each neighbour direction, clockwise from `Up`
const RELATIVE_FORMS: [(Direction, char, bool); 6] = [
    (Direction::Up, '/', false),
    (Direction::UpRight, '-', false),
    (Direction::DownRight, '\\', false),
    (Direction::Down, '/', true),
    (Direction::DownLeft, '-', true),
    (Direction::UpLeft, '\\', true),
];

fn invalid(what: &str, text: &str) -> HiveError {
    HiveError::InvalidInput(format!("Unable to parse {what} \"{text}\""))
}

// ============================================================================
// MOVES
// ============================================================================

/// Parse a move in either notation against the current board
pub fn parse_move(board: &Board, text: &str) -> Result<Move> {
    let text = text.trim();
    if text.eq_ignore_ascii_case(PASS) {
        return Ok(Move::Pass);
    }
    if text.contains('[') {
        parse_algebraic(text)
    } else {
        parse_relative(board, text)
    }
}

/// `ShortName[x,y,z]` or `ShortName[x,y,z,stack]`
fn parse_algebraic(text: &str) -> Result<Move> {
    let (piece, rest) = text.split_once('[').ok_or_else(|| invalid("move", text))?;
    let position = rest.strip_suffix(']').ok_or_else(|| invalid("move", text))?;
    Ok(Move::play(piece.trim().parse()?, position.parse()?))
}

/// `ShortName [sep]Target[sep]`, or a lone `ShortName` for the opening move
fn parse_relative(board: &Board, text: &str) -> Result<Move> {
    let mut tokens = text.split_whitespace();
    let piece: PieceName = tokens.next().ok_or_else(|| invalid("move", text))?.parse()?;

    let Some(target) = tokens.next() else {
        return if board.pieces_in_play_count() == 0 {
            Ok(Move::play(piece, Position::ORIGIN))
        } else {
            Err(HiveError::InvalidInput(format!(
                "Move \"{text}\" needs a target once the hive exists"
            )))
        };
    };
    if tokens.next().is_some() {
        return Err(invalid("move", text));
    }

    let (name, direction) = split_relative_target(target).ok_or_else(|| invalid("move", text))?;
    let anchor: PieceName = name.parse()?;
    let anchor_position = board.piece_position(anchor).ok_or_else(|| {
        HiveError::InvalidInput(format!("Piece {anchor} is not in play"))
    })?;

    let cell = match direction {
        Some(d) => anchor_position.neighbour(d),
        None => anchor_position.ground(),
    };
    // Land on top of whatever is there, ignoring the moving piece itself
    let mut height = board.stack_height(cell);
    if board.piece_position(piece).is_some_and(|p| p.same_cell(&cell)) {
        height = height.saturating_sub(1);
    }
    Ok(Move::play(piece, cell.at_stack(height)))
}

/// Target name and direction; `None` direction means "on top of"
fn split_relative_target(target: &str) -> Option<(&str, Option<Direction>)> {
    for (direction, separator, leading) in RELATIVE_FORMS {
        let name = if leading {
            target.strip_prefix(separator)
        } else {
            target.strip_suffix(separator)
        };
        if let Some(name) = name {
            return Some((name, Some(direction)));
        }
    }
    let bare = !target.contains(['/', '-', '\\']);
    bare.then_some((target, None))
}

/// Relative text for a move, anchored on the first neighbouring piece.
///
/// Falls back to algebraic form when nothing suitable is adjacent.
pub fn format_relative(board: &Board, mv: Move) -> String {
    let Move::Play { piece, to } = mv else {
        return PASS.to_string();
    };
    if board.pieces_in_play_count() == 0 {
        return piece.to_string();
    }

    if let Some(below) = to.below().and_then(|b| board.piece_at(b)) {
        return format!("{piece} {below}");
    }
    for (direction, separator, leading) in RELATIVE_FORMS {
        let anchor_cell = to.neighbour(direction.opposite());
        let Some(anchor) = board.top_piece_at(anchor_cell).filter(|&a| a != piece) else {
            continue;
        };
        return if leading {
            format!("{piece} {separator}{anchor}")
        } else {
            format!("{piece} {anchor}{separator}")
        };
    }
    mv.to_string()
}

pub fn format_moves(moves: &[Move]) -> String {
    moves.iter().map(Move::to_string).collect::<Vec<_>>().join(";")
}

// ============================================================================
// BOARDS
// ============================================================================

/// Parse `<state>;<colour>[<turn>];<piece>[<position>];...`.
///
/// The result has no move history. Rejects boards that could not arise in
/// play: duplicate or floating pieces, a split hive, pieces placed out of
/// order, or a declared state that disagrees with the queens.
pub fn parse_board(text: &str, game_type: GameType) -> Result<Board> {
    let mut parts = text.trim().split(';').map(str::trim);
    let state: BoardState = parts.next().ok_or_else(|| invalid("board", text))?.parse()?;

    let turn_text = parts.next().ok_or_else(|| invalid("board", text))?;
    let (color, player_turn) = turn_text
        .strip_suffix(']')
        .and_then(|t| t.split_once('['))
        .ok_or_else(|| invalid("turn", turn_text))?;
    let color = Color::from_str(color)?;
    let player_turn: u32 = player_turn.parse().map_err(|_| invalid("turn", turn_text))?;
    if player_turn == 0 {
        return Err(invalid("turn", turn_text));
    }
    let turn = (player_turn - 1) * 2 + color as u32;

    let placements = parts
        .filter(|p| !p.is_empty())
        .map(|entry| match parse_algebraic(entry)? {
            Move::Play { piece, to } => Ok((piece, to)),
            Move::Pass => Err(invalid("piece", entry)),
        })
        .collect::<Result<Vec<_>>>()?;

    let board = Board::from_placements(game_type, turn, &placements)?;
    if placements.len() > turn as usize {
        return Err(HiveError::InvalidInput(format!(
            "{} pieces cannot be in play after {turn} turns",
            placements.len()
        )));
    }

    for &(piece, _) in &placements {
        if piece.predecessor().is_some_and(|p| !board.piece_in_play(p)) {
            return Err(HiveError::InvalidInput(format!(
                "Piece {piece} is in play before its predecessor"
            )));
        }
    }
    if !board.is_one_hive() {
        return Err(HiveError::InvalidInput("Pieces do not form a single hive".to_string()));
    }
    if board.board_state() != state {
        return Err(HiveError::InvalidInput(format!(
            "Declared state {state} does not match the board ({})",
            board.board_state()
        )));
    }

    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, y: i32, z: i32) -> Position {
        Position::new(x, y, z).unwrap()
    }

    fn opened() -> Board {
        let mut board = Board::new(GameType::Original);
        board.play(Move::play(PieceName::WhiteSpider1, Position::ORIGIN)).unwrap();
        board.play(Move::play(PieceName::BlackSpider1, pos(0, 1, -1))).unwrap();
        board
    }

    #[test]
    fn test_parse_pass_and_algebraic() {
        let board = Board::new(GameType::Original);
        assert_eq!(parse_move(&board, "pass").unwrap(), Move::Pass);
        assert_eq!(parse_move(&board, " PASS ").unwrap(), Move::Pass);
        assert_eq!(
            parse_move(&board, "WS1[0,0,0]").unwrap(),
            Move::play(PieceName::WhiteSpider1, Position::ORIGIN)
        );
        assert_eq!(
            parse_move(&board, "bb2[1,-1,0,1]").unwrap(),
            Move::play(PieceName::BlackBeetle2, Position::with_stack(1, -1, 0, 1).unwrap())
        );
        assert!(parse_move(&board, "WS1[0,0]").is_err());
        assert!(parse_move(&board, "WX1[0,0,0]").is_err());
        assert!(parse_move(&board, "WS1[0,0,0").is_err());
    }

    #[test]
    fn test_parse_relative() {
        let board = Board::new(GameType::Original);
        assert_eq!(
            parse_move(&board, "WS1").unwrap(),
            Move::play(PieceName::WhiteSpider1, Position::ORIGIN)
        );

        let board = opened();
        let expect = |d: Direction| Move::play(PieceName::WhiteBeetle1, Position::ORIGIN.neighbour(d));
        assert_eq!(parse_move(&board, "WB1 WS1-").unwrap(), expect(Direction::UpRight));
        assert_eq!(parse_move(&board, "WB1 WS1\\").unwrap(), expect(Direction::DownRight));
        assert_eq!(parse_move(&board, "WB1 /WS1").unwrap(), expect(Direction::Down));
        assert_eq!(parse_move(&board, "WB1 -WS1").unwrap(), expect(Direction::DownLeft));
        assert_eq!(parse_move(&board, "WB1 \\WS1").unwrap(), expect(Direction::UpLeft));
        assert_eq!(
            parse_move(&board, "WB1 WS1").unwrap(),
            Move::play(PieceName::WhiteBeetle1, Position::ORIGIN.above())
        );

        assert!(parse_move(&board, "WB1").is_err());
        assert!(parse_move(&board, "WB1 WA1-").is_err());
        assert!(parse_move(&board, "WB1 -WS1-").is_err());
    }

    #[test]
    fn test_relative_up_lands_on_stack() {
        // The Up neighbour of WS1 holds BS1, so the target is on top of it
        let board = opened();
        assert_eq!(
            parse_move(&board, "WB1 WS1/").unwrap(),
            Move::play(PieceName::WhiteBeetle1, pos(0, 1, -1).above())
        );
    }

    #[test]
    fn test_format_relative_round_trip() {
        let mut board = opened();
        for mv in board.valid_moves() {
            let text = format_relative(&board, mv);
            assert_eq!(parse_move(&board, &text).unwrap(), mv, "{text}");
        }
    }

    #[test]
    fn test_format_moves() {
        let moves = [Move::play(PieceName::WhiteSpider1, Position::ORIGIN), Move::Pass];
        assert_eq!(format_moves(&moves), "WS1[0,0,0];pass");
        assert_eq!(format_moves(&[]), "");
    }

    #[test]
    fn test_board_round_trip() {
        let board = opened();
        let text = board.to_string();
        assert_eq!(text, "InProgress;White[2];WS1[0,0,0];BS1[0,1,-1]");
        let parsed = parse_board(&text, GameType::Original).unwrap();
        assert_eq!(parsed.to_string(), text);
        assert_eq!(parsed.zobrist_key(), board.zobrist_key());
        assert_eq!(parsed.turn(), board.turn());
    }

    #[test]
    fn test_board_rejects_invalid_states() {
        let bad = [
            "Bogus;White[1]",
            "NotStarted;Green[1]",
            "NotStarted;White[0]",
            "InProgress;White[2];WS1[0,0,0];WS1[0,1,-1]",
            "InProgress;White[2];WS1[0,0,0];BS1[0,2,-2]",
            "InProgress;White[2];WS1[1,1,1]",
            "InProgress;White[2];WS2[0,0,0]",
            "InProgress;White[2];WB1[0,0,0,1]",
            "NotStarted;White[2];WS1[0,0,0];BS1[0,1,-1]",
            "NotStarted;White[1];WS1[0,0,0]",
        ];
        for text in bad {
            assert!(parse_board(text, GameType::Original).is_err(), "{text}");
        }
        assert!(parse_board("NotStarted;White[1]", GameType::Original).is_ok());
    }
}
