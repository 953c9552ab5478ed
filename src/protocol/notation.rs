//! Board notation encoding and decoding.
//!
//! A single line describing a full position:
//!
//! `<rows>x<cols>:<players>/<row 0>/.../<row rows-1>/<moved>`
//!
//! Each row is `cols` comma-separated tokens: `.` for an empty cell, `#`
//! for a blocked cell, or a player letter followed by an orb count (`a2`
//! is two orbs of player 0). `<moved>` lists the letters of players that
//! have placed at least once, or `-` if nobody has.
//!
//! Example: `3x3:2/a1,.,./.,#,./.,.,b2/ab`

use crate::board::{BoardState, Cell, Coord, PlayerId, MAX_CELL_ORBS, MAX_DIMENSION, MAX_PLAYERS};

/// Errors that can occur during notation parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("missing header '<rows>x<cols>:<players>'")]
    MissingHeader,

    #[error("invalid header: '{0}'")]
    InvalidHeader(String),

    #[error("board must be at least 2x2, got {rows}x{cols}")]
    TooSmall { rows: usize, cols: usize },

    #[error("board must be at most {max}x{max}, got {rows}x{cols}")]
    TooLarge { rows: usize, cols: usize, max: usize },

    #[error("player count must be 2..={max}, got {got}")]
    InvalidPlayerCount { got: usize, max: usize },

    #[error("expected {expected} rows, got {got}")]
    WrongRowCount { expected: usize, got: usize },

    #[error("row {row}: expected {expected} cells, got {got}")]
    WrongCellCount { row: usize, expected: usize, got: usize },

    #[error("invalid cell token '{0}'")]
    InvalidCell(String),

    #[error("player '{0}' is not seated")]
    UnknownPlayer(char),

    #[error("missing moved section")]
    MissingMoved,
}

/// Letter for a player index: `a` is player 0.
pub fn player_char(player: PlayerId) -> char {
    (b'a' + player) as char
}

/// Player index for a letter, if it names one of `players` seats.
pub fn parse_player(c: char, players: u8) -> Result<PlayerId, NotationError> {
    if !c.is_ascii_lowercase() {
        return Err(NotationError::UnknownPlayer(c));
    }
    let p = c as u8 - b'a';
    if p >= players {
        return Err(NotationError::UnknownPlayer(c));
    }
    Ok(p)
}

fn parse_header(s: &str) -> Result<(usize, usize, u8), NotationError> {
    let invalid = || NotationError::InvalidHeader(s.to_string());
    let (dims, players) = s.split_once(':').ok_or_else(invalid)?;
    let (rows, cols) = dims.split_once('x').ok_or_else(invalid)?;
    let rows: usize = rows.parse().map_err(|_| invalid())?;
    let cols: usize = cols.parse().map_err(|_| invalid())?;
    let players: usize = players.parse().map_err(|_| invalid())?;

    if rows < 2 || cols < 2 {
        return Err(NotationError::TooSmall { rows, cols });
    }
    if rows > MAX_DIMENSION || cols > MAX_DIMENSION {
        return Err(NotationError::TooLarge {
            rows,
            cols,
            max: MAX_DIMENSION,
        });
    }
    if !(2..=MAX_PLAYERS).contains(&players) {
        return Err(NotationError::InvalidPlayerCount {
            got: players,
            max: MAX_PLAYERS,
        });
    }
    Ok((rows, cols, players as u8))
}

fn parse_cell(token: &str, players: u8) -> Result<Cell, NotationError> {
    match token {
        "." => return Ok(Cell::EMPTY),
        "#" => return Ok(Cell::BLOCKED),
        _ => {}
    }
    let mut chars = token.chars();
    let letter = chars
        .next()
        .ok_or_else(|| NotationError::InvalidCell(token.to_string()))?;
    let player = parse_player(letter, players)?;
    let count: u32 = chars
        .as_str()
        .parse()
        .map_err(|_| NotationError::InvalidCell(token.to_string()))?;
    if count == 0 || count > MAX_CELL_ORBS {
        return Err(NotationError::InvalidCell(token.to_string()));
    }
    Ok(Cell::owned(player, count))
}

/// Rows always contain commas; the moved section is letters or `-`.
fn is_moved_section(s: &str) -> bool {
    s == "-" || (!s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase()))
}

/// Parses a board from notation.
pub fn parse_board(s: &str) -> Result<BoardState, NotationError> {
    let sections: Vec<&str> = s.trim().split('/').collect();
    let header = sections
        .first()
        .filter(|h| !h.is_empty())
        .ok_or(NotationError::MissingHeader)?;
    let (rows, cols, players) = parse_header(header)?;

    let (moved, body) = match sections[1..].split_last() {
        Some((last, body)) if is_moved_section(last) => (*last, body),
        _ => return Err(NotationError::MissingMoved),
    };
    if body.len() != rows {
        return Err(NotationError::WrongRowCount {
            expected: rows,
            got: body.len(),
        });
    }

    let mut board = BoardState::new(rows, cols, players);
    for (y, row) in body.iter().enumerate() {
        let tokens: Vec<&str> = row.split(',').collect();
        if tokens.len() != cols {
            return Err(NotationError::WrongCellCount {
                row: y,
                expected: cols,
                got: tokens.len(),
            });
        }
        for (x, token) in tokens.iter().enumerate() {
            board.set_cell(Coord::new(x, y), parse_cell(token.trim(), players)?);
        }
    }

    let mut mask = 0u32;
    if moved != "-" {
        for c in moved.chars() {
            mask |= 1 << parse_player(c, players)?;
        }
    }
    board.set_moved_mask(mask);
    Ok(board)
}

/// Encodes a board as notation.
pub fn encode_board(board: &BoardState) -> String {
    let mut out = format!("{}x{}:{}", board.rows(), board.cols(), board.players());
    for y in 0..board.rows() {
        out.push('/');
        for x in 0..board.cols() {
            if x > 0 {
                out.push(',');
            }
            let cell = board.cell(Coord::new(x, y));
            match cell.owner {
                _ if cell.blocked => out.push('#'),
                None => out.push('.'),
                Some(p) => {
                    out.push(player_char(p));
                    out.push_str(&cell.count.to_string());
                }
            }
        }
    }
    out.push('/');
    let moved: String = (0..board.players())
        .filter(|&p| board.has_moved(p))
        .map(player_char)
        .collect();
    if moved.is_empty() {
        out.push('-');
    } else {
        out.push_str(&moved);
    }
    out
}

/// Parses a coordinate written as `x,y`.
pub fn parse_coord(s: &str) -> Option<Coord> {
    let (x, y) = s.trim().split_once(',')?;
    Some(Coord::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "3x3:2/a1,.,./.,#,./.,.,b2/ab";

    #[test]
    fn parse_sample() {
        let board = parse_board(SAMPLE).unwrap();
        assert_eq!(board.rows(), 3);
        assert_eq!(board.cols(), 3);
        assert_eq!(board.players(), 2);
        assert_eq!(*board.cell(Coord::new(0, 0)), Cell::owned(0, 1));
        assert_eq!(*board.cell(Coord::new(1, 1)), Cell::BLOCKED);
        assert_eq!(*board.cell(Coord::new(2, 2)), Cell::owned(1, 2));
        assert!(board.all_moved());
    }

    #[test]
    fn encode_matches_sample() {
        let board = parse_board(SAMPLE).unwrap();
        assert_eq!(encode_board(&board), SAMPLE);
    }

    #[test]
    fn empty_board_encoding() {
        let board = BoardState::new(2, 3, 3);
        assert_eq!(encode_board(&board), "2x3:3/.,.,./.,.,./-");
    }

    #[test]
    fn multi_digit_counts() {
        let board = parse_board("2x2:2/a12,./.,./a").unwrap();
        assert_eq!(board.cell(Coord::new(0, 0)).count, 12);
        assert!(board.has_moved(0));
        assert!(!board.has_moved(1));
    }

    #[test]
    fn rejects_bad_header() {
        assert_eq!(parse_board(""), Err(NotationError::MissingHeader));
        assert!(matches!(parse_board("3by3:2/"), Err(NotationError::InvalidHeader(_))));
        assert!(matches!(
            parse_board("1x3:2/.,.,./-"),
            Err(NotationError::TooSmall { .. })
        ));
        assert!(matches!(
            parse_board("2x2:9/.,./.,./-"),
            Err(NotationError::InvalidPlayerCount { .. })
        ));
    }

    #[test]
    fn rejects_bad_rows_and_cells() {
        assert!(matches!(
            parse_board("2x2:2/.,./-"),
            Err(NotationError::WrongRowCount { .. })
        ));
        assert_eq!(parse_board("2x2:2/.,./.,."), Err(NotationError::MissingMoved));
        assert!(matches!(
            parse_board("2x2:2/.,.,./.,./-"),
            Err(NotationError::WrongCellCount { row: 0, .. })
        ));
        assert!(matches!(parse_board("2x2:2/a0,./.,./-"), Err(NotationError::InvalidCell(_))));
        assert!(matches!(parse_board("2x2:2/ax,./.,./-"), Err(NotationError::InvalidCell(_))));
        assert_eq!(
            parse_board("2x2:2/c1,./.,./-"),
            Err(NotationError::UnknownPlayer('c'))
        );
    }

    #[test]
    fn rejects_oversized_boards() {
        assert_eq!(
            parse_board("2x9223372036854775807:2/././-"),
            Err(NotationError::TooLarge {
                rows: 2,
                cols: 9223372036854775807,
                max: MAX_DIMENSION,
            })
        );
        assert!(matches!(
            parse_board("65x2:2/-"),
            Err(NotationError::TooLarge { rows: 65, .. })
        ));
        assert!(matches!(
            parse_board("99999999999999999999x2:2/-"),
            Err(NotationError::InvalidHeader(_))
        ));
    }

    #[test]
    fn rejects_huge_orb_counts() {
        for token in ["a1000", "a300000000", "a4294967295", "a4294967296"] {
            let notation = format!("2x2:2/{},b1/.,./ab", token);
            assert_eq!(
                parse_board(&notation),
                Err(NotationError::InvalidCell(token.to_string())),
                "{}",
                token
            );
        }
        let board = parse_board("2x2:2/a999,b1/.,./ab").unwrap();
        assert_eq!(board.cell(Coord::new(0, 0)).count, MAX_CELL_ORBS);
    }

    #[test]
    fn largest_accepted_position_is_playable() {
        let board = parse_board("2x2:2/a999,b1/.,./ab").unwrap();
        let next = crate::resolve::simulate(&board, Coord::new(0, 0), 0).unwrap();
        assert_eq!(next.total_orbs(), board.total_orbs() + 1);
        for s in crate::eval::Strategy::ALL {
            s.evaluate(&next, 0);
            s.evaluate(&board, 1);
        }
    }

    #[test]
    fn coords() {
        assert_eq!(parse_coord("3,4"), Some(Coord::new(3, 4)));
        assert_eq!(parse_coord(" 0 , 1 "), Some(Coord::new(0, 1)));
        assert_eq!(parse_coord("3"), None);
        assert_eq!(parse_coord("a,b"), None);
    }
}
