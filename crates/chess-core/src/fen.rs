//! FEN (Forsyth-Edwards Notation) board setup.
//!
//! [`Fen`] is the decoded record: a square-indexed board plus the state
//! fields. Only the placement and side-to-move fields are required; a record
//! with fewer fields gets `- - 0 1` for the rest.

use crate::{Color, Piece, Rank, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The initial position.
pub const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 2 to 6 fields, got {0}")]
    FieldCount(usize),

    #[error("invalid piece placement: {0}")]
    Placement(String),

    #[error("invalid side to move: expected 'w' or 'b', got '{0}'")]
    SideToMove(String),

    #[error("invalid castling field: {0}")]
    Castling(String),

    #[error("invalid en passant square: {0}")]
    EnPassant(String),

    #[error("invalid halfmove clock: {0}")]
    HalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    FullmoveNumber(String),
}

/// A decoded FEN record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Pieces indexed by square (a1 = 0, h8 = 63).
    pub board: [Option<Piece>; 64],
    pub side_to_move: Color,
    /// Castling field as written: `-` or letters from `KQkq`.
    pub castling: String,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Fen {
    pub fn parse(text: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if !(2..=6).contains(&fields.len()) {
            return Err(FenError::FieldCount(fields.len()));
        }
        let field = |i: usize, default: &'static str| fields.get(i).copied().unwrap_or(default);

        let board = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        let castling = field(2, "-");
        check_castling(castling)?;

        let en_passant = match field(3, "-") {
            "-" => None,
            text => Some(
                Square::from_algebraic(text)
                    .filter(|sq| matches!(sq.rank(), Rank::R3 | Rank::R6))
                    .ok_or_else(|| FenError::EnPassant(text.to_string()))?,
            ),
        };

        let halfmove = field(4, "0");
        let halfmove_clock = halfmove
            .parse()
            .map_err(|_| FenError::HalfmoveClock(halfmove.to_string()))?;

        let fullmove = field(5, "1");
        let fullmove_number = fullmove
            .parse()
            .map_err(|_| FenError::FullmoveNumber(fullmove.to_string()))?;

        Ok(Fen {
            board,
            side_to_move,
            castling: castling.to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Writes the placement field for a square-indexed board.
    pub fn placement(board: &[Option<Piece>; 64]) -> String {
        let mut out = String::with_capacity(71);
        for rank in (0..8usize).rev() {
            let mut gap = 0u8;
            for file in 0..8 {
                match board[rank * 8 + file] {
                    Some(piece) => {
                        if gap > 0 {
                            out.push((b'0' + gap) as char);
                            gap = 0;
                        }
                        out.push(piece.to_fen_char());
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                out.push((b'0' + gap) as char);
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }
}

fn parse_placement(placement: &str) -> Result<[Option<Piece>; 64], FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::Placement(format!(
            "expected 8 ranks, got {}",
            rows.len()
        )));
    }

    let mut board = [None; 64];
    // Rows run from rank 8 down to rank 1.
    for (row, text) in rows.iter().enumerate() {
        let rank = 7 - row;
        let mut file = 0usize;
        for c in text.chars() {
            if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += skip as usize;
            } else if let Some(piece) = Piece::from_fen_char(c) {
                if file < 8 {
                    board[rank * 8 + file] = Some(piece);
                }
                file += 1;
            } else {
                return Err(FenError::Placement(format!(
                    "invalid character '{}' in rank {}",
                    c,
                    rank + 1
                )));
            }
        }
        if file != 8 {
            return Err(FenError::Placement(format!(
                "rank {} has {} squares, expected 8",
                rank + 1,
                file
            )));
        }
    }
    Ok(board)
}

fn check_castling(field: &str) -> Result<(), FenError> {
    if field == "-" {
        return Ok(());
    }
    let mut seen = String::new();
    for c in field.chars() {
        if !"KQkq".contains(c) || seen.contains(c) {
            return Err(FenError::Castling(field.to_string()));
        }
        seen.push(c);
    }
    Ok(())
}

impl FromStr for Fen {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fen::parse(s)
    }
}

impl Default for Fen {
    fn default() -> Self {
        Self::parse(STARTPOS).expect("STARTPOS is valid")
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        write!(f, "{} {} {} ", Fen::placement(&self.board), side, self.castling)?;
        match self.en_passant {
            Some(sq) => write!(f, "{}", sq)?,
            None => write!(f, "-")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceType;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn startpos_fields() {
        let fen = Fen::parse(STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling, "KQkq");
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);

        assert_eq!(
            fen.board[sq("e1").index() as usize],
            Some(Piece::new(Color::White, PieceType::King))
        );
        assert_eq!(
            fen.board[sq("d8").index() as usize],
            Some(Piece::new(Color::Black, PieceType::Queen))
        );
        assert_eq!(fen.board.iter().flatten().count(), 32);
    }

    #[test]
    fn display_reproduces_input() {
        for text in [
            STARTPOS,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        ] {
            assert_eq!(Fen::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn parses_via_from_str() {
        let fen: Fen = "4k3/8/8/8/8/8/8/4K3 b - - 12 40".parse().unwrap();
        assert_eq!(fen.side_to_move, Color::Black);
        assert_eq!(fen.halfmove_clock, 12);
        assert_eq!(fen.fullmove_number, 40);
    }

    #[test]
    fn missing_trailing_fields_use_defaults() {
        let fen = Fen::parse("8/8/8/4k3/8/8/8/4K3 b").unwrap();
        assert_eq!(fen.castling, "-");
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.to_string(), "8/8/8/4k3/8/8/8/4K3 b - - 0 1");

        let fen = Fen::parse("8/8/8/4k3/8/8/8/4K3 w - e6").unwrap();
        assert_eq!(fen.en_passant, Some(sq("e6")));
        assert_eq!(fen.fullmove_number, 1);
    }

    #[test]
    fn field_count() {
        assert_eq!(Fen::parse(""), Err(FenError::FieldCount(0)));
        assert_eq!(Fen::parse("8/8/8/8/8/8/8/8"), Err(FenError::FieldCount(1)));
        assert_eq!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0 1 extra"),
            Err(FenError::FieldCount(7))
        );
    }

    #[test]
    fn bad_placement() {
        for text in [
            "8/8/8/8/8/8/8 w - - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "7/8/8/8/8/8/8/8 w - - 0 1",
            "9/8/8/8/8/8/8/8 w - - 0 1",
            "0p7/8/8/8/8/8/8/8 w - - 0 1",
        ] {
            assert!(matches!(Fen::parse(text), Err(FenError::Placement(_))), "{}", text);
        }
        // Split gaps are unusual but still describe eight squares.
        assert!(Fen::parse("44/8/8/8/8/8/8/8 w - - 0 1").is_ok());
    }

    #[test]
    fn bad_side_to_move() {
        assert_eq!(
            Fen::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::SideToMove("x".to_string()))
        );
    }

    #[test]
    fn castling_field() {
        assert_eq!(Fen::parse("8/8/8/8/8/8/8/8 w Kq - 0 1").unwrap().castling, "Kq");
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::Castling(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w KK - 0 1"),
            Err(FenError::Castling(_))
        ));
    }

    #[test]
    fn en_passant_field() {
        assert_eq!(
            Fen::parse("8/8/8/8/8/8/8/8 b - d3 0 1").unwrap().en_passant,
            Some(sq("d3"))
        );
        for bad in ["abc", "x3", "e4", "e"] {
            let text = format!("8/8/8/8/8/8/8/8 w - {} 0 1", bad);
            assert_eq!(Fen::parse(&text), Err(FenError::EnPassant(bad.to_string())));
        }
    }

    #[test]
    fn counters() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::HalfmoveClock(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0 -3"),
            Err(FenError::FullmoveNumber(_))
        ));
    }

    #[test]
    fn error_messages_name_the_field() {
        assert!(FenError::FieldCount(3).to_string().contains("3"));
        assert!(FenError::EnPassant("z9".to_string()).to_string().contains("z9"));
        assert!(FenError::Castling("XYZ".to_string())
            .to_string()
            .contains("castling"));
    }
}
