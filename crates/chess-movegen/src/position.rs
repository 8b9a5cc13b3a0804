//! Chess position representation.

use crate::movegen::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use chess_core::{
    Bitboard, Color, Fen, FenError, Move, MoveFlag, Piece, PieceType, Square, STARTPOS,
};
use std::fmt;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Parses the FEN castling field ("KQkq", "Kq", "-", ...).
    pub fn from_fen(field: &str) -> Self {
        let flags = field.chars().fold(0, |flags, c| {
            flags
                | match c {
                    'K' => Self::WHITE_KINGSIDE,
                    'Q' => Self::WHITE_QUEENSIDE,
                    'k' => Self::BLACK_KINGSIDE,
                    'q' => Self::BLACK_QUEENSIDE,
                    _ => 0,
                }
        });
        CastlingRights::new(flags)
    }

    /// Returns true if the given side can castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns true if the given side can castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Removes castling rights for a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        let mask = match color {
            Color::White => !(Self::WHITE_KINGSIDE | Self::WHITE_QUEENSIDE),
            Color::Black => !(Self::BLACK_KINGSIDE | Self::BLACK_QUEENSIDE),
        };
        self.0 &= mask;
    }

    /// Removes kingside castling for a color.
    #[inline]
    pub fn remove_kingside(&mut self, color: Color) {
        let mask = match color {
            Color::White => !Self::WHITE_KINGSIDE,
            Color::Black => !Self::BLACK_KINGSIDE,
        };
        self.0 &= mask;
    }

    /// Removes queenside castling for a color.
    #[inline]
    pub fn remove_queenside(&mut self, color: Color) {
        let mask = match color {
            Color::White => !Self::WHITE_QUEENSIDE,
            Color::Black => !Self::BLACK_QUEENSIDE,
        };
        self.0 &= mask;
    }

    /// Drops the rights tied to a king or rook home square.
    ///
    /// Called with both squares of every move, which covers king moves,
    /// rook moves and rook captures.
    #[inline]
    pub fn revoke_square(&mut self, sq: Square) {
        match sq {
            Square::E1 => self.remove_color(Color::White),
            Square::H1 => self.remove_kingside(Color::White),
            Square::A1 => self.remove_queenside(Color::White),
            Square::E8 => self.remove_color(Color::Black),
            Square::H8 => self.remove_kingside(Color::Black),
            Square::A8 => self.remove_queenside(Color::Black),
            _ => {}
        }
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        for (color, kingside, queenside) in [(Color::White, 'K', 'Q'), (Color::Black, 'k', 'q')] {
            if self.can_castle_kingside(color) {
                write!(f, "{}", kingside)?;
            }
            if self.can_castle_queenside(color) {
                write!(f, "{}", queenside)?;
            }
        }
        Ok(())
    }
}

/// Complete chess position state.
///
/// The board is kept in three views that always agree: one bitboard per
/// color, one per piece type, and a square-indexed mailbox. All mutation
/// goes through [`Position::make_move`] or the private add/remove helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    by_color: [Bitboard; 2],
    by_piece_type: [Bitboard; 6],
    mailbox: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastlingRights,
    /// Square a capturing pawn would land on (FEN convention).
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Position {
    /// Creates an empty position.
    pub fn empty() -> Self {
        Position {
            by_color: [Bitboard::EMPTY; 2],
            by_piece_type: [Bitboard::EMPTY; 6],
            mailbox: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a position from a FEN string.
    ///
    /// Only the placement and side-to-move fields are required. An en
    /// passant square is dropped unless it is empty, on the right rank for
    /// the side to move, and has an enemy pawn standing just behind it.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fen = Fen::parse(fen)?;
        let mut position = Position::empty();

        for sq in Square::all() {
            if let Some(piece) = fen.board[sq.index() as usize] {
                position.add_piece(sq, piece);
            }
        }

        position.side_to_move = fen.side_to_move;
        position.castling = CastlingRights::from_fen(&fen.castling);
        position.en_passant = fen
            .en_passant
            .filter(|&target| position.can_capture_en_passant_on(target));
        position.halfmove_clock = fen.halfmove_clock;
        position.fullmove_number = fen.fullmove_number;

        Ok(position)
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        Fen {
            board: self.mailbox,
            side_to_move: self.side_to_move,
            castling: self.castling.to_string(),
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_string()
    }

    /// Whether `target` is a usable en passant square for the side to move.
    fn can_capture_en_passant_on(&self, target: Square) -> bool {
        let us = self.side_to_move;
        let enemy_pawn = Piece::new(!us, PieceType::Pawn);
        target.rank() == us.en_passant_rank()
            && self.piece_at(target).is_none()
            && target
                .step(us.pawn_push().opposite())
                .is_some_and(|victim| self.piece_at(victim) == Some(enemy_pawn))
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the piece at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq.index() as usize]
    }

    /// Returns a bitboard of all pieces of one color.
    #[inline]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    /// Returns a bitboard of all pieces of one type, both colors.
    #[inline]
    pub fn piece_type_bb(&self, piece_type: PieceType) -> Bitboard {
        self.by_piece_type[piece_type.index()]
    }

    /// Returns a bitboard of pieces of the given type and color.
    #[inline]
    pub fn pieces_of(&self, piece_type: PieceType, color: Color) -> Bitboard {
        self.by_piece_type[piece_type.index()] & self.by_color[color.index()]
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.by_color[0] | self.by_color[1]
    }

    /// Returns a bitboard of all empty squares.
    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied()
    }

    /// Returns the square of the given color's king, if it has one.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(PieceType::King, color).lsb()
    }

    /// Returns true if any piece of color `by` attacks `sq`.
    ///
    /// Projects each piece type's attack pattern from `sq` and intersects it
    /// with the attacker's pieces of that type. Pawns are looked up with the
    /// defending color's pattern.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let occupied = self.occupied();
        let queens = self.pieces_of(PieceType::Queen, by);

        (pawn_attacks(sq.bitboard(), !by) & self.pieces_of(PieceType::Pawn, by)).is_not_empty()
            || (knight_attacks(sq) & self.pieces_of(PieceType::Knight, by)).is_not_empty()
            || (king_attacks(sq) & self.pieces_of(PieceType::King, by)).is_not_empty()
            || (bishop_attacks(sq, occupied) & (self.pieces_of(PieceType::Bishop, by) | queens))
                .is_not_empty()
            || (rook_attacks(sq, occupied) & (self.pieces_of(PieceType::Rook, by) | queens))
                .is_not_empty()
    }

    /// Returns true if the side to move is in check.
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move;
        self.king_square(us)
            .is_some_and(|king| self.is_square_attacked(king, !us))
    }

    /// Returns true unless the side that just moved left its king attacked.
    ///
    /// This is the legality filter for pseudo-legal moves: apply the move,
    /// then discard the result if this returns false.
    pub fn is_ok(&self) -> bool {
        let mover = !self.side_to_move;
        match self.king_square(mover) {
            Some(king) => !self.is_square_attacked(king, self.side_to_move),
            None => true,
        }
    }

    /// Returns true if the bitboard views agree with the mailbox.
    pub fn is_consistent(&self) -> bool {
        let mut by_color = [Bitboard::EMPTY; 2];
        let mut by_piece_type = [Bitboard::EMPTY; 6];
        for sq in Square::all() {
            if let Some(piece) = self.piece_at(sq) {
                by_color[piece.color().index()].set(sq);
                by_piece_type[piece.piece_type().index()].set(sq);
            }
        }
        by_color == self.by_color && by_piece_type == self.by_piece_type
    }

    fn add_piece(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.piece_at(sq).is_none(), "square {} is occupied", sq);
        self.by_color[piece.color().index()].set(sq);
        self.by_piece_type[piece.piece_type().index()].set(sq);
        self.mailbox[sq.index() as usize] = Some(piece);
    }

    fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.mailbox[sq.index() as usize].take()?;
        self.by_color[piece.color().index()].clear(sq);
        self.by_piece_type[piece.piece_type().index()].clear(sq);
        Some(piece)
    }

    /// Applies a pseudo-legal move in place.
    ///
    /// The move is not checked for king safety; call [`Position::is_ok`]
    /// afterwards and discard the position if it returns false.
    ///
    /// # Panics
    /// Panics if the origin square is empty.
    pub fn make_move(&mut self, m: Move) {
        let from = m.from();
        let to = m.to();
        let flag = m.flag();
        let piece = self
            .piece_at(from)
            .unwrap_or_else(|| panic!("make_move {}: no piece on {}", m, from));
        let us = piece.color();
        debug_assert_eq!(us, self.side_to_move, "make_move {}: wrong side", m);

        self.halfmove_clock += 1;

        let captured = self.remove_piece(to);
        if flag == MoveFlag::EnPassant {
            // The captured pawn stands one step behind the target square.
            let victim = Square::nth((to.index() as i8 - us.pawn_push().offset()) as u8);
            self.remove_piece(victim);
        }

        self.remove_piece(from);
        let placed = match m.promotion_piece() {
            Some(piece_type) => Piece::new(us, piece_type),
            None => piece,
        };
        self.add_piece(to, placed);

        if flag.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(us, flag);
            if let Some(rook) = self.remove_piece(rook_from) {
                self.add_piece(rook_to, rook);
            }
        }

        self.castling.revoke_square(from);
        self.castling.revoke_square(to);

        if piece.piece_type() == PieceType::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        }

        self.en_passant = if flag == MoveFlag::DoublePush {
            Some(Square::nth((to.index() as i8 - us.pawn_push().offset()) as u8))
        } else {
            None
        };

        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = !us;
    }
}

/// Rook origin and destination for a castling move.
fn castling_rook_squares(color: Color, flag: MoveFlag) -> (Square, Square) {
    match (color, flag) {
        (Color::White, MoveFlag::KingCastle) => (Square::H1, Square::F1),
        (Color::White, _) => (Square::A1, Square::D1),
        (Color::Black, MoveFlag::KingCastle) => (Square::H8, Square::F8),
        (Color::Black, _) => (Square::A8, Square::D8),
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                match self.mailbox[(rank * 8 + file) as usize] {
                    Some(piece) => write!(f, "{} ", piece)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        writeln!(f)?;
        write!(f, "FEN: {}", self.to_fen())
    }
}
