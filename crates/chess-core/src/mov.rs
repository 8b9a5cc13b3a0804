//! Move representation.

use crate::{PieceType, Square};
use std::fmt;

/// The four-bit move kind stored in the top of a [`Move`].
///
/// Bit `0b0100` marks a capture and bit `0b1000` marks a promotion; for
/// promotions the low two bits select the promoted piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Non-capturing move with no side effect.
    Quiet = 0b0000,
    /// Pawn double push from its starting rank.
    DoublePush = 0b0001,
    /// Kingside castling (O-O).
    KingCastle = 0b0010,
    /// Queenside castling (O-O-O).
    QueenCastle = 0b0011,
    /// Ordinary capture.
    Capture = 0b0100,
    /// En passant capture.
    EnPassant = 0b0101,
    PromoteKnight = 0b1000,
    PromoteBishop = 0b1001,
    PromoteRook = 0b1010,
    PromoteQueen = 0b1011,
    PromoteKnightCapture = 0b1100,
    PromoteBishopCapture = 0b1101,
    PromoteRookCapture = 0b1110,
    PromoteQueenCapture = 0b1111,
}

impl MoveFlag {
    const CAPTURE_BIT: u8 = 0b0100;
    const PROMOTION_BIT: u8 = 0b1000;

    /// Decodes a four-bit flag. Codes 6 and 7 are unused.
    #[inline]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0b0000 => Some(MoveFlag::Quiet),
            0b0001 => Some(MoveFlag::DoublePush),
            0b0010 => Some(MoveFlag::KingCastle),
            0b0011 => Some(MoveFlag::QueenCastle),
            0b0100 => Some(MoveFlag::Capture),
            0b0101 => Some(MoveFlag::EnPassant),
            0b1000 => Some(MoveFlag::PromoteKnight),
            0b1001 => Some(MoveFlag::PromoteBishop),
            0b1010 => Some(MoveFlag::PromoteRook),
            0b1011 => Some(MoveFlag::PromoteQueen),
            0b1100 => Some(MoveFlag::PromoteKnightCapture),
            0b1101 => Some(MoveFlag::PromoteBishopCapture),
            0b1110 => Some(MoveFlag::PromoteRookCapture),
            0b1111 => Some(MoveFlag::PromoteQueenCapture),
            _ => None,
        }
    }

    /// Builds the promotion flag for the given piece, with or without capture.
    ///
    /// Returns `None` for pawns and kings.
    #[inline]
    pub const fn promotion(piece: PieceType, capture: bool) -> Option<Self> {
        let base = match piece {
            PieceType::Knight => 0,
            PieceType::Bishop => 1,
            PieceType::Rook => 2,
            PieceType::Queen => 3,
            PieceType::Pawn | PieceType::King => return None,
        };
        let capture_bit = if capture { Self::CAPTURE_BIT } else { 0 };
        Self::from_bits(Self::PROMOTION_BIT | capture_bit | base)
    }

    /// Returns the raw four-bit code.
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Returns true for captures, including en passant and capturing promotions.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self as u8 & Self::CAPTURE_BIT != 0
    }

    /// Returns true if this is a promotion move.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        self as u8 & Self::PROMOTION_BIT != 0
    }

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceType> {
        if self.is_promotion() {
            PieceType::from_index((self as u8 & 0b11) + 1)
        } else {
            None
        }
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::KingCastle | MoveFlag::QueenCastle)
    }
}

/// A chess move.
///
/// Encoded in 16 bits as `flag << 12 | from << 6 | to`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// A null move (used as placeholder, never generated).
    pub const NULL: Move = Move(0);

    /// Creates a new move.
    #[inline]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        let encoded =
            ((flag as u16) << 12) | ((from.index() as u16) << 6) | (to.index() as u16);
        Move(encoded)
    }

    /// Creates a quiet move.
    #[inline]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Quiet)
    }

    /// Returns the raw 16-bit encoding.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        Square::nth(((self.0 >> 6) & 0x3F) as u8)
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        Square::nth((self.0 & 0x3F) as u8)
    }

    /// Returns the move flag.
    #[inline]
    pub const fn flag(self) -> MoveFlag {
        match MoveFlag::from_bits((self.0 >> 12) as u8) {
            Some(flag) => flag,
            // Only reachable through a hand-built encoding with codes 6 or 7.
            None => MoveFlag::Quiet,
        }
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flag().is_capture()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.flag().is_promotion()
    }

    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceType> {
        self.flag().promotion_piece()
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match self.promotion_piece() {
            Some(piece) => format!("{}{}{}", self.from(), self.to(), piece.to_char()),
            None => format!("{}{}", self.from(), self.to()),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?})", self.to_uci(), self.flag())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
