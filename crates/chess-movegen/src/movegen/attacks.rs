//! Attack lookups for all piece types.

use super::rays::{KING_ATTACKS, KNIGHT_ATTACKS};
use chess_core::{Bitboard, Color, Direction, PieceType, Square};

pub use super::magics::{bishop_attacks, init, queen_attacks, rook_attacks};

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns every square attacked by a set of pawns of the given color.
///
/// Both diagonals are always included; the caller filters them against
/// enemy pieces or the en passant target.
#[inline]
pub fn pawn_attacks(pawns: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => pawns.shift(Direction::NorthEast) | pawns.shift(Direction::NorthWest),
        Color::Black => pawns.shift(Direction::SouthEast) | pawns.shift(Direction::SouthWest),
    }
}

/// Attacks of a non-pawn piece on `sq` given the board occupancy.
///
/// # Panics
/// Panics for pawns, whose attacks depend on color.
#[inline]
pub fn piece_attacks(piece_type: PieceType, sq: Square, occupied: Bitboard) -> Bitboard {
    match piece_type {
        PieceType::Knight => knight_attacks(sq),
        PieceType::Bishop => bishop_attacks(sq, occupied),
        PieceType::Rook => rook_attacks(sq, occupied),
        PieceType::Queen => queen_attacks(sq, occupied),
        PieceType::King => king_attacks(sq),
        PieceType::Pawn => panic!("pawn attacks need a color, use pawn_attacks"),
    }
}
