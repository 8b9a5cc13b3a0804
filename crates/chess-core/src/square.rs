//! Board coordinates.
//!
//! Squares use little-endian rank-file numbering: a1 = 0, h1 = 7, a8 = 56,
//! h8 = 63. Bit `n` of a [`Bitboard`] is square `n`.

use crate::{Bitboard, Direction};
use std::fmt;

/// A file (column), A to H.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl File {
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Accepts `a`-`h` in either case.
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        if !c.is_ascii() {
            return None;
        }
        Self::from_index((c.to_ascii_lowercase() as u8).wrapping_sub(b'a'))
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }

    /// Every square on this file.
    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard(Bitboard::FILE_A.0 << self as u8)
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A rank (row), 1 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
    ];

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Accepts `1`-`8`.
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        if !c.is_ascii() {
            return None;
        }
        Self::from_index((c as u8).wrapping_sub(b'1'))
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }

    /// Every square on this rank.
    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard(Bitboard::RANK_1.0 << (8 * self as u8))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// One of the 64 board squares.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Square(rank.index() * 8 + file.index())
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Square number `index`, for callers that derived it from another square.
    ///
    /// # Panics
    /// Panics if the index is 64 or larger.
    #[inline]
    pub const fn nth(index: u8) -> Self {
        assert!(index < 64, "square index out of range");
        Square(index)
    }

    /// a1, b1, ..., h8.
    pub fn all() -> impl DoubleEndedIterator<Item = Square> + ExactSizeIterator {
        (0..64).map(Square)
    }

    /// Parses two-character coordinates such as `e4`.
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let &[f, r] = s.as_bytes() else {
            return None;
        };
        match (File::from_char(f as char), Rank::from_char(r as char)) {
            (Some(file), Some(rank)) => Some(Square::new(file, rank)),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn file(self) -> File {
        File::ALL[(self.0 & 7) as usize]
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 >> 3) as usize]
    }

    pub fn to_algebraic(self) -> String {
        self.to_string()
    }

    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard(1u64 << self.0)
    }

    /// The neighbour in `dir`, or `None` off the board edge.
    #[inline]
    pub const fn step(self, dir: Direction) -> Option<Square> {
        self.bitboard().shift(dir).lsb()
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn coordinates_of_named_squares() {
        assert_eq!(Square::A1.index(), 0);
        assert_eq!(Square::H1.index(), 7);
        assert_eq!(Square::A8.index(), 56);
        assert_eq!(Square::H8.index(), 63);

        let e4 = Square::new(File::E, Rank::R4);
        assert_eq!(e4.index(), 28);
        assert_eq!((e4.file(), e4.rank()), (File::E, Rank::R4));
    }

    #[test]
    fn algebraic_text() {
        assert_eq!(Square::from_algebraic("e4"), Some(Square::new(File::E, Rank::R4)));
        assert_eq!(Square::from_algebraic("H8"), Some(Square::H8));
        assert_eq!(Square::E1.to_string(), "e1");
        assert_eq!(format!("{:?}", Square::G8), "Square(g8)");

        for bad in ["", "e", "e44", "i1", "a0", "a9", "é4", "4e"] {
            assert_eq!(Square::from_algebraic(bad), None, "{}", bad);
        }
    }

    #[test]
    fn file_and_rank_text() {
        assert_eq!(File::from_char('C'), Some(File::C));
        assert_eq!(File::from_char('`'), None);
        assert_eq!(Rank::from_char('0'), None);
        assert_eq!(Rank::from_char('8'), Some(Rank::R8));
        assert_eq!(File::from_index(8), None);
        assert_eq!(Rank::from_index(7), Some(Rank::R8));
    }

    #[test]
    fn line_masks_cross_at_one_square() {
        assert_eq!(File::A.bitboard(), Bitboard::FILE_A);
        assert_eq!(File::H.bitboard(), Bitboard::FILE_H);
        assert_eq!(Rank::R2.bitboard(), Bitboard::RANK_2);
        assert_eq!(Rank::R7.bitboard(), Bitboard::RANK_7);
        for sq in Square::all() {
            assert_eq!(sq.file().bitboard() & sq.rank().bitboard(), sq.bitboard());
        }
    }

    #[test]
    fn steps_stop_at_the_edge() {
        let e4 = Square::new(File::E, Rank::R4);
        assert_eq!(e4.step(Direction::North), Some(Square::new(File::E, Rank::R5)));
        assert_eq!(e4.step(Direction::SouthWest), Some(Square::new(File::D, Rank::R3)));
        assert_eq!(Square::H1.step(Direction::East), None);
        assert_eq!(Square::H1.step(Direction::NorthEast), None);
        assert_eq!(Square::A8.step(Direction::NorthWest), None);
        assert_eq!(Square::A8.step(Direction::West), None);
    }

    #[test]
    fn all_is_ordered() {
        let squares: Vec<Square> = Square::all().collect();
        assert_eq!(squares.len(), 64);
        assert!(squares.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Square::all().next_back(), Some(Square::H8));
    }

    #[test]
    #[should_panic(expected = "square index out of range")]
    fn nth_out_of_range() {
        let _ = Square::nth(64);
    }

    proptest! {
        #[test]
        fn index_decomposes_into_file_and_rank(index in 0u8..64) {
            let sq = Square::nth(index);
            prop_assert_eq!(Square::new(sq.file(), sq.rank()), sq);
            prop_assert_eq!(Square::from_algebraic(&sq.to_algebraic()), Some(sq));
            prop_assert_eq!(sq.bitboard().count(), 1);
        }

        #[test]
        fn from_index_rejects_out_of_range(index in 64u8..=255) {
            prop_assert_eq!(Square::from_index(index), None);
        }
    }
}
