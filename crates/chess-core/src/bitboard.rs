//! Sets of squares packed into a `u64`.
//!
//! Bit `n` stands for square `n` (a1 = 0, h8 = 63), so set algebra on squares
//! is plain integer bit arithmetic.

use crate::{Direction, Square};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(u64::MAX);

    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_H: Bitboard = Bitboard(Self::FILE_A.0 << 7);

    pub const RANK_1: Bitboard = Bitboard(0xFF);
    pub const RANK_2: Bitboard = Bitboard(Self::RANK_1.0 << 8);
    pub const RANK_7: Bitboard = Bitboard(Self::RANK_1.0 << 48);
    pub const RANK_8: Bitboard = Bitboard(Self::RANK_1.0 << 56);

    #[inline]
    pub const fn new(bits: u64) -> Self {
        Bitboard(bits)
    }

    #[inline]
    pub const fn from_square(sq: Square) -> Self {
        sq.bitboard()
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Population count.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & sq.bitboard().0 != 0
    }

    #[inline]
    pub fn set(&mut self, sq: Square) {
        *self |= sq.bitboard();
    }

    #[inline]
    pub fn clear(&mut self, sq: Square) {
        *self &= !sq.bitboard();
    }

    #[inline]
    pub fn toggle(&mut self, sq: Square) {
        *self ^= sq.bitboard();
    }

    /// Lowest-numbered member.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        match self.0 {
            0 => None,
            bits => Some(Square::nth(bits.trailing_zeros() as u8)),
        }
    }

    /// Highest-numbered member.
    #[inline]
    pub const fn msb(self) -> Option<Square> {
        match self.0 {
            0 => None,
            bits => Some(Square::nth(63 - bits.leading_zeros() as u8)),
        }
    }

    /// Removes and returns the lowest-numbered member.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    /// Moves every member one step in `dir`.
    ///
    /// Members that would cross the A/H edge or leave the board are dropped.
    #[inline]
    pub const fn shift(self, dir: Direction) -> Bitboard {
        const NOT_A: u64 = !Bitboard::FILE_A.0;
        const NOT_H: u64 = !Bitboard::FILE_H.0;
        let b = self.0;
        Bitboard(match dir {
            Direction::North => b << 8,
            Direction::South => b >> 8,
            Direction::East => (b & NOT_H) << 1,
            Direction::West => (b & NOT_A) >> 1,
            Direction::NorthEast => (b & NOT_H) << 9,
            Direction::NorthWest => (b & NOT_A) << 7,
            Direction::SouthEast => (b & NOT_H) >> 7,
            Direction::SouthWest => (b & NOT_A) >> 9,
        })
    }

    /// Every subset of this set, starting with the empty one.
    #[inline]
    pub const fn subsets(self) -> Subsets {
        Subsets {
            mask: self.0,
            next: Some(0),
        }
    }
}

macro_rules! impl_bit_op {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident) => {
        impl $op for Bitboard {
            type Output = Bitboard;

            #[inline]
            fn $method(self, rhs: Bitboard) -> Bitboard {
                Bitboard($op::$method(self.0, rhs.0))
            }
        }

        impl $assign for Bitboard {
            #[inline]
            fn $assign_method(&mut self, rhs: Bitboard) {
                $assign::$assign_method(&mut self.0, rhs.0);
            }
        }
    };
}

impl_bit_op!(BitAnd, bitand, BitAndAssign, bitand_assign);
impl_bit_op!(BitOr, bitor, BitOrAssign, bitor_assign);
impl_bit_op!(BitXor, bitxor, BitXorAssign, bitxor_assign);

impl Not for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard({:#018x})", self.0)?;
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let mark = if self.contains(Square::nth(rank * 8 + file)) { 'X' } else { '.' };
                write!(f, "{} ", mark)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

/// Members of a bitboard, lowest first.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        self.0.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    #[inline]
    fn into_iter(self) -> BitboardIter {
        BitboardIter(self)
    }
}

/// Carry-rippler walk over the subsets of a mask: `next = (cur - mask) & mask`
/// until it wraps back to zero. Yields exactly `2^popcount(mask)` sets.
pub struct Subsets {
    mask: u64,
    next: Option<u64>,
}

impl Iterator for Subsets {
    type Item = Bitboard;

    #[inline]
    fn next(&mut self) -> Option<Bitboard> {
        let current = self.next?;
        let following = current.wrapping_sub(self.mask) & self.mask;
        self.next = (following != 0).then_some(following);
        Some(Bitboard(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    fn bb(names: &[&str]) -> Bitboard {
        names.iter().fold(Bitboard::EMPTY, |acc, name| {
            acc | Square::from_algebraic(name).unwrap().bitboard()
        })
    }

    #[test]
    fn constants() {
        assert_eq!(Bitboard::FILE_H, File::H.bitboard());
        assert_eq!(Bitboard::RANK_7, Rank::R7.bitboard());
        assert_eq!(Bitboard::FULL.count(), 64);
        assert_eq!((Bitboard::FILE_A | Bitboard::RANK_8).count(), 15);
        assert_eq!(!Bitboard::FULL, Bitboard::EMPTY);
    }

    #[test]
    fn membership_edits() {
        let mut b = Bitboard::from_square(Square::C1);
        b.set(Square::F8);
        assert_eq!(b, bb(&["c1", "f8"]));
        b.toggle(Square::C1);
        b.toggle(Square::A1);
        assert_eq!(b, bb(&["a1", "f8"]));
        b.clear(Square::F8);
        b.clear(Square::H8);
        assert_eq!(b, bb(&["a1"]));
        assert!(b.contains(Square::A1) && !b.contains(Square::B1));
    }

    #[test]
    fn lowest_and_highest_members() {
        let b = bb(&["c1", "f8", "d4"]);
        assert_eq!(b.lsb(), Some(Square::C1));
        assert_eq!(b.msb(), Some(Square::F8));
        assert_eq!(Bitboard::EMPTY.lsb(), None);
        assert_eq!(Bitboard::EMPTY.msb(), None);

        let mut b = b;
        let popped: Vec<String> = std::iter::from_fn(|| b.pop_lsb())
            .map(|s| s.to_string())
            .collect();
        assert_eq!(popped, ["c1", "d4", "f8"]);
        assert!(b.is_empty());
    }

    #[test]
    fn shift_moves_every_member() {
        let b = bb(&["a1", "d4", "h5"]);
        assert_eq!(b.shift(Direction::North), bb(&["a2", "d5", "h6"]));
        assert_eq!(b.shift(Direction::East), bb(&["b1", "e4"]));
        assert_eq!(b.shift(Direction::West), bb(&["c4", "g5"]));
        assert_eq!(b.shift(Direction::SouthEast), bb(&["e3"]));
        assert_eq!(b.shift(Direction::NorthWest), bb(&["c5", "g6"]));
    }

    #[test]
    fn shift_never_wraps() {
        for dir in [Direction::East, Direction::NorthEast, Direction::SouthEast] {
            assert!(Bitboard::FILE_H.shift(dir).is_empty());
        }
        for dir in [Direction::West, Direction::NorthWest, Direction::SouthWest] {
            assert!(Bitboard::FILE_A.shift(dir).is_empty());
        }
        assert!(Bitboard::RANK_8.shift(Direction::North).is_empty());
        assert_eq!(Bitboard::FULL.shift(Direction::South).count(), 56);
    }

    #[test]
    fn iterates_in_square_order() {
        let squares: Vec<Square> = Bitboard::RANK_2.into_iter().collect();
        assert_eq!(squares.len(), 8);
        assert_eq!(squares.first().map(|s| s.to_string()), Some("a2".to_string()));
        assert_eq!(squares.last().map(|s| s.to_string()), Some("h2".to_string()));
        assert_eq!(Bitboard::FILE_A.into_iter().len(), 8);
    }

    #[test]
    fn debug_draws_a_grid() {
        let text = format!("{:?}", bb(&["a1", "h8"]));
        assert!(text.starts_with("Bitboard(0x8000000000000001)"));
        assert!(text.contains("8 . . . . . . . X"));
        assert!(text.contains("1 X . . . . . . ."));
    }

    #[test]
    fn subsets_of_empty_mask() {
        assert_eq!(Bitboard::EMPTY.subsets().collect::<Vec<_>>(), vec![Bitboard::EMPTY]);
    }

    #[test]
    fn subsets_are_exhaustive_and_distinct() {
        let mask = bb(&["c1", "c2", "e2", "f2", "d8"]);
        let mut subsets: Vec<u64> = mask.subsets().map(|b| b.0).collect();
        assert_eq!(subsets.len(), 32);
        assert_eq!(subsets[0], 0);
        assert_eq!(subsets.last(), Some(&mask.0));
        assert!(subsets.iter().all(|s| s & !mask.0 == 0));
        subsets.sort_unstable();
        subsets.dedup();
        assert_eq!(subsets.len(), 32);
    }
}
