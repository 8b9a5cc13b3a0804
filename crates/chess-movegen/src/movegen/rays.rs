//! Occupancy-independent attack sets and the slow ray walker.
//!
//! Everything here is computed by stepping bitboards one square at a time,
//! so it never depends on the magic tables. The magic search uses it as the
//! reference and the tests verify the tables against it.

use chess_core::{Bitboard, Direction, Square};

/// Knight attacks for every square.
pub const KNIGHT_ATTACKS: [Bitboard; 64] = compute_knight_attacks();

/// King attacks for every square.
pub const KING_ATTACKS: [Bitboard; 64] = compute_king_attacks();

const fn knight_from(bb: Bitboard) -> Bitboard {
    let north = bb.shift(Direction::North).shift(Direction::North);
    let south = bb.shift(Direction::South).shift(Direction::South);
    let east = bb.shift(Direction::East).shift(Direction::East);
    let west = bb.shift(Direction::West).shift(Direction::West);
    Bitboard(
        north.shift(Direction::East).0
            | north.shift(Direction::West).0
            | south.shift(Direction::East).0
            | south.shift(Direction::West).0
            | east.shift(Direction::North).0
            | east.shift(Direction::South).0
            | west.shift(Direction::North).0
            | west.shift(Direction::South).0,
    )
}

const fn king_from(bb: Bitboard) -> Bitboard {
    let mut attacks = 0u64;
    let mut i = 0;
    while i < Direction::ALL.len() {
        attacks |= bb.shift(Direction::ALL[i]).0;
        i += 1;
    }
    Bitboard(attacks)
}

const fn compute_knight_attacks() -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        table[sq as usize] = knight_from(Square::nth(sq).bitboard());
        sq += 1;
    }
    table
}

const fn compute_king_attacks() -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        table[sq as usize] = king_from(Square::nth(sq).bitboard());
        sq += 1;
    }
    table
}

/// The two sliding movement patterns. Queens are the union of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slider {
    Bishop,
    Rook,
}

impl Slider {
    pub const ALL: [Slider; 2] = [Slider::Bishop, Slider::Rook];

    /// The four directions this slider moves along.
    #[inline]
    pub const fn directions(self) -> [Direction; 4] {
        match self {
            Slider::Bishop => Direction::DIAGONAL,
            Slider::Rook => Direction::ORTHOGONAL,
        }
    }

    /// Squares whose occupancy can change the attack set from `sq`.
    ///
    /// Each ray stops one square short of the board edge: the last square
    /// of a ray is attacked whether or not something stands on it.
    pub const fn relevant_mask(self, sq: Square) -> Bitboard {
        let dirs = self.directions();
        let mut mask = 0u64;
        let mut i = 0;
        while i < dirs.len() {
            let mut ray = sq.bitboard().shift(dirs[i]);
            loop {
                let next = ray.shift(dirs[i]);
                if next.is_empty() {
                    break;
                }
                mask |= ray.0;
                ray = next;
            }
            i += 1;
        }
        Bitboard(mask)
    }

    /// Walks every ray from `sq`, stopping on (and including) the first
    /// occupied square.
    pub const fn ray_attacks(self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let dirs = self.directions();
        let mut attacks = 0u64;
        let mut i = 0;
        while i < dirs.len() {
            let mut ray = sq.bitboard().shift(dirs[i]);
            while ray.is_not_empty() {
                attacks |= ray.0;
                if ray.0 & occupancy.0 != 0 {
                    break;
                }
                ray = ray.shift(dirs[i]);
            }
            i += 1;
        }
        Bitboard(attacks)
    }
}
