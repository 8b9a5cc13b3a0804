//! Magic bitboard tables for sliding piece attack generation.
//!
//! Magic bitboards use a perfect hashing technique to map blocker configurations
//! to precomputed attack bitboards in O(1) time. The magic multipliers are
//! searched for at startup rather than embedded as constants.

use super::rays::Slider;
use chess_core::{Bitboard, Square};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, info};

/// Hashing parameters for a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicEntry {
    /// Mask of relevant blocker squares (excludes edges).
    pub mask: Bitboard,
    /// The magic multiplier for this square.
    pub magic: u64,
    /// Right shift amount (64 - number of bits in mask).
    pub shift: u8,
}

impl MagicEntry {
    const EMPTY: MagicEntry = MagicEntry {
        mask: Bitboard::EMPTY,
        magic: 0,
        shift: 64,
    };

    /// Maps an occupancy to its slot in this square's attack table.
    #[inline]
    pub const fn index(&self, occupancy: Bitboard) -> usize {
        ((occupancy.0 & self.mask.0).wrapping_mul(self.magic) >> self.shift) as usize
    }

    /// Number of slots this square needs.
    #[inline]
    pub const fn table_len(&self) -> usize {
        1 << (64 - self.shift as u32)
    }
}

/// xorshift64* generator used to draw magic candidates.
struct Prng(u64);

impl Prng {
    const SEED: u64 = 10_000;

    fn new(seed: u64) -> Self {
        assert_ne!(seed, 0, "xorshift seed must be non-zero");
        Prng(seed)
    }

    fn next(&mut self) -> u64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        self.0.wrapping_mul(2_685_821_657_736_338_717)
    }

    /// A candidate with roughly an eighth of its bits set.
    fn sparse(&mut self) -> u64 {
        self.next() & self.next() & self.next()
    }
}

/// Searches for a magic multiplier for `sq` and returns it together with the
/// filled attack table it indexes.
///
/// Two occupancies may share a slot only if they produce the same attacks.
/// The search always terminates for real board squares.
pub fn find_magic(sq: Square, slider: Slider) -> (MagicEntry, Vec<Bitboard>) {
    let mask = slider.relevant_mask(sq);
    let shift = (64 - mask.count()) as u8;

    let occupancies: Vec<Bitboard> = mask.subsets().collect();
    let reference: Vec<Bitboard> = occupancies
        .iter()
        .map(|&occupancy| slider.ray_attacks(sq, occupancy))
        .collect();

    // epoch[i] records the candidate that last wrote table[i], so the table
    // never needs clearing between candidates.
    let mut table = vec![Bitboard::EMPTY; occupancies.len()];
    let mut epoch = vec![0u64; occupancies.len()];
    let mut rng = Prng::new(Prng::SEED);
    let mut candidate = 0u64;

    loop {
        let magic = loop {
            let magic = rng.sparse();
            if (mask.0.wrapping_mul(magic) >> 56).count_ones() >= 6 {
                break magic;
            }
        };
        candidate += 1;

        let entry = MagicEntry { mask, magic, shift };
        let collision_free = occupancies
            .iter()
            .zip(&reference)
            .all(|(&occupancy, &attacks)| {
                let idx = entry.index(occupancy);
                if epoch[idx] < candidate {
                    epoch[idx] = candidate;
                    table[idx] = attacks;
                    true
                } else {
                    table[idx] == attacks
                }
            });

        if collision_free {
            debug!(
                "{:?} magic for {}: {:#018x} after {} candidates",
                slider, sq, magic, candidate
            );
            return (entry, table);
        }
    }
}

/// Magic entries and the dense attack array for one slider type.
pub struct SliderTable {
    entries: [MagicEntry; 64],
    offsets: [usize; 64],
    attacks: Vec<Bitboard>,
}

impl SliderTable {
    /// Runs the magic search for every square.
    pub fn build(slider: Slider) -> Self {
        let mut entries = [MagicEntry::EMPTY; 64];
        let mut offsets = [0usize; 64];
        let mut attacks = Vec::new();

        for sq in Square::all() {
            let (entry, table) = find_magic(sq, slider);
            let i = sq.index() as usize;
            entries[i] = entry;
            offsets[i] = attacks.len();
            attacks.extend_from_slice(&table);
        }

        SliderTable {
            entries,
            offsets,
            attacks,
        }
    }

    /// Looks up the attack set from `sq` for the given occupancy.
    #[inline]
    pub fn attacks(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let i = sq.index() as usize;
        self.attacks[self.offsets[i] + self.entries[i].index(occupancy)]
    }

    /// The hashing parameters for `sq`.
    #[inline]
    pub fn entry(&self, sq: Square) -> &MagicEntry {
        &self.entries[sq.index() as usize]
    }

    /// Total number of attack slots across all squares.
    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }
}

/// Stores all sliding attack tables.
pub struct AttackTables {
    bishop: SliderTable,
    rook: SliderTable,
}

impl AttackTables {
    fn build() -> Self {
        let start = Instant::now();
        let bishop = SliderTable::build(Slider::Bishop);
        let rook = SliderTable::build(Slider::Rook);
        info!(
            "attack tables ready: {} bishop and {} rook entries in {:?}",
            bishop.len(),
            rook.len(),
            start.elapsed()
        );
        AttackTables { bishop, rook }
    }

    /// The table for one slider type.
    #[inline]
    pub fn slider(&self, slider: Slider) -> &SliderTable {
        match slider {
            Slider::Bishop => &self.bishop,
            Slider::Rook => &self.rook,
        }
    }
}

static ATTACK_TABLES: OnceLock<AttackTables> = OnceLock::new();

/// Builds the attack tables. Later calls return immediately.
///
/// Lookups also build the tables on first use, so calling this is only
/// needed to move the startup cost to a known point.
pub fn init() {
    attack_tables();
}

/// Gets the global attack tables, initializing if necessary.
#[inline]
pub fn attack_tables() -> &'static AttackTables {
    ATTACK_TABLES.get_or_init(AttackTables::build)
}

/// Returns bishop attacks for a square given occupied squares.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    attack_tables().bishop.attacks(sq, occupied)
}

/// Returns rook attacks for a square given occupied squares.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    attack_tables().rook.attacks(sq, occupied)
}

/// Returns queen attacks (bishop + rook).
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{File, Rank};
    use proptest::prelude::*;

    #[test]
    fn prng_is_deterministic() {
        let mut a = Prng::new(Prng::SEED);
        let mut b = Prng::new(Prng::SEED);
        let first: Vec<u64> = (0..8).map(|_| a.next()).collect();
        let second: Vec<u64> = (0..8).map(|_| b.next()).collect();
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn sparse_draws_have_few_bits() {
        let mut rng = Prng::new(Prng::SEED);
        let total: u32 = (0..256).map(|_| rng.sparse().count_ones()).sum();
        // Three-way AND leaves about 8 of 64 bits set on average.
        assert!(total / 256 < 16);
    }

    #[test]
    fn found_magic_uses_minimal_table() {
        let d4 = Square::new(File::D, Rank::R4);
        let (entry, table) = find_magic(d4, Slider::Rook);
        assert_eq!(entry.mask, Slider::Rook.relevant_mask(d4));
        assert_eq!(entry.shift, 64 - 10);
        assert_eq!(entry.table_len(), 1 << 10);
        assert_eq!(table.len(), entry.table_len());
    }

    #[test]
    fn magic_search_is_repeatable() {
        let (first, _) = find_magic(Square::A8, Slider::Bishop);
        let (second, _) = find_magic(Square::A8, Slider::Bishop);
        assert_eq!(first, second);
    }

    #[test]
    fn table_sizes_are_dense() {
        init();
        init();
        let tables = attack_tables();
        for slider in Slider::ALL {
            let table = tables.slider(slider);
            let expected: usize = Square::all()
                .map(|sq| 1usize << slider.relevant_mask(sq).count())
                .sum();
            assert_eq!(table.len(), expected);
        }
        assert_eq!(tables.slider(Slider::Bishop).len(), 5248);
        assert_eq!(tables.slider(Slider::Rook).len(), 102_400);
    }

    #[test]
    fn every_subset_matches_ray_walker() {
        let tables = attack_tables();
        for slider in Slider::ALL {
            let table = tables.slider(slider);
            for sq in Square::all() {
                let entry = table.entry(sq);
                for occupancy in entry.mask.subsets() {
                    assert_eq!(
                        table.attacks(sq, occupancy),
                        slider.ray_attacks(sq, occupancy),
                        "{:?} on {} with {:?}",
                        slider,
                        sq,
                        occupancy
                    );
                }
            }
        }
    }

    #[test]
    fn queen_attacks_empty_board() {
        let d4 = Square::new(File::D, Rank::R4);
        assert_eq!(bishop_attacks(d4, Bitboard::EMPTY).count(), 13);
        assert_eq!(rook_attacks(d4, Bitboard::EMPTY).count(), 14);
        assert_eq!(queen_attacks(d4, Bitboard::EMPTY).count(), 27);
    }

    proptest! {
        #[test]
        fn lookup_ignores_irrelevant_bits(index in 0u8..64, occupancy in any::<u64>()) {
            let sq = Square::nth(index);
            let occupancy = Bitboard(occupancy);
            prop_assert_eq!(bishop_attacks(sq, occupancy), Slider::Bishop.ray_attacks(sq, occupancy));
            prop_assert_eq!(rook_attacks(sq, occupancy), Slider::Rook.ray_attacks(sq, occupancy));
        }
    }
}
