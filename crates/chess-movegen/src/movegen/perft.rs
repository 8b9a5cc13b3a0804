//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::generate_moves;
use crate::Position;
use chess_core::Move;
use rayon::prelude::*;
use std::io::{self, Write};

/// Counts the number of leaf nodes at the given depth.
///
/// Each pseudo-legal move is applied to a copy of the position and dropped
/// if it leaves the mover's king attacked.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(position);
    let mut nodes = 0u64;
    for &m in &moves {
        let mut next = *position;
        next.make_move(m);
        if next.is_ok() {
            nodes += perft(&next, depth - 1);
        }
    }
    nodes
}

/// Legal root moves paired with the positions they lead to.
fn legal_children(position: &Position) -> Vec<(Move, Position)> {
    generate_moves(position)
        .iter()
        .filter_map(|&m| {
            let mut next = *position;
            next.make_move(m);
            next.is_ok().then_some((m, next))
        })
        .collect()
}

/// Perft with divide - node count below each legal root move, sorted by
/// move text. Useful for localizing a wrong total.
///
/// # Panics
/// Panics if `depth` is 0.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(Move, u64)> {
    assert!(depth > 0, "perft divide needs a depth of at least 1");
    let mut results: Vec<(Move, u64)> = legal_children(position)
        .into_iter()
        .map(|(m, next)| (m, perft(&next, depth - 1)))
        .collect();
    results.sort_by_cached_key(|(m, _)| m.to_uci());
    results
}

/// [`perft_divide`] with the root moves spread across the rayon pool.
///
/// # Panics
/// Panics if `depth` is 0.
pub fn perft_divide_parallel(position: &Position, depth: u32) -> Vec<(Move, u64)> {
    assert!(depth > 0, "perft divide needs a depth of at least 1");
    let mut results: Vec<(Move, u64)> = legal_children(position)
        .into_par_iter()
        .map(|(m, next)| (m, perft(&next, depth - 1)))
        .collect();
    results.sort_by_cached_key(|(m, _)| m.to_uci());
    results
}

/// Writes one `"<move> <nodes>"` line per legal root move and returns the
/// total node count.
pub fn split_perft<W: Write>(position: &Position, depth: u32, out: &mut W) -> io::Result<u64> {
    let mut total = 0;
    for (m, nodes) in perft_divide(position, depth) {
        writeln!(out, "{} {}", m, nodes)?;
        total += nodes;
    }
    Ok(total)
}

/// Same count as [`perft`], with each legal root move searched on its own
/// rayon worker.
pub fn perft_parallel(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    legal_children(position)
        .into_par_iter()
        .map(|(_, next)| perft(&next, depth - 1))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn perft_depth_zero_is_one() {
        assert_eq!(perft(&Position::startpos(), 0), 1);
        assert_eq!(perft_parallel(&Position::startpos(), 0), 1);
    }

    #[test]
    fn perft_startpos_shallow() {
        let position = Position::startpos();
        assert_eq!(perft(&position, 1), 20);
        assert_eq!(perft(&position, 2), 400);
        assert_eq!(perft(&position, 3), 8902);
    }

    #[test]
    fn perft_divide_works() {
        let position = Position::startpos();
        let results = perft_divide(&position, 1);
        assert_eq!(results.len(), 20);
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 20);
        assert_eq!(results[0].0.to_uci(), "a2a3");
    }

    #[test]
    fn perft_divide_sums_to_perft() {
        let position = Position::from_fen(KIWIPETE).unwrap();
        let results = perft_divide(&position, 2);
        assert_eq!(results.len(), 48);
        assert_eq!(results.iter().map(|(_, n)| n).sum::<u64>(), 2039);
        assert_eq!(perft_divide_parallel(&position, 2), results);
    }

    #[test]
    fn split_perft_output() {
        let position = Position::startpos();
        let mut out = Vec::new();
        let total = split_perft(&position, 2, &mut out).unwrap();
        assert_eq!(total, 400);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 20);
        assert!(lines.contains(&"e2e4 20"));
        assert!(lines.contains(&"g1f3 20"));
    }

    #[test]
    fn perft_parallel_matches_serial() {
        let position = Position::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft_parallel(&position, 2), perft(&position, 2));
    }

    #[test]
    #[should_panic(expected = "at least 1")]
    fn perft_divide_rejects_depth_zero() {
        perft_divide(&Position::startpos(), 0);
    }

    #[test]
    #[should_panic(expected = "at least 1")]
    fn perft_divide_parallel_rejects_depth_zero() {
        perft_divide_parallel(&Position::startpos(), 0);
    }
}
