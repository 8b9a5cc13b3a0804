//! Runs a perft suite and collects mismatches.

use crate::config::{SuiteConfig, SuiteEntry};
use anyhow::{Context, Result};
use chess_movegen::{perft, perft_parallel, Position};
use std::time::Instant;

/// A depth whose count disagreed with the suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub name: String,
    pub depth: u32,
    pub expected: u64,
    pub actual: u64,
}

/// Outcome of a suite run.
#[derive(Debug, Default)]
pub struct SuiteReport {
    /// Number of (position, depth) pairs counted.
    pub checked: usize,
    /// Total leaves counted across all checks.
    pub nodes: u64,
    pub mismatches: Vec<Mismatch>,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Counts every entry at every depth it lists, up to `max_depth` if given.
pub fn run_suite(suite: &SuiteConfig, max_depth: Option<u32>, parallel: bool) -> Result<SuiteReport> {
    let mut report = SuiteReport::default();
    for entry in &suite.positions {
        run_entry(entry, max_depth, parallel, &mut report)?;
    }
    Ok(report)
}

fn run_entry(
    entry: &SuiteEntry,
    max_depth: Option<u32>,
    parallel: bool,
    report: &mut SuiteReport,
) -> Result<()> {
    let position = Position::from_fen(&entry.fen)
        .with_context(|| format!("Failed to set up position '{}'", entry.name))?;
    let limit = max_depth.map_or(entry.max_depth(), |d| d.min(entry.max_depth()));

    for (depth, &expected) in (1..=limit).zip(&entry.nodes) {
        let start = Instant::now();
        let actual = if parallel {
            perft_parallel(&position, depth)
        } else {
            perft(&position, depth)
        };
        let elapsed = start.elapsed();

        report.checked += 1;
        report.nodes += actual;

        if actual == expected {
            tracing::info!(
                "{} depth {}: {} nodes in {:.3}s",
                entry.name,
                depth,
                actual,
                elapsed.as_secs_f64()
            );
        } else {
            tracing::warn!(
                "{} depth {}: expected {} nodes, counted {}",
                entry.name,
                depth,
                expected,
                actual
            );
            report.mismatches.push(Mismatch {
                name: entry.name.clone(),
                depth,
                expected,
                actual,
            });
        }
    }
    Ok(())
}
