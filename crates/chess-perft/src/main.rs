//! chess-perft - counts move-generation leaf nodes.
//!
//! `perft` counts a single position, optionally after a sequence of moves,
//! and `suite` checks a TOML file of reference counts.

mod config;
mod suite;

use anyhow::{bail, ensure, Context, Result};
use chess_movegen::{
    find_uci_move, perft, perft_divide_parallel, perft_parallel, split_perft, Position,
};
use clap::{Parser, Subcommand};
use config::SuiteConfig;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "chess-perft")]
#[command(about = "Perft node counter for the bitboard move generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count leaf nodes below one position
    Perft {
        /// Position to start from (defaults to the initial position)
        #[arg(long)]
        fen: Option<String>,
        /// Moves in coordinate notation applied before counting
        #[arg(long, num_args = 1..)]
        moves: Vec<String>,
        /// Search depth in plies
        #[arg(short, long)]
        depth: u32,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
        /// Spread root moves across all cores
        #[arg(long)]
        parallel: bool,
    },
    /// Check a suite of reference counts
    Suite {
        /// Suite file (defaults to the bundled standard suite)
        path: Option<PathBuf>,
        /// Skip depths deeper than this
        #[arg(long)]
        max_depth: Option<u32>,
        /// Spread root moves across all cores
        #[arg(long)]
        parallel: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    chess_movegen::init();

    match cli.command {
        Commands::Perft {
            fen,
            moves,
            depth,
            divide,
            parallel,
        } => {
            let position = setup_position(fen.as_deref(), &moves)?;
            run_perft(&position, depth, divide, parallel)
        }
        Commands::Suite {
            path,
            max_depth,
            parallel,
        } => {
            let suite = match &path {
                Some(path) => SuiteConfig::load(path)
                    .with_context(|| format!("Failed to load suite {}", path.display()))?,
                None => SuiteConfig::standard(),
            };
            tracing::info!("Running {} suite positions", suite.positions.len());

            let start = Instant::now();
            let report = suite::run_suite(&suite, max_depth, parallel)?;
            let elapsed = start.elapsed();

            if !report.passed() {
                for m in &report.mismatches {
                    tracing::error!(
                        "{} depth {}: expected {}, got {}",
                        m.name,
                        m.depth,
                        m.expected,
                        m.actual
                    );
                }
                bail!(
                    "{} of {} checks failed",
                    report.mismatches.len(),
                    report.checked
                );
            }

            tracing::info!(
                "All {} checks passed: {} nodes in {:.3}s ({} nps)",
                report.checked,
                report.nodes,
                elapsed.as_secs_f64(),
                nodes_per_second(report.nodes, elapsed)
            );
            Ok(())
        }
    }
}

/// Builds the starting position and plays `moves` on it.
fn setup_position(fen: Option<&str>, moves: &[String]) -> Result<Position> {
    let mut position = match fen {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("Invalid FEN '{}'", fen))?,
        None => Position::startpos(),
    };
    for text in moves {
        let m = find_uci_move(&position, text)
            .with_context(|| format!("Cannot play '{}' in {}", text, position.to_fen()))?;
        position.make_move(m);
    }
    Ok(position)
}

fn run_perft(position: &Position, depth: u32, divide: bool, parallel: bool) -> Result<()> {
    ensure!(!divide || depth > 0, "--divide needs a depth of at least 1");
    tracing::info!("perft {} on {}", depth, position.to_fen());

    let start = Instant::now();
    let nodes = if divide {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let total = if parallel {
            let mut total = 0;
            for (m, count) in perft_divide_parallel(position, depth) {
                writeln!(out, "{} {}", m, count)?;
                total += count;
            }
            total
        } else {
            split_perft(position, depth, &mut out)?
        };
        writeln!(out)?;
        writeln!(out, "Nodes searched: {}", total)?;
        total
    } else if parallel {
        perft_parallel(position, depth)
    } else {
        perft(position, depth)
    };
    let elapsed = start.elapsed();

    if !divide {
        println!("{}", nodes);
    }
    tracing::info!(
        "{} nodes in {:.3}s ({} nps)",
        nodes,
        elapsed.as_secs_f64(),
        nodes_per_second(nodes, elapsed)
    );
    Ok(())
}

fn nodes_per_second(nodes: u64, elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        (nodes as f64 / secs) as u64
    } else {
        nodes
    }
}
