//! Perft suite loading.
//!
//! A suite is a TOML file of `[[position]]` tables, each naming a FEN and the
//! expected leaf counts for depth 1, 2, and so on.

use chess_core::FenError;
use chess_movegen::Position;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// The suite bundled with the binary, used when no path is given.
pub const STANDARD_SUITE: &str = include_str!("../suites/standard.toml");

/// Errors that can occur when loading or validating a suite.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the suite file from disk.
    #[error("Failed to read suite file: {0}")]
    ReadError(#[from] std::io::Error),
    /// The file is not valid TOML, or does not have the suite layout.
    #[error("Failed to parse suite: {0}")]
    ParseError(#[from] toml::de::Error),
    /// An entry's FEN could not be set up.
    #[error("Position '{name}' has an invalid FEN: {source}")]
    InvalidFen {
        name: String,
        #[source]
        source: FenError,
    },
    /// An entry lists no expected counts.
    #[error("Position '{0}' has no expected node counts")]
    NoNodeCounts(String),
}

/// One position of a suite.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SuiteEntry {
    pub name: String,
    pub fen: String,
    /// Expected leaf counts; index 0 is depth 1.
    pub nodes: Vec<u64>,
}

impl SuiteEntry {
    /// Depth of the deepest expected count.
    pub fn max_depth(&self) -> u32 {
        self.nodes.len() as u32
    }
}

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct SuiteConfig {
    #[serde(default, rename = "position")]
    pub positions: Vec<SuiteEntry>,
}

impl SuiteConfig {
    /// Reads and validates a suite file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read, and
    /// otherwise whatever [`SuiteConfig::parse`] reports.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses suite text and checks that every entry can be set up.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: SuiteConfig = toml::from_str(content)?;
        for entry in &config.positions {
            if entry.nodes.is_empty() {
                return Err(ConfigError::NoNodeCounts(entry.name.clone()));
            }
            Position::from_fen(&entry.fen).map_err(|source| ConfigError::InvalidFen {
                name: entry.name.clone(),
                source,
            })?;
        }
        Ok(config)
    }

    /// The bundled standard suite.
    pub fn standard() -> Self {
        Self::parse(STANDARD_SUITE).expect("bundled suite is valid")
    }
}
