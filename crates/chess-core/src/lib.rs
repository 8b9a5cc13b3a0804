//! Core types for chess.
//!
//! This crate provides the fundamental types shared by the move generator
//! and the perft tooling:
//! - [`Bitboard`] and [`Direction`] for set-of-squares arithmetic
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`PieceType`], [`Piece`], and [`Color`] for piece representation
//! - [`Move`] for the packed 16-bit move encoding
//! - FEN parsing and serialization

mod bitboard;
mod color;
mod direction;
mod fen;
mod mov;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter, Subsets};
pub use color::Color;
pub use direction::Direction;
pub use fen::{Fen, FenError, STARTPOS};
pub use mov::{Move, MoveFlag};
pub use piece::{Piece, PieceType};
pub use square::{File, Rank, Square};
