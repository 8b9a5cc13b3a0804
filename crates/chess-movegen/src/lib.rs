//! Bitboard move generation with magic sliding-piece tables.
//!
//! This crate provides:
//! - [`Position`] - board state kept as color bitboards, piece-type bitboards
//!   and a mailbox, with in-place [`Position::make_move`]
//! - Attack lookups for every piece, with bishop and rook tables built from
//!   magic multipliers searched for at startup
//! - Pseudo-legal move generation and the [`Position::is_ok`] legality filter
//! - Perft node counting for validating all of the above
//!
//! # Example
//!
//! ```
//! use chess_movegen::{find_uci_move, perft, Position};
//!
//! chess_movegen::init();
//!
//! let mut position = Position::startpos();
//! assert_eq!(perft(&position, 2), 400);
//!
//! let m = find_uci_move(&position, "e2e4").unwrap();
//! position.make_move(m);
//! assert_eq!(position.en_passant().map(|sq| sq.to_string()), Some("e3".to_string()));
//! ```

pub mod movegen;
mod position;

pub use movegen::attacks::{
    bishop_attacks, init, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
pub use movegen::perft::{perft, perft_divide, perft_divide_parallel, perft_parallel, split_perft};
pub use movegen::{find_uci_move, generate_legal_moves, generate_moves, MoveError, MoveList};
pub use position::{CastlingRights, Position};
