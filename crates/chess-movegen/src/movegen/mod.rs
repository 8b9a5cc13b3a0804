//! Move generation.
//!
//! [`generate_moves`] produces pseudo-legal moves: every move that follows
//! the piece movement rules, including ones that leave the mover's king in
//! check. Apply a move with [`Position::make_move`] and keep it only if
//! [`Position::is_ok`] holds, or use [`generate_legal_moves`].

pub mod attacks;
pub mod magics;
pub mod perft;
pub mod rays;

use crate::Position;
use attacks::{pawn_attacks, piece_attacks};
use chess_core::{Bitboard, Color, Move, MoveFlag, Piece, PieceType, Square};
use thiserror::Error;

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves the list can hold. Legal chess positions
    /// never exceed 218 pseudo-legal moves; [`MoveList::push`] panics past
    /// this limit.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    ///
    /// # Panics
    /// Panics if the list already holds [`MoveList::MAX_MOVES`] moves.
    #[inline]
    pub fn push(&mut self, m: Move) {
        assert!(
            self.len < Self::MAX_MOVES,
            "move list is full ({} moves)",
            Self::MAX_MOVES
        );
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Errors from looking up a move by its UCI text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("malformed move text: '{0}'")]
    Malformed(String),

    #[error("{0} is not a move in this position")]
    NotFound(String),

    #[error("{0} leaves the king in check")]
    LeavesKingInCheck(String),
}

const PROMOTIONS: [MoveFlag; 4] = [
    MoveFlag::PromoteQueen,
    MoveFlag::PromoteRook,
    MoveFlag::PromoteBishop,
    MoveFlag::PromoteKnight,
];

const PROMOTION_CAPTURES: [MoveFlag; 4] = [
    MoveFlag::PromoteQueenCapture,
    MoveFlag::PromoteRookCapture,
    MoveFlag::PromoteBishopCapture,
    MoveFlag::PromoteKnightCapture,
];

/// Generates all pseudo-legal moves for the side to move.
pub fn generate_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();

    generate_pawn_moves(position, &mut moves);
    for piece_type in [
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ] {
        generate_piece_moves(position, piece_type, &mut moves);
    }
    generate_castling_moves(position, &mut moves);

    moves
}

/// Generates the moves that do not leave the mover's king attacked.
pub fn generate_legal_moves(position: &Position) -> MoveList {
    let mut moves = generate_moves(position);
    moves.retain(|&m| {
        let mut next = *position;
        next.make_move(m);
        next.is_ok()
    });
    moves
}

/// Finds the legal move written as `text` in UCI notation ("e2e4", "e7e8q").
pub fn find_uci_move(position: &Position, text: &str) -> Result<Move, MoveError> {
    let text = text.trim().to_ascii_lowercase();
    let well_formed = text.is_ascii()
        && matches!(text.len(), 4 | 5)
        && Square::from_algebraic(&text[0..2]).is_some()
        && Square::from_algebraic(&text[2..4]).is_some()
        && (text.len() == 4 || matches!(&text[4..], "n" | "b" | "r" | "q"));
    if !well_formed {
        return Err(MoveError::Malformed(text));
    }

    let m = generate_moves(position)
        .iter()
        .copied()
        .find(|m| m.to_uci() == text)
        .ok_or_else(|| MoveError::NotFound(text.clone()))?;

    let mut next = *position;
    next.make_move(m);
    if next.is_ok() {
        Ok(m)
    } else {
        Err(MoveError::LeavesKingInCheck(text))
    }
}

/// Square `steps` pawn pushes behind `to` for `color`.
#[inline]
fn behind(to: Square, color: Color, steps: i8) -> Square {
    Square::nth((to.index() as i8 - steps * color.pawn_push().offset()) as u8)
}

#[inline]
fn push_all(moves: &mut MoveList, from: Square, targets: Bitboard, flag: MoveFlag) {
    for to in targets {
        moves.push(Move::new(from, to, flag));
    }
}

fn push_promotions(moves: &mut MoveList, from: Square, to: Square, flags: &[MoveFlag; 4]) {
    for &flag in flags {
        moves.push(Move::new(from, to, flag));
    }
}

/// Generates pseudo-legal pawn moves.
fn generate_pawn_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move();
    let theirs = position.color_bb(!us);
    let empty = position.empty_squares();
    let pawns = position.pieces_of(PieceType::Pawn, us);
    let push = us.pawn_push();
    let last_rank = us.promotion_rank().bitboard();

    let single = pawns.shift(push) & empty;
    let double = (single & us.pawn_rank().bitboard().shift(push)).shift(push) & empty;

    for to in single & !last_rank {
        moves.push(Move::quiet(behind(to, us, 1), to));
    }
    for to in single & last_rank {
        push_promotions(moves, behind(to, us, 1), to, &PROMOTIONS);
    }
    for to in double {
        moves.push(Move::new(behind(to, us, 2), to, MoveFlag::DoublePush));
    }

    for from in pawns {
        let attacks = pawn_attacks(from.bitboard(), us);
        for to in attacks & theirs {
            if last_rank.contains(to) {
                push_promotions(moves, from, to, &PROMOTION_CAPTURES);
            } else {
                moves.push(Move::new(from, to, MoveFlag::Capture));
            }
        }
        if let Some(target) = position.en_passant() {
            if attacks.contains(target) {
                moves.push(Move::new(from, target, MoveFlag::EnPassant));
            }
        }
    }
}

/// Generates pseudo-legal moves for every piece of one non-pawn type.
fn generate_piece_moves(position: &Position, piece_type: PieceType, moves: &mut MoveList) {
    let us = position.side_to_move();
    let ours = position.color_bb(us);
    let theirs = position.color_bb(!us);
    let occupied = ours | theirs;

    let mut origins = position.pieces_of(piece_type, us);
    while let Some(from) = origins.pop_lsb() {
        let targets = piece_attacks(piece_type, from, occupied) & !ours;
        push_all(moves, from, targets & !theirs, MoveFlag::Quiet);
        push_all(moves, from, targets & theirs, MoveFlag::Capture);
    }
}

/// Generates castling moves.
///
/// The king may not castle out of or through check; landing in check is
/// left to the usual `is_ok` filter.
fn generate_castling_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move();
    let rights = position.castling();
    if !rights.can_castle_kingside(us) && !rights.can_castle_queenside(us) {
        return;
    }

    let (king_start, wings) = match us {
        Color::White => (
            Square::E1,
            [
                (MoveFlag::KingCastle, Square::H1, Square::F1, Square::G1),
                (MoveFlag::QueenCastle, Square::A1, Square::D1, Square::C1),
            ],
        ),
        Color::Black => (
            Square::E8,
            [
                (MoveFlag::KingCastle, Square::H8, Square::F8, Square::G8),
                (MoveFlag::QueenCastle, Square::A8, Square::D8, Square::C8),
            ],
        ),
    };

    let king = Piece::new(us, PieceType::King);
    let rook = Piece::new(us, PieceType::Rook);
    if position.piece_at(king_start) != Some(king) || position.is_square_attacked(king_start, !us)
    {
        return;
    }

    let occupied = position.occupied();
    for (flag, rook_start, pass_through, king_target) in wings {
        let allowed = match flag {
            MoveFlag::KingCastle => rights.can_castle_kingside(us),
            _ => rights.can_castle_queenside(us),
        };
        if !allowed || position.piece_at(rook_start) != Some(rook) {
            continue;
        }

        let between = squares_between(king_start, rook_start);
        if (occupied & between).is_empty() && !position.is_square_attacked(pass_through, !us) {
            moves.push(Move::new(king_start, king_target, flag));
        }
    }
}

/// Squares strictly between two squares on the same rank.
fn squares_between(a: Square, b: Square) -> Bitboard {
    let (lo, hi) = if a.index() < b.index() { (a, b) } else { (b, a) };
    let span = (1u64 << hi.index()) - (1u64 << lo.index());
    Bitboard(span) & !lo.bitboard()
}
