//! Move generation.
//!
//! Generation is split in two stages. [`pseudo_legal_moves`] walks the board
//! and yields every move that obeys piece geometry, lazily and without caring
//! whether the mover's king ends up attacked. [`legal_moves`] filters that
//! stream through the king-safety check in [`legality`].

mod attacks;
mod legality;
pub mod perft;

use crate::Position;
use chess_core::{Color, File, Move, MoveFlags, Piece, PieceKind, Square};
use std::collections::VecDeque;

pub(crate) use attacks::ray;
pub use attacks::{is_in_check, is_king_attacked, is_square_attacked};
pub use legality::{is_legal, legal_moves};

use attacks::{slider_directions, KING_STEPS, KNIGHT_JUMPS};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so a fixed-size array
/// avoids heap allocation for legal move lists.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of legal moves in any chess position.
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
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

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

    /// Returns true if `m` is in the list, comparing every field.
    pub fn contains(&self, m: &Move) -> bool {
        self.as_slice().contains(m)
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

impl FromIterator<Move> for MoveList {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut list = MoveList::new();
        for m in iter {
            list.push(m);
        }
        list
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Lazy iterator over the pseudo-legal moves of a position.
///
/// Squares are visited from a1 to h8; each piece of the side to move expands
/// into a small buffer that is drained before the next square is visited.
/// Castling candidates come last. Cloning the iterator restarts nothing: it
/// continues from the same point. Call [`pseudo_legal_moves`] again for a
/// fresh pass.
#[derive(Clone)]
pub struct PseudoLegalMoves<'a> {
    position: &'a Position,
    next_square: u8,
    pending: VecDeque<Move>,
    castling_done: bool,
}

impl Iterator for PseudoLegalMoves<'_> {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        loop {
            if let Some(m) = self.pending.pop_front() {
                return Some(m);
            }
            if let Some(from) = Square::from_index(self.next_square) {
                self.next_square += 1;
                if let Some(piece) = self.position.piece_at(from) {
                    if piece.color == self.position.side_to_move() {
                        push_piece_moves(self.position, from, piece, &mut self.pending);
                    }
                }
                continue;
            }
            if !self.castling_done {
                self.castling_done = true;
                push_castling_moves(self.position, &mut self.pending);
                continue;
            }
            return None;
        }
    }
}

/// Returns the pseudo-legal moves for the side to move.
///
/// Nothing is cached: each call walks the position afresh.
pub fn pseudo_legal_moves(position: &Position) -> PseudoLegalMoves<'_> {
    PseudoLegalMoves {
        position,
        next_square: 0,
        pending: VecDeque::with_capacity(28),
        castling_done: false,
    }
}

fn push_piece_moves(position: &Position, from: Square, piece: Piece, out: &mut VecDeque<Move>) {
    match piece.kind {
        PieceKind::Pawn => push_pawn_moves(position, from, piece.color, out),
        PieceKind::Knight => push_step_moves(position, from, piece.color, &KNIGHT_JUMPS, out),
        PieceKind::King => push_step_moves(position, from, piece.color, &KING_STEPS, out),
        kind => push_slider_moves(position, from, piece.color, slider_directions(kind), out),
    }
}

/// Pushes one move per promotion kind when `to` is on the last rank.
fn push_pawn_move(from: Square, to: Square, us: Color, flags: MoveFlags, out: &mut VecDeque<Move>) {
    let base = Move::with_flags(from, to, flags);
    if to.rank() == us.promotion_rank() {
        out.extend(PieceKind::PROMOTIONS.iter().map(|&kind| base.promoting(kind)));
    } else {
        out.push_back(base);
    }
}

fn push_pawn_moves(position: &Position, from: Square, us: Color, out: &mut VecDeque<Move>) {
    let board = position.board();
    let forward = us.forward();

    if let Some(one) = from.offset(0, forward).filter(|&sq| board.is_empty(sq)) {
        push_pawn_move(from, one, us, MoveFlags::NONE, out);
        if from.rank() == us.pawn_rank() {
            if let Some(two) = one.offset(0, forward).filter(|&sq| board.is_empty(sq)) {
                out.push_back(Move::with_flags(from, two, MoveFlags::DOUBLE_PUSH));
            }
        }
    }

    for df in [-1, 1] {
        let Some(to) = from.offset(df, forward) else {
            continue;
        };
        match board.get(to) {
            Some(target) if target.color != us => {
                push_pawn_move(from, to, us, MoveFlags::CAPTURE, out);
            }
            None if position.en_passant() == Some(to) => {
                out.push_back(Move::with_flags(
                    from,
                    to,
                    MoveFlags::CAPTURE | MoveFlags::EN_PASSANT,
                ));
            }
            _ => {}
        }
    }
}

fn push_step_moves(
    position: &Position,
    from: Square,
    us: Color,
    steps: &[(i8, i8)],
    out: &mut VecDeque<Move>,
) {
    for &(df, dr) in steps {
        let Some(to) = from.offset(df, dr) else {
            continue;
        };
        match position.piece_at(to) {
            None => out.push_back(Move::new(from, to)),
            Some(target) if target.color != us => {
                out.push_back(Move::with_flags(from, to, MoveFlags::CAPTURE));
            }
            Some(_) => {}
        }
    }
}

fn push_slider_moves(
    position: &Position,
    from: Square,
    us: Color,
    directions: &[(i8, i8)],
    out: &mut VecDeque<Move>,
) {
    for &dir in directions {
        for to in ray(position.board(), from, dir) {
            match position.piece_at(to) {
                None => out.push_back(Move::new(from, to)),
                Some(target) if target.color != us => {
                    out.push_back(Move::with_flags(from, to, MoveFlags::CAPTURE));
                }
                Some(_) => {}
            }
        }
    }
}

/// Castling candidates: the right is held, king and rook are at home, the
/// squares between them are empty and the king is not in check. Whether the
/// king crosses or lands on an attacked square is left to the legality
/// filter.
fn push_castling_moves(position: &Position, out: &mut VecDeque<Move>) {
    let us = position.side_to_move();
    let rights = position.castling();
    if !rights.can_castle_kingside(us) && !rights.can_castle_queenside(us) {
        return;
    }

    let board = position.board();
    let rank = us.back_rank();
    let king_from = Square::new(File::E, rank);
    if board.get(king_from) != Some(Piece::new(PieceKind::King, us))
        || is_king_attacked(board, us)
    {
        return;
    }

    let rook = Some(Piece::new(PieceKind::Rook, us));
    let clear = |files: &[File]| files.iter().all(|&f| board.is_empty(Square::new(f, rank)));

    if rights.can_castle_kingside(us)
        && board.get(Square::new(File::H, rank)) == rook
        && clear(&[File::F, File::G])
    {
        out.push_back(Move::with_flags(
            king_from,
            Square::new(File::G, rank),
            MoveFlags::CASTLE_KINGSIDE,
        ));
    }

    if rights.can_castle_queenside(us)
        && board.get(Square::new(File::A, rank)) == rook
        && clear(&[File::B, File::C, File::D])
    {
        out.push_back(Move::with_flags(
            king_from,
            Square::new(File::C, rank),
            MoveFlags::CASTLE_QUEENSIDE,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn pseudo(fen: &str) -> Vec<Move> {
        let pos = Position::from_fen(fen).unwrap();
        pseudo_legal_moves(&pos).collect()
    }

    #[test]
    fn startpos_has_twenty_pseudo_legal_moves() {
        let pos = Position::startpos();
        assert_eq!(pseudo_legal_moves(&pos).count(), 20);
        let doubles = pseudo_legal_moves(&pos).filter(|m| m.is_double_push()).count();
        assert_eq!(doubles, 8);
    }

    #[test]
    fn iterator_is_lazy_and_restartable() {
        let pos = Position::startpos();
        let mut iter = pseudo_legal_moves(&pos);
        let first = iter.next();
        assert!(first.is_some());
        let again: Vec<Move> = pseudo_legal_moves(&pos).collect();
        assert_eq!(again.first().copied(), first);
        assert_eq!(iter.count(), again.len() - 1);
    }

    #[test]
    fn pawn_push_is_blocked() {
        let moves = pseudo("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(!moves.iter().any(|m| m.from() == sq("e2") && !m.is_capture()));
    }

    #[test]
    fn double_push_needs_both_squares() {
        let moves = pseudo("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        assert!(moves.contains(&Move::new(sq("e2"), sq("e3"))));
        assert!(!moves.iter().any(|m| m.to() == sq("e4") && m.from() == sq("e2")));
    }

    #[test]
    fn promotions_expand_to_four_kinds() {
        let moves = pseudo("3nk3/2P5/8/8/8/8/8/4K3 w - - 0 1");
        let promos: Vec<&Move> = moves.iter().filter(|m| m.promotion().is_some()).collect();
        // Four pushes to c8 and four captures on d8.
        assert_eq!(promos.len(), 8);
        assert!(promos
            .iter()
            .any(|m| m.to() == sq("d8") && m.is_capture() && m.promotion() == Some(PieceKind::Knight)));
    }

    #[test]
    fn en_passant_candidate() {
        let moves = pseudo("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        let ep = moves.iter().find(|m| m.is_en_passant()).unwrap();
        assert_eq!(ep.from(), sq("e5"));
        assert_eq!(ep.to(), sq("d6"));
        assert!(ep.is_capture());
    }

    #[test]
    fn sliders_stop_at_pieces() {
        let moves = pseudo("4k3/8/8/8/R2p4/8/P7/4K3 w - - 0 1");
        let rook: Vec<Square> = moves
            .iter()
            .filter(|m| m.from() == sq("a4"))
            .map(|m| m.to())
            .collect();
        assert!(rook.contains(&sq("d4")));
        assert!(!rook.contains(&sq("e4")));
        assert!(rook.contains(&sq("a3")));
        assert!(!rook.contains(&sq("a2")));
        assert_eq!(rook.len(), 3 + 1 + 4);
    }

    #[test]
    fn castling_candidates() {
        let moves = pseudo("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert!(moves.iter().any(|m| m.is_castle_kingside()));
        assert!(moves.iter().any(|m| m.is_castle_queenside()));

        // A piece between king and rook.
        let moves = pseudo("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1");
        assert!(!moves.iter().any(|m| m.is_castle_queenside()));

        // No castling out of check.
        let moves = pseudo("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1");
        assert!(!moves.iter().any(|m| m.is_castling()));
    }

    #[test]
    fn castling_generated_even_through_attack() {
        // f1 is attacked; the generator still proposes O-O.
        let moves = pseudo("4k3/8/8/8/8/8/5r2/4K2R w K - 0 1");
        assert!(moves.iter().any(|m| m.is_castle_kingside()));
    }

    #[test]
    fn move_list_collects_and_retains() {
        let pos = Position::startpos();
        let mut list: MoveList = pseudo_legal_moves(&pos).collect();
        assert_eq!(list.len(), 20);
        assert!(list.contains(&Move::new(sq("g1"), sq("f3"))));
        list.retain(|m| m.is_double_push());
        assert_eq!(list.len(), 8);
        assert!(list.iter().all(|m| m.is_double_push()));
        assert!(!list.is_empty());
    }
}
