//! Legality filter: drops pseudo-legal moves that expose the mover's king.

use super::{is_king_attacked, is_square_attacked, pseudo_legal_moves, MoveList};
use crate::apply::relocate;
use crate::Position;
use chess_core::Move;

/// Returns true if `m` is a legal move in `position`.
///
/// Only the squares and promotion of `m` are consulted; its flags are taken
/// from the matching pseudo-legal move, so a move built from bare squares
/// gets the same castling checks as a generated one.
pub fn is_legal(position: &Position, m: Move) -> bool {
    pseudo_legal_moves(position)
        .find(|g| g.from() == m.from() && g.to() == m.to() && g.promotion() == m.promotion())
        .is_some_and(|g| keeps_king_safe(position, g))
}

/// Plays the pseudo-legal move `m` on a scratch copy of the board and checks
/// the mover's king. Castling additionally requires the square the king
/// crosses to be unattacked; the landing square is covered by the general
/// check.
fn keeps_king_safe(position: &Position, m: Move) -> bool {
    let us = position.side_to_move();
    let board = position.board();

    if m.is_castling() {
        let step = if m.is_castle_kingside() { 1 } else { -1 };
        match m.from().offset(step, 0) {
            Some(crossed) if !is_square_attacked(board, crossed, us.opposite()) => {}
            _ => return false,
        }
    }

    let mut scratch = *board;
    relocate(&mut scratch, m, position.en_passant());
    !is_king_attacked(&scratch, us)
}

/// Generates all legal moves for the side to move.
pub fn legal_moves(position: &Position) -> MoveList {
    pseudo_legal_moves(position)
        .filter(|&m| keeps_king_safe(position, m))
        .collect()
}
