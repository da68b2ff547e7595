//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::legal_moves;
use crate::apply_move;
use crate::Position;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .filter_map(|&m| apply_move(position, m).ok())
        .map(|next| perft(&next, depth - 1))
        .sum()
}

/// Perft with divide: node count below each root move, sorted by move text.
/// Useful for locating which move has an incorrect count.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = legal_moves(position)
        .iter()
        .filter_map(|&m| {
            let next = apply_move(position, m).ok()?;
            let nodes = if depth > 1 { perft(&next, depth - 1) } else { 1 };
            Some((m.to_coordinate(), nodes))
        })
        .collect();

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
