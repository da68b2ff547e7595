//! Piece geometry and square attack detection.

use crate::{Board, Position};
use chess_core::{Color, Piece, PieceKind, Square};

/// Orthogonal ray directions as (file, rank) steps.
pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Diagonal ray directions as (file, rank) steps.
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// The eight knight jumps.
pub(crate) const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// The eight king steps.
pub(crate) const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Ray directions for a sliding piece; empty for non-sliders.
pub(crate) fn slider_directions(kind: PieceKind) -> &'static [(i8, i8)] {
    const QUEEN: [(i8, i8); 8] = [
        (0, 1),
        (0, -1),
        (1, 0),
        (-1, 0),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    match kind {
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Queen => &QUEEN,
        _ => &[],
    }
}

/// Squares along a ray from `from` (exclusive) up to and including the
/// first occupied square.
pub(crate) fn ray(
    board: &Board,
    from: Square,
    (df, dr): (i8, i8),
) -> impl Iterator<Item = Square> + '_ {
    let mut next = from.offset(df, dr);
    let mut blocked = false;
    std::iter::from_fn(move || {
        if blocked {
            return None;
        }
        let sq = next?;
        blocked = !board.is_empty(sq);
        next = sq.offset(df, dr);
        Some(sq)
    })
}

/// Returns true if `sq` is attacked by any piece of color `by`.
///
/// Works in reverse: a piece of each kind placed on `sq` would reach an
/// enemy piece of that same kind exactly when that enemy attacks `sq`.
/// Pawns use their capture diagonals, never their push.
pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    let holds = |target: Option<Square>, kind: PieceKind| {
        target.and_then(|t| board.get(t)) == Some(Piece::new(kind, by))
    };

    // A pawn of `by` attacks sq from one rank behind it, seen from `by`.
    if [-1, 1]
        .into_iter()
        .any(|df| holds(sq.offset(df, -by.forward()), PieceKind::Pawn))
    {
        return true;
    }

    if KNIGHT_JUMPS
        .iter()
        .any(|&(df, dr)| holds(sq.offset(df, dr), PieceKind::Knight))
    {
        return true;
    }

    if KING_STEPS
        .iter()
        .any(|&(df, dr)| holds(sq.offset(df, dr), PieceKind::King))
    {
        return true;
    }

    let slider_hit = |directions: &[(i8, i8)], kind: PieceKind| {
        directions.iter().any(|&dir| {
            ray(board, sq, dir).last().and_then(|end| board.get(end)).is_some_and(|p| {
                p.color == by && (p.kind == kind || p.kind == PieceKind::Queen)
            })
        })
    };

    slider_hit(&ROOK_DIRECTIONS[..], PieceKind::Rook)
        || slider_hit(&BISHOP_DIRECTIONS[..], PieceKind::Bishop)
}

/// Returns true if the king of `color` is attacked on `board`.
///
/// A board without that king reports false.
pub fn is_king_attacked(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}

/// Returns true if the side to move is in check.
pub fn is_in_check(position: &Position) -> bool {
    is_king_attacked(position.board(), position.side_to_move())
}
