//! Move application: producing the successor position.

use crate::{Board, Position};
use chess_core::{Color, File, Move, Piece, PieceKind, Square};
use thiserror::Error;

/// Errors from applying a move that does not fit the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RulesError {
    /// The origin square is empty or holds a piece of the side not to move.
    #[error("no piece of the side to move on {0}")]
    NoPieceToMove(Square),
    /// The destination holds a piece of the mover's own color.
    #[error("{0} is occupied by a friendly piece")]
    OwnPieceOnTarget(Square),
    /// Promotion is missing, superfluous, or names a pawn or king.
    #[error("invalid promotion in {mv}: {reason}")]
    InvalidPromotion { mv: Move, reason: &'static str },
}

/// Moves pieces on `board` for `m` and returns the captured piece, if any.
///
/// Special moves are recognized from the board rather than from move flags:
/// a pawn moving diagonally onto the empty `en_passant` square captures the
/// pawn beside it, and a king moving two files brings its rook along.
pub(crate) fn relocate(board: &mut Board, m: Move, en_passant: Option<Square>) -> Option<Piece> {
    let (from, to) = (m.from(), m.to());
    let piece = board.remove(from)?;
    let mut captured = None;

    if piece.kind == PieceKind::Pawn
        && from.file() != to.file()
        && board.is_empty(to)
        && en_passant == Some(to)
    {
        captured = board.remove(Square::new(to.file(), from.rank()));
    }

    if piece.kind == PieceKind::King {
        let distance = to.file().index() as i8 - from.file().index() as i8;
        let rook_files = match distance {
            2 => Some((File::H, File::F)),
            -2 => Some((File::A, File::D)),
            _ => None,
        };
        if let Some((rook_from, rook_to)) = rook_files {
            let rank = from.rank();
            if let Some(rook) = board.remove(Square::new(rook_from, rank)) {
                board.set(Square::new(rook_to, rank), rook);
            }
        }
    }

    let placed = match m.promotion() {
        Some(kind) => Piece::new(kind, piece.color),
        None => piece,
    };
    board.set(to, placed).or(captured)
}

fn check_promotion(m: Move, piece: Piece) -> Result<(), RulesError> {
    let reaches_last_rank =
        piece.kind == PieceKind::Pawn && m.to().rank() == piece.color.promotion_rank();
    let reason = match (reaches_last_rank, m.promotion()) {
        (true, None) => "a promotion piece is required",
        (false, Some(_)) => "only a pawn reaching the last rank promotes",
        (true, Some(kind)) if !kind.is_promotable() => "pawns promote to a queen, rook, bishop or knight",
        _ => return Ok(()),
    };
    Err(RulesError::InvalidPromotion { mv: m, reason })
}

/// Applies `m` to `position` and returns the successor.
///
/// The input is never modified. The move is expected to be legal; only the
/// structural faults listed in [`RulesError`] are detected here.
pub fn apply_move(position: &Position, m: Move) -> Result<Position, RulesError> {
    let us = position.side_to_move();
    let (from, to) = (m.from(), m.to());

    let piece = position
        .piece_at(from)
        .filter(|p| p.color == us)
        .ok_or(RulesError::NoPieceToMove(from))?;
    if position.piece_at(to).is_some_and(|p| p.color == us) {
        return Err(RulesError::OwnPieceOnTarget(to));
    }
    check_promotion(m, piece)?;

    let mut next = position.clone();
    let captured = relocate(&mut next.board, m, position.en_passant());

    if piece.kind == PieceKind::King {
        next.castling.remove_color(us);
    }
    next.castling.remove_for_square(from);
    next.castling.remove_for_square(to);

    let pawn_move = piece.kind == PieceKind::Pawn;
    let rank_distance = (to.rank().index() as i8 - from.rank().index() as i8).abs();
    next.en_passant = if pawn_move && rank_distance == 2 {
        from.offset(0, us.forward())
    } else {
        None
    };

    next.halfmove_clock = if pawn_move || captured.is_some() {
        0
    } else {
        position.halfmove_clock().saturating_add(1)
    };
    if us == Color::Black {
        next.fullmove_number = position.fullmove_number().saturating_add(1);
    }
    next.side_to_move = us.opposite();

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CastlingRights;
    use chess_core::MoveFlags;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn play(fen: &str, from: &str, to: &str) -> Position {
        let pos = Position::from_fen(fen).unwrap();
        apply_move(&pos, Move::new(sq(from), sq(to))).unwrap()
    }

    #[test]
    fn quiet_move_updates_counters() {
        let pos = Position::startpos();
        let after_nf3 = apply_move(&pos, Move::new(sq("g1"), sq("f3"))).unwrap();
        assert_eq!(after_nf3.halfmove_clock(), 1);
        assert_eq!(after_nf3.fullmove_number(), 1);
        assert_eq!(after_nf3.side_to_move(), Color::Black);
        assert_eq!(pos, Position::startpos());

        let after_nf6 = apply_move(&after_nf3, Move::new(sq("g8"), sq("f6"))).unwrap();
        assert_eq!(after_nf6.halfmove_clock(), 2);
        assert_eq!(after_nf6.fullmove_number(), 2);
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let pos = Position::startpos();
        let next = apply_move(
            &pos,
            Move::with_flags(sq("e2"), sq("e4"), MoveFlags::DOUBLE_PUSH),
        )
        .unwrap();
        assert_eq!(next.en_passant(), Some(sq("e3")));
        assert_eq!(next.halfmove_clock(), 0);
        assert_eq!(
            next.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );

        // Any other move clears it.
        let after = apply_move(&next, Move::new(sq("g8"), sq("f6"))).unwrap();
        assert_eq!(after.en_passant(), None);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let next = play("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", "e5", "d6");
        assert_eq!(next.piece_at(sq("d5")), None);
        assert_eq!(
            next.piece_at(sq("d6")),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert_eq!(next.board().pieces().count(), 3);
        assert_eq!(next.halfmove_clock(), 0);
    }

    #[test]
    fn castling_moves_the_rook() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10";
        let short = play(fen, "e1", "g1");
        assert_eq!(short.piece_at(sq("f1")), Some(Piece::new(PieceKind::Rook, Color::White)));
        assert_eq!(short.piece_at(sq("h1")), None);
        assert!(!short.castling().can_castle_kingside(Color::White));
        assert!(!short.castling().can_castle_queenside(Color::White));
        assert!(short.castling().can_castle_kingside(Color::Black));
        assert_eq!(short.halfmove_clock(), 4);

        let long = play(fen, "e1", "c1");
        assert_eq!(long.piece_at(sq("d1")), Some(Piece::new(PieceKind::Rook, Color::White)));
        assert_eq!(long.piece_at(sq("a1")), None);
    }

    #[test]
    fn rook_moves_and_captures_clear_rights() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let next = play(fen, "h1", "h8");
        assert_eq!(next.castling(), CastlingRights::new(CastlingRights::WHITE_QUEENSIDE | CastlingRights::BLACK_QUEENSIDE));
        assert_eq!(next.halfmove_clock(), 0);

        let next = play(fen, "a1", "a2");
        assert_eq!(next.castling().to_string(), "Kkq");
    }

    #[test]
    fn promotion_replaces_the_pawn() {
        let pos = Position::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let m = Move::new(sq("b7"), sq("b8")).promoting(PieceKind::Knight);
        let next = apply_move(&pos, m).unwrap();
        assert_eq!(
            next.piece_at(sq("b8")),
            Some(Piece::new(PieceKind::Knight, Color::White))
        );
        assert_eq!(next.piece_at(sq("b7")), None);
    }

    #[test]
    fn promotion_errors() {
        let pos = Position::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let bare = Move::new(sq("b7"), sq("b8"));
        assert!(matches!(
            apply_move(&pos, bare),
            Err(RulesError::InvalidPromotion { .. })
        ));
        assert!(matches!(
            apply_move(&pos, bare.promoting(PieceKind::King)),
            Err(RulesError::InvalidPromotion { .. })
        ));
        let king = Move::new(sq("e1"), sq("d1")).promoting(PieceKind::Queen);
        assert!(matches!(
            apply_move(&pos, king),
            Err(RulesError::InvalidPromotion { .. })
        ));
    }

    #[test]
    fn origin_must_hold_side_to_move_piece() {
        let pos = Position::startpos();
        assert_eq!(
            apply_move(&pos, Move::new(sq("e4"), sq("e5"))),
            Err(RulesError::NoPieceToMove(sq("e4")))
        );
        assert_eq!(
            apply_move(&pos, Move::new(sq("e7"), sq("e5"))),
            Err(RulesError::NoPieceToMove(sq("e7")))
        );
        assert_eq!(
            apply_move(&pos, Move::new(sq("d1"), sq("e1"))),
            Err(RulesError::OwnPieceOnTarget(sq("e1")))
        );
    }

    #[test]
    fn halfmove_clock_saturates() {
        let pos = Position::from_fen(&format!("4k3/8/8/8/8/8/8/4K3 w - - {} 1", u32::MAX)).unwrap();
        let next = apply_move(&pos, Move::new(sq("e1"), sq("d1"))).unwrap();
        assert_eq!(next.halfmove_clock(), u32::MAX);
    }
}
