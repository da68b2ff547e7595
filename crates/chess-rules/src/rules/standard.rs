//! Standard chess rules implementation.

use super::{GameOutcome, RuleSet};
use crate::movegen::{is_in_check, legal_moves, MoveList};
use crate::{apply_move, Position, RulesError};
use chess_core::{Color, Move, PieceKind};

/// Halfmoves without a capture or pawn move that end the game.
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Standard chess rules (FIDE).
///
/// - Standard piece movement, castling, en passant and promotion
/// - Checkmate and stalemate
/// - Automatic draws for insufficient material and the fifty-move rule
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl RuleSet for StandardChess {
    fn initial_position(&self) -> Position {
        Position::startpos()
    }

    fn legal_moves(&self, position: &Position) -> MoveList {
        legal_moves(position)
    }

    fn apply(&self, position: &Position, m: Move) -> Result<Position, RulesError> {
        apply_move(position, m)
    }

    fn is_check(&self, position: &Position) -> bool {
        is_in_check(position)
    }

    /// Bare kings with at most one minor piece per side, or any number of
    /// bishops that all stand on squares of one color.
    fn is_insufficient_material(&self, position: &Position) -> bool {
        let board = position.board();
        let mut minors = [0usize; 2];
        let mut bishop_shades = [false; 2];

        for (sq, piece) in board.pieces() {
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Knight => minors[piece.color.index()] += 1,
                PieceKind::Bishop => {
                    minors[piece.color.index()] += 1;
                    bishop_shades[usize::from(sq.is_light())] = true;
                }
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            }
        }

        if minors.iter().all(|&n| n <= 1) {
            return true;
        }

        let knights = board.count(PieceKind::Knight, Color::White)
            + board.count(PieceKind::Knight, Color::Black);
        knights == 0 && !(bishop_shades[0] && bishop_shades[1])
    }

    fn position_outcome(&self, position: &Position) -> GameOutcome {
        if self.legal_moves(position).is_empty() {
            return if self.is_check(position) {
                GameOutcome::CheckmateBy(position.side_to_move().opposite())
            } else {
                GameOutcome::Stalemate
            };
        }
        if self.is_insufficient_material(position) {
            return GameOutcome::DrawByInsufficientMaterial;
        }
        if position.halfmove_clock() >= FIFTY_MOVE_HALFMOVES {
            return GameOutcome::DrawByFiftyMove;
        }
        GameOutcome::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::FenParser;

    fn outcome(fen: &str) -> GameOutcome {
        StandardChess.position_outcome(&Position::from_fen(fen).unwrap())
    }

    fn insufficient(fen: &str) -> bool {
        StandardChess.is_insufficient_material(&Position::from_fen(fen).unwrap())
    }

    #[test]
    fn initial_position() {
        let pos = StandardChess.initial_position();
        assert_eq!(pos.to_fen(), FenParser::STARTPOS);
        assert_eq!(StandardChess.position_outcome(&pos), GameOutcome::Ongoing);
        assert!(!StandardChess.is_check(&pos));
    }

    #[test]
    fn legality_ignores_move_flags() {
        let start = StandardChess.initial_position();
        let sq = |s: &str| chess_core::Square::from_algebraic(s).unwrap();
        assert!(StandardChess.is_legal(&start, Move::new(sq("e2"), sq("e4"))));
        assert!(StandardChess.is_legal(&start, Move::new(sq("g1"), sq("f3"))));
        assert!(!StandardChess.is_legal(&start, Move::new(sq("e1"), sq("e2"))));

        let pos = Position::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let promotion = Move::new(sq("b7"), sq("b8")).promoting(PieceKind::Rook);
        assert!(StandardChess.is_legal(&pos, promotion));
        assert!(!StandardChess.is_legal(&pos, Move::new(sq("b7"), sq("b8"))));
    }

    #[test]
    fn checkmate_and_stalemate() {
        assert_eq!(
            outcome("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"),
            GameOutcome::CheckmateBy(Color::Black)
        );
        assert_eq!(outcome("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"), GameOutcome::Stalemate);
    }

    #[test]
    fn insufficient_material_cases() {
        assert!(insufficient("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
        assert!(insufficient("4k3/8/8/8/8/8/8/3NK3 w - - 0 1"));
        assert!(insufficient("4k3/8/8/8/8/8/8/3BK3 b - - 0 1"));
        assert!(insufficient("4kn2/8/8/8/8/8/8/3BK3 w - - 0 1"));
        // Three bishops, all on dark squares.
        assert!(insufficient("4kb2/8/8/8/8/8/8/B1B1K3 w - - 0 1"));
        assert!(!insufficient("2b1k3/8/8/8/8/8/8/B1B1K3 w - - 0 1"));

        assert!(!insufficient("4k3/8/8/8/8/8/8/2NNK3 w - - 0 1"));
        assert!(!insufficient("4k3/8/8/8/8/8/8/2BBK3 w - - 0 1"));
        assert!(!insufficient("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"));
        assert!(!insufficient("4k3/8/8/8/8/8/8/3RK3 w - - 0 1"));
        assert!(!insufficient(FenParser::STARTPOS));
    }

    #[test]
    fn fifty_move_rule() {
        assert_eq!(outcome("4k3/8/8/8/8/8/8/3RK3 w - - 99 80"), GameOutcome::Ongoing);
        assert_eq!(
            outcome("4k3/8/8/8/8/8/8/3RK3 w - - 100 80"),
            GameOutcome::DrawByFiftyMove
        );
    }

    #[test]
    fn checkmate_beats_fifty_move_rule() {
        // Back-rank mate delivered with the clock already at 100.
        assert_eq!(
            outcome("R5k1/5ppp/8/8/8/8/8/6K1 b - - 100 70"),
            GameOutcome::CheckmateBy(Color::White)
        );
    }

    #[test]
    fn insufficient_material_beats_fifty_move_rule() {
        assert_eq!(
            outcome("4k3/8/8/8/8/8/8/3NK3 w - - 120 90"),
            GameOutcome::DrawByInsufficientMaterial
        );
    }

    #[test]
    fn outcome_helpers() {
        assert!(!GameOutcome::Ongoing.is_over());
        assert!(GameOutcome::Stalemate.is_draw());
        assert_eq!(GameOutcome::CheckmateBy(Color::White).winner(), Some(Color::White));
        assert_eq!(
            GameOutcome::CheckmateBy(Color::Black).to_string(),
            "checkmate, Black wins"
        );
    }
}
