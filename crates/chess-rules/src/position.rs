//! Chess position representation.

use crate::movegen::is_square_attacked;
use crate::Board;
use chess_core::{Color, FenError, FenParser, File, Piece, PieceKind, Square};
use std::fmt;

/// Castling rights flags.
///
/// Rights are only ever removed during play; nothing re-grants them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    const fn kingside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    const fn queenside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        self.0 & Self::kingside_flag(color) != 0
    }

    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        self.0 & Self::queenside_flag(color) != 0
    }

    /// Removes both rights of a color (its king moved).
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.0 &= !(Self::kingside_flag(color) | Self::queenside_flag(color));
    }

    #[inline]
    pub fn remove_kingside(&mut self, color: Color) {
        self.0 &= !Self::kingside_flag(color);
    }

    #[inline]
    pub fn remove_queenside(&mut self, color: Color) {
        self.0 &= !Self::queenside_flag(color);
    }

    /// Removes the right tied to a rook home square, if `sq` is one.
    ///
    /// Called for both the origin and the destination of every move, which
    /// covers a rook leaving home and a rook being captured at home.
    pub fn remove_for_square(&mut self, sq: Square) {
        match sq {
            Square::H1 => self.remove_kingside(Color::White),
            Square::A1 => self.remove_queenside(Color::White),
            Square::H8 => self.remove_kingside(Color::Black),
            Square::A8 => self.remove_queenside(Color::Black),
            _ => {}
        }
    }

    /// Parses canonical castling letters (`KQkq` subset, empty for none).
    fn from_letters(letters: &str) -> Self {
        let flags = letters.chars().fold(0u8, |acc, c| {
            acc | match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => 0,
            }
        });
        CastlingRights::new(flags)
    }
}

impl fmt::Display for CastlingRights {
    /// FEN castling field: `KQkq` subset or `-`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("-");
        }
        for (color, kingside, letter) in [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ] {
            let held = if kingside {
                self.can_castle_kingside(color)
            } else {
                self.can_castle_queenside(color)
            };
            if held {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

/// Identity of a position for repetition detection.
///
/// Covers placement, side to move, castling rights and a capturable
/// en-passant target; the move counters are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionKey {
    board: Board,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
}

/// Complete chess position state.
///
/// A `Position` is only ever replaced, never edited: the move applier
/// returns a fresh value and leaves its input untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl Position {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        let mut cells = [None; 64];
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for color in Color::BOTH {
            for (file, kind) in File::ALL.into_iter().zip(back) {
                cells[Square::new(file, color.back_rank()).index()] = Some(Piece::new(kind, color));
                cells[Square::new(file, color.pawn_rank()).index()] =
                    Some(Piece::new(PieceKind::Pawn, color));
            }
        }
        Position {
            board: Board::from_cells(cells),
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates a position from a FEN string.
    ///
    /// Beyond the text checks of [`FenParser`], this rejects layouts that
    /// cannot arise in legal play: a king count other than one per side,
    /// pawns on the first or last rank, castling rights without the king and
    /// rook at home, an en-passant target with no pawn that just passed it,
    /// and the side not to move standing in check.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let position = Position {
            board: Board::from_cells(parsed.placement),
            side_to_move: parsed.active_color,
            castling: CastlingRights::from_letters(&parsed.castling),
            en_passant: parsed.en_passant,
            halfmove_clock: parsed.halfmove_clock,
            fullmove_number: parsed.fullmove_number,
        };
        position.validate()?;
        Ok(position)
    }

    fn validate(&self) -> Result<(), FenError> {
        let illegal = |msg: String| -> Result<(), FenError> { Err(FenError::IllegalPosition(msg)) };

        for color in Color::BOTH {
            let kings = self.board.count(PieceKind::King, color);
            if kings != 1 {
                return illegal(format!("{} has {} kings", color, kings));
            }
        }

        if let Some((sq, _)) = self.board.pieces().find(|(sq, p)| {
            p.kind == PieceKind::Pawn && matches!(sq.rank().index(), 0 | 7)
        }) {
            return illegal(format!("pawn on {}", sq));
        }

        for color in Color::BOTH {
            let rank = color.back_rank();
            let king_home = self.board.get(Square::new(File::E, rank))
                == Some(Piece::new(PieceKind::King, color));
            let rook = Some(Piece::new(PieceKind::Rook, color));
            if self.castling.can_castle_kingside(color)
                && !(king_home && self.board.get(Square::new(File::H, rank)) == rook)
            {
                return illegal(format!("{} kingside castling without king and rook", color));
            }
            if self.castling.can_castle_queenside(color)
                && !(king_home && self.board.get(Square::new(File::A, rank)) == rook)
            {
                return illegal(format!("{} queenside castling without king and rook", color));
            }
        }

        if let Some(ep) = self.en_passant {
            let mover = self.side_to_move.opposite();
            let expected_rank = mover.pawn_rank().index() as i8 + mover.forward();
            let pawn_sq = ep.offset(0, mover.forward());
            let origin = ep.offset(0, -mover.forward());
            let consistent = ep.rank().index() as i8 == expected_rank
                && self.board.is_empty(ep)
                && origin.is_some_and(|sq| self.board.is_empty(sq))
                && pawn_sq.and_then(|sq| self.board.get(sq))
                    == Some(Piece::new(PieceKind::Pawn, mover));
            if !consistent {
                return illegal(format!("en passant target {} has no pawn behind it", ep));
            }
        }

        let waiting = self.side_to_move.opposite();
        if let Some(king) = self.board.king_square(waiting) {
            if is_square_attacked(&self.board, king, self.side_to_move) {
                return illegal(format!("{} is in check but not to move", waiting));
            }
        }

        Ok(())
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{} {} {} {} {} {}",
            FenParser::placement_to_string(self.board.cells()),
            self.side_to_move.fen_char(),
            self.castling,
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.get(sq)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the repetition key for this position.
    ///
    /// The en-passant target only counts when a pawn of the side to move
    /// stands next to the double-pushed pawn.
    pub fn key(&self) -> PositionKey {
        let us = self.side_to_move;
        let capturable = self.en_passant.filter(|ep| {
            [-1, 1].into_iter().any(|df| {
                ep.offset(df, -us.forward()).and_then(|sq| self.board.get(sq))
                    == Some(Piece::new(PieceKind::Pawn, us))
            })
        });
        PositionKey {
            board: self.board,
            side_to_move: us,
            castling: self.castling,
            en_passant: capturable,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "{} to move", self.side_to_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Rank;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_matches_fen() {
        let pos = Position::startpos();
        assert_eq!(pos.to_fen(), FenParser::STARTPOS);
        assert_eq!(Position::from_fen(FenParser::STARTPOS).unwrap(), pos);
    }

    #[test]
    fn custom_fen_roundtrip() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
        assert_eq!(pos.halfmove_clock(), 2);
        assert_eq!(pos.fullmove_number(), 3);
    }

    #[test]
    fn piece_at() {
        let pos = Position::startpos();
        assert_eq!(
            pos.piece_at(Square::E1),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            pos.piece_at(Square::D8),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(pos.piece_at(Square::new(File::E, Rank::R4)), None);
    }

    #[test]
    fn castling_rights_flags() {
        let mut rights = CastlingRights::ALL;
        rights.remove_kingside(Color::White);
        assert!(!rights.can_castle_kingside(Color::White));
        assert!(rights.can_castle_queenside(Color::White));

        rights.remove_color(Color::Black);
        assert!(!rights.can_castle_kingside(Color::Black));
        assert!(!rights.can_castle_queenside(Color::Black));
        assert_eq!(rights.to_string(), "Q");
        assert_eq!(CastlingRights::NONE.to_string(), "-");
    }

    #[test]
    fn castling_rights_for_rook_squares() {
        let mut rights = CastlingRights::ALL;
        rights.remove_for_square(Square::A8);
        rights.remove_for_square(sq("e4"));
        assert_eq!(rights.to_string(), "KQk");
        rights.remove_for_square(Square::H1);
        assert_eq!(rights.to_string(), "Qk");
    }

    #[test]
    fn rejects_bad_king_count() {
        let err = Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap_err();
        assert!(matches!(err, FenError::IllegalPosition(_)));
        assert!(Position::from_fen("k7/8/8/8/8/8/8/3KK3 w - - 0 1").is_err());
    }

    #[test]
    fn rejects_pawn_on_back_rank() {
        assert!(Position::from_fen("k6P/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        assert!(Position::from_fen("k7/8/8/8/8/8/8/p3K3 w - - 0 1").is_err());
    }

    #[test]
    fn rejects_castling_without_pieces_at_home() {
        assert!(Position::from_fen("r3k2r/8/8/8/8/8/8/R3K3 w KQkq - 0 1").is_err());
        assert!(Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").is_ok());
    }

    #[test]
    fn rejects_inconsistent_en_passant() {
        // No black pawn on e5 behind e6.
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - e6 0 1").is_err());
        // Target on the wrong rank for the side to move.
        assert!(Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - e3 0 1").is_err());
        let pos = Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1").unwrap();
        assert_eq!(pos.en_passant(), Some(sq("e3")));
    }

    #[test]
    fn rejects_side_not_to_move_in_check() {
        // Black king attacked by the white rook while White is to move.
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/R3K2r w - - 0 1").is_ok());
        assert!(Position::from_fen("r3k3/8/8/8/8/8/8/4K3 w - - 0 1").is_ok());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1").is_err());
    }

    #[test]
    fn key_ignores_counters() {
        let a = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        let b = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 17 40").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.key(), b.key());

        let c = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b Q - 0 1").unwrap();
        let d = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert_ne!(a.key(), c.key());
        assert_ne!(a.key(), d.key());
    }

    #[test]
    fn key_counts_en_passant_only_when_capturable() {
        let lone = Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1").unwrap();
        let no_ep = Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(lone.key(), no_ep.key());

        let capturable = Position::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1").unwrap();
        let plain = Position::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - - 0 1").unwrap();
        assert_ne!(capturable.key(), plain.key());
    }

    #[test]
    fn display_shows_side_to_move() {
        let text = Position::startpos().to_string();
        assert!(text.starts_with("8 r n b q k b n r"));
        assert!(text.ends_with("White to move"));
    }
}
