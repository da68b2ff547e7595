//! Square-indexed piece placement.

use chess_core::{Color, File, Piece, PieceKind, Rank, Square};
use std::fmt;

/// The 64 cells of a chess board, each empty or holding one piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; 64],
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Board { cells: [None; 64] }
    }

    /// Wraps raw cells indexed a1 = 0 ... h8 = 63.
    pub const fn from_cells(cells: [Option<Piece>; 64]) -> Self {
        Board { cells }
    }

    /// Returns the raw cells.
    #[inline]
    pub const fn cells(&self) -> &[Option<Piece>; 64] {
        &self.cells
    }

    /// Returns the piece on `sq`, if any.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.cells[sq.index()].is_none()
    }

    /// Places a piece, returning whatever stood there before.
    #[inline]
    pub(crate) fn set(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        self.cells[sq.index()].replace(piece)
    }

    /// Empties a square, returning the piece that stood there.
    #[inline]
    pub(crate) fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()].take()
    }

    /// Iterates occupied squares from a1 to h8.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    /// Iterates the squares holding pieces of `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Counts pieces of the given kind and color.
    pub fn count(&self, kind: PieceKind, color: Color) -> usize {
        self.pieces_of(color).filter(|(_, p)| p.kind == kind).count()
    }

    /// Returns the square of `color`'s king; the first one found if the
    /// board is malformed.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Board {
    /// Rank 8 at the top, White at the bottom, `.` for empty squares.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.iter().rev() {
            write!(f, "{} ", rank)?;
            for file in File::ALL {
                match self.get(Square::new(file, *rank)) {
                    Some(piece) => write!(f, "{} ", piece.to_fen_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board")?;
        fmt::Display::fmt(self, f)
    }
}
