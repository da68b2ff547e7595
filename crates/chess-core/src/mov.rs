//! Move representation.

use crate::{PieceKind, Square};
use std::fmt;
use std::ops::BitOr;

/// Set of properties a generated move carries.
///
/// Flags describe the move as the generator saw it; they are never
/// recomputed after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveFlags(u8);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    /// An enemy piece is removed (including en passant).
    pub const CAPTURE: MoveFlags = MoveFlags(0b0_0001);
    /// Pawn capture onto the en-passant target.
    pub const EN_PASSANT: MoveFlags = MoveFlags(0b0_0010);
    /// King-side castling (O-O).
    pub const CASTLE_KINGSIDE: MoveFlags = MoveFlags(0b0_0100);
    /// Queen-side castling (O-O-O).
    pub const CASTLE_QUEENSIDE: MoveFlags = MoveFlags(0b0_1000);
    /// Pawn double push from its starting rank.
    pub const DOUBLE_PUSH: MoveFlags = MoveFlags(0b1_0000);

    /// Returns true if every flag in `other` is set.
    #[inline]
    pub const fn contains(self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn union(self, other: MoveFlags) -> MoveFlags {
        MoveFlags(self.0 | other.0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for MoveFlags {
    type Output = MoveFlags;

    #[inline]
    fn bitor(self, rhs: MoveFlags) -> MoveFlags {
        self.union(rhs)
    }
}

/// A chess move: origin, destination, optional promotion and flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
    flags: MoveFlags,
}

impl Move {
    /// A quiet move with no flags.
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
            flags: MoveFlags::NONE,
        }
    }

    /// A move carrying the given flags.
    #[inline]
    pub const fn with_flags(from: Square, to: Square, flags: MoveFlags) -> Self {
        Move {
            from,
            to,
            promotion: None,
            flags,
        }
    }

    /// Returns a copy promoting to `kind`.
    #[inline]
    pub const fn promoting(self, kind: PieceKind) -> Self {
        Move {
            promotion: Some(kind),
            ..self
        }
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        self.promotion
    }

    #[inline]
    pub const fn flags(self) -> MoveFlags {
        self.flags
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    #[inline]
    pub const fn is_double_push(self) -> bool {
        self.flags.contains(MoveFlags::DOUBLE_PUSH)
    }

    #[inline]
    pub const fn is_castle_kingside(self) -> bool {
        self.flags.contains(MoveFlags::CASTLE_KINGSIDE)
    }

    #[inline]
    pub const fn is_castle_queenside(self) -> bool {
        self.flags.contains(MoveFlags::CASTLE_QUEENSIDE)
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        self.is_castle_kingside() || self.is_castle_queenside()
    }

    /// Coordinate notation, e.g. "e2e4" or "e7e8q".
    pub fn to_coordinate(self) -> String {
        self.to_string()
    }

    /// Placeholder used to fill fixed-size move buffers.
    pub const NULL: Move = Move::new(Square::A1, Square::A1);
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}
