//! Rule set abstraction and game outcomes.
//!
//! The [`RuleSet`] trait gathers the per-position rules a game controller
//! needs: the initial layout, legal moves, move application, check and the
//! outcomes that can be read off a single position. Repetition needs the
//! game history and is left to [`Game`](crate::Game).

mod standard;

pub use standard::StandardChess;

use crate::movegen::MoveList;
use crate::{Position, RulesError};
use chess_core::{Color, Move};
use std::fmt;

/// State of a game with respect to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// The side to move has legal moves and no draw applies.
    Ongoing,
    /// The given color delivered checkmate.
    CheckmateBy(Color),
    /// No legal moves and not in check.
    Stalemate,
    /// The same position occurred for the third time.
    DrawByRepetition,
    /// A hundred halfmoves without a capture or pawn move.
    DrawByFiftyMove,
    /// Neither side can deliver mate.
    DrawByInsufficientMaterial,
}

impl GameOutcome {
    /// Returns true for every outcome other than [`GameOutcome::Ongoing`].
    #[inline]
    pub const fn is_over(self) -> bool {
        !matches!(self, GameOutcome::Ongoing)
    }

    /// The winning color, if the game ended decisively.
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameOutcome::CheckmateBy(color) => Some(color),
            _ => None,
        }
    }

    /// Returns true for the drawn outcomes.
    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            GameOutcome::Stalemate
                | GameOutcome::DrawByRepetition
                | GameOutcome::DrawByFiftyMove
                | GameOutcome::DrawByInsufficientMaterial
        )
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Ongoing => write!(f, "game in progress"),
            GameOutcome::CheckmateBy(color) => write!(f, "checkmate, {} wins", color),
            GameOutcome::Stalemate => write!(f, "draw by stalemate"),
            GameOutcome::DrawByRepetition => write!(f, "draw by threefold repetition"),
            GameOutcome::DrawByFiftyMove => write!(f, "draw by the fifty-move rule"),
            GameOutcome::DrawByInsufficientMaterial => write!(f, "draw by insufficient material"),
        }
    }
}

/// Rules of a chess variant, expressed over single positions.
///
/// # Example
///
/// ```
/// use chess_rules::rules::{GameOutcome, RuleSet, StandardChess};
///
/// let position = StandardChess.initial_position();
/// assert_eq!(StandardChess.legal_moves(&position).len(), 20);
/// assert_eq!(StandardChess.position_outcome(&position), GameOutcome::Ongoing);
/// ```
pub trait RuleSet {
    /// Returns the initial position for this variant.
    fn initial_position(&self) -> Position;

    /// Generates all legal moves for the given position.
    fn legal_moves(&self, position: &Position) -> MoveList;

    /// Returns true if a legal move has the squares and promotion of `m`.
    /// Flags on `m` are ignored.
    fn is_legal(&self, position: &Position, m: Move) -> bool {
        self.legal_moves(position)
            .iter()
            .any(|l| l.from() == m.from() && l.to() == m.to() && l.promotion() == m.promotion())
    }

    /// Applies a move, returning the successor position.
    fn apply(&self, position: &Position, m: Move) -> Result<Position, RulesError>;

    /// Returns true if the side to move is in check.
    fn is_check(&self, position: &Position) -> bool;

    /// Returns true if neither side has enough material to mate.
    fn is_insufficient_material(&self, position: &Position) -> bool;

    /// Outcome readable from the position alone, in precedence order:
    /// checkmate or stalemate, insufficient material, then the fifty-move
    /// rule. Never reports repetition.
    fn position_outcome(&self, position: &Position) -> GameOutcome;
}
