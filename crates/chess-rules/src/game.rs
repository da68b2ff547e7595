//! Game management: turn order, history and terminal conditions.
//!
//! The [`Game`] struct is the entry point for front ends:
//! - moves are submitted as text or as squares and checked against the
//!   legal moves of the current position
//! - every accepted move is recorded with its SAN text
//! - checkmate, stalemate and the automatic draws end the game
//! - moves can be taken back

use crate::movegen::MoveList;
use crate::notation::{self, NotationError};
use crate::rules::{GameOutcome, RuleSet, StandardChess};
use crate::{Position, PositionKey};
use chess_core::{FenError, Move, PieceKind, Square};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A recorded move in game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    /// The move in internal format.
    pub mov: Move,
    /// SAN notation for the move, with check and mate suffixes.
    pub san: String,
}

/// Whether the game accepts moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    AwaitingMove,
    GameOver(GameOutcome),
}

/// Error type for game operations.
///
/// The position is unchanged whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The text is not a move in any accepted notation.
    #[error("malformed move: {0}")]
    MalformedNotation(String),
    /// No legal move matches the input.
    #[error("illegal move: {0}")]
    IllegalMove(String),
    /// The input matches several legal moves.
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
    /// The game has already ended.
    #[error("game has already ended")]
    GameAlreadyOver,
    /// Promotion missing, superfluous, or to a pawn or king.
    #[error("invalid promotion: {0}")]
    InvalidPromotion(String),
}

impl From<NotationError> for GameError {
    fn from(e: NotationError) -> Self {
        match e {
            NotationError::Empty => GameError::MalformedNotation("empty move text".to_string()),
            NotationError::Malformed(text) => GameError::MalformedNotation(text),
            NotationError::NoMatchingMove(text) => GameError::IllegalMove(text),
            NotationError::Ambiguous(text) => GameError::AmbiguousMove(text),
            NotationError::InvalidPromotion(text) => GameError::InvalidPromotion(text),
        }
    }
}

/// A chess game with history tracking.
///
/// Unlike [`Position`], which is a single board state, `Game` keeps the
/// snapshots needed for undo and the position keys needed for repetition.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    /// Positions before each played move, for undo.
    snapshots: Vec<Position>,
    /// Move history with SAN notation.
    moves: Vec<GameMove>,
    /// Key of every position reached, starting position included.
    keys: Vec<PositionKey>,
    outcome: GameOutcome,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_position(StandardChess.initial_position())
    }

    /// Creates a game from a custom starting position.
    ///
    /// The position may already be terminal, in which case the game is
    /// over from the start.
    pub fn from_position(position: Position) -> Self {
        let mut game = Game {
            keys: vec![position.key()],
            position,
            snapshots: Vec::new(),
            moves: Vec::new(),
            outcome: GameOutcome::Ongoing,
        };
        game.outcome = game.evaluate();
        game
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Returns a reference to the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn state(&self) -> GameState {
        if self.outcome.is_over() {
            GameState::GameOver(self.outcome)
        } else {
            GameState::AwaitingMove
        }
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    /// Returns all legal moves in the current position.
    pub fn legal_moves(&self) -> MoveList {
        StandardChess.legal_moves(&self.position)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        StandardChess.is_check(&self.position)
    }

    /// Returns the move history.
    pub fn history(&self) -> &[GameMove] {
        &self.moves
    }

    /// Returns the number of half-moves (plies) played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// How many times the current position has occurred.
    ///
    /// Only positions since the last capture or pawn move are compared;
    /// nothing before an irreversible move can recur.
    pub fn repetition_count(&self) -> usize {
        let Some(current) = self.keys.last() else {
            return 0;
        };
        let window = self.position.halfmove_clock() as usize + 1;
        let start = self.keys.len().saturating_sub(window);
        self.keys[start..].iter().filter(|&k| k == current).count()
    }

    fn ensure_ongoing(&self) -> Result<(), GameError> {
        if self.outcome.is_over() {
            warn!(outcome = %self.outcome, "move submitted after the game ended");
            return Err(GameError::GameAlreadyOver);
        }
        Ok(())
    }

    /// Submits a move as text: coordinates (`e2e4`, `e7e8q`), castling
    /// (`O-O`) or SAN (`Nf3`, `exd5`, `e8=Q`). Returns the outcome after
    /// the move.
    pub fn submit(&mut self, text: &str) -> Result<GameOutcome, GameError> {
        self.ensure_ongoing()?;
        let m = notation::parse_move(&self.position, text).map_err(|e| {
            debug!(input = text, error = %e, "move rejected");
            GameError::from(e)
        })?;
        self.play(m)
    }

    /// Submits a move as origin, destination and promotion choice.
    pub fn submit_squares(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<GameOutcome, GameError> {
        self.ensure_ongoing()?;
        let m = notation::resolve_squares(&self.position, from, to, promotion).map_err(|e| {
            debug!(%from, %to, error = %e, "move rejected");
            GameError::from(e)
        })?;
        self.play(m)
    }

    /// Submits a [`Move`]; only its squares and promotion are consulted.
    pub fn submit_move(&mut self, m: Move) -> Result<GameOutcome, GameError> {
        self.submit_squares(m.from(), m.to(), m.promotion())
    }

    /// Plays a move already resolved against the legal moves.
    fn play(&mut self, m: Move) -> Result<GameOutcome, GameError> {
        let san = notation::move_to_san(&self.position, m);
        let next = StandardChess
            .apply(&self.position, m)
            .map_err(|e| GameError::IllegalMove(e.to_string()))?;

        let previous = std::mem::replace(&mut self.position, next);
        self.snapshots.push(previous);
        self.keys.push(self.position.key());
        debug!(mv = %m, san = %san, fen = %self.position.to_fen(), "move played");
        self.moves.push(GameMove { mov: m, san });

        self.outcome = self.evaluate();
        if self.outcome.is_over() {
            info!(outcome = %self.outcome, plies = self.moves.len(), "game over");
        }
        Ok(self.outcome)
    }

    /// Takes back the last move, returning it. Reopens a finished game.
    pub fn undo(&mut self) -> Option<GameMove> {
        let previous = self.snapshots.pop()?;
        self.position = previous;
        self.keys.pop();
        let undone = self.moves.pop();
        self.outcome = self.evaluate();
        if let Some(m) = &undone {
            debug!(san = %m.san, "move taken back");
        }
        undone
    }

    /// Terminal conditions in precedence order; repetition comes last.
    fn evaluate(&self) -> GameOutcome {
        match StandardChess.position_outcome(&self.position) {
            GameOutcome::Ongoing if self.repetition_count() >= 3 => GameOutcome::DrawByRepetition,
            outcome => outcome,
        }
    }
}
