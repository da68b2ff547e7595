//! Chess rules core with a square-indexed board.
//!
//! This crate provides:
//! - [`Board`] and [`Position`]: piece placement plus the full game state
//! - move generation: a lazy pseudo-legal iterator and a legality filter
//! - [`apply_move`]: the successor position for a move
//! - [`notation`]: coordinate and SAN move text
//! - [`Game`]: turn order, history, undo and terminal conditions
//! - [`RuleSet`]: the per-position rules, implemented by [`StandardChess`]
//!
//! # Example
//!
//! ```
//! use chess_rules::{Game, GameOutcome, Position, StandardChess};
//! use chess_rules::rules::RuleSet;
//!
//! // Using Position directly (stateless)
//! let position = StandardChess.initial_position();
//! let moves = StandardChess.legal_moves(&position);
//! assert_eq!(moves.len(), 20);
//!
//! // Using Game for full game management
//! let mut game = Game::new();
//! game.submit("e4").unwrap();
//! game.submit("e7e5").unwrap();
//! assert_eq!(game.outcome(), GameOutcome::Ongoing);
//! println!("Position after 1.e4 e5: {}", game.to_fen());
//! ```

mod apply;
mod board;
mod game;
pub mod movegen;
pub mod notation;
mod position;
pub mod rules;

pub use apply::{apply_move, RulesError};
pub use board::Board;
pub use game::{Game, GameError, GameMove, GameState};
pub use movegen::{
    is_in_check, is_king_attacked, is_legal, is_square_attacked, legal_moves, pseudo_legal_moves,
    MoveList, PseudoLegalMoves,
};
pub use notation::{move_to_san, parse_move, NotationError};
pub use position::{CastlingRights, Position, PositionKey};
pub use rules::{GameOutcome, RuleSet, StandardChess};
