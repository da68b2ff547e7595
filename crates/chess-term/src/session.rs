//! The interactive session: one game plus display settings, driven by
//! lines of user input.

use crate::render::{render_board, RenderOptions};
use chess_rules::{Game, GameError, GameOutcome};
use std::fmt::Write as _;

/// Commands understood besides moves.
pub const HELP: &str = "\
Enter a move in coordinate form (e2e4, e7e8q) or SAN (Nf3, exd5, O-O).
Commands:
  info   side to move, castling rights, en passant square and clocks
  moves  list the legal moves
  fen    print the current position as FEN
  undo   take back the last move
  flip   turn the board around
  help   show this text
  exit   leave (also: quit)";

/// What the front end should do after a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print the text (if any) and keep reading.
    Continue(String),
    /// The position changed; print the text and redraw.
    Redraw(String),
    /// Stop reading input.
    Exit,
}

/// A game in progress together with how it is shown.
#[derive(Debug, Clone)]
pub struct Session {
    game: Game,
    render: RenderOptions,
    show_moves: bool,
}

impl Session {
    pub fn new(game: Game, render: RenderOptions, show_moves: bool) -> Self {
        Session {
            game,
            render,
            show_moves,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The board with the status lines underneath.
    pub fn screen(&self) -> String {
        let mut out = String::new();
        if self.show_moves {
            let _ = writeln!(out, "{}", self.move_list());
        }
        out.push_str(&render_board(self.game.position().board(), self.render));
        out.push('\n');
        match self.game.outcome() {
            GameOutcome::Ongoing => {
                let side = self.game.position().side_to_move();
                if self.game.is_check() {
                    let _ = write!(out, "{side} to move, in check");
                } else {
                    let _ = write!(out, "{side} to move");
                }
            }
            outcome => {
                let _ = write!(out, "Game over: {outcome}");
            }
        }
        out
    }

    /// Handles one line of input.
    pub fn handle(&mut self, line: &str) -> Reply {
        let input = line.trim();
        match input {
            "" => Reply::Continue(String::new()),
            "exit" | "quit" => Reply::Exit,
            "help" => Reply::Continue(HELP.to_string()),
            "info" => Reply::Continue(self.info()),
            "moves" => Reply::Continue(self.move_list()),
            "fen" => Reply::Continue(self.game.to_fen()),
            "flip" => {
                self.render.flipped = !self.render.flipped;
                Reply::Redraw(String::new())
            }
            "undo" => match self.game.undo() {
                Some(undone) => Reply::Redraw(format!("Took back {}", undone.san)),
                None => Reply::Continue("Nothing to undo".to_string()),
            },
            text => self.play(text),
        }
    }

    fn play(&mut self, text: &str) -> Reply {
        match self.game.submit(text) {
            Ok(_) => {
                let san = self
                    .game
                    .history()
                    .last()
                    .map(|m| m.san.clone())
                    .unwrap_or_default();
                Reply::Redraw(format!("Played {san}"))
            }
            Err(GameError::GameAlreadyOver) => Reply::Continue(format!(
                "The game is over ({}). Use undo or exit.",
                self.game.outcome()
            )),
            Err(err) => Reply::Continue(format!("Invalid move: {err}")),
        }
    }

    fn info(&self) -> String {
        let position = self.game.position();
        let en_passant = position
            .en_passant()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "Side to move: {}\nCastling rights: {}\nEn passant: {}\nHalfmove clock: {}\nFullmove number: {}\nCheck: {}\nStatus: {}",
            position.side_to_move(),
            position.castling(),
            en_passant,
            position.halfmove_clock(),
            position.fullmove_number(),
            if self.game.is_check() { "yes" } else { "no" },
            self.game.outcome(),
        )
    }

    fn move_list(&self) -> String {
        let mut moves: Vec<String> = self
            .game
            .legal_moves()
            .iter()
            .map(|m| m.to_coordinate())
            .collect();
        moves.sort();
        format!("Legal moves ({}): {}", moves.len(), moves.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Game::new(), RenderOptions::default(), false)
    }

    #[test]
    fn moves_are_played_and_redrawn() {
        let mut s = session();
        assert_eq!(s.handle("e2e4\n"), Reply::Redraw("Played e4".to_string()));
        assert_eq!(s.handle("Nc6"), Reply::Redraw("Played Nc6".to_string()));
        assert_eq!(s.game().ply_count(), 2);
        assert!(s.screen().ends_with("White to move"));
    }

    #[test]
    fn invalid_moves_are_reported() {
        let mut s = session();
        match s.handle("e2e5") {
            Reply::Continue(text) => assert!(text.starts_with("Invalid move:"), "{text}"),
            other => panic!("unexpected reply {other:?}"),
        }
        match s.handle("zz") {
            Reply::Continue(text) => assert!(text.starts_with("Invalid move:"), "{text}"),
            other => panic!("unexpected reply {other:?}"),
        }
        assert_eq!(s.game().ply_count(), 0);
    }

    #[test]
    fn commands() {
        let mut s = session();
        assert_eq!(s.handle("exit"), Reply::Exit);
        assert_eq!(s.handle("  quit "), Reply::Exit);
        assert_eq!(
            s.handle("fen"),
            Reply::Continue("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string())
        );
        assert_eq!(s.handle("undo"), Reply::Continue("Nothing to undo".to_string()));
        s.handle("e4");
        assert_eq!(s.handle("undo"), Reply::Redraw("Took back e4".to_string()));
        assert_eq!(s.game().ply_count(), 0);
    }

    #[test]
    fn info_lists_the_state() {
        let mut s = session();
        s.handle("e4");
        let Reply::Continue(info) = s.handle("info") else {
            panic!("info should not redraw");
        };
        assert!(info.contains("Side to move: Black"));
        assert!(info.contains("Castling rights: KQkq"));
        assert!(info.contains("En passant: e3"));
        assert!(info.contains("Fullmove number: 1"));
    }

    #[test]
    fn move_list_is_sorted_coordinates() {
        let mut s = session();
        let Reply::Continue(list) = s.handle("moves") else {
            panic!("moves should not redraw");
        };
        assert!(list.starts_with("Legal moves (20): a2a3 a2a4 b1a3"));
    }

    #[test]
    fn finished_game_is_announced() {
        let mut s = session();
        for m in ["f3", "e5", "g4"] {
            s.handle(m);
        }
        assert_eq!(s.handle("Qh4"), Reply::Redraw("Played Qh4#".to_string()));
        assert!(s.screen().ends_with("Game over: checkmate, Black wins"));
        match s.handle("a3") {
            Reply::Continue(text) => assert!(text.starts_with("The game is over")),
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[test]
    fn flip_redraws_the_other_way_round() {
        let mut s = session();
        assert_eq!(s.handle("flip"), Reply::Redraw(String::new()));
        assert!(s.screen().contains("   hgfedcba"));
    }
}
