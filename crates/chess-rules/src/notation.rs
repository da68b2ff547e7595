//! Move text: coordinate notation and Standard Algebraic Notation (SAN).
//!
//! Accepted input forms:
//! - coordinates: "e2e4", "e7e8q"
//! - castling: "O-O", "O-O-O" (zeros accepted too)
//! - SAN: "e4", "Nf3", "exd5", "e8=Q", "Nbd2", "R1e1", "Qh4#"
//!
//! Text is first parsed into a [`MoveText`] without looking at the board,
//! then resolved against the legal moves of a position.

use crate::apply_move;
use crate::movegen::{is_in_check, legal_moves, MoveList};
use crate::Position;
use chess_core::{File, Move, PieceKind, Rank, Square};
use thiserror::Error;

/// Errors from parsing or resolving move text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("empty move text")]
    Empty,

    #[error("malformed move text: {0}")]
    Malformed(String),

    #[error("no legal move matches {0}")]
    NoMatchingMove(String),

    #[error("{0} matches more than one legal move")]
    Ambiguous(String),

    #[error("invalid promotion in {0}")]
    InvalidPromotion(String),
}

/// Move text parsed without reference to a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveText {
    /// Origin and destination squares, e.g. "e7e8q".
    Coordinate {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },
    /// "O-O" or "O-O-O".
    Castle { kingside: bool },
    /// A SAN piece move or pawn move.
    San(SanMove),
}

/// The components of a SAN move other than castling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanMove {
    pub piece: PieceKind,
    pub from_file: Option<File>,
    pub from_rank: Option<Rank>,
    pub capture: bool,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

/// Parses move text into its components.
pub fn parse_move_text(text: &str) -> Result<MoveText, NotationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(NotationError::Empty);
    }
    let body = trimmed.trim_end_matches(['+', '#']);

    match body {
        "O-O" | "0-0" => return Ok(MoveText::Castle { kingside: true }),
        "O-O-O" | "0-0-0" => return Ok(MoveText::Castle { kingside: false }),
        _ => {}
    }

    if let Some(coordinate) = parse_coordinate(body) {
        return Ok(coordinate);
    }

    parse_san(body)
        .map(MoveText::San)
        .ok_or_else(|| NotationError::Malformed(trimmed.to_string()))
}

fn parse_coordinate(body: &str) -> Option<MoveText> {
    if !body.is_ascii() || !(4..=5).contains(&body.len()) {
        return None;
    }
    let from = Square::from_algebraic(&body[0..2])?;
    let to = Square::from_algebraic(&body[2..4])?;
    let promotion = match body[4..].chars().next() {
        Some(c) => Some(PieceKind::from_letter(c)?),
        None => None,
    };
    Some(MoveText::Coordinate { from, to, promotion })
}

fn san_piece(c: char) -> Option<PieceKind> {
    match c {
        'N' | 'B' | 'R' | 'Q' | 'K' => PieceKind::from_letter(c),
        _ => None,
    }
}

fn parse_san(body: &str) -> Option<SanMove> {
    let mut chars: Vec<char> = body.chars().collect();

    let piece = match chars.first().copied().and_then(san_piece) {
        Some(kind) => {
            chars.remove(0);
            kind
        }
        None => PieceKind::Pawn,
    };

    // Trailing promotion, with or without '='.
    let mut promotion = None;
    if let Some(&last) = chars.last() {
        if last.is_ascii_uppercase() {
            promotion = Some(PieceKind::from_letter(last)?);
            chars.pop();
            if chars.last() == Some(&'=') {
                chars.pop();
            }
        }
    }

    if chars.len() < 2 {
        return None;
    }
    let rank = Rank::from_char(chars.pop()?)?;
    let file = File::from_char(chars.pop()?)?;
    let to = Square::new(file, rank);

    let capture = chars.last() == Some(&'x');
    if capture {
        chars.pop();
    }

    let (from_file, from_rank) = match chars.as_slice() {
        [] => (None, None),
        [c] => match (File::from_char(*c), Rank::from_char(*c)) {
            (Some(f), _) => (Some(f), None),
            (None, Some(r)) => (None, Some(r)),
            (None, None) => return None,
        },
        [f, r] => (Some(File::from_char(*f)?), Some(Rank::from_char(*r)?)),
        _ => return None,
    };

    if piece == PieceKind::Pawn && (from_rank.is_some() || (capture && from_file.is_none())) {
        return None;
    }
    if piece != PieceKind::Pawn && promotion.is_some() {
        return None;
    }

    Some(SanMove {
        piece,
        from_file,
        from_rank,
        capture,
        to,
        promotion,
    })
}

/// Picks the single legal move among `candidates` that carries `promotion`.
fn select(
    candidates: Vec<Move>,
    promotion: Option<PieceKind>,
    text: &str,
) -> Result<Move, NotationError> {
    if candidates.is_empty() {
        return Err(NotationError::NoMatchingMove(text.to_string()));
    }

    let promoting = candidates.iter().any(|m| m.promotion().is_some());
    match promotion {
        None if promoting => return Err(NotationError::InvalidPromotion(text.to_string())),
        Some(_) if !promoting => return Err(NotationError::InvalidPromotion(text.to_string())),
        Some(kind) if !kind.is_promotable() => {
            return Err(NotationError::InvalidPromotion(text.to_string()))
        }
        _ => {}
    }

    let mut chosen = candidates.into_iter().filter(|m| m.promotion() == promotion);
    match (chosen.next(), chosen.next()) {
        (Some(m), None) => Ok(m),
        (Some(_), Some(_)) => Err(NotationError::Ambiguous(text.to_string())),
        (None, _) => Err(NotationError::NoMatchingMove(text.to_string())),
    }
}

/// Resolves an origin/destination/promotion triple against the legal moves.
pub fn resolve_squares(
    position: &Position,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> Result<Move, NotationError> {
    let text = match promotion {
        Some(kind) => format!("{}{}{}", from, to, kind.letter()),
        None => format!("{}{}", from, to),
    };
    let candidates = legal_moves(position)
        .iter()
        .copied()
        .filter(|m| m.from() == from && m.to() == to)
        .collect();
    select(candidates, promotion, &text)
}

/// Resolves parsed move text against the legal moves of `position`.
pub fn resolve(position: &Position, text: &MoveText) -> Result<Move, NotationError> {
    match *text {
        MoveText::Coordinate { from, to, promotion } => {
            resolve_squares(position, from, to, promotion)
        }
        MoveText::Castle { kingside } => {
            let name = if kingside { "O-O" } else { "O-O-O" };
            legal_moves(position)
                .iter()
                .copied()
                .find(|m| {
                    if kingside {
                        m.is_castle_kingside()
                    } else {
                        m.is_castle_queenside()
                    }
                })
                .ok_or_else(|| NotationError::NoMatchingMove(name.to_string()))
        }
        MoveText::San(san) => {
            let candidates = legal_moves(position)
                .iter()
                .copied()
                .filter(|m| {
                    m.to() == san.to
                        && !m.is_castling()
                        && position.piece_at(m.from()).map(|p| p.kind) == Some(san.piece)
                        && san.from_file.map_or(true, |f| m.from().file() == f)
                        && san.from_rank.map_or(true, |r| m.from().rank() == r)
                        && (!san.capture || m.is_capture())
                })
                .collect();
            select(candidates, san.promotion, &san_text(&san))
        }
    }
}

/// Parses `text` and resolves it to a legal move of `position`.
pub fn parse_move(position: &Position, text: &str) -> Result<Move, NotationError> {
    let parsed = parse_move_text(text)?;
    resolve(position, &parsed)
}

fn san_text(san: &SanMove) -> String {
    let mut text = String::new();
    if san.piece != PieceKind::Pawn {
        text.push(san.piece.letter().to_ascii_uppercase());
    }
    text.extend(san.from_file.map(File::to_char));
    text.extend(san.from_rank.map(Rank::to_char));
    if san.capture {
        text.push('x');
    }
    text.push_str(&san.to.to_string());
    if let Some(kind) = san.promotion {
        text.push('=');
        text.push(kind.letter().to_ascii_uppercase());
    }
    text
}

/// File, rank, or both: whatever tells `m` apart from other legal moves of
/// the same piece kind to the same square.
fn disambiguation(position: &Position, legal: &MoveList, m: Move, kind: PieceKind) -> String {
    let rivals: Vec<Square> = legal
        .iter()
        .filter(|o| o.to() == m.to() && o.from() != m.from())
        .filter(|o| position.piece_at(o.from()).map(|p| p.kind) == Some(kind))
        .map(|o| o.from())
        .collect();

    let from = m.from();
    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|r| r.file() != from.file()) {
        from.file().to_char().to_string()
    } else if rivals.iter().all(|r| r.rank() != from.rank()) {
        from.rank().to_char().to_string()
    } else {
        from.to_string()
    }
}

/// Renders a legal move of `position` in SAN, with a `+` or `#` suffix.
///
/// A move that does not fit the position is rendered in coordinate form.
pub fn move_to_san(position: &Position, m: Move) -> String {
    let Some(piece) = position.piece_at(m.from()) else {
        return m.to_coordinate();
    };

    let mut san = if m.is_castle_kingside() {
        "O-O".to_string()
    } else if m.is_castle_queenside() {
        "O-O-O".to_string()
    } else {
        let mut text = String::new();
        if piece.kind == PieceKind::Pawn {
            if m.is_capture() {
                text.push(m.from().file().to_char());
            }
        } else {
            text.push(piece.kind.letter().to_ascii_uppercase());
            text.push_str(&disambiguation(position, &legal_moves(position), m, piece.kind));
        }
        if m.is_capture() {
            text.push('x');
        }
        text.push_str(&m.to().to_string());
        if let Some(kind) = m.promotion() {
            text.push('=');
            text.push(kind.letter().to_ascii_uppercase());
        }
        text
    };

    if let Ok(next) = apply_move(position, m) {
        if is_in_check(&next) {
            san.push(if legal_moves(&next).is_empty() { '#' } else { '+' });
        }
    }
    san
}
