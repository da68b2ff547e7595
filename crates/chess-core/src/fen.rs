//! FEN (Forsyth-Edwards Notation) parsing and serialization.
//!
//! This module handles the text layer only: six fields, rank geometry,
//! piece letters, and well-formed castling and en-passant fields.
//! Position-level checks (king count, checks, pawn ranks) belong to the
//! rules crate.

use crate::{Color, File, Piece, Rank, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("illegal position: {0}")]
    IllegalPosition(String),
}

/// Parsed FEN fields.
///
/// The rules crate turns this into a `Position` after checking that the
/// layout is reachable in legal play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Board cells indexed a1 = 0 ... h8 = 63.
    pub placement: [Option<Piece>; 64],
    pub active_color: Color,
    /// Castling letters in canonical `KQkq` order, or empty for none.
    pub castling: String,
    pub en_passant: Option<Square>,
    /// Halfmoves since the last capture or pawn move.
    pub halfmove_clock: u32,
    /// Starts at 1 and increments after Black's move.
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let active_color = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3])?;

        let halfmove_clock = parts[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;

        let fullmove_number = parts[5]
            .parse::<u32>()
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        Ok(FenParser {
            placement,
            active_color,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(field: &str) -> Result<[Option<Piece>; 64], FenError> {
        let rows: Vec<&str> = field.split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                rows.len()
            )));
        }

        let mut cells = [None; 64];
        for (row, text) in rows.iter().enumerate() {
            let rank = Rank::ALL[7 - row];
            let mut file = 0u8;
            let mut last_was_digit = false;
            for c in text.chars() {
                if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    if last_was_digit {
                        return Err(FenError::InvalidPiecePlacement(format!(
                            "consecutive digits in rank {}",
                            rank
                        )));
                    }
                    file += run as u8;
                    last_was_digit = true;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    let sq = File::from_index(file).map(|f| Square::new(f, rank));
                    let sq = sq.ok_or_else(|| {
                        FenError::InvalidPiecePlacement(format!("rank {} overflows", rank))
                    })?;
                    cells[sq.index()] = Some(piece);
                    file += 1;
                    last_was_digit = false;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c, rank
                    )));
                }
                if file > 8 {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "rank {} overflows",
                        rank
                    )));
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank, file
                )));
            }
        }

        Ok(cells)
    }

    fn parse_castling(field: &str) -> Result<String, FenError> {
        if field == "-" {
            return Ok(String::new());
        }

        let mut seen = [false; 4];
        for c in field.chars() {
            let slot = "KQkq".find(c).ok_or_else(|| {
                FenError::InvalidCastlingRights(format!("invalid character '{}'", c))
            })?;
            if seen[slot] {
                return Err(FenError::InvalidCastlingRights(format!(
                    "duplicate '{}'",
                    c
                )));
            }
            seen[slot] = true;
        }

        Ok("KQkq"
            .chars()
            .zip(seen)
            .filter_map(|(c, on)| on.then_some(c))
            .collect())
    }

    fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
        if field == "-" {
            return Ok(None);
        }

        match Square::from_algebraic(field) {
            Some(sq) if matches!(sq.rank(), Rank::R3 | Rank::R6) => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(field.to_string())),
        }
    }

    /// Encodes board cells as the FEN placement field.
    pub fn placement_to_string(cells: &[Option<Piece>; 64]) -> String {
        let mut out = String::with_capacity(72);
        for rank in Rank::ALL.iter().rev() {
            let mut empty = 0;
            for file in File::ALL {
                match cells[Square::new(file, *rank).index()] {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if *rank != Rank::R1 {
                out.push('/');
            }
        }
        out
    }

    /// Converts the parsed fields back to a FEN string.
    pub fn to_fen(&self) -> String {
        let castling = if self.castling.is_empty() {
            "-"
        } else {
            self.castling.as_str()
        };
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{} {} {} {} {} {}",
            Self::placement_to_string(&self.placement),
            self.active_color.fen_char(),
            castling,
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}
