//! Text rendering of the board.

use chess_core::{File, Rank, Square};
use chess_rules::Board;

/// How the board is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Chess glyphs and box-drawing borders instead of plain ASCII.
    pub unicode: bool,
    /// Black at the bottom.
    pub flipped: bool,
}

struct Frame {
    top: (char, char, char),
    bottom: (char, char, char),
    side: char,
    empty: char,
}

const UNICODE_FRAME: Frame = Frame {
    top: ('╔', '═', '╗'),
    bottom: ('╚', '═', '╝'),
    side: '║',
    empty: '·',
};

const ASCII_FRAME: Frame = Frame {
    top: ('+', '-', '+'),
    bottom: ('+', '-', '+'),
    side: '|',
    empty: '.',
};

fn border(line: &mut String, (left, fill, right): (char, char, char)) {
    line.push_str("  ");
    line.push(left);
    line.extend(std::iter::repeat(fill).take(8));
    line.push(right);
    line.push('\n');
}

/// Draws the board in a frame with rank numbers on the left and file
/// letters underneath. White is at the bottom unless `flipped`.
pub fn render_board(board: &Board, options: RenderOptions) -> String {
    let frame = if options.unicode {
        &UNICODE_FRAME
    } else {
        &ASCII_FRAME
    };

    let mut ranks = Rank::ALL;
    let mut files = File::ALL;
    if options.flipped {
        files.reverse();
    } else {
        ranks.reverse();
    }

    let mut out = String::new();
    border(&mut out, frame.top);
    for rank in ranks {
        out.push(rank.to_char());
        out.push(' ');
        out.push(frame.side);
        for file in files {
            out.push(match board.get(Square::new(file, rank)) {
                Some(piece) if options.unicode => piece.glyph(),
                Some(piece) => piece.to_fen_char(),
                None => frame.empty,
            });
        }
        out.push(frame.side);
        out.push('\n');
    }
    border(&mut out, frame.bottom);
    out.push_str("   ");
    out.extend(files.iter().map(|f| f.to_char()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::Position;

    #[test]
    fn ascii_board_white_at_bottom() {
        let text = render_board(Position::startpos().board(), RenderOptions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "  +--------+");
        assert_eq!(lines[1], "8 |rnbqkbnr|");
        assert_eq!(lines[5], "4 |........|");
        assert_eq!(lines[8], "1 |RNBQKBNR|");
        assert_eq!(lines[10], "   abcdefgh");
    }

    #[test]
    fn flipped_board_black_at_bottom() {
        let options = RenderOptions {
            unicode: false,
            flipped: true,
        };
        let text = render_board(Position::startpos().board(), options);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "1 |RNBKQBNR|");
        assert_eq!(lines[8], "8 |rnbkqbnr|");
        assert_eq!(lines[10], "   hgfedcba");
    }

    #[test]
    fn unicode_board_uses_glyphs() {
        let options = RenderOptions {
            unicode: true,
            flipped: false,
        };
        let text = render_board(Position::startpos().board(), options);
        assert!(text.starts_with("  ╔════════╗"));
        assert!(text.contains("1 ║♖♘♗♕♔♗♘♖║"));
        assert!(text.contains("5 ║········║"));
    }
}
