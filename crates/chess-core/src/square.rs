//! Board coordinates.

use std::fmt;

/// A file (column) on the board, from A to H.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// All files, queenside first.
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    /// Creates a file from index (0-7).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Creates a file from its letter ('a'-'h'). Uppercase is not a file:
    /// `B` is a bishop in algebraic notation.
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        if c >= 'a' && c <= 'h' {
            Self::from_index(c as u8 - b'a')
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A rank (row) on the board, from 1 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

impl Rank {
    /// All ranks, White's side first.
    pub const ALL: [Rank; 8] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
    ];

    /// Creates a rank from index (0-7).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Creates a rank from a digit ('1'-'8').
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        if c >= '1' && c <= '8' {
            Self::from_index(c as u8 - b'1')
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A square on the board as a (file, rank) pair.
///
/// Both components are typed enums, so an out-of-range square cannot be
/// constructed. [`Square::index`] maps a1 = 0, b1 = 1, ..., h8 = 63.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    file: File,
    rank: Rank,
}

impl Square {
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Square { file, rank }
    }

    /// Creates a square from zero-based coordinates, `None` if off the board.
    #[inline]
    pub const fn from_coords(file: i8, rank: i8) -> Option<Self> {
        if file < 0 || rank < 0 {
            return None;
        }
        match (File::from_index(file as u8), Rank::from_index(rank as u8)) {
            (Some(file), Some(rank)) => Some(Square { file, rank }),
            _ => None,
        }
    }

    /// Creates a square from its index (0-63).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Self::from_coords((index % 8) as i8, (index / 8) as i8)
        } else {
            None
        }
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square::new(file, rank))
    }

    #[inline]
    pub const fn file(self) -> File {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        self.rank
    }

    /// Returns the index (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        self.rank.index() as usize * 8 + self.file.index() as usize
    }

    /// The square reached by stepping `(df, dr)`, or `None` off the board.
    #[inline]
    pub const fn offset(self, df: i8, dr: i8) -> Option<Self> {
        Self::from_coords(self.file.index() as i8 + df, self.rank.index() as i8 + dr)
    }

    /// True for light squares (h1 is light).
    #[inline]
    pub const fn is_light(self) -> bool {
        (self.file.index() + self.rank.index()) % 2 == 1
    }

    /// Iterates every square from a1 to h8.
    pub fn all() -> impl Iterator<Item = Square> {
        Rank::ALL
            .into_iter()
            .flat_map(|rank| File::ALL.into_iter().map(move |file| Square::new(file, rank)))
    }

    pub const A1: Square = Square::new(File::A, Rank::R1);
    pub const B1: Square = Square::new(File::B, Rank::R1);
    pub const C1: Square = Square::new(File::C, Rank::R1);
    pub const D1: Square = Square::new(File::D, Rank::R1);
    pub const E1: Square = Square::new(File::E, Rank::R1);
    pub const F1: Square = Square::new(File::F, Rank::R1);
    pub const G1: Square = Square::new(File::G, Rank::R1);
    pub const H1: Square = Square::new(File::H, Rank::R1);
    pub const A8: Square = Square::new(File::A, Rank::R8);
    pub const B8: Square = Square::new(File::B, Rank::R8);
    pub const C8: Square = Square::new(File::C, Rank::R8);
    pub const D8: Square = Square::new(File::D, Rank::R8);
    pub const E8: Square = Square::new(File::E, Rank::R8);
    pub const F8: Square = Square::new(File::F, Rank::R8);
    pub const G8: Square = Square::new(File::G, Rank::R8);
    pub const H8: Square = Square::new(File::H, Rank::R8);
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({}{})", self.file, self.rank)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file, self.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_components() {
        let e4 = Square::new(File::E, Rank::R4);
        assert_eq!(e4.file(), File::E);
        assert_eq!(e4.rank(), Rank::R4);
        assert_eq!(e4.index(), 28);
        assert_eq!(Square::from_index(28), Some(e4));
        assert_eq!(Square::from_index(64), None);
    }

    #[test]
    fn square_from_algebraic() {
        assert_eq!(Square::from_algebraic("a1"), Some(Square::A1));
        assert_eq!(Square::from_algebraic("h8"), Some(Square::H8));
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("E4"), None);
        assert_eq!(Square::from_algebraic("e44"), None);
        assert_eq!(Square::from_algebraic(""), None);
    }

    #[test]
    fn square_offset_stays_on_board() {
        assert_eq!(Square::A1.offset(1, 2), Square::from_algebraic("b3"));
        assert_eq!(Square::A1.offset(-1, 0), None);
        assert_eq!(Square::H8.offset(0, 1), None);
        assert_eq!(Square::from_coords(8, 0), None);
        assert_eq!(Square::from_coords(7, 7), Some(Square::H8));
    }

    #[test]
    fn square_all_in_index_order() {
        let all: Vec<Square> = Square::all().collect();
        assert_eq!(all.len(), 64);
        assert!(all.iter().enumerate().all(|(i, sq)| sq.index() == i));
    }

    #[test]
    fn square_color() {
        assert!(!Square::A1.is_light());
        assert!(Square::H1.is_light());
        assert!(!Square::H8.is_light());
    }

    proptest::proptest! {
        #[test]
        fn coords_index_roundtrip(file in 0i8..8, rank in 0i8..8) {
            let sq = Square::from_coords(file, rank).unwrap();
            proptest::prop_assert_eq!(sq.index(), (rank * 8 + file) as usize);
            proptest::prop_assert_eq!(Square::from_index(sq.index() as u8), Some(sq));
            proptest::prop_assert_eq!(Square::from_algebraic(&sq.to_string()), Some(sq));
        }

        #[test]
        fn offsets_never_leave_board(idx in 0u8..64, df in -8i8..=8, dr in -8i8..=8) {
            let sq = Square::from_index(idx).unwrap();
            if let Some(to) = sq.offset(df, dr) {
                proptest::prop_assert_eq!(to.file().index() as i8, sq.file().index() as i8 + df);
                proptest::prop_assert_eq!(to.rank().index() as i8, sq.rank().index() as i8 + dr);
            }
        }
    }

    #[test]
    fn square_display() {
        assert_eq!(Square::E1.to_string(), "e1");
        assert_eq!(format!("{:?}", Square::H8), "Square(h8)");
    }
}
