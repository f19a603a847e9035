use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of files and ranks on the board.
pub const BOARD_SIZE: u8 = 8;

/// Number of squares on the board.
pub const NUM_SQUARES: usize = 64;

/// Represents a single square on the chess board.
///
/// Stores zero-based file and rank, so:
/// - `(0, 0)` = A1, `(7, 0)` = H1
/// - `(0, 7)` = A8, `(7, 7)` = H8
///
/// A `Square` can only be built from in-range coordinates or a validated
/// algebraic string; there is no fallback value for bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Creates a square from zero-based file and rank, if both are on the board.
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file < BOARD_SIZE && rank < BOARD_SIZE {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// Creates a square from its index (0-63, A1 = 0, H8 = 63).
    pub const fn from_index(idx: u8) -> Option<Self> {
        Self::new(idx % BOARD_SIZE, idx / BOARD_SIZE)
    }

    /// Returns the index of this square (0-63).
    #[inline]
    pub const fn index(self) -> u8 {
        self.rank * BOARD_SIZE + self.file
    }

    /// Zero-based file (0 = A).
    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    /// Zero-based rank (0 = rank 1).
    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// File letter, uppercase ('A'-'H').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'A' + self.file) as char
    }

    /// Rank digit ('1'-'8').
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'1' + self.rank) as char
    }

    /// Square reached by moving `dx` files and `dy` ranks, if still on the board.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        let file = i16::from(self.file) + i16::from(dx);
        let rank = i16::from(self.rank) + i16::from(dy);
        let file = u8::try_from(file).ok()?;
        let rank = u8::try_from(rank).ok()?;
        Self::new(file, rank)
    }

    /// All 64 squares in increasing file, then rank order (A1, B1, ..., H8).
    pub fn all() -> impl Iterator<Item = Square> {
        (0..NUM_SQUARES as u8).filter_map(Square::from_index)
    }
}

/// Signed file and rank difference from one square to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delta {
    pub dx: i8,
    pub dy: i8,
}

impl Delta {
    /// Absolute file and rank distance.
    #[inline]
    pub fn abs(self) -> (u8, u8) {
        (self.dx.unsigned_abs(), self.dy.unsigned_abs())
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Difference `to - from` in files and ranks.
pub fn delta(from: Square, to: Square) -> Delta {
    Delta {
        dx: to.file as i8 - from.file as i8,
        dy: to.rank as i8 - from.rank as i8,
    }
}

/// [`delta`] for raw notation; fails instead of guessing when either side is malformed.
pub fn delta_notation(from: &str, to: &str) -> Result<Delta, SquareParseError> {
    Ok(delta(from.parse()?, to.parse()?))
}

pub fn same_file(a: Square, b: Square) -> bool {
    a.file == b.file
}

pub fn same_rank(a: Square, b: Square) -> bool {
    a.rank == b.rank
}

/// True when both squares share a diagonal (and are distinct).
pub fn same_diagonal(a: Square, b: Square) -> bool {
    let d = delta(a, b);
    d.dx != 0 && d.dx.abs() == d.dy.abs()
}

/// True when a sliding piece could travel between the two squares.
pub fn aligned(a: Square, b: Square) -> bool {
    a != b && (same_file(a, b) || same_rank(a, b) || same_diagonal(a, b))
}

/// Parse algebraic notation like "E4" into a Square.
///
/// # Examples
/// ```
/// # use terminal_chess::game_state::Square;
/// let square: Square = "e4".parse().unwrap();
/// assert_eq!(square.index(), 28);
/// ```
impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareParseError::WrongLength);
        };

        let file = file.to_ascii_uppercase();
        if !('A'..='H').contains(&file) {
            return Err(SquareParseError::BadFile);
        }
        let rank = rank
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .ok_or(SquareParseError::BadRank)?;

        Square::new(file as u8 - b'A', rank as u8 - 1).ok_or(SquareParseError::BadRank)
    }
}

/// Display square in algebraic notation (e.g., "E4").
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

impl TryFrom<String> for Square {
    type Error = SquareParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Error type for parsing square notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SquareParseError {
    /// Square notation must be exactly 2 characters
    #[error("square must be 2 characters (e.g., 'E4')")]
    WrongLength,
    /// File must be a letter from A-H
    #[error("file must be A-H")]
    BadFile,
    /// Rank must be a digit from 1-8
    #[error("rank must be 1-8")]
    BadRank,
}
