use std::fmt;

use serde::{Deserialize, Serialize};

use super::square::{Square, delta, same_diagonal, same_file, same_rank};

/// Side of the board a piece or player belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank direction pawns of this color advance in.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Zero-based rank holding this side's pawns at the start.
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Zero-based rank holding this side's back row at the start.
    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

/// The six piece variants. Closed on purpose: every rule below matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

/// What sits on a destination square, as far as movement geometry cares.
///
/// Destinations holding a friendly piece never reach the geometry check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Empty,
    Enemy,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Pieces that ignore whatever stands between source and destination.
    #[inline]
    pub const fn can_jump(self) -> bool {
        matches!(self, PieceKind::Knight)
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub const fn symbol(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Whether `to` fits this piece's movement shape from `from`.
    ///
    /// Never looks at the board: the only context is `has_moved` (pawn double
    /// step) and `target` (pawns capture diagonally and advance onto empty squares).
    /// Path obstruction is checked separately by the validator.
    pub fn geometrically_legal(
        self,
        color: Color,
        from: Square,
        to: Square,
        has_moved: bool,
        target: Target,
    ) -> bool {
        if from == to {
            return false;
        }
        let d = delta(from, to);
        let (adx, ady) = d.abs();

        match self {
            PieceKind::Rook => rook_shape(from, to),
            PieceKind::Bishop => same_diagonal(from, to),
            PieceKind::Queen => rook_shape(from, to) || same_diagonal(from, to),
            PieceKind::Knight => matches!((adx, ady), (1, 2) | (2, 1)),
            PieceKind::King => adx <= 1 && ady <= 1,
            PieceKind::Pawn => {
                let forward = color.forward();
                match (d.dx, target) {
                    (0, Target::Empty) => d.dy == forward || (d.dy == 2 * forward && !has_moved),
                    (-1 | 1, Target::Enemy) => d.dy == forward,
                    _ => false,
                }
            }
        }
    }
}

fn rook_shape(from: Square, to: Square) -> bool {
    same_file(from, to) ^ same_rank(from, to)
}

/// Stable handle for a piece inside a [`Board`](super::Board).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub(crate) u8);

impl PieceId {
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// One chess piece.
///
/// `position` is the single source of truth for where the piece stands;
/// `None` means it has been captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub position: Option<Square>,
    pub has_moved: bool,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color, position: Square) -> Self {
        Self {
            kind,
            color,
            position: Some(position),
            has_moved: false,
        }
    }

    #[inline]
    pub const fn is_captured(&self) -> bool {
        self.position.is_none()
    }

    #[inline]
    pub const fn symbol(&self) -> char {
        self.kind.symbol(self.color)
    }
}
