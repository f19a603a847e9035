//! Board data model: squares, pieces, the board arena and path tracing.

pub mod board;
pub mod path;
pub mod piece;
pub mod square;

pub use board::{Board, BoardError, BoardSnapshot};
pub use piece::{Color, Piece, PieceId, PieceKind, Target};
pub use square::{
    BOARD_SIZE, Delta, NUM_SQUARES, Square, SquareParseError, aligned, delta, delta_notation,
    same_diagonal, same_file, same_rank,
};
