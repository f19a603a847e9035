use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game_state::{Board, Color, PieceId, PieceKind, Square, Target, path};

/// Why a destination was refused for a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum IllegalReason {
    #[error("the piece is already on that square")]
    SameSquare,
    #[error("the piece has been captured")]
    Captured,
    #[error("the piece cannot move that way")]
    Geometry,
    #[error("the destination holds one of your own pieces")]
    OwnPiece,
    #[error("the path is blocked")]
    Blocked,
}

/// A move as shown to players and recorded in the game history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub color: Color,
    pub piece: PieceKind,
    pub from: Square,
    pub to: Square,
    pub capture: Option<PieceKind>,
}

impl Move {
    /// Describe moving piece `id` to `to` on `board`, before it is played.
    ///
    /// Returns `None` for captured pieces.
    pub fn describe(board: &Board, id: PieceId, to: Square) -> Option<Self> {
        let piece = board.piece(id);
        Some(Self {
            color: piece.color,
            piece: piece.kind,
            from: piece.position?,
            to,
            capture: board.piece_at(to).map(|p| p.kind),
        })
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.capture.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_capture() { 'x' } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            self.piece.symbol(Color::White),
            self.from,
            sep,
            self.to
        )
    }
}

/// Result of applying a move to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub from: Square,
    pub to: Square,
    pub captured: Option<PieceId>,
}

/// Decide whether piece `id` may move to `to`, ignoring turn order and king safety.
///
/// Read-only: never mutates the board.
pub fn check_move(board: &Board, id: PieceId, to: Square) -> Result<(), IllegalReason> {
    let piece = board.piece(id);
    let from = piece.position.ok_or(IllegalReason::Captured)?;
    if from == to {
        return Err(IllegalReason::SameSquare);
    }

    let target = match board.piece_at(to) {
        Some(other) if other.color == piece.color => return Err(IllegalReason::OwnPiece),
        Some(_) => Target::Enemy,
        None => Target::Empty,
    };

    if !piece
        .kind
        .geometrically_legal(piece.color, from, to, piece.has_moved, target)
    {
        return Err(IllegalReason::Geometry);
    }

    if piece.kind.can_jump() {
        return Ok(());
    }

    // Every non-jumping shape is aligned, so a path always exists here.
    let blocked = path::between(from, to)
        .is_some_and(|mut path| path.any(|square| board.id_at(square).is_some()));
    if blocked {
        return Err(IllegalReason::Blocked);
    }

    Ok(())
}

/// [`check_move`] as a predicate.
#[inline]
pub fn is_legal_move(board: &Board, id: PieceId, to: Square) -> bool {
    check_move(board, id, to).is_ok()
}

/// Move piece `id` to `to`, capturing any enemy piece there.
///
/// Call only after [`check_move`] accepted the move.
pub fn apply_move(board: &mut Board, id: PieceId, to: Square) -> Applied {
    let from = board
        .piece(id)
        .position
        .expect("only live pieces are moved");
    let captured = board.relocate(id, to);
    Applied { from, to, captured }
}
