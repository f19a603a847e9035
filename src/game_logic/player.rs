use crate::game_state::{Board, Color, PieceId, PieceKind, Square};

/// One side of the game.
///
/// `pieces` holds ids of this player's pieces still in play; `captured`
/// holds ids of enemy pieces this player has taken. `in_check` is recomputed
/// after every half-move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub color: Color,
    pub(crate) pieces: Vec<PieceId>,
    pub(crate) captured: Vec<PieceId>,
    pub(crate) in_check: bool,
}

impl Player {
    /// Create a player owning every live piece of `color` on `board`.
    pub fn new(name: impl Into<String>, color: Color, board: &Board) -> Self {
        Self {
            name: name.into(),
            color,
            pieces: board.live_pieces(color).map(|(id, _)| id).collect(),
            captured: Vec::new(),
            in_check: false,
        }
    }

    /// Ids of this player's pieces still in play.
    #[inline]
    pub fn pieces(&self) -> &[PieceId] {
        &self.pieces
    }

    /// Ids of enemy pieces this player has captured.
    #[inline]
    pub fn captured(&self) -> &[PieceId] {
        &self.captured
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    /// Square of this player's king.
    ///
    /// A player without a king is a broken invariant, not a game condition.
    pub fn king_square(&self, board: &Board) -> Square {
        self.pieces
            .iter()
            .map(|&id| board.piece(id))
            .find(|piece| piece.kind == PieceKind::King)
            .and_then(|king| king.position)
            .expect("king must exist")
    }

    pub(crate) fn record_capture(&mut self, id: PieceId) {
        self.captured.push(id);
    }

    pub(crate) fn forget(&mut self, id: PieceId) {
        self.pieces.retain(|&owned| owned != id);
    }
}
