//! Conversions to and from [`shakmaty`] types.
//!
//! Used to render and read FEN board fields. Only piece placement crosses the
//! boundary; turn, castling and move counters have no counterpart here.

use shakmaty::{File, Rank};

use crate::game_state::{Board, BoardError, Color, PieceKind, Square};

impl From<Square> for shakmaty::Square {
    fn from(square: Square) -> Self {
        shakmaty::Square::from_coords(
            File::new(u32::from(square.file())),
            Rank::new(u32::from(square.rank())),
        )
    }
}

impl From<shakmaty::Square> for Square {
    fn from(square: shakmaty::Square) -> Self {
        let file = square.file().char() as u8 - b'a';
        let rank = square.rank().char() as u8 - b'1';
        Square::new(file, rank).expect("shakmaty squares are always on the board")
    }
}

impl From<Color> for shakmaty::Color {
    fn from(color: Color) -> Self {
        match color {
            Color::White => shakmaty::Color::White,
            Color::Black => shakmaty::Color::Black,
        }
    }
}

impl From<shakmaty::Color> for Color {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => Color::White,
            shakmaty::Color::Black => Color::Black,
        }
    }
}

impl From<PieceKind> for shakmaty::Role {
    fn from(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Pawn => shakmaty::Role::Pawn,
            PieceKind::Rook => shakmaty::Role::Rook,
            PieceKind::Knight => shakmaty::Role::Knight,
            PieceKind::Bishop => shakmaty::Role::Bishop,
            PieceKind::Queen => shakmaty::Role::Queen,
            PieceKind::King => shakmaty::Role::King,
        }
    }
}

impl From<shakmaty::Role> for PieceKind {
    fn from(role: shakmaty::Role) -> Self {
        match role {
            shakmaty::Role::Pawn => PieceKind::Pawn,
            shakmaty::Role::Rook => PieceKind::Rook,
            shakmaty::Role::Knight => PieceKind::Knight,
            shakmaty::Role::Bishop => PieceKind::Bishop,
            shakmaty::Role::Queen => PieceKind::Queen,
            shakmaty::Role::King => PieceKind::King,
        }
    }
}

impl From<&Board> for shakmaty::Board {
    fn from(board: &Board) -> Self {
        let mut out = shakmaty::Board::empty();
        for square in Square::all() {
            if let Some(piece) = board.piece_at(square) {
                out.set_piece_at(
                    square.into(),
                    shakmaty::Piece {
                        role: piece.kind.into(),
                        color: piece.color.into(),
                    },
                );
            }
        }
        out
    }
}

impl Board {
    /// Piece placement as a FEN board field, e.g. `rnbqkbnr/pppppppp/8/...`.
    pub fn board_fen(&self) -> String {
        shakmaty::Board::from(self).to_string()
    }

    /// Build a fresh board from a FEN board field or a full FEN string.
    ///
    /// Pieces get ids in A1..H8 order and start with `has_moved` false, except
    /// pawns that are off their starting rank.
    pub fn from_board_fen(fen: &str) -> Result<Board, BoardError> {
        let placement = fen.split_whitespace().next().unwrap_or_default();
        let parsed = shakmaty::Board::from_ascii_board_fen(placement.as_bytes())
            .map_err(|e| BoardError::Fen(e.to_string()))?;

        let mut board = Board::empty();
        for square in shakmaty::Square::ALL {
            if let Some(piece) = parsed.piece_at(square) {
                let square = Square::from(square);
                let color = Color::from(piece.color);
                let kind = PieceKind::from(piece.role);
                let id = board.place(kind, color, square)?;
                if kind == PieceKind::Pawn && square.rank() != color.pawn_rank() {
                    board.mark_moved(id);
                }
            }
        }
        Ok(board)
    }
}
