use thiserror::Error;

use super::piece::{Color, Piece, PieceId, PieceKind};
use super::square::{BOARD_SIZE, Square};

/// Read-only view of the board for display layers.
///
/// Indexed `[rank][file]`, zero-based, so `snapshot[0][0]` is A1.
pub type BoardSnapshot = [[Option<(PieceKind, Color)>; BOARD_SIZE as usize]; BOARD_SIZE as usize];

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Error when setting up a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("square {0} is already occupied")]
    Occupied(Square),
    #[error("board cannot hold more than {} pieces", u8::MAX)]
    TooManyPieces,
    #[error("invalid board FEN: {0}")]
    Fen(String),
}

/// The 8×8 grid plus the arena of every piece that has been on it.
///
/// Cells store [`PieceId`]s into the arena, so the board and a player's piece
/// list always refer to the same piece. Captured pieces stay in the arena with
/// `position == None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    pieces: Vec<Piece>,
    grid: [[Option<PieceId>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard opening arrangement, 16 pieces per side.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for color in Color::ALL {
            for (file, kind) in (0u8..).zip(BACK_ROW) {
                board.put(kind, color, file, color.back_rank());
            }
            for file in 0..BOARD_SIZE {
                board.put(PieceKind::Pawn, color, file, color.pawn_rank());
            }
        }
        board
    }

    fn put(&mut self, kind: PieceKind, color: Color, file: u8, rank: u8) {
        let square = Square::new(file, rank).expect("standard layout is on the board");
        self.place(kind, color, square)
            .expect("standard layout never collides");
    }

    /// Place a new piece during setup.
    pub fn place(
        &mut self,
        kind: PieceKind,
        color: Color,
        square: Square,
    ) -> Result<PieceId, BoardError> {
        self.insert(Piece::new(kind, color, square))
    }

    /// Add a piece to the arena, captured or not. Used when restoring saved games.
    pub(crate) fn insert(&mut self, piece: Piece) -> Result<PieceId, BoardError> {
        if let Some(square) = piece.position
            && self.id_at(square).is_some()
        {
            return Err(BoardError::Occupied(square));
        }
        let id = u8::try_from(self.pieces.len())
            .map(PieceId)
            .map_err(|_| BoardError::TooManyPieces)?;
        if let Some(square) = piece.position {
            *self.cell_mut(square) = Some(id);
        }
        self.pieces.push(piece);
        Ok(id)
    }

    /// Get a piece by id.
    ///
    /// Panics if the id did not come from this board.
    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0 as usize]
    }

    /// Get a piece by id, if it belongs to this board.
    #[inline]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0 as usize)
    }

    /// Id of the piece standing on `square`, if any.
    #[inline]
    pub fn id_at(&self, square: Square) -> Option<PieceId> {
        self.grid[square.rank() as usize][square.file() as usize]
    }

    /// Get the piece standing on `square`, if any.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.id_at(square).map(|id| self.piece(id))
    }

    /// Every piece in the arena, captured ones included.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        (0u8..).zip(&self.pieces).map(|(i, p)| (PieceId(i), p))
    }

    /// Pieces of `color` still on the board.
    pub fn live_pieces(&self, color: Color) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces()
            .filter(move |(_, p)| p.color == color && !p.is_captured())
    }

    /// The live king of `color`, if one is on the board.
    pub fn king(&self, color: Color) -> Option<PieceId> {
        self.live_pieces(color)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(id, _)| id)
    }

    /// Number of pieces in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Copy of the cell contents for rendering.
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snapshot: BoardSnapshot = Default::default();
        for square in Square::all() {
            snapshot[square.rank() as usize][square.file() as usize] =
                self.piece_at(square).map(|p| (p.kind, p.color));
        }
        snapshot
    }

    /// Move piece `id` to `to`, capturing whatever stands there.
    ///
    /// Only the validator's apply step calls this; legality is its job.
    pub(crate) fn relocate(&mut self, id: PieceId, to: Square) -> Option<PieceId> {
        let captured = self.id_at(to).filter(|&other| other != id);
        if let Some(captured) = captured {
            self.pieces[captured.0 as usize].position = None;
        }
        if let Some(from) = self.piece(id).position {
            *self.cell_mut(from) = None;
        }
        *self.cell_mut(to) = Some(id);

        let piece = &mut self.pieces[id.0 as usize];
        piece.position = Some(to);
        piece.has_moved = true;

        self.debug_assert_consistent();
        captured
    }

    /// Treat a freshly placed piece as having moved already.
    pub(crate) fn mark_moved(&mut self, id: PieceId) {
        self.pieces[id.0 as usize].has_moved = true;
    }

    #[inline]
    fn cell_mut(&mut self, square: Square) -> &mut Option<PieceId> {
        &mut self.grid[square.rank() as usize][square.file() as usize]
    }

    /// Check that every piece's position agrees with the grid and vice versa.
    pub fn is_consistent(&self) -> bool {
        let pieces_agree = self.pieces().all(|(id, piece)| match piece.position {
            Some(square) => self.id_at(square) == Some(id),
            None => true,
        });
        let cells_agree = Square::all().all(|square| match self.id_at(square) {
            Some(id) => self.get(id).and_then(|p| p.position) == Some(square),
            None => true,
        });
        pieces_agree && cells_agree
    }

    #[inline]
    fn debug_assert_consistent(&self) {
        debug_assert!(self.is_consistent(), "board grid disagrees with piece positions");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().expect("test square should be valid")
    }

    #[test]
    fn test_standard_layout() {
        let board = Board::standard();
        assert_eq!(board.len(), 32);
        assert_eq!(board.live_pieces(Color::White).count(), 16);
        assert_eq!(board.live_pieces(Color::Black).count(), 16);

        let e1 = board.piece_at(sq("E1")).unwrap();
        assert_eq!((e1.kind, e1.color), (PieceKind::King, Color::White));
        let d8 = board.piece_at(sq("D8")).unwrap();
        assert_eq!((d8.kind, d8.color), (PieceKind::Queen, Color::Black));
        let g7 = board.piece_at(sq("G7")).unwrap();
        assert_eq!((g7.kind, g7.color), (PieceKind::Pawn, Color::Black));
        assert!(board.piece_at(sq("E4")).is_none());
        assert!(board.is_consistent());
    }

    #[test]
    fn test_standard_layout_fills_home_ranks() {
        let board = Board::standard();
        for (id, piece) in board.pieces() {
            let square = piece.position.expect("no piece starts captured");
            assert_eq!(board.id_at(square), Some(id));
            assert!(matches!(square.rank(), 0 | 1 | 6 | 7), "{square}");
        }
        let occupied = Square::all().filter(|&s| board.id_at(s).is_some()).count();
        assert_eq!(occupied, 32);
    }

    #[test]
    fn test_place_rejects_occupied_square() {
        let mut board = Board::empty();
        board.place(PieceKind::Rook, Color::White, sq("A1")).unwrap();
        assert_eq!(
            board.place(PieceKind::King, Color::Black, sq("A1")),
            Err(BoardError::Occupied(sq("A1")))
        );
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_relocate_captures_and_keeps_identity() {
        let mut board = Board::empty();
        let rook = board.place(PieceKind::Rook, Color::White, sq("D5")).unwrap();
        let pawn = board.place(PieceKind::Pawn, Color::Black, sq("D7")).unwrap();

        let captured = board.relocate(rook, sq("D7"));

        assert_eq!(captured, Some(pawn));
        assert_eq!(board.id_at(sq("D7")), Some(rook));
        assert_eq!(board.id_at(sq("D5")), None);
        assert!(board.piece(pawn).is_captured());
        assert!(board.piece(rook).has_moved);
        assert_eq!(board.len(), 2);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_king_lookup_skips_captured() {
        let mut board = Board::empty();
        let king = board.place(PieceKind::King, Color::Black, sq("E8")).unwrap();
        let queen = board.place(PieceKind::Queen, Color::White, sq("E1")).unwrap();
        assert_eq!(board.king(Color::Black), Some(king));
        assert_eq!(board.king(Color::White), None);

        board.relocate(queen, sq("E8"));
        assert_eq!(board.king(Color::Black), None);
    }

    #[test]
    fn test_snapshot_matches_cells() {
        let board = Board::standard();
        let snapshot = board.snapshot();
        assert_eq!(snapshot[0][4], Some((PieceKind::King, Color::White)));
        assert_eq!(snapshot[7][3], Some((PieceKind::Queen, Color::Black)));
        assert_eq!(snapshot[3][4], None);
    }
}
