//! Check, checkmate and stalemate detection.
//!
//! Attacks are found with the same validator used for ordinary moves: a king is
//! in check when its square is a legal destination for some enemy piece.
//! Tentative moves are played on a clone of the board, so the caller's board is
//! never observed in a half-applied state.

use crate::game_state::{Board, PieceId, Square};

use super::player::Player;
use super::validator::{Move, apply_move, is_legal_move};

/// Squares of `attacker`'s pieces that could capture `defender`'s king.
pub fn checkers(defender: &Player, attacker: &Player, board: &Board) -> Vec<Square> {
    let king = defender.king_square(board);
    attacker
        .pieces()
        .iter()
        .filter(|&&id| is_legal_move(board, id, king))
        .filter_map(|&id| board.piece(id).position)
        .collect()
}

/// True iff some piece of `attacker` has the defending king's square as a legal destination.
pub fn in_check(defender: &Player, attacker: &Player, board: &Board) -> bool {
    let king = defender.king_square(board);
    attacker
        .pieces()
        .iter()
        .any(|&id| is_legal_move(board, id, king))
}

/// Would moving `id` to `to` leave `mover`'s own king attacked?
///
/// Assumes the move itself is legal.
pub fn leaves_king_in_check(
    mover: &Player,
    opponent: &Player,
    board: &Board,
    id: PieceId,
    to: Square,
) -> bool {
    let mut tentative = board.clone();
    apply_move(&mut tentative, id, to);
    in_check(mover, opponent, &tentative)
}

/// Every legal move of `defender` that does not leave its own king in check.
///
/// Tries all 64 destinations for every piece, A1 through H8.
pub fn escapes(defender: &Player, attacker: &Player, board: &Board) -> Vec<Move> {
    defender
        .pieces()
        .iter()
        .flat_map(|&id| Square::all().map(move |to| (id, to)))
        .filter(|&(id, to)| is_legal_move(board, id, to))
        .filter(|&(id, to)| !leaves_king_in_check(defender, attacker, board, id, to))
        .filter_map(|(id, to)| Move::describe(board, id, to))
        .collect()
}

/// Whether `defender` has at least one move that keeps its king safe.
pub fn has_escape(defender: &Player, attacker: &Player, board: &Board) -> bool {
    defender
        .pieces()
        .iter()
        .flat_map(|&id| Square::all().map(move |to| (id, to)))
        .any(|(id, to)| {
            is_legal_move(board, id, to)
                && !leaves_king_in_check(defender, attacker, board, id, to)
        })
}

/// In check with no move that removes the check.
pub fn in_checkmate(defender: &Player, attacker: &Player, board: &Board) -> bool {
    in_check(defender, attacker, board) && !has_escape(defender, attacker, board)
}

/// Not in check, but every legal move would walk into check.
pub fn in_stalemate(defender: &Player, attacker: &Player, board: &Board) -> bool {
    !in_check(defender, attacker, board) && !has_escape(defender, attacker, board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::{Color, PieceKind};

    fn sq(s: &str) -> Square {
        s.parse().expect("test square should be valid")
    }

    fn setup(pieces: &[(PieceKind, Color, &str)]) -> (Board, Player, Player) {
        let mut board = Board::empty();
        for &(kind, color, square) in pieces {
            board.place(kind, color, sq(square)).unwrap();
        }
        let white = Player::new("White", Color::White, &board);
        let black = Player::new("Black", Color::Black, &board);
        (board, white, black)
    }

    #[test]
    fn test_starting_position_has_no_check() {
        let board = Board::standard();
        let white = Player::new("White", Color::White, &board);
        let black = Player::new("Black", Color::Black, &board);
        assert!(!in_check(&white, &black, &board));
        assert!(!in_check(&black, &white, &board));
        assert_eq!(escapes(&white, &black, &board).len(), 20);
    }

    #[test]
    fn test_queen_facing_king_gives_check() {
        let (board, white, black) = setup(&[
            (PieceKind::King, Color::White, "E1"),
            (PieceKind::Queen, Color::White, "E4"),
            (PieceKind::King, Color::Black, "E8"),
        ]);
        assert!(in_check(&black, &white, &board));
        assert_eq!(checkers(&black, &white, &board), vec![sq("E4")]);
        assert!(!in_check(&white, &black, &board));
    }

    #[test]
    fn test_blocked_queen_gives_no_check() {
        let (board, white, black) = setup(&[
            (PieceKind::King, Color::White, "E1"),
            (PieceKind::Queen, Color::White, "E4"),
            (PieceKind::Pawn, Color::Black, "E7"),
            (PieceKind::King, Color::Black, "E8"),
        ]);
        assert!(!in_check(&black, &white, &board));
    }

    #[test]
    fn test_pawn_checks_diagonally_only() {
        let (board, white, black) = setup(&[
            (PieceKind::King, Color::White, "E1"),
            (PieceKind::Pawn, Color::Black, "D2"),
            (PieceKind::King, Color::Black, "E8"),
        ]);
        assert!(in_check(&white, &black, &board));

        let (board, white, black) = setup(&[
            (PieceKind::King, Color::White, "E1"),
            (PieceKind::Pawn, Color::Black, "E2"),
            (PieceKind::King, Color::Black, "E8"),
        ]);
        assert!(!in_check(&white, &black, &board));
    }

    #[test]
    fn test_back_rank_mate() {
        let (board, white, black) = setup(&[
            (PieceKind::King, Color::White, "G1"),
            (PieceKind::Rook, Color::White, "A8"),
            (PieceKind::King, Color::Black, "G8"),
            (PieceKind::Pawn, Color::Black, "F7"),
            (PieceKind::Pawn, Color::Black, "G7"),
            (PieceKind::Pawn, Color::Black, "H7"),
        ]);
        assert!(in_checkmate(&black, &white, &board));
        assert!(escapes(&black, &white, &board).is_empty());
    }

    #[test]
    fn test_back_rank_mate_with_luft_is_not_mate() {
        let (board, white, black) = setup(&[
            (PieceKind::King, Color::White, "G1"),
            (PieceKind::Rook, Color::White, "A8"),
            (PieceKind::King, Color::Black, "G8"),
            (PieceKind::Pawn, Color::Black, "F7"),
            (PieceKind::Pawn, Color::Black, "G7"),
            (PieceKind::Pawn, Color::Black, "H6"),
        ]);
        assert!(in_check(&black, &white, &board));
        assert!(!in_checkmate(&black, &white, &board));
        let escapes = escapes(&black, &white, &board);
        assert_eq!(escapes.len(), 1);
        assert_eq!(escapes[0].to, sq("H7"));
    }

    #[test]
    fn test_capturing_the_checker_escapes() {
        let (board, white, black) = setup(&[
            (PieceKind::King, Color::White, "G1"),
            (PieceKind::Rook, Color::White, "A8"),
            (PieceKind::King, Color::Black, "G8"),
            (PieceKind::Pawn, Color::Black, "F7"),
            (PieceKind::Pawn, Color::Black, "G7"),
            (PieceKind::Pawn, Color::Black, "H7"),
            (PieceKind::Rook, Color::Black, "A1"),
        ]);
        assert!(!in_checkmate(&black, &white, &board));
        let escapes = escapes(&black, &white, &board);
        assert_eq!(escapes.len(), 1);
        assert_eq!(escapes[0].capture, Some(PieceKind::Rook));
    }

    #[test]
    fn test_escape_into_h8_is_found() {
        // The only flight square is H8, the last square the search visits.
        let (board, white, black) = setup(&[
            (PieceKind::King, Color::White, "A1"),
            (PieceKind::Rook, Color::White, "G1"),
            (PieceKind::Rook, Color::White, "A7"),
            (PieceKind::King, Color::Black, "G8"),
            (PieceKind::Pawn, Color::Black, "F8"),
        ]);
        assert!(in_check(&black, &white, &board));
        let escapes = escapes(&black, &white, &board);
        assert_eq!(escapes.iter().map(|m| m.to).collect::<Vec<_>>(), vec![sq("H8")]);
        assert!(!in_checkmate(&black, &white, &board));
    }

    #[test]
    fn test_stalemate() {
        let (board, white, black) = setup(&[
            (PieceKind::King, Color::White, "F7"),
            (PieceKind::Queen, Color::White, "G6"),
            (PieceKind::King, Color::Black, "H8"),
        ]);
        assert!(!in_check(&black, &white, &board));
        assert!(in_stalemate(&black, &white, &board));
        assert!(!in_checkmate(&black, &white, &board));
    }

    #[test]
    fn test_search_leaves_board_untouched() {
        let (board, white, black) = setup(&[
            (PieceKind::King, Color::White, "G1"),
            (PieceKind::Rook, Color::White, "A8"),
            (PieceKind::King, Color::Black, "G8"),
            (PieceKind::Pawn, Color::Black, "F7"),
            (PieceKind::Pawn, Color::Black, "G7"),
            (PieceKind::Pawn, Color::Black, "H7"),
        ]);
        let before = board.clone();
        in_checkmate(&black, &white, &board);
        assert_eq!(board, before);
    }
}
