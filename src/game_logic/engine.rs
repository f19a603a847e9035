use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game_state::{Board, BoardSnapshot, Color, Piece, PieceId, PieceKind, Square};

use super::check;
use super::player::Player;
use super::validator::{IllegalReason, Move, apply_move, check_move, is_legal_move};

/// Where the game stands between half-moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
}

impl Phase {
    #[inline]
    pub fn is_over(self) -> bool {
        !matches!(self, Phase::InProgress)
    }
}

/// Typed rejection of a move attempt. The game is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("there is no piece on {0}")]
    NoPieceAtSource(Square),
    #[error("the piece on {0} belongs to the other player")]
    NotOwnedByPlayer(Square),
    #[error("cannot move from {from} to {to}: {reason}")]
    IllegalDestination {
        from: Square,
        to: Square,
        reason: IllegalReason,
    },
    #[error("moving from {from} to {to} would leave your king in check")]
    LeavesOwnKingInCheck { from: Square, to: Square },
    #[error("it is {0}'s turn")]
    NotYourTurn(Color),
    #[error("the game is over")]
    GameOver,
}

/// A position that cannot arise in a legal game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("{color} has {count} kings on the board, expected 1")]
    Kings { color: Color, count: usize },
    #[error("{0} is in check but it is not their move")]
    OpponentInCheck(Color),
}

/// What happened when a move was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub mv: Move,
    /// The opponent is in check after this move.
    pub check: bool,
    pub phase: Phase,
}

/// A piece picked up by the player to move, with every square it may go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub id: PieceId,
    pub from: Square,
    pub destinations: Vec<Move>,
}

impl Selection {
    pub fn contains(&self, to: Square) -> bool {
        self.destinations.iter().any(|mv| mv.to == to)
    }
}

/// Full game: board, both players, whose turn it is and the move history.
///
/// Serializes through [`SavedGame`](crate::persistence::SavedGame); restoring
/// re-validates the position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "crate::persistence::SavedGame",
    try_from = "crate::persistence::SavedGame"
)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) players: [Player; 2],
    pub(crate) turn: Color,
    pub(crate) phase: Phase,
    pub(crate) history: Vec<Move>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Standard starting position, White to move.
    pub fn new() -> Self {
        Self::with_names("Player 1", "Player 2")
    }

    /// Standard starting position with named players.
    pub fn with_names(white: impl Into<String>, black: impl Into<String>) -> Self {
        let board = Board::standard();
        let players = [
            Player::new(white, Color::White, &board),
            Player::new(black, Color::Black, &board),
        ];
        Self::assemble(board, players, Color::White, Vec::new())
    }

    /// Start from an arbitrary position.
    ///
    /// Each side needs exactly one king, and the side not to move must not be
    /// in check, since its king could then be captured.
    pub fn with_board(board: Board, turn: Color) -> Result<Self, PositionError> {
        let players = [
            Player::new("Player 1", Color::White, &board),
            Player::new("Player 2", Color::Black, &board),
        ];
        Self::restore(board, players, turn, Vec::new())
    }

    /// [`assemble`](Self::assemble) for positions from outside the engine.
    pub(crate) fn restore(
        board: Board,
        players: [Player; 2],
        turn: Color,
        history: Vec<Move>,
    ) -> Result<Self, PositionError> {
        for color in Color::ALL {
            let count = board
                .live_pieces(color)
                .filter(|(_, p)| p.kind == PieceKind::King)
                .count();
            if count != 1 {
                return Err(PositionError::Kings { color, count });
            }
        }
        let state = Self::assemble(board, players, turn, history);
        if state.player(turn.opposite()).in_check() {
            return Err(PositionError::OpponentInCheck(turn.opposite()));
        }
        Ok(state)
    }

    /// Build a state and derive check flags and phase from the board.
    pub(crate) fn assemble(
        board: Board,
        players: [Player; 2],
        turn: Color,
        history: Vec<Move>,
    ) -> Self {
        let mut state = Self {
            board,
            players,
            turn,
            phase: Phase::InProgress,
            history,
        };
        state.evaluate();
        state
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn player(&self, color: Color) -> &Player {
        &self.players[color as usize]
    }

    /// Rename the player of `color`.
    pub fn set_name(&mut self, color: Color, name: impl Into<String>) {
        self.player_mut(color).name = name.into();
    }

    #[inline]
    fn player_mut(&mut self, color: Color) -> &mut Player {
        &mut self.players[color as usize]
    }

    /// Moves played so far, oldest first.
    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Get the piece at a given square, if any
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.board.piece_at(square)
    }

    /// Read-only grid for display layers.
    #[inline]
    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    /// Pieces `color` has taken from the opponent.
    pub fn captured_by(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.player(color)
            .captured()
            .iter()
            .map(|&id| self.board.piece(id))
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        check::in_check(self.player(color), self.player(color.opposite()), &self.board)
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        check::in_checkmate(self.player(color), self.player(color.opposite()), &self.board)
    }

    pub fn is_in_stalemate(&self, color: Color) -> bool {
        check::in_stalemate(self.player(color), self.player(color.opposite()), &self.board)
    }

    /// Pieces giving check to `color`'s king.
    pub fn checkers(&self, color: Color) -> Vec<Square> {
        check::checkers(self.player(color), self.player(color.opposite()), &self.board)
    }

    /// Every legal move for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.phase.is_over() {
            return Vec::new();
        }
        check::escapes(
            self.player(self.turn),
            self.player(self.turn.opposite()),
            &self.board,
        )
    }

    /// Pick up the piece on `from` for `player`, listing where it may go.
    pub fn select(&self, player: Color, from: Square) -> Result<Selection, MoveError> {
        let id = self.validate_source(player, from)?;
        let mover = self.player(player);
        let opponent = self.player(player.opposite());
        let destinations = Square::all()
            .filter(|&to| is_legal_move(&self.board, id, to))
            .filter(|&to| !check::leaves_king_in_check(mover, opponent, &self.board, id, to))
            .filter_map(|to| Move::describe(&self.board, id, to))
            .collect();
        Ok(Selection {
            id,
            from,
            destinations,
        })
    }

    /// Try a move without touching `self`, returning the resulting game.
    pub fn attempt_move(
        &self,
        player: Color,
        from: Square,
        to: Square,
    ) -> Result<GameState, MoveError> {
        let mut next = self.clone();
        next.play(player, from, to)?;
        Ok(next)
    }

    /// Validate and play a move in place.
    ///
    /// Validation is read-only; the board is only touched once the move is accepted,
    /// so a rejected move leaves the game exactly as it was.
    pub fn play(&mut self, player: Color, from: Square, to: Square) -> Result<MoveRecord, MoveError> {
        let id = self.validate(player, from, to).inspect_err(|err| {
            debug!("{player} move {from}-{to} rejected: {err}");
        })?;

        let mv = Move::describe(&self.board, id, to).expect("validated piece is on the board");
        let applied = apply_move(&mut self.board, id, to);
        if let Some(captured) = applied.captured {
            self.player_mut(player.opposite()).forget(captured);
            self.player_mut(player).record_capture(captured);
        }
        self.history.push(mv);
        self.turn = player.opposite();
        self.evaluate();

        let check = self.player(player.opposite()).in_check();
        info!("{player} played {mv}");
        Ok(MoveRecord {
            mv,
            check,
            phase: self.phase,
        })
    }

    fn validate_source(&self, player: Color, from: Square) -> Result<PieceId, MoveError> {
        if self.phase.is_over() {
            return Err(MoveError::GameOver);
        }
        if player != self.turn {
            return Err(MoveError::NotYourTurn(self.turn));
        }
        let id = self
            .board
            .id_at(from)
            .ok_or(MoveError::NoPieceAtSource(from))?;
        if self.board.piece(id).color != player {
            return Err(MoveError::NotOwnedByPlayer(from));
        }
        Ok(id)
    }

    fn validate(&self, player: Color, from: Square, to: Square) -> Result<PieceId, MoveError> {
        let id = self.validate_source(player, from)?;
        check_move(&self.board, id, to)
            .map_err(|reason| MoveError::IllegalDestination { from, to, reason })?;
        let mover = self.player(player);
        let opponent = self.player(player.opposite());
        if check::leaves_king_in_check(mover, opponent, &self.board, id, to) {
            return Err(MoveError::LeavesOwnKingInCheck { from, to });
        }
        Ok(id)
    }

    /// Recompute check flags and, for the side to move, checkmate or stalemate.
    fn evaluate(&mut self) {
        for color in Color::ALL {
            let in_check = self.is_in_check(color);
            self.player_mut(color).in_check = in_check;
        }

        let to_move = self.turn;
        let defender = self.player(to_move);
        let attacker = self.player(to_move.opposite());
        if check::has_escape(defender, attacker, &self.board) {
            if defender.in_check() {
                info!("{} ({to_move}) is in check", defender.name);
            }
            self.phase = Phase::InProgress;
        } else if defender.in_check() {
            let winner = to_move.opposite();
            info!("checkmate, {} ({winner}) wins", self.player(winner).name);
            self.phase = Phase::Checkmate { winner };
        } else {
            info!("stalemate, {to_move} has no legal move");
            self.phase = Phase::Stalemate;
        }
    }
}
