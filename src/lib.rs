//! Rule engine for a two-player chess game.
//!
//! The board is an arena of pieces addressed by [`game_state::PieceId`], with an
//! 8×8 grid of ids on top. Moves are checked in two layers: pure geometry in
//! [`game_state::PieceKind::geometrically_legal`], then occupancy and path
//! blocking in [`game_logic::validator`]. [`game_logic::GameState`] adds turn
//! order, self-check rejection, checkmate and stalemate.
//!
//! ```
//! use terminal_chess::game_logic::GameState;
//!
//! let mut game = GameState::new();
//! let turn = game.turn();
//! game.play(turn, "e2".parse().unwrap(), "e4".parse().unwrap())
//!     .unwrap();
//! assert_ne!(game.turn(), turn);
//! ```

use game_logic::GameState;
use game_state::{BoardSnapshot, Square};

pub mod feedback;
pub mod game_logic;
pub mod game_state;
mod interop;
pub mod mock;
pub mod persistence;

/// Trait for receiving moves from a player.
///
/// Abstracts over interactive terminal input and scripted games,
/// providing a uniform interface for the input side of the game loop.
pub trait MoveSource {
    /// Error type for input failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Next `(from, to)` pair to try, or `None` when the source is exhausted.
    fn next_move(&mut self, game: &GameState) -> Result<Option<(Square, Square)>, Self::Error>;
}

/// Trait for displaying the board and its feedback to the player.
///
/// Mirrors [`MoveSource`] on the output side of the game loop.
pub trait BoardDisplay {
    /// Error type for display update failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Show the given position with feedback highlights.
    ///
    /// Implementations map [`feedback::SquareFeedback`] variants
    /// to their own output (terminal colors, etc.).
    fn show(
        &mut self,
        board: &BoardSnapshot,
        feedback: &feedback::BoardFeedback,
    ) -> Result<(), Self::Error>;
}
