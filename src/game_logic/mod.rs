//! Chess rules: move validation, check detection and the game state machine.

pub mod check;
mod engine;
mod player;
pub mod validator;

pub use engine::{GameState, MoveError, MoveRecord, Phase, PositionError, Selection};
pub use player::Player;
pub use validator::{IllegalReason, Move};
