//! Serializable game shape for save/load layers.
//!
//! The core never touches the filesystem; callers decide where the JSON goes.

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game_logic::{GameState, Move, Phase, Player, PositionError};
use crate::game_state::{Board, BoardError, Color, Piece, PieceId};

/// Everything needed to rebuild a [`GameState`] exactly.
///
/// Pieces are stored in arena order so that [`PieceId`]s in `captured` and the
/// history stay meaningful after a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub turn: Color,
    pub phase: Phase,
    pub players: Vec<SavedPlayer>,
    pub pieces: Vec<Piece>,
    #[serde(default)]
    pub history: Vec<Move>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPlayer {
    pub name: String,
    pub color: Color,
    /// Informational; recomputed from the board on restore.
    #[serde(default)]
    pub in_check: bool,
    #[serde(default)]
    pub captured: Vec<PieceId>,
}

/// A saved game that does not describe a reachable position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("expected exactly one {0} player")]
    Players(Color),
    #[error(transparent)]
    Position(#[from] PositionError),
    #[error("{color} lists piece #{} as captured, but it is not a captured enemy piece", .id.value())]
    BadCapture { color: Color, id: PieceId },
}

/// Error reading or writing saved games.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<GameState> for SavedGame {
    fn from(state: GameState) -> Self {
        SavedGame::from(&state)
    }
}

impl From<&GameState> for SavedGame {
    fn from(state: &GameState) -> Self {
        let players = Color::ALL
            .iter()
            .map(|&color| {
                let player = state.player(color);
                SavedPlayer {
                    name: player.name.clone(),
                    color,
                    in_check: player.in_check(),
                    captured: player.captured().to_vec(),
                }
            })
            .collect();
        SavedGame {
            turn: state.turn(),
            phase: state.phase(),
            players,
            pieces: state.board().pieces().map(|(_, piece)| *piece).collect(),
            history: state.history().to_vec(),
        }
    }
}

impl TryFrom<SavedGame> for GameState {
    type Error = RestoreError;

    fn try_from(saved: SavedGame) -> Result<Self, Self::Error> {
        let mut board = Board::empty();
        for piece in saved.pieces {
            board.insert(piece)?;
        }

        let [white, black] = Color::ALL.map(|color| {
            let mut matching = saved.players.iter().filter(|p| p.color == color);
            match (matching.next(), matching.next()) {
                (Some(player), None) => Ok(player),
                _ => Err(RestoreError::Players(color)),
            }
        });
        let players = [restore_player(white?, &board)?, restore_player(black?, &board)?];

        let state = GameState::restore(board, players, saved.turn, saved.history)?;
        if state.phase() != saved.phase {
            warn!(
                "saved phase {:?} disagrees with the position, using {:?}",
                saved.phase,
                state.phase()
            );
        }
        Ok(state)
    }
}

fn restore_player(saved: &SavedPlayer, board: &Board) -> Result<Player, RestoreError> {
    let mut player = Player::new(saved.name.clone(), saved.color, board);
    for &id in &saved.captured {
        let valid = board
            .get(id)
            .is_some_and(|p| p.color != saved.color && p.is_captured())
            && !player.captured().contains(&id);
        if !valid {
            return Err(RestoreError::BadCapture {
                color: saved.color,
                id,
            });
        }
        player.record_capture(id);
    }
    Ok(player)
}

/// Serialize a game to JSON.
pub fn to_json(state: &GameState) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(&SavedGame::from(state))?)
}

/// Restore a game from JSON produced by [`to_json`].
pub fn from_json(json: &str) -> Result<GameState, PersistenceError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::{PieceKind, Square};

    fn sq(s: &str) -> Square {
        s.parse().expect("test square should be valid")
    }

    fn played_game() -> GameState {
        let mut game = GameState::with_names("Ada", "Grace");
        for (from, to) in [("E2", "E4"), ("D7", "D5"), ("E4", "D5"), ("D8", "D5")] {
            let turn = game.turn();
            game.play(turn, sq(from), sq(to)).unwrap();
        }
        game
    }

    #[test]
    fn test_saved_game_restores_exactly() {
        let game = played_game();
        let json = to_json(&game).unwrap();
        let restored = from_json(&json).unwrap();

        assert_eq!(restored, game);
        assert_eq!(restored.player(Color::White).name, "Ada");
        assert_eq!(restored.captured_by(Color::White).count(), 1);
        assert_eq!(restored.captured_by(Color::Black).count(), 1);
        assert_eq!(restored.history().len(), 4);
    }

    #[test]
    fn test_game_state_serializes_directly() {
        let game = played_game();
        let value = serde_json::to_value(&game).unwrap();
        assert_eq!(value["turn"], "White");
        assert_eq!(value["pieces"].as_array().unwrap().len(), 32);

        let back: GameState = serde_json::from_value(value).unwrap();
        assert_eq!(back, game);
    }

    #[test]
    fn test_restore_rejects_stacked_pieces() {
        let mut saved = SavedGame::from(&GameState::new());
        saved.pieces[1].position = saved.pieces[0].position;
        assert_eq!(
            GameState::try_from(saved),
            Err(RestoreError::Board(BoardError::Occupied(sq("A1"))))
        );
    }

    #[test]
    fn test_restore_rejects_missing_king() {
        let mut saved = SavedGame::from(&GameState::new());
        let king = saved
            .pieces
            .iter_mut()
            .find(|p| p.kind == PieceKind::King && p.color == Color::Black)
            .unwrap();
        king.position = None;
        assert_eq!(
            GameState::try_from(saved),
            Err(RestoreError::Position(PositionError::Kings {
                color: Color::Black,
                count: 0
            }))
        );
    }

    #[test]
    fn test_restore_rejects_bogus_capture() {
        let mut saved = SavedGame::from(&GameState::new());
        saved.players[0].captured.push(PieceId(20));
        assert_eq!(
            GameState::try_from(saved),
            Err(RestoreError::BadCapture {
                color: Color::White,
                id: PieceId(20)
            })
        );
    }

    #[test]
    fn test_restore_rejects_missing_player() {
        let mut saved = SavedGame::from(&GameState::new());
        saved.players.pop();
        assert_eq!(
            GameState::try_from(saved),
            Err(RestoreError::Players(Color::Black))
        );
    }

    #[test]
    fn test_check_flags_are_recomputed() {
        let mut game = GameState::new();
        for (from, to) in [("E2", "E4"), ("F7", "F6"), ("D1", "H5")] {
            let turn = game.turn();
            game.play(turn, sq(from), sq(to)).unwrap();
        }
        let mut saved = SavedGame::from(&game);
        for player in &mut saved.players {
            player.in_check = false;
        }
        let restored = GameState::try_from(saved).unwrap();
        assert!(restored.player(Color::Black).in_check());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(from_json("{"), Err(PersistenceError::Json(_))));
        assert!(matches!(
            from_json(r#"{"turn":"White","phase":"InProgress","players":[],"pieces":[]}"#),
            Err(PersistenceError::Json(_))
        ));
    }

    #[test]
    fn test_restore_rejects_capturable_king() {
        let mut game = GameState::new();
        for (from, to) in [("E2", "E4"), ("F7", "F6"), ("D1", "H5")] {
            let turn = game.turn();
            game.play(turn, sq(from), sq(to)).unwrap();
        }
        let mut json: serde_json::Value = serde_json::to_value(&game).unwrap();
        json["turn"] = "White".into();

        let err = serde_json::from_value::<GameState>(json).unwrap_err();
        assert!(err.to_string().contains("Black is in check"));

        let mut saved = SavedGame::from(&game);
        saved.turn = Color::White;
        assert_eq!(
            GameState::try_from(saved),
            Err(RestoreError::Position(PositionError::OpponentInCheck(
                Color::Black
            )))
        );
    }

    #[test]
    fn test_restore_rejects_duplicate_capture() {
        let mut game = GameState::new();
        for (from, to) in [("E2", "E4"), ("D7", "D5"), ("E4", "D5")] {
            let turn = game.turn();
            game.play(turn, sq(from), sq(to)).unwrap();
        }
        let mut saved = SavedGame::from(&game);
        let taken = saved.players[0].captured[0];
        saved.players[0].captured.push(taken);

        assert_eq!(
            GameState::try_from(saved),
            Err(RestoreError::BadCapture {
                color: Color::White,
                id: taken
            })
        );
    }
}
