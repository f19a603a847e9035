use std::collections::VecDeque;

use thiserror::Error;

use crate::MoveSource;
use crate::game_logic::GameState;
use crate::game_state::Square;

/// Error when parsing a move script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid square notation: '{0}'")]
    Square(String),
    #[error("a move needs exactly two squares, got {0:?}")]
    Incomplete(Vec<Square>),
}

/// A scriptable move source that replays a written game.
///
/// New script can be appended at any time for interactive use.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMoves {
    pending: VecDeque<(Square, Square)>,
}

impl ScriptedMoves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and queue additional script for execution.
    ///
    /// Format:
    /// - Squares are 2 characters (e.g., "e2", "A1")
    /// - Spaces may separate the two squares of a move
    /// - Periods end a move
    ///
    /// Examples:
    /// - `"e2e4."` - Move e2 to e4
    /// - `"e2 e4. e7 e5."` - Two half-moves
    ///
    /// Nothing is queued if any part of the script is invalid.
    pub fn push_script(&mut self, script: &str) -> Result<(), ParseError> {
        let moves = parse_script(script)?;
        self.pending.extend(moves);
        Ok(())
    }

    /// Number of moves not yet handed out.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Next queued move, if any.
    pub fn pop(&mut self) -> Option<(Square, Square)> {
        self.pending.pop_front()
    }

    /// Hand every pending move to `on_move`, in order.
    pub fn drain<F>(&mut self, mut on_move: F)
    where
        F: FnMut(Square, Square),
    {
        while let Some((from, to)) = self.pop() {
            on_move(from, to);
        }
    }
}

impl MoveSource for ScriptedMoves {
    type Error = std::convert::Infallible;

    fn next_move(&mut self, _game: &GameState) -> Result<Option<(Square, Square)>, Self::Error> {
        Ok(self.pop())
    }
}

/// Parse a script into (from, to) pairs.
fn parse_script(script: &str) -> Result<Vec<(Square, Square)>, ParseError> {
    let mut batches: Vec<Vec<Square>> = vec![Vec::new()];
    let mut current_token = String::new();

    for ch in script.chars() {
        match ch {
            '.' => {
                flush_token(&mut current_token, &mut batches)?;
                batches.push(Vec::new());
            }
            c if c.is_whitespace() => {
                flush_token(&mut current_token, &mut batches)?;
            }
            _ => {
                current_token.push(ch);

                // Squares are exactly 2 characters (e.g., "e2", "a1")
                if current_token.chars().count() == 2 {
                    flush_token(&mut current_token, &mut batches)?;
                }
            }
        }
    }

    flush_token(&mut current_token, &mut batches)?;

    batches
        .into_iter()
        .filter(|batch| !batch.is_empty())
        .map(|batch| match batch[..] {
            [from, to] => Ok((from, to)),
            _ => Err(ParseError::Incomplete(batch)),
        })
        .collect()
}

/// Add current token to the last batch and clear it.
fn flush_token(token: &mut String, batches: &mut [Vec<Square>]) -> Result<(), ParseError> {
    if !token.is_empty() {
        let square: Square = token
            .trim()
            .parse()
            .map_err(|_| ParseError::Square(token.clone()))?;
        batches
            .last_mut()
            .expect("batches should never be empty")
            .push(square);
        token.clear();
    }
    Ok(())
}
