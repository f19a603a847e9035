use crate::game_logic::{GameState, Move};
use crate::game_state::Square;

/// Type of visual feedback for an individual square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareFeedback {
    /// Legal destination for the selected piece
    Destination,
    /// Moving here captures an opponent piece
    Capture,
    /// The selected piece
    Origin,
    /// King that is in check
    Check,
    /// Piece giving check
    Checker,
}

/// Contains the set of squares and their associated feedback types for the current board state.
///
/// `BoardFeedback` is computed by `compute_feedback()` and consumed by display layers to
/// highlight squares: move destinations, captures, the selected piece and check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardFeedback {
    squares: Vec<(Square, SquareFeedback)>,
}

impl BoardFeedback {
    /// Create empty feedback (no highlights)
    #[inline]
    pub const fn new() -> Self {
        Self {
            squares: Vec::new(),
        }
    }

    /// Get all square feedback entries
    #[inline]
    pub fn squares(&self) -> &[(Square, SquareFeedback)] {
        &self.squares
    }

    /// Get feedback for a specific square, if any
    #[inline]
    pub fn get(&self, square: Square) -> Option<SquareFeedback> {
        self.squares
            .iter()
            .find(|(sq, _)| *sq == square)
            .map(|(_, feedback)| *feedback)
    }

    /// Set feedback for a square, replacing any earlier entry.
    pub fn set(&mut self, square: Square, feedback: SquareFeedback) {
        match self.squares.iter_mut().find(|(sq, _)| *sq == square) {
            Some(entry) => entry.1 = feedback,
            None => self.squares.push((square, feedback)),
        }
    }

    /// Returns true if there are no feedback squares to display.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }
}

impl From<Vec<(Square, SquareFeedback)>> for BoardFeedback {
    fn from(squares: Vec<(Square, SquareFeedback)>) -> Self {
        Self { squares }
    }
}

/// Which king is in check and who is attacking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInfo {
    pub king_square: Square,
    pub checkers: Vec<Square>,
}

/// Game state information needed to compute feedback
///
/// This trait defines what the feedback system needs from the game engine.
pub trait FeedbackSource {
    /// Get all legal moves for the side to move
    fn legal_moves(&self) -> &[Move];

    /// Get the square of the piece the player has selected
    fn selected(&self) -> Option<Square>;

    /// Check details for the side to move, if its king is attacked
    fn check_info(&self) -> Option<&CheckInfo>;
}

/// Snapshot of the position between half-moves, as seen by the player to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnView {
    legal_moves: Vec<Move>,
    selected: Option<Square>,
    check: Option<CheckInfo>,
}

impl FeedbackSource for TurnView {
    fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    fn selected(&self) -> Option<Square> {
        self.selected
    }

    fn check_info(&self) -> Option<&CheckInfo> {
        self.check.as_ref()
    }
}

impl GameState {
    /// Build a [`TurnView`] for the side to move, optionally with a selected piece.
    pub fn view(&self, selected: Option<Square>) -> TurnView {
        let turn = self.turn();
        let check = self.player(turn).in_check().then(|| CheckInfo {
            king_square: self.player(turn).king_square(self.board()),
            checkers: self.checkers(turn),
        });
        TurnView {
            legal_moves: self.legal_moves(),
            selected,
            check,
        }
    }
}

/// Compute visual feedback based on current game state.
///
/// - A checked king and its attackers are always marked.
/// - With a piece selected, its square and legal destinations are marked on top.
pub fn compute_feedback(source: &impl FeedbackSource) -> BoardFeedback {
    let mut feedback = show_check(source.check_info());
    if let Some(from) = source.selected() {
        for (square, kind) in show_destinations_for(source.legal_moves(), from) {
            feedback.set(square, kind);
        }
    }
    feedback
}

/// Mark the king in check and every piece attacking it
fn show_check(check: Option<&CheckInfo>) -> BoardFeedback {
    let Some(check) = check else {
        return BoardFeedback::new();
    };
    std::iter::once((check.king_square, SquareFeedback::Check))
        .chain(
            check
                .checkers
                .iter()
                .map(|&sq| (sq, SquareFeedback::Checker)),
        )
        .collect::<Vec<_>>()
        .into()
}

/// Show legal destinations for the selected piece
fn show_destinations_for(
    legal_moves: &[Move],
    from: Square,
) -> impl Iterator<Item = (Square, SquareFeedback)> + '_ {
    std::iter::once((from, SquareFeedback::Origin)).chain(
        legal_moves
            .iter()
            .filter(move |mv| mv.from == from)
            .map(classify_move),
    )
}

/// Classify a move as either a capture or regular destination
fn classify_move(mv: &Move) -> (Square, SquareFeedback) {
    if mv.is_capture() {
        (mv.to, SquareFeedback::Capture)
    } else {
        (mv.to, SquareFeedback::Destination)
    }
}
