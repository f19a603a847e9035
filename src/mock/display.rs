use std::io::{self, Write};

use crate::BoardDisplay;
use crate::feedback::{BoardFeedback, SquareFeedback};
use crate::game_state::{BOARD_SIZE, BoardSnapshot, Square};

/// Terminal-based board display.
///
/// Renders a [`BoardSnapshot`] as an 8×8 grid of FEN letters, with ANSI
/// color-coded backgrounds for the [`BoardFeedback`] on each square.
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    /// Create a new terminal display.
    pub fn new() -> Self {
        Self
    }
}

/// Error type for terminal display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

impl BoardDisplay for TerminalDisplay {
    type Error = DisplayError;

    fn show(&mut self, board: &BoardSnapshot, feedback: &BoardFeedback) -> Result<(), Self::Error> {
        render_board(&mut io::stdout(), board, feedback)
    }
}

/// Render the board to any writer. Extracted for testability.
pub(crate) fn render_board(
    w: &mut impl Write,
    board: &BoardSnapshot,
    feedback: &BoardFeedback,
) -> Result<(), DisplayError> {
    for rank in (0..BOARD_SIZE).rev() {
        write!(w, " {} ", rank + 1)?;
        for file in 0..BOARD_SIZE {
            let Some(square) = Square::new(file, rank) else {
                continue;
            };
            let symbol = board[rank as usize][file as usize]
                .map(|(kind, color)| kind.symbol(color))
                .unwrap_or('·');
            write!(w, "{}", format_square(symbol, feedback.get(square)))?;
        }
        writeln!(w)?;
    }
    writeln!(w, "    A  B  C  D  E  F  G  H")?;
    w.flush()?;
    Ok(())
}

/// Wrap a cell in the ANSI background matching its feedback.
fn format_square(symbol: char, feedback: Option<SquareFeedback>) -> String {
    let background = match feedback {
        Some(SquareFeedback::Destination) => "\x1b[44m",
        Some(SquareFeedback::Capture) => "\x1b[41m",
        Some(SquareFeedback::Origin) => "\x1b[42m",
        Some(SquareFeedback::Check) => "\x1b[45m",
        Some(SquareFeedback::Checker) => "\x1b[43m",
        None => return format!(" {symbol} "),
    };
    format!("{background} {symbol} \x1b[0m")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::Board;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn render_to_string(board: &BoardSnapshot, feedback: &BoardFeedback) -> String {
        let mut buf = Vec::new();
        render_board(&mut buf, board, feedback).expect("rendering to buffer should succeed");
        String::from_utf8(buf).expect("output should be valid UTF-8")
    }

    #[test]
    fn show_starting_position() {
        let output = render_to_string(&Board::standard().snapshot(), &BoardFeedback::new());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], " 8  r  n  b  q  k  b  n  r ");
        assert_eq!(lines[4], " 4  ·  ·  ·  ·  ·  ·  ·  · ");
        assert_eq!(lines[7], " 1  R  N  B  Q  K  B  N  R ");
        assert_eq!(lines[8], "    A  B  C  D  E  F  G  H");
    }

    #[test]
    fn show_destination_uses_blue_background() {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("E4"), SquareFeedback::Destination);

        let output = render_to_string(&Board::standard().snapshot(), &feedback);

        assert!(
            output.contains("\x1b[44m · \x1b[0m"),
            "destination should use blue ANSI background"
        );
    }

    #[test]
    fn show_capture_uses_red_background() {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("D7"), SquareFeedback::Capture);

        let output = render_to_string(&Board::standard().snapshot(), &feedback);

        assert!(output.contains("\x1b[41m p \x1b[0m"));
    }

    #[test]
    fn show_check_uses_magenta_background() {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("E8"), SquareFeedback::Check);
        feedback.set(sq("H5"), SquareFeedback::Checker);

        let output = render_to_string(&Board::standard().snapshot(), &feedback);

        assert!(output.contains("\x1b[45m k \x1b[0m"));
        assert!(output.contains("\x1b[43m"));
    }

    #[test]
    fn empty_feedback_has_no_ansi_codes() {
        let output = render_to_string(&Board::standard().snapshot(), &BoardFeedback::new());

        assert!(
            !output.contains("\x1b["),
            "empty feedback should have no ANSI codes"
        );
    }
}
