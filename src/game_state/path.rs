use super::square::{Square, aligned, delta};

/// Squares strictly between two aligned squares, in the direction of travel.
///
/// Each call to [`between`] yields a fresh `Path`; nothing is shared between traces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    next: Square,
    end: Square,
    step: (i8, i8),
}

/// Trace the path from `from` to `to`, excluding both endpoints.
///
/// Returns `None` unless the squares share a file, rank or diagonal.
/// Knight moves are never traced.
pub fn between(from: Square, to: Square) -> Option<Path> {
    if !aligned(from, to) {
        return None;
    }
    let d = delta(from, to);
    let step = (d.dx.signum(), d.dy.signum());
    let next = from.offset(step.0, step.1)?;
    Some(Path {
        next,
        end: to,
        step,
    })
}

impl Iterator for Path {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.next == self.end {
            return None;
        }
        let current = self.next;
        // `end` is reachable along `step`, so the offset cannot leave the board.
        self.next = current.offset(self.step.0, self.step.1).unwrap_or(self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (dx, dy) = delta(self.next, self.end).abs();
        let len = dx.max(dy) as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Path {}
