//! Win detection over a fixed table of lines.

use tracing::instrument;

use crate::board::{Board, Mark};

/// Every line that wins when one player holds all three squares.
///
/// The order decides which line is reported if several are complete at once.
pub const WIN_LINES: [[usize; 3]; 8] = [
    // Horizontal
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Vertical
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonal
    [0, 4, 8],
    [2, 4, 6],
];

/// A completed line and the player holding it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Win {
    pub player: Mark,
    pub line: [usize; 3],
}

impl Win {
    /// Whether square `index` is part of the winning line.
    pub fn contains(&self, index: usize) -> bool {
        self.line.contains(&index)
    }
}

/// Returns the first line in [`WIN_LINES`] held entirely by one player.
#[instrument(level = "trace", ret)]
pub fn check_winner(board: &Board) -> Option<Win> {
    for line in WIN_LINES {
        let first = board.get(line[0]);
        if let Some(player) = first {
            if line.iter().all(|i| board.get(*i) == first) {
                return Some(Win { player, line });
            }
        }
    }
    None
}
