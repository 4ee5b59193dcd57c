use std::fmt;

use crate::win::{check_winner, Win};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn swap(&self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => f.write_str("X"),
            Mark::O => f.write_str("O"),
        }
    }
}

/// Row and column (both 0-based) of a square index.
pub fn row_col(index: usize) -> (usize, usize) {
    (index / 3, index % 3)
}

/// One snapshot of the 3x3 grid, squares in row-major order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Mark>; 9],
}

impl Board {
    pub const SQUARES: usize = 9;

    pub fn new() -> Self {
        let squares = [None; 9];
        Self { squares }
    }

    pub fn from_squares(squares: [Option<Mark>; 9]) -> Self {
        Self { squares }
    }

    /// Returns a copy of this board with `index` set to `mark`.
    pub fn mark(&self, index: usize, mark: Mark) -> Board {
        let mut new_board = *self;
        new_board.squares[index] = Some(mark);
        new_board
    }

    /// The mark at `index`, treating anything off the board as empty.
    pub fn get(&self, index: usize) -> Option<Mark> {
        self.squares.get(index).copied().flatten()
    }

    pub fn squares(&self) -> &[Option<Mark>; 9] {
        &self.squares
    }

    pub fn is_valid_move(&self, index: usize) -> bool {
        self.get(index).is_none()
    }

    pub fn is_full(&self) -> bool {
        self.squares.iter().all(Option::is_some)
    }

    pub fn get_winner(&self) -> Option<Win> {
        check_winner(self)
    }

    fn display_squares(&self) -> [&'static str; 9] {
        let mut display = [""; 9];
        for (dsquare, square) in display.iter_mut().zip(self.squares.iter()) {
            match square {
                Some(Mark::X) => *dsquare = "X",
                Some(Mark::O) => *dsquare = "O",
                None => *dsquare = " ",
            }
        }
        display
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ds = self.display_squares();
        for row in 0..3 {
            if row > 0 {
                f.write_str("---+---+---\n")?;
            }
            writeln!(f, " {} | {} | {}", ds[row * 3], ds[row * 3 + 1], ds[row * 3 + 2])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_leaves_original_untouched() {
        let empty = Board::new();
        let marked = empty.mark(4, Mark::X);
        assert_eq!(empty.get(4), None);
        assert_eq!(marked.get(4), Some(Mark::X));
        assert!(!marked.is_valid_move(4));
        assert!(marked.is_valid_move(0));
    }

    #[test]
    fn off_board_reads_as_empty() {
        let board = Board::from_squares([Some(Mark::O); 9]);
        assert_eq!(board.get(9), None);
        assert_eq!(board.get(usize::MAX), None);
    }

    #[test]
    fn full_board() {
        assert!(!Board::new().is_full());
        assert!(Board::from_squares([Some(Mark::X); 9]).is_full());
    }

    #[test]
    fn row_col_is_row_major() {
        assert_eq!(row_col(0), (0, 0));
        assert_eq!(row_col(5), (1, 2));
        assert_eq!(row_col(7), (2, 1));
    }

    #[test]
    fn display_top_row_first() {
        let board = Board::new().mark(0, Mark::X).mark(8, Mark::O);
        let rendered = board.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], " X |   |  ");
        assert_eq!(lines[4], "   |   | O");
    }
}
