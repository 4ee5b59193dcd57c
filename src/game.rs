//! The game session as an immutable value: a move history plus a cursor.
//!
//! Every transition returns a fresh [`GameState`]; the value it was called on
//! is left untouched, so holding on to the old value is all it takes to undo
//! a rejected action.

use std::fmt;

use tracing::debug;

use crate::{
    board::{row_col, Board, Mark},
    win::{check_winner, Win},
    Error, Result,
};

/// A user action the session knows how to apply.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Place the next player's mark on a square (0-based, row-major).
    Play(usize),
    /// Move the cursor to an entry of the history.
    JumpTo(usize),
}

/// A board snapshot and the square whose marking produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub board: Board,
    pub slot: Option<usize>,
}

/// One row of the move list, ready to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub index: usize,
    pub label: String,
    pub current: bool,
}

/// What the status line shows for the selected snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Winner(Win),
    Next(Mark),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Winner(win) => write!(f, "Winner: {}", win.player),
            Status::Next(mark) => write!(f, "Next player: {}", mark),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    history: Vec<MoveRecord>,
    cursor: usize,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            history: vec![MoveRecord {
                board: Board::new(),
                slot: None,
            }],
            cursor: 0,
        }
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_snapshot(&self) -> Board {
        self.history[self.cursor].board
    }

    pub fn current_winner(&self) -> Option<Win> {
        check_winner(&self.current_snapshot())
    }

    pub fn x_is_next(&self) -> bool {
        self.cursor % 2 == 0
    }

    pub fn next_player(&self) -> Mark {
        if self.x_is_next() {
            Mark::X
        } else {
            Mark::O
        }
    }

    pub fn status(&self) -> Status {
        match self.current_winner() {
            Some(win) => Status::Winner(win),
            None => Status::Next(self.next_player()),
        }
    }

    /// The square and mark placed by the move at the cursor, if any.
    pub fn last_move(&self) -> Option<(usize, Mark)> {
        let record = &self.history[self.cursor];
        let slot = record.slot?;
        record.board.get(slot).map(|mark| (slot, mark))
    }

    pub fn reduce(&self, action: Action) -> Result<GameState> {
        match action {
            Action::Play(index) => self.apply_move(index),
            Action::JumpTo(index) => self.jump_to(index),
        }
    }

    /// Plays the next player's mark at `index` from the snapshot at the cursor.
    ///
    /// Any history past the cursor is dropped from the returned state.
    ///
    /// # Errors
    /// - [`Error::InvalidSquare`] if `index` is off the board
    /// - [`Error::CellOccupied`] if the square already holds a mark
    /// - [`Error::AlreadyWon`] if the current snapshot already has a winner
    pub fn apply_move(&self, index: usize) -> Result<GameState> {
        if index >= Board::SQUARES {
            return Err(Error::InvalidSquare(index));
        }

        let current = self.current_snapshot();
        if !current.is_valid_move(index) {
            debug!(index, cursor = self.cursor, "square already taken");
            return Err(Error::CellOccupied(index));
        }
        if let Some(win) = check_winner(&current) {
            debug!(index, winner = %win.player, "game already won");
            return Err(Error::AlreadyWon(win));
        }

        let mark = self.next_player();
        let mut history = self.history[..=self.cursor].to_vec();
        history.push(MoveRecord {
            board: current.mark(index, mark),
            slot: Some(index),
        });
        let cursor = history.len() - 1;
        debug!(
            index,
            %mark,
            cursor,
            discarded = self.history.len() - self.cursor - 1,
            "move applied"
        );

        Ok(GameState { history, cursor })
    }

    /// Selects history entry `index` without touching the history itself.
    ///
    /// # Errors
    /// Returns [`Error::InvalidMoveIndex`] if there is no such entry.
    pub fn jump_to(&self, index: usize) -> Result<GameState> {
        if index >= self.history.len() {
            return Err(Error::InvalidMoveIndex(index));
        }
        debug!(from = self.cursor, to = index, "jump");

        Ok(GameState {
            history: self.history.clone(),
            cursor: index,
        })
    }

    pub fn move_label(&self, index: usize) -> Option<String> {
        let record = self.history.get(index)?;
        match record.slot {
            None => Some("start of game".to_string()),
            Some(slot) => {
                let (row, col) = row_col(slot);
                Some(format!("move to row {}, column {}", row + 1, col + 1))
            }
        }
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        (0..self.history.len())
            .filter_map(|index| {
                self.move_label(index).map(|label| HistoryEntry {
                    index,
                    label,
                    current: index == self.cursor,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[usize]) -> GameState {
        moves.iter().fold(GameState::new(), |state, index| {
            state.apply_move(*index).unwrap()
        })
    }

    #[test]
    fn starts_with_empty_board_and_x_to_move() {
        let state = GameState::new();
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.current_snapshot(), Board::new());
        assert_eq!(state.history()[0].slot, None);
        assert_eq!(state.next_player(), Mark::X);
    }

    #[test]
    fn players_alternate() {
        let state = play(&[0, 4, 8, 1, 2]);
        let board = state.current_snapshot();
        for index in [0, 8, 2] {
            assert_eq!(board.get(index), Some(Mark::X));
        }
        for index in [4, 1] {
            assert_eq!(board.get(index), Some(Mark::O));
        }
        assert_eq!(state.current_winner(), None);
        assert_eq!(state.next_player(), Mark::O);
    }

    #[test]
    fn scenario_continued_has_no_winner() {
        // O at 5 then X at 6: (2, 4, 6) has O in the middle.
        let state = play(&[0, 4, 8, 1, 2, 5, 6]);
        let board = state.current_snapshot();
        assert_eq!(board.get(6), Some(Mark::X));
        assert_eq!(board.get(5), Some(Mark::O));
        assert_eq!(state.current_winner(), None);
    }

    #[test]
    fn top_row_wins_and_freezes() {
        let state = play(&[0, 3, 1, 4, 2]);
        let win = state.current_winner().unwrap();
        assert_eq!(win.player, Mark::X);
        assert_eq!(win.line, [0, 1, 2]);
        assert_eq!(state.status().to_string(), "Winner: X");

        match state.apply_move(8) {
            Err(Error::AlreadyWon(reported)) => assert_eq!(reported, win),
            other => panic!("expected AlreadyWon, got {:?}", other),
        }
    }

    #[test]
    fn occupied_square_is_rejected() {
        let state = play(&[4]);
        assert!(matches!(state.apply_move(4), Err(Error::CellOccupied(4))));
    }

    #[test]
    fn occupied_is_reported_before_won() {
        let state = play(&[0, 3, 1, 4, 2]);
        assert!(matches!(state.apply_move(0), Err(Error::CellOccupied(0))));
    }

    #[test]
    fn off_board_square_is_rejected() {
        assert!(matches!(
            GameState::new().apply_move(9),
            Err(Error::InvalidSquare(9))
        ));
    }

    #[test]
    fn jump_only_moves_cursor() {
        let state = play(&[0, 4, 8]);
        let rewound = state.jump_to(1).unwrap();
        assert_eq!(rewound.history(), state.history());
        assert_eq!(rewound.cursor(), 1);
        assert_eq!(rewound.current_snapshot(), state.history()[1].board);
        assert!(!rewound.x_is_next());
    }

    #[test]
    fn jump_to_start_restores_empty_board() {
        let state = play(&[0, 4, 8]).jump_to(0).unwrap();
        assert_eq!(state.current_snapshot(), Board::new());
        assert!(state.x_is_next());
    }

    #[test]
    fn jump_past_end_is_rejected() {
        assert!(matches!(
            play(&[0]).jump_to(2),
            Err(Error::InvalidMoveIndex(2))
        ));
    }

    #[test]
    fn move_after_rewind_discards_future() {
        let state = play(&[0, 4, 8, 1]).jump_to(1).unwrap();
        let branched = state.apply_move(2).unwrap();
        assert_eq!(branched.history().len(), 3);
        assert_eq!(branched.cursor(), 2);
        assert_eq!(branched.history()[2].slot, Some(2));
        assert_eq!(branched.current_snapshot().get(2), Some(Mark::O));
        assert_eq!(branched.current_snapshot().get(8), None);
    }

    #[test]
    fn jumping_back_to_a_won_position_still_rejects() {
        let state = play(&[0, 3, 1, 4, 2]);
        let rewound = state.jump_to(4).unwrap();
        assert!(rewound.current_winner().is_none());
        let replayed = rewound.apply_move(2).unwrap();
        assert!(replayed.current_winner().is_some());
        assert_eq!(replayed.history().len(), 6);
    }

    #[test]
    fn labels_are_one_based() {
        let state = play(&[0, 5]);
        assert_eq!(state.move_label(0).as_deref(), Some("start of game"));
        assert_eq!(
            state.move_label(1).as_deref(),
            Some("move to row 1, column 1")
        );
        assert_eq!(
            state.move_label(2).as_deref(),
            Some("move to row 2, column 3")
        );
        assert_eq!(state.move_label(3), None);
    }

    #[test]
    fn entries_mark_the_cursor() {
        let state = play(&[0, 5]).jump_to(1).unwrap();
        let entries = state.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries.iter().map(|e| e.current).collect::<Vec<_>>(),
            vec![false, true, false]
        );
        assert_eq!(entries[2].index, 2);
    }

    #[test]
    fn last_move_reports_slot_and_mark() {
        assert_eq!(GameState::new().last_move(), None);
        assert_eq!(play(&[3, 7]).last_move(), Some((7, Mark::O)));
    }

    #[test]
    fn full_board_without_winner_keeps_asking_for_next_player() {
        // X O X / X O O / O X X
        let state = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert!(state.current_snapshot().is_full());
        assert_eq!(state.current_winner(), None);
        assert_eq!(state.status(), Status::Next(Mark::O));
    }

    #[test]
    fn reduce_dispatches_actions() {
        let state = GameState::new().reduce(Action::Play(4)).unwrap();
        assert_eq!(state.current_snapshot().get(4), Some(Mark::X));
        let state = state.reduce(Action::JumpTo(0)).unwrap();
        assert_eq!(state.cursor(), 0);
    }
}
