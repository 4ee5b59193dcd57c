use std::num::ParseIntError;

use sodium::{Cell, CellLoop, SodiumCtx, Stream};
use thiserror::Error;

mod board;
pub mod cli;
mod game;
mod input;
pub mod logging;
pub mod view;
mod win;

pub use board::{row_col, Board, Mark};
pub use game::{Action, GameState, HistoryEntry, MoveRecord, Status};
pub use input::{parse_command, Command, HELP};
pub use win::{check_winner, Win, WIN_LINES};

#[derive(Clone, Debug, Error)]
pub enum Error {
    #[error("invalid move: square {0} is already taken!")]
    CellOccupied(usize),

    #[error("invalid move: {} has already won!", .0.player)]
    AlreadyWon(Win),

    #[error("invalid square: {0}!")]
    InvalidSquare(usize),

    #[error("no such move in the history: {0}!")]
    InvalidMoveIndex(usize),

    #[error("invalid input: {0}!")]
    InvalidInteger(ParseIntError),

    #[error("unknown command: {0:?} (type `help` for a list)")]
    UnknownCommand(String),
}

impl Error {
    /// True for moves refused by the rules rather than by bad input.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::CellOccupied(_) | Error::AlreadyWon(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The reactive game session.
///
/// Holds the current [`GameState`] in a cell and folds every incoming
/// action into it.
pub struct Session {
    pub state: Cell<GameState>,
    pub board: Cell<Board>,
    pub status: Cell<Status>,
    pub history: Cell<Vec<HistoryEntry>>,
    pub moves: Stream<(usize, Mark)>,
    pub jumps: Stream<usize>,
    pub winner: Stream<Win>,
    pub requests: Stream<Command>,
    pub rejected: Stream<Error>,
    /// The latest rejection, cleared by the next state change.
    pub last_rejection: Cell<Option<Error>>,
}

struct CommandParser {
    action_stream: Stream<Action>,
    request_stream: Stream<Command>,
    error_stream: Stream<Error>,
}

impl Session {
    /// Builds a session driven by lines of user input.
    pub fn new(ctx: &SodiumCtx, kb_input: &Stream<String>) -> Session {
        ctx.transaction(|| {
            let CommandParser {
                action_stream,
                request_stream,
                error_stream,
            } = CommandParser::new(kb_input);

            let mut session = Session::from_actions(ctx, &action_stream);
            session.requests = request_stream;
            session.rejected = error_stream.or_else(&session.rejected);
            session.last_rejection = hold_rejection(&session.rejected, &session.state);
            session
        })
    }

    /// Builds a session driven by already-typed actions.
    pub fn from_actions(ctx: &SodiumCtx, actions: &Stream<Action>) -> Session {
        ctx.transaction(|| {
            let state_cell_loop: CellLoop<GameState> = ctx.new_cell_loop();
            let state_cell_fwd = state_cell_loop.cell();

            let outcome_stream = actions.snapshot(
                &state_cell_fwd,
                |action: &Action, state: &GameState| {
                    state.reduce(*action).map(|next| (*action, next))
                },
            );

            let applied_stream = outcome_stream
                .map(|outcome: &Result<(Action, GameState)>| outcome.as_ref().ok().cloned())
                .filter_option();
            let rejected_stream = outcome_stream
                .map(|outcome: &Result<(Action, GameState)>| outcome.as_ref().err().cloned())
                .filter_option();

            let state_cell = applied_stream
                .map(|(_, state): &(Action, GameState)| state.clone())
                .hold(GameState::new());
            state_cell_loop.loop_(&state_cell);

            let move_stream = applied_stream
                .filter(|(action, _): &(Action, GameState)| matches!(action, Action::Play(_)))
                .map(|(_, state): &(Action, GameState)| state.last_move())
                .filter_option();
            let jump_stream = applied_stream
                .map(|(action, _): &(Action, GameState)| match action {
                    Action::JumpTo(index) => Some(*index),
                    Action::Play(_) => None,
                })
                .filter_option();
            let winner_stream = applied_stream
                .filter(|(action, _): &(Action, GameState)| matches!(action, Action::Play(_)))
                .map(|(_, state): &(Action, GameState)| state.current_winner())
                .filter_option();

            let last_rejection = hold_rejection(&rejected_stream, &state_cell);

            Session {
                board: state_cell.map(|state: &GameState| state.current_snapshot()),
                status: state_cell.map(|state: &GameState| state.status()),
                history: state_cell.map(|state: &GameState| state.entries()),
                state: state_cell,
                moves: move_stream,
                jumps: jump_stream,
                winner: winner_stream,
                requests: ctx.new_stream(),
                rejected: rejected_stream,
                last_rejection,
            }
        })
    }
}

fn hold_rejection(rejected: &Stream<Error>, state: &Cell<GameState>) -> Cell<Option<Error>> {
    rejected
        .map(|err: &Error| Some(err.clone()))
        .or_else(&state.updates().map(|_: &GameState| None))
        .hold(None)
}

impl CommandParser {
    fn new(input_stream: &Stream<String>) -> CommandParser {
        let parsed_stream = input_stream.map(|line: &String| parse_command(line));

        let command_stream = parsed_stream
            .map(|res: &Result<Command>| res.as_ref().ok().copied())
            .filter_option();
        let error_stream = parsed_stream
            .map(|res: &Result<Command>| res.as_ref().err().cloned())
            .filter_option();

        let action_stream = command_stream
            .map(|command: &Command| command.action())
            .filter_option();
        let request_stream =
            command_stream.filter(|command: &Command| command.action().is_none());

        CommandParser {
            action_stream,
            request_stream,
            error_stream,
        }
    }
}
