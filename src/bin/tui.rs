use std::io;

use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use sodium as na;
use tracing::{debug, info};
use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use ttt_rewind::{
    cli::LogArgs, logging, view::ListWindow, Action, Board, Error, HistoryEntry, Session, Status,
};

/// Play tic-tac-toe in the terminal, with undo to any earlier move.
#[derive(Parser)]
#[command(name = "ttt-tui", version)]
struct Cli {
    /// Logs are only written when --log-file is given.
    #[command(flatten)]
    log: LogArgs,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    if cli.log.log_file.is_some() {
        logging::init_logging(&cli.log.log_config())?;
    }

    let ctx = na::SodiumCtx::new();

    let (actions, game) = ctx.transaction(|| {
        let actions: na::StreamSink<Action> = ctx.new_stream_sink();
        let game = Session::from_actions(&ctx, &actions.stream());
        (actions, game)
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut ui = Ui::new(game);
    let result = ui.run(&mut terminal, &actions);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

struct Ui {
    board: na::Cell<Board>,
    status: na::Cell<Status>,
    history: na::Cell<Vec<HistoryEntry>>,
    message: na::Cell<Option<Error>>,
    selected: usize,
    history_window: ListWindow,
    square_areas: [Rect; 9],
    history_area: Rect,
}

impl Ui {
    fn new(game: Session) -> Ui {
        let Session {
            board,
            status,
            history,
            last_rejection,
            ..
        } = game;

        Ui {
            board,
            status,
            history,
            message: last_rejection,
            selected: 0,
            history_window: ListWindow::default(),
            square_areas: [Rect::default(); 9],
            history_area: Rect::default(),
        }
    }

    fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        actions: &na::StreamSink<Action>,
    ) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            let action = match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    ..
                }) => match code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char(c @ '1'..='9') => {
                        Some(Action::Play(c as usize - '1' as usize))
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.move_selection(-1);
                        None
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.move_selection(1);
                        None
                    }
                    KeyCode::Enter => Some(Action::JumpTo(self.selected)),
                    _ => None,
                },
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => self.action_at(column, row),
                _ => None,
            };

            if let Some(action) = action {
                debug!(?action, "ui action");
                actions.send(action);
                self.sync_selection();
            }
        }

        info!("ui closed");
        Ok(())
    }

    fn action_at(&self, column: u16, row: u16) -> Option<Action> {
        let hit = |area: &Rect| {
            column >= area.x
                && column < area.x + area.width
                && row >= area.y
                && row < area.y + area.height
        };

        if let Some(index) = self.square_areas.iter().position(hit) {
            return Some(Action::Play(index));
        }
        if hit(&self.history_area) {
            return self
                .history_window
                .item_at(
                    (row - self.history_area.y) as usize,
                    self.history.sample().len(),
                    self.history_area.height as usize,
                )
                .map(Action::JumpTo);
        }
        None
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.history.sample().len();
        let next = (self.selected as isize + delta).clamp(0, len as isize - 1);
        self.selected = next as usize;
    }

    /// Point the selection at the entry the cursor is on.
    fn sync_selection(&mut self) {
        self.selected = self
            .history
            .sample()
            .iter()
            .position(|entry| entry.current)
            .unwrap_or(0);
    }

    fn draw<B: Backend>(&mut self, f: &mut Frame<B>) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .margin(2)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
            .split(f.size());
        let block = Block::default().title("Board").borders(Borders::ALL);
        self.draw_board(f, block.inner(chunks[0]));
        f.render_widget(block, chunks[0]);

        let block = Block::default().title("Game Info").borders(Borders::ALL);
        self.draw_info(f, block.inner(chunks[1]));
        f.render_widget(block, chunks[1]);
    }

    fn draw_board<B: Backend>(&mut self, f: &mut Frame<B>, area: Rect) {
        let thirds = [
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ];
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(thirds.as_ref())
            .split(area);

        let board = self.board.sample();
        let winner = board.get_winner();

        for (r, row_area) in rows.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(thirds.as_ref())
                .split(*row_area);
            for (c, cell_area) in cells.iter().enumerate() {
                let index = r * 3 + c;
                self.square_areas[index] = *cell_area;

                let highlight = winner.map_or(false, |win| win.contains(index));
                let style = if highlight {
                    Style::default().bg(Color::Yellow).fg(Color::Black)
                } else {
                    Style::default()
                };
                let mark = board
                    .get(index)
                    .map_or_else(|| (index + 1).to_string(), |mark| mark.to_string());
                let mark_style = if board.get(index).is_some() {
                    style.add_modifier(Modifier::BOLD)
                } else {
                    style.fg(Color::DarkGray)
                };

                let block = Block::default().borders(Borders::ALL).style(style);
                let inner = block.inner(*cell_area);
                let padding = inner.height.saturating_sub(1) / 2;
                let mut lines = vec![Spans::from(""); padding as usize];
                lines.push(Spans::from(Span::styled(mark, mark_style)));
                let paragraph = Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .block(block);
                f.render_widget(paragraph, *cell_area);
            }
        }
    }

    fn draw_info<B: Backend>(&mut self, f: &mut Frame<B>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(2),
                    Constraint::Length(2),
                    Constraint::Min(3),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(area);

        let status = Paragraph::new(self.status.sample().to_string())
            .style(Style::default().add_modifier(Modifier::BOLD));
        f.render_widget(status, chunks[0]);

        let message = self
            .message
            .sample()
            .map(|err| err.to_string())
            .unwrap_or_default();
        f.render_widget(
            Paragraph::new(message).style(Style::default().fg(Color::Red)),
            chunks[1],
        );

        let block = Block::default().title("Moves").borders(Borders::TOP);
        self.history_area = block.inner(chunks[2]);

        // The pane is sliced to what fits so rows map straight to entries.
        let history = self.history.sample();
        let height = self.history_area.height as usize;
        self.history_window.follow(Some(self.selected), history.len(), height);
        let visible = self.history_window.visible(history.len(), height);
        let mut list_state = ListState::default();
        list_state.select(
            visible
                .contains(&self.selected)
                .then(|| self.selected - visible.start),
        );

        let items: Vec<ListItem> = history[visible]
            .iter()
            .map(|entry| {
                let style = if entry.current {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format!("{:>2}. Go to {}", entry.index, entry.label)).style(style)
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_symbol("> ")
            .highlight_style(Style::default().fg(Color::Cyan));
        f.render_stateful_widget(list, chunks[2], &mut list_state);

        let help = Paragraph::new("1-9/click: play  up/down+enter: go to move  q: quit")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[3]);
    }
}
