use std::io::{self, BufRead};

use clap::Parser;
use sodium::{SodiumCtx, StreamSink};
use tracing::info;

use ttt_rewind::{
    cli::LogArgs, logging, Board, Command, Error, HistoryEntry, Mark, Session, Status, Win, HELP,
};

/// Play tic-tac-toe on the command line, with undo to any earlier move.
#[derive(Parser)]
#[command(name = "ttt", version)]
struct Cli {
    #[command(flatten)]
    log: LogArgs,
}

fn print_history(entries: &[HistoryEntry]) {
    for entry in entries {
        let marker = if entry.current { '>' } else { ' ' };
        println!("{} {:>2}. {}", marker, entry.index, entry.label);
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log.log_config())?;

    let ctx = SodiumCtx::new();

    let (boot, kb_input, game, quit, _listeners) = ctx.transaction(|| {
        let mut listeners = Vec::new();

        let boot: StreamSink<()> = ctx.new_stream_sink();
        let kb_input: StreamSink<String> = ctx.new_stream_sink();

        let game = Session::new(&ctx, &kb_input.stream());

        listeners.push(boot.stream().listen({
            let board = game.board.clone();
            let status = game.status.clone();
            move |_: &()| {
                println!("Welcome to Tic Tac Toe! Type `help` for commands.\n");
                println!("{}", board.sample());
                println!("{}", status.sample());
            }
        }));

        listeners.push(game.rejected.listen(|err: &Error| println!("{}", err)));

        listeners.push(game.moves.listen(|(index, mark): &(usize, Mark)| {
            println!("\n{}s took square {}:", mark, index + 1)
        }));

        listeners.push(
            game.jumps
                .listen(|index: &usize| println!("\nBack to move {}:", index)),
        );

        listeners.push(game.board.updates().listen(|board: &Board| println!("{}", board)));

        listeners.push(
            game.status
                .updates()
                .listen(|status: &Status| println!("{}", status)),
        );

        listeners.push(
            game.winner
                .listen(|win: &Win| println!("{} has won the game!", win.player)),
        );

        listeners.push(game.requests.listen({
            let history = game.history.clone();
            move |command: &Command| match command {
                Command::History => print_history(&history.sample()),
                Command::Help => println!("{}", HELP),
                Command::Quit | Command::Act(_) => {}
            }
        }));

        let quit = game
            .requests
            .filter(|command: &Command| *command == Command::Quit)
            .map(|_: &Command| true)
            .hold(false);

        (boot, kb_input, game, quit, listeners)
    });

    boot.send(());
    let stdin = io::stdin().lock();
    for line in stdin.lines() {
        kb_input.send(line?);
        if quit.sample() {
            break;
        }
    }

    info!(moves = game.state.sample().history().len() - 1, "session ended");
    Ok(())
}
