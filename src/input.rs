use crate::{game::Action, Error, Result};

/// A parsed line of user input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    History,
    Help,
    Quit,
}

impl Command {
    pub fn action(&self) -> Option<Action> {
        match self {
            Command::Act(action) => Some(*action),
            _ => None,
        }
    }
}

pub const HELP: &str = "\
commands:
  1-9                   mark a square (1 is top left, 9 is bottom right)
  j N, jump N, goto N   go to move N of the history (0 is the start of the game)
  h, history            show the move history
  ?, help               show this list
  q, quit               quit";

pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let lowered = line.to_ascii_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    match words.as_slice() {
        ["j" | "jump" | "goto", index] => index
            .parse::<usize>()
            .map(|i| Command::Act(Action::JumpTo(i)))
            .map_err(Error::InvalidInteger),
        ["h" | "history"] => Ok(Command::History),
        ["?" | "help"] => Ok(Command::Help),
        ["q" | "quit"] => Ok(Command::Quit),
        [square] if square.starts_with(|c: char| c.is_ascii_digit() || c == '-') => {
            let index = square.parse::<usize>().map_err(Error::InvalidInteger)?;
            if (1..=9).contains(&index) {
                Ok(Command::Act(Action::Play(index - 1)))
            } else {
                Err(Error::InvalidSquare(index))
            }
        }
        _ => Err(Error::UnknownCommand(line.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squares_are_one_based() {
        assert_eq!(parse_command("1").unwrap(), Command::Act(Action::Play(0)));
        assert_eq!(parse_command(" 9\n").unwrap(), Command::Act(Action::Play(8)));
    }

    #[test]
    fn square_out_of_range() {
        assert!(matches!(parse_command("0"), Err(Error::InvalidSquare(0))));
        assert!(matches!(parse_command("10"), Err(Error::InvalidSquare(10))));
    }

    #[test]
    fn square_not_a_number() {
        assert!(matches!(parse_command("-1"), Err(Error::InvalidInteger(_))));
        assert!(matches!(parse_command("4x"), Err(Error::InvalidInteger(_))));
    }

    #[test]
    fn jump_forms() {
        for line in ["j 3", "jump 3", "GOTO 3"] {
            assert_eq!(
                parse_command(line).unwrap(),
                Command::Act(Action::JumpTo(3))
            );
        }
        assert!(matches!(parse_command("j x"), Err(Error::InvalidInteger(_))));
        assert!(matches!(parse_command("j"), Err(Error::UnknownCommand(_))));
        assert!(matches!(parse_command("j 1 2"), Err(Error::UnknownCommand(_))));
    }

    #[test]
    fn other_commands() {
        assert_eq!(parse_command("h").unwrap(), Command::History);
        assert_eq!(parse_command("help").unwrap(), Command::Help);
        assert_eq!(parse_command("Quit").unwrap(), Command::Quit);
        assert!(matches!(parse_command(""), Err(Error::UnknownCommand(_))));
        assert!(matches!(
            parse_command("dance"),
            Err(Error::UnknownCommand(s)) if s == "dance"
        ));
    }

    #[test]
    fn help_lists_every_keyword() {
        for keyword in ["jump", "goto", "history", "help", "?", "quit"] {
            assert!(HELP.contains(keyword), "missing {keyword}");
            let parsed = parse_command(keyword).or_else(|_| parse_command(&format!("{keyword} 1")));
            assert!(parsed.is_ok(), "{keyword} is not accepted");
        }
    }

    #[test]
    fn action_of_command() {
        assert_eq!(Command::Help.action(), None);
        assert_eq!(
            Command::Act(Action::Play(2)).action(),
            Some(Action::Play(2))
        );
    }
}
