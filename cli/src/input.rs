use anyhow::{Context, bail};
use pairs_core::Position;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Select(Position),
    NewGame,
    Help,
    Quit,
}

/// Parses one line of player input.
///
/// Cards are addressed either by the number shown on the board or by `row col`,
/// both counted from 1.
pub fn parse_command(line: &str, cols: u8) -> anyhow::Result<Command> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        bail!("Type a card number, or `h` for help");
    };

    match first.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Ok(Command::Quit),
        "n" | "new" => return Ok(Command::NewGame),
        "h" | "help" | "?" => return Ok(Command::Help),
        _ => {}
    }

    let first = parse_index(first)?;
    let position = match (words.next(), words.next()) {
        (None, _) => first,
        (Some(col), None) => {
            let col = parse_index(col)?;
            if col >= usize::from(cols) {
                bail!("Column must be between 1 and {}", cols);
            }
            first
                .checked_mul(usize::from(cols))
                .and_then(|row_start| row_start.checked_add(col))
                .context("Row out of range")?
        }
        (Some(_), Some(_)) => bail!("Expected a card number or `row col`"),
    };

    Ok(Command::Select(position))
}

fn parse_index(word: &str) -> anyhow::Result<usize> {
    let value: usize = word
        .parse()
        .with_context(|| format!("`{word}` is not a number"))?;
    value
        .checked_sub(1)
        .context("Numbers start at 1")
}
