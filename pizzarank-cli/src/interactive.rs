/// Line-oriented interactive session.
///
/// Each input line is one request against a `Session`; after every change the
/// ranking is printed again. Errors are reported and the loop keeps going.
/// Row numbers are 1-based positions in the printed ranking.
use std::io::{self, BufRead, Write};

use pizzarank_core::{ImportError, ParseSortKeyError, PizzaError, Session, SortDirection, SortKey};
use thiserror::Error;

use crate::output::render_table;
use crate::parse::{InputError, parse_number, parse_quantity};

pub const HELP: &str = "\
Commands:
  add <name> <qty> <diameter> <price>          add an offer
  edit <row> <name> <qty> <diameter> <price>   replace the offer in <row>
  delete <row>                                 remove the offer in <row>
  sort <key> [asc|desc]                        sort by a column
  toggle <key>                                 flip the active column, or switch to <key>
  show                                         print the ranking
  export                                       print the share payload
  share [base-url]                             print a share link
  import <link-or-payload>                     replace all offers
  help                                         this text
  quit                                         leave
Keys: quantity, diameter, unit-price, total-area, total-price, price-per-area
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add { name: String, quantity: u32, diameter: f64, price: f64 },
    Edit { row: usize, name: String, quantity: u32, diameter: f64, price: f64 },
    Delete { row: usize },
    Sort { key: SortKey, direction: SortDirection },
    Toggle { key: SortKey },
    Show,
    Export,
    Share { base_url: Option<String> },
    Import { text: String },
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, try \"help\"")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("row must be a number from 1 up, got {0:?}")]
    Row(String),
    #[error(transparent)]
    SortKey(#[from] ParseSortKeyError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Pizza(#[from] PizzaError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("nothing to share, add at least one offer first")]
    NothingToShare,
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn parse_row(value: &str) -> Result<usize, CommandError> {
    match value.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(CommandError::Row(value.to_string())),
    }
}

/// Split `<name...> <qty> <diameter> <price>`; the name may contain spaces.
fn parse_offer_args(args: &[&str]) -> Result<(String, u32, f64, f64), CommandError> {
    if args.len() < 4 {
        return Err(CommandError::Usage("<name> <qty> <diameter> <price>"));
    }
    let split = args.len() - 3;
    Ok((
        args[..split].join(" "),
        parse_quantity(args[split])?,
        parse_number("diameter", args[split + 1])?,
        parse_number("price", args[split + 2])?,
    ))
}

fn parse_direction(value: &str) -> Result<SortDirection, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "asc" | "ascending" => Ok(SortDirection::Ascending),
        "desc" | "descending" => Ok(SortDirection::Descending),
        _ => Err(CommandError::Usage("sort <key> [asc|desc]")),
    }
}

/// Parse one input line. `Ok(None)` for blank lines and `#` comments.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (verb, args) = (tokens[0].to_ascii_lowercase(), &tokens[1..]);

    let command = match verb.as_str() {
        "add" => {
            let (name, quantity, diameter, price) = parse_offer_args(args)?;
            Command::Add { name, quantity, diameter, price }
        }
        "edit" => {
            let Some((row, rest)) = args.split_first() else {
                return Err(CommandError::Usage("edit <row> <name> <qty> <diameter> <price>"));
            };
            let row = parse_row(row)?;
            let (name, quantity, diameter, price) = parse_offer_args(rest)?;
            Command::Edit { row, name, quantity, diameter, price }
        }
        "delete" | "remove" | "rm" => match args {
            [row] => Command::Delete { row: parse_row(row)? },
            _ => return Err(CommandError::Usage("delete <row>")),
        },
        "sort" => match args {
            [key] => Command::Sort { key: key.parse()?, direction: SortDirection::Ascending },
            [key, direction] => Command::Sort { key: key.parse()?, direction: parse_direction(direction)? },
            _ => return Err(CommandError::Usage("sort <key> [asc|desc]")),
        },
        "toggle" => match args {
            [key] => Command::Toggle { key: key.parse()? },
            _ => return Err(CommandError::Usage("toggle <key>")),
        },
        "show" | "list" | "ls" => Command::Show,
        "export" => Command::Export,
        "share" => match args {
            [] => Command::Share { base_url: None },
            [base] => Command::Share { base_url: Some(base.to_string()) },
            _ => return Err(CommandError::Usage("share [base-url]")),
        },
        "import" => match args {
            [text] => Command::Import { text: text.to_string() },
            _ => return Err(CommandError::Usage("import <link-or-payload>")),
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply one command to the session, writing any output to `out`.
pub fn execute(
    session: &mut Session,
    command: Command,
    default_base_url: &str,
    out: &mut impl Write,
) -> Result<Flow, CommandError> {
    let mut changed = true;

    match command {
        Command::Add { name, quantity, diameter, price } => {
            session.add(name, quantity, diameter, price)?;
        }
        Command::Edit { row, name, quantity, diameter, price } => {
            session.update_ranked(row - 1, name, quantity, diameter, price)?;
        }
        Command::Delete { row } => {
            let removed = session.remove_ranked(row - 1)?;
            writeln!(out, "Removed {}", removed.name())?;
        }
        Command::Sort { key, direction } => session.set_sort(key, direction)?,
        Command::Toggle { key } => {
            session.toggle_sort(key)?;
        }
        Command::Import { text } => {
            let count = session.import_state(&text)?;
            writeln!(out, "Imported {count} offers")?;
        }
        Command::Show => {}
        Command::Export => {
            changed = false;
            let payload = session.export_state().ok_or(CommandError::NothingToShare)?;
            writeln!(out, "{payload}")?;
        }
        Command::Share { base_url } => {
            changed = false;
            let base = base_url.as_deref().unwrap_or(default_base_url);
            let link = session.share_link(base)?.ok_or(CommandError::NothingToShare)?;
            writeln!(out, "{link}")?;
        }
        Command::Help => {
            changed = false;
            write!(out, "{HELP}")?;
        }
        Command::Quit => return Ok(Flow::Quit),
    }

    if changed {
        write!(out, "{}", render_table(session.ranked(), session.sort()))?;
    }
    Ok(Flow::Continue)
}

/// Read commands from `input` until it ends or `quit` is given.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    default_base_url: &str,
    prompt: bool,
) -> io::Result<()> {
    if prompt {
        write!(out, "> ")?;
        out.flush()?;
    }

    for line in input.lines() {
        let line = line?;
        let result = parse_command(&line).and_then(|command| match command {
            Some(command) => execute(session, command, default_base_url, out),
            None => Ok(Flow::Continue),
        });

        match result {
            Ok(Flow::Quit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(CommandError::Io(e)) => return Err(e),
            Err(e) => {
                tracing::debug!(line = %line, "command rejected");
                writeln!(out, "Error: {e}")?;
            }
        }

        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        run(session, script.as_bytes(), &mut out, "https://pizza.example/", false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_add_with_spaced_name() {
        let command = parse_command("add Quattro Stagioni 2 30 11.5").unwrap();
        assert_eq!(
            command,
            Some(Command::Add {
                name: "Quattro Stagioni".to_string(),
                quantity: 2,
                diameter: 30.0,
                price: 11.5,
            })
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("# comment").unwrap(), None);
        assert_eq!(
            parse_command("SORT total-area desc").unwrap(),
            Some(Command::Sort { key: SortKey::TotalArea, direction: SortDirection::Descending })
        );
        assert_eq!(parse_command("delete 2").unwrap(), Some(Command::Delete { row: 2 }));
        assert_eq!(parse_command("quit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_parse_command_errors() {
        assert!(matches!(parse_command("bake 1"), Err(CommandError::Unknown(_))));
        assert!(matches!(parse_command("delete 0"), Err(CommandError::Row(_))));
        assert!(matches!(parse_command("add Margherita 1 30"), Err(CommandError::Usage(_))));
        assert!(matches!(parse_command("sort rank"), Err(CommandError::SortKey(ParseSortKeyError::Circular))));
        assert!(matches!(parse_command("add M one 30 10"), Err(CommandError::Input(_))));
    }

    #[test]
    fn test_script_session() {
        let mut session = Session::new();
        let output = run_script(
            &mut session,
            "add Margherita 1 30 10\nadd Small 1 20 10\nsort diameter desc\ndelete 2\n",
        );

        assert!(output.contains("sorted by diameter (desc)"));
        assert!(output.contains("Removed Small"));
        assert_eq!(session.len(), 1);
        assert_eq!(session.entries()[0].name(), "Margherita");
    }

    #[test]
    fn test_errors_do_not_stop_the_session() {
        let mut session = Session::new();
        let output = run_script(
            &mut session,
            "add  1 30 10\nadd M 1 -30 10\nsort name\ndelete 4\nadd M 1 30 10\n",
        );

        assert_eq!(output.matches("Error:").count(), 4);
        assert!(output.contains("cannot sort by name"));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut session = Session::new();
        run_script(&mut session, "add A 1 30 10\nquit\nadd B 1 30 10\n");
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_export_and_import() {
        let mut session = Session::new();
        let output = run_script(&mut session, "export\nadd A 1 30 10\nadd B 2 26 8\nshare\n");
        assert!(output.contains("nothing to share"));
        let link = output
            .lines()
            .find(|l| l.starts_with("https://pizza.example/?data="))
            .unwrap()
            .to_string();

        let mut other = Session::new();
        let output = run_script(&mut other, &format!("import {link}\nimport nonsense\n"));
        assert!(output.contains("Imported 2 offers"));
        assert!(output.contains("no usable data"));
        assert_eq!(other.len(), 2);
    }

    #[test]
    fn test_edit_by_row() {
        let mut session = Session::new();
        run_script(&mut session, "add A 1 30 10\nadd B 1 20 10\nedit 2 B cheap 1 20 1\n");
        assert_eq!(session.ranked()[0].entry.name(), "B cheap");
    }
}
