//! Interactive shell
//!
//! Reads one command per line and runs it against a single session, so the
//! cache survives between commands. Errors are printed and the loop goes on.

use crate::cli::commands::ShellLine;
use crate::cli::console;
use crate::cli::runner::Session;
use crate::error::{Error, Result};
use clap::Parser;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Run the shell until `exit` or end of input
pub async fn run(session: &mut Session) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(session)?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let words = match split_words(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(e) => {
                console::error(&e.to_string());
                continue;
            }
        };

        match ShellLine::try_parse_from(&words) {
            Ok(parsed) => match session.handle(parsed.command).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => console::error(&e.to_string()),
            },
            Err(e) => e.print()?,
        }
    }
    Ok(())
}

fn prompt(session: &Session) -> Result<()> {
    let target = session.config().target.as_deref().unwrap_or("no target");
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", console::prompt(target))?;
    stdout.flush()?;
    Ok(())
}

/// Split a command line into words with POSIX shell quoting rules
pub fn split_words(line: &str) -> Result<Vec<String>> {
    shlex::split(line).ok_or_else(|| Error::Other("Unterminated quote or escape".to_string()))
}
