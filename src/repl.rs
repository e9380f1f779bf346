//! Interactive read-eval-print loop
//!
//! Reads one command per line, runs it against the `App` and prints any error
//! before prompting again. Only `exit` or end of input ends the loop.

use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::app::{App, AppError, Command, Flow};

pub const WELCOME: &str = "Welcome to the Pokedex!";
pub const PROMPT: &str = "Pokedex > ";

/// Lower-cases a line and splits it into words
pub fn clean_input(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Runs the loop until `exit` or end of input
///
/// Command failures are printed and the loop continues. Only failures to read
/// input or write output are returned.
pub async fn run<R, W>(app: &mut App, mut input: R, out: &mut W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut buf = Vec::new();
    writeln!(out, "{WELCOME}")?;

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            debug!("input closed");
            writeln!(out)?;
            return Ok(());
        }

        // Invalid UTF-8 becomes U+FFFD and falls through to an unknown command
        let line = String::from_utf8_lossy(&buf);
        let words = clean_input(&line);
        if words.is_empty() {
            continue;
        }

        let command = match Command::parse(&words) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match app.execute(command, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(()),
            Err(AppError::Io(err)) => return Err(err),
            Err(err) => writeln!(out, "{err}")?,
        }
    }
}
