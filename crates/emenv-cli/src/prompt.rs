//! Confirmation prompt

use std::io::{self, BufRead, Write};

const PROMPT: &str = "Proceed? [Y/n]: ";

/// Ask on stdin/stdout
pub fn confirm_stdin() -> io::Result<bool> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    confirm(&mut stdin.lock(), &mut stdout.lock())
}

/// Print the prompt and read one answer
///
/// Only the first character counts: `Y`, `y` or an empty line accept,
/// anything else (including end of input) declines.
pub fn confirm(reader: &mut impl BufRead, writer: &mut impl Write) -> io::Result<bool> {
    write!(writer, "{}", PROMPT)?;
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        writeln!(writer)?;
        return Ok(false);
    }

    let answer = line.trim_end_matches(['\r', '\n']);
    Ok(match answer.chars().next() {
        None => true,
        Some(c) => c == 'Y' || c == 'y',
    })
}
