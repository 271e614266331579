//! Interactive prompting
//!
//! Line prompts for the menu shell and y/N confirmation for destructive
//! commands.

use std::io::{self, BufRead, Write};

use anyhow::Result;

/// Print `prompt` and read one line
///
/// Returns `None` at end of input. The trailing newline is stripped; other
/// whitespace is kept so names round-trip exactly.
pub fn read_line(
    input: &mut impl BufRead,
    out: &mut impl Write,
    prompt: &str,
) -> Result<Option<String>> {
    write!(out, "{}", prompt)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']);
    Ok(Some(trimmed.to_string()))
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    let stdin = io::stdin();
    let answer = read_line(&mut stdin.lock(), &mut io::stdout(), &format!("{} [y/N] ", prompt))?;
    Ok(answer.is_some_and(|a| is_yes(&a)))
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}
