use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Asks on stdout, reads one line from stdin. An empty answer means yes.
pub fn confirm(question: &str) -> Result<bool> {
    print!("{question} [Y/n] ");
    io::stdout().flush().context("failed to flush stdout")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation answer")?;
    Ok(parse_answer(&answer))
}

pub fn parse_answer(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "" | "y" | "yes"
    )
}
