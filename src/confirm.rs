use std::io::{self, BufRead, Write};

use crate::batch::Batch;

/// Explicit affirmative answers; anything else declines.
const AFFIRMATIVE: &[&str] = &["s", "sim"];

/// True only for an explicit affirmative token, after trim + lowercase.
pub fn is_affirmative(input: &str) -> bool {
    AFFIRMATIVE.contains(&input.trim().to_lowercase().as_str())
}

/// Describe the batch and block for one line of operator input. There is no
/// retry: an empty or unrecognized answer declines the batch.
pub fn ask(batch: &Batch, total: usize, destination: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    ask_from(stdin.lock(), io::stdout(), batch, total, destination)
}

/// `ask` with the console injected, so the prompt flow is testable.
pub fn ask_from(
    mut input: impl BufRead,
    mut output: impl Write,
    batch: &Batch,
    total: usize,
    destination: &str,
) -> io::Result<bool> {
    let (first, last) = batch.record_range();
    write!(
        output,
        "Send batch {}/{} ({} records, {}-{}) to {}? [s/N] ",
        batch.index,
        total,
        batch.records.len(),
        first,
        last,
        destination
    )?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(is_affirmative(&line))
}
