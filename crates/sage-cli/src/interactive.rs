use anyhow::{Result, anyhow};
use std::io::{BufRead, Write};

/// Goals offered when none is passed on the command line.
pub const CANNED_GOALS: [&str; 2] = [
    "Train and evaluate a text classifier on the 20 Newsgroups posts",
    "Summarize the research PDFs in the documents folder",
];

/// Lists the canned goals on `output` and reads a numbered choice from `input`.
///
/// # Errors
/// Returns an error if the choice is not one of the listed numbers or if
/// reading or writing fails.
pub fn choose_goal<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    writeln!(output, "No goal given. Choose one:")?;
    for (idx, goal) in CANNED_GOALS.iter().enumerate() {
        writeln!(output, "  {}. {goal}", idx + 1)?;
    }
    write!(output, "Choice [1-{}]: ", CANNED_GOALS.len())?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let choice = line.trim();

    choice
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|idx| CANNED_GOALS.get(idx))
        .map(|goal| (*goal).to_owned())
        .ok_or_else(|| anyhow!("Invalid choice: {choice:?}"))
}
