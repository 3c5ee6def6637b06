use crate::error::{ReleaseError, Result};
use crate::ui::{self, Prompt, ReleaseSummary};

pub const QUESTION: &str = "\nType 'yes' to confirm, 'no' to cancel: ";
pub const REPROMPT: &str = "Please type 'yes' or 'no'";

/// The operator's answer at the confirmation gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Cancel,
}

/// Interpret one line of operator input, case-insensitive
///
/// Only `yes` and `no` are accepted; anything else yields `None`.
pub fn parse_answer(input: &str) -> Option<Decision> {
    match input.trim().to_lowercase().as_str() {
        "yes" => Some(Decision::Proceed),
        "no" => Some(Decision::Cancel),
        _ => None,
    }
}

/// Show the release summary and block until the operator answers
///
/// Invalid answers re-prompt indefinitely; there is no timeout. End of input
/// is reported as [ReleaseError::InputClosed].
pub fn confirm<P: Prompt>(prompt: &mut P, summary: &ReleaseSummary) -> Result<Decision> {
    ui::display_release_summary(summary);

    loop {
        let line = prompt.ask(QUESTION)?.ok_or(ReleaseError::InputClosed)?;
        match parse_answer(&line) {
            Some(decision) => return Ok(decision),
            None => println!("{}", REPROMPT),
        }
    }
}
