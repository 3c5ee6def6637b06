//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Operator input behind the [Prompt] trait

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_banner, display_boundary_warning, display_dirty_entries, display_dry_run,
    display_error, display_manual_push_instruction, display_publish_complete,
    display_release_error, display_release_summary, display_stage, display_status,
    display_success, ReleaseSummary,
};

/// Source of operator answers
///
/// `ask` blocks until a full line is available. `Ok(None)` means the input
/// stream has ended and no further answers will arrive.
pub trait Prompt {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;
}

/// Reads answers from a buffered reader, printing the question to stdout
///
/// `StdinPrompt::stdin()` is the interactive terminal prompt.
pub struct StdinPrompt<B: BufRead> {
    input: B,
}

impl StdinPrompt<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        StdinPrompt {
            input: io::stdin().lock(),
        }
    }
}

impl<B: BufRead> StdinPrompt<B> {
    pub fn from_reader(input: B) -> Self {
        StdinPrompt { input }
    }
}

impl<B: BufRead> Prompt for StdinPrompt<B> {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        print!("{}", question);
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Pre-recorded answers for tests and non-interactive runs
///
/// Once the answers are used up the prompt reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    questions: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompt {
            answers: answers.into_iter().map(Into::into).collect(),
            questions: Vec::new(),
        }
    }

    /// Every question asked so far, in order
    pub fn questions(&self) -> &[String] {
        &self.questions
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        self.questions.push(question.to_string());
        Ok(self.answers.pop_front())
    }
}

impl<P: Prompt + ?Sized> Prompt for &mut P {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        (**self).ask(question)
    }
}
