use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Result;
use crate::exec::{CommandOutput, CommandRunner};

/// Scripted command runner for testing without spawning processes
///
/// Responses are matched by argv prefix (program first) in registration order;
/// commands without a matching rule succeed with empty output. Every
/// invocation is recorded so tests can assert on order and absence of calls.
pub struct MockRunner {
    rules: Vec<(Vec<String>, CommandOutput)>,
    calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds
    pub fn new() -> Self {
        MockRunner {
            rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `output` to any command whose argv starts with `prefix`
    pub fn respond(&mut self, prefix: &[&str], output: CommandOutput) -> &mut Self {
        self.rules
            .push((prefix.iter().map(|s| s.to_string()).collect(), output));
        self
    }

    /// Fail any command whose argv starts with `prefix`
    pub fn fail(&mut self, prefix: &[&str], code: i32, stderr: &str) -> &mut Self {
        self.respond(prefix, CommandOutput::failed(code, stderr))
    }

    /// All recorded invocations, program first
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .map(|c| c.iter().map(|(_, argv)| argv.clone()).collect())
            .unwrap_or_default()
    }

    /// Directory each recorded invocation ran in, empty for the runner's own
    pub fn working_dirs(&self) -> Vec<PathBuf> {
        self.calls
            .lock()
            .map(|c| c.iter().map(|(dir, _)| dir.clone()).collect())
            .unwrap_or_default()
    }

    /// Recorded invocations rendered as single strings
    pub fn rendered_calls(&self) -> Vec<String> {
        self.calls().iter().map(|argv| argv.join(" ")).collect()
    }

    /// Number of recorded invocations whose argv starts with `prefix`
    pub fn count(&self, prefix: &[&str]) -> usize {
        self.calls()
            .iter()
            .filter(|argv| starts_with(argv, prefix))
            .count()
    }

    /// Position of the first invocation starting with `prefix`
    pub fn position(&self, prefix: &[&str]) -> Option<usize> {
        self.calls().iter().position(|argv| starts_with(argv, prefix))
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn starts_with(argv: &[String], prefix: &[&str]) -> bool {
    argv.len() >= prefix.len() && argv.iter().zip(prefix).all(|(a, p)| a == p)
}

impl CommandRunner for MockRunner {
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let mut argv = vec![program.to_string()];
        argv.extend(args.iter().map(|s| s.to_string()));

        if let Ok(mut calls) = self.calls.lock() {
            calls.push((dir.to_path_buf(), argv.clone()));
        }

        let reply = self
            .rules
            .iter()
            .find(|(prefix, _)| {
                let prefix: Vec<&str> = prefix.iter().map(String::as_str).collect();
                starts_with(&argv, &prefix)
            })
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::ok(""));

        Ok(reply)
    }
}
