//! External command execution
//!
//! Every side effect this tool has on the repository goes through an external
//! process: `git` for version control and the package manager for the version
//! bump. This module abstracts process execution behind the [CommandRunner]
//! trait so the release stages can be driven by a fake in tests.
//!
//! - [system::SystemRunner]: spawns real processes with `std::process::Command`
//! - [mock::MockRunner]: scripted responses that records every invocation

pub mod mock;
pub mod system;

pub use mock::MockRunner;
pub use system::SystemRunner;

use std::path::Path;

use crate::error::Result;

/// Captured result of one external command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        CommandOutput {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        CommandOutput {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Human-readable failure description: stderr if present, otherwise stdout,
    /// otherwise the bare exit status.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.status {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Capability to run an external program to completion
///
/// Implementations block until the program exits and capture its output.
/// A non-zero exit status is *not* an error at this layer; callers inspect
/// [CommandOutput::success]. `Err` is reserved for programs that could not be
/// started at all.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in the runner's working directory and wait
    /// for it to finish
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        self.run_in(Path::new(""), program, args)
    }

    /// Same as [CommandRunner::run], with `dir` resolved against the
    /// runner's working directory
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        (**self).run(program, args)
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput> {
        (**self).run_in(dir, program, args)
    }
}

/// Collapse a run result into the successful output or a failure description
///
/// Spawn errors and non-zero exits both become the `Err` string, which stages
/// wrap in their own error variant.
pub fn require_success(
    result: Result<CommandOutput>,
) -> std::result::Result<CommandOutput, String> {
    match result {
        Ok(output) if output.success() => Ok(output),
        Ok(output) => Err(output.diagnostic()),
        Err(e) => Err(e.to_string()),
    }
}

/// Render an argv for logs and error messages
pub fn render_command(program: &str, args: &[&str]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            rendered.push_str(&format!("'{}'", arg));
        } else {
            rendered.push_str(arg);
        }
    }
    rendered
}
