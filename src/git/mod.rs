//! Version-control operations
//!
//! [GitCli] wraps a [CommandRunner] and exposes the handful of `git`
//! invocations the release workflow needs. Read-only queries parse their
//! output and fail with [ReleaseError::CommandFailed]; mutating operations
//! return the raw [CommandOutput] so each release stage can map a failure to
//! its own error variant.
//!
//! ```rust
//! # use release_tag::exec::MockRunner;
//! # use release_tag::git::GitCli;
//! let runner = MockRunner::new();
//! let git = GitCli::new(&runner);
//! assert!(git.status_porcelain().unwrap().is_empty());
//! ```

use crate::error::{ReleaseError, Result};
use crate::exec::{render_command, CommandOutput, CommandRunner};

const GIT: &str = "git";

/// `git` invoked through a [CommandRunner]
pub struct GitCli<'a, R: CommandRunner> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> GitCli<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        GitCli { runner }
    }

    fn git(&self, args: &[&str]) -> Result<CommandOutput> {
        self.runner.run(GIT, args)
    }

    /// Run a read-only query and return its stdout
    fn query(&self, args: &[&str]) -> Result<String> {
        let output = self.git(args)?;
        if !output.success() {
            return Err(ReleaseError::CommandFailed {
                command: render_command(GIT, args),
                exit_code: output.status,
                stderr: output.diagnostic(),
            });
        }
        Ok(output.stdout)
    }

    /// Name of the checked-out branch, `HEAD` when detached
    pub fn current_branch(&self) -> Result<String> {
        Ok(self
            .query(&["rev-parse", "--abbrev-ref", "HEAD"])?
            .trim()
            .to_string())
    }

    /// Uncommitted entries (tracked and untracked), one per line of
    /// `git status --porcelain`
    pub fn status_porcelain(&self) -> Result<Vec<String>> {
        Ok(non_empty_lines(&self.query(&["status", "--porcelain"])?))
    }

    /// Paths changed by the HEAD commit, relative to the working directory
    ///
    /// Renames are reported as a deletion plus an addition.
    pub fn head_changes(&self) -> Result<Vec<FileChange>> {
        let listed = self.query(&[
            "diff",
            "--name-status",
            "--no-renames",
            "--relative",
            "HEAD~1",
            "HEAD",
        ])?;
        Ok(non_empty_lines(&listed)
            .iter()
            .filter_map(|line| FileChange::parse(line))
            .collect())
    }

    /// The subset of `paths` that git tracks
    pub fn tracked(&self, paths: &[&str]) -> Result<Vec<String>> {
        let mut args = vec!["ls-files", "--"];
        args.extend_from_slice(paths);
        Ok(non_empty_lines(&self.query(&args)?))
    }

    /// Every local tag name
    pub fn tags(&self) -> Result<Vec<String>> {
        Ok(non_empty_lines(&self.query(&["tag", "--list"])?)
            .into_iter()
            .map(|line| line.trim().to_string())
            .collect())
    }

    pub fn delete_tag(&self, tag: &str) -> Result<CommandOutput> {
        self.git(&["tag", "-d", tag])
    }

    /// Create a lightweight tag at HEAD
    pub fn create_tag(&self, tag: &str) -> Result<CommandOutput> {
        self.git(&["tag", tag])
    }

    /// Move the branch pointer back one commit, keeping the working tree
    pub fn reset_keep_worktree(&self) -> Result<CommandOutput> {
        self.git(&["reset", "HEAD~1"])
    }

    /// Restore `paths` in the working tree from the index
    pub fn restore(&self, paths: &[&str]) -> Result<CommandOutput> {
        let mut args = vec!["restore", "--"];
        args.extend_from_slice(paths);
        self.git(&args)
    }

    /// Delete untracked `paths` from the working tree
    pub fn remove_untracked(&self, paths: &[&str]) -> Result<CommandOutput> {
        let mut args = vec!["clean", "-f", "--"];
        args.extend_from_slice(paths);
        self.git(&args)
    }

    pub fn push_branch(&self, remote: &str, branch: &str) -> Result<CommandOutput> {
        self.git(&["push", remote, branch])
    }

    /// Push by full ref name so a branch called like the tag is never picked
    pub fn push_tag(&self, remote: &str, tag: &str) -> Result<CommandOutput> {
        let tag_ref = tag_ref(tag);
        self.git(&["push", remote, tag_ref.as_str()])
    }
}

/// Fully qualified ref of a tag
pub fn tag_ref(tag: &str) -> String {
    format!("refs/tags/{}", tag)
}

/// One path touched by a commit, as `git diff --name-status` reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Added(String),
    Modified(String),
    Deleted(String),
}

impl FileChange {
    /// Parse a `<status>\t<path>` line; type changes count as modifications
    pub fn parse(line: &str) -> Option<Self> {
        let (status, path) = line.split_once('\t')?;
        let path = path.trim().to_string();
        match status.trim().chars().next()? {
            'A' => Some(FileChange::Added(path)),
            'D' => Some(FileChange::Deleted(path)),
            _ => Some(FileChange::Modified(path)),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FileChange::Added(path) | FileChange::Modified(path) | FileChange::Deleted(path) => {
                path
            }
        }
    }
}

fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
