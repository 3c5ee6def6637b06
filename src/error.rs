use std::fmt;

use thiserror::Error;

/// Tag mutation that failed during remapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOperation {
    Delete,
    Create,
}

impl fmt::Display for TagOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagOperation::Delete => write!(f, "delete"),
            TagOperation::Create => write!(f, "create"),
        }
    }
}

/// Rollback sub-step, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackStep {
    ResetCommit,
    DeleteReleaseTag,
    RestoreFiles,
    RemoveAddedFiles,
}

impl fmt::Display for RollbackStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollbackStep::ResetCommit => write!(f, "reset bump commit"),
            RollbackStep::DeleteReleaseTag => write!(f, "delete release tag"),
            RollbackStep::RestoreFiles => write!(f, "restore bumped files"),
            RollbackStep::RemoveAddedFiles => write!(f, "remove files added by the bump"),
        }
    }
}

/// Which half of the publish failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStage {
    Commit,
    Tag,
}

impl fmt::Display for PushStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushStage::Commit => write!(f, "commit"),
            PushStage::Tag => write!(f, "tag"),
        }
    }
}

/// Unified error type for release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Working tree has uncommitted changes ({} entries)", .entries.len())]
    DirtyWorkingTree { entries: Vec<String> },

    #[error("HEAD is detached; check out the branch to release")]
    DetachedHead,

    #[error("Version bump failed (exit code {}): {stderr}", display_code(.exit_code))]
    BumpFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Failed to {operation} tag '{tag}': {output}")]
    TagOperationFailed {
        operation: TagOperation,
        tag: String,
        output: String,
    },

    #[error("Rollback incomplete at step '{step}': {output}")]
    RollbackIncomplete { step: RollbackStep, output: String },

    #[error("Push failed at stage '{stage}': {output}")]
    PushFailed { stage: PushStage, output: String },

    #[error("Command `{command}` failed (exit code {}): {stderr}", display_code(.exit_code))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operator input closed before a decision was made")]
    InputClosed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

/// Convenience type alias for Results in release-tag
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }

    pub fn tag(operation: TagOperation, tag: impl Into<String>, output: impl Into<String>) -> Self {
        ReleaseError::TagOperationFailed {
            operation,
            tag: tag.into(),
            output: output.into(),
        }
    }

    pub fn rollback(step: RollbackStep, output: impl Into<String>) -> Self {
        ReleaseError::RollbackIncomplete {
            step,
            output: output.into(),
        }
    }

    pub fn push(stage: PushStage, output: impl Into<String>) -> Self {
        ReleaseError::PushFailed {
            stage,
            output: output.into(),
        }
    }

    /// Manual steps the operator needs after this error, if the repository
    /// was left in a state that requires attention.
    pub fn recovery_hint(&self) -> Option<String> {
        match self {
            ReleaseError::DirtyWorkingTree { .. } => Some(
                "Commit or stash your changes before running the release again.".to_string(),
            ),
            ReleaseError::DetachedHead => {
                Some("Run `git switch <branch>` and try again.".to_string())
            }
            ReleaseError::TagOperationFailed { .. } => Some(
                "The version bump commit is still on the branch. Inspect tags with `git tag --list`, \
                 then undo with `git reset HEAD~1` and `git restore` on the manifest files."
                    .to_string(),
            ),
            ReleaseError::RollbackIncomplete { step, .. } => Some(format!(
                "Rollback stopped at '{}'. Inspect `git log -1`, `git tag --list` and `git status` \
                 and finish the remaining steps by hand.",
                step
            )),
            ReleaseError::PushFailed {
                stage: PushStage::Commit,
                ..
            } => Some(
                "Nothing reached the remote. The bump commit and release tag exist locally only."
                    .to_string(),
            ),
            ReleaseError::PushFailed {
                stage: PushStage::Tag,
                ..
            } => Some(
                "The bump commit is already on the remote but the release tag is not. \
                 Retry the tag push only."
                    .to_string(),
            ),
            _ => None,
        }
    }
}
