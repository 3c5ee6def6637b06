use std::fmt;

use crate::domain::ManifestVersion;

/// Non-fatal conditions met during a release run.
/// These are reported to the operator but do not stop the workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The manifest after the bump is not the minor successor of the version
    /// before it; the manifest value is used regardless
    UnexpectedVersion {
        previous: ManifestVersion,
        expected: ManifestVersion,
        actual: ManifestVersion,
    },
    /// The files touched by the bump commit could not be determined; rollback
    /// will restore the configured manifest files instead
    RollbackFallback { reason: String, paths: Vec<String> },
    /// A configured file is not tracked by git and will not be restored
    UntrackedManifestFile { path: String },
    /// An existing release tag already names a version at or past the next one
    ReleaseTagAhead {
        latest_tag: String,
        next: ManifestVersion,
    },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::UnexpectedVersion {
                previous,
                expected,
                actual,
            } => write!(
                f,
                "Version went from {} to {} (expected {}); releasing {}",
                previous, actual, expected, actual
            ),
            BoundaryWarning::RollbackFallback { reason, paths } => write!(
                f,
                "Could not list files changed by the bump commit ({}); restoring {} instead",
                reason,
                paths.join(", ")
            ),
            BoundaryWarning::UntrackedManifestFile { path } => {
                write!(f, "'{}' is not tracked by git and will not be restored", path)
            }
            BoundaryWarning::ReleaseTagAhead { latest_tag, next } => write!(
                f,
                "Release tag {} already exists for a version at or past {}",
                latest_tag, next
            ),
        }
    }
}
