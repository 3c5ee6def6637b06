use crate::error::{ReleaseError, Result};
use crate::exec::CommandRunner;
use crate::git::GitCli;
use crate::ui;

/// What the preflight check learned about the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightReport {
    pub branch: String,
}

/// Refuse to release from a detached HEAD or a working tree with any
/// uncommitted entry, tracked or untracked.
///
/// Read-only. A clean tree is what lets rollback later restore files to
/// their last committed content without discarding unrelated work.
pub fn check<R: CommandRunner>(git: &GitCli<'_, R>) -> Result<PreflightReport> {
    let branch = git.current_branch()?;
    ui::display_status(&format!("Current branch: {}", branch));

    if branch == "HEAD" {
        return Err(ReleaseError::DetachedHead);
    }

    let entries = git.status_porcelain()?;
    if !entries.is_empty() {
        ui::display_dirty_entries(&entries);
        return Err(ReleaseError::DirtyWorkingTree { entries });
    }

    Ok(PreflightReport { branch })
}
