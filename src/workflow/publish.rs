use crate::error::{PushStage, ReleaseError, Result};
use crate::exec::{require_success, CommandRunner};
use crate::git::GitCli;
use crate::ui;

/// Push the branch, then the release tag, to `remote`
///
/// The commit must land before the tag that references it. A failed branch
/// push stops before the tag push is attempted. Nothing is retried.
pub fn publish<R: CommandRunner>(
    git: &GitCli<'_, R>,
    remote: &str,
    branch: &str,
    tag: &str,
) -> Result<()> {
    ui::display_stage("Pushing to remote");

    ui::display_status(&format!("Pushing commit on '{}' to '{}'...", branch, remote));
    require_success(git.push_branch(remote, branch))
        .map_err(|output| ReleaseError::push(PushStage::Commit, output))?;

    ui::display_status(&format!("Pushing tag {}...", tag));
    require_success(git.push_tag(remote, tag))
        .map_err(|output| ReleaseError::push(PushStage::Tag, output))?;

    Ok(())
}
