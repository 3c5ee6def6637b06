use crate::domain::{ManifestVersion, TagPair, TagPattern};
use crate::error::{ReleaseError, Result, TagOperation};
use crate::exec::{require_success, CommandRunner};
use crate::git::GitCli;
use crate::ui;

/// Replace the bump tool's native tag with the release tag
///
/// The native tag is always deleted before the release tag is created, so
/// the two never coexist. On failure the repository is left as-is for manual
/// inspection; undoing the bump commit is the caller's job.
pub fn remap_tags<R: CommandRunner>(
    git: &GitCli<'_, R>,
    native: &TagPattern,
    release: &TagPattern,
    version: &ManifestVersion,
) -> Result<TagPair> {
    let tags = TagPair::derive(native, release, version);

    ui::display_status(&format!("Removing tag created by the bump tool: {}", tags.native));
    require_success(git.delete_tag(&tags.native))
        .map_err(|output| ReleaseError::tag(TagOperation::Delete, &tags.native, output))?;

    ui::display_stage(&format!("Creating release tag: {}", tags.release));
    require_success(git.create_tag(&tags.release))
        .map_err(|output| ReleaseError::tag(TagOperation::Create, &tags.release, output))?;

    ui::display_success(&format!("Created tag: {}", tags.release));
    Ok(tags)
}
