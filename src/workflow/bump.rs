use std::path::Path;

use crate::boundary::BoundaryWarning;
use crate::config::BumpConfig;
use crate::domain::{ManifestVersion, PackageManifest};
use crate::error::{ReleaseError, Result};
use crate::exec::CommandRunner;
use crate::ui;

/// Increment level passed to the bump tool; releases are always minor
pub const BUMP_LEVEL: &str = "minor";

/// Result of a successful version bump
#[derive(Debug, Clone, PartialEq)]
pub struct BumpOutcome {
    pub previous: ManifestVersion,
    /// Authoritative new version, read back from the manifest
    pub version: ManifestVersion,
    pub warning: Option<BoundaryWarning>,
}

/// Run the external bump tool for a minor increment
///
/// The tool runs in `package_dir`, the directory holding the manifest
/// relative to the runner's working directory, since it locates the manifest
/// from where it starts. It commits the manifest change and creates the
/// native tag on its own. The new version is read back from `manifest_path`
/// rather than parsed from the tool's output.
pub fn bump_minor<R: CommandRunner>(
    runner: &R,
    bump: &BumpConfig,
    package_dir: &Path,
    manifest_path: &Path,
    previous: &ManifestVersion,
) -> Result<BumpOutcome> {
    ui::display_stage("Bumping minor version");

    let args = ["version", BUMP_LEVEL, "-m", bump.commit_message.as_str()];
    let output = runner
        .run_in(package_dir, &bump.program, &args)
        .map_err(|e| ReleaseError::BumpFailed {
            exit_code: None,
            stderr: e.to_string(),
        })?;

    if !output.success() {
        return Err(ReleaseError::BumpFailed {
            exit_code: output.status,
            stderr: output.diagnostic(),
        });
    }

    let version = PackageManifest::read(manifest_path)?.version;
    let expected = previous.next_minor();
    let warning = (version != expected).then(|| BoundaryWarning::UnexpectedVersion {
        previous: previous.clone(),
        expected,
        actual: version.clone(),
    });

    ui::display_success(&format!("Version bumped to: {}", version));

    Ok(BumpOutcome {
        previous: previous.clone(),
        version,
        warning,
    })
}
