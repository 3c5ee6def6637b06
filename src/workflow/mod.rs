//! Release workflow state machine
//!
//! Five stages run strictly in sequence, each requiring the previous one to
//! succeed:
//!
//! 1. [preflight] - refuse a dirty working tree
//! 2. [bump] - minor version bump through the external tool
//! 3. [remap] - swap the native tag for the release tag
//! 4. [gate] - operator confirmation, the only branch point
//! 5. [publish] - push branch then tag, or [rollback] on cancellation
//!
//! Each stage is a plain function returning a [Result], so tests can fail any
//! stage through a fake [CommandRunner] without spawning processes.

pub mod bump;
pub mod gate;
pub mod preflight;
pub mod publish;
pub mod remap;
pub mod rollback;

use std::path::{Path, PathBuf};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{ManifestVersion, PackageManifest, TagPair};
use crate::error::{PushStage, ReleaseError, Result};
use crate::exec::CommandRunner;
use crate::git::GitCli;
use crate::ui::{self, Prompt, ReleaseSummary};

use gate::Decision;
use rollback::RollbackPlan;

/// Terminal state of a run that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Branch and release tag are on the remote
    Published {
        version: ManifestVersion,
        tag: String,
    },
    /// The operator declined and the bump was undone
    Cancelled { rolled_back: bool },
}

/// What a release would do, computed without mutating anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePreview {
    pub branch: String,
    pub current: ManifestVersion,
    pub next: ManifestVersion,
    pub tags: TagPair,
    pub remote: String,
    /// Highest existing tag following the release pattern
    pub latest_release: Option<String>,
}

/// One release run against one repository
pub struct ReleaseWorkflow<'a, R: CommandRunner> {
    runner: &'a R,
    config: &'a Config,
    root: PathBuf,
}

impl<'a, R: CommandRunner> ReleaseWorkflow<'a, R> {
    /// `root` is the directory the runner executes in; configured paths are
    /// resolved against it.
    pub fn new<P: AsRef<Path>>(runner: &'a R, config: &'a Config, root: P) -> Self {
        ReleaseWorkflow {
            runner,
            config,
            root: root.as_ref().to_path_buf(),
        }
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.config.manifest.path)
    }

    /// Directory the bump tool runs in, relative to `root`
    fn package_dir(&self) -> &Path {
        self.config
            .manifest
            .path
            .parent()
            .unwrap_or_else(|| Path::new(""))
    }

    /// Execute the full release, blocking on `prompt` at the confirmation gate
    pub fn run<P: Prompt>(&self, prompt: &mut P) -> Result<WorkflowOutcome> {
        let native = self.config.tags.native_pattern()?;
        let release = self.config.tags.release_pattern()?;
        let git = GitCli::new(self.runner);

        let manifest = PackageManifest::read(self.manifest_path())?;
        ui::display_banner(manifest.name.as_deref());

        let preflight = preflight::check(&git)?;

        let bumped = bump::bump_minor(
            self.runner,
            &self.config.bump,
            self.package_dir(),
            &self.manifest_path(),
            &manifest.version,
        )?;
        if let Some(warning) = &bumped.warning {
            ui::display_boundary_warning(warning);
        }

        let tags = remap::remap_tags(&git, &native, &release, &bumped.version)?;

        let summary = ReleaseSummary {
            version: bumped.version.to_string(),
            tag: tags.release.clone(),
            branch: preflight.branch.clone(),
            remote: self.config.remote.name.clone(),
        };

        match gate::confirm(prompt, &summary) {
            Ok(Decision::Proceed) => {
                self.publish(&git, &preflight.branch, &tags.release)?;
                ui::display_publish_complete(
                    &bumped.version.to_string(),
                    self.config.publish.workflow_url.as_deref(),
                );
                Ok(WorkflowOutcome::Published {
                    version: bumped.version,
                    tag: tags.release,
                })
            }
            Ok(Decision::Cancel) => {
                ui::display_error("Release cancelled by user.");
                self.roll_back(&git, &tags.release)?;
                Ok(WorkflowOutcome::Cancelled { rolled_back: true })
            }
            Err(e) => {
                ui::display_error(&format!("{}; rolling back", e));
                self.roll_back(&git, &tags.release)?;
                Err(e)
            }
        }
    }

    fn publish(&self, git: &GitCli<'_, R>, branch: &str, tag: &str) -> Result<()> {
        let remote = &self.config.remote.name;
        let result = publish::publish(git, remote, branch, tag);
        if let Err(ReleaseError::PushFailed {
            stage: PushStage::Tag,
            ..
        }) = &result
        {
            ui::display_manual_push_instruction(tag, remote);
        }
        result
    }

    fn roll_back(&self, git: &GitCli<'_, R>, release_tag: &str) -> Result<()> {
        let plan = RollbackPlan::prepare(git, &self.config.manifest, release_tag);
        for warning in &plan.warnings {
            ui::display_boundary_warning(warning);
        }
        rollback::roll_back(git, &plan)
    }

    /// Preflight plus the version and tags a run would produce
    pub fn preview(&self) -> Result<ReleasePreview> {
        let native = self.config.tags.native_pattern()?;
        let release = self.config.tags.release_pattern()?;
        let git = GitCli::new(self.runner);

        let manifest = PackageManifest::read(self.manifest_path())?;
        ui::display_banner(manifest.name.as_deref());

        let preflight = preflight::check(&git)?;
        let next = manifest.version.next_minor();
        let tags = TagPair::derive(&native, &release, &next);

        let existing = git.tags()?;
        for tag in [&tags.native, &tags.release] {
            if existing.contains(tag) {
                log::warn!("Tag {} already exists locally", tag);
                ui::display_status(&format!("Tag {} already exists locally", tag));
            }
        }

        let latest = release.latest(&existing);
        if let Some((latest_tag, latest_version)) = &latest {
            if *latest_version >= next {
                ui::display_boundary_warning(&BoundaryWarning::ReleaseTagAhead {
                    latest_tag: latest_tag.to_string(),
                    next: next.clone(),
                });
            }
        }

        Ok(ReleasePreview {
            branch: preflight.branch,
            current: manifest.version,
            next,
            tags,
            remote: self.config.remote.name.clone(),
            latest_release: latest.map(|(tag, _)| tag.to_string()),
        })
    }
}
