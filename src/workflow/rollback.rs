use crate::boundary::BoundaryWarning;
use crate::config::ManifestConfig;
use crate::error::{ReleaseError, Result, RollbackStep};
use crate::exec::{require_success, CommandRunner};
use crate::git::{FileChange, GitCli};
use crate::ui;

/// What a rollback will undo
#[derive(Debug, Clone, PartialEq)]
pub struct RollbackPlan {
    pub release_tag: String,
    /// Files restored to their pre-bump content
    pub restore: Vec<String>,
    /// Files the bump commit created, deleted once the commit is undone
    pub remove: Vec<String>,
    pub warnings: Vec<BoundaryWarning>,
}

impl RollbackPlan {
    /// Build the plan while HEAD is still the bump commit
    ///
    /// Every file the bump commit modified or deleted is restored and every
    /// file it added is removed. When that list cannot be read, the
    /// configured manifest and lockfile are restored instead, skipping any
    /// git does not track.
    pub fn prepare<R: CommandRunner>(
        git: &GitCli<'_, R>,
        manifest: &ManifestConfig,
        release_tag: &str,
    ) -> Self {
        let mut warnings = Vec::new();

        let changed = match git.head_changes() {
            Ok(changes) if !changes.is_empty() => Ok(changes),
            Ok(_) => Err("the bump commit changed no files".to_string()),
            Err(e) => Err(e.to_string()),
        };

        let (restore, remove) = match changed {
            Ok(changes) => split_changes(changes),
            Err(reason) => {
                let paths = fallback_paths(git, manifest, &mut warnings);
                warnings.insert(
                    0,
                    BoundaryWarning::RollbackFallback {
                        reason,
                        paths: paths.clone(),
                    },
                );
                (paths, Vec::new())
            }
        };

        RollbackPlan {
            release_tag: release_tag.to_string(),
            restore,
            remove,
            warnings,
        }
    }
}

fn split_changes(changes: Vec<FileChange>) -> (Vec<String>, Vec<String>) {
    let mut restore = Vec::new();
    let mut remove = Vec::new();
    for change in changes {
        match change {
            FileChange::Added(path) => remove.push(path),
            FileChange::Modified(path) | FileChange::Deleted(path) => restore.push(path),
        }
    }
    (restore, remove)
}

fn fallback_paths<R: CommandRunner>(
    git: &GitCli<'_, R>,
    manifest: &ManifestConfig,
    warnings: &mut Vec<BoundaryWarning>,
) -> Vec<String> {
    let configured: Vec<String> = [&manifest.path, &manifest.lockfile]
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    let refs: Vec<&str> = configured.iter().map(String::as_str).collect();

    let tracked = match git.tracked(&refs) {
        Ok(tracked) => tracked,
        Err(e) => {
            log::warn!("Cannot check tracked files, restoring all configured: {}", e);
            return configured;
        }
    };

    configured
        .into_iter()
        .filter(|path| {
            let is_tracked = tracked.iter().any(|t| t == path);
            if !is_tracked {
                warnings.push(BoundaryWarning::UntrackedManifestFile { path: path.clone() });
            }
            is_tracked
        })
        .collect()
}

/// Undo the bump commit and the release tag after the operator declined
///
/// Steps run in order and stop at the first failure, which is reported as
/// [ReleaseError::RollbackIncomplete] naming the step.
pub fn roll_back<R: CommandRunner>(git: &GitCli<'_, R>, plan: &RollbackPlan) -> Result<()> {
    ui::display_stage("Rolling back changes");

    ui::display_status("Resetting the version bump commit");
    require_success(git.reset_keep_worktree())
        .map_err(|output| ReleaseError::rollback(RollbackStep::ResetCommit, output))?;

    ui::display_status(&format!("Deleting tag {}", plan.release_tag));
    require_success(git.delete_tag(&plan.release_tag))
        .map_err(|output| ReleaseError::rollback(RollbackStep::DeleteReleaseTag, output))?;

    if !plan.restore.is_empty() {
        ui::display_status(&format!("Restoring {}", plan.restore.join(", ")));
        let paths: Vec<&str> = plan.restore.iter().map(String::as_str).collect();
        require_success(git.restore(&paths))
            .map_err(|output| ReleaseError::rollback(RollbackStep::RestoreFiles, output))?;
    }

    if !plan.remove.is_empty() {
        ui::display_status(&format!("Removing {}", plan.remove.join(", ")));
        let paths: Vec<&str> = plan.remove.iter().map(String::as_str).collect();
        require_success(git.remove_untracked(&paths))
            .map_err(|output| ReleaseError::rollback(RollbackStep::RemoveAddedFiles, output))?;
    }

    ui::display_success("Changes rolled back.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{CommandOutput, MockRunner};

    fn plan(paths: &[&str]) -> RollbackPlan {
        RollbackPlan {
            release_tag: "release/v1.4.0".to_string(),
            restore: paths.iter().map(|p| p.to_string()).collect(),
            remove: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_plan_uses_bump_commit_diff() {
        let mut runner = MockRunner::new();
        runner.respond(
            &["git", "diff"],
            CommandOutput::ok("M\tpackage.json\nM\tpackage-lock.json\nM\tsrc/version.ts\n"),
        );

        let plan = RollbackPlan::prepare(
            &GitCli::new(&runner),
            &ManifestConfig::default(),
            "release/v1.4.0",
        );
        assert_eq!(
            plan.restore,
            vec!["package.json", "package-lock.json", "src/version.ts"]
        );
        assert!(plan.remove.is_empty());
        assert!(plan.warnings.is_empty());
        assert_eq!(runner.count(&["git", "ls-files"]), 0);
    }

    #[test]
    fn test_plan_falls_back_to_tracked_manifest_files() {
        let mut runner = MockRunner::new();
        runner
            .fail(&["git", "diff"], 128, "fatal: bad revision 'HEAD~1'")
            .respond(&["git", "ls-files"], CommandOutput::ok("package.json\n"));

        let plan = RollbackPlan::prepare(
            &GitCli::new(&runner),
            &ManifestConfig::default(),
            "release/v1.4.0",
        );
        assert_eq!(plan.restore, vec!["package.json"]);
        assert!(matches!(
            plan.warnings[0],
            BoundaryWarning::RollbackFallback { .. }
        ));
        assert!(plan.warnings.contains(&BoundaryWarning::UntrackedManifestFile {
            path: "package-lock.json".to_string()
        }));
    }

    #[test]
    fn test_plan_falls_back_on_empty_diff() {
        let mut runner = MockRunner::new();
        runner.respond(
            &["git", "ls-files"],
            CommandOutput::ok("package.json\npackage-lock.json\n"),
        );

        let plan = RollbackPlan::prepare(
            &GitCli::new(&runner),
            &ManifestConfig::default(),
            "release/v1.4.0",
        );
        assert_eq!(plan.restore, vec!["package.json", "package-lock.json"]);
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn test_rollback_steps_in_order() {
        let runner = MockRunner::new();
        roll_back(
            &GitCli::new(&runner),
            &plan(&["package.json", "package-lock.json"]),
        )
        .unwrap();

        assert_eq!(
            runner.rendered_calls(),
            vec![
                "git reset HEAD~1",
                "git tag -d release/v1.4.0",
                "git restore -- package.json package-lock.json",
            ]
        );
    }

    #[test]
    fn test_reset_failure_stops_rollback() {
        let mut runner = MockRunner::new();
        runner.fail(&["git", "reset"], 128, "fatal: ambiguous argument 'HEAD~1'");

        let err = roll_back(&GitCli::new(&runner), &plan(&["package.json"])).unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::RollbackIncomplete {
                step: RollbackStep::ResetCommit,
                ..
            }
        ));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_restore_failure_names_step() {
        let mut runner = MockRunner::new();
        runner.fail(&["git", "restore"], 1, "error: pathspec did not match");

        let err = roll_back(&GitCli::new(&runner), &plan(&["package.json"])).unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::RollbackIncomplete {
                step: RollbackStep::RestoreFiles,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_restore_set_skips_restore() {
        let runner = MockRunner::new();
        roll_back(&GitCli::new(&runner), &plan(&[])).unwrap();
        assert_eq!(runner.count(&["git", "restore"]), 0);
    }

    #[test]
    fn test_plan_removes_files_the_bump_added() {
        let mut runner = MockRunner::new();
        runner.respond(
            &["git", "diff"],
            CommandOutput::ok("A\tCHANGELOG.md\nM\tpackage.json\nD\tVERSION\n"),
        );

        let plan = RollbackPlan::prepare(
            &GitCli::new(&runner),
            &ManifestConfig::default(),
            "release/v1.4.0",
        );
        assert_eq!(plan.restore, vec!["package.json", "VERSION"]);
        assert_eq!(plan.remove, vec!["CHANGELOG.md"]);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_added_files_removed_after_restore() {
        let runner = MockRunner::new();
        let mut plan = plan(&["package.json"]);
        plan.remove = vec!["CHANGELOG.md".to_string()];

        roll_back(&GitCli::new(&runner), &plan).unwrap();

        assert_eq!(
            runner.rendered_calls(),
            vec![
                "git reset HEAD~1",
                "git tag -d release/v1.4.0",
                "git restore -- package.json",
                "git clean -f -- CHANGELOG.md",
            ]
        );
    }

    #[test]
    fn test_remove_failure_names_step() {
        let mut runner = MockRunner::new();
        runner.fail(&["git", "clean"], 1, "fatal: clean.requireForce");
        let mut plan = plan(&[]);
        plan.remove = vec!["CHANGELOG.md".to_string()];

        let err = roll_back(&GitCli::new(&runner), &plan).unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::RollbackIncomplete {
                step: RollbackStep::RemoveAddedFiles,
                ..
            }
        ));
    }
}
