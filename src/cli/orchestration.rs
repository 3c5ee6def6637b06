//! Main workflow orchestration logic
//!
//! Keeps CLI argument parsing in `main.rs` apart from the release run itself,
//! so the whole flow can be driven programmatically with any
//! [CommandRunner] and [Prompt].

use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::exec::CommandRunner;
use crate::ui::{self, Prompt};
use crate::workflow::{ReleasePreview, ReleaseWorkflow, WorkflowOutcome};

/// Arguments for the release workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseWorkflowArgs {
    /// Path to custom config file
    pub config_path: Option<PathBuf>,

    /// Repository root the commands run in
    pub repo_root: PathBuf,

    /// Preview mode - inspect only, no bump, tag or push
    pub dry_run: bool,
}

impl Default for ReleaseWorkflowArgs {
    fn default() -> Self {
        ReleaseWorkflowArgs {
            config_path: None,
            repo_root: PathBuf::from("."),
            dry_run: false,
        }
    }
}

/// What a completed invocation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    Finished(WorkflowOutcome),
    Previewed(ReleasePreview),
}

/// Run one release (or dry run) with the given collaborators
pub fn run_release_workflow<R, P>(
    args: &ReleaseWorkflowArgs,
    config: &Config,
    runner: &R,
    prompt: &mut P,
) -> Result<RunReport>
where
    R: CommandRunner,
    P: Prompt,
{
    let workflow = ReleaseWorkflow::new(runner, config, &args.repo_root);

    if args.dry_run {
        let preview = workflow.preview()?;
        ui::display_dry_run(
            &preview.current.to_string(),
            &preview.next.to_string(),
            &preview.tags.native,
            &preview.tags.release,
            &preview.remote,
            preview.latest_release.as_deref(),
        );
        return Ok(RunReport::Previewed(preview));
    }

    workflow.run(prompt).map(RunReport::Finished)
}

/// Process exit status for a run: zero for a publish, a completed
/// cancellation or a dry run, one for any error
pub fn exit_code(result: &Result<RunReport>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
