//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Every side-effecting release stage prints a status marker here first, so the
//! last marker on screen always shows how far a failed run got.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::error::ReleaseError;

const RULE_WIDTH: usize = 60;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a stage heading.
pub fn display_stage(title: &str) {
    println!("\n{}", style(format!("=== {} ===", title)).bold());
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display a fatal error together with its recovery hint, if any.
pub fn display_release_error(error: &ReleaseError) {
    display_error(&error.to_string());
    if let Some(hint) = error.recovery_hint() {
        eprintln!("  {}", style(hint).dim());
    }
}

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Print the run banner.
///
/// # Arguments
/// * `package_name` - Package name from the manifest, if it has one
pub fn display_banner(package_name: Option<&str>) {
    let title = match package_name {
        Some(name) => format!("{} - Release", name),
        None => "Release".to_string(),
    };
    println!("{}", style(title).bold());
    println!("{}", rule());
}

/// What the operator is asked to approve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSummary {
    pub version: String,
    pub tag: String,
    pub branch: String,
    pub remote: String,
}

impl ReleaseSummary {
    /// The three externally visible effects of approving the release
    pub fn consequences(&self) -> [String; 3] {
        [
            format!(
                "Push the version bump commit on '{}' to '{}'",
                self.branch, self.remote
            ),
            format!(
                "Push the release tag {} to trigger the deployment workflow",
                self.tag
            ),
            format!("Publish version {} through the downstream pipeline", self.version),
        ]
    }
}

/// Display the release summary shown before the confirmation prompt.
pub fn display_release_summary(summary: &ReleaseSummary) {
    println!("\n{}", rule());
    println!("Ready to release version {}", style(&summary.version).green().bold());
    println!("Tag: {}", style(&summary.tag).cyan());
    println!("{}", rule());
    println!("\nThis will:");
    for (i, consequence) in summary.consequences().iter().enumerate() {
        println!("  {}. {}", i + 1, consequence);
    }
    println!("\nAre you sure you want to proceed?");
}

/// Display the result of a successful publish.
///
/// # Arguments
/// * `version` - The published version
/// * `workflow_url` - Where the triggered pipeline can be watched, if configured
pub fn display_publish_complete(version: &str, workflow_url: Option<&str>) {
    println!();
    display_success("Release tag pushed successfully!");
    println!("The publish pipeline will now release version {}.", version);
    if let Some(url) = workflow_url {
        println!("Check the workflow status at: {}", style(url).cyan());
    }
}

/// Number of dirty entries listed before the rest are summarized
const DIRTY_ENTRY_LIMIT: usize = 10;

/// List the uncommitted entries that stopped the preflight check.
pub fn display_dirty_entries(entries: &[String]) {
    for entry in entries.iter().take(DIRTY_ENTRY_LIMIT) {
        eprintln!("    {}", style(entry).yellow());
    }
    if entries.len() > DIRTY_ENTRY_LIMIT {
        eprintln!(
            "    {}",
            style(format!("... and {} more", entries.len() - DIRTY_ENTRY_LIMIT)).dim()
        );
    }
}

/// Display manual push instruction for a tag.
///
/// # Arguments
/// * `tag` - The tag that was created locally
/// * `remote` - The remote name (e.g., "origin")
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} refs/tags/{}", remote, tag)).cyan()
    );
}

/// Display the plan computed by a dry run.
pub fn display_dry_run(
    current: &str,
    next: &str,
    native_tag: &str,
    release_tag: &str,
    remote: &str,
    latest_release: Option<&str>,
) {
    display_status("Dry run, no changes will be made:");
    match latest_release {
        Some(tag) => display_status(&format!("Latest release tag: {}", tag)),
        None => display_status("No earlier release tag found"),
    }
    display_success(&format!("  Step 1: bump version {} -> {}", current, next));
    display_success(&format!(
        "  Step 2: replace tag {} with {}",
        native_tag, release_tag
    ));
    display_success("  Step 3: ask for confirmation");
    display_success(&format!(
        "  Step 4: push the branch and {} to {}",
        release_tag, remote
    ));
}
