use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use release_tag::cli::orchestration::{self, ReleaseWorkflowArgs};
use release_tag::config;
use release_tag::exec::SystemRunner;
use release_tag::ui::{self, StdinPrompt};

#[derive(clap::Parser)]
#[command(
    name = "release-tag",
    version,
    about = "Bump the minor version, tag it as release/v<version> and push after confirmation"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Log every external command")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let repo_root = std::env::current_dir().context("Cannot determine working directory")?;
    let workflow_args = ReleaseWorkflowArgs {
        config_path: args.config,
        repo_root: repo_root.clone(),
        dry_run: args.dry_run,
    };

    let runner = SystemRunner::new(&repo_root);
    let mut prompt = StdinPrompt::stdin();

    let result =
        orchestration::run_release_workflow(&workflow_args, &config, &runner, &mut prompt);
    if let Err(e) = &result {
        ui::display_release_error(e);
    }

    std::process::exit(orchestration::exit_code(&result));
}
