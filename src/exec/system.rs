use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ReleaseError, Result};
use crate::exec::{render_command, CommandOutput, CommandRunner};

/// Runs real processes in a fixed working directory
pub struct SystemRunner {
    work_dir: PathBuf,
}

impl SystemRunner {
    /// Create a runner whose commands execute in `work_dir`
    pub fn new<P: AsRef<Path>>(work_dir: P) -> Self {
        SystemRunner {
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let rendered = render_command(program, args);
        let work_dir = self.work_dir.join(dir);
        log::debug!("Running in {}: {}", work_dir.display(), rendered);

        let output = Command::new(program)
            .args(args)
            .current_dir(&work_dir)
            .output()
            .map_err(|source| ReleaseError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let result = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if result.success() {
            log::debug!("`{}` succeeded", rendered);
        } else {
            log::debug!("`{}` failed: {}", rendered, result.diagnostic());
        }

        Ok(result)
    }
}
