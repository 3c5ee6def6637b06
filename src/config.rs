use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::TagPattern;
use crate::error::{ReleaseError, Result};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "release.toml";

/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".release.toml";

/// Placeholder the bump tool replaces with the new version
pub const COMMIT_MESSAGE_PLACEHOLDER: &str = "%s";

/// Represents the complete configuration for release-tag.
///
/// Every section is optional; missing values fall back to the npm conventions
/// (`package.json`, `v{version}` native tags) and the `release/v{version}`
/// trigger tag.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub bump: BumpConfig,

    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub publish: PublishConfig,
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("package.json")
}

fn default_lockfile_path() -> PathBuf {
    PathBuf::from("package-lock.json")
}

/// Location of the version manifest and its lockfile, relative to the
/// repository root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ManifestConfig {
    #[serde(default = "default_manifest_path")]
    pub path: PathBuf,

    #[serde(default = "default_lockfile_path")]
    pub lockfile: PathBuf,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            path: default_manifest_path(),
            lockfile: default_lockfile_path(),
        }
    }
}

fn default_bump_program() -> String {
    "npm".to_string()
}

fn default_commit_message() -> String {
    "Bump version to %s".to_string()
}

/// External version bump tool invocation.
///
/// The tool is called as `<program> version minor -m <commit_message>`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BumpConfig {
    #[serde(default = "default_bump_program")]
    pub program: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

impl Default for BumpConfig {
    fn default() -> Self {
        BumpConfig {
            program: default_bump_program(),
            commit_message: default_commit_message(),
        }
    }
}

fn default_native_pattern() -> String {
    "v{version}".to_string()
}

fn default_release_pattern() -> String {
    "release/v{version}".to_string()
}

/// Tag naming patterns.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    /// Tag the bump tool creates on its own
    #[serde(default = "default_native_pattern")]
    pub native: String,

    /// Tag the downstream publish pipeline listens for
    #[serde(default = "default_release_pattern")]
    pub release: String,
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            native: default_native_pattern(),
            release: default_release_pattern(),
        }
    }
}

impl TagsConfig {
    pub fn native_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.native.clone())
    }

    pub fn release_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.release.clone())
    }
}

fn default_remote_name() -> String {
    "origin".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_name")]
    pub name: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            name: default_remote_name(),
        }
    }
}

/// Post-publish presentation.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PublishConfig {
    /// Where the operator can watch the triggered pipeline
    #[serde(default)]
    pub workflow_url: Option<String>,
}

impl Config {
    /// Checks values that deserialize fine but cannot drive a release.
    pub fn validate(&self) -> Result<()> {
        let native = self.tags.native_pattern()?;
        let release = self.tags.release_pattern()?;
        if native == release {
            return Err(ReleaseError::config(format!(
                "Native and release tag patterns must differ (both are '{}')",
                native.pattern
            )));
        }

        if !self
            .bump
            .commit_message
            .contains(COMMIT_MESSAGE_PLACEHOLDER)
        {
            return Err(ReleaseError::config(format!(
                "Commit message '{}' must contain the {} version placeholder",
                self.bump.commit_message, COMMIT_MESSAGE_PLACEHOLDER
            )));
        }

        if self.bump.program.trim().is_empty() {
            return Err(ReleaseError::config("Bump program must not be empty"));
        }

        if self.remote.name.trim().is_empty() {
            return Err(ReleaseError::config("Remote name must not be empty"));
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. `.release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// The loaded configuration is validated before it is returned.
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let source = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config_file(),
    };

    let config = match source {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            let text = fs::read_to_string(&path).map_err(|e| {
                ReleaseError::config(format!("Cannot read {}: {}", path.display(), e))
            })?;
            toml::from_str(&text)
                .map_err(|e| ReleaseError::config(format!("{}: {}", path.display(), e)))?
        }
        None => {
            log::debug!("No configuration file found, using defaults");
            Config::default()
        }
    };

    config.validate()?;
    Ok(config)
}

fn discover_config_file() -> Option<PathBuf> {
    let local = Path::new(".").join(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_FILE))
        .filter(|path| path.exists())
}
