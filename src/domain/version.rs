use crate::error::{ReleaseError, Result};
use std::fmt;

/// Plain `MAJOR.MINOR.PATCH` version as stored in the package manifest
///
/// Backed by [semver::Version] but rejects pre-release and build metadata,
/// which the release tag format has no room for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ManifestVersion(semver::Version);

impl ManifestVersion {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        ManifestVersion(semver::Version::new(major, minor, patch))
    }

    /// Parse a manifest version string (e.g., "1.3.0")
    pub fn parse(text: &str) -> Result<Self> {
        let version = semver::Version::parse(text.trim()).map_err(|e| {
            ReleaseError::manifest(format!(
                "Invalid version '{}': {} - expected MAJOR.MINOR.PATCH",
                text, e
            ))
        })?;

        if !version.pre.is_empty() || !version.build.is_empty() {
            return Err(ReleaseError::manifest(format!(
                "Invalid version '{}': pre-release and build metadata are not supported",
                text
            )));
        }

        Ok(ManifestVersion(version))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    /// Next minor version, patch reset to zero
    pub fn next_minor(&self) -> Self {
        Self::new(self.major(), self.minor() + 1, 0)
    }
}

impl fmt::Display for ManifestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
