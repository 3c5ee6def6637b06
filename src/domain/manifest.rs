use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::domain::version::ManifestVersion;
use crate::error::{ReleaseError, Result};

/// The fields of a package manifest this tool reads
///
/// The manifest is never written here; the bump tool owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: ManifestVersion,
}

impl PackageManifest {
    /// Read and parse the manifest at `path`
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ReleaseError::manifest(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&text).map_err(|e| match e {
            ReleaseError::Manifest(msg) => {
                ReleaseError::manifest(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse manifest JSON text
    pub fn parse(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| ReleaseError::manifest(format!("Invalid JSON: {}", e)))?;

        let version = document
            .get("version")
            .ok_or_else(|| ReleaseError::manifest("Missing 'version' key"))?
            .as_str()
            .ok_or_else(|| ReleaseError::manifest("'version' must be a string"))?;

        let name = document
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(PackageManifest {
            name,
            version: ManifestVersion::parse(version)?,
        })
    }
}
