use crate::domain::version::ManifestVersion;
use crate::error::{ReleaseError, Result};

const PLACEHOLDER: &str = "{version}";

/// Tag naming pattern (e.g., "v{version}", "release/v{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a pattern, requiring exactly one `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.matches(PLACEHOLDER).count() != 1 {
            return Err(ReleaseError::config(format!(
                "Tag pattern '{}' must contain exactly one {} placeholder",
                pattern, PLACEHOLDER
            )));
        }
        Ok(TagPattern { pattern })
    }

    /// Format a version according to pattern
    /// Example: pattern="release/v{version}", version="1.4.0" -> "release/v1.4.0"
    pub fn format(&self, version: &ManifestVersion) -> String {
        self.pattern.replace(PLACEHOLDER, &version.to_string())
    }

    /// Version a tag name carries, if the tag follows this pattern
    pub fn parse_tag(&self, tag: &str) -> Option<ManifestVersion> {
        let escaped = regex::escape(&self.pattern);
        let regex_pattern = escaped.replace(r"\{version\}", r"(\d+\.\d+\.\d+)");

        let re = regex::Regex::new(&format!("^{}$", regex_pattern)).ok()?;
        let captures = re.captures(tag)?;
        ManifestVersion::parse(captures.get(1)?.as_str()).ok()
    }

    /// The tag in `tags` carrying the highest version for this pattern
    pub fn latest<'t>(&self, tags: &'t [String]) -> Option<(&'t str, ManifestVersion)> {
        tags.iter()
            .filter_map(|tag| self.parse_tag(tag).map(|version| (tag.as_str(), version)))
            .max_by(|a, b| a.1.cmp(&b.1))
    }
}

/// The tag the bump tool creates and the tag the release pipeline listens for,
/// both derived from the same version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair {
    pub native: String,
    pub release: String,
}

impl TagPair {
    pub fn derive(native: &TagPattern, release: &TagPattern, version: &ManifestVersion) -> Self {
        TagPair {
            native: native.format(version),
            release: release.format(version),
        }
    }
}
