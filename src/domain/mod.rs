//! Domain logic - pure release rules independent of external commands

pub mod manifest;
pub mod tag;
pub mod version;

pub use manifest::PackageManifest;
pub use tag::{TagPair, TagPattern};
pub use version::ManifestVersion;
