use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::ChangesetError;

/// Semantic-version impact of a change, totally ordered `none < patch < minor < major`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl BumpType {
    pub const PUBLISHABLE: [Self; 3] = [Self::Major, Self::Minor, Self::Patch];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }

    #[must_use]
    pub fn is_publishable(self) -> bool {
        self != Self::None
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpType {
    type Err = ChangesetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "patch" => Ok(Self::Patch),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            other => Err(ChangesetError::UnknownBumpType(other.to_string())),
        }
    }
}

/// Status of a file in a pull request diff, as reported by the forge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    Copied,
    Changed,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    #[serde(rename = "filename")]
    pub path: String,
    pub status: FileStatus,
}

impl ChangedFile {
    #[must_use]
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }

    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.status == FileStatus::Removed
    }
}

/// A package touched by a change set of files.
///
/// `manifest_path` is `None` when the package identity was derived from the path
/// alone, e.g. because the manifest was removed in the same change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub directory: PathBuf,
    pub manifest_path: Option<PathBuf>,
    pub bump_type: Option<BumpType>,
}

impl PackageDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            manifest_path: None,
            bump_type: None,
        }
    }

    #[must_use]
    pub fn with_manifest(mut self, manifest_path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(manifest_path.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRelease {
    pub name: String,
    pub bump_type: BumpType,
}

/// A pending change declaration read from `.changeset/<id>.md`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    pub id: String,
    pub summary: String,
    pub releases: Vec<PackageRelease>,
}

impl Changeset {
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}
