use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ProjectError;

/// The `workspaces` field of a root `package.json`: either a list of globs (npm,
/// yarn classic) or an object with a `packages` list (yarn with nohoist).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WorkspacesField {
    Globs(Vec<String>),
    Config {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl WorkspacesField {
    #[must_use]
    pub fn globs(&self) -> &[String] {
        match self {
            Self::Globs(globs) | Self::Config { packages: globs } => globs,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BoltSection {
    #[serde(default)]
    pub workspaces: Vec<String>,
}

/// Read model of a `package.json`, limited to the fields discovery needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    pub name: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub private: bool,
    pub workspaces: Option<WorkspacesField>,
    pub bolt: Option<BoltSection>,
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub peer_dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub optional_dependencies: IndexMap<String, String>,
}

impl PackageJson {
    /// All dependency ranges by package name; later sections do not override
    /// an earlier declaration.
    #[must_use]
    pub fn all_dependencies(&self) -> IndexMap<String, String> {
        let mut merged = IndexMap::new();
        for section in [
            &self.dependencies,
            &self.dev_dependencies,
            &self.peer_dependencies,
            &self.optional_dependencies,
        ] {
            for (name, range) in section {
                merged
                    .entry(name.clone())
                    .or_insert_with(|| range.clone());
            }
        }
        merged
    }
}

/// # Errors
///
/// Returns `ProjectError` if the file cannot be read or is not valid JSON.
pub fn read_package_json(path: &Path) -> Result<PackageJson, ProjectError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProjectError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ProjectError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}
