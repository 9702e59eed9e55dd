use std::path::Path;

use changeset_core::CHANGESET_DIR;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;

use crate::CONFIG_FILE;
use crate::error::ProjectError;

const DEFAULT_BASE_BRANCH: &str = "main";

fn default_base_branch() -> String {
    DEFAULT_BASE_BRANCH.to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default = "default_base_branch")]
    base_branch: String,
    #[serde(default)]
    ignore: Vec<String>,
}

/// Settings read from `.changeset/config.json`.
#[derive(Debug, Clone)]
pub struct ChangesetConfig {
    base_branch: String,
    ignore: Vec<String>,
    ignore_set: GlobSet,
}

impl Default for ChangesetConfig {
    fn default() -> Self {
        Self {
            base_branch: default_base_branch(),
            ignore: Vec::new(),
            ignore_set: GlobSet::empty(),
        }
    }
}

impl ChangesetConfig {
    /// # Errors
    ///
    /// Returns `ProjectError::GlobPattern` if an ignore entry is not a valid glob.
    pub fn new(base_branch: impl Into<String>, ignore: Vec<String>) -> Result<Self, ProjectError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &ignore {
            let glob = Glob::new(pattern).map_err(|source| ProjectError::GlobPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let ignore_set = builder.build().map_err(|source| ProjectError::GlobPattern {
            pattern: ignore.join(", "),
            source,
        })?;

        Ok(Self {
            base_branch: base_branch.into(),
            ignore,
            ignore_set,
        })
    }

    #[must_use]
    pub fn base_branch(&self) -> &str {
        &self.base_branch
    }

    #[must_use]
    pub fn ignore(&self) -> &[String] {
        &self.ignore
    }

    /// Whether a package name matches an entry of the `ignore` list. Entries may
    /// be globs such as `@scope/*`.
    #[must_use]
    pub fn is_ignored(&self, package: &str) -> bool {
        self.ignore_set.is_match(package)
    }
}

/// Loads `.changeset/config.json`, falling back to defaults when it is absent.
///
/// # Errors
///
/// Returns `ProjectError` if the file exists but cannot be read or parsed.
pub fn load_changeset_config(root_dir: &Path) -> Result<ChangesetConfig, ProjectError> {
    let path = root_dir.join(CHANGESET_DIR).join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(ChangesetConfig::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ProjectError::FileRead {
        path: path.clone(),
        source,
    })?;
    let raw: RawConfig =
        serde_json::from_str(&content).map_err(|source| ProjectError::JsonParse { path, source })?;

    ChangesetConfig::new(raw.base_branch, raw.ignore)
}
