use std::path::{Path, PathBuf};

use semver::Version;
use serde_json::{Map, Value};

use crate::error::ManifestError;

/// A `package.json` document. Keys keep their original order so a rewrite only
/// changes the fields that were touched.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    path: PathBuf,
    document: Map<String, Value>,
}

impl PackageManifest {
    /// # Errors
    ///
    /// Returns `ManifestError::NotAnObject` if the top-level value is not an object.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, ManifestError> {
        let path = path.into();
        let value: Value = serde_json::from_str(content).map_err(|source| ManifestError::Parse {
            path: path.clone(),
            source,
        })?;
        match value {
            Value::Object(document) => Ok(Self { path, document }),
            _ => Err(ManifestError::NotAnObject { path }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(Value::as_str)
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.document.get("version").and_then(Value::as_str)
    }

    #[must_use]
    pub fn is_private(&self) -> bool {
        self.document
            .get("private")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Script entries in declaration order; non-string values are skipped.
    #[must_use]
    pub fn scripts(&self) -> Vec<(&str, &str)> {
        self.document
            .get("scripts")
            .and_then(Value::as_object)
            .map(|scripts| {
                scripts
                    .iter()
                    .filter_map(|(key, value)| value.as_str().map(|s| (key.as_str(), s)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns `ManifestError` if the version field is missing or not valid semver.
    pub fn parsed_version(&self) -> Result<Version, ManifestError> {
        let raw = self.version().ok_or_else(|| ManifestError::MissingField {
            path: self.path.clone(),
            field: "version".to_string(),
        })?;
        Version::parse(raw).map_err(|source| ManifestError::InvalidVersion {
            path: self.path.clone(),
            version: raw.to_string(),
            source,
        })
    }

    pub fn set_version(&mut self, version: &str) {
        self.document
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    pub fn set_private(&mut self, private: bool) {
        self.document
            .insert("private".to_string(), Value::Bool(private));
    }

    /// Replaces a script body. Returns `false` when the script does not exist.
    pub fn set_script(&mut self, key: &str, script: &str) -> bool {
        let Some(scripts) = self
            .document
            .get_mut("scripts")
            .and_then(Value::as_object_mut)
        else {
            return false;
        };
        match scripts.get_mut(key) {
            Some(slot) => {
                *slot = Value::String(script.to_string());
                true
            }
            None => false,
        }
    }

    /// Pretty JSON with two-space indentation and a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Serialize` if the document cannot be encoded.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        let mut content =
            serde_json::to_string_pretty(&self.document).map_err(|source| {
                ManifestError::Serialize {
                    path: self.path.clone(),
                    source,
                }
            })?;
        content.push('\n');
        Ok(content)
    }
}

/// # Errors
///
/// Returns `ManifestError::Read` if the file cannot be read, or
/// `ManifestError::Parse` if the JSON is malformed.
pub fn read_manifest(path: &Path) -> Result<PackageManifest, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    PackageManifest::parse(path, &content)
}
