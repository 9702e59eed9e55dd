use std::path::Path;

use changeset_core::CHANGESET_DIR;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::PRE_STATE_FILE;
use crate::error::ProjectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreMode {
    Pre,
    Exit,
}

/// Pre-release mode state stored in `.changeset/pre.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreState {
    pub mode: PreMode,
    pub tag: String,
    #[serde(default)]
    pub initial_versions: IndexMap<String, String>,
    #[serde(default)]
    pub changesets: Vec<String>,
}

impl PreState {
    /// Whether versions should still receive the pre-release tag. In `exit`
    /// mode the next version command graduates to stable versions.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mode == PreMode::Pre
    }
}

/// # Errors
///
/// Returns `ProjectError` if `pre.json` exists but cannot be read or parsed.
pub fn load_pre_state(root_dir: &Path) -> Result<Option<PreState>, ProjectError> {
    let path = root_dir.join(CHANGESET_DIR).join(PRE_STATE_FILE);
    if !path.is_file() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ProjectError::FileRead {
        path: path.clone(),
        source,
    })?;
    let state: PreState =
        serde_json::from_str(&content).map_err(|source| ProjectError::JsonParse { path, source })?;

    tracing::debug!(tag = %state.tag, mode = ?state.mode, "pre-release state loaded");
    Ok(Some(state))
}
