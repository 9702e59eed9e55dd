use changeset_project::{ChangesetConfig, PreState, WorkspaceGraph};

use crate::Result;

pub trait WorkspaceProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the root manifest is missing or the workspace
    /// declaration is invalid.
    fn discover(&self) -> Result<WorkspaceGraph>;

    /// # Errors
    ///
    /// Returns an error if `.changeset/config.json` exists but is invalid.
    fn load_config(&self) -> Result<ChangesetConfig>;

    /// # Errors
    ///
    /// Returns an error if `.changeset/pre.json` exists but is invalid.
    fn load_pre_state(&self) -> Result<Option<PreState>>;
}
