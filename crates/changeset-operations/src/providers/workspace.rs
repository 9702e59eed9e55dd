use std::path::{Path, PathBuf};

use changeset_project::{
    ChangesetConfig, PreState, WorkspaceGraph, discover_workspace, load_changeset_config,
    load_pre_state,
};

use crate::Result;
use crate::traits::WorkspaceProvider;

pub struct FileSystemWorkspaceProvider {
    project_root: PathBuf,
}

impl FileSystemWorkspaceProvider {
    #[must_use]
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }
}

impl WorkspaceProvider for FileSystemWorkspaceProvider {
    fn discover(&self) -> Result<WorkspaceGraph> {
        Ok(discover_workspace(&self.project_root)?)
    }

    fn load_config(&self) -> Result<ChangesetConfig> {
        Ok(load_changeset_config(&self.project_root)?)
    }

    fn load_pre_state(&self) -> Result<Option<PreState>> {
        Ok(load_pre_state(&self.project_root)?)
    }
}
