use std::path::{Path, PathBuf};

use changeset_core::ChangedFile;
use changeset_git::{CommitInfo, PushOptions, Repository};

use crate::Result;
use crate::traits::GitProvider;

/// Git access backed by libgit2. The repository is reopened per call so the
/// provider stays `Sync`.
pub struct Git2Provider {
    project_root: PathBuf,
    token: Option<String>,
}

impl Git2Provider {
    #[must_use]
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            token: None,
        }
    }

    /// Token used to authenticate pushes over HTTPS.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn open(&self) -> Result<Repository> {
        Ok(Repository::open(&self.project_root)?)
    }
}

impl GitProvider for Git2Provider {
    fn changed_files(&self, base: &str, head: &str) -> Result<Vec<ChangedFile>> {
        Ok(self.open()?.changed_files(Some(base), head)?)
    }

    fn head_sha(&self) -> Result<String> {
        Ok(self.open()?.head_sha()?)
    }

    fn is_working_tree_clean(&self) -> Result<bool> {
        Ok(self.open()?.is_working_tree_clean()?)
    }

    fn commit_all(&self, message: &str) -> Result<Option<CommitInfo>> {
        Ok(self.open()?.commit_all(message)?)
    }

    fn switch_branch(&self, branch: &str) -> Result<()> {
        Ok(self.open()?.switch_branch(branch)?)
    }

    fn reset_hard(&self, revision: &str) -> Result<()> {
        Ok(self.open()?.reset_hard(revision)?)
    }

    fn push(&self, branch: &str, force: bool) -> Result<()> {
        let mut options = PushOptions::default();
        if force {
            options = options.forced();
        }
        if let Some(token) = &self.token {
            options = options.with_token(token.clone());
        }
        Ok(self.open()?.push(branch, &options)?)
    }

    fn push_tags(&self) -> Result<usize> {
        Ok(self.open()?.push_tags(self.token.as_deref())?)
    }

    fn configure_user(&self, name: &str, email: &str) -> Result<()> {
        Ok(self.open()?.configure_user(name, email)?)
    }
}
