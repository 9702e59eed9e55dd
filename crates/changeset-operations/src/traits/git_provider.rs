use changeset_core::ChangedFile;
use changeset_git::CommitInfo;

use crate::Result;

pub trait GitProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or a ref cannot be resolved.
    fn changed_files(&self, base: &str, head: &str) -> Result<Vec<ChangedFile>>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or HEAD is unborn.
    fn head_sha(&self) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or status check fails.
    fn is_working_tree_clean(&self) -> Result<bool>;

    /// Stages everything and commits. Returns `None` when there was nothing to commit.
    ///
    /// # Errors
    ///
    /// Returns an error if staging or committing fails.
    fn commit_all(&self, message: &str) -> Result<Option<CommitInfo>>;

    /// Checks out `branch`, creating it when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch cannot be created or checked out.
    fn switch_branch(&self, branch: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the revision cannot be resolved or the reset fails.
    fn reset_hard(&self, revision: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the push is rejected or the remote is unreachable.
    fn push(&self, branch: &str, force: bool) -> Result<()>;

    /// Pushes all local tags and returns how many were pushed.
    ///
    /// # Errors
    ///
    /// Returns an error if the push fails.
    fn push_tags(&self) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the repository configuration cannot be written.
    fn configure_user(&self, name: &str, email: &str) -> Result<()>;
}
