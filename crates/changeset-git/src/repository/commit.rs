use crate::{CommitInfo, Result};

use super::Repository;

impl Repository {
    /// Commits the current index on top of HEAD.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit cannot be created.
    pub fn commit(&self, message: &str) -> Result<CommitInfo> {
        let sig = self.inner.signature()?;
        let mut index = self.inner.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.inner.find_tree(tree_id)?;

        let parent = self.inner.head().ok().and_then(|h| h.peel_to_commit().ok());

        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let commit_oid = self
            .inner
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

        Ok(CommitInfo {
            sha: commit_oid.to_string(),
            message: message.to_string(),
        })
    }

    /// Stages everything and commits. Returns `None` without committing when
    /// the working tree is already clean.
    ///
    /// # Errors
    ///
    /// Returns an error if staging or committing fails.
    pub fn commit_all(&self, message: &str) -> Result<Option<CommitInfo>> {
        if self.is_working_tree_clean()? {
            tracing::debug!("working tree clean, nothing to commit");
            return Ok(None);
        }

        self.stage_all()?;
        let info = self.commit(message)?;
        tracing::info!(sha = %info.sha, "committed changes");
        Ok(Some(info))
    }
}
