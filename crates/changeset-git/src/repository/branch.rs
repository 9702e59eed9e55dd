use crate::{GitError, Result};

use super::Repository;

const ORIGIN: &str = "origin";

impl Repository {
    /// Checks out `name`, creating it when missing (`git switch` falling back
    /// to `git switch -c`). A new branch starts from `origin/<name>` when that
    /// exists, otherwise from HEAD.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch cannot be created or checked out.
    pub fn switch_branch(&self, name: &str) -> Result<()> {
        let exists = self
            .inner
            .find_branch(name, git2::BranchType::Local)
            .is_ok();

        if !exists {
            let remote_name = format!("{ORIGIN}/{name}");
            let start = match self.inner.find_branch(&remote_name, git2::BranchType::Remote) {
                Ok(remote) => remote.get().peel_to_commit()?,
                Err(_) => self.inner.head()?.peel_to_commit()?,
            };
            self.inner.branch(name, &start, false)?;
            tracing::info!(branch = name, "created branch");
        }

        let refname = format!("refs/heads/{name}");
        let target = self.inner.revparse_single(&refname)?;
        self.inner
            .checkout_tree(&target, Some(git2::build::CheckoutBuilder::new().safe()))?;
        self.inner.set_head(&refname)?;

        tracing::debug!(branch = name, "switched branch");
        Ok(())
    }

    /// `git reset --hard <revspec>`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if the revision cannot be resolved.
    pub fn reset_hard(&self, revspec: &str) -> Result<()> {
        let target = self
            .inner
            .revparse_single(revspec)
            .map_err(|_| GitError::RefNotFound {
                refspec: revspec.to_string(),
            })?;

        self.inner.reset(&target, git2::ResetType::Hard, None)?;
        Ok(())
    }
}
