use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::DetachedHead`] if HEAD is not on a branch.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head()?;

        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }

        head.shorthand()
            .map(String::from)
            .ok_or(GitError::DetachedHead)
    }

    /// # Errors
    ///
    /// Returns an error if HEAD does not point at a commit.
    pub fn head_sha(&self) -> Result<String> {
        Ok(self.inner.head()?.peel_to_commit()?.id().to_string())
    }

    /// Equivalent of an empty `git status --porcelain`.
    ///
    /// # Errors
    ///
    /// Returns an error if the git status operation fails.
    pub fn is_working_tree_clean(&self) -> Result<bool> {
        let statuses = self.inner.statuses(Some(
            git2::StatusOptions::new()
                .include_untracked(true)
                .recurse_untracked_dirs(true),
        ))?;

        Ok(statuses.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{commit_change, setup_test_repo};
    use std::fs;

    #[test]
    fn current_branch_on_main() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let branch = repo.current_branch()?;
        assert!(branch == "main" || branch == "master");
        Ok(())
    }

    #[test]
    fn head_sha_matches_last_commit() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        let oid = commit_change(&dir, &repo, "a.txt", Some("a"))?;

        assert_eq!(repo.head_sha()?, oid.to_string());
        Ok(())
    }

    #[test]
    fn clean_working_tree() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        assert!(repo.is_working_tree_clean()?);
        Ok(())
    }

    #[test]
    fn dirty_working_tree_with_untracked_file() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        fs::write(dir.path().join("new_file.txt"), "content")?;
        assert!(!repo.is_working_tree_clean()?);
        Ok(())
    }
}
