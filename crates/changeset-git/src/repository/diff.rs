use changeset_core::{ChangedFile, FileStatus};

use crate::{GitError, Result};

use super::Repository;

fn file_status(delta: git2::Delta) -> Option<FileStatus> {
    match delta {
        git2::Delta::Added | git2::Delta::Untracked => Some(FileStatus::Added),
        git2::Delta::Deleted => Some(FileStatus::Removed),
        git2::Delta::Modified => Some(FileStatus::Modified),
        git2::Delta::Renamed => Some(FileStatus::Renamed),
        git2::Delta::Copied => Some(FileStatus::Copied),
        git2::Delta::Typechange => Some(FileStatus::Changed),
        _ => None,
    }
}

impl Repository {
    /// Files changed between two refs, with `/`-separated paths relative to the
    /// repository root. Deleted files are reported as [`FileStatus::Removed`]
    /// under their old path.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if either base or head cannot be resolved.
    pub fn changed_files(&self, base: Option<&str>, head: &str) -> Result<Vec<ChangedFile>> {
        let head_tree = self.resolve_tree(head)?;

        let base_tree = match base {
            Some(refspec) => Some(self.resolve_tree(refspec)?),
            None => None,
        };

        let mut diff = self
            .inner
            .diff_tree_to_tree(base_tree.as_ref(), Some(&head_tree), None)?;

        let mut find_opts = git2::DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))?;

        let mut changes = Vec::new();

        for delta in diff.deltas() {
            let Some(status) = file_status(delta.status()) else {
                continue;
            };

            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .ok_or(GitError::MissingDeltaPath)?;

            let path = path
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            changes.push(ChangedFile::new(path, status));
        }

        tracing::debug!(?base, head, count = changes.len(), "collected changed files");
        Ok(changes)
    }

    pub(crate) fn resolve_tree(&self, refspec: &str) -> Result<git2::Tree<'_>> {
        let obj = self
            .inner
            .revparse_single(refspec)
            .map_err(|_| GitError::RefNotFound {
                refspec: refspec.to_string(),
            })?;

        obj.peel_to_tree().map_err(|_| GitError::RefNotFound {
            refspec: refspec.to_string(),
        })
    }
}
