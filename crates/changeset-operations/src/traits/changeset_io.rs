use std::path::{Path, PathBuf};

use changeset_core::Changeset;

use crate::Result;

pub trait ChangesetReader: Send + Sync {
    /// Pending changeset files as repository relative paths
    /// (`.changeset/<id>.md`), sorted. `README.md` is not a changeset.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    fn list_changesets(&self) -> Result<Vec<PathBuf>>;

    /// Reads one changeset; its id is derived from the file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn read_changeset(&self, path: &Path) -> Result<Changeset>;

    /// # Errors
    ///
    /// Returns an error if any listed changeset cannot be read or parsed.
    fn read_all(&self) -> Result<Vec<Changeset>> {
        self.list_changesets()?
            .iter()
            .map(|path| self.read_changeset(path))
            .collect()
    }
}

pub trait ChangesetWriter: Send + Sync {
    /// A fresh changeset id not used by any pending changeset.
    fn generate_id(&self) -> String;

    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    fn remove_changeset(&self, path: &Path) -> Result<()>;
}
