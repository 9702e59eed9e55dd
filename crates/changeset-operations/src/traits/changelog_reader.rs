use std::path::Path;

use changeset_changelog::Changelog;

use crate::Result;

pub trait ChangelogReader: Send + Sync {
    /// The `CHANGELOG.md` of the package in `package_dir` (repository
    /// relative), or `None` when the package has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn read_changelog(&self, package_dir: &Path) -> Result<Option<Changelog>>;
}
