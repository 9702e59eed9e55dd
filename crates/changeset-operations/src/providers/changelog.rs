use std::path::{Path, PathBuf};

use changeset_changelog::{CHANGELOG_FILE, Changelog};

use crate::Result;
use crate::traits::ChangelogReader;

pub struct FileSystemChangelogReader {
    project_root: PathBuf,
}

impl FileSystemChangelogReader {
    #[must_use]
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }
}

impl ChangelogReader for FileSystemChangelogReader {
    fn read_changelog(&self, package_dir: &Path) -> Result<Option<Changelog>> {
        let path = self.project_root.join(package_dir).join(CHANGELOG_FILE);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no changelog");
            return Ok(None);
        }
        Ok(Some(Changelog::from_file(&path)?))
    }
}
