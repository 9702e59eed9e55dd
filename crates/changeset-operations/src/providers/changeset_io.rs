use std::fs;
use std::path::{Path, PathBuf};

use changeset_core::{CHANGESET_DIR, Changeset};
use changeset_parse::{changeset_id_from_path, parse_changeset};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{ChangesetReader, ChangesetWriter};

const README: &str = "README.md";
const MAX_ID_ATTEMPTS: usize = 16;

pub struct FileSystemChangesetIO {
    project_root: PathBuf,
}

impl FileSystemChangesetIO {
    #[must_use]
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

impl ChangesetReader for FileSystemChangesetIO {
    fn list_changesets(&self) -> Result<Vec<PathBuf>> {
        let full_path = self.project_root.join(CHANGESET_DIR);

        let entries = match fs::read_dir(&full_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(OperationError::ChangesetList {
                    path: full_path,
                    source,
                });
            }
        };

        let mut changesets = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| OperationError::ChangesetList {
                path: full_path.clone(),
                source,
            })?;
            let path = entry.path();

            if !path.is_file() || path.file_name().is_some_and(|name| name == README) {
                continue;
            }
            if changeset_id_from_path(&path).is_none() {
                continue;
            }

            let relative = path
                .strip_prefix(&self.project_root)
                .map_or_else(|_| path.clone(), Path::to_path_buf);
            changesets.push(relative);
        }

        changesets.sort();
        Ok(changesets)
    }

    fn read_changeset(&self, path: &Path) -> Result<Changeset> {
        let full_path = self.resolve(path);
        let content =
            fs::read_to_string(&full_path).map_err(|source| OperationError::ChangesetFileRead {
                path: full_path.clone(),
                source,
            })?;
        let changeset =
            parse_changeset(&content).map_err(|source| OperationError::ChangesetParse {
                path: full_path.clone(),
                source,
            })?;

        let id = changeset_id_from_path(&full_path).unwrap_or_default();
        Ok(changeset.with_id(id))
    }
}

impl ChangesetWriter for FileSystemChangesetIO {
    fn generate_id(&self) -> String {
        let changeset_dir = self.project_root.join(CHANGESET_DIR);
        for _ in 0..MAX_ID_ATTEMPTS {
            if let Some(id) = petname::petname(3, "-") {
                if !changeset_dir.join(format!("{id}.md")).exists() {
                    return id;
                }
            }
        }

        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        format!("changeset-{timestamp}")
    }

    fn remove_changeset(&self, path: &Path) -> Result<()> {
        let full_path = self.resolve(path);
        fs::remove_file(&full_path).map_err(|source| OperationError::FileRemove {
            path: full_path,
            source,
        })
    }
}
