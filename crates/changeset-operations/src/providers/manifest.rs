use std::path::{Path, PathBuf};

use changeset_manifest::PackageManifest;
use changeset_project::PACKAGE_JSON;
use walkdir::WalkDir;

use crate::Result;
use crate::error::OperationError;
use crate::traits::ManifestStore;

const SKIPPED_DIRS: [&str; 2] = ["node_modules", ".git"];

pub struct FileSystemManifestStore {
    project_root: PathBuf,
}

impl FileSystemManifestStore {
    #[must_use]
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }
}

impl ManifestStore for FileSystemManifestStore {
    fn manifest_exists(&self, path: &Path) -> bool {
        self.project_root.join(path).is_file()
    }

    fn read_manifest(&self, path: &Path) -> Result<PackageManifest> {
        Ok(changeset_manifest::read_manifest(
            &self.project_root.join(path),
        )?)
    }

    fn write_manifest(&self, manifest: &PackageManifest) -> Result<()> {
        Ok(changeset_manifest::write_manifest(manifest)?)
    }

    fn list_manifests(&self) -> Result<Vec<PathBuf>> {
        let walker = WalkDir::new(&self.project_root)
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir()
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
            });

        let mut manifests = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| OperationError::ManifestWalk {
                path: self.project_root.clone(),
                source: e,
            })?;
            if !entry.file_type().is_file() || entry.file_name() != PACKAGE_JSON {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.project_root) {
                manifests.push(relative.to_path_buf());
            }
        }

        manifests.sort();
        Ok(manifests)
    }
}
