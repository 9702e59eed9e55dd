use std::path::{Path, PathBuf};

use changeset_manifest::PackageManifest;

use crate::Result;

/// Access to `package.json` files by repository relative path.
pub trait ManifestStore: Send + Sync {
    fn manifest_exists(&self, path: &Path) -> bool;

    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or is not a JSON object.
    fn read_manifest(&self, path: &Path) -> Result<PackageManifest>;

    /// Writes a manifest previously obtained from [`ManifestStore::read_manifest`].
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be serialized or written.
    fn write_manifest(&self, manifest: &PackageManifest) -> Result<()>;

    /// Every `package.json` in the repository outside `node_modules`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be walked.
    fn list_manifests(&self) -> Result<Vec<PathBuf>>;
}
