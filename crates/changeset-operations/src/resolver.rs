use std::path::{Path, PathBuf};

use changeset_core::PackageDescriptor;
use changeset_project::PACKAGE_JSON;

use crate::classifier::PackageDirs;
use crate::traits::ManifestStore;

/// Maps changed file paths to the manifest of the package owning them.
pub struct PackageResolver<'a, M> {
    store: &'a M,
    dirs: &'a PackageDirs,
}

impl<'a, M: ManifestStore> PackageResolver<'a, M> {
    #[must_use]
    pub fn new(store: &'a M, dirs: &'a PackageDirs) -> Self {
        Self { store, dirs }
    }

    /// Nearest ancestor manifest of `path`.
    ///
    /// In root mode this is always the root `package.json`. Otherwise the walk
    /// starts at the file's directory and ends below the tracked directory the
    /// path matched: neither a manifest in `packages/` itself nor the
    /// repository root manifest can claim a package under `packages/`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        if self.dirs.is_root_mode() {
            return Some(PathBuf::from(PACKAGE_JSON));
        }

        let tracked = format!("{}/", self.dirs.matching_dir(path)?);
        Path::new(path)
            .ancestors()
            .skip(1)
            .take_while(|dir| {
                let dir = format!("{}/", dir.to_string_lossy());
                dir.find(&tracked)
                    .is_some_and(|start| start + tracked.len() < dir.len())
            })
            .map(|dir| dir.join(PACKAGE_JSON))
            .find(|candidate| self.store.manifest_exists(candidate))
    }

    /// Descriptor for a resolved manifest. The name falls back to the
    /// directory name when the manifest cannot be read or has no name.
    #[must_use]
    pub fn describe(&self, manifest_path: &Path) -> PackageDescriptor {
        let directory = manifest_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let name = match self.store.read_manifest(manifest_path) {
            Ok(manifest) => manifest.name().map(str::to_string),
            Err(e) => {
                tracing::debug!(path = %manifest_path.display(), error = %e, "unreadable manifest");
                None
            }
        }
        .unwrap_or_else(|| fallback_name(&directory));

        PackageDescriptor::new(name, directory).with_manifest(manifest_path)
    }

    /// Package identity for a removed file whose manifest is gone: the path
    /// segment right after the tracked directory names the package.
    #[must_use]
    pub fn describe_removed(&self, path: &str) -> Option<PackageDescriptor> {
        let dir = self.dirs.matching_dir(path)?;
        let marker = format!("{dir}/");
        let start = path.find(&marker)? + marker.len();
        let rest = &path[start..];
        let (name, _) = rest.split_once('/')?;
        if name.is_empty() {
            return None;
        }

        let directory = PathBuf::from(&path[..start]).join(name);
        Some(PackageDescriptor::new(name, directory))
    }
}

fn fallback_name(directory: &Path) -> String {
    directory
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| directory.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockManifestStore;

    fn store() -> MockManifestStore {
        MockManifestStore::new()
            .with_manifest("package.json", r#"{"name": "monorepo", "private": true}"#)
            .with_manifest("packages/foo/package.json", r#"{"name": "@acme/foo"}"#)
            .with_manifest("packages/foo/nested/package.json", r#"{"name": "@acme/nested"}"#)
    }

    #[test]
    fn resolves_nearest_ancestor_manifest() {
        let store = store();
        let dirs = PackageDirs::new(["packages"]);
        let resolver = PackageResolver::new(&store, &dirs);

        assert_eq!(
            resolver.resolve("packages/foo/src/index.ts"),
            Some(PathBuf::from("packages/foo/package.json"))
        );
        assert_eq!(
            resolver.resolve("packages/foo/nested/src/a.ts"),
            Some(PathBuf::from("packages/foo/nested/package.json"))
        );
    }

    #[test]
    fn walk_stops_at_tracked_directory() {
        let store = store();
        let dirs = PackageDirs::new(["packages"]);
        let resolver = PackageResolver::new(&store, &dirs);

        assert_eq!(resolver.resolve("packages/bar/index.ts"), None);
    }

    #[test]
    fn manifest_in_tracked_directory_claims_nothing() {
        let store = store().with_manifest("packages/package.json", r#"{"name": "packages"}"#);
        let dirs = PackageDirs::new(["packages"]);
        let resolver = PackageResolver::new(&store, &dirs);

        assert_eq!(resolver.resolve("packages/bar/index.ts"), None);
        assert_eq!(resolver.resolve("packages/index.ts"), None);
        assert_eq!(
            resolver.resolve("packages/foo/src/index.ts"),
            Some(PathBuf::from("packages/foo/package.json"))
        );
    }

    #[test]
    fn root_mode_always_resolves_root_manifest() {
        let store = store();
        let dirs = PackageDirs::root();
        let resolver = PackageResolver::new(&store, &dirs);

        assert_eq!(
            resolver.resolve("packages/foo/src/index.ts"),
            Some(PathBuf::from("package.json"))
        );
    }

    #[test]
    fn describe_reads_name_from_manifest() {
        let store = store();
        let dirs = PackageDirs::new(["packages"]);
        let resolver = PackageResolver::new(&store, &dirs);

        let descriptor = resolver.describe(Path::new("packages/foo/package.json"));

        assert_eq!(descriptor.name, "@acme/foo");
        assert_eq!(descriptor.directory, PathBuf::from("packages/foo"));
    }

    #[test]
    fn describe_falls_back_to_directory_name() {
        let store = MockManifestStore::new().with_manifest("packages/baz/package.json", "not json");
        let dirs = PackageDirs::new(["packages"]);
        let resolver = PackageResolver::new(&store, &dirs);

        let descriptor = resolver.describe(Path::new("packages/baz/package.json"));

        assert_eq!(descriptor.name, "baz");
        assert!(descriptor.manifest_path.is_some());
    }

    #[test]
    fn describe_root_manifest_uses_dot_directory() {
        let store = store();
        let dirs = PackageDirs::root();
        let resolver = PackageResolver::new(&store, &dirs);

        let descriptor = resolver.describe(Path::new("package.json"));

        assert_eq!(descriptor.name, "monorepo");
        assert_eq!(descriptor.directory, PathBuf::from("."));
    }

    #[test]
    fn removed_file_derives_name_from_segment_after_tracked_dir() {
        let store = store();
        let dirs = PackageDirs::new(["packages"]);
        let resolver = PackageResolver::new(&store, &dirs);

        let descriptor = resolver
            .describe_removed("packages/bar/src/index.ts")
            .expect("descriptor");

        assert_eq!(descriptor.name, "bar");
        assert_eq!(descriptor.directory, PathBuf::from("packages/bar"));
        assert_eq!(descriptor.manifest_path, None);
    }

    #[test]
    fn removed_file_directly_in_tracked_dir_has_no_package() {
        let store = store();
        let dirs = PackageDirs::new(["packages"]);
        let resolver = PackageResolver::new(&store, &dirs);

        assert!(resolver.describe_removed("packages/tsconfig.json").is_none());
    }
}
