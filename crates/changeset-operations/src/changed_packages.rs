use changeset_core::{CHANGESET_DIR, ChangedFile, PackageDescriptor};
use indexmap::IndexMap;

use crate::classifier::{Excludes, PackageDirs, classify};
use crate::resolver::PackageResolver;
use crate::traits::ManifestStore;

fn is_changeset_file(path: &str) -> bool {
    path.strip_prefix(CHANGESET_DIR)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Packages touched by `files`, deduplicated by name in first-seen order.
///
/// Files under `.changeset/`, excluded files, markdown files and files outside
/// the tracked directories are skipped. A file that resolves to no manifest is
/// dropped, except for removed files, whose package is then named after the
/// directory below the tracked one.
#[must_use]
pub fn build_changed_packages<M: ManifestStore>(
    files: &[ChangedFile],
    dirs: &PackageDirs,
    excludes: &Excludes,
    store: &M,
) -> Vec<PackageDescriptor> {
    let resolver = PackageResolver::new(store, dirs);
    let mut packages: IndexMap<String, PackageDescriptor> = IndexMap::new();

    for file in files {
        if is_changeset_file(&file.path) {
            continue;
        }
        if !classify(&file.path, dirs, excludes).affects_package() {
            continue;
        }

        let descriptor = match resolver.resolve(&file.path) {
            Some(manifest_path) => resolver.describe(&manifest_path),
            None if file.is_removed() => match resolver.describe_removed(&file.path) {
                Some(descriptor) => descriptor,
                None => continue,
            },
            None => {
                tracing::debug!(path = %file.path, "no package owns changed file");
                continue;
            }
        };

        packages.entry(descriptor.name.clone()).or_insert(descriptor);
    }

    tracing::debug!(
        packages = ?packages.keys().collect::<Vec<_>>(),
        "changed packages"
    );
    packages.into_values().collect()
}
