use crate::error::ManifestError;
use crate::reader::PackageManifest;

/// Writes the manifest back to the path it was read from.
///
/// # Errors
///
/// Returns `ManifestError::Write` if the file cannot be written.
pub fn write_manifest(manifest: &PackageManifest) -> Result<(), ManifestError> {
    let content = manifest.to_json()?;
    std::fs::write(manifest.path(), content).map_err(|source| ManifestError::Write {
        path: manifest.path().to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %manifest.path().display(), "wrote manifest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_manifest;

    fn write_fixture(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("package.json");
        std::fs::write(&path, content).expect("write fixture");
        path
    }

    #[test]
    fn write_manifest_keeps_templated_version() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(&dir, r#"{"name": "pkg", "version": "0.1.0"}"#);

        let mut manifest = read_manifest(&path).expect("read");
        manifest.set_version("0.2.0-canary-abc1234");
        write_manifest(&manifest).expect("write");

        let reread = read_manifest(&path).expect("reread");
        assert_eq!(reread.version(), Some("0.2.0-canary-abc1234"));
    }

    #[test]
    fn private_flag_survives_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(&dir, r#"{"name": "pkg", "version": "0.1.0"}"#);

        let mut manifest = read_manifest(&path).expect("read");
        manifest.set_private(true);
        write_manifest(&manifest).expect("write");

        assert!(read_manifest(&path).expect("reread").is_private());
    }

    #[test]
    fn missing_directory_is_a_write_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(&dir, r#"{"name": "pkg"}"#);
        let manifest = read_manifest(&path).expect("read");
        drop(dir);

        let err = write_manifest(&manifest).expect_err("directory removed");

        assert!(matches!(err, ManifestError::Write { .. }));
    }
}
