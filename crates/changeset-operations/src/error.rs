use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Core(#[from] changeset_core::ChangesetError),

    #[error(transparent)]
    Git(#[from] changeset_git::GitError),

    #[error(transparent)]
    GitHub(#[from] changeset_github::GitHubError),

    #[error(transparent)]
    Project(#[from] changeset_project::ProjectError),

    #[error(transparent)]
    Manifest(#[from] changeset_manifest::ManifestError),

    #[error(transparent)]
    Changelog(#[from] changeset_changelog::ChangelogError),

    #[error("version calculation failed")]
    Version(#[from] changeset_version::VersionError),

    #[error("failed to read changeset file '{path}'")]
    ChangesetFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse changeset file '{path}'")]
    ChangesetParse {
        path: PathBuf,
        #[source]
        source: changeset_parse::FormatError,
    },

    #[error("failed to list changeset files in '{path}'")]
    ChangesetList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove '{path}'")]
    FileRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk '{path}' for manifests")]
    ManifestWalk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid packages_dir entry '{entry}': {reason}")]
    InvalidPackagesDir { entry: String, reason: &'static str },

    #[error("failed to run '{command}'")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}")]
    CommandFailed { command: String, status: String },

    #[error("command line is empty")]
    EmptyCommand,

    #[error("published package '{name}' is not part of the workspace")]
    UnknownPublishedPackage { name: String },

    #[error("workspace has no packages")]
    EmptyWorkspace,

    #[error("package '{name}' has no version")]
    MissingVersion { name: String },

    #[error("pull request payload has no head commit")]
    MissingHeadSha,
}

pub type Result<T> = std::result::Result<T, OperationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_packages_dir_names_entry_and_reason() {
        let err = OperationError::InvalidPackagesDir {
            entry: "../outside".to_string(),
            reason: "must not contain '..'",
        };

        let msg = err.to_string();

        assert!(msg.contains("../outside"));
        assert!(msg.contains("'..'"));
    }

    #[test]
    fn unknown_published_package_names_package() {
        let err = OperationError::UnknownPublishedPackage {
            name: "@acme/ghost".to_string(),
        };

        assert!(err.to_string().contains("@acme/ghost"));
    }
}
