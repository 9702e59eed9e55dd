use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Operation(#[from] changeset_operations::OperationError),

    #[error("invalid version template")]
    VersionTemplate(#[from] changeset_version::VersionError),

    #[error("invalid repository")]
    Repository(#[from] changeset_changelog::ChangelogError),

    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: changeset_operations::OperationError,
    },

    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("no GitHub token: set the github_token input or GITHUB_TOKEN")]
    MissingToken,

    #[error("the triggering event has no pull request")]
    MissingPullRequest,

    #[error("GITHUB_REF '{0}' is not a branch")]
    NotABranch(String),

    #[error("failed to read event payload '{path}'")]
    EventRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse event payload '{path}'")]
    EventParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write action outputs to '{path}'")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode action output")]
    OutputEncode(#[from] serde_json::Error),

    /// Already reported as a check annotation.
    #[error("pull request has no changeset")]
    ChangesetMissing,
}

impl CliError {
    /// Whether the error was already reported and needs no `error:` output.
    #[must_use]
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::ChangesetMissing)
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
