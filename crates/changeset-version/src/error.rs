use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid version '{version}'")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("invalid pre-release tag '{0}'")]
    InvalidPrereleaseTag(String),

    #[error("unknown placeholder '{{{placeholder}}}' in version template '{template}'")]
    UnknownPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("unclosed placeholder in version template '{0}'")]
    UnclosedPlaceholder(String),

    #[error("version template '{template}' rendered '{rendered}', which is not a valid version")]
    InvalidRenderedVersion {
        template: String,
        rendered: String,
        #[source]
        source: semver::Error,
    },
}
