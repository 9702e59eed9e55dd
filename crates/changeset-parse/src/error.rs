use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("missing opening delimiter '---'")]
    MissingOpeningDelimiter,

    #[error("missing closing delimiter '---'")]
    MissingClosingDelimiter,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("input exceeds maximum size of {max_bytes} bytes")]
    InputTooLarge { max_bytes: usize },

    #[error("package name cannot be empty")]
    EmptyPackageName,
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
