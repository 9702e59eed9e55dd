use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangesetError {
    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("unknown bump type '{0}' (expected major, minor, patch or none)")]
    UnknownBumpType(String),

    #[error("unsupported language '{0}' (expected en or ko)")]
    UnsupportedLocale(String),
}

pub type Result<T> = std::result::Result<T, ChangesetError>;
