mod changelog;
mod entry;
mod error;
mod forge;

pub use changelog::{CHANGELOG_FILE, Changelog};
pub use entry::ChangelogEntry;
pub use error::ChangelogError;
pub use forge::RepositoryInfo;

pub type Result<T> = std::result::Result<T, ChangelogError>;
