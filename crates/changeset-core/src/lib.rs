pub mod error;
mod locale;
pub mod types;

pub use error::*;
pub use locale::Locale;
pub use types::*;

/// Directory holding pending changeset files, relative to the repository root.
pub const CHANGESET_DIR: &str = ".changeset";

/// Branch prefix used for release pull requests.
pub const RELEASE_BRANCH_PREFIX: &str = "changeset-release/";
