mod bump;
mod error;
mod template;

pub use bump::{bump_version, is_prerelease, prerelease_version};
pub use error::VersionError;
pub use template::{DEFAULT_VERSION_TEMPLATE, TemplateValues, VersionTemplate};
