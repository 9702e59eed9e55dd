mod error;
mod reader;
mod scripts;
mod writer;

pub use error::ManifestError;
pub use reader::{PackageManifest, read_manifest};
pub use scripts::{NO_GIT_TAG_FLAG, with_publish_flags};
pub use writer::write_manifest;
