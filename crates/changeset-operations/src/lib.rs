mod changed_packages;
mod classifier;
mod error;
pub mod operations;
mod planner;
pub mod providers;
pub mod publish_output;
pub mod render;
mod resolver;
pub mod traits;

#[cfg(test)]
pub mod mocks;

pub use changed_packages::build_changed_packages;
pub use classifier::{Classification, Excludes, PackageDirs, ROOT_DIR_MARKER, classify};
pub use error::{OperationError, Result};
pub use planner::{PlannedRelease, ReleasePlan, assemble_release_plan};
pub use resolver::PackageResolver;
