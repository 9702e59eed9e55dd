mod config;
mod error;
mod manifest;
mod pre_state;
mod project;

pub const PACKAGE_JSON: &str = "package.json";
pub const CONFIG_FILE: &str = "config.json";
pub const PRE_STATE_FILE: &str = "pre.json";

pub use config::{ChangesetConfig, load_changeset_config};
pub use error::ProjectError;
pub use manifest::{PackageJson, WorkspacesField, read_package_json};
pub use pre_state::{PreMode, PreState, load_pre_state};
pub use project::{WorkspaceGraph, WorkspacePackage, WorkspaceTool, discover_workspace};

pub type Result<T> = std::result::Result<T, ProjectError>;
