mod changelog_reader;
mod changeset_io;
mod command_runner;
mod forge;
mod git_provider;
mod manifest_store;
mod workspace_provider;

pub use changelog_reader::ChangelogReader;
pub use changeset_io::{ChangesetReader, ChangesetWriter};
pub use command_runner::CommandRunner;
pub use forge::ForgeProvider;
pub use git_provider::GitProvider;
pub use manifest_store::ManifestStore;
pub use workspace_provider::WorkspaceProvider;
