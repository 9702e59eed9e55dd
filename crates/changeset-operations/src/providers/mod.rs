mod changelog;
mod changeset_io;
mod command;
mod git;
mod github;
mod manifest;
mod workspace;

pub use changelog::FileSystemChangelogReader;
pub use changeset_io::FileSystemChangesetIO;
pub use command::ProcessCommandRunner;
pub use git::Git2Provider;
pub use github::GitHubForge;
pub use manifest::FileSystemManifestStore;
pub use workspace::FileSystemWorkspaceProvider;
