mod canary_publish;
mod detect_add;
mod publish;
mod status;

use std::path::Path;

use changeset_github::GitHubClient;
use changeset_operations::providers::GitHubForge;
use clap::Subcommand;

use crate::context::GitHubContext;
use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Comment the changed packages and their changesets on a pull request
    DetectAdd(detect_add::DetectAddArgs),
    /// Publish the packages changed by a pull request under a canary version
    CanaryPublish(canary_publish::CanaryPublishArgs),
    /// Open the release pull request, or publish once it has been merged
    Publish(publish::PublishArgs),
    /// Show the release plan of the pending changesets
    Status(status::StatusArgs),
}

impl Commands {
    pub(crate) fn execute(self, project_root: &Path) -> Result<()> {
        match self {
            Self::DetectAdd(args) => detect_add::run(args, project_root),
            Self::CanaryPublish(args) => canary_publish::run(args, project_root),
            Self::Publish(args) => publish::run(args, project_root),
            Self::Status(args) => status::run(args, project_root),
        }
    }
}

fn github_forge(context: &GitHubContext, token: &str) -> GitHubForge {
    GitHubForge::new(GitHubClient::new(
        context.api_url.as_str(),
        context.repository.owner.as_str(),
        context.repository.repo.as_str(),
        token,
    ))
}
