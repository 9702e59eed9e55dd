use std::path::Path;

use changeset_operations::operations::{DetectAddInput, DetectAddOperation, DetectAddOutcome};
use changeset_operations::providers::{
    FileSystemChangesetIO, FileSystemManifestStore, FileSystemWorkspaceProvider, Git2Provider,
    ProcessCommandRunner,
};
use clap::Args;

use super::github_forge;
use crate::config::{GitHubArgs, WorkflowArgs, WorkflowConfig, non_empty, split_list};
use crate::context::GitHubContext;
use crate::error::{CliError, Result};
use crate::output::annotate_error;

#[derive(Args)]
pub(crate) struct DetectAddArgs {
    #[command(flatten)]
    workflow: WorkflowArgs,

    #[command(flatten)]
    github: GitHubArgs,

    /// Pull request label that skips detection
    #[arg(long, env = "INPUT_SKIP_LABEL")]
    skip_label: Option<String>,

    /// Comma separated base branches whose release pull requests are skipped
    #[arg(long, env = "INPUT_SKIP_BRANCHES", default_value = "")]
    skip_branches: String,

    /// Command run when the pull request touches changeset files
    #[arg(long, env = "INPUT_FORMATTING_SCRIPT")]
    formatting_script: Option<String>,
}

pub(crate) fn run(args: DetectAddArgs, project_root: &Path) -> Result<()> {
    let config = WorkflowConfig::from_args(&args.workflow)?;
    let context = GitHubContext::from_env()?;
    let token = args.github.token()?;

    let operation = DetectAddOperation::new(
        github_forge(&context, &token),
        Git2Provider::new(project_root).with_token(token),
        FileSystemManifestStore::new(project_root),
        FileSystemWorkspaceProvider::new(project_root),
        FileSystemChangesetIO::new(project_root),
        ProcessCommandRunner::new(project_root),
    );

    let (pull_request, labels) = match context.pull_request {
        Some(pr) => (Some(pr.info), pr.labels),
        None => (None, Vec::new()),
    };
    let input = DetectAddInput {
        pull_request,
        labels,
        dirs: config.dirs,
        excludes: config.excludes,
        skip_label: non_empty(args.skip_label),
        skip_branches: split_list(&args.skip_branches),
        formatting_script: non_empty(args.formatting_script),
        locale: config.locale,
    };

    match operation.execute(&input)? {
        DetectAddOutcome::ChangesetMissing { packages, message } => {
            tracing::warn!(packages = packages.len(), "pull request has no changeset");
            annotate_error(&message);
            Err(CliError::ChangesetMissing)
        }
        DetectAddOutcome::Commented {
            packages,
            comment_id,
        } => {
            tracing::info!(packages = packages.len(), comment_id, "status comment written");
            Ok(())
        }
        outcome => {
            tracing::info!(?outcome, "detection finished");
            Ok(())
        }
    }
}
