use std::path::Path;

use changeset_operations::operations::{CanaryInput, CanaryOutcome, CanaryPublishOperation};
use changeset_operations::providers::{
    FileSystemChangesetIO, FileSystemManifestStore, ProcessCommandRunner,
};
use changeset_version::{DEFAULT_VERSION_TEMPLATE, VersionTemplate};
use clap::Args;
use clap::builder::BoolishValueParser;

use super::github_forge;
use crate::config::{GitHubArgs, WorkflowArgs, WorkflowConfig};
use crate::context::GitHubContext;
use crate::error::{CliError, Result};
use crate::output::ActionOutputs;

#[derive(Args)]
pub(crate) struct CanaryPublishArgs {
    #[command(flatten)]
    workflow: WorkflowArgs,

    #[command(flatten)]
    github: GitHubArgs,

    /// Dist-tag the canary versions are published under
    #[arg(long, env = "INPUT_NPM_TAG", default_value = "canary")]
    npm_tag: String,

    #[arg(long, env = "INPUT_VERSION_SCRIPT", default_value = "npx changeset version")]
    version_script: String,

    #[arg(long, env = "INPUT_PUBLISH_SCRIPT", default_value = "npx changeset publish")]
    publish_script: String,

    /// Canary version shape; placeholders {VERSION}, {TAG}, {DATE}, {COMMITID7}
    #[arg(long, env = "INPUT_VERSION_TEMPLATE", default_value = DEFAULT_VERSION_TEMPLATE)]
    version_template: String,

    /// Rewrite versions but skip publishing and commenting
    #[arg(
        long,
        env = "INPUT_DRY_RUN",
        action = clap::ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        default_value_t = false
    )]
    dry_run: bool,
}

pub(crate) fn run(args: CanaryPublishArgs, project_root: &Path) -> Result<()> {
    let config = WorkflowConfig::from_args(&args.workflow)?;
    let version_template = VersionTemplate::parse(&args.version_template)?;
    let context = GitHubContext::from_env()?;
    let token = args.github.token()?;

    let pull_request = context
        .pull_request
        .as_ref()
        .ok_or(CliError::MissingPullRequest)?;
    let commit_sha = match &pull_request.head_sha {
        Some(sha) => sha.clone(),
        None => context.sha()?.to_string(),
    };

    let operation = CanaryPublishOperation::new(
        github_forge(&context, &token),
        FileSystemManifestStore::new(project_root),
        FileSystemChangesetIO::new(project_root),
        ProcessCommandRunner::new(project_root),
    );
    let input = CanaryInput {
        pull_request_number: pull_request.info.number,
        commit_sha,
        dirs: config.dirs,
        excludes: config.excludes,
        npm_tag: args.npm_tag,
        version_script: args.version_script,
        publish_script: args.publish_script,
        version_template,
        today: chrono::Local::now().date_naive(),
        dry_run: args.dry_run,
        locale: config.locale,
    };

    let mut outputs = ActionOutputs::new();
    match operation.execute(&input)? {
        CanaryOutcome::Published { packages, message } => {
            tracing::info!(packages = packages.len(), "canary versions published");
            outputs.set("published", "true");
            outputs.set_json("publishedPackages", &packages)?;
            outputs.set("message", message);
        }
        CanaryOutcome::DryRun { packages } => {
            for package in &packages {
                tracing::info!(package = %package.name, version = %package.version, "dry run, would publish");
            }
            outputs.set("published", "false");
            outputs.set_json("publishedPackages", &packages)?;
        }
        outcome @ (CanaryOutcome::MissingChangeset | CanaryOutcome::NoChangedPackages) => {
            tracing::info!(?outcome, "nothing to publish");
            outputs.set("published", "false");
            outputs.set("publishedPackages", "[]");
        }
    }
    outputs.write()
}
