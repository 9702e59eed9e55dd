use std::path::Path;

use changeset_core::Locale;
use changeset_operations::operations::{PublishInput, PublishOperation, PublishOutcome};
use changeset_operations::providers::{
    FileSystemChangelogReader, FileSystemChangesetIO, FileSystemWorkspaceProvider, Git2Provider,
    ProcessCommandRunner,
};
use clap::Args;
use clap::builder::BoolishValueParser;

use super::github_forge;
use crate::config::{GitHubArgs, non_empty, parse_locale};
use crate::context::GitHubContext;
use crate::error::Result;
use crate::output::ActionOutputs;

const DEFAULT_TITLE: &str = "Version Packages";
const BOT_NAME: &str = "github-actions[bot]";
const BOT_EMAIL: &str = "github-actions[bot]@users.noreply.github.com";

#[derive(Args)]
pub(crate) struct PublishArgs {
    #[command(flatten)]
    github: GitHubArgs,

    /// Language of the pull request body and messages (en, ko)
    #[arg(long, env = "INPUT_LANGUAGE", default_value = "en", value_parser = parse_locale)]
    language: Locale,

    #[arg(long, env = "INPUT_VERSION_SCRIPT", default_value = "npx changeset version")]
    version_script: String,

    #[arg(long, env = "INPUT_PUBLISH_SCRIPT", default_value = "npx changeset publish")]
    publish_script: String,

    /// Command run after versioning, before the release commit
    #[arg(long, env = "INPUT_FORMATTING_SCRIPT")]
    formatting_script: Option<String>,

    #[arg(long, env = "INPUT_PR_TITLE", default_value = DEFAULT_TITLE)]
    pr_title: String,

    #[arg(long, env = "INPUT_COMMIT_MESSAGE", default_value = DEFAULT_TITLE)]
    commit_message: String,

    #[arg(long, env = "INPUT_GIT_USERNAME", default_value = BOT_NAME)]
    git_username: String,

    #[arg(long, env = "INPUT_GIT_EMAIL", default_value = BOT_EMAIL)]
    git_email: String,

    /// Create a GitHub release for every published package
    #[arg(
        long,
        env = "INPUT_CREATE_RELEASE",
        action = clap::ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        default_value_t = false
    )]
    create_release: bool,
}

pub(crate) fn run(args: PublishArgs, project_root: &Path) -> Result<()> {
    let context = GitHubContext::from_env()?;
    let token = args.github.token()?;
    let branch = context.branch()?.to_string();
    let sha = context.sha()?.to_string();

    let operation = PublishOperation::new(
        github_forge(&context, &token),
        Git2Provider::new(project_root).with_token(token),
        FileSystemWorkspaceProvider::new(project_root),
        FileSystemChangesetIO::new(project_root),
        ProcessCommandRunner::new(project_root),
        FileSystemChangelogReader::new(project_root),
    );
    let input = PublishInput {
        branch,
        sha,
        repository: context.repository.clone(),
        version_script: args.version_script,
        publish_script: args.publish_script,
        formatting_script: non_empty(args.formatting_script),
        pr_title: args.pr_title,
        commit_message: args.commit_message,
        git_username: args.git_username,
        git_email: args.git_email,
        create_release: args.create_release,
        locale: args.language,
    };

    let mut outputs = ActionOutputs::new();
    match operation.execute(&input)? {
        PublishOutcome::Versioned {
            pull_request_number,
            created,
        } => {
            tracing::info!(pull_request_number, created, "release pull request ready");
            outputs.set("published", "false");
            outputs.set("pullRequestNumber", pull_request_number.to_string());
        }
        PublishOutcome::Published { packages, message } => {
            tracing::info!(packages = packages.len(), "packages published");
            outputs.set("published", "true");
            outputs.set_json("publishedPackages", &packages)?;
            outputs.set("message", message);
        }
        PublishOutcome::NothingPublished => {
            tracing::info!("publish script released nothing");
            outputs.set("published", "false");
            outputs.set("publishedPackages", "[]");
        }
    }
    outputs.write()
}
