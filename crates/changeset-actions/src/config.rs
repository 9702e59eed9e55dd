use changeset_core::{ChangesetError, Locale};
use changeset_operations::render::catalog;
use changeset_operations::{Excludes, OperationError, PackageDirs};
use clap::Args;

use crate::error::{CliError, Result};

const TOKEN_FALLBACK_VAR: &str = "GITHUB_TOKEN";

pub(crate) fn parse_locale(value: &str) -> std::result::Result<Locale, ChangesetError> {
    value.parse()
}

/// Inputs shared by every workflow.
#[derive(Args, Debug, Clone)]
pub(crate) struct WorkflowArgs {
    /// Comma separated package directories; `.` treats the repository root as
    /// the only package
    #[arg(long, env = "INPUT_PACKAGES_DIR", default_value = "packages")]
    pub packages_dir: String,

    /// Comma separated path prefixes ignored by detection
    #[arg(long, env = "INPUT_EXCLUDES", default_value = "")]
    pub excludes: String,

    /// Language of comments and messages (en, ko)
    #[arg(long, env = "INPUT_LANGUAGE", default_value = "en", value_parser = parse_locale)]
    pub language: Locale,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct GitHubArgs {
    /// Token for the GitHub API and pushes; falls back to `GITHUB_TOKEN`
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,
}

impl GitHubArgs {
    pub(crate) fn token(&self) -> Result<String> {
        resolve_token(
            self.github_token.as_deref(),
            std::env::var(TOKEN_FALLBACK_VAR).ok(),
        )
    }
}

fn resolve_token(input: Option<&str>, fallback: Option<String>) -> Result<String> {
    input
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .or_else(|| fallback.filter(|token| !token.trim().is_empty()))
        .ok_or(CliError::MissingToken)
}

/// Validated workflow inputs.
#[derive(Debug, Clone)]
pub(crate) struct WorkflowConfig {
    pub dirs: PackageDirs,
    pub excludes: Excludes,
    pub locale: Locale,
}

impl WorkflowConfig {
    pub(crate) fn from_args(args: &WorkflowArgs) -> Result<Self> {
        let locale = args.language;
        let dirs = PackageDirs::parse(&args.packages_dir).map_err(|source| {
            let message = match &source {
                OperationError::InvalidPackagesDir { entry, .. } => {
                    catalog(locale).invalid_packages_dir(entry)
                }
                other => other.to_string(),
            };
            CliError::Config { message, source }
        })?;
        tracing::debug!(packages_dir = %dirs.display(), %locale, "workflow configuration");

        Ok(Self {
            dirs,
            excludes: Excludes::parse(&args.excludes),
            locale,
        })
    }
}

/// Empty action inputs arrive as empty strings; treat them as unset.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Comma separated list input.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
