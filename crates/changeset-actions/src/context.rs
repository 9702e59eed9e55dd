use std::path::PathBuf;

use changeset_changelog::RepositoryInfo;
use changeset_github::DEFAULT_API_URL;
use changeset_operations::render::PullRequestInfo;
use serde::Deserialize;

use crate::error::{CliError, Result};

const DEFAULT_SERVER_URL: &str = "https://github.com";
const BRANCH_REF_PREFIX: &str = "refs/heads/";

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    labels: Vec<Label>,
    head: BranchRef,
    base: BranchRef,
}

#[derive(Debug, Deserialize)]
struct Label {
    name: String,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    #[serde(rename = "ref")]
    ref_name: String,
    #[serde(default)]
    sha: Option<String>,
    #[serde(default)]
    repo: Option<RepositoryPayload>,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    html_url: String,
}

/// The pull request that triggered the run.
#[derive(Debug, Clone)]
pub struct PullRequestContext {
    pub info: PullRequestInfo,
    pub labels: Vec<String>,
    pub head_sha: Option<String>,
}

/// What the runner tells about the current workflow run.
#[derive(Debug, Clone)]
pub struct GitHubContext {
    pub repository: RepositoryInfo,
    pub api_url: String,
    pub git_ref: Option<String>,
    pub sha: Option<String>,
    pub pull_request: Option<PullRequestContext>,
}

impl GitHubContext {
    /// # Errors
    ///
    /// Returns an error if `GITHUB_REPOSITORY` is missing or the event
    /// payload cannot be read.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| var(key).filter(|value| !value.is_empty());

        let slug = var("GITHUB_REPOSITORY").ok_or(CliError::MissingEnv("GITHUB_REPOSITORY"))?;
        let server_url = var("GITHUB_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let repository = RepositoryInfo::from_slug(&server_url, &slug)?;

        let pull_request = match var("GITHUB_EVENT_PATH") {
            Some(path) => read_pull_request(PathBuf::from(path), &repository)?,
            None => None,
        };

        Ok(Self {
            repository,
            api_url: var("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            git_ref: var("GITHUB_REF"),
            sha: var("GITHUB_SHA"),
            pull_request,
        })
    }

    /// Branch name of `GITHUB_REF`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ref is missing or not a branch.
    pub fn branch(&self) -> Result<&str> {
        let git_ref = self
            .git_ref
            .as_deref()
            .ok_or(CliError::MissingEnv("GITHUB_REF"))?;
        git_ref
            .strip_prefix(BRANCH_REF_PREFIX)
            .ok_or_else(|| CliError::NotABranch(git_ref.to_string()))
    }

    /// # Errors
    ///
    /// Returns an error if `GITHUB_SHA` is missing.
    pub fn sha(&self) -> Result<&str> {
        self.sha.as_deref().ok_or(CliError::MissingEnv("GITHUB_SHA"))
    }
}

fn read_pull_request(
    path: PathBuf,
    repository: &RepositoryInfo,
) -> Result<Option<PullRequestContext>> {
    let content = std::fs::read_to_string(&path).map_err(|source| CliError::EventRead {
        path: path.clone(),
        source,
    })?;
    let payload: EventPayload =
        serde_json::from_str(&content).map_err(|source| CliError::EventParse { path, source })?;

    let Some(pr) = payload.pull_request else {
        return Ok(None);
    };

    let head_repository = match pr.head.repo.as_ref() {
        Some(repo) => RepositoryInfo::from_url(&repo.html_url)?,
        None => repository.clone(),
    };
    tracing::debug!(number = pr.number, head = %pr.head.ref_name, base = %pr.base.ref_name, "pull request event");

    Ok(Some(PullRequestContext {
        info: PullRequestInfo {
            number: pr.number,
            title: pr.title,
            html_url: pr.html_url,
            head_ref: pr.head.ref_name,
            base_ref: pr.base.ref_name,
            head_repository,
        },
        labels: pr.labels.into_iter().map(|label| label.name).collect(),
        head_sha: pr.head.sha,
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use super::*;

    const EVENT: &str = r#"{
        "action": "synchronize",
        "pull_request": {
            "number": 7,
            "title": "Add tooltip",
            "html_url": "https://github.com/acme/web/pull/7",
            "labels": [{"name": "no-changeset"}, {"name": "ui"}],
            "head": {
                "ref": "feature/tooltip",
                "sha": "abc1234def5678",
                "repo": {"html_url": "https://github.com/fork-owner/web"}
            },
            "base": {"ref": "main", "sha": "0000000"}
        }
    }"#;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_pull_request_event() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let event_path = dir.path().join("event.json");
        fs::write(&event_path, EVENT).expect("write event");
        let event_path = event_path.to_string_lossy().into_owned();

        let ctx = GitHubContext::from_vars(vars(&[
            ("GITHUB_REPOSITORY", "acme/web"),
            ("GITHUB_EVENT_PATH", &event_path),
        ]))
        .expect("context");

        let pr = ctx.pull_request.expect("pull request");
        assert_eq!(pr.info.number, 7);
        assert_eq!(pr.info.head_ref, "feature/tooltip");
        assert_eq!(pr.info.base_ref, "main");
        assert_eq!(pr.info.head_repository.owner, "fork-owner");
        assert_eq!(pr.labels, ["no-changeset", "ui"]);
        assert_eq!(pr.head_sha.as_deref(), Some("abc1234def5678"));
        assert_eq!(ctx.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn push_event_has_no_pull_request() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let event_path = dir.path().join("event.json");
        fs::write(&event_path, r#"{"ref": "refs/heads/main"}"#).expect("write event");
        let event_path = event_path.to_string_lossy().into_owned();

        let ctx = GitHubContext::from_vars(vars(&[
            ("GITHUB_REPOSITORY", "acme/web"),
            ("GITHUB_EVENT_PATH", &event_path),
            ("GITHUB_REF", "refs/heads/main"),
        ]))
        .expect("context");

        assert!(ctx.pull_request.is_none());
        assert_eq!(ctx.branch().expect("branch"), "main");
    }

    #[test]
    fn tag_ref_is_not_a_branch() {
        let ctx = GitHubContext::from_vars(vars(&[
            ("GITHUB_REPOSITORY", "acme/web"),
            ("GITHUB_REF", "refs/tags/v1.0.0"),
        ]))
        .expect("context");

        assert!(matches!(ctx.branch(), Err(CliError::NotABranch(_))));
    }

    #[test]
    fn repository_is_required() {
        let err = GitHubContext::from_vars(vars(&[])).expect_err("should fail");

        assert!(matches!(err, CliError::MissingEnv("GITHUB_REPOSITORY")));
    }
}
