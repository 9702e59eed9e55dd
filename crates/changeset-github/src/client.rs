use changeset_core::ChangedFile;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::GitHubError;
use crate::types::{IssueComment, NewRelease, PullRequest, Release};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: usize = 100;
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("changeset-actions/", env!("CARGO_PKG_VERSION"));

/// Blocking client for the handful of REST endpoints the workflows use, scoped
/// to one repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    agent: ureq::Agent,
    api_url: String,
    owner: String,
    repo: String,
    token: String,
}

impl GitHubClient {
    #[must_use]
    pub fn new(
        api_url: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).build();
        Self {
            agent,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
        }
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}/{path}", self.api_url, self.owner, self.repo)
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        tracing::debug!(method, url, "GitHub request");
        let request = self
            .agent
            .request(method, url)
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", API_VERSION);
        if self.token.is_empty() {
            request
        } else {
            request.set("Authorization", &format!("Bearer {}", self.token))
        }
    }

    fn decode<T: DeserializeOwned>(url: &str, response: ureq::Response) -> Result<T, GitHubError> {
        response.into_json().map_err(|source| GitHubError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        method: &str,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, GitHubError> {
        let response = self
            .request(method, url)
            .send_json(body)
            .map_err(|e| GitHubError::from_ureq(url, e))?;
        Self::decode(url, response)
    }

    fn paginate<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, GitHubError> {
        let mut items = Vec::new();
        let per_page = PER_PAGE.to_string();

        for page in 1.. {
            let response = self
                .request("GET", url)
                .query("per_page", &per_page)
                .query("page", &page.to_string())
                .call()
                .map_err(|e| GitHubError::from_ureq(url, e))?;
            let batch: Vec<T> = Self::decode(url, response)?;
            let last = batch.len() < PER_PAGE;
            items.extend(batch);
            if last {
                break;
            }
        }

        Ok(items)
    }

    /// All files of a pull request, fetched 100 per page.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError` if any page request fails.
    pub fn list_pull_request_files(&self, number: u64) -> Result<Vec<ChangedFile>, GitHubError> {
        let files = self.paginate(&self.repo_url(&format!("pulls/{number}/files")))?;
        tracing::debug!(number, count = files.len(), "listed pull request files");
        Ok(files)
    }

    /// # Errors
    ///
    /// Returns `GitHubError` if any page request fails.
    pub fn list_issue_comments(&self, number: u64) -> Result<Vec<IssueComment>, GitHubError> {
        self.paginate(&self.repo_url(&format!("issues/{number}/comments")))
    }

    /// # Errors
    ///
    /// Returns `GitHubError` if the request fails.
    pub fn create_issue_comment(
        &self,
        number: u64,
        body: &str,
    ) -> Result<IssueComment, GitHubError> {
        let url = self.repo_url(&format!("issues/{number}/comments"));
        self.send_json("POST", &url, &json!({ "body": body }))
    }

    /// # Errors
    ///
    /// Returns `GitHubError` if the request fails.
    pub fn update_issue_comment(&self, id: u64, body: &str) -> Result<IssueComment, GitHubError> {
        let url = self.repo_url(&format!("issues/comments/{id}"));
        self.send_json("PATCH", &url, &json!({ "body": body }))
    }

    /// # Errors
    ///
    /// Returns `GitHubError` if the request fails.
    pub fn delete_issue_comment(&self, id: u64) -> Result<(), GitHubError> {
        let url = self.repo_url(&format!("issues/comments/{id}"));
        self.request("DELETE", &url)
            .call()
            .map_err(|e| GitHubError::from_ureq(&url, e))?;
        Ok(())
    }

    /// The open pull request from `head` into `base`, if any.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError` if the request fails.
    pub fn find_open_pull_request(
        &self,
        head: &str,
        base: &str,
    ) -> Result<Option<PullRequest>, GitHubError> {
        let url = self.repo_url("pulls");
        let response = self
            .request("GET", &url)
            .query("state", "open")
            .query("head", &format!("{}:{head}", self.owner))
            .query("base", base)
            .call()
            .map_err(|e| GitHubError::from_ureq(&url, e))?;
        let pulls: Vec<PullRequest> = Self::decode(&url, response)?;
        Ok(pulls.into_iter().next())
    }

    /// # Errors
    ///
    /// Returns `GitHubError` if the request fails.
    pub fn create_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequest, GitHubError> {
        let url = self.repo_url("pulls");
        self.send_json(
            "POST",
            &url,
            &json!({ "title": title, "head": head, "base": base, "body": body }),
        )
    }

    /// # Errors
    ///
    /// Returns `GitHubError` if the request fails.
    pub fn update_pull_request(
        &self,
        number: u64,
        title: &str,
        body: &str,
    ) -> Result<PullRequest, GitHubError> {
        let url = self.repo_url(&format!("pulls/{number}"));
        self.send_json("PATCH", &url, &json!({ "title": title, "body": body }))
    }

    /// # Errors
    ///
    /// Returns `GitHubError` if the request fails, including when the release
    /// already exists (422).
    pub fn create_release(&self, release: &NewRelease) -> Result<Release, GitHubError> {
        let url = self.repo_url("releases");
        let body = serde_json::to_value(release).map_err(|e| GitHubError::Decode {
            url: url.clone(),
            source: e.into(),
        })?;
        self.send_json("POST", &url, &body)
    }
}
