use changeset_core::ChangedFile;
use changeset_github::{GitHubClient, IssueComment, NewRelease, PullRequest, Release};

use crate::Result;
use crate::traits::ForgeProvider;

pub struct GitHubForge {
    client: GitHubClient,
}

impl GitHubForge {
    #[must_use]
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

impl ForgeProvider for GitHubForge {
    fn list_pull_request_files(&self, number: u64) -> Result<Vec<ChangedFile>> {
        Ok(self.client.list_pull_request_files(number)?)
    }

    fn list_comments(&self, number: u64) -> Result<Vec<IssueComment>> {
        Ok(self.client.list_issue_comments(number)?)
    }

    fn create_comment(&self, number: u64, body: &str) -> Result<IssueComment> {
        Ok(self.client.create_issue_comment(number, body)?)
    }

    fn update_comment(&self, id: u64, body: &str) -> Result<IssueComment> {
        Ok(self.client.update_issue_comment(id, body)?)
    }

    fn delete_comment(&self, id: u64) -> Result<()> {
        Ok(self.client.delete_issue_comment(id)?)
    }

    fn find_open_pull_request(&self, head: &str, base: &str) -> Result<Option<PullRequest>> {
        Ok(self.client.find_open_pull_request(head, base)?)
    }

    fn create_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequest> {
        Ok(self.client.create_pull_request(title, head, base, body)?)
    }

    fn update_pull_request(&self, number: u64, title: &str, body: &str) -> Result<PullRequest> {
        Ok(self.client.update_pull_request(number, title, body)?)
    }

    fn create_release(&self, release: &NewRelease) -> Result<Release> {
        Ok(self.client.create_release(release)?)
    }
}
