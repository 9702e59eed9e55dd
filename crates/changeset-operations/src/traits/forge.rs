use changeset_core::ChangedFile;
use changeset_github::{IssueComment, NewRelease, PullRequest, Release};

use crate::Result;

/// The code hosting API the workflows talk to.
pub trait ForgeProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    fn list_pull_request_files(&self, number: u64) -> Result<Vec<ChangedFile>>;

    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    fn list_comments(&self, number: u64) -> Result<Vec<IssueComment>>;

    /// # Errors
    ///
    /// Returns an error if the comment cannot be created.
    fn create_comment(&self, number: u64, body: &str) -> Result<IssueComment>;

    /// # Errors
    ///
    /// Returns an error if the comment cannot be updated.
    fn update_comment(&self, id: u64, body: &str) -> Result<IssueComment>;

    /// # Errors
    ///
    /// Returns an error if the comment cannot be deleted.
    fn delete_comment(&self, id: u64) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the search request fails.
    fn find_open_pull_request(&self, head: &str, base: &str) -> Result<Option<PullRequest>>;

    /// # Errors
    ///
    /// Returns an error if the pull request cannot be created.
    fn create_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequest>;

    /// # Errors
    ///
    /// Returns an error if the pull request cannot be updated.
    fn update_pull_request(&self, number: u64, title: &str, body: &str) -> Result<PullRequest>;

    /// # Errors
    ///
    /// Returns an error if the release cannot be created.
    fn create_release(&self, release: &NewRelease) -> Result<Release>;
}
