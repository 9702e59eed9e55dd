mod client;
mod error;
mod types;

pub use client::{DEFAULT_API_URL, GitHubClient};
pub use error::GitHubError;
pub use types::{IssueComment, NewRelease, PullRequest, Release};

pub type Result<T> = std::result::Result<T, GitHubError>;
