#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
}

/// How to push to `origin`.
#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    pub force: bool,
    /// Token sent as the password of the `x-access-token` user over HTTPS.
    pub token: Option<String>,
}

impl PushOptions {
    #[must_use]
    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
