use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("request to '{url}' failed")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    #[error("GitHub API returned {status} for '{url}': {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("failed to decode response from '{url}'")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl GitHubError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_ureq(url: &str, error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(status, response) => Self::Status {
                status,
                url: url.to_string(),
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => Self::Transport {
                url: url.to_string(),
                source: Box::new(transport),
            },
        }
    }
}
