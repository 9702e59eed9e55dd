use url::Url;

use crate::error::ChangelogError;

/// A GitHub (or GitHub Enterprise) repository addressed by its web URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub owner: String,
    pub repo: String,
    pub base_url: Url,
}

impl RepositoryInfo {
    /// # Errors
    ///
    /// Returns `ChangelogError::UrlParse` if the URL is invalid, or
    /// `ChangelogError::InvalidRepositoryPath` if it lacks owner and repo segments.
    pub fn from_url(url_str: &str) -> Result<Self, ChangelogError> {
        let url = Url::parse(url_str).map_err(|source| ChangelogError::UrlParse {
            url: url_str.to_string(),
            source,
        })?;

        let host = url.host_str().ok_or_else(|| ChangelogError::UrlParse {
            url: url_str.to_string(),
            source: url::ParseError::EmptyHost,
        })?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let (owner, repo) = extract_owner_repo(&url)?;

        let base_url = Url::parse(&format!("{}://{}", url.scheme(), authority)).map_err(
            |source| ChangelogError::UrlParse {
                url: url_str.to_string(),
                source,
            },
        )?;

        Ok(Self {
            owner,
            repo,
            base_url,
        })
    }

    /// Builds the repository from a server URL and an `owner/repo` slug, the
    /// shape CI runners expose.
    ///
    /// # Errors
    ///
    /// Same as [`RepositoryInfo::from_url`].
    pub fn from_slug(server_url: &str, slug: &str) -> Result<Self, ChangelogError> {
        Self::from_url(&format!("{}/{}", server_url.trim_end_matches('/'), slug))
    }

    #[must_use]
    pub fn web_url(&self) -> String {
        format!("{}{}/{}", self.base_url, self.owner, self.repo)
    }

    #[must_use]
    pub fn release_tag_url(&self, tag: &str) -> String {
        format!("{}/releases/tag/{tag}", self.web_url())
    }

    /// URL of the "create new file" page on `branch`, without query string.
    #[must_use]
    pub fn new_file_url(&self, branch: &str) -> String {
        format!("{}/new/{branch}", self.web_url())
    }
}

fn extract_owner_repo(url: &Url) -> Result<(String, String), ChangelogError> {
    let path = url.path().trim_start_matches('/').trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.len() < 2 {
        return Err(ChangelogError::InvalidRepositoryPath {
            url: url.to_string(),
        });
    }

    Ok((segments[0].to_string(), segments[1].to_string()))
}
