use crate::{GitError, PushOptions, Result};

use super::Repository;

const ORIGIN: &str = "origin";
const TOKEN_USER: &str = "x-access-token";

fn remote_callbacks(token: Option<&str>) -> git2::RemoteCallbacks<'_> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(move |url, username, allowed| match token {
        Some(token) if allowed.contains(git2::CredentialType::USER_PASS_PLAINTEXT) => {
            git2::Cred::userpass_plaintext(TOKEN_USER, token)
        }
        _ => {
            let config = git2::Config::open_default()?;
            git2::Cred::credential_helper(&config, url, username)
        }
    });
    callbacks
}

impl Repository {
    /// Sets `user.name` and `user.email` in the repository config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be written.
    pub fn configure_user(&self, name: &str, email: &str) -> Result<()> {
        let mut config = self.inner.config()?;
        config.set_str("user.name", name)?;
        config.set_str("user.email", email)?;
        Ok(())
    }

    /// Pushes HEAD to `refs/heads/<branch>` on `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RemoteNotFound`] without an `origin` remote, or
    /// [`GitError::PushRejected`] when the remote refuses the update.
    pub fn push(&self, branch: &str, options: &PushOptions) -> Result<()> {
        let prefix = if options.force { "+" } else { "" };
        let refspec = format!("{prefix}HEAD:refs/heads/{branch}");
        self.push_refspecs(&[refspec], options.token.as_deref())?;
        tracing::info!(branch, force = options.force, "pushed branch");
        Ok(())
    }

    /// Pushes every local tag to `origin`. Returns the number of tags pushed.
    ///
    /// # Errors
    ///
    /// Returns an error if listing tags or pushing fails.
    pub fn push_tags(&self, token: Option<&str>) -> Result<usize> {
        let tags = self.inner.tag_names(None)?;
        let refspecs: Vec<String> = tags
            .iter()
            .flatten()
            .map(|tag| format!("refs/tags/{tag}:refs/tags/{tag}"))
            .collect();

        if refspecs.is_empty() {
            return Ok(0);
        }

        self.push_refspecs(&refspecs, token)?;
        tracing::info!(count = refspecs.len(), "pushed tags");
        Ok(refspecs.len())
    }

    fn push_refspecs(&self, refspecs: &[String], token: Option<&str>) -> Result<()> {
        let mut remote = self
            .inner
            .find_remote(ORIGIN)
            .map_err(|_| GitError::RemoteNotFound {
                name: ORIGIN.to_string(),
            })?;

        let mut rejection: Option<(String, String)> = None;
        {
            let mut callbacks = remote_callbacks(token);
            callbacks.push_update_reference(|refname, status| {
                if let Some(message) = status {
                    rejection = Some((refname.to_string(), message.to_string()));
                }
                Ok(())
            });

            let mut push_options = git2::PushOptions::new();
            push_options.remote_callbacks(callbacks);
            remote.push(refspecs, Some(&mut push_options))?;
        }

        match rejection {
            Some((refname, message)) => Err(GitError::PushRejected { refname, message }),
            None => Ok(()),
        }
    }
}
