use std::path::PathBuf;

use changeset_changelog::RepositoryInfo;
use changeset_core::{Locale, RELEASE_BRANCH_PREFIX};
use changeset_github::NewRelease;
use changeset_project::WorkspaceGraph;
use indexmap::IndexMap;

use crate::Result;
use crate::error::OperationError;
use crate::publish_output::{has_new_tag, parse_new_tags};
use crate::render::{
    MAX_BODY_CHARS, PackageNotes, ReleasedPackage, render_publish_message,
    render_pull_request_body, sort_package_notes,
};
use crate::traits::{
    ChangelogReader, ChangesetReader, CommandRunner, ForgeProvider, GitProvider, WorkspaceProvider,
};

pub struct PublishInput {
    /// Branch the workflow runs on, e.g. `main`.
    pub branch: String,
    /// Commit that triggered the workflow.
    pub sha: String,
    pub repository: RepositoryInfo,
    pub version_script: String,
    pub publish_script: String,
    pub formatting_script: Option<String>,
    pub pr_title: String,
    pub commit_message: String,
    pub git_username: String,
    pub git_email: String,
    pub create_release: bool,
    pub locale: Locale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Pending changesets were versioned onto the release branch.
    Versioned {
        pull_request_number: u64,
        created: bool,
    },
    Published {
        packages: Vec<ReleasedPackage>,
        message: String,
    },
    NothingPublished,
}

/// Either opens the release pull request for pending changesets or, once
/// it has been merged, publishes the versioned packages.
pub struct PublishOperation<F, G, W, R, C, L> {
    forge: F,
    git: G,
    workspace: W,
    changesets: R,
    runner: C,
    changelogs: L,
}

impl<F, G, W, R, C, L> PublishOperation<F, G, W, R, C, L>
where
    F: ForgeProvider,
    G: GitProvider,
    W: WorkspaceProvider,
    R: ChangesetReader,
    C: CommandRunner,
    L: ChangelogReader,
{
    pub fn new(forge: F, git: G, workspace: W, changesets: R, runner: C, changelogs: L) -> Self {
        Self {
            forge,
            git,
            workspace,
            changesets,
            runner,
            changelogs,
        }
    }

    /// # Errors
    ///
    /// Returns an error if a script fails, git cannot switch, commit or push,
    /// the workspace cannot be read, or a forge request fails.
    pub fn execute(&self, input: &PublishInput) -> Result<PublishOutcome> {
        let pending = self.changesets.list_changesets()?;
        if pending.is_empty() {
            self.publish(input)
        } else {
            tracing::info!(changesets = pending.len(), "pending changesets, versioning");
            self.version(input)
        }
    }

    fn version(&self, input: &PublishInput) -> Result<PublishOutcome> {
        let release_branch = format!("{RELEASE_BRANCH_PREFIX}{}", input.branch);

        self.git.configure_user(&input.git_username, &input.git_email)?;
        self.git.switch_branch(&release_branch)?;
        self.git.reset_hard(&input.sha)?;

        let before = versions_by_dir(&self.workspace.discover()?);
        self.runner.run(&input.version_script)?;
        let after = self.workspace.discover()?;

        let mut notes = Vec::new();
        for package in &after.packages {
            let Some(version) = &package.version else {
                continue;
            };
            let version = version.to_string();
            if before.get(&package.dir) == Some(&Some(version.clone())) {
                continue;
            }

            let Some(changelog) = self.changelogs.read_changelog(&package.dir)? else {
                tracing::warn!(package = %package.name, "no changelog, leaving package out of the pull request body");
                continue;
            };
            let Some(entry) = changelog.entry(&version) else {
                tracing::warn!(package = %package.name, %version, "no changelog entry");
                continue;
            };
            notes.push(PackageNotes {
                name: package.name.clone(),
                version,
                private: package.private,
                highest_level: entry.highest_level,
                content: entry.content,
            });
        }
        tracing::info!(packages = notes.len(), "packages versioned");

        if let Some(script) = input.formatting_script.as_deref() {
            if let Err(e) = self.runner.run_shell(script) {
                tracing::warn!(error = %e, "formatting script failed");
            }
        }

        if !self.git.is_working_tree_clean()? {
            self.git.commit_all(&input.commit_message)?;
        }
        self.git.push(&release_branch, true)?;

        sort_package_notes(&mut notes);
        let body = render_pull_request_body(&notes, input.locale, MAX_BODY_CHARS);

        let (pull_request, created) =
            match self.forge.find_open_pull_request(&release_branch, &input.branch)? {
                Some(existing) => {
                    tracing::info!(number = existing.number, "updating release pull request");
                    let updated =
                        self.forge
                            .update_pull_request(existing.number, &input.pr_title, &body)?;
                    (updated, false)
                }
                None => {
                    tracing::info!(head = %release_branch, base = %input.branch, "creating release pull request");
                    let created = self.forge.create_pull_request(
                        &input.pr_title,
                        &release_branch,
                        &input.branch,
                        &body,
                    )?;
                    (created, true)
                }
            };

        Ok(PublishOutcome::Versioned {
            pull_request_number: pull_request.number,
            created,
        })
    }

    fn publish(&self, input: &PublishInput) -> Result<PublishOutcome> {
        let stdout = self.runner.run(&input.publish_script)?;
        let pushed = self.git.push_tags()?;
        tracing::debug!(tags = pushed, "tags pushed");

        let graph = self.workspace.discover()?;
        let released = released_packages(&stdout, &graph)?;
        if released.is_empty() {
            tracing::info!("publish command released nothing");
            return Ok(PublishOutcome::NothingPublished);
        }

        if input.create_release {
            for package in &released {
                self.create_release(package, &graph)?;
            }
        }

        let message = render_publish_message(&released, &input.repository);
        Ok(PublishOutcome::Published {
            packages: released,
            message,
        })
    }

    fn create_release(&self, package: &ReleasedPackage, graph: &WorkspaceGraph) -> Result<()> {
        let dir = if graph.is_single_package() {
            &graph.root.dir
        } else {
            match graph.package(&package.name) {
                Some(p) => &p.dir,
                None => return Ok(()),
            }
        };

        let Some(changelog) = self.changelogs.read_changelog(dir)? else {
            tracing::warn!(package = %package.name, "no changelog, skipping release");
            return Ok(());
        };
        let Some(entry) = changelog.entry(&package.version) else {
            tracing::warn!(package = %package.name, version = %package.version, "no changelog entry, skipping release");
            return Ok(());
        };

        let release = self.forge.create_release(&NewRelease {
            tag_name: package.tag.clone(),
            name: package.tag.clone(),
            body: entry.content,
            prerelease: package.version.contains('-'),
        })?;
        tracing::info!(tag = %package.tag, url = %release.html_url, "release created");
        Ok(())
    }
}

fn versions_by_dir(graph: &WorkspaceGraph) -> IndexMap<PathBuf, Option<String>> {
    graph
        .packages
        .iter()
        .map(|p| (p.dir.clone(), p.version.as_ref().map(ToString::to_string)))
        .collect()
}

/// Packages announced by the publish command, deduplicated by name.
fn released_packages(stdout: &str, graph: &WorkspaceGraph) -> Result<Vec<ReleasedPackage>> {
    if graph.is_single_package() {
        if !has_new_tag(stdout) {
            return Ok(Vec::new());
        }
        let version = graph
            .root
            .version
            .as_ref()
            .ok_or_else(|| OperationError::MissingVersion {
                name: graph.root.name.clone(),
            })?
            .to_string();
        return Ok(vec![ReleasedPackage {
            name: graph.root.name.clone(),
            tag: format!("v{version}"),
            version,
        }]);
    }

    let mut released: IndexMap<String, ReleasedPackage> = IndexMap::new();
    for tag in parse_new_tags(stdout) {
        if graph.package(&tag.name).is_none() {
            return Err(OperationError::UnknownPublishedPackage { name: tag.name });
        }
        released
            .entry(tag.name.clone())
            .or_insert_with(|| ReleasedPackage {
                tag: format!("{}@{}", tag.name, tag.version),
                name: tag.name,
                version: tag.version,
            });
    }
    Ok(released.into_values().collect())
}
