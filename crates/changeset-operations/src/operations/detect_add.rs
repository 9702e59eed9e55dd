use std::path::Path;

use changeset_core::{
    CHANGESET_DIR, ChangedFile, Changeset, Locale, PackageDescriptor, RELEASE_BRANCH_PREFIX,
};

use super::comment::{find_status_comment, upsert_comment};
use crate::Result;
use crate::changed_packages::build_changed_packages;
use crate::classifier::{Excludes, PackageDirs};
use crate::planner::{ReleasePlan, assemble_release_plan};
use crate::render::{
    DetectComment, PullRequestInfo, catalog, render_detect_comment, render_empty_comment,
};
use crate::traits::{
    ChangesetReader, ChangesetWriter, CommandRunner, ForgeProvider, GitProvider, ManifestStore,
    WorkspaceProvider,
};

const AUTO_FIX_COMMIT_MESSAGE: &str = "🔨 fix: resolve lint (auto-fix)";
const CHANGESET_MARKER: &str = ".changeset";

pub struct DetectAddInput {
    /// `None` when the triggering event carries no pull request.
    pub pull_request: Option<PullRequestInfo>,
    pub labels: Vec<String>,
    pub dirs: PackageDirs,
    pub excludes: Excludes,
    pub skip_label: Option<String>,
    pub skip_branches: Vec<String>,
    pub formatting_script: Option<String>,
    pub locale: Locale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectAddOutcome {
    NoPullRequest,
    SkippedByLabel,
    SkippedByBranch,
    NoChangedPackages,
    /// The status comment was written and the pull request carries a changeset.
    Commented {
        packages: Vec<PackageDescriptor>,
        comment_id: u64,
    },
    /// The status comment was written but no file of the pull request lives
    /// under `.changeset`.
    ChangesetMissing {
        packages: Vec<PackageDescriptor>,
        message: String,
    },
}

pub struct DetectAddOperation<F, G, M, W, R, C> {
    forge: F,
    git: G,
    manifests: M,
    workspace: W,
    changesets: R,
    runner: C,
}

const CHANGESET_README: &str = "README.md";

/// Any markdown under `.changeset/`, README included. Edits to these files
/// trigger the formatting script.
fn touches_changeset_markdown(path: &str) -> bool {
    path.strip_prefix(CHANGESET_DIR)
        .is_some_and(|rest| rest.starts_with('/') && rest.ends_with(".md"))
}

/// A changeset file: markdown directly in `.changeset/` other than the README.
fn is_changeset_file(path: &str) -> bool {
    path.strip_prefix(CHANGESET_DIR)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|name| {
            !name.contains('/')
                && name != CHANGESET_README
                && Path::new(name).extension().is_some_and(|ext| ext == "md")
        })
}

impl<F, G, M, W, R, C> DetectAddOperation<F, G, M, W, R, C>
where
    F: ForgeProvider,
    G: GitProvider,
    M: ManifestStore,
    W: WorkspaceProvider,
    R: ChangesetReader + ChangesetWriter,
    C: CommandRunner,
{
    pub fn new(forge: F, git: G, manifests: M, workspace: W, changesets: R, runner: C) -> Self {
        Self {
            forge,
            git,
            manifests,
            workspace,
            changesets,
            runner,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the forge cannot be queried, the comment cannot be
    /// written, or the workspace and the changesets of the pull request cannot
    /// be read.
    pub fn execute(&self, input: &DetectAddInput) -> Result<DetectAddOutcome> {
        let Some(pull_request) = &input.pull_request else {
            tracing::info!("event has no pull request, nothing to detect");
            return Ok(DetectAddOutcome::NoPullRequest);
        };
        let messages = catalog(input.locale);
        let existing = find_status_comment(&self.forge, pull_request.number)?;

        if let Some(label) = input
            .skip_label
            .as_deref()
            .filter(|label| input.labels.iter().any(|l| l == label))
        {
            tracing::info!("{}", messages.skipped_by_label(label));
            if let Some(comment) = &existing {
                if let Err(e) = self.forge.delete_comment(comment.id) {
                    tracing::warn!(comment_id = comment.id, error = %e, "failed to delete status comment");
                }
            }
            return Ok(DetectAddOutcome::SkippedByLabel);
        }

        if input.skip_branches.contains(&pull_request.base_ref)
            && pull_request.head_ref.starts_with(RELEASE_BRANCH_PREFIX)
        {
            tracing::info!(
                "{}",
                messages.skipped_by_branch(&pull_request.base_ref, &pull_request.head_ref)
            );
            return Ok(DetectAddOutcome::SkippedByBranch);
        }

        let files = self.forge.list_pull_request_files(pull_request.number)?;
        tracing::debug!(files = files.len(), "pull request files listed");

        if let Some(script) = input.formatting_script.as_deref() {
            if files.iter().any(|f| touches_changeset_markdown(&f.path)) {
                self.auto_fix(script, &pull_request.head_ref);
            }
        }

        let mut packages =
            build_changed_packages(&files, &input.dirs, &input.excludes, &self.manifests);
        if packages.is_empty() {
            tracing::info!("no changed packages");
            upsert_comment(
                &self.forge,
                pull_request.number,
                existing.as_ref(),
                &render_empty_comment(input.locale),
            )?;
            return Ok(DetectAddOutcome::NoChangedPackages);
        }

        let plan = self.plan_for(&files)?;
        for package in &mut packages {
            package.bump_type = plan.release(&package.name).map(|r| r.bump_type);
        }

        let changeset_id = self.changesets.generate_id();
        let body = render_detect_comment(
            &DetectComment {
                packages: &packages,
                plan: Some(&plan),
                pull_request,
                skip_label: input.skip_label.as_deref(),
                changeset_id: &changeset_id,
            },
            input.locale,
        );
        let comment = upsert_comment(&self.forge, pull_request.number, existing.as_ref(), &body)?;

        if files.iter().any(|f| f.path.contains(CHANGESET_MARKER)) {
            Ok(DetectAddOutcome::Commented {
                packages,
                comment_id: comment.id,
            })
        } else {
            Ok(DetectAddOutcome::ChangesetMissing {
                packages,
                message: messages.missing_changeset(input.skip_label.as_deref()),
            })
        }
    }

    /// Release plan of the changesets added or modified by the pull request.
    fn plan_for(&self, files: &[ChangedFile]) -> Result<ReleasePlan> {
        let changesets = files
            .iter()
            .filter(|f| !f.is_removed() && is_changeset_file(&f.path))
            .map(|f| self.changesets.read_changeset(Path::new(&f.path)))
            .collect::<Result<Vec<Changeset>>>()?;

        let graph = self.workspace.discover()?;
        let config = self.workspace.load_config()?;
        let pre_state = self.workspace.load_pre_state()?;
        Ok(assemble_release_plan(changesets, &graph, &config, pre_state)?)
    }

    fn auto_fix(&self, script: &str, head_ref: &str) {
        if let Err(e) = self.runner.run_shell(script) {
            tracing::warn!(error = %e, "formatting script failed");
            return;
        }
        match self.git.commit_all(AUTO_FIX_COMMIT_MESSAGE) {
            Ok(Some(commit)) => {
                tracing::info!(sha = %commit.sha, "committed formatting fixes");
                if let Err(e) = self.git.push(head_ref, true) {
                    tracing::warn!(branch = head_ref, error = %e, "failed to push formatting fixes");
                }
            }
            Ok(None) => tracing::debug!("formatting script changed nothing"),
            Err(e) => tracing::warn!(error = %e, "failed to commit formatting fixes"),
        }
    }
}
