use changeset_core::PackageDescriptor;

use crate::Result;
use crate::changed_packages::build_changed_packages;
use crate::classifier::{Excludes, PackageDirs};
use crate::planner::{ReleasePlan, assemble_release_plan};
use crate::traits::{ChangesetReader, GitProvider, ManifestStore, WorkspaceProvider};

pub struct StatusInput {
    /// Git revision to diff `HEAD` against; no changed-package detection
    /// without it.
    pub base: Option<String>,
    pub dirs: PackageDirs,
    pub excludes: Excludes,
}

#[derive(Debug, Clone)]
pub struct StatusOutput {
    pub plan: ReleasePlan,
    pub changed_packages: Option<Vec<PackageDescriptor>>,
}

pub struct StatusOperation<W, R, G, M> {
    workspace: W,
    changesets: R,
    git: G,
    manifests: M,
}

impl<W, R, G, M> StatusOperation<W, R, G, M>
where
    W: WorkspaceProvider,
    R: ChangesetReader,
    G: GitProvider,
    M: ManifestStore,
{
    pub fn new(workspace: W, changesets: R, git: G, manifests: M) -> Self {
        Self {
            workspace,
            changesets,
            git,
            manifests,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the workspace cannot be discovered, a changeset
    /// cannot be read, or the diff against `base` fails.
    pub fn execute(&self, input: &StatusInput) -> Result<StatusOutput> {
        let graph = self.workspace.discover()?;
        let config = self.workspace.load_config()?;
        let pre_state = self.workspace.load_pre_state()?;
        let changesets = self.changesets.read_all()?;

        let plan = assemble_release_plan(changesets, &graph, &config, pre_state)?;

        let changed_packages = match input.base.as_deref() {
            Some(base) => {
                let files = self.git.changed_files(base, "HEAD")?;
                let mut packages =
                    build_changed_packages(&files, &input.dirs, &input.excludes, &self.manifests);
                for package in &mut packages {
                    package.bump_type = plan.release(&package.name).map(|r| r.bump_type);
                }
                Some(packages)
            }
            None => None,
        };

        Ok(StatusOutput {
            plan,
            changed_packages,
        })
    }
}
