use std::collections::BTreeMap;

use changeset_core::{BumpType, Changeset};
use changeset_project::{ChangesetConfig, PreState, WorkspaceGraph};
use changeset_version::{VersionError, bump_version, prerelease_version};
use semver::{Version, VersionReq};

const WORKSPACE_PROTOCOL: &str = "workspace:";

/// One package of a [`ReleasePlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRelease {
    pub name: String,
    pub bump_type: BumpType,
    /// Workspace packages depending on this one, sorted by name.
    pub dependents: Vec<String>,
    pub current_version: Option<Version>,
    pub new_version: Option<Version>,
}

/// Result of assembling pending changesets against the workspace graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleasePlan {
    /// Input changesets sorted by id, including those releasing nothing.
    pub changesets: Vec<Changeset>,
    /// Publishable releases sorted by package name.
    pub releases: Vec<PlannedRelease>,
    /// Packages named by changesets but absent from the workspace, sorted.
    pub unknown_packages: Vec<String>,
    pub pre_state: Option<PreState>,
}

impl ReleasePlan {
    #[must_use]
    pub fn has_changesets(&self) -> bool {
        !self.changesets.is_empty()
    }

    #[must_use]
    pub fn release(&self, name: &str) -> Option<&PlannedRelease> {
        self.releases.iter().find(|r| r.name == name)
    }
}

fn range_satisfied(range: &str, version: &Version) -> bool {
    if range.starts_with(WORKSPACE_PROTOCOL) {
        return true;
    }
    // npm ranges semver cannot express (`1.x || 2.x`) never force a bump.
    VersionReq::parse(range).map_or(true, |req| req.matches(version))
}

fn next_version(
    current: &Version,
    bump_type: BumpType,
    pre_state: Option<&PreState>,
) -> Result<Version, VersionError> {
    match pre_state.filter(|state| state.is_active()) {
        Some(state) => prerelease_version(current, bump_type, &state.tag),
        None => Ok(bump_version(current, bump_type)),
    }
}

/// Computes the release plan for `changesets`.
///
/// Each package gets the highest level any changeset names for it. Workspace
/// packages whose dependency range no longer admits a released version get at
/// least a patch release, repeated until nothing changes. Packages ignored by
/// the config, packages unknown to the workspace and `none` levels are left
/// out of `releases`. The result does not depend on input order.
///
/// # Errors
///
/// Returns `VersionError` if the pre-release tag is not a valid identifier.
pub fn assemble_release_plan(
    mut changesets: Vec<Changeset>,
    graph: &WorkspaceGraph,
    config: &ChangesetConfig,
    pre_state: Option<PreState>,
) -> Result<ReleasePlan, VersionError> {
    changesets.sort_by(|a, b| a.id.cmp(&b.id));

    let mut levels: BTreeMap<String, BumpType> = BTreeMap::new();
    let mut unknown_packages = Vec::new();

    for release in changesets.iter().flat_map(|c| &c.releases) {
        if graph.package(&release.name).is_none() {
            if !unknown_packages.contains(&release.name) {
                unknown_packages.push(release.name.clone());
            }
            continue;
        }
        if config.is_ignored(&release.name) {
            continue;
        }
        let level = levels.entry(release.name.clone()).or_default();
        *level = (*level).max(release.bump_type);
    }
    unknown_packages.sort();
    levels.retain(|_, level| level.is_publishable());

    loop {
        let mut raised = Vec::new();
        for (name, level) in &levels {
            let Some(version) = graph.package(name).and_then(|p| p.version.as_ref()) else {
                continue;
            };
            let new_version = next_version(version, *level, pre_state.as_ref())?;

            for (dependent, range) in graph.dependents_of(name) {
                if config.is_ignored(&dependent.name) || range_satisfied(range, &new_version) {
                    continue;
                }
                if levels.get(&dependent.name).copied().unwrap_or_default() < BumpType::Patch {
                    raised.push(dependent.name.clone());
                }
            }
        }

        if raised.is_empty() {
            break;
        }
        for name in raised {
            tracing::debug!(package = %name, "dependency range left behind, adding patch release");
            levels.insert(name, BumpType::Patch);
        }
    }

    let mut releases = Vec::with_capacity(levels.len());
    for (name, bump_type) in levels {
        let current_version = graph.package(&name).and_then(|p| p.version.clone());
        let new_version = current_version
            .as_ref()
            .map(|v| next_version(v, bump_type, pre_state.as_ref()))
            .transpose()?;

        let mut dependents: Vec<String> = graph
            .dependents_of(&name)
            .into_iter()
            .map(|(p, _)| p.name.clone())
            .collect();
        dependents.sort();

        releases.push(PlannedRelease {
            name,
            bump_type,
            dependents,
            current_version,
            new_version,
        });
    }

    tracing::debug!(
        changesets = changesets.len(),
        releases = releases.len(),
        unknown = unknown_packages.len(),
        "assembled release plan"
    );

    Ok(ReleasePlan {
        changesets,
        releases,
        unknown_packages,
        pre_state,
    })
}
