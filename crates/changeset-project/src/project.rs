use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use semver::Version;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::PACKAGE_JSON;
use crate::error::ProjectError;
use crate::manifest::{PackageJson, read_package_json};

const PNPM_WORKSPACE_FILE: &str = "pnpm-workspace.yaml";
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// The tool that declares the workspace layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceTool {
    /// A single package at the repository root.
    Root,
    Pnpm,
    Yarn,
    Bolt,
}

impl WorkspaceTool {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bolt => "bolt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePackage {
    pub name: String,
    pub version: Option<Version>,
    /// Directory relative to the workspace root; `.` for the root package.
    pub dir: PathBuf,
    /// Manifest path relative to the workspace root.
    pub manifest_path: PathBuf,
    pub private: bool,
    pub dependencies: IndexMap<String, String>,
}

/// All packages of a workspace together with the root package.
#[derive(Debug, Clone)]
pub struct WorkspaceGraph {
    pub root_dir: PathBuf,
    pub root: WorkspacePackage,
    pub tool: WorkspaceTool,
    pub packages: Vec<WorkspacePackage>,
}

impl WorkspaceGraph {
    #[must_use]
    pub fn package(&self, name: &str) -> Option<&WorkspacePackage> {
        self.packages.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn is_single_package(&self) -> bool {
        self.tool == WorkspaceTool::Root
    }

    /// Workspace packages that declare a dependency on `name`, with the
    /// declared range.
    #[must_use]
    pub fn dependents_of(&self, name: &str) -> Vec<(&WorkspacePackage, &str)> {
        self.packages
            .iter()
            .filter(|p| p.name != name)
            .filter_map(|p| p.dependencies.get(name).map(|range| (p, range.as_str())))
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
struct PnpmWorkspace {
    #[serde(default)]
    packages: Vec<String>,
}

fn fallback_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn to_workspace_package(
    root_dir: &Path,
    relative_dir: PathBuf,
    manifest: PackageJson,
) -> Result<WorkspacePackage, ProjectError> {
    let manifest_path = if relative_dir == Path::new(".") {
        PathBuf::from(PACKAGE_JSON)
    } else {
        relative_dir.join(PACKAGE_JSON)
    };

    let version = manifest
        .version
        .as_deref()
        .map(|raw| {
            Version::parse(raw).map_err(|source| ProjectError::InvalidVersion {
                path: root_dir.join(&manifest_path),
                version: raw.to_string(),
                source,
            })
        })
        .transpose()?;

    let dependencies = manifest.all_dependencies();
    let name = manifest.name.unwrap_or_else(|| {
        if relative_dir == Path::new(".") {
            fallback_name(root_dir)
        } else {
            fallback_name(&relative_dir)
        }
    });

    Ok(WorkspacePackage {
        name,
        version,
        dir: relative_dir,
        manifest_path,
        private: manifest.private,
        dependencies,
    })
}

fn workspace_globs(
    root_dir: &Path,
    root_manifest: &PackageJson,
) -> Result<Option<(WorkspaceTool, Vec<String>)>, ProjectError> {
    let pnpm_path = root_dir.join(PNPM_WORKSPACE_FILE);
    if pnpm_path.is_file() {
        let content =
            std::fs::read_to_string(&pnpm_path).map_err(|source| ProjectError::FileRead {
                path: pnpm_path.clone(),
                source,
            })?;
        let parsed: Option<PnpmWorkspace> =
            serde_yml::from_str(&content).map_err(|source| ProjectError::YamlParse {
                path: pnpm_path,
                source,
            })?;
        return Ok(Some((
            WorkspaceTool::Pnpm,
            parsed.unwrap_or_default().packages,
        )));
    }

    if let Some(workspaces) = &root_manifest.workspaces {
        return Ok(Some((WorkspaceTool::Yarn, workspaces.globs().to_vec())));
    }

    if let Some(bolt) = &root_manifest.bolt {
        return Ok(Some((WorkspaceTool::Bolt, bolt.workspaces.clone())));
    }

    Ok(None)
}

fn normalize_pattern(pattern: &str) -> &str {
    let pattern = pattern.trim();
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    pattern.trim_end_matches('/')
}

fn build_glob(pattern: &str) -> Result<Glob, ProjectError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| ProjectError::GlobPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn compile_patterns(patterns: &[String]) -> Result<(GlobSet, GlobSet), ProjectError> {
    let mut include = GlobSetBuilder::new();
    let mut exclude = GlobSetBuilder::new();

    for raw in patterns {
        if let Some(negated) = raw.trim().strip_prefix('!') {
            exclude.add(build_glob(normalize_pattern(negated))?);
        } else {
            let pattern = normalize_pattern(raw);
            if !pattern.is_empty() {
                include.add(build_glob(pattern)?);
            }
        }
    }

    let build = |builder: GlobSetBuilder| {
        builder.build().map_err(|source| ProjectError::GlobPattern {
            pattern: patterns.join(", "),
            source,
        })
    };
    Ok((build(include)?, build(exclude)?))
}

fn is_skipped(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn package_dirs(root_dir: &Path) -> Result<Vec<PathBuf>, ProjectError> {
    let mut dirs = Vec::new();
    let walker = WalkDir::new(root_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e));

    for entry in walker {
        let entry = entry.map_err(|source| ProjectError::Walk {
            root: root_dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && entry.file_name() == PACKAGE_JSON {
            let Some(parent) = entry.path().parent() else {
                continue;
            };
            if let Ok(relative) = parent.strip_prefix(root_dir) {
                if !relative.as_os_str().is_empty() {
                    dirs.push(relative.to_path_buf());
                }
            }
        }
    }

    Ok(dirs)
}

/// Discovers the workspace rooted at `root_dir`.
///
/// Layout sources are checked in order: `pnpm-workspace.yaml`, the
/// `workspaces` field of the root manifest, then `bolt.workspaces`. Without
/// any of them the root package is the only package.
///
/// # Errors
///
/// Returns `ProjectError` if the root manifest is missing or any manifest,
/// version or glob pattern is invalid.
pub fn discover_workspace(root_dir: &Path) -> Result<WorkspaceGraph, ProjectError> {
    let root_manifest_path = root_dir.join(PACKAGE_JSON);
    if !root_manifest_path.is_file() {
        return Err(ProjectError::NotFound {
            root: root_dir.to_path_buf(),
        });
    }

    let root_manifest = read_package_json(&root_manifest_path)?;
    let layout = workspace_globs(root_dir, &root_manifest)?;
    let root = to_workspace_package(root_dir, PathBuf::from("."), root_manifest)?;

    let Some((tool, patterns)) = layout else {
        tracing::debug!(package = %root.name, "single package repository");
        return Ok(WorkspaceGraph {
            root_dir: root_dir.to_path_buf(),
            packages: vec![root.clone()],
            root,
            tool: WorkspaceTool::Root,
        });
    };

    let (include, exclude) = compile_patterns(&patterns)?;
    let mut packages = Vec::new();
    for dir in package_dirs(root_dir)? {
        if !include.is_match(&dir) || exclude.is_match(&dir) {
            continue;
        }
        let manifest = read_package_json(&root_dir.join(&dir).join(PACKAGE_JSON))?;
        packages.push(to_workspace_package(root_dir, dir, manifest)?);
    }

    tracing::debug!(
        tool = tool.as_str(),
        packages = packages.len(),
        "discovered workspace"
    );

    Ok(WorkspaceGraph {
        root_dir: root_dir.to_path_buf(),
        root,
        tool,
        packages,
    })
}
