use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use changeset_changelog::Changelog;
use changeset_core::{BumpType, ChangedFile, Changeset, FileStatus, PackageRelease};
use changeset_git::CommitInfo;
use changeset_github::{IssueComment, NewRelease, PullRequest, Release};
use changeset_manifest::PackageManifest;
use changeset_project::{
    ChangesetConfig, PreState, WorkspaceGraph, WorkspacePackage, WorkspaceTool,
};
use indexmap::IndexMap;
use semver::Version;

use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    ChangelogReader, ChangesetReader, ChangesetWriter, CommandRunner, ForgeProvider, GitProvider,
    ManifestStore, WorkspaceProvider,
};

/// # Panics
///
/// Panics if the version string is not valid semver.
#[must_use]
pub fn make_package(name: &str, version: &str, dir: &str) -> WorkspacePackage {
    WorkspacePackage {
        name: name.to_string(),
        version: Some(Version::parse(version).expect("valid version")),
        dir: PathBuf::from(dir),
        manifest_path: if dir == "." {
            PathBuf::from("package.json")
        } else {
            PathBuf::from(dir).join("package.json")
        },
        private: false,
        dependencies: IndexMap::new(),
    }
}

#[must_use]
pub fn make_workspace(packages: Vec<WorkspacePackage>) -> WorkspaceGraph {
    let mut root = make_package("monorepo", "0.0.0", ".");
    root.private = true;
    WorkspaceGraph {
        root_dir: PathBuf::from("/mock/project"),
        root,
        tool: WorkspaceTool::Pnpm,
        packages,
    }
}

#[must_use]
pub fn make_single_package(name: &str, version: &str) -> WorkspaceGraph {
    let root = make_package(name, version, ".");
    WorkspaceGraph {
        root_dir: PathBuf::from("/mock/project"),
        root: root.clone(),
        tool: WorkspaceTool::Root,
        packages: vec![root],
    }
}

#[must_use]
pub fn make_changeset(id: &str, releases: &[(&str, BumpType)]) -> Changeset {
    Changeset {
        id: id.to_string(),
        summary: format!("Summary of {id}"),
        releases: releases
            .iter()
            .map(|(name, bump_type)| PackageRelease {
                name: (*name).to_string(),
                bump_type: *bump_type,
            })
            .collect(),
    }
}

#[must_use]
pub fn modified(path: &str) -> ChangedFile {
    ChangedFile::new(path, FileStatus::Modified)
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().expect("lock poisoned")
}

/// In-memory manifests keyed by repository relative path.
pub struct MockManifestStore {
    manifests: Mutex<BTreeMap<PathBuf, String>>,
    written: Mutex<Vec<PathBuf>>,
}

impl MockManifestStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            manifests: Mutex::new(BTreeMap::new()),
            written: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_manifest(self, path: &str, content: &str) -> Self {
        lock(&self.manifests).insert(PathBuf::from(path), content.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the manifest is missing or not valid JSON.
    #[must_use]
    pub fn manifest(&self, path: &str) -> PackageManifest {
        let content = lock(&self.manifests)
            .get(Path::new(path))
            .cloned()
            .expect("manifest exists");
        PackageManifest::parse(path, &content).expect("valid manifest")
    }

    /// Paths written through [`ManifestStore::write_manifest`], in order.
    #[must_use]
    pub fn written(&self) -> Vec<PathBuf> {
        lock(&self.written).clone()
    }
}

impl Default for MockManifestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestStore for MockManifestStore {
    fn manifest_exists(&self, path: &Path) -> bool {
        lock(&self.manifests).contains_key(path)
    }

    fn read_manifest(&self, path: &Path) -> Result<PackageManifest> {
        let content = lock(&self.manifests).get(path).cloned().ok_or_else(|| {
            OperationError::ChangesetFileRead {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock file not found"),
            }
        })?;
        Ok(PackageManifest::parse(path, &content)?)
    }

    fn write_manifest(&self, manifest: &PackageManifest) -> Result<()> {
        let json = manifest.to_json()?;
        lock(&self.manifests).insert(manifest.path().to_path_buf(), json);
        lock(&self.written).push(manifest.path().to_path_buf());
        Ok(())
    }

    fn list_manifests(&self) -> Result<Vec<PathBuf>> {
        Ok(lock(&self.manifests).keys().cloned().collect())
    }
}

pub struct MockChangesetIO {
    changesets: Mutex<BTreeMap<PathBuf, Changeset>>,
    removed: Mutex<Vec<PathBuf>>,
    id: String,
}

impl MockChangesetIO {
    #[must_use]
    pub fn new() -> Self {
        Self {
            changesets: Mutex::new(BTreeMap::new()),
            removed: Mutex::new(Vec::new()),
            id: "calm-owls-run".to_string(),
        }
    }

    /// Stores `changeset` at `.changeset/<id>.md`.
    #[must_use]
    pub fn with_changeset(self, changeset: Changeset) -> Self {
        let path = PathBuf::from(format!(".changeset/{}.md", changeset.id));
        lock(&self.changesets).insert(path, changeset);
        self
    }

    #[must_use]
    pub fn removed(&self) -> Vec<PathBuf> {
        lock(&self.removed).clone()
    }
}

impl Default for MockChangesetIO {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangesetReader for MockChangesetIO {
    fn list_changesets(&self) -> Result<Vec<PathBuf>> {
        Ok(lock(&self.changesets).keys().cloned().collect())
    }

    fn read_changeset(&self, path: &Path) -> Result<Changeset> {
        lock(&self.changesets)
            .get(path)
            .cloned()
            .ok_or_else(|| OperationError::ChangesetFileRead {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock file not found"),
            })
    }
}

impl ChangesetWriter for MockChangesetIO {
    fn generate_id(&self) -> String {
        self.id.clone()
    }

    fn remove_changeset(&self, path: &Path) -> Result<()> {
        lock(&self.changesets).remove(path);
        lock(&self.removed).push(path.to_path_buf());
        Ok(())
    }
}

/// Pull request files, comments, pull requests and releases of one
/// repository, recorded for assertions.
pub struct MockForge {
    files: Vec<ChangedFile>,
    comments: Mutex<Vec<IssueComment>>,
    deleted_comments: Mutex<Vec<u64>>,
    open_pull_request: Option<PullRequest>,
    created_pull_requests: Mutex<Vec<(String, String, String, String)>>,
    updated_pull_requests: Mutex<Vec<(u64, String, String)>>,
    releases: Mutex<Vec<NewRelease>>,
    fail_comment_writes: bool,
    next_id: Mutex<u64>,
}

impl MockForge {
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            comments: Mutex::new(Vec::new()),
            deleted_comments: Mutex::new(Vec::new()),
            open_pull_request: None,
            created_pull_requests: Mutex::new(Vec::new()),
            updated_pull_requests: Mutex::new(Vec::new()),
            releases: Mutex::new(Vec::new()),
            fail_comment_writes: false,
            next_id: Mutex::new(100),
        }
    }

    #[must_use]
    pub fn with_files(mut self, files: Vec<ChangedFile>) -> Self {
        self.files = files;
        self
    }

    #[must_use]
    pub fn with_comment(self, id: u64, body: &str) -> Self {
        lock(&self.comments).push(IssueComment {
            id,
            body: Some(body.to_string()),
        });
        self
    }

    #[must_use]
    pub fn with_open_pull_request(mut self, number: u64) -> Self {
        self.open_pull_request = Some(PullRequest {
            number,
            html_url: format!("https://github.com/acme/web/pull/{number}"),
        });
        self
    }

    #[must_use]
    pub fn failing_comment_writes(mut self) -> Self {
        self.fail_comment_writes = true;
        self
    }

    #[must_use]
    pub fn comments(&self) -> Vec<IssueComment> {
        lock(&self.comments).clone()
    }

    #[must_use]
    pub fn deleted_comments(&self) -> Vec<u64> {
        lock(&self.deleted_comments).clone()
    }

    /// `(title, head, base, body)` of each created pull request.
    #[must_use]
    pub fn created_pull_requests(&self) -> Vec<(String, String, String, String)> {
        lock(&self.created_pull_requests).clone()
    }

    /// `(number, title, body)` of each updated pull request.
    #[must_use]
    pub fn updated_pull_requests(&self) -> Vec<(u64, String, String)> {
        lock(&self.updated_pull_requests).clone()
    }

    #[must_use]
    pub fn releases(&self) -> Vec<NewRelease> {
        lock(&self.releases).clone()
    }

    fn next_id(&self) -> u64 {
        let mut next = lock(&self.next_id);
        *next += 1;
        *next
    }

    fn check_comment_write(&self) -> Result<()> {
        if self.fail_comment_writes {
            return Err(OperationError::CommandFailed {
                command: "mock comment write".to_string(),
                status: "403".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

impl ForgeProvider for MockForge {
    fn list_pull_request_files(&self, _number: u64) -> Result<Vec<ChangedFile>> {
        Ok(self.files.clone())
    }

    fn list_comments(&self, _number: u64) -> Result<Vec<IssueComment>> {
        Ok(self.comments())
    }

    fn create_comment(&self, _number: u64, body: &str) -> Result<IssueComment> {
        self.check_comment_write()?;
        let comment = IssueComment {
            id: self.next_id(),
            body: Some(body.to_string()),
        };
        lock(&self.comments).push(comment.clone());
        Ok(comment)
    }

    fn update_comment(&self, id: u64, body: &str) -> Result<IssueComment> {
        self.check_comment_write()?;
        let mut comments = lock(&self.comments);
        let comment = comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| OperationError::CommandFailed {
                command: format!("update comment {id}"),
                status: "404".to_string(),
            })?;
        comment.body = Some(body.to_string());
        Ok(comment.clone())
    }

    fn delete_comment(&self, id: u64) -> Result<()> {
        self.check_comment_write()?;
        lock(&self.comments).retain(|c| c.id != id);
        lock(&self.deleted_comments).push(id);
        Ok(())
    }

    fn find_open_pull_request(&self, _head: &str, _base: &str) -> Result<Option<PullRequest>> {
        Ok(self.open_pull_request.clone())
    }

    fn create_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequest> {
        lock(&self.created_pull_requests).push((
            title.to_string(),
            head.to_string(),
            base.to_string(),
            body.to_string(),
        ));
        let number = self.next_id();
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/acme/web/pull/{number}"),
        })
    }

    fn update_pull_request(&self, number: u64, title: &str, body: &str) -> Result<PullRequest> {
        lock(&self.updated_pull_requests).push((number, title.to_string(), body.to_string()));
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/acme/web/pull/{number}"),
        })
    }

    fn create_release(&self, release: &NewRelease) -> Result<Release> {
        lock(&self.releases).push(release.clone());
        Ok(Release {
            id: self.next_id(),
            html_url: format!(
                "https://github.com/acme/web/releases/tag/{}",
                release.tag_name
            ),
        })
    }
}

pub struct MockGitProvider {
    changed_files: Vec<ChangedFile>,
    clean: bool,
    head_sha: String,
    commits: Mutex<Vec<String>>,
    switched_branches: Mutex<Vec<String>>,
    resets: Mutex<Vec<String>>,
    pushes: Mutex<Vec<(String, bool)>>,
    tags_pushed: Mutex<usize>,
    user: Mutex<Option<(String, String)>>,
}

impl MockGitProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            changed_files: Vec::new(),
            clean: true,
            head_sha: "abc1234def5678".to_string(),
            commits: Mutex::new(Vec::new()),
            switched_branches: Mutex::new(Vec::new()),
            resets: Mutex::new(Vec::new()),
            pushes: Mutex::new(Vec::new()),
            tags_pushed: Mutex::new(0),
            user: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_changed_files(mut self, files: Vec<ChangedFile>) -> Self {
        self.changed_files = files;
        self
    }

    #[must_use]
    pub fn is_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    #[must_use]
    pub fn commits(&self) -> Vec<String> {
        lock(&self.commits).clone()
    }

    #[must_use]
    pub fn switched_branches(&self) -> Vec<String> {
        lock(&self.switched_branches).clone()
    }

    #[must_use]
    pub fn resets(&self) -> Vec<String> {
        lock(&self.resets).clone()
    }

    /// `(branch, force)` of each push.
    #[must_use]
    pub fn pushes(&self) -> Vec<(String, bool)> {
        lock(&self.pushes).clone()
    }

    #[must_use]
    pub fn tags_pushed(&self) -> usize {
        *lock(&self.tags_pushed)
    }

    #[must_use]
    pub fn user(&self) -> Option<(String, String)> {
        lock(&self.user).clone()
    }
}

impl Default for MockGitProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProvider for MockGitProvider {
    fn changed_files(&self, _base: &str, _head: &str) -> Result<Vec<ChangedFile>> {
        Ok(self.changed_files.clone())
    }

    fn head_sha(&self) -> Result<String> {
        Ok(self.head_sha.clone())
    }

    fn is_working_tree_clean(&self) -> Result<bool> {
        Ok(self.clean)
    }

    fn commit_all(&self, message: &str) -> Result<Option<CommitInfo>> {
        if self.clean {
            return Ok(None);
        }
        lock(&self.commits).push(message.to_string());
        Ok(Some(CommitInfo {
            sha: self.head_sha.clone(),
            message: message.to_string(),
        }))
    }

    fn switch_branch(&self, branch: &str) -> Result<()> {
        lock(&self.switched_branches).push(branch.to_string());
        Ok(())
    }

    fn reset_hard(&self, revision: &str) -> Result<()> {
        lock(&self.resets).push(revision.to_string());
        Ok(())
    }

    fn push(&self, branch: &str, force: bool) -> Result<()> {
        lock(&self.pushes).push((branch.to_string(), force));
        Ok(())
    }

    fn push_tags(&self) -> Result<usize> {
        let mut pushed = lock(&self.tags_pushed);
        *pushed += 1;
        Ok(1)
    }

    fn configure_user(&self, name: &str, email: &str) -> Result<()> {
        *lock(&self.user) = Some((name.to_string(), email.to_string()));
        Ok(())
    }
}

/// Scripted command output. Unknown commands succeed with empty output.
pub struct MockCommandRunner {
    outputs: HashMap<String, String>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            outputs: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_output(mut self, command: &str, stdout: &str) -> Self {
        self.outputs.insert(command.to_string(), stdout.to_string());
        self
    }

    #[must_use]
    pub fn failing(mut self, command: &str) -> Self {
        self.failing.insert(command.to_string());
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    fn respond(&self, command: &str) -> Result<String> {
        lock(&self.calls).push(command.to_string());
        if self.failing.contains(command) {
            return Err(OperationError::CommandFailed {
                command: command.to_string(),
                status: "exit status: 1".to_string(),
            });
        }
        Ok(self.outputs.get(command).cloned().unwrap_or_default())
    }
}

impl Default for MockCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, command_line: &str) -> Result<String> {
        self.respond(command_line)
    }

    fn run_shell(&self, script: &str) -> Result<String> {
        self.respond(script)
    }
}

/// Returns the queued graphs one per `discover` call; the last one repeats.
pub struct MockWorkspaceProvider {
    graphs: Mutex<VecDeque<WorkspaceGraph>>,
    config: ChangesetConfig,
    pre_state: Option<PreState>,
}

impl MockWorkspaceProvider {
    #[must_use]
    pub fn new(graph: WorkspaceGraph) -> Self {
        Self {
            graphs: Mutex::new(VecDeque::from([graph])),
            config: ChangesetConfig::default(),
            pre_state: None,
        }
    }

    /// Graph returned after the current ones, e.g. after a version command.
    #[must_use]
    pub fn then(self, graph: WorkspaceGraph) -> Self {
        lock(&self.graphs).push_back(graph);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ChangesetConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_pre_state(mut self, pre_state: PreState) -> Self {
        self.pre_state = Some(pre_state);
        self
    }
}

impl WorkspaceProvider for MockWorkspaceProvider {
    fn discover(&self) -> Result<WorkspaceGraph> {
        let mut graphs = lock(&self.graphs);
        let graph = if graphs.len() > 1 {
            graphs.pop_front()
        } else {
            graphs.front().cloned()
        };
        graph.ok_or(OperationError::EmptyWorkspace)
    }

    fn load_config(&self) -> Result<ChangesetConfig> {
        Ok(self.config.clone())
    }

    fn load_pre_state(&self) -> Result<Option<PreState>> {
        Ok(self.pre_state.clone())
    }
}

pub struct MockChangelogReader {
    changelogs: HashMap<PathBuf, String>,
}

impl MockChangelogReader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            changelogs: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_changelog(mut self, package_dir: &str, content: &str) -> Self {
        self.changelogs
            .insert(PathBuf::from(package_dir), content.to_string());
        self
    }
}

impl Default for MockChangelogReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogReader for MockChangelogReader {
    fn read_changelog(&self, package_dir: &Path) -> Result<Option<Changelog>> {
        Ok(self.changelogs.get(package_dir).cloned().map(Changelog::new))
    }
}
