use std::collections::HashSet;
use std::path::{Path, PathBuf};

use changeset_core::Locale;
use changeset_manifest::with_publish_flags;
use changeset_project::PACKAGE_JSON;
use changeset_version::{TemplateValues, VersionTemplate};
use chrono::NaiveDate;

use crate::Result;
use crate::changed_packages::build_changed_packages;
use crate::classifier::{Excludes, PackageDirs};
use crate::publish_output::{PublishedPackage, parse_canary_output};
use crate::render::{catalog, render_canary_message};
use crate::traits::{
    ChangesetReader, ChangesetWriter, CommandRunner, ForgeProvider, ManifestStore,
};

pub struct CanaryInput {
    pub pull_request_number: u64,
    /// Commit the canary versions are stamped with.
    pub commit_sha: String,
    pub dirs: PackageDirs,
    pub excludes: Excludes,
    pub npm_tag: String,
    pub version_script: String,
    pub publish_script: String,
    pub version_template: VersionTemplate,
    pub today: NaiveDate,
    pub dry_run: bool,
    pub locale: Locale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanaryOutcome {
    MissingChangeset,
    NoChangedPackages,
    /// Versions were rewritten but nothing was published.
    DryRun { packages: Vec<PublishedPackage> },
    Published {
        packages: Vec<PublishedPackage>,
        message: String,
    },
}

/// Publishes the packages changed by a pull request under a canary version
/// and reports them in a comment.
///
/// Mutates the checkout: unrelated changesets are deleted and every other
/// package is made private so the publish command skips it.
pub struct CanaryPublishOperation<F, M, R, C> {
    forge: F,
    manifests: M,
    changesets: R,
    runner: C,
}

impl<F, M, R, C> CanaryPublishOperation<F, M, R, C>
where
    F: ForgeProvider,
    M: ManifestStore,
    R: ChangesetReader + ChangesetWriter,
    C: CommandRunner,
{
    pub fn new(forge: F, manifests: M, changesets: R, runner: C) -> Self {
        Self {
            forge,
            manifests,
            changesets,
            runner,
        }
    }

    /// On failure a localized error comment is attempted before the error
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the forge, a manifest, a script or the version
    /// template fails.
    pub fn execute(&self, input: &CanaryInput) -> Result<CanaryOutcome> {
        match self.publish(input) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::error!(error = %e, "canary publish failed");
                if !input.dry_run {
                    let body = catalog(input.locale).canary_error();
                    if let Err(comment_err) =
                        self.forge.create_comment(input.pull_request_number, body)
                    {
                        tracing::warn!(error = %comment_err, "failed to report canary failure");
                    }
                }
                Err(e)
            }
        }
    }

    fn publish(&self, input: &CanaryInput) -> Result<CanaryOutcome> {
        let messages = catalog(input.locale);
        let pending = self.changesets.list_changesets()?;
        if pending.is_empty() {
            tracing::info!("no pending changesets");
            self.comment(input, messages.canary_missing_changeset())?;
            return Ok(CanaryOutcome::MissingChangeset);
        }

        let files = self.forge.list_pull_request_files(input.pull_request_number)?;
        let changed: Vec<PathBuf> =
            build_changed_packages(&files, &input.dirs, &input.excludes, &self.manifests)
                .into_iter()
                .filter_map(|package| package.manifest_path)
                .collect();
        if changed.is_empty() {
            tracing::info!(dirs = %input.dirs.display(), "no changed packages to publish");
            return Ok(CanaryOutcome::NoChangedPackages);
        }

        let pull_request_files: HashSet<PathBuf> =
            files.iter().map(|f| PathBuf::from(&f.path)).collect();
        for path in pending.iter().filter(|p| !pull_request_files.contains(*p)) {
            tracing::debug!(path = %path.display(), "removing changeset of another pull request");
            self.changesets.remove_changeset(path)?;
        }
        self.protect_unchanged(&changed)?;

        self.runner.run(&input.version_script)?;
        self.add_publish_flags(&input.npm_tag)?;
        let planned = self.stamp_versions(&changed, input)?;

        if input.dry_run {
            for package in &planned {
                tracing::info!(package = %package.name, version = %package.version, "dry run, not publishing");
            }
            return Ok(CanaryOutcome::DryRun { packages: planned });
        }

        let stdout = self.runner.run(&input.publish_script)?;
        let packages = parse_canary_output(&stdout);
        let message = render_canary_message(&packages, &input.dirs.display(), input.locale);
        self.forge.create_comment(input.pull_request_number, &message)?;

        tracing::info!(published = packages.len(), "canary packages published");
        Ok(CanaryOutcome::Published { packages, message })
    }

    fn comment(&self, input: &CanaryInput, body: &str) -> Result<()> {
        if input.dry_run {
            tracing::info!(body, "dry run, not commenting");
            return Ok(());
        }
        self.forge.create_comment(input.pull_request_number, body)?;
        Ok(())
    }

    fn protect_unchanged(&self, changed: &[PathBuf]) -> Result<()> {
        for path in self.manifests.list_manifests()? {
            if changed.contains(&path) {
                continue;
            }
            let mut manifest = self.manifests.read_manifest(&path)?;
            if manifest.is_private() {
                continue;
            }
            manifest.set_private(true);
            self.manifests.write_manifest(&manifest)?;
            tracing::debug!(path = %path.display(), "marked private");
        }
        Ok(())
    }

    fn add_publish_flags(&self, npm_tag: &str) -> Result<()> {
        let root = Path::new(PACKAGE_JSON);
        if !self.manifests.manifest_exists(root) {
            return Ok(());
        }

        let mut manifest = self.manifests.read_manifest(root)?;
        let rewrites: Vec<(String, String)> = manifest
            .scripts()
            .into_iter()
            .filter_map(|(key, script)| {
                with_publish_flags(script, npm_tag).map(|new| (key.to_string(), new))
            })
            .collect();
        if rewrites.is_empty() {
            return Ok(());
        }

        for (key, script) in &rewrites {
            tracing::info!(script = %key, "adding canary publish flags");
            manifest.set_script(key, script);
        }
        self.manifests.write_manifest(&manifest)
    }

    fn stamp_versions(
        &self,
        changed: &[PathBuf],
        input: &CanaryInput,
    ) -> Result<Vec<PublishedPackage>> {
        let mut planned = Vec::with_capacity(changed.len());
        for path in changed {
            let mut manifest = self.manifests.read_manifest(path)?;
            let version = manifest.parsed_version()?;
            let canary = input.version_template.render(&TemplateValues {
                version: &version,
                tag: &input.npm_tag,
                date: input.today,
                commit_sha: &input.commit_sha,
            })?;

            manifest.set_version(&canary.to_string());
            self.manifests.write_manifest(&manifest)?;

            let name = manifest.name().unwrap_or_default().to_string();
            tracing::info!(package = %name, version = %canary, "canary version");
            planned.push(PublishedPackage::new(name, canary.to_string()));
        }
        Ok(planned)
    }
}

#[cfg(test)]
mod tests {
    use changeset_core::BumpType;
    use changeset_version::DEFAULT_VERSION_TEMPLATE;

    use super::*;
    use crate::mocks::{
        MockChangesetIO, MockCommandRunner, MockForge, MockManifestStore, make_changeset, modified,
    };

    const VERSION_SCRIPT: &str = "npx changeset version";
    const PUBLISH_SCRIPT: &str = "npx changeset publish";

    type Operation =
        CanaryPublishOperation<MockForge, MockManifestStore, MockChangesetIO, MockCommandRunner>;

    fn input() -> CanaryInput {
        CanaryInput {
            pull_request_number: 7,
            commit_sha: "abc1234def5678".to_string(),
            dirs: PackageDirs::new(["packages"]),
            excludes: Excludes::default(),
            npm_tag: "canary".to_string(),
            version_script: VERSION_SCRIPT.to_string(),
            publish_script: PUBLISH_SCRIPT.to_string(),
            version_template: VersionTemplate::parse(DEFAULT_VERSION_TEMPLATE)
                .expect("valid template"),
            today: NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date"),
            dry_run: false,
            locale: Locale::En,
        }
    }

    fn store() -> MockManifestStore {
        MockManifestStore::new()
            .with_manifest(
                "package.json",
                r#"{"name": "monorepo", "private": true, "scripts": {"release": "pnpm build && changeset publish"}}"#,
            )
            .with_manifest("packages/foo/package.json", r#"{"name": "foo", "version": "1.1.0"}"#)
            .with_manifest("packages/bar/package.json", r#"{"name": "bar", "version": "2.0.0"}"#)
    }

    fn changesets() -> MockChangesetIO {
        MockChangesetIO::new()
            .with_changeset(make_changeset("brave-dogs-sing", &[("foo", BumpType::Minor)]))
            .with_changeset(make_changeset("other-pr-change", &[("bar", BumpType::Patch)]))
    }

    fn forge() -> MockForge {
        MockForge::new().with_files(vec![
            modified("packages/foo/src/index.ts"),
            modified(".changeset/brave-dogs-sing.md"),
        ])
    }

    fn operation(
        forge: MockForge,
        changesets: MockChangesetIO,
        runner: MockCommandRunner,
    ) -> Operation {
        CanaryPublishOperation::new(forge, store(), changesets, runner)
    }

    #[test]
    fn publishes_changed_package_with_canary_version() -> anyhow::Result<()> {
        let runner = MockCommandRunner::new().with_output(
            PUBLISH_SCRIPT,
            "🦋  info npm info foo\n🦋  success packages published successfully:\n🦋  foo@1.1.0-canary-abc1234\n",
        );
        let op = operation(forge(), changesets(), runner);

        let outcome = op.execute(&input())?;

        let CanaryOutcome::Published { packages, message } = outcome else {
            panic!("expected a publish, got {outcome:?}");
        };
        assert_eq!(packages, [PublishedPackage::new("foo", "1.1.0-canary-abc1234")]);
        assert!(message.contains("foo@1.1.0-canary-abc1234"));
        assert_eq!(op.runner.calls(), [VERSION_SCRIPT, PUBLISH_SCRIPT]);
        assert_eq!(op.forge.comments().len(), 1);
        Ok(())
    }

    #[test]
    fn unrelated_changesets_are_removed_and_other_packages_made_private() -> anyhow::Result<()> {
        let op = operation(forge(), changesets(), MockCommandRunner::new());

        op.execute(&input())?;

        assert_eq!(
            op.changesets.removed(),
            [PathBuf::from(".changeset/other-pr-change.md")]
        );
        assert!(op.manifests.manifest("packages/bar/package.json").is_private());
        assert!(!op.manifests.manifest("packages/foo/package.json").is_private());
        Ok(())
    }

    #[test]
    fn root_publish_script_gets_canary_flags() -> anyhow::Result<()> {
        let op = operation(forge(), changesets(), MockCommandRunner::new());

        op.execute(&input())?;

        let root = op.manifests.manifest("package.json");
        assert_eq!(
            root.scripts(),
            [("release", "pnpm build && changeset publish --no-git-tag --tag=canary")]
        );
        assert_eq!(
            op.manifests.manifest("packages/foo/package.json").version(),
            Some("1.1.0-canary-abc1234")
        );
        Ok(())
    }

    #[test]
    fn nothing_published_reports_packages_dir() -> anyhow::Result<()> {
        let op = operation(forge(), changesets(), MockCommandRunner::new());

        let outcome = op.execute(&input())?;

        let CanaryOutcome::Published { packages, message } = outcome else {
            panic!("expected a publish, got {outcome:?}");
        };
        assert!(packages.is_empty());
        assert!(message.contains("under the packages path"));
        Ok(())
    }

    #[test]
    fn missing_changesets_leave_guidance_comment() -> anyhow::Result<()> {
        let op = operation(forge(), MockChangesetIO::new(), MockCommandRunner::new());

        let outcome = op.execute(&input())?;

        assert_eq!(outcome, CanaryOutcome::MissingChangeset);
        assert!(op.forge.comments()[0].contains("valid canary version"));
        assert!(op.runner.calls().is_empty());
        Ok(())
    }

    #[test]
    fn no_changed_packages_publishes_nothing() -> anyhow::Result<()> {
        let forge = MockForge::new().with_files(vec![modified("docs/index.ts")]);
        let op = operation(forge, changesets(), MockCommandRunner::new());

        assert_eq!(op.execute(&input())?, CanaryOutcome::NoChangedPackages);
        assert!(op.runner.calls().is_empty());
        assert!(op.changesets.removed().is_empty());
        Ok(())
    }

    #[test]
    fn dry_run_skips_publish_and_comments() -> anyhow::Result<()> {
        let op = operation(forge(), changesets(), MockCommandRunner::new());
        let mut input = input();
        input.dry_run = true;

        let outcome = op.execute(&input)?;

        assert_eq!(
            outcome,
            CanaryOutcome::DryRun {
                packages: vec![PublishedPackage::new("foo", "1.1.0-canary-abc1234")]
            }
        );
        assert_eq!(op.runner.calls(), [VERSION_SCRIPT]);
        assert!(op.forge.comments().is_empty());
        Ok(())
    }

    #[test]
    fn failure_leaves_error_comment_and_propagates() -> anyhow::Result<()> {
        let runner = MockCommandRunner::new().failing(PUBLISH_SCRIPT);
        let op = operation(forge(), changesets(), runner);

        let result = op.execute(&input());

        assert!(result.is_err());
        let comments = op.forge.comments();
        assert_eq!(comments.len(), 1);
        assert!(comments[0].contains("An error occurred during the canary deployment."));
        Ok(())
    }
}
