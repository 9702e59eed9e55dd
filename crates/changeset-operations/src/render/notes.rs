use changeset_changelog::RepositoryInfo;
use changeset_core::{BumpType, Locale};
use indexmap::IndexMap;
use serde::Serialize;

use super::catalog::catalog;
use crate::publish_output::PublishedPackage;

/// Character budget of a pull request body.
pub const MAX_BODY_CHARS: usize = 60_000;

const RELEASES_HEADING: &str = "# Releases";
const CANARY_HEADING: &str = "## Published Canary Packages";

/// Changelog entry of one package bumped by the version command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNotes {
    pub name: String,
    pub version: String,
    pub private: bool,
    pub highest_level: BumpType,
    pub content: String,
}

impl PackageNotes {
    #[must_use]
    pub fn header(&self) -> String {
        format!("## {}@{}", self.name, self.version)
    }
}

/// Public packages first, then by highest bump level, keeping input order
/// for ties.
pub fn sort_package_notes(notes: &mut [PackageNotes]) {
    notes.sort_by(|a, b| {
        a.private
            .cmp(&b.private)
            .then_with(|| b.highest_level.cmp(&a.highest_level))
    });
}

/// Release pull request body.
///
/// When the full changelogs exceed `max_chars`, only the package headers are
/// kept; when even that is too long, a single notice replaces them. The
/// result never exceeds `max_chars` characters, down to a bare heading.
#[must_use]
pub fn render_pull_request_body(notes: &[PackageNotes], locale: Locale, max_chars: usize) -> String {
    let messages = catalog(locale);

    let mut parts = vec![RELEASES_HEADING.to_string()];
    parts.extend(
        notes
            .iter()
            .map(|n| format!("{}\n\n{}", n.header(), n.content)),
    );
    let full = parts.join("\n");
    if full.chars().count() <= max_chars {
        return full;
    }

    let mut parts = vec![
        RELEASES_HEADING.to_string(),
        format!("\n{}\n", messages.notes_headers_only(max_chars)),
    ];
    parts.extend(notes.iter().map(|n| format!("{}\n\n", n.header())));
    let headers_only = parts.join("\n");
    if headers_only.chars().count() <= max_chars {
        tracing::info!(max_chars, "release notes too long, keeping package headers only");
        return headers_only;
    }

    tracing::info!(max_chars, "release notes too long, omitting all packages");
    let omitted = [
        RELEASES_HEADING.to_string(),
        format!("\n{}\n", messages.notes_omitted(max_chars)),
    ]
    .join("\n");
    if omitted.chars().count() <= max_chars {
        return omitted;
    }

    RELEASES_HEADING.chars().take(max_chars).collect()
}

/// A package released by the publish command together with its git tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasedPackage {
    pub name: String,
    pub version: String,
    #[serde(skip)]
    pub tag: String,
}

/// `- name@version` followed by the release page URL, once per package.
#[must_use]
pub fn render_publish_message(packages: &[ReleasedPackage], repository: &RepositoryInfo) -> String {
    let mut unique: IndexMap<&str, &ReleasedPackage> = IndexMap::new();
    for package in packages {
        unique.entry(package.name.as_str()).or_insert(package);
    }

    unique
        .values()
        .map(|p| {
            format!(
                "- {}@{}\n{}",
                p.name,
                p.version,
                repository.release_tag_url(&p.tag)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Copyable list of the canary versions, or the localized notice when the
/// publish command released nothing.
#[must_use]
pub fn render_canary_message(
    packages: &[PublishedPackage],
    packages_dir: &str,
    locale: Locale,
) -> String {
    if packages.is_empty() {
        return catalog(locale).canary_empty(packages_dir);
    }

    let list = packages
        .iter()
        .map(|p| format!("{}@{}", p.name, p.version))
        .collect::<Vec<_>>()
        .join("\n");
    [CANARY_HEADING, "", "", "```", list.as_str(), "```"].join("\n")
}
