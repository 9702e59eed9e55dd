//! Parsers for the lines `changeset publish` prints for each published package.
//!
//! Only two exact shapes are recognized:
//!
//! * `New tag:  <name>@<version>` after a regular publish
//! * `🦋  <name>@<version>` (two spaces) in the canary publish summary

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

static NEW_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"New tag:\s+(@[^/]+/[^@]+|[^/]+)@(\S+)").expect("valid regex")
});

static CANARY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^🦋 {2}([A-Za-z\-\d/@]+)@(.+)$").expect("valid regex")
});

const NEW_TAG_MARKER: &str = "New tag:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedPackage {
    pub name: String,
    pub version: String,
}

impl PublishedPackage {
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Every `New tag:` line, in output order.
#[must_use]
pub fn parse_new_tags(stdout: &str) -> Vec<PublishedPackage> {
    stdout
        .lines()
        .filter_map(|line| NEW_TAG.captures(line))
        .map(|caps| PublishedPackage::new(&caps[1], &caps[2]))
        .collect()
}

/// Whether any line announces a new tag, used for single-package repositories
/// where the tag carries no package name.
#[must_use]
pub fn has_new_tag(stdout: &str) -> bool {
    stdout.lines().any(|line| line.contains(NEW_TAG_MARKER))
}

/// Canary publish summary lines, deduplicated by name.
#[must_use]
pub fn parse_canary_output(stdout: &str) -> Vec<PublishedPackage> {
    dedup_by_name(
        stdout
            .lines()
            .filter_map(|line| CANARY_LINE.captures(line.trim()))
            .map(|caps| PublishedPackage::new(&caps[1], &caps[2])),
    )
}

/// Keeps the first entry per package name.
#[must_use]
pub fn dedup_by_name(packages: impl IntoIterator<Item = PublishedPackage>) -> Vec<PublishedPackage> {
    let mut seen: IndexMap<String, PublishedPackage> = IndexMap::new();
    for package in packages {
        seen.entry(package.name.clone()).or_insert(package);
    }
    seen.into_values().collect()
}
