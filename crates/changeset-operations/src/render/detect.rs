use std::fmt::Write as _;

use changeset_changelog::RepositoryInfo;
use changeset_core::{BumpType, CHANGESET_DIR, Locale, PackageDescriptor};
use url::form_urlencoded;

use super::catalog::catalog;
use super::{COMMENT_MARKER, bump_label};
use crate::planner::ReleasePlan;

/// The pull request a status comment is rendered for.
#[derive(Debug, Clone)]
pub struct PullRequestInfo {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub head_ref: String,
    pub base_ref: String,
    /// Repository the head branch lives in; differs from the base repository
    /// for pull requests from forks.
    pub head_repository: RepositoryInfo,
}

/// Body of the `.changeset/<id>.md` file prefilled by an "add changeset" link.
#[must_use]
pub fn changeset_template(
    packages: &[&str],
    bump_type: BumpType,
    pull_request: &PullRequestInfo,
    locale: Locale,
) -> String {
    let mut lines = vec!["---".to_string()];
    lines.extend(packages.iter().map(|name| format!("\"{name}\": {bump_type}")));
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push(String::new());
    lines.push(catalog(locale).changeset_placeholder().to_string());
    lines.push(String::new());
    lines.push(format!("[{}]({})", pull_request.title, pull_request.html_url));
    lines.join("\n")
}

/// Link to the forge's "new file" page with a prefilled changeset.
#[must_use]
pub fn add_changeset_url(
    packages: &[&str],
    bump_type: BumpType,
    pull_request: &PullRequestInfo,
    changeset_id: &str,
    locale: Locale,
) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("filename", &format!("{CHANGESET_DIR}/{changeset_id}.md"))
        .append_pair(
            "value",
            &changeset_template(packages, bump_type, pull_request, locale),
        )
        .append_pair("message", &format!("[{bump_type}] {changeset_id}"))
        .finish();

    format!(
        "{}?{query}",
        pull_request.head_repository.new_file_url(&pull_request.head_ref)
    )
}

/// The collapsible release plan summary with its `Name | Type` table.
#[must_use]
pub fn render_release_plan(plan: &ReleasePlan, locale: Locale) -> String {
    let messages = catalog(locale);
    let mut releases: Vec<(&str, BumpType)> = plan
        .releases
        .iter()
        .filter(|r| r.bump_type.is_publishable())
        .map(|r| (r.name.as_str(), r.bump_type))
        .collect();
    releases.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let summary = if plan.has_changesets() {
        messages.plan_summary(releases.len())
    } else {
        messages.plan_empty().to_string()
    };

    let details = if releases.is_empty() {
        messages.plan_without_releases().to_string()
    } else {
        let [name, kind] = messages.table_header();
        let mut table = format!("| {name} | {kind} |\n| --- | --- |");
        for (name, bump_type) in releases {
            let _ = write!(table, "\n| {name} | {} |", bump_label(bump_type));
        }
        table
    };

    format!("<details><summary>{summary}</summary>\n\n{details}\n\n</details>")
}

/// Inputs of the detect-add status comment.
#[derive(Debug, Clone)]
pub struct DetectComment<'a> {
    /// Changed packages, with `bump_type` set when a changeset covers them.
    pub packages: &'a [PackageDescriptor],
    pub plan: Option<&'a ReleasePlan>,
    pub pull_request: &'a PullRequestInfo,
    pub skip_label: Option<&'a str>,
    pub changeset_id: &'a str,
}

#[must_use]
pub fn render_detect_comment(comment: &DetectComment<'_>, locale: Locale) -> String {
    let messages = catalog(locale);
    let names: Vec<&str> = comment.packages.iter().map(|p| p.name.as_str()).collect();

    let mut sections = vec![COMMENT_MARKER.to_string(), messages.packages_detected(&names)];
    if let Some(label) = comment.skip_label {
        sections.push(messages.skip_label_hint(label));
    }

    let link = |bump_type, shape: &str| {
        let url = add_changeset_url(
            &names,
            bump_type,
            comment.pull_request,
            comment.changeset_id,
            locale,
        );
        format!("{shape} [{bump_type} bump]({url})")
    };
    sections.push(format!(
        "{}\n\n{}\n{}\n{}",
        messages.add_changeset_prompt(),
        link(BumpType::Major, "X.0.0"),
        link(BumpType::Minor, "0.X.0"),
        link(BumpType::Patch, "0.0.X"),
    ));

    if let Some(plan) = comment.plan {
        sections.push(render_release_plan(plan, locale));
    }

    let uncovered: Vec<&str> = comment
        .packages
        .iter()
        .filter(|p| !p.bump_type.is_some_and(BumpType::is_publishable))
        .map(|p| p.name.as_str())
        .collect();
    if comment.plan.is_some() && !uncovered.is_empty() {
        let list: Vec<String> = uncovered.iter().map(|name| format!("- `{name}`")).collect();
        sections.push(format!(
            "{}\n\n{}",
            messages.packages_without_changeset(),
            list.join("\n")
        ));
    }

    sections.join("\n\n")
}

/// Comment left when no tracked package changed.
#[must_use]
pub fn render_empty_comment(locale: Locale) -> String {
    let [first, second] = catalog(locale).no_changed_packages();
    format!("{COMMENT_MARKER}\n\n{first}\n{second}")
}
