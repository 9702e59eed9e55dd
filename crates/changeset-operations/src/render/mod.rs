//! Markdown rendered into pull request comments, pull request bodies and
//! action outputs.

mod catalog;
mod detect;
mod notes;

use changeset_core::BumpType;

pub use catalog::{MessageCatalog, catalog};
pub use detect::{
    DetectComment, PullRequestInfo, add_changeset_url, changeset_template, render_detect_comment,
    render_empty_comment, render_release_plan,
};
pub use notes::{
    MAX_BODY_CHARS, PackageNotes, ReleasedPackage, render_canary_message,
    render_publish_message, render_pull_request_body, sort_package_notes,
};

/// Hidden marker identifying the detect-add status comment of a pull request.
pub const COMMENT_MARKER: &str = "<!-- changeset-actions:detect-add -->";

#[must_use]
pub fn bump_label(bump_type: BumpType) -> &'static str {
    match bump_type {
        BumpType::Major => "💥 Major",
        BumpType::Minor => "✨ Minor",
        BumpType::Patch => "🐛 Patch",
        BumpType::None => "None",
    }
}
