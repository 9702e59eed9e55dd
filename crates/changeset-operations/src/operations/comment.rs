use changeset_github::IssueComment;

use crate::Result;
use crate::render::COMMENT_MARKER;
use crate::traits::ForgeProvider;

/// The status comment left by an earlier run, recognized by its marker.
pub(crate) fn find_status_comment<F: ForgeProvider>(
    forge: &F,
    number: u64,
) -> Result<Option<IssueComment>> {
    Ok(forge
        .list_comments(number)?
        .into_iter()
        .find(|comment| comment.contains(COMMENT_MARKER)))
}

/// Updates `existing` in place or creates a new comment.
pub(crate) fn upsert_comment<F: ForgeProvider>(
    forge: &F,
    number: u64,
    existing: Option<&IssueComment>,
    body: &str,
) -> Result<IssueComment> {
    match existing {
        Some(comment) => {
            tracing::info!(comment_id = comment.id, "updating status comment");
            forge.update_comment(comment.id, body)
        }
        None => {
            tracing::info!(pull_request = number, "creating status comment");
            forge.create_comment(number, body)
        }
    }
}
