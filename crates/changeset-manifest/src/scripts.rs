const PUBLISH_COMMAND: &str = "changeset publish";
pub const NO_GIT_TAG_FLAG: &str = "--no-git-tag";
const TAG_FLAG: &str = "--tag";

/// Adds `--no-git-tag` and `--tag=<npm_tag>` to a script that runs
/// `changeset publish`.
///
/// Returns `None` when the script does not publish or already carries both
/// flags. An existing `--tag` is left alone.
#[must_use]
pub fn with_publish_flags(script: &str, npm_tag: &str) -> Option<String> {
    if !script.contains(PUBLISH_COMMAND) {
        return None;
    }

    let mut rewritten = script.to_string();
    if !rewritten.contains(NO_GIT_TAG_FLAG) {
        rewritten = rewritten.replacen(
            PUBLISH_COMMAND,
            &format!("{PUBLISH_COMMAND} {NO_GIT_TAG_FLAG}"),
            1,
        );
    }
    if !rewritten.contains(TAG_FLAG) {
        rewritten = rewritten.replacen(
            NO_GIT_TAG_FLAG,
            &format!("{NO_GIT_TAG_FLAG} {TAG_FLAG}={npm_tag}"),
            1,
        );
    }

    (rewritten != script).then_some(rewritten)
}
