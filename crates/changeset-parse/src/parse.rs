use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_with::{MapPreventDuplicates, serde_as};

use changeset_core::{BumpType, Changeset, PackageRelease};

use crate::error::{FormatError, FrontMatterError, ValidationError};

const FRONT_MATTER_DELIMITER: &str = "---";

const MAX_INPUT_SIZE: usize = 100 * 1024 * 1024;

#[serde_as]
#[derive(Deserialize)]
struct ReleasesMap {
    #[serde(flatten)]
    #[serde_as(as = "MapPreventDuplicates<_, _>")]
    releases: IndexMap<String, BumpType>,
}

fn strip_line_ending(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}

fn find_closing_delimiter(content: &str) -> Option<usize> {
    if content.starts_with(FRONT_MATTER_DELIMITER) {
        return Some(0);
    }
    if let Some(pos) = content.find("\r\n---") {
        return Some(pos + 2);
    }
    if let Some(pos) = content.find("\n---") {
        return Some(pos + 1);
    }
    None
}

fn extract_front_matter(content: &str) -> Result<(&str, &str), FormatError> {
    let trimmed = content.trim_start();

    if !trimmed.starts_with(FRONT_MATTER_DELIMITER) {
        return Err(FrontMatterError::MissingOpeningDelimiter.into());
    }

    let after_opening = &trimmed[FRONT_MATTER_DELIMITER.len()..];
    let after_opening = strip_line_ending(after_opening);

    let Some(closing_pos) = find_closing_delimiter(after_opening) else {
        return Err(FrontMatterError::MissingClosingDelimiter.into());
    };

    let yaml_content = after_opening[..closing_pos].trim_end_matches('\r');

    let after_closing = &after_opening[closing_pos + FRONT_MATTER_DELIMITER.len()..];
    let body = strip_line_ending(after_closing);

    Ok((yaml_content, body))
}

/// Parses the content of a changeset file.
///
/// The returned changeset has an empty `id`; callers attach the id derived from the
/// file name. A front matter without entries is a valid, empty changeset.
///
/// # Errors
///
/// Returns `FormatError` if the delimiters are missing, the YAML is invalid, a bump
/// type is unknown or a package is named twice.
#[must_use = "parsing result should be handled"]
pub fn parse_changeset(content: &str) -> Result<Changeset, FormatError> {
    if content.len() > MAX_INPUT_SIZE {
        return Err(ValidationError::InputTooLarge {
            max_bytes: MAX_INPUT_SIZE,
        }
        .into());
    }

    let (yaml_content, body) = extract_front_matter(content)?;

    let releases_map = if yaml_content.trim().is_empty() {
        IndexMap::new()
    } else {
        let parsed: ReleasesMap = serde_yml::from_str(yaml_content)?;
        parsed.releases
    };

    if releases_map.keys().any(|name| name.trim().is_empty()) {
        return Err(ValidationError::EmptyPackageName.into());
    }

    let releases = releases_map
        .into_iter()
        .map(|(name, bump_type)| PackageRelease { name, bump_type })
        .collect();

    Ok(Changeset {
        id: String::new(),
        summary: body.trim().to_string(),
        releases,
    })
}

/// Returns the changeset id for a `.changeset/<id>.md` path.
#[must_use]
pub fn changeset_id_from_path(path: &Path) -> Option<String> {
    if path.extension().is_none_or(|ext| ext != "md") {
        return None;
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|id| !id.is_empty() && !id.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_package_with_summary() {
        let content = r#"---
"my-package": patch
---
Fix critical bug in authentication flow.
"#;

        let changeset = parse_changeset(content).expect("should parse");
        assert_eq!(changeset.releases.len(), 1);
        assert_eq!(changeset.releases[0].name, "my-package");
        assert_eq!(changeset.releases[0].bump_type, BumpType::Patch);
        assert_eq!(
            changeset.summary,
            "Fix critical bug in authentication flow."
        );
    }

    #[test]
    fn multiple_packages_preserves_order() {
        let content = r#"---
"@scope/one": major
"two": minor
"three": none
---
Breaking change to API.
"#;

        let changeset = parse_changeset(content).expect("should parse");
        assert_eq!(changeset.releases.len(), 3);

        assert_eq!(changeset.releases[0].name, "@scope/one");
        assert_eq!(changeset.releases[0].bump_type, BumpType::Major);
        assert_eq!(changeset.releases[1].name, "two");
        assert_eq!(changeset.releases[1].bump_type, BumpType::Minor);
        assert_eq!(changeset.releases[2].name, "three");
        assert_eq!(changeset.releases[2].bump_type, BumpType::None);
    }

    #[test]
    fn empty_front_matter_is_an_empty_changeset() {
        let content = "---\n---\n\nDocs only.\n";

        let changeset = parse_changeset(content).expect("should parse");
        assert!(changeset.releases.is_empty());
        assert_eq!(changeset.summary, "Docs only.");
    }

    #[test]
    fn empty_body() {
        let content = "---\n\"my-package\": patch\n---\n";

        let changeset = parse_changeset(content).expect("should parse");
        assert!(changeset.summary.is_empty());
    }

    #[test]
    fn delimiter_inside_summary() {
        let content = r#"---
"my-package": patch
---
Summary with --- inside text should not break parsing.
"#;

        let changeset = parse_changeset(content).expect("should parse");
        assert!(changeset.summary.contains("---"));
    }

    #[test]
    fn windows_line_endings() {
        let content = "---\r\n\"my-package\": patch\r\n---\r\nWindows style summary.\r\n";

        let changeset = parse_changeset(content).expect("should parse");
        assert_eq!(changeset.releases.len(), 1);
        assert_eq!(changeset.releases[0].name, "my-package");
        assert!(changeset.summary.contains("Windows style summary"));
    }

    #[test]
    fn unicode_summary() {
        let content = "---\n\"pkg\": minor\n---\n변경사항을 추가했습니다 🎉\n";

        let changeset = parse_changeset(content).expect("should parse");
        assert!(changeset.summary.contains("변경사항"));
    }

    #[test]
    fn error_missing_opening_delimiter() {
        let content = "\"my-package\": patch\n---\nSome summary.\n";

        let err = parse_changeset(content).expect_err("should fail");
        assert!(err.to_string().contains("opening delimiter"));
    }

    #[test]
    fn error_missing_closing_delimiter() {
        let content = "---\n\"my-package\": patch\nSome summary without closing delimiter.\n";

        let err = parse_changeset(content).expect_err("should fail");
        assert!(err.to_string().contains("closing delimiter"));
    }

    #[test]
    fn error_invalid_bump_type() {
        let content = "---\n\"my-package\": huge\n---\nSome summary.\n";

        let err = parse_changeset(content).expect_err("should fail");
        assert!(err.to_string().contains("YAML"));
    }

    #[test]
    fn error_input_too_large() {
        let huge_content = "a".repeat(MAX_INPUT_SIZE + 1);

        let err = parse_changeset(&huge_content).expect_err("should fail");
        assert!(err.to_string().contains("maximum size"));
    }

    #[test]
    fn error_duplicate_package() {
        let content = r#"---
"my-package": major
"my-package": patch
---
Some summary.
"#;

        let err = parse_changeset(content).expect_err("should fail");
        let err_str = err.to_string();
        assert!(
            err_str.contains("duplicate"),
            "Expected 'duplicate' in error message, got: {err_str}"
        );
    }

    #[test]
    fn id_is_file_stem_of_markdown_files() {
        assert_eq!(
            changeset_id_from_path(Path::new(".changeset/brave-red-fox.md")),
            Some("brave-red-fox".to_string())
        );
        assert_eq!(changeset_id_from_path(Path::new(".changeset/config.json")), None);
        assert_eq!(changeset_id_from_path(Path::new(".changeset/a.b.md")), None);
    }
}
