use std::path::Path;

use changeset_core::BumpType;

use crate::entry::ChangelogEntry;
use crate::error::ChangelogError;

pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Heading<'a> {
    depth: usize,
    text: &'a str,
}

fn parse_heading(line: &str) -> Option<Heading<'_>> {
    let trimmed = line.trim_start();
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let depth = trimmed.chars().take_while(|c| *c == '#').count();
    if depth == 0 || depth > 6 {
        return None;
    }
    let rest = &trimmed[depth..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    let text = rest.trim().trim_end_matches('#').trim_end();
    Some(Heading { depth, text })
}

fn bump_level_of(heading: &str) -> BumpType {
    let lower = heading.to_lowercase();
    [
        ("major", BumpType::Major),
        ("minor", BumpType::Minor),
        ("patch", BumpType::Patch),
    ]
    .into_iter()
    .filter_map(|(word, level)| lower.find(word).map(|pos| (pos, level)))
    .min_by_key(|(pos, _)| *pos)
    .map_or(BumpType::None, |(_, level)| level)
}

#[derive(Debug, Clone)]
pub struct Changelog {
    content: String,
}

impl Changelog {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `ChangelogError::Read` if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self, ChangelogError> {
        let content = std::fs::read_to_string(path).map_err(|source| ChangelogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self { content })
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Extracts the section whose heading text is exactly `version`.
    ///
    /// The section ends at the next heading of the same depth. Headings inside
    /// fenced code blocks are ignored.
    #[must_use]
    pub fn entry(&self, version: &str) -> Option<ChangelogEntry> {
        let mut in_fence = false;
        let mut section_depth: Option<usize> = None;
        let mut body: Vec<&str> = Vec::new();
        let mut highest_level = BumpType::None;

        for line in self.content.lines() {
            if line.trim_start().starts_with(FENCE) {
                in_fence = !in_fence;
            }
            let heading = if in_fence { None } else { parse_heading(line) };

            match (section_depth, heading) {
                (None, Some(h)) if h.text == version => {
                    section_depth = Some(h.depth);
                }
                (None, _) => {}
                (Some(depth), Some(h)) if h.depth <= depth => break,
                (Some(_), heading) => {
                    if let Some(h) = heading {
                        highest_level = highest_level.max(bump_level_of(h.text));
                    }
                    body.push(line);
                }
            }
        }

        section_depth.map(|_| ChangelogEntry {
            content: body.join("\n").trim().to_string(),
            highest_level,
        })
    }
}
