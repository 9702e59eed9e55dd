use chrono::NaiveDate;
use semver::Version;

use crate::VersionError;

pub const DEFAULT_VERSION_TEMPLATE: &str = "{VERSION}-{TAG}-{COMMITID7}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Version,
    Tag,
    Date,
    CommitId7,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "VERSION" => Some(Self::Version),
            "TAG" => Some(Self::Tag),
            "DATE" => Some(Self::Date),
            "COMMITID7" => Some(Self::CommitId7),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// Values substituted into a [`VersionTemplate`].
#[derive(Debug, Clone)]
pub struct TemplateValues<'a> {
    pub version: &'a Version,
    pub tag: &'a str,
    pub date: NaiveDate,
    pub commit_sha: &'a str,
}

/// A canary version template such as `{VERSION}-{TAG}-{COMMITID7}`.
///
/// Templates are validated when parsed, so rendering never leaks an unknown
/// placeholder into a version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl VersionTemplate {
    /// # Errors
    ///
    /// Returns `VersionError` on an unknown or unclosed placeholder.
    pub fn parse(template: &str) -> Result<Self, VersionError> {
        let mut segments = Vec::new();
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after_open = &rest[open + 1..];
            let close = after_open
                .find('}')
                .ok_or_else(|| VersionError::UnclosedPlaceholder(template.to_string()))?;
            let name = &after_open[..close];
            let placeholder =
                Placeholder::parse(name).ok_or_else(|| VersionError::UnknownPlaceholder {
                    template: template.to_string(),
                    placeholder: name.to_string(),
                })?;
            segments.push(Segment::Placeholder(placeholder));
            rest = &after_open[close + 1..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// # Errors
    ///
    /// Returns `VersionError::InvalidRenderedVersion` if the result is not valid semver.
    pub fn render(&self, values: &TemplateValues<'_>) -> Result<Version, VersionError> {
        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(Placeholder::Version) => {
                    rendered.push_str(&values.version.to_string());
                }
                Segment::Placeholder(Placeholder::Tag) => rendered.push_str(values.tag),
                Segment::Placeholder(Placeholder::Date) => {
                    rendered.push_str(&values.date.format("%Y%m%d").to_string());
                }
                Segment::Placeholder(Placeholder::CommitId7) => {
                    rendered.push_str(&values.commit_sha.chars().take(7).collect::<String>());
                }
            }
        }

        Version::parse(&rendered).map_err(|source| VersionError::InvalidRenderedVersion {
            template: self.source.clone(),
            rendered,
            source,
        })
    }
}

impl Default for VersionTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_VERSION_TEMPLATE.to_string(),
            segments: vec![
                Segment::Placeholder(Placeholder::Version),
                Segment::Literal("-".to_string()),
                Segment::Placeholder(Placeholder::Tag),
                Segment::Literal("-".to_string()),
                Segment::Placeholder(Placeholder::CommitId7),
            ],
        }
    }
}
