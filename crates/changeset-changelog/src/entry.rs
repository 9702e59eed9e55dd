use changeset_core::BumpType;

/// The body of one version section of a changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub content: String,
    /// Highest bump level named by a heading inside the section
    /// (`### Major Changes` and the like); `None` when no heading names one.
    pub highest_level: BumpType,
}

impl ChangelogEntry {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
