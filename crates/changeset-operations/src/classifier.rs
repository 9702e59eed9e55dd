use crate::error::OperationError;

/// `packages_dir` entry meaning "the repository root is the only package".
pub const ROOT_DIR_MARKER: &str = ".";

const GLOB_METACHARACTERS: &[char] = &['*', '?', '[', ']', '{', '}', '!'];

/// Tracked package directories, as configured by `packages_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageDirs {
    dirs: Vec<String>,
    root_mode: bool,
}

impl PackageDirs {
    /// Builds the set from already validated entries.
    #[must_use]
    pub fn new<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for dir in dirs {
            set.push(normalize_dir(dir.as_ref()));
        }
        set
    }

    #[must_use]
    pub fn root() -> Self {
        Self::new([ROOT_DIR_MARKER])
    }

    /// Parses a comma separated `packages_dir` input.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidPackagesDir`] for an entry that is empty,
    /// absolute, escapes the repository with `..` or contains glob syntax.
    pub fn parse(input: &str) -> Result<Self, OperationError> {
        let mut set = Self::default();
        for raw in input.split(',') {
            let entry = raw.trim();
            let invalid = |reason| OperationError::InvalidPackagesDir {
                entry: entry.to_string(),
                reason,
            };

            if entry.is_empty() {
                return Err(invalid("entry is empty"));
            }
            if entry.starts_with('/') {
                return Err(invalid("must be relative to the repository root"));
            }
            if entry.split('/').any(|segment| segment == "..") {
                return Err(invalid("must not contain '..'"));
            }
            if entry.contains(GLOB_METACHARACTERS) {
                return Err(invalid("glob patterns are not supported"));
            }

            set.push(normalize_dir(entry));
        }
        Ok(set)
    }

    fn push(&mut self, dir: String) {
        if dir == ROOT_DIR_MARKER {
            self.root_mode = true;
        } else if !dir.is_empty() && !self.dirs.contains(&dir) {
            self.dirs.push(dir);
        }
    }

    /// Whether the whole repository is treated as one package.
    #[must_use]
    pub fn is_root_mode(&self) -> bool {
        self.root_mode
    }

    /// Tracked directories other than the root marker.
    #[must_use]
    pub fn dirs(&self) -> &[String] {
        &self.dirs
    }

    /// The first tracked directory `path` lies under.
    ///
    /// Matching is a substring test on `"{dir}/"`, so `packages` also matches
    /// `other-packages/a.ts`.
    #[must_use]
    pub fn matching_dir(&self, path: &str) -> Option<&str> {
        self.dirs
            .iter()
            .find(|dir| path.contains(&format!("{dir}/")))
            .map(String::as_str)
    }

    /// Display form used in messages, e.g. `packages, apps`.
    #[must_use]
    pub fn display(&self) -> String {
        let mut parts: Vec<&str> = self.dirs.iter().map(String::as_str).collect();
        if self.root_mode {
            parts.insert(0, ROOT_DIR_MARKER);
        }
        parts.join(", ")
    }
}

fn normalize_dir(dir: &str) -> String {
    let dir = dir.trim();
    if dir == ROOT_DIR_MARKER || dir == "./" {
        return ROOT_DIR_MARKER.to_string();
    }
    dir.strip_prefix("./")
        .unwrap_or(dir)
        .trim_end_matches('/')
        .to_string()
}

/// Path prefixes excluded from detection, as configured by `excludes`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Excludes(Vec<String>);

impl Excludes {
    #[must_use]
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            entries
                .into_iter()
                .map(|e| e.as_ref().trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    /// Parses a comma separated `excludes` input. Empty entries are dropped, so
    /// an empty input excludes nothing.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self::new(input.split(','))
    }

    /// Exact match or plain string prefix; no segment boundary is enforced.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.0
            .iter()
            .any(|exclude| path == exclude || path.starts_with(exclude.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_package_file: bool,
    pub is_excluded: bool,
    pub is_markdown: bool,
}

impl Classification {
    /// Whether the file can make its package count as changed.
    #[must_use]
    pub fn affects_package(self) -> bool {
        self.is_package_file && !self.is_excluded && !self.is_markdown
    }
}

#[must_use]
pub fn classify(path: &str, dirs: &PackageDirs, excludes: &Excludes) -> Classification {
    Classification {
        is_package_file: dirs.is_root_mode() || dirs.matching_dir(path).is_some(),
        is_excluded: excludes.is_excluded(path),
        is_markdown: path.ends_with(".md"),
    }
}
