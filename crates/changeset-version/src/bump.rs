use changeset_core::BumpType;
use semver::{Prerelease, Version};

use crate::VersionError;

#[must_use]
pub fn is_prerelease(version: &Version) -> bool {
    !version.pre.is_empty()
}

/// Applies a bump with npm semantics: a pre-release of the target version is
/// promoted instead of skipped over (`1.1.0-beta.2` + minor = `1.1.0`).
#[must_use]
pub fn bump_version(version: &Version, bump_type: BumpType) -> Version {
    let mut new_version = version.clone();
    let pre = is_prerelease(version);

    match bump_type {
        BumpType::None => return new_version,
        BumpType::Major => {
            if !(pre && version.minor == 0 && version.patch == 0) {
                new_version.major += 1;
            }
            new_version.minor = 0;
            new_version.patch = 0;
        }
        BumpType::Minor => {
            if !(pre && version.patch == 0) {
                new_version.minor += 1;
            }
            new_version.patch = 0;
        }
        BumpType::Patch => {
            if !pre {
                new_version.patch += 1;
            }
        }
    }

    new_version.pre = Prerelease::EMPTY;
    new_version.build = semver::BuildMetadata::EMPTY;
    new_version
}

fn prerelease_counter(version: &Version, tag: &str) -> Option<u64> {
    let rest = version.pre.as_str().strip_prefix(tag)?.strip_prefix('.')?;
    rest.parse().ok()
}

/// Computes the next `<tag>.<n>` pre-release of `version`.
///
/// A version already on the same tag keeps its base and increments the counter,
/// otherwise the base is bumped and the counter starts at 0.
///
/// # Errors
///
/// Returns `VersionError::InvalidPrereleaseTag` if the tag is not a valid
/// pre-release identifier.
pub fn prerelease_version(
    version: &Version,
    bump_type: BumpType,
    tag: &str,
) -> Result<Version, VersionError> {
    let (mut next, counter) = match prerelease_counter(version, tag) {
        Some(n) => (version.clone(), n + 1),
        None => (bump_version(version, bump_type.max(BumpType::Patch)), 0),
    };

    next.pre = Prerelease::new(&format!("{tag}.{counter}"))
        .map_err(|_| VersionError::InvalidPrereleaseTag(tag.to_string()))?;
    Ok(next)
}
