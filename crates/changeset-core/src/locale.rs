use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ChangesetError;

/// Language used for comments, pull request bodies and check annotations.
///
/// Parsed through `FromStr`, which also accepts an empty action input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    #[serde(alias = "kr")]
    Ko,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => f.write_str("en"),
            Self::Ko => f.write_str("ko"),
        }
    }
}

impl FromStr for Locale {
    type Err = ChangesetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "en" => Ok(Self::En),
            "ko" | "kr" => Ok(Self::Ko),
            other => Err(ChangesetError::UnsupportedLocale(other.to_string())),
        }
    }
}
