//! Calendar dates as ordered ISO strings.

use serde::{Deserialize, Serialize};

/// A calendar date as an ISO `YYYY-MM-DD` string.
///
/// Ordering is plain lexical string comparison, which coincides with
/// chronological order for this format. The type deliberately never parses
/// its contents: a malformed or partial date keeps its lexical position in
/// the axis instead of becoming a parse error.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IsoDate(String);

impl IsoDate {
    pub fn new(date: impl Into<String>) -> Self {
        Self(date.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IsoDate {
    fn from(date: &str) -> Self {
        Self(date.to_string())
    }
}

impl std::fmt::Display for IsoDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
