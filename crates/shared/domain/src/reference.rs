//! Versification-scoped reference types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Names a versification scheme: the assignment of stable ordinals to verses.
/// Two modules may disagree on verse boundaries; conversion between schemes is
/// the versification service's job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersificationId(String);

impl VersificationId {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersificationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An inclusive ordinal verse range under a single versification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseRange {
    pub start_ordinal: u32,
    pub end_ordinal: u32,
}

impl VerseRange {
    /// Builds a range, swapping the endpoints if they arrive reversed so the
    /// `start <= end` invariant always holds.
    #[must_use]
    pub const fn new(start_ordinal: u32, end_ordinal: u32) -> Self {
        if start_ordinal <= end_ordinal {
            Self { start_ordinal, end_ordinal }
        } else {
            Self { start_ordinal: end_ordinal, end_ordinal: start_ordinal }
        }
    }

    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end_ordinal - self.start_ordinal + 1
    }
}

/// A chapter-level key, used for previous/next navigation and chapter
/// expansion. `None` where a `ChapterKey` would be expected marks a corpus
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterKey {
    /// OSIS identifier, e.g. `Gen.1`.
    pub osis_id: String,
    /// Human-readable label, e.g. `Genesis 1`.
    pub display_name: String,
}

/// Navigation direction for sibling-chapter lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Previous,
    Next,
}

/// Three-valued rounding instruction for ordinal lookups. Deliberately not an
/// `Option<bool>`: the wire contract is "true"/"false"/anything-else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    /// Expand the end ordinal to the end of its containing chapter.
    Up,
    /// Truncate the end ordinal to the start of its containing chapter.
    Down,
    /// Leave the ordinals untouched.
    #[default]
    None,
}

impl Rounding {
    /// Parses the wire form: case-insensitive `"true"` rounds up, `"false"`
    /// rounds down, anything else (including absent) leaves the range alone.
    #[must_use]
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("true") => Self::Up,
            Some(s) if s.eq_ignore_ascii_case("false") => Self::Down,
            _ => Self::None,
        }
    }
}
