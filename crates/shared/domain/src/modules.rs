//! Module identity and metadata.

use crate::features::Capabilities;
use crate::reference::VersificationId;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// Short initials identifying an installed module (`"KJV"`, `"WEB"`, ...).
///
/// Initials are case-normalised to upper on construction so that lookups are
/// case-insensitive end to end.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    #[must_use]
    pub fn new(initials: impl AsRef<str>) -> Self {
        Self(initials.as_ref().trim().to_uppercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Broad classification of a module's content.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Bible,
    Commentary,
}

/// Metadata of an installed module. Immutable for the lifetime of the
/// installation; invalidated when the module is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    pub id: ModuleId,
    pub name: String,
    /// ISO language code of the text.
    pub language: String,
    pub category: Category,
    pub capabilities: Capabilities,
    pub versification: VersificationId,
}

/// How multiple modules are composed in the rendered output.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayMode {
    /// One version, flowing text.
    Single,
    /// One base version glossed word-by-word from another module.
    Interlinear,
    /// Versions stacked inside one block per verse.
    InterleavedByVerse,
    /// Alternating paragraphs, one per version.
    InterleavedContinuous,
    /// Table layout, one column per version.
    Column,
}

impl DisplayMode {
    /// True when the mode lays out two or more versions side by side.
    #[must_use]
    pub const fn is_multi_version(self) -> bool {
        matches!(self, Self::InterleavedByVerse | Self::InterleavedContinuous | Self::Column)
    }

    /// Resolves the effective mode from the client hint and the number of
    /// extra versions supplied. Without extras every hint collapses to
    /// [`DisplayMode::Single`].
    #[must_use]
    pub fn resolve(hint: Option<&str>, extra_count: usize) -> Self {
        if extra_count == 0 {
            return Self::Single;
        }
        match hint.map(str::trim).and_then(|h| h.parse::<Self>().ok()) {
            Some(Self::Single) | None => Self::Single,
            Some(mode) => mode,
        }
    }
}
