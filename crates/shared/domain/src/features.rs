//! Rendering features and module capabilities.
//!
//! A [`Feature`] is a rendering layer the client may ask for (verse numbers,
//! Strong's tags, red letter, ...). Every feature carries static compatibility
//! data: the [`Capabilities`] a module must expose for the feature to render
//! anything, the display modes the feature may appear in, and the features it
//! conflicts with. Declaration order is load-bearing — trimming, conflict
//! resolution and DOM layer order all follow it.

use crate::modules::DisplayMode;
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Debug;
use strum_macros::{Display, EnumIter, EnumString};

bitflags! {
    /// What a module's native markup can support.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Capabilities: u32 {
        const STRONGS = 1 << 0;
        const MORPHOLOGY = 1 << 1;
        const RED_LETTER = 1 << 2;
        const HEADINGS = 1 << 3;
        const NOTES = 1 << 4;
        const CROSS_REFS = 1 << 5;
        /// Stable per-word identifiers, required for interlinear alignment.
        const WORD_IDS = 1 << 6;
    }
}

impl Serialize for Capabilities {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for Capabilities {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_retain(bits))
    }
}

/// A rendering layer the client can toggle on a passage.
///
/// Wire tokens are SCREAMING_SNAKE_CASE (`VERSE_NUMBERS`, `STRONGS`, ...).
/// The declaration order below is the canonical feature order; do not
/// reorder variants without checking the conflict table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    /// Standard verse numbers in the margin of the text.
    VerseNumbers,
    /// Section headings embedded in the module markup.
    Headings,
    /// Translators' footnotes.
    Notes,
    /// Words of Jesus marked up in red.
    RedLetter,
    /// Cross-references to related passages.
    CrossReferences,
    /// Strong's number tagging on each word.
    Strongs,
    /// Morphological parsing tags on each word.
    Morphology,
    /// Compact superscript verse numbers used by multi-version layouts.
    TinyVerseNumbers,
}

impl Feature {
    /// Whether the feature is switched on when the client expresses no
    /// preference.
    #[must_use]
    pub const fn default_enabled(self) -> bool {
        matches!(self, Self::VerseNumbers | Self::Headings | Self::Notes)
    }

    /// Human-readable name for UI listings.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::VerseNumbers => "Verse numbers",
            Self::Headings => "Section headings",
            Self::Notes => "Translation notes",
            Self::RedLetter => "Words of Jesus in red",
            Self::CrossReferences => "Cross references",
            Self::Strongs => "Strong's numbers",
            Self::Morphology => "Grammar (morphology)",
            Self::TinyVerseNumbers => "Compact verse numbers",
        }
    }

    /// Capabilities every participating module must expose for this feature
    /// to be applied.
    #[must_use]
    pub const fn required_capabilities(self) -> Capabilities {
        match self {
            Self::VerseNumbers | Self::TinyVerseNumbers => Capabilities::empty(),
            Self::Headings => Capabilities::HEADINGS,
            Self::Notes => Capabilities::NOTES,
            Self::RedLetter => Capabilities::RED_LETTER,
            Self::CrossReferences => Capabilities::CROSS_REFS,
            Self::Strongs => Capabilities::STRONGS,
            Self::Morphology => Capabilities::MORPHOLOGY,
        }
    }

    /// Whether the feature may appear at all under the given display mode.
    #[must_use]
    pub const fn allowed_in(self, mode: DisplayMode) -> bool {
        match self {
            // Always legal; harmless where the markup has nothing to show.
            Self::VerseNumbers | Self::RedLetter => true,
            // Clutter in stacked layouts: only rendered when one version owns
            // the page flow.
            Self::Headings | Self::Notes | Self::CrossReferences => {
                matches!(mode, DisplayMode::Single | DisplayMode::Interlinear)
            }
            Self::Strongs | Self::Morphology => {
                matches!(mode, DisplayMode::Single | DisplayMode::Interlinear)
            }
            // Only meaningful when several versions share the page.
            Self::TinyVerseNumbers => !matches!(mode, DisplayMode::Single),
        }
    }

    /// Features this one cannot coexist with. Conflicts are resolved by
    /// dropping the later-declared feature of each pair.
    #[must_use]
    pub const fn incompatible_with(self) -> &'static [Self] {
        match self {
            Self::VerseNumbers => &[Self::TinyVerseNumbers],
            Self::TinyVerseNumbers => &[Self::VerseNumbers],
            _ => &[],
        }
    }
}
